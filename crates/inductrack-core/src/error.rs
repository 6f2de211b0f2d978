//! Engine error types.
//!
//! [`LifecycleError`] is the domain taxonomy surfaced by the lifecycle and
//! grading code. [`NotifyError`] classifies notification-channel failures;
//! it lives in `inductrack-core` so the reminder dispatcher can downcast and
//! decide retries without string matching. Downstream I/O failures
//! (persistence, delivery transport) are the caller's concern and never
//! masquerade as domain errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::QuestionKind;

/// Typed domain failures from the assignment lifecycle engine.
///
/// Every operation either fully applies or fully rejects: when one of these
/// is returned the assignment is unchanged.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The schedule is inverted: the due date precedes availability.
    #[error("due date {due} precedes available-from {available}")]
    ScheduleOutOfOrder {
        available: DateTime<Utc>,
        due: DateTime<Utc>,
    },

    /// The submitted payload shape does not match the question's kind.
    #[error("answer for question '{question_id}' does not match its {expected} shape")]
    PayloadMismatch {
        question_id: String,
        expected: QuestionKind,
    },

    /// A file answer arrived without a usable file reference.
    #[error("file answer for question '{question_id}' has an empty file reference")]
    EmptyFileRef { question_id: String },

    /// The assignment cannot be started or answered yet.
    #[error("assignment is not available until {0}")]
    NotYetAvailable(DateTime<Utc>),

    /// Mutation was attempted on a terminal (complete) assignment.
    #[error("assignment is already complete")]
    AlreadyComplete,

    /// Completion was attempted with required questions still unanswered.
    /// Carries the exact offending question ids.
    #[error("{} required question(s) unanswered", missing.len())]
    IncompleteSubmission { missing: Vec<String> },

    /// Unknown question id for this induction.
    #[error("question not found: {0}")]
    QuestionNotFound(String),

    /// Unknown induction id.
    #[error("induction not found: {0}")]
    InductionNotFound(String),
}

impl LifecycleError {
    /// Returns `true` for failures callers should surface as form validation
    /// rather than lifecycle conflicts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LifecycleError::ScheduleOutOfOrder { .. }
                | LifecycleError::PayloadMismatch { .. }
                | LifecycleError::EmptyFileRef { .. }
        )
    }
}

/// Errors that can occur when delivering through a notification channel.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The channel returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid token or credentials).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The channel does not know the addressed recipient.
    #[error("unknown recipient: {0}")]
    UnknownRecipient(String),

    /// The channel returned an error response.
    #[error("delivery failed (HTTP {status}): {message}")]
    DeliveryFailed { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl NotifyError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            NotifyError::AuthenticationFailed(_) | NotifyError::UnknownRecipient(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            NotifyError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
