//! The per-user-per-induction assignment state machine.
//!
//! Stored status progresses `assigned -> in_progress -> complete` and never
//! regresses through this API; `complete` is terminal. `overdue` is not a
//! stored state — see [`crate::results`]. The manager is synchronous and
//! side-effect-free except for mutating the assignment it is handed; the
//! caller owns durability and the current clock (`now` is always explicit).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::assignment::{Answer, AnswerPayload, Assignment, AssignmentStatus};
use crate::catalog::QuestionCatalog;
use crate::error::LifecycleError;
use crate::grading::{grade, Verdict};
use crate::model::Induction;
use crate::traits::normalize_file_ref;

/// Drives the lifecycle of assignments of one induction.
pub struct LifecycleManager<'a> {
    induction: &'a Induction,
    catalog: QuestionCatalog<'a>,
}

impl<'a> LifecycleManager<'a> {
    pub fn new(induction: &'a Induction) -> Self {
        Self {
            induction,
            catalog: QuestionCatalog::new(induction),
        }
    }

    pub fn induction(&self) -> &'a Induction {
        self.induction
    }

    pub fn catalog(&self) -> &QuestionCatalog<'a> {
        &self.catalog
    }

    /// Create a fresh assignment of this induction for a user.
    pub fn create(
        &self,
        user_id: Uuid,
        available_from: DateTime<Utc>,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Assignment, LifecycleError> {
        check_schedule(available_from, due_date)?;
        Ok(Assignment {
            id: Uuid::new_v4(),
            user_id,
            induction_id: self.induction.id.clone(),
            status: AssignmentStatus::Assigned,
            available_from,
            due_date,
            assigned_at: now,
            started_at: None,
            completed_at: None,
            answers: Default::default(),
            feedback: None,
        })
    }

    /// Begin taking the assignment.
    ///
    /// Idempotent: an assignment already `in_progress` or `complete` is left
    /// untouched (`started_at` is never reset). Starting before
    /// `available_from` fails.
    pub fn start(
        &self,
        assignment: &mut Assignment,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        match assignment.status {
            AssignmentStatus::InProgress | AssignmentStatus::Complete => {
                tracing::debug!(assignment = %assignment.id, "start is a no-op, already {}", assignment.status);
                Ok(())
            }
            AssignmentStatus::Assigned => {
                check_available(assignment, now)?;
                assignment.status = AssignmentStatus::InProgress;
                assignment.started_at = Some(now);
                Ok(())
            }
        }
    }

    /// Record (upsert) one answer and grade it synchronously.
    ///
    /// The first answer implicitly starts the assignment, under the same
    /// availability gate as [`Self::start`]. The upsert replaces any prior
    /// answer for the same question id — last write wins per question;
    /// answers under other ids are never touched. All validation happens
    /// before any mutation, so a rejected call leaves the assignment intact.
    pub fn record_answer(
        &self,
        assignment: &mut Assignment,
        question_id: &str,
        payload: AnswerPayload,
        now: DateTime<Utc>,
    ) -> Result<Verdict, LifecycleError> {
        if assignment.status.is_terminal() {
            return Err(LifecycleError::AlreadyComplete);
        }
        let question = self.catalog.get(question_id)?;

        let payload = match payload {
            AnswerPayload::FileUpload { file_ref } => {
                let file_ref = normalize_file_ref(&file_ref).ok_or_else(|| {
                    LifecycleError::EmptyFileRef {
                        question_id: question_id.to_string(),
                    }
                })?;
                AnswerPayload::FileUpload { file_ref }
            }
            other => other,
        };
        let verdict = grade(question, &payload)?;

        if assignment.status == AssignmentStatus::Assigned {
            check_available(assignment, now)?;
            assignment.status = AssignmentStatus::InProgress;
            assignment.started_at = Some(now);
        }

        assignment.answers.insert(
            question_id.to_string(),
            Answer {
                question_id: question_id.to_string(),
                payload,
                is_correct: verdict.as_correctness(),
                flagged_for_review: question.kind().needs_review(),
            },
        );
        Ok(verdict)
    }

    /// Finish the assignment.
    ///
    /// Every non-`information` question must hold an answer; otherwise the
    /// call rejects with the exact missing ids and no state change. An
    /// assignment still `assigned` can only complete when the induction has
    /// no gradable questions. Completing an already-complete assignment is a
    /// no-op.
    pub fn complete(
        &self,
        assignment: &mut Assignment,
        now: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        if assignment.status.is_terminal() {
            tracing::debug!(assignment = %assignment.id, "complete is a no-op, already complete");
            return Ok(());
        }
        let missing: Vec<String> = self
            .catalog
            .required_ids()
            .into_iter()
            .filter(|id| !assignment.answers.contains_key(*id))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LifecycleError::IncompleteSubmission { missing });
        }
        assignment.status = AssignmentStatus::Complete;
        assignment.completed_at = Some(now);
        tracing::debug!(assignment = %assignment.id, "assignment complete");
        Ok(())
    }

    /// Administrative override: replace the schedule.
    ///
    /// Trusted management path — works in any state, but the schedule
    /// invariant still holds.
    pub fn set_schedule(
        &self,
        assignment: &mut Assignment,
        available_from: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Result<(), LifecycleError> {
        check_schedule(available_from, due_date)?;
        assignment.available_from = available_from;
        assignment.due_date = due_date;
        Ok(())
    }

    /// Administrative override: force a stored status, bypassing transition
    /// guards. Timestamps are stamped forward when promoting and cleared
    /// when regressing so derived views stay consistent.
    pub fn set_status(
        &self,
        assignment: &mut Assignment,
        status: AssignmentStatus,
        now: DateTime<Utc>,
    ) {
        match status {
            AssignmentStatus::Assigned => {
                assignment.started_at = None;
                assignment.completed_at = None;
            }
            AssignmentStatus::InProgress => {
                assignment.started_at.get_or_insert(now);
                assignment.completed_at = None;
            }
            AssignmentStatus::Complete => {
                assignment.completed_at.get_or_insert(now);
            }
        }
        tracing::debug!(assignment = %assignment.id, from = %assignment.status, to = %status, "status override");
        assignment.status = status;
    }
}

fn check_schedule(
    available_from: DateTime<Utc>,
    due_date: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    if due_date < available_from {
        return Err(LifecycleError::ScheduleOutOfOrder {
            available: available_from,
            due: due_date,
        });
    }
    Ok(())
}

fn check_available(assignment: &Assignment, now: DateTime<Utc>) -> Result<(), LifecycleError> {
    if now < assignment.available_from {
        return Err(LifecycleError::NotYetAvailable(assignment.available_from));
    }
    Ok(())
}
