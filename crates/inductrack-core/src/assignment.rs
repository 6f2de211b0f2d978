//! Assignment records: one user's instance of taking one induction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::model::{OptionIndex, QuestionKind};

/// The stored lifecycle status. `complete` is terminal.
///
/// Note there is no stored `overdue`: that is a display status derived at
/// read time from the due date (see [`crate::results::derive_display_status`]),
/// so it can never desynchronize from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    InProgress,
    Complete,
}

impl AssignmentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Complete)
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assigned" => Ok(AssignmentStatus::Assigned),
            "in_progress" => Ok(AssignmentStatus::InProgress),
            "complete" => Ok(AssignmentStatus::Complete),
            other => Err(format!("unknown assignment status: {other}")),
        }
    }
}

/// One user's assignment of one induction.
///
/// Owned by the user it targets and mutated only through
/// [`crate::lifecycle::LifecycleManager`]. Callers own durability and must
/// serialize access per assignment (single-writer contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub induction_id: String,
    pub status: AssignmentStatus,
    /// The assignment cannot be started before this instant.
    pub available_from: DateTime<Utc>,
    /// Invariant: `due_date >= available_from`.
    pub due_date: DateTime<Utc>,
    pub assigned_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Answers keyed by question id. Each key holds at most one answer; a
    /// repeated submission for the same question replaces the prior value.
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Assignment {
    /// Ids of the questions that currently hold an answer.
    pub fn answered_ids(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }
}

/// Free-form feedback left against a finished assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub comment: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// One stored answer, with the grading outcome stamped at record time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    #[serde(flatten)]
    pub payload: AnswerPayload,
    /// `None` means ungraded or ungradable (awaiting human review).
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub flagged_for_review: bool,
}

/// Kind-specific answer payload, one variant per question kind.
///
/// Modelled as a tagged union so grading is exhaustively checked at compile
/// time instead of relying on runtime field presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum AnswerPayload {
    Multichoice {
        #[serde(default)]
        selected_options: Vec<OptionIndex>,
    },
    TrueFalse {
        #[serde(default)]
        selected_option: Option<OptionIndex>,
    },
    Dropdown {
        #[serde(default)]
        selected_option: Option<OptionIndex>,
    },
    YesNo {
        #[serde(default)]
        selected_option: Option<OptionIndex>,
    },
    ShortAnswer {
        #[serde(default)]
        text_value: String,
    },
    FileUpload {
        file_ref: String,
    },
    Information {
        #[serde(default)]
        acknowledged: bool,
    },
}

impl AnswerPayload {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerPayload::Multichoice { .. } => QuestionKind::Multichoice,
            AnswerPayload::TrueFalse { .. } => QuestionKind::TrueFalse,
            AnswerPayload::Dropdown { .. } => QuestionKind::Dropdown,
            AnswerPayload::YesNo { .. } => QuestionKind::YesNo,
            AnswerPayload::ShortAnswer { .. } => QuestionKind::ShortAnswer,
            AnswerPayload::FileUpload { .. } => QuestionKind::FileUpload,
            AnswerPayload::Information { .. } => QuestionKind::Information,
        }
    }
}
