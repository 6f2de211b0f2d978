//! Core data model types for inductrack.
//!
//! These are the fundamental types the entire inductrack system uses to
//! represent inductions (training modules) and their questions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A training module: metadata plus an ordered list of questions.
///
/// Once assignments reference an induction its questions are treated as
/// immutable — grading outcomes are stamped onto answers at record time and
/// are never retroactively recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Induction {
    /// Unique identifier for this induction.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Department the induction belongs to.
    #[serde(default)]
    pub department: String,
    /// Rich-text description shown before the questions. Stored opaque.
    #[serde(default)]
    pub description: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A single question within an induction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique identifier within the induction.
    pub id: String,
    /// The prompt shown to the user.
    pub question: String,
    /// Supporting description or instructions.
    #[serde(default)]
    pub description: String,
    /// Kind-specific options and answer key.
    #[serde(flatten)]
    pub body: QuestionBody,
}

impl Question {
    /// The kind discriminator of this question.
    pub fn kind(&self) -> QuestionKind {
        self.body.kind()
    }
}

/// Kind-specific question payload: options where the kind takes them, and the
/// answer key where the kind is machine-gradable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum QuestionBody {
    /// Select every correct option; graded by canonical set equality.
    Multichoice {
        options: Vec<String>,
        correct_options: BTreeSet<OptionIndex>,
    },
    /// Single-select over an implied True/False pair.
    TrueFalse {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        options: Vec<String>,
        correct_option: OptionIndex,
    },
    /// Single-select over an explicit option list.
    Dropdown {
        options: Vec<String>,
        correct_option: OptionIndex,
    },
    /// Single-select over an implied Yes/No pair.
    YesNo {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        options: Vec<String>,
        correct_option: OptionIndex,
    },
    /// Free text; always routed to human review.
    ShortAnswer,
    /// File evidence; always routed to human review.
    FileUpload,
    /// Informational content only — never graded, never required.
    Information,
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionBody::Multichoice { .. } => QuestionKind::Multichoice,
            QuestionBody::TrueFalse { .. } => QuestionKind::TrueFalse,
            QuestionBody::Dropdown { .. } => QuestionKind::Dropdown,
            QuestionBody::YesNo { .. } => QuestionKind::YesNo,
            QuestionBody::ShortAnswer => QuestionKind::ShortAnswer,
            QuestionBody::FileUpload => QuestionKind::FileUpload,
            QuestionBody::Information => QuestionKind::Information,
        }
    }
}

/// The seven question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Multichoice,
    TrueFalse,
    Dropdown,
    YesNo,
    ShortAnswer,
    FileUpload,
    Information,
}

impl QuestionKind {
    /// Whether an answer to this kind is required before completion.
    pub fn is_gradable(self) -> bool {
        !matches!(self, QuestionKind::Information)
    }

    /// Whether answers of this kind always need a human reviewer.
    pub fn needs_review(self) -> bool {
        matches!(self, QuestionKind::ShortAnswer | QuestionKind::FileUpload)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionKind::Multichoice => "multichoice",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::Dropdown => "dropdown",
            QuestionKind::YesNo => "yes_no",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::FileUpload => "file_upload",
            QuestionKind::Information => "information",
        };
        write!(f, "{name}")
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multichoice" | "multi_choice" => Ok(QuestionKind::Multichoice),
            "true_false" | "truefalse" => Ok(QuestionKind::TrueFalse),
            "dropdown" => Ok(QuestionKind::Dropdown),
            "yes_no" | "yesno" => Ok(QuestionKind::YesNo),
            "short_answer" => Ok(QuestionKind::ShortAnswer),
            "file_upload" => Ok(QuestionKind::FileUpload),
            "information" => Ok(QuestionKind::Information),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// A zero-based index into a question's option list.
///
/// Submitted payloads arrive from loosely-typed form layers, so an index
/// deserializes from either a JSON number or a numeric string ("2").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionIndex(pub u32);

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for OptionIndex {
    fn from(value: u32) -> Self {
        OptionIndex(value)
    }
}

impl<'de> Deserialize<'de> for OptionIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(OptionIndex(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<u32>()
                .map(OptionIndex)
                .map_err(|_| serde::de::Error::custom(format!("invalid option index: {s:?}"))),
        }
    }
}
