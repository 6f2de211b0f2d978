//! Answer grading: the single source of truth for correctness semantics.
//!
//! `grade` is pure and deterministic — identical inputs always yield
//! identical verdicts, and nothing here touches the assignment record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::assignment::AnswerPayload;
use crate::error::LifecycleError;
use crate::model::{OptionIndex, Question, QuestionBody};

/// Grading outcome for one (question, answer) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Correctness cannot be determined mechanically; a human reviews it.
    Ungradable,
}

impl Verdict {
    /// The `isCorrect` value stamped onto a stored answer.
    pub fn as_correctness(self) -> Option<bool> {
        match self {
            Verdict::Correct => Some(true),
            Verdict::Incorrect => Some(false),
            Verdict::Ungradable => None,
        }
    }
}

/// Grade a submitted payload against its question.
///
/// A payload whose shape does not match the question's kind is a
/// [`LifecycleError::PayloadMismatch`], not a grading outcome.
pub fn grade(question: &Question, payload: &AnswerPayload) -> Result<Verdict, LifecycleError> {
    match (&question.body, payload) {
        (
            QuestionBody::Multichoice {
                correct_options, ..
            },
            AnswerPayload::Multichoice { selected_options },
        ) => {
            // Canonicalize to a sorted, de-duplicated set before comparing.
            let selected: BTreeSet<OptionIndex> = selected_options.iter().copied().collect();
            if selected.is_empty() {
                return Ok(Verdict::Incorrect);
            }
            Ok(if selected == *correct_options {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            })
        }

        (
            QuestionBody::TrueFalse { correct_option, .. },
            AnswerPayload::TrueFalse { selected_option },
        )
        | (
            QuestionBody::Dropdown { correct_option, .. },
            AnswerPayload::Dropdown { selected_option },
        )
        | (QuestionBody::YesNo { correct_option, .. }, AnswerPayload::YesNo { selected_option }) => {
            Ok(match selected_option {
                Some(selected) if selected == correct_option => Verdict::Correct,
                _ => Verdict::Incorrect,
            })
        }

        (QuestionBody::ShortAnswer, AnswerPayload::ShortAnswer { .. })
        | (QuestionBody::FileUpload, AnswerPayload::FileUpload { .. })
        | (QuestionBody::Information, AnswerPayload::Information { .. }) => Ok(Verdict::Ungradable),

        _ => Err(LifecycleError::PayloadMismatch {
            question_id: question.id.clone(),
            expected: question.kind(),
        }),
    }
}
