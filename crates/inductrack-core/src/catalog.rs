//! Read-only question lookup over a single induction.

use std::collections::{BTreeSet, HashMap};

use crate::error::LifecycleError;
use crate::model::{Induction, Question};

/// By-id question index for one induction.
///
/// No mutation contract: built once from the induction and only read after.
/// Duplicate ids (flagged by the parser's validation pass) resolve to the
/// first occurrence.
pub struct QuestionCatalog<'a> {
    questions: &'a [Question],
    by_id: HashMap<&'a str, usize>,
}

impl<'a> QuestionCatalog<'a> {
    pub fn new(induction: &'a Induction) -> Self {
        let mut by_id = HashMap::with_capacity(induction.questions.len());
        for (index, question) in induction.questions.iter().enumerate() {
            by_id.entry(question.id.as_str()).or_insert(index);
        }
        Self {
            questions: &induction.questions,
            by_id,
        }
    }

    /// Look up a question by id.
    pub fn get(&self, id: &str) -> Result<&'a Question, LifecycleError> {
        self.by_id
            .get(id)
            .map(|&index| &self.questions[index])
            .ok_or_else(|| LifecycleError::QuestionNotFound(id.to_string()))
    }

    /// Ids of every question that must be answered before completion —
    /// all kinds except `information`.
    pub fn required_ids(&self) -> BTreeSet<&'a str> {
        self.questions
            .iter()
            .filter(|q| q.kind().is_gradable())
            .map(|q| q.id.as_str())
            .collect()
    }

    pub fn questions(&self) -> &'a [Question] {
        self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
