use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;

/// A medical condition and the questions that make up its page flow.
///
/// Questions keep their declaration order; the summary relies on it to order
/// several questions that share a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Condition {
    pub fn new(id: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            questions,
        }
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.questions.iter_mut().find(|question| question.id == id)
    }

    /// Questions belonging to `step`, in declaration order.
    pub fn questions_on_step<'a>(&'a self, step: &'a str) -> impl Iterator<Item = &'a Question> {
        self.questions
            .iter()
            .filter(move |question| question.step == step)
    }

    /// Returns the ids declared more than once.
    pub fn check_integrity(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                duplicates.insert(question.id.clone());
            }
        }
        duplicates.into_iter().collect()
    }
}
