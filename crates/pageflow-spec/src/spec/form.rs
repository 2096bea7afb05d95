use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::condition::Condition;

/// Session header: which service, which language and the steps visited so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NavigationHeader {
    pub service: String,
    pub language: String,
    #[serde(default)]
    pub breadcrumb: Vec<String>,
}

impl NavigationHeader {
    pub fn new(service: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            language: language.into(),
            breadcrumb: Vec::new(),
        }
    }

    /// Records a visit to `step`. Repeats are kept; the trail is the literal path.
    pub fn visit(&mut self, step: impl Into<String>) {
        self.breadcrumb.push(step.into());
    }
}

/// One questionnaire session. Owns its condition so answers never leak across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Form {
    pub header: NavigationHeader,
    pub condition: Condition,
}

impl Form {
    pub fn new(
        service: impl Into<String>,
        language: impl Into<String>,
        condition: Condition,
    ) -> Self {
        Self {
            header: NavigationHeader::new(service, language),
            condition,
        }
    }

    pub fn with_breadcrumb<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header.breadcrumb = steps.into_iter().map(Into::into).collect();
        self
    }
}
