use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::decision::DecisionError;

/// Input shape of a question; selects the decision strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Format {
    FreeForm,
    SingleChoice,
    MultiChoice,
    Acknowledge,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::FreeForm => "free_form",
            Format::SingleChoice => "single_choice",
            Format::MultiChoice => "multi_choice",
            Format::Acknowledge => "acknowledge",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DecisionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "free_form" => Ok(Format::FreeForm),
            "single_choice" => Ok(Format::SingleChoice),
            "multi_choice" => Ok(Format::MultiChoice),
            "acknowledge" => Ok(Format::Acknowledge),
            other => Err(DecisionError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl TryFrom<String> for Format {
    type Error = DecisionError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Summary renderer used for a question. Independent from [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DisplayType {
    Radio,
    #[serde(rename = "CheckBox", alias = "Checkbox")]
    Checkbox,
    Form,
    Continue,
}

impl DisplayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayType::Radio => "Radio",
            DisplayType::Checkbox => "CheckBox",
            DisplayType::Form => "Form",
            DisplayType::Continue => "Continue",
        }
    }
}

/// A single question on a page-flow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub id: String,
    pub format: Format,
    #[serde(rename = "type")]
    pub display_type: DisplayType,
    pub step: String,
    pub text: String,
    /// Raw option encoding, see [`crate::options`].
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(default)]
    pub summary: bool,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        format: Format,
        display_type: DisplayType,
        step: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            format,
            display_type,
            step: step.into(),
            text: text.into(),
            options: String::new(),
            answers: Vec::new(),
            decision: None,
            summary: false,
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    /// Replaces the raw answers and clears any earlier decision.
    pub fn answer<I, S>(&mut self, raw: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers = raw.into_iter().map(Into::into).collect();
        self.decision = None;
    }

    pub fn is_answered(&self) -> bool {
        !self.answers.is_empty()
    }
}
