use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::DisplayType;

/// Localized text of one answer, keyed by language code.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Answer {
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

impl Answer {
    pub fn text(&self, language: &str) -> Option<&str> {
        self.answers.get(language).map(String::as_str)
    }
}

/// Answers known for one question, keyed by answer key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct OptionCatalogue {
    #[serde(default)]
    pub options: BTreeMap<String, Answer>,
}

impl OptionCatalogue {
    pub fn localized(&self, key: &str, language: &str) -> Option<&str> {
        self.options.get(key).and_then(|answer| answer.text(language))
    }
}

/// Per-condition, per-service catalogue of summary text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SummaryDefinition {
    #[serde(default)]
    pub questions: BTreeMap<String, OptionCatalogue>,
}

impl SummaryDefinition {
    pub fn catalogue(&self, question_id: &str) -> Option<&OptionCatalogue> {
        self.questions.get(question_id)
    }

    /// Adds localized text for `question_id`/`key`, creating entries as needed.
    pub fn insert_text(
        &mut self,
        question_id: impl Into<String>,
        key: impl Into<String>,
        language: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.questions
            .entry(question_id.into())
            .or_default()
            .options
            .entry(key.into())
            .or_default()
            .answers
            .insert(language.into(), text.into());
    }
}

/// One summary block shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayLine {
    #[serde(rename = "type")]
    pub display_type: DisplayType,
    pub sub_heading: String,
    #[serde(default)]
    pub lines: Vec<String>,
    pub link: String,
}
