use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{self, MalformedSegment};
use crate::spec::question::{Format, Question};

/// Decision recorded for acknowledgement steps and looked up by the continue renderer.
pub const AFFIRMATIVE: &str = "yes";

/// Machine-readable category of a [`DecisionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ErrorKind {
    NoAnswerProvided,
    InvalidOption,
    UnsupportedFormat,
    MalformedOptions,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoAnswerProvided => "NoAnswerProvided",
            ErrorKind::InvalidOption => "InvalidOption",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::MalformedOptions => "MalformedOptions",
        }
    }

    /// Whether asking the user again can fix the error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::NoAnswerProvided | ErrorKind::InvalidOption)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("no answer was supplied for question '{question_id}'")]
    NoAnswerProvided { question_id: String },
    #[error("the answer '{answer}' was not a valid option for question '{question_id}'")]
    InvalidOption { question_id: String, answer: String },
    #[error("question format '{0}' is not supported")]
    UnsupportedFormat(String),
    #[error("option '{segment}' of question '{question_id}' is not a key=value pair")]
    MalformedOptions { question_id: String, segment: String },
}

impl DecisionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecisionError::NoAnswerProvided { .. } => ErrorKind::NoAnswerProvided,
            DecisionError::InvalidOption { .. } => ErrorKind::InvalidOption,
            DecisionError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            DecisionError::MalformedOptions { .. } => ErrorKind::MalformedOptions,
        }
    }

    pub fn question_id(&self) -> Option<&str> {
        match self {
            DecisionError::NoAnswerProvided { question_id }
            | DecisionError::InvalidOption { question_id, .. }
            | DecisionError::MalformedOptions { question_id, .. } => Some(question_id),
            DecisionError::UnsupportedFormat(_) => None,
        }
    }

    pub fn to_validation_error(&self) -> ValidationError {
        let value = match self {
            DecisionError::InvalidOption { answer, .. } => Some(answer.clone()),
            DecisionError::UnsupportedFormat(format) => Some(format.clone()),
            DecisionError::MalformedOptions { segment, .. } => Some(segment.clone()),
            DecisionError::NoAnswerProvided { .. } => None,
        };
        ValidationError {
            question_id: self.question_id().map(str::to_string),
            value,
            message: self.to_string(),
            code: self.kind(),
        }
    }
}

/// Serializable validation failure handed back to callers for re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub message: String,
    pub code: ErrorKind,
}

/// Decision strategy selected by a question's [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    FreeForm,
    SingleChoice,
    MultiChoice,
    Acknowledge,
}

impl Strategy {
    pub fn for_format(format: Format) -> Self {
        match format {
            Format::FreeForm => Strategy::FreeForm,
            Format::SingleChoice => Strategy::SingleChoice,
            Format::MultiChoice => Strategy::MultiChoice,
            Format::Acknowledge => Strategy::Acknowledge,
        }
    }

    /// Validates the question's raw answers and returns its decision.
    ///
    /// Multi-choice questions have no scalar decision; their raw answers are the record.
    pub fn apply(&self, question: &Question) -> Result<Option<String>, DecisionError> {
        match self {
            Strategy::FreeForm => Ok(Some(free_form(question))),
            Strategy::SingleChoice => single_choice(question).map(Some),
            Strategy::MultiChoice => multi_choice(question).map(|()| None),
            Strategy::Acknowledge => Ok(Some(AFFIRMATIVE.to_string())),
        }
    }
}

/// Runs the strategy for `question` and stores the outcome.
///
/// On failure the decision is left unset.
pub fn decide(question: &mut Question) -> Result<Option<&str>, DecisionError> {
    match Strategy::for_format(question.format).apply(question) {
        Ok(decision) => {
            question.decision = decision;
            Ok(question.decision.as_deref())
        }
        Err(err) => {
            question.decision = None;
            Err(err)
        }
    }
}

fn free_form(question: &Question) -> String {
    question
        .answers
        .first()
        .map(|answer| answer.trim().to_string())
        .unwrap_or_default()
}

fn single_choice(question: &Question) -> Result<String, DecisionError> {
    let choices = options::parse_choices(&question.options)
        .map_err(|segment| malformed(question, segment))?;

    let answer = question
        .answers
        .first()
        .map(|answer| answer.trim())
        .unwrap_or_default();
    if answer.is_empty() {
        return Err(no_answer(question));
    }

    let wanted = answer.to_lowercase();
    choices
        .into_iter()
        .rfind(|choice| choice.key.to_lowercase() == wanted)
        .map(|choice| choice.value)
        .ok_or_else(|| invalid(question, answer))
}

fn multi_choice(question: &Question) -> Result<(), DecisionError> {
    let groups = options::parse_groups(&question.options)
        .map_err(|segment| malformed(question, segment))?;

    if question.answers.is_empty() {
        return Err(no_answer(question));
    }

    for answer in &question.answers {
        if answer.trim().is_empty() {
            return Err(no_answer(question));
        }
        let (group, item) =
            options::split_composite(answer).ok_or_else(|| invalid(question, answer))?;
        let declared = groups
            .iter()
            .find(|candidate| candidate.name == group)
            .ok_or_else(|| invalid(question, answer))?;
        if !declared.allows(item) {
            return Err(invalid(question, answer));
        }
    }
    Ok(())
}

fn no_answer(question: &Question) -> DecisionError {
    DecisionError::NoAnswerProvided {
        question_id: question.id.clone(),
    }
}

fn invalid(question: &Question, answer: &str) -> DecisionError {
    DecisionError::InvalidOption {
        question_id: question.id.clone(),
        answer: answer.to_string(),
    }
}

fn malformed(question: &Question, MalformedSegment(segment): MalformedSegment) -> DecisionError {
    DecisionError::MalformedOptions {
        question_id: question.id.clone(),
        segment,
    }
}
