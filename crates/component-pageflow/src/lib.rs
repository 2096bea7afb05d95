pub mod config;

use pageflow_spec::{
    DirectoryLoader, Form, LoadError, PageFlowCache, PageFlowManager, SubmitError, SummaryError,
    check_service_supported,
};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

pub use config::PageflowConfig;

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("failed to parse form: {0}")]
    FormParse(#[source] serde_json::Error),
    #[error("failed to parse answers: {0}")]
    AnswersParse(#[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error("condition '{0}' is not available")]
    ConditionUnavailable(String),
    #[error("question '{0}' is not available")]
    QuestionUnavailable(String),
    #[error("question is misconfigured: {0}")]
    Misconfigured(#[source] pageflow_spec::DecisionError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Answers arrive either as a single string or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAnswers {
    One(String),
    Many(Vec<String>),
}

impl RawAnswers {
    fn into_vec(self) -> Vec<String> {
        match self {
            RawAnswers::One(answer) => vec![answer],
            RawAnswers::Many(answers) => answers,
        }
    }
}

pub fn map_string_to_form(form_json: &str) -> Result<Form, ComponentError> {
    serde_json::from_str(form_json).map_err(ComponentError::FormParse)
}

pub fn map_form_to_string(form: &Form) -> Result<String, ComponentError> {
    serde_json::to_string(form).map_err(ComponentError::JsonEncode)
}

fn load_config(config_json: &str) -> Result<PageflowConfig, ComponentError> {
    PageflowConfig::from_json(config_json).map_err(ComponentError::ConfigParse)
}

fn load_cache(config: &PageflowConfig, service: &str) -> Result<PageFlowCache, ComponentError> {
    check_service_supported(service).map_err(LoadError::from)?;
    let loader = DirectoryLoader::new(config.resource_dir());
    Ok(PageFlowCache::load(&loader, &[service])?)
}

fn ensure_condition(cache: &PageFlowCache, form: &Form) -> Result<(), ComponentError> {
    cache
        .condition(&form.header.service, &form.condition.id)
        .map(|_| ())
        .ok_or_else(|| ComponentError::ConditionUnavailable(form.condition.id.clone()))
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => {
            error!(error = %err, "page-flow request failed");
            json!({ "error": err.to_string() }).to_string()
        }
    }
}

pub fn list_conditions(config_json: &str, service: &str) -> String {
    respond(load_config(config_json).and_then(|config| {
        let cache = load_cache(&config, service)?;
        let conditions = cache
            .conditions(service)
            .iter()
            .map(|condition| condition.id.clone())
            .collect::<Vec<_>>();
        Ok(json!({ "service": service, "conditions": conditions }))
    }))
}

/// Starts a session; `language` falls back to the configured default.
pub fn new_form(
    config_json: &str,
    service: &str,
    condition_id: &str,
    language: Option<&str>,
) -> String {
    respond(load_config(config_json).and_then(|config| {
        let cache = load_cache(&config, service)?;
        let language = language.unwrap_or(config.language());
        let form = cache
            .create_form(service, condition_id, language)
            .map_err(|err| match err {
                LoadError::UnknownCondition { condition_id, .. } => {
                    ComponentError::ConditionUnavailable(condition_id)
                }
                other => ComponentError::Load(other),
            })?;
        serde_json::to_value(form).map_err(ComponentError::JsonEncode)
    }))
}

pub fn describe_question(form_json: &str, question_id: &str) -> String {
    respond(map_string_to_form(form_json).and_then(|form| {
        let question = form
            .condition
            .question(question_id)
            .ok_or_else(|| ComponentError::QuestionUnavailable(question_id.to_string()))?;
        serde_json::to_value(question).map_err(ComponentError::JsonEncode)
    }))
}

/// Records an answer and returns either the decision with the updated form or
/// the validation error to re-prompt with.
pub fn submit_answer(
    config_json: &str,
    form_json: &str,
    question_id: &str,
    answers_json: &str,
) -> String {
    respond(load_config(config_json).and_then(|config| {
        let mut form = map_string_to_form(form_json)?;
        let answers: RawAnswers =
            serde_json::from_str(answers_json).map_err(ComponentError::AnswersParse)?;
        let cache = load_cache(&config, &form.header.service)?;
        ensure_condition(&cache, &form)?;

        let outcome =
            PageFlowManager::new(&mut form, &cache).submit(question_id, answers.into_vec());
        match outcome {
            Ok(decision) => Ok(json!({
                "status": "ok",
                "decision": decision,
                "form": serde_json::to_value(&form).map_err(ComponentError::JsonEncode)?,
            })),
            Err(SubmitError::UnknownQuestion { question_id, .. }) => {
                Err(ComponentError::QuestionUnavailable(question_id))
            }
            Err(SubmitError::Decision(err)) if err.kind().is_recoverable() => {
                let validation = serde_json::to_value(err.to_validation_error())
                    .map_err(ComponentError::JsonEncode)?;
                Ok(json!({
                    "status": "error",
                    "validation": validation,
                    "form": serde_json::to_value(&form).map_err(ComponentError::JsonEncode)?,
                }))
            }
            Err(SubmitError::Decision(err)) => Err(ComponentError::Misconfigured(err)),
        }
    }))
}

pub fn build_summary(config_json: &str, form_json: &str) -> String {
    respond(load_config(config_json).and_then(|config| {
        let mut form = map_string_to_form(form_json)?;
        let cache = load_cache(&config, &form.header.service)?;
        ensure_condition(&cache, &form)?;
        let lines = PageFlowManager::new(&mut form, &cache)
            .with_style(config.style())
            .transform()?;
        let lines = serde_json::to_value(lines).map_err(ComponentError::JsonEncode)?;
        Ok(json!({ "lines": lines }))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONDITIONS: &str = r#"{
        "conditions": [
            {
                "id": "diabetes",
                "questions": [
                    {
                        "id": "insulin",
                        "format": "single_choice",
                        "type": "Radio",
                        "step": "1",
                        "text": "Do you take insulin?",
                        "options": "yes=Y,no=N",
                        "summary": true
                    },
                    {
                        "id": "treatments",
                        "format": "multi_choice",
                        "type": "CheckBox",
                        "step": "2",
                        "text": "Treatments",
                        "options": "Medication=A|B,Treatment=C",
                        "summary": true
                    },
                    {
                        "id": "broken",
                        "format": "single_choice",
                        "type": "Radio",
                        "step": "3",
                        "text": "Broken",
                        "options": "yes",
                        "summary": false
                    }
                ]
            }
        ]
    }"#;

    const SUMMARY: &str = r#"{
        "questions": {
            "insulin": { "options": { "yes": { "answers": { "en": "Yes, I take insulin." } } } },
            "treatments": {
                "options": {
                    "Medication-A": { "answers": { "en": "Injections" } },
                    "Treatment-C": { "answers": { "en": "Diet" } }
                }
            }
        }
    }"#;

    fn resources() -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("pageflow-notify.json"), CONDITIONS).expect("write");
        fs::write(dir.path().join("diabetes-notify.json"), SUMMARY).expect("write");
        dir
    }

    fn config(dir: &TempDir) -> String {
        json!({ "resource_dir": dir.path(), "bold_on": "[", "bold_off": "]" }).to_string()
    }

    fn parse(payload: &str) -> Value {
        serde_json::from_str(payload).expect("json")
    }

    fn fresh_form(config: &str) -> String {
        let form = parse(&new_form(config, "notify", "diabetes", None));
        form.to_string()
    }

    #[test]
    fn list_conditions_reports_ids() {
        let dir = resources();
        let parsed = parse(&list_conditions(&config(&dir), "notify"));
        assert_eq!(parsed["conditions"], json!(["diabetes"]));
    }

    #[test]
    fn unsupported_service_is_generic_error() {
        let dir = resources();
        let parsed = parse(&list_conditions(&config(&dir), "renew"));
        assert_eq!(parsed["error"], "service 'renew' is not supported");
    }

    #[test]
    fn new_form_uses_default_language() {
        let dir = resources();
        let form = parse(&fresh_form(&config(&dir)));
        assert_eq!(form["header"]["language"], "en");
        assert_eq!(form["header"]["breadcrumb"], json!([]));
        assert_eq!(form["condition"]["id"], "diabetes");
    }

    #[test]
    fn new_form_rejects_unknown_condition() {
        let dir = resources();
        let parsed = parse(&new_form(&config(&dir), "notify", "epilepsy", Some("en")));
        assert_eq!(parsed["error"], "condition 'epilepsy' is not available");
    }

    #[test]
    fn describe_question_returns_question_json() {
        let dir = resources();
        let form = fresh_form(&config(&dir));
        let parsed = parse(&describe_question(&form, "insulin"));
        assert_eq!(parsed["format"], "single_choice");
        assert_eq!(parsed["type"], "Radio");
        let missing = parse(&describe_question(&form, "nope"));
        assert!(missing["error"].as_str().unwrap().contains("nope"));
    }

    #[test]
    fn submit_answer_returns_decision_and_form() {
        let dir = resources();
        let config = config(&dir);
        let form = fresh_form(&config);
        let parsed = parse(&submit_answer(&config, &form, "insulin", r#""Yes""#));
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["decision"], "Y");
        assert_eq!(parsed["form"]["header"]["breadcrumb"], json!(["1"]));
    }

    #[test]
    fn submit_answer_reports_validation_error() {
        let dir = resources();
        let config = config(&dir);
        let form = fresh_form(&config);
        let parsed = parse(&submit_answer(&config, &form, "insulin", r#"["maybe"]"#));
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["validation"]["code"], "InvalidOption");
        assert_eq!(parsed["validation"]["value"], "maybe");
    }

    #[test]
    fn validation_error_returns_form_with_accepted_answer() {
        let dir = resources();
        let config = config(&dir);
        let form = fresh_form(&config);
        let accepted = parse(&submit_answer(&config, &form, "insulin", r#""no""#));
        let rejected = parse(&submit_answer(
            &config,
            &accepted["form"].to_string(),
            "insulin",
            r#""maybe""#,
        ));

        assert_eq!(rejected["status"], "error");
        let question = &rejected["form"]["condition"]["questions"][0];
        assert_eq!(question["answers"], json!(["no"]));
        assert_eq!(question["decision"], "N");
    }

    #[test]
    fn misconfigured_question_is_fatal() {
        let dir = resources();
        let config = config(&dir);
        let form = fresh_form(&config);
        let parsed = parse(&submit_answer(&config, &form, "broken", r#""yes""#));
        assert!(parsed["error"].as_str().unwrap().starts_with("question is misconfigured"));
    }

    #[test]
    fn build_summary_uses_configured_markers() {
        let dir = resources();
        let config = config(&dir);
        let form = fresh_form(&config);
        let step = parse(&submit_answer(&config, &form, "insulin", r#""yes""#));
        let step = parse(&submit_answer(
            &config,
            &step["form"].to_string(),
            "treatments",
            r#"["Medication-A","Treatment-C"]"#,
        ));

        let parsed = parse(&build_summary(&config, &step["form"].to_string()));
        let lines = parsed["lines"].as_array().expect("lines");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["lines"], json!(["Yes, I take insulin."]));
        assert_eq!(lines[1]["type"], "CheckBox");
        assert_eq!(
            lines[1]["lines"],
            json!(["[Medication]", "Injections", "[Treatment]", "Diet"])
        );
    }

    #[test]
    fn form_round_trips_through_string() {
        let dir = resources();
        let form_json = fresh_form(&config(&dir));
        let form = map_string_to_form(&form_json).expect("form");
        let again = map_string_to_form(&map_form_to_string(&form).expect("encode")).expect("form");
        assert_eq!(form, again);
    }
}
