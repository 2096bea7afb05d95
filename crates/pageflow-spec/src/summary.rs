use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decision::AFFIRMATIVE;
use crate::loader::{LoadError, SummaryLoader};
use crate::options;
use crate::services::{UnsupportedService, check_service_supported};
use crate::spec::{DisplayLine, DisplayType, Form, Question, SummaryDefinition};

pub const BOLD_ON: &str = "<b>";
pub const BOLD_OFF: &str = "</b>";

/// Markers wrapped around checkbox group headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStyle {
    pub bold_on: String,
    pub bold_off: String,
}

impl Default for SummaryStyle {
    fn default() -> Self {
        Self {
            bold_on: BOLD_ON.to_string(),
            bold_off: BOLD_OFF.to_string(),
        }
    }
}

impl SummaryStyle {
    pub fn bold(&self, text: &str) -> String {
        format!("{}{}{}", self.bold_on, text, self.bold_off)
    }
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    UnsupportedService(#[from] UnsupportedService),
    #[error("summary definition unavailable: {0}")]
    Load(#[from] LoadError),
}

/// Builds the end-of-flow summary for a form.
#[derive(Debug)]
pub struct SummaryAggregator<'a, L: ?Sized> {
    loader: &'a L,
    style: SummaryStyle,
}

impl<'a, L> SummaryAggregator<'a, L>
where
    L: SummaryLoader + ?Sized,
{
    pub fn new(loader: &'a L) -> Self {
        Self {
            loader,
            style: SummaryStyle::default(),
        }
    }

    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }

    /// Fails before any rendering when the service is unsupported or the
    /// summary definition cannot be resolved.
    pub fn process(&self, form: &Form) -> Result<Vec<DisplayLine>, SummaryError> {
        let header = &form.header;
        check_service_supported(&header.service)?;
        let summary = self
            .loader
            .load_summary(&form.condition.id, &header.service)?;
        Ok(summarize(form, &summary, &self.style))
    }
}

/// Replays the breadcrumb trail and renders every answered, summary-flagged question.
pub fn summarize(
    form: &Form,
    summary: &SummaryDefinition,
    style: &SummaryStyle,
) -> Vec<DisplayLine> {
    let header = &form.header;
    debug!(breadcrumb = ?header.breadcrumb, "building summary");

    let mut response = Vec::new();
    for step in &header.breadcrumb {
        debug!(step = %step, "breadcrumb");
        for question in form
            .condition
            .questions_on_step(step)
            .filter(|question| question.summary && question.is_answered())
        {
            debug!(
                question = %question.id,
                answers = ?question.answers,
                "summarise question"
            );
            response.extend(render(question, summary, &header.language, style));
        }
    }
    response
}

fn render(
    question: &Question,
    summary: &SummaryDefinition,
    language: &str,
    style: &SummaryStyle,
) -> Option<DisplayLine> {
    let line = match question.display_type {
        DisplayType::Radio => render_radio(question, summary, language),
        DisplayType::Checkbox => render_checkbox(question, summary, language, style),
        DisplayType::Form => Some(render_form(question)),
        DisplayType::Continue => render_continue(question, summary, language),
    };
    if line.is_none() {
        debug!(question = %question.id, language, "no summary text");
    }
    line
}

fn display_line(question: &Question, lines: Vec<String>) -> DisplayLine {
    DisplayLine {
        display_type: question.display_type,
        sub_heading: question.text.clone(),
        lines,
        link: question.id.clone(),
    }
}

fn render_radio(
    question: &Question,
    summary: &SummaryDefinition,
    language: &str,
) -> Option<DisplayLine> {
    let catalogue = summary.catalogue(&question.id)?;
    let answer = question.answers.first()?;
    let text = catalogue.localized(answer, language)?;
    Some(display_line(question, vec![text.to_string()]))
}

fn render_checkbox(
    question: &Question,
    summary: &SummaryDefinition,
    language: &str,
    style: &SummaryStyle,
) -> Option<DisplayLine> {
    let catalogue = summary.catalogue(&question.id)?;

    let mut lines = Vec::new();
    let mut heading: Option<&str> = None;
    for value in &question.answers {
        let group = options::group_of(value);
        if heading != Some(group) {
            lines.push(style.bold(group));
            heading = Some(group);
        }
        if let Some(text) = catalogue.localized(value, language) {
            lines.push(text.to_string());
        }
    }
    Some(display_line(question, lines))
}

fn render_form(question: &Question) -> DisplayLine {
    display_line(question, question.answers.clone())
}

fn render_continue(
    question: &Question,
    summary: &SummaryDefinition,
    language: &str,
) -> Option<DisplayLine> {
    let text = summary
        .catalogue(&question.id)?
        .localized(AFFIRMATIVE, language)?;
    Some(display_line(question, vec![text.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Condition, Format};

    fn answered(
        id: &str,
        format: Format,
        display_type: DisplayType,
        step: &str,
        answers: &[&str],
    ) -> Question {
        let mut question = Question::new(id, format, display_type, step, format!("{id}?"))
            .with_summary(true);
        question.answer(answers.iter().copied());
        question
    }

    fn form(questions: Vec<Question>, breadcrumb: &[&str]) -> Form {
        Form::new("notify", "en", Condition::new("diabetes", questions))
            .with_breadcrumb(breadcrumb.iter().copied())
    }

    #[test]
    fn radio_renders_localized_answer() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("insulin", "yes", "en", "Yes, I have.");
        let form = form(
            vec![answered(
                "insulin",
                Format::SingleChoice,
                DisplayType::Radio,
                "s1",
                &["yes"],
            )],
            &["s1"],
        );

        let lines = summarize(&form, &summary, &SummaryStyle::default());
        assert_eq!(
            lines,
            vec![DisplayLine {
                display_type: DisplayType::Radio,
                sub_heading: "insulin?".into(),
                lines: vec!["Yes, I have.".into()],
                link: "insulin".into(),
            }]
        );
    }

    #[test]
    fn radio_missing_language_is_skipped() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("insulin", "yes", "cy", "Oes.");
        let form = form(
            vec![answered(
                "insulin",
                Format::SingleChoice,
                DisplayType::Radio,
                "s1",
                &["yes"],
            )],
            &["s1"],
        );
        assert!(summarize(&form, &summary, &SummaryStyle::default()).is_empty());
    }

    #[test]
    fn checkbox_emits_heading_per_group_change() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("treatments", "Medication-A", "en", "Insulin");
        summary.insert_text("treatments", "Medication-B", "en", "Tablets");
        summary.insert_text("treatments", "Treatment-C", "en", "Diet");
        let form = form(
            vec![answered(
                "treatments",
                Format::MultiChoice,
                DisplayType::Checkbox,
                "s1",
                &["Medication-A", "Medication-B", "Treatment-C"],
            )],
            &["s1"],
        );

        let lines = summarize(&form, &summary, &SummaryStyle::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].lines,
            vec![
                "<b>Medication</b>",
                "Insulin",
                "Tablets",
                "<b>Treatment</b>",
                "Diet"
            ]
        );
        assert_eq!(lines[0].link, "treatments");
    }

    #[test]
    fn checkbox_uses_configured_markers_and_skips_unknown_items() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("treatments", "Medication-A", "en", "Insulin");
        let form = form(
            vec![answered(
                "treatments",
                Format::MultiChoice,
                DisplayType::Checkbox,
                "s1",
                &["Medication-A", "Medication-Z"],
            )],
            &["s1"],
        );
        let style = SummaryStyle {
            bold_on: "**".into(),
            bold_off: "**".into(),
        };

        let lines = summarize(&form, &summary, &style);
        assert_eq!(lines[0].lines, vec!["**Medication**", "Insulin"]);
    }

    #[test]
    fn form_answers_are_verbatim_without_definition() {
        let form = form(
            vec![answered(
                "details",
                Format::FreeForm,
                DisplayType::Form,
                "s1",
                &["Dr Jones", "  12 High St "],
            )],
            &["s1"],
        );
        let lines = summarize(&form, &SummaryDefinition::default(), &SummaryStyle::default());
        assert_eq!(lines[0].lines, vec!["Dr Jones", "  12 High St "]);
        assert_eq!(lines[0].display_type, DisplayType::Form);
    }

    #[test]
    fn continue_ignores_raw_answer() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("confirm", AFFIRMATIVE, "en", "I confirm.");
        let form = form(
            vec![answered(
                "confirm",
                Format::Acknowledge,
                DisplayType::Continue,
                "s1",
                &["whatever"],
            )],
            &["s1"],
        );
        let lines = summarize(&form, &summary, &SummaryStyle::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].lines, vec!["I confirm."]);
    }

    #[test]
    fn continue_without_affirmative_text_is_skipped() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("confirm", "no", "en", "No.");
        let form = form(
            vec![answered(
                "confirm",
                Format::Acknowledge,
                DisplayType::Continue,
                "s1",
                &["yes"],
            )],
            &["s1"],
        );
        assert!(summarize(&form, &summary, &SummaryStyle::default()).is_empty());
    }

    #[test]
    fn revisited_step_is_replayed_literally() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("insulin", "yes", "en", "Yes, I have.");
        let form = form(
            vec![
                answered(
                    "insulin",
                    Format::SingleChoice,
                    DisplayType::Radio,
                    "s1",
                    &["yes"],
                ),
                answered("gp", Format::FreeForm, DisplayType::Form, "s2", &["Dr Jones"]),
            ],
            &["s1", "s2", "s1"],
        );

        let lines = summarize(&form, &summary, &SummaryStyle::default());
        let links: Vec<_> = lines.iter().map(|line| line.link.as_str()).collect();
        assert_eq!(links, vec!["insulin", "gp", "insulin"]);
        assert_eq!(lines[0], lines[2]);
    }

    #[test]
    fn questions_sharing_a_step_keep_declaration_order() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("zeta", "yes", "en", "Zeta");
        summary.insert_text("alpha", "yes", "en", "Alpha");
        let form = form(
            vec![
                answered("zeta", Format::SingleChoice, DisplayType::Radio, "s1", &["yes"]),
                answered("gp", Format::FreeForm, DisplayType::Form, "s2", &["Dr Jones"]),
                answered("alpha", Format::SingleChoice, DisplayType::Radio, "s1", &["yes"]),
            ],
            &["s2", "s1"],
        );

        let lines = summarize(&form, &summary, &SummaryStyle::default());
        let links: Vec<_> = lines.iter().map(|line| line.link.as_str()).collect();
        assert_eq!(links, vec!["gp", "zeta", "alpha"]);
        assert_eq!(lines[1].lines, vec!["Zeta"]);
        assert_eq!(lines[2].lines, vec!["Alpha"]);
    }

    #[test]
    fn unflagged_and_unanswered_questions_are_skipped() {
        let mut summary = SummaryDefinition::default();
        summary.insert_text("a", "yes", "en", "A");
        summary.insert_text("b", "yes", "en", "B");
        let unflagged = answered("a", Format::SingleChoice, DisplayType::Radio, "s1", &["yes"])
            .with_summary(false);
        let unanswered = answered("b", Format::SingleChoice, DisplayType::Radio, "s1", &[]);
        let form = form(vec![unflagged, unanswered], &["s1"]);
        assert!(summarize(&form, &summary, &SummaryStyle::default()).is_empty());
    }

    #[test]
    fn unsupported_service_fails_before_loading() {
        let mut form = form(vec![], &[]);
        form.header.service = "renew".into();
        let cache = crate::cache::PageFlowCache::new();
        let err = SummaryAggregator::new(&cache).process(&form).unwrap_err();
        assert!(matches!(err, SummaryError::UnsupportedService(_)));
    }

    #[test]
    fn unresolvable_definition_is_load_error() {
        let form = form(vec![], &[]);
        let cache = crate::cache::PageFlowCache::new();
        let err = SummaryAggregator::new(&cache).process(&form).unwrap_err();
        assert!(matches!(err, SummaryError::Load(LoadError::NotFound { .. })));
    }
}
