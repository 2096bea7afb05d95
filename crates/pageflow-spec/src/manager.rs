use thiserror::Error;

use crate::cache::PageFlowCache;
use crate::decision::{DecisionError, decide};
use crate::spec::{Condition, DisplayLine, Form, Question};
use crate::summary::{SummaryAggregator, SummaryError, SummaryStyle};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("question '{question_id}' is not part of condition '{condition_id}'")]
    UnknownQuestion {
        question_id: String,
        condition_id: String,
    },
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

/// Session facade over a [`Form`] and the shared [`PageFlowCache`].
pub struct PageFlowManager<'a> {
    form: &'a mut Form,
    cache: &'a PageFlowCache,
    style: SummaryStyle,
}

impl<'a> PageFlowManager<'a> {
    pub fn new(form: &'a mut Form, cache: &'a PageFlowCache) -> Self {
        Self {
            form,
            cache,
            style: SummaryStyle::default(),
        }
    }

    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }

    pub fn form(&self) -> &Form {
        self.form
    }

    /// Conditions offered by the form's service.
    pub fn conditions(&self) -> &'a [Condition] {
        self.cache.conditions(&self.form.header.service)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.form.condition.question(id)
    }

    /// Stores the raw answers for `question_id` and computes its decision.
    ///
    /// A rejected answer leaves the question exactly as it was.
    ///
    /// The question's step joins the breadcrumb trail once the answer is accepted,
    /// unless it is already the most recent entry.
    pub fn submit<I, S>(
        &mut self,
        question_id: &str,
        answers: I,
    ) -> Result<Option<String>, SubmitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(question) = self.form.condition.question_mut(question_id) else {
            return Err(SubmitError::UnknownQuestion {
                question_id: question_id.to_string(),
                condition_id: self.form.condition.id.clone(),
            });
        };
        let mut candidate = question.clone();
        candidate.answer(answers);
        let decision = decide(&mut candidate)?.map(str::to_string);
        let step = candidate.step.clone();
        *question = candidate;

        let header = &mut self.form.header;
        if header.breadcrumb.last() != Some(&step) {
            header.visit(step);
        }
        Ok(decision)
    }

    pub fn transform(&self) -> Result<Vec<DisplayLine>, SummaryError> {
        SummaryAggregator::new(self.cache)
            .with_style(self.style.clone())
            .process(self.form)
    }
}
