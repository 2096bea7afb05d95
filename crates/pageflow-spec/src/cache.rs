use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::loader::{ConditionLoader, LoadError, SummaryLoader, summary_resource_name};
use crate::services::check_service_supported;
use crate::spec::{Condition, Form, SummaryDefinition};

/// Loaded conditions and summary definitions, read-only once built.
///
/// Callers build one cache and share references to it; forms handed out by
/// [`PageFlowCache::create_form`] own a copy of their condition.
#[derive(Debug, Clone, Default)]
pub struct PageFlowCache {
    conditions: BTreeMap<String, Vec<Condition>>,
    summaries: BTreeMap<(String, String), SummaryDefinition>,
}

impl PageFlowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every condition of each service together with any summary definitions present.
    pub fn load<L>(loader: &L, services: &[&str]) -> Result<Self, LoadError>
    where
        L: ConditionLoader + SummaryLoader,
    {
        let mut cache = Self::new();
        for service in services {
            check_service_supported(service)?;
            let conditions = loader.load_conditions(service)?;
            for condition in &conditions {
                let duplicates = condition.check_integrity();
                if !duplicates.is_empty() {
                    warn!(condition = %condition.id, ?duplicates, "duplicate question ids");
                }
                match loader.load_summary(&condition.id, service) {
                    Ok(summary) => {
                        cache.summaries.insert(
                            (condition.id.clone(), service.to_string()),
                            summary.into_owned(),
                        );
                    }
                    Err(LoadError::NotFound { path }) => {
                        debug!(resource = %path.display(), "no summary definition");
                    }
                    Err(err) => return Err(err),
                }
            }
            cache.conditions.insert(service.to_string(), conditions);
        }
        Ok(cache)
    }

    pub fn with_conditions(
        mut self,
        service: impl Into<String>,
        conditions: Vec<Condition>,
    ) -> Self {
        self.conditions.insert(service.into(), conditions);
        self
    }

    pub fn with_summary(
        mut self,
        condition_id: impl Into<String>,
        service: impl Into<String>,
        summary: SummaryDefinition,
    ) -> Self {
        self.summaries
            .insert((condition_id.into(), service.into()), summary);
        self
    }

    pub fn conditions(&self, service: &str) -> &[Condition] {
        self.conditions
            .get(service)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn condition(&self, service: &str, condition_id: &str) -> Option<&Condition> {
        self.conditions(service)
            .iter()
            .find(|condition| condition.id == condition_id)
    }

    /// Starts a session for `condition_id` with a private copy of its questions.
    pub fn create_form(
        &self,
        service: &str,
        condition_id: &str,
        language: &str,
    ) -> Result<Form, LoadError> {
        check_service_supported(service)?;
        let condition =
            self.condition(service, condition_id)
                .ok_or_else(|| LoadError::UnknownCondition {
                    condition_id: condition_id.to_string(),
                    service: service.to_string(),
                })?;
        Ok(Form::new(service, language, condition.clone()))
    }
}

impl SummaryLoader for PageFlowCache {
    fn load_summary(
        &self,
        condition_id: &str,
        service: &str,
    ) -> Result<Cow<'_, SummaryDefinition>, LoadError> {
        self.summaries
            .get(&(condition_id.to_string(), service.to_string()))
            .map(Cow::Borrowed)
            .ok_or_else(|| LoadError::NotFound {
                path: PathBuf::from(summary_resource_name(condition_id, service)),
            })
    }
}
