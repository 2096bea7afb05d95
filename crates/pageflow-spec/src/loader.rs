use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::services::UnsupportedService;
use crate::spec::{Condition, SummaryDefinition};

pub const PAGEFLOW_PREFIX: &str = "pageflow";
pub const JSON_SUFFIX: &str = ".json";

/// `<conditionId>-<service>.json`
pub fn summary_resource_name(condition_id: &str, service: &str) -> String {
    format!("{condition_id}-{service}{JSON_SUFFIX}")
}

/// `pageflow-<service>.json`
pub fn conditions_resource_name(service: &str) -> String {
    format!("{PAGEFLOW_PREFIX}-{service}{JSON_SUFFIX}")
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("resource {} was not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read resource {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse resource {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("condition '{condition_id}' is not available for service '{service}'")]
    UnknownCondition {
        condition_id: String,
        service: String,
    },
    #[error(transparent)]
    Service(#[from] UnsupportedService),
}

/// Resolves the summary definition for a condition and service.
pub trait SummaryLoader {
    fn load_summary(
        &self,
        condition_id: &str,
        service: &str,
    ) -> Result<Cow<'_, SummaryDefinition>, LoadError>;
}

/// Resolves the conditions offered by a service.
pub trait ConditionLoader {
    fn load_conditions(&self, service: &str) -> Result<Vec<Condition>, LoadError>;
}

#[derive(Debug, Deserialize)]
struct ConditionCatalogue {
    #[serde(default)]
    conditions: Vec<Condition>,
}

/// Reads page-flow resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, LoadError> {
        let path = self.root.join(name);
        debug!(resource = %path.display(), "load resource");
        let contents = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound { path: path.clone() }
            } else {
                LoadError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&contents).map_err(|source| LoadError::Parse { path, source })
    }
}

impl SummaryLoader for DirectoryLoader {
    fn load_summary(
        &self,
        condition_id: &str,
        service: &str,
    ) -> Result<Cow<'_, SummaryDefinition>, LoadError> {
        let summary: SummaryDefinition =
            self.read_json(&summary_resource_name(condition_id, service))?;
        debug!(questions = summary.questions.len(), "resource loaded");
        Ok(Cow::Owned(summary))
    }
}

impl ConditionLoader for DirectoryLoader {
    fn load_conditions(&self, service: &str) -> Result<Vec<Condition>, LoadError> {
        let catalogue: ConditionCatalogue = self.read_json(&conditions_resource_name(service))?;
        debug!(
            conditions = catalogue.conditions.len(),
            service, "conditions loaded"
        );
        Ok(catalogue.conditions)
    }
}
