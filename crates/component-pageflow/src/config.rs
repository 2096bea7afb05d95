use std::env;
use std::path::PathBuf;

use pageflow_spec::SummaryStyle;
use serde::{Deserialize, Serialize};

pub const RESOURCE_DIR_ENV: &str = "PAGEFLOW_RESOURCE_DIR";
pub const DEFAULT_RESOURCE_DIR: &str = "resources";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Runtime settings; every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageflowConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_off: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
}

impl PageflowConfig {
    pub fn from_json(config_json: &str) -> Result<Self, serde_json::Error> {
        if config_json.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_json::from_str(config_json)
        }
    }

    /// Configured directory, then `PAGEFLOW_RESOURCE_DIR`, then `./resources`.
    pub fn resource_dir(&self) -> PathBuf {
        self.resource_dir
            .clone()
            .or_else(|| env::var_os(RESOURCE_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_DIR))
    }

    pub fn style(&self) -> SummaryStyle {
        let defaults = SummaryStyle::default();
        SummaryStyle {
            bold_on: self.bold_on.clone().unwrap_or(defaults.bold_on),
            bold_off: self.bold_off.clone().unwrap_or(defaults.bold_off),
        }
    }

    pub fn language(&self) -> &str {
        self.default_language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }
}
