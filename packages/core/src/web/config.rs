/// Configuration for request resolution and address building
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a `HostConfig`
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Extensions must start with a dot, e.g. `.aspx`
    #[error("Invalid extension '{0}': must start with '.'")]
    InvalidExtension(String),

    #[error("default_document cannot be empty")]
    EmptyDefaultDocument,

    #[error("Failed to parse host configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read host configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings of the site served from a content tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    /// Extensions handled by the resolver (compared case-insensitively)
    pub observed_extensions: Vec<String>,

    /// Also handle paths without an extension
    pub observe_empty_extension: bool,

    /// Extension appended to friendly page addresses (may be empty)
    pub default_extension: String,

    /// Document name that addresses the start page, e.g. `/default.aspx`
    pub default_document: String,

    /// Id of the node paths are resolved from (first root when unset)
    pub root_id: Option<i64>,

    /// Id of the node served for `/` (root when unset)
    pub start_page_id: Option<i64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            observed_extensions: vec![".aspx".to_string()],
            observe_empty_extension: false,
            default_extension: ".aspx".to_string(),
            default_document: "default.aspx".to_string(),
            root_id: None,
            start_page_id: None,
        }
    }
}

impl HostConfig {
    /// Parse a JSON document, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_observed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.observed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn observing_empty_extension(mut self, observe: bool) -> Self {
        self.observe_empty_extension = observe;
        self
    }

    /// Whether requests with this extension (including its dot) are resolved
    pub fn is_observed(&self, extension: &str) -> bool {
        if extension.is_empty() {
            return self.observe_empty_extension;
        }
        self.observed_extensions
            .iter()
            .any(|observed| observed.eq_ignore_ascii_case(extension))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for extension in &self.observed_extensions {
            if !extension.starts_with('.') || extension.len() < 2 {
                return Err(ConfigError::InvalidExtension(extension.clone()));
            }
        }

        if !self.default_extension.is_empty() && !self.default_extension.starts_with('.') {
            return Err(ConfigError::InvalidExtension(self.default_extension.clone()));
        }

        if self.default_document.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultDocument);
        }

        Ok(())
    }
}
