//! Policy document parsing
//!
//! `parse_config_file` is total: every input, including YAML that does not
//! parse at all, produces a usable [`Config`].

use crate::error::ValidationError;
use crate::model::Config;
use crate::schema::{validate_document, ROOT_PATH};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

/// Outcome of parsing a policy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseConfigFileResult {
    /// Normalized policy, the defaults when the document was rejected
    pub config: Config,

    /// Every violation, joined for display; `None` when the document is valid
    pub errors_text: Option<String>,

    /// The individual violations behind `errors_text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl ParseConfigFileResult {
    fn valid(config: Config) -> Self {
        Self {
            config,
            errors_text: None,
            errors: Vec::new(),
        }
    }

    fn invalid(errors: Vec<ValidationError>) -> Self {
        let text = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        debug!(violations = errors.len(), "Config file rejected: {}", text);

        Self {
            config: Config::default(),
            errors_text: Some(text),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors_text.is_none()
    }
}

/// Parse, validate and normalize a policy document
///
/// `None`, empty text and a document consisting only of `null` or comments
/// all mean "no settings" and yield the default policy.
pub fn parse_config_file(raw: Option<&str>) -> ParseConfigFileResult {
    let raw = raw.unwrap_or_default();
    if raw.trim().is_empty() {
        return ParseConfigFileResult::valid(Config::default());
    }

    let document: Value = match serde_yaml::from_str(raw) {
        Ok(document) => document,
        Err(e) => {
            return ParseConfigFileResult::invalid(vec![ValidationError::new(
                ROOT_PATH,
                format!("is not valid YAML: {}", e),
            )])
        }
    };

    if document.is_null() {
        return ParseConfigFileResult::valid(Config::default());
    }

    let errors = validate_document(&document);
    if !errors.is_empty() {
        return ParseConfigFileResult::invalid(errors);
    }

    match serde_yaml::from_value::<Config>(document) {
        Ok(config) => ParseConfigFileResult::valid(config),
        Err(e) => ParseConfigFileResult::invalid(vec![ValidationError::new(
            ROOT_PATH,
            format!("could not be read: {}", e),
        )]),
    }
}
