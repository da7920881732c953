//! Configuration errors.
//!
//! Validation failures are rendered one per field, each with the rejected
//! value, e.g. `element_size: element size must be larger than 16 bytes (got 8)`.

use std::path::PathBuf;

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `--config` file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// A setting is well-formed but breaks a benchmark precondition.
    #[error("Invalid configuration: {}", describe(.0))]
    Validation(#[source] ValidationErrors),

    /// A setting is missing, malformed or unknown.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

/// Field problems sorted by field name, joined with `; `.
fn describe(errors: &ValidationErrors) -> String {
    let mut problems = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            problems.push(describe_field(&field, error));
        }
    }
    problems.sort();
    problems.join("; ")
}

fn describe_field(field: &str, error: &ValidationError) -> String {
    let reason = match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    };
    match error.params.get("value") {
        Some(value) => format!("{field}: {reason} (got {value})"),
        None => format!("{field}: {reason}"),
    }
}
