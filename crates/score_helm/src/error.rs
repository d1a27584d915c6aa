//! Error types for Helm values conversion.

use thiserror::Error;

/// Result type alias for conversion operations.
pub type HelmResult<T> = Result<T, HelmError>;

/// Errors raised while building a reference context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Ambiguous reference '{0}': more than one declared field resolves to it")]
    AmbiguousReference(String),

    #[error("Unsupported value for '{reference}': {kind} values can not be rendered as text")]
    UnsupportedValue {
        reference: String,
        kind: &'static str,
    },
}

/// Errors that can occur while converting a workload or writing Helm values.
#[derive(Error, Debug)]
pub enum HelmError {
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ContextError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
