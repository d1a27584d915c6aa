//! Error types for Score workload handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that can occur while loading, overriding or validating a workload spec.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Spec file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid spec format in file {path}: {message}")]
    InvalidFormat { path: PathBuf, message: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid property path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("Spec validation failed: {0}")]
    ValidationFailed(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Decoding workload spec failed: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
