//! Schema validation of Score documents.

use std::sync::OnceLock;

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::debug;

use crate::error::{SpecError, SpecResult};

/// Embedded Score workload schema.
const SCHEMA_JSON: &str = include_str!("../schema/score-v1b1.json");

static SCHEMA: OnceLock<Result<JSONSchema, String>> = OnceLock::new();

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Turn a failed result into an error.
    pub fn into_result(self) -> SpecResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(SpecError::ValidationFailed(self.errors.join("; ")))
        }
    }
}

/// Validator for Score documents against the embedded JSON schema.
pub struct SchemaValidator {
    schema: &'static JSONSchema,
}

impl SchemaValidator {
    /// Create a validator. The schema is compiled once per process.
    pub fn new() -> SpecResult<Self> {
        let compiled = SCHEMA.get_or_init(|| {
            let schema: Value = serde_json::from_str(SCHEMA_JSON)
                .map_err(|e| format!("failed to parse schema: {}", e))?;
            JSONSchema::compile(&schema).map_err(|e| format!("failed to compile schema: {}", e))
        });

        match compiled {
            Ok(schema) => Ok(Self { schema }),
            Err(e) => Err(SpecError::Schema(e.clone())),
        }
    }

    /// Validate a generic document.
    pub fn validate(&self, document: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Err(errors) = self.schema.validate(document) {
            for error in errors {
                let location = error.instance_path.to_string();
                let location = if location.is_empty() { "/".to_string() } else { location };
                result.add_error(format!("{}: {}", location, error));
            }
        }

        if let Some(Value::Object(resources)) = document.get("resources") {
            for (name, resource) in resources {
                let declares_properties = resource
                    .get("properties")
                    .and_then(Value::as_object)
                    .is_some_and(|props| !props.is_empty());
                if !declares_properties {
                    result.add_warning(format!(
                        "Resource '{}' declares no properties; only '${{resources.{}}}' can be referenced",
                        name, name
                    ));
                }
            }
        }

        debug!(
            "Schema validation finished: {} error(s), {} warning(s)",
            result.errors.len(),
            result.warnings.len()
        );
        result
    }
}
