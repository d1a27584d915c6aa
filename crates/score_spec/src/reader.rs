//! Workload and values file reading utilities.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{SpecError, SpecResult};
use crate::models::Workload;

/// Reader for Score documents and imported values.
pub struct SpecReader;

impl SpecReader {
    /// Read a Score document from a file into a generic tree.
    pub fn read_document(path: impl AsRef<Path>) -> SpecResult<Value> {
        let path = path.as_ref();
        debug!("Reading document from {:?}", path);

        if !path.exists() {
            return Err(SpecError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse_document(&content).map_err(|e| SpecError::InvalidFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse a YAML (or JSON) document. The top level must be a mapping.
    pub fn parse_document(content: &str) -> SpecResult<Value> {
        Self::parse_mapping(content).map(Value::Object)
    }

    /// Parse a top-level mapping. Empty and null documents yield an empty mapping.
    fn parse_mapping(content: &str) -> SpecResult<Map<String, Value>> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_yaml::from_str(content)?;
        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(SpecError::InvalidDocument(format!(
                "expected a mapping at the top level, found {}",
                kind_of(&other)
            ))),
        }
    }

    /// Read an imported values file. An empty file yields an empty mapping.
    pub fn read_values(path: impl AsRef<Path>) -> SpecResult<Map<String, Value>> {
        let path = path.as_ref();
        debug!("Reading values from {:?}", path);

        if !path.exists() {
            return Err(SpecError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse_mapping(&content).map_err(|e| SpecError::InvalidFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Decode a generic document into the typed workload model.
    pub fn decode_workload(document: Value) -> SpecResult<Workload> {
        serde_json::from_value(document).map_err(|e| SpecError::Decode(e.to_string()))
    }
}

/// Human-readable name of a JSON value kind.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_requires_mapping() {
        assert!(SpecReader::parse_document("- a\n- b\n").is_err());
        assert!(SpecReader::parse_document("just a string").is_err());
        assert_eq!(
            SpecReader::parse_document("").unwrap(),
            Value::Object(Map::new())
        );
    }

    #[test]
    fn test_read_values_requires_mapping() {
        let temp = tempfile::tempdir().unwrap();

        let empty = temp.path().join("empty.yaml");
        fs::write(&empty, "").unwrap();
        assert!(SpecReader::read_values(&empty).unwrap().is_empty());

        let null = temp.path().join("null.yaml");
        fs::write(&null, "~\n").unwrap();
        assert!(SpecReader::read_values(&null).unwrap().is_empty());

        let list = temp.path().join("list.yaml");
        fs::write(&list, "- db\n- cache\n").unwrap();
        let err = SpecReader::read_values(&list).unwrap_err();
        assert!(matches!(err, SpecError::InvalidFormat { .. }));
        assert!(err.to_string().contains("found sequence"));
    }

    #[test]
    fn test_parse_json_document() {
        let doc = SpecReader::parse_document(r#"{"metadata": {"name": "x"}}"#).unwrap();
        assert_eq!(doc["metadata"]["name"], "x");
    }

    #[test]
    fn test_decode_workload_type_mismatch() {
        let doc = SpecReader::parse_document("containers:\n  main:\n    image: [1, 2]\n").unwrap();
        let err = SpecReader::decode_workload(doc).unwrap_err();
        assert!(matches!(err, SpecError::Decode(_)));
    }
}
