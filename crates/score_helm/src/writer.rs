//! Helm values output.

use std::io::Write;

use serde_json::Value;
use tracing::debug;

use crate::error::HelmResult;
use crate::values::HelmValues;

/// Writer for Helm values files.
pub struct ValuesWriter;

impl ValuesWriter {
    /// Convert values into a generic tree. Mapping keys come out sorted.
    pub fn to_document(values: &HelmValues) -> HelmResult<Value> {
        Ok(serde_json::to_value(values)?)
    }

    /// Render values as YAML with sorted keys and 2-space indentation.
    pub fn to_yaml_string(values: &HelmValues) -> HelmResult<String> {
        let document = Self::to_document(values)?;
        Ok(serde_yaml::to_string(&document)?)
    }

    /// Write values as YAML.
    pub fn write_yaml<W: Write>(mut writer: W, values: &HelmValues) -> HelmResult<()> {
        let content = Self::to_yaml_string(values)?;
        debug!("Writing {} bytes of Helm values", content.len());

        writer.write_all(content.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
