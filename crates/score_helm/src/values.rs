//! Helm values document model.
//!
//! Optional fields are skipped entirely when unset, so the serialized
//! document never carries nulls or empty collections.

use std::collections::BTreeMap;

use serde::Serialize;

/// Root Helm values document.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HelmValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceValues>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub containers: BTreeMap<String, ContainerValues>,
}

/// Kubernetes service values.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceValues {
    #[serde(rename = "type")]
    pub service_type: String,
    pub ports: Vec<PortValues>,
}

/// A single service port.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PortValues {
    pub name: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<u16>,
}

/// Values for a single container.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerValues {
    pub image: ImageValues,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVarValues>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMountValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<ProbeValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<ProbeValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesValues>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImageValues {
    pub name: String,
}

/// An environment variable.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvVarValues {
    pub name: String,
    pub value: String,
}

/// A volume mount.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMountValues {
    pub name: String,
    pub mount_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

/// An HTTP probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeValues {
    #[serde(rename = "type")]
    pub probe_type: String,
    pub path: String,
    pub port: u16,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub http_headers: BTreeMap<String, String>,
}

/// Container resource limits and requests.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ResourcesValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<QuantityValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<QuantityValues>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct QuantityValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}
