//! Score workload to Helm values conversion.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, info};

use score_spec::{
    ContainerProbeSpec, ContainerSpec, ResourceQuantities, ResourceRequirementsSpec, ServiceSpec,
    Workload,
};

use crate::context::ReferenceContext;
use crate::error::HelmResult;
use crate::values::{
    ContainerValues, EnvVarValues, HelmValues, ImageValues, PortValues, ProbeValues,
    QuantityValues, ResourcesValues, ServiceValues, VolumeMountValues,
};

/// Convert a validated workload into Helm values.
///
/// `values` holds imported resource property values, keyed by resource name.
pub fn convert(workload: &Workload, values: &Map<String, Value>) -> HelmResult<HelmValues> {
    info!("Converting workload '{}'", workload.metadata.name);

    let context = ReferenceContext::build(&workload.metadata, &workload.resources, values)?;

    let service = workload.service.as_ref().and_then(convert_service);

    let containers = workload
        .containers
        .iter()
        .map(|(name, spec)| {
            debug!("Converting container '{}'", name);
            (name.clone(), convert_container(&context, spec))
        })
        .collect();

    Ok(HelmValues {
        service,
        containers,
    })
}

/// Ports come out sorted by name since `ports` is an ordered map.
fn convert_service(service: &ServiceSpec) -> Option<ServiceValues> {
    if service.ports.is_empty() {
        return None;
    }

    let ports = service
        .ports
        .iter()
        .map(|(name, port)| PortValues {
            name: name.clone(),
            port: port.port,
            protocol: port.protocol.map(|p| p.as_str().to_string()),
            target_port: port.target_port.filter(|p| *p > 0),
        })
        .collect();

    Some(ServiceValues {
        service_type: "ClusterIP".to_string(),
        ports,
    })
}

fn convert_container(context: &ReferenceContext, spec: &ContainerSpec) -> ContainerValues {
    // Sorted by variable name, same as ports.
    let env = spec
        .variables
        .iter()
        .map(|(name, value)| EnvVarValues {
            name: name.clone(),
            value: context.substitute(value),
        })
        .collect();

    // Mount order is kept as declared.
    let volume_mounts = spec
        .volumes
        .iter()
        .map(|volume| VolumeMountValues {
            name: context.substitute(&volume.source),
            mount_path: volume.target.clone(),
            sub_path: volume.path.clone().filter(|p| !p.is_empty()),
            read_only: volume.read_only,
        })
        .collect();

    ContainerValues {
        image: ImageValues {
            name: spec.image.clone(),
        },
        command: spec.command.clone(),
        args: spec.args.clone(),
        env,
        volume_mounts,
        liveness_probe: spec.liveness_probe.as_ref().and_then(convert_probe),
        readiness_probe: spec.readiness_probe.as_ref().and_then(convert_probe),
        resources: spec.resources.as_ref().and_then(convert_resources),
    }
}

/// Only HTTP GET probes with a path are emitted.
fn convert_probe(probe: &ContainerProbeSpec) -> Option<ProbeValues> {
    let http = probe.http_get.as_ref().filter(|http| !http.path.is_empty())?;

    let http_headers: BTreeMap<String, String> = http
        .http_headers
        .iter()
        .map(|header| (header.name.clone(), header.value.clone()))
        .collect();

    Some(ProbeValues {
        probe_type: "http".to_string(),
        path: http.path.clone(),
        port: http.port,
        http_headers,
    })
}

fn convert_resources(resources: &ResourceRequirementsSpec) -> Option<ResourcesValues> {
    let limits = resources.limits.as_ref().and_then(convert_quantities);
    let requests = resources.requests.as_ref().and_then(convert_quantities);

    if limits.is_none() && requests.is_none() {
        return None;
    }
    Some(ResourcesValues { limits, requests })
}

fn convert_quantities(quantities: &ResourceQuantities) -> Option<QuantityValues> {
    if quantities.is_empty() {
        return None;
    }
    Some(QuantityValues {
        cpu: quantities.cpu.clone(),
        memory: quantities.memory.clone(),
    })
}
