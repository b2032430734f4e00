//! Service change detection.
//!
//! Each Service kind has an explicit set of managed fields. The functions here
//! start from the current object, overwrite only managed fields that differ
//! from the desired object, and report whether anything changed. Everything
//! else on the current object (clusterIP, nodePorts, resourceVersion, foreign
//! labels and annotations, status) is carried through untouched.
//!
//! Managed fields:
//! - ClusterIP (contour): ports, selector, session affinity, desired labels
//! - LoadBalancer (envoy): the ClusterIP set plus type, external traffic
//!   policy and desired annotations

use crate::desired::ServiceKind;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use std::collections::BTreeMap;

/// Compare `current` against `desired` using the managed fields of `kind`.
pub fn service_changed(kind: ServiceKind, current: &Service, desired: &Service) -> (Service, bool) {
    match kind {
        ServiceKind::Contour => cluster_ip_service_changed(current, desired),
        ServiceKind::Envoy => load_balancer_service_changed(current, desired),
    }
}

/// Compare a ClusterIP Service. Returns the merged Service and whether it changed.
pub fn cluster_ip_service_changed(current: &Service, desired: &Service) -> (Service, bool) {
    let mut updated = current.clone();
    let empty = ServiceSpec::default();
    let want = desired.spec.as_ref().unwrap_or(&empty);

    let mut changed = merge_map(&mut updated.metadata.labels, desired.metadata.labels.as_ref());
    let spec = updated.spec.get_or_insert_with(Default::default);
    changed |= merge_common_spec(spec, want);

    (updated, changed)
}

/// Compare a LoadBalancer Service. Returns the merged Service and whether it changed.
pub fn load_balancer_service_changed(current: &Service, desired: &Service) -> (Service, bool) {
    let mut updated = current.clone();
    let empty = ServiceSpec::default();
    let want = desired.spec.as_ref().unwrap_or(&empty);

    let mut changed = merge_map(&mut updated.metadata.labels, desired.metadata.labels.as_ref());
    changed |= merge_map(
        &mut updated.metadata.annotations,
        desired.metadata.annotations.as_ref(),
    );

    let spec = updated.spec.get_or_insert_with(Default::default);
    changed |= merge_common_spec(spec, want);
    changed |= overwrite(&mut spec.type_, &want.type_);
    changed |= overwrite(
        &mut spec.external_traffic_policy,
        &want.external_traffic_policy,
    );

    (updated, changed)
}

/// Ports, selector and session affinity, shared by every kind.
fn merge_common_spec(spec: &mut ServiceSpec, want: &ServiceSpec) -> bool {
    let mut changed = false;
    if !ports_equal(spec.ports.as_deref(), want.ports.as_deref()) {
        spec.ports = merge_ports(spec.ports.as_deref(), want.ports.as_deref());
        changed = true;
    }
    changed |= overwrite(&mut spec.selector, &want.selector);
    changed |= overwrite(&mut spec.session_affinity, &want.session_affinity);
    changed
}

fn overwrite<T: PartialEq + Clone>(current: &mut T, desired: &T) -> bool {
    if current == desired {
        return false;
    }
    *current = desired.clone();
    true
}

/// Set every desired key on `current`, leaving keys the operator does not
/// manage alone.
fn merge_map(
    current: &mut Option<BTreeMap<String, String>>,
    desired: Option<&BTreeMap<String, String>>,
) -> bool {
    let Some(desired) = desired.filter(|d| !d.is_empty()) else {
        return false;
    };
    let current = current.get_or_insert_with(BTreeMap::new);
    let mut changed = false;
    for (key, value) in desired {
        if current.get(key) != Some(value) {
            current.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

/// Ports match when they agree on everything but the server-assigned nodePort.
fn ports_equal(current: Option<&[ServicePort]>, desired: Option<&[ServicePort]>) -> bool {
    let current = current.unwrap_or_default();
    let desired = desired.unwrap_or_default();
    current.len() == desired.len()
        && current.iter().zip(desired).all(|(c, d)| {
            c.name == d.name
                && c.port == d.port
                && c.protocol == d.protocol
                && c.target_port == d.target_port
                && c.app_protocol == d.app_protocol
        })
}

/// Desired ports, keeping the nodePort already allocated to a same-named port.
fn merge_ports(
    current: Option<&[ServicePort]>,
    desired: Option<&[ServicePort]>,
) -> Option<Vec<ServicePort>> {
    let desired = desired?;
    let current = current.unwrap_or_default();
    Some(
        desired
            .iter()
            .map(|want| {
                let mut port = want.clone();
                if port.node_port.is_none() {
                    port.node_port = current
                        .iter()
                        .find(|c| c.name == want.name)
                        .and_then(|c| c.node_port);
                }
                port
            })
            .collect(),
    )
}
