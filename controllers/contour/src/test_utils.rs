//! Test utilities for unit testing reconcilers
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use crate::parent::ParentRef;
#[cfg(test)]
use crds::{Contour, ContourSpec, OWNING_CONTOUR_NAME_LABEL, OWNING_CONTOUR_NS_LABEL};
#[cfg(test)]
use k8s_openapi::api::core::v1::Service;

#[cfg(test)]
pub const TEST_CONTOUR_NAME: &str = "contour-sample";
#[cfg(test)]
pub const TEST_CONTOUR_NAMESPACE: &str = "contour-operator";
#[cfg(test)]
pub const TEST_CHILD_NAMESPACE: &str = "projectcontour";

/// Parent identity used across tests
#[cfg(test)]
pub fn test_parent() -> ParentRef {
    ParentRef::new(TEST_CONTOUR_NAME, TEST_CONTOUR_NAMESPACE, TEST_CHILD_NAMESPACE)
}

/// Helper to create a test Contour CRD
#[cfg(test)]
pub fn create_test_contour(name: &str, namespace: &str, child_namespace: &str) -> Contour {
    let mut contour = Contour::new(name, ContourSpec::default());
    contour.metadata.namespace = Some(namespace.to_string());
    contour.spec.namespace.name = child_namespace.to_string();
    contour
}

/// Fill in the fields an API server would have assigned to a stored Service
#[cfg(test)]
pub fn with_server_fields(mut service: Service) -> Service {
    service.metadata.uid = Some("5f0c9a1e-0000-4000-8000-000000000001".to_string());
    service.metadata.resource_version = Some("4711".to_string());
    let spec = service.spec.get_or_insert_with(Default::default);
    spec.cluster_ip = Some("10.96.12.7".to_string());
    spec.cluster_ips = Some(vec!["10.96.12.7".to_string()]);
    spec.internal_traffic_policy = Some("Cluster".to_string());
    let is_load_balancer = spec.type_.as_deref() == Some("LoadBalancer");
    for (i, port) in spec.ports.iter_mut().flatten().enumerate() {
        if is_load_balancer {
            port.node_port = Some(31000 + i as i32);
        }
    }
    service
}

/// Replace the owner labels on a Service
#[cfg(test)]
pub fn with_owner(mut service: Service, name: &str, namespace: &str) -> Service {
    let labels = service.metadata.labels.get_or_insert_with(Default::default);
    labels.insert(OWNING_CONTOUR_NAME_LABEL.to_string(), name.to_string());
    labels.insert(OWNING_CONTOUR_NS_LABEL.to_string(), namespace.to_string());
    service
}

/// Remove every label from a Service
#[cfg(test)]
pub fn without_labels(mut service: Service) -> Service {
    service.metadata.labels = None;
    service
}

/// Helper to create a reconciler backed by a shared mock store
#[cfg(test)]
pub fn create_test_reconciler(
    store: &service_client::MockServiceStore,
) -> crate::reconciler::Reconciler {
    crate::reconciler::Reconciler::new(Box::new(store.clone()))
}
