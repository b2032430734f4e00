//! Unit tests for equality module

#[cfg(test)]
mod tests {
    use crate::desired::{
        desired_contour_service, desired_envoy_service, desired_service, ServiceKind,
        AWS_LB_BACKEND_PROTO_ANNOTATION,
    };
    use crate::equality::*;
    use crate::test_utils::*;
    use k8s_openapi::api::core::v1::ServicePort;
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    #[test]
    fn test_exact_match_is_unchanged() {
        for kind in ServiceKind::ALL {
            let desired = desired_service(&test_parent(), kind);
            let current = with_server_fields(desired.clone());

            let (merged, changed) = service_changed(kind, &current, &desired);
            assert!(!changed, "{} Service should be unchanged", kind);
            assert_eq!(merged, current, "{} Service should be returned as-is", kind);
        }
    }

    #[test]
    fn test_port_change_keeps_server_fields() {
        let desired = desired_contour_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        current.spec.as_mut().unwrap().ports = Some(vec![ServicePort {
            name: Some("xds".to_string()),
            port: 9001,
            protocol: Some("TCP".to_string()),
            target_port: Some(IntOrString::Int(9001)),
            ..Default::default()
        }]);

        let (merged, changed) = cluster_ip_service_changed(&current, &desired);
        assert!(changed);
        assert_eq!(merged.metadata.resource_version.as_deref(), Some("4711"));
        assert_eq!(merged.metadata.uid, current.metadata.uid);
        let spec = merged.spec.unwrap();
        assert_eq!(spec.cluster_ip.as_deref(), Some("10.96.12.7"));
        assert_eq!(spec.internal_traffic_policy.as_deref(), Some("Cluster"));
        assert_eq!(spec.ports, desired.spec.unwrap().ports);
    }

    #[test]
    fn test_selector_and_affinity_are_managed() {
        let desired = desired_contour_service(&test_parent());

        let mut no_selector = with_server_fields(desired.clone());
        no_selector.spec.as_mut().unwrap().selector = None;
        let (merged, changed) = cluster_ip_service_changed(&no_selector, &desired);
        assert!(changed);
        assert_eq!(merged.spec.unwrap().selector, desired.spec.as_ref().unwrap().selector);

        let mut sticky = with_server_fields(desired.clone());
        sticky.spec.as_mut().unwrap().session_affinity = Some("ClientIP".to_string());
        let (merged, changed) = cluster_ip_service_changed(&sticky, &desired);
        assert!(changed);
        assert_eq!(merged.spec.unwrap().session_affinity.as_deref(), Some("None"));
    }

    #[test]
    fn test_cluster_ip_ignores_unmanaged_spec_fields() {
        let desired = desired_contour_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        current.spec.as_mut().unwrap().external_traffic_policy = Some("Cluster".to_string());
        current.spec.as_mut().unwrap().publish_not_ready_addresses = Some(true);

        let (merged, changed) = cluster_ip_service_changed(&current, &desired);
        assert!(!changed);
        assert_eq!(merged, current);
    }

    #[test]
    fn test_foreign_labels_and_annotations_survive() {
        let desired = desired_envoy_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        current
            .metadata
            .labels
            .get_or_insert_with(Default::default)
            .insert("team".to_string(), "edge".to_string());
        let annotations = current.metadata.annotations.get_or_insert_with(Default::default);
        annotations.insert("example.com/owner".to_string(), "sre".to_string());
        annotations.insert(AWS_LB_BACKEND_PROTO_ANNOTATION.to_string(), "http".to_string());

        let (merged, changed) = load_balancer_service_changed(&current, &desired);
        assert!(changed);
        let labels = merged.metadata.labels.unwrap();
        assert_eq!(labels.get("team").map(String::as_str), Some("edge"));
        let annotations = merged.metadata.annotations.unwrap();
        assert_eq!(annotations.get("example.com/owner").map(String::as_str), Some("sre"));
        assert_eq!(
            annotations.get(AWS_LB_BACKEND_PROTO_ANNOTATION).map(String::as_str),
            Some("tcp")
        );
    }

    #[test]
    fn test_missing_annotation_is_restored() {
        let desired = desired_envoy_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        current.metadata.annotations = None;

        let (merged, changed) = load_balancer_service_changed(&current, &desired);
        assert!(changed);
        assert_eq!(merged.metadata.annotations, desired.metadata.annotations);
    }

    #[test]
    fn test_load_balancer_type_and_policy_are_managed() {
        let desired = desired_envoy_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        {
            let spec = current.spec.as_mut().unwrap();
            spec.type_ = Some("NodePort".to_string());
            spec.external_traffic_policy = Some("Cluster".to_string());
        }

        let (merged, changed) = load_balancer_service_changed(&current, &desired);
        assert!(changed);
        let spec = merged.spec.unwrap();
        assert_eq!(spec.type_.as_deref(), Some("LoadBalancer"));
        assert_eq!(spec.external_traffic_policy.as_deref(), Some("Local"));
        assert_eq!(spec.cluster_ip.as_deref(), Some("10.96.12.7"));
    }

    #[test]
    fn test_node_ports_are_not_a_difference() {
        let desired = desired_envoy_service(&test_parent());
        let current = with_server_fields(desired.clone());
        assert!(current.spec.as_ref().unwrap().ports.as_ref().unwrap()[0].node_port.is_some());

        let (_, changed) = load_balancer_service_changed(&current, &desired);
        assert!(!changed);
    }

    #[test]
    fn test_port_change_keeps_allocated_node_ports() {
        let desired = desired_envoy_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        current.spec.as_mut().unwrap().ports.as_mut().unwrap()[1].port = 443;

        let (merged, changed) = load_balancer_service_changed(&current, &desired);
        assert!(changed);
        let ports = merged.spec.unwrap().ports.unwrap();
        assert_eq!(ports[1].port, 8443);
        assert_eq!(ports[0].node_port, Some(31000));
        assert_eq!(ports[1].node_port, Some(31001));
    }

    #[test]
    fn test_dropped_port_is_restored() {
        let desired = desired_envoy_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        current.spec.as_mut().unwrap().ports.as_mut().unwrap().truncate(1);

        let (merged, changed) = load_balancer_service_changed(&current, &desired);
        assert!(changed);
        let ports = merged.spec.unwrap().ports.unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].node_port, Some(31000));
        assert_eq!(ports[1].node_port, None);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let desired = desired_envoy_service(&test_parent());
        let mut current = with_server_fields(desired.clone());
        current.spec.as_mut().unwrap().selector = None;

        let (merged, changed) = load_balancer_service_changed(&current, &desired);
        assert!(changed);
        let (again, changed_again) = load_balancer_service_changed(&merged, &desired);
        assert!(!changed_again);
        assert_eq!(again, merged);
    }
}
