//! Desired Service generation.
//!
//! Pure functions from a parent identity to the Services the operator wants
//! to exist. Service names are fixed per kind, so only one contour/envoy pair
//! is supported per namespace.
//!
//! TODO: derive Service names from the Contour name (`<name>-contour`,
//! `<name>-envoy`) once Contour supports several instances per namespace.

use crate::ownership::owner_labels;
use crate::parent::ParentRef;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the Contour (xDS control-plane) Service.
pub const CONTOUR_SERVICE_NAME: &str = "contour";
/// Name of the Envoy (data-plane) Service.
pub const ENVOY_SERVICE_NAME: &str = "envoy";

/// Port Contour serves xDS on.
pub const XDS_PORT: i32 = 8001;
/// Port Envoy listens on for plaintext HTTP.
pub const HTTP_PORT: i32 = 8080;
/// Port Envoy listens on for HTTPS.
pub const HTTPS_PORT: i32 = 8443;

/// Places AWS ELBs in TCP mode so TLS is not terminated at the ELB edge.
/// Client addresses then appear as the ELB's internal address.
pub const AWS_LB_BACKEND_PROTO_ANNOTATION: &str =
    "service.beta.kubernetes.io/aws-load-balancer-backend-protocol";

/// Service managed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Cluster-internal Service exposing Contour's xDS port.
    Contour,
    /// Load-balanced Service exposing Envoy's HTTP and HTTPS ports.
    Envoy,
}

impl ServiceKind {
    /// All managed kinds, in the order they are ensured.
    pub const ALL: [ServiceKind; 2] = [ServiceKind::Contour, ServiceKind::Envoy];

    /// Name of the Service for this kind.
    pub fn service_name(self, _parent: &ParentRef) -> &'static str {
        match self {
            ServiceKind::Contour => CONTOUR_SERVICE_NAME,
            ServiceKind::Envoy => ENVOY_SERVICE_NAME,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Contour => f.write_str("contour"),
            ServiceKind::Envoy => f.write_str("envoy"),
        }
    }
}

/// Pod selector of the Contour Deployment.
pub fn contour_pod_selector() -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), "contour".to_string())])
}

/// Pod selector of the Envoy DaemonSet.
pub fn envoy_pod_selector() -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), "envoy".to_string())])
}

fn tcp_port(name: &str, port: i32) -> ServicePort {
    ServicePort {
        name: Some(name.to_string()),
        port,
        protocol: Some("TCP".to_string()),
        target_port: Some(IntOrString::Int(port)),
        ..Default::default()
    }
}

/// Desired Service of `kind` for `parent`.
pub fn desired_service(parent: &ParentRef, kind: ServiceKind) -> Service {
    match kind {
        ServiceKind::Contour => desired_contour_service(parent),
        ServiceKind::Envoy => desired_envoy_service(parent),
    }
}

/// Desired Contour Service: ClusterIP, xDS port only.
pub fn desired_contour_service(parent: &ParentRef) -> Service {
    Service {
        metadata: ObjectMeta {
            namespace: Some(parent.child_namespace.clone()),
            name: Some(ServiceKind::Contour.service_name(parent).to_string()),
            labels: Some(owner_labels(parent)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(vec![tcp_port("xds", XDS_PORT)]),
            selector: Some(contour_pod_selector()),
            type_: Some("ClusterIP".to_string()),
            session_affinity: Some("None".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Desired Envoy Service: LoadBalancer in TCP mode with a `Local`
/// external traffic policy so client source addresses are preserved.
pub fn desired_envoy_service(parent: &ParentRef) -> Service {
    Service {
        metadata: ObjectMeta {
            namespace: Some(parent.child_namespace.clone()),
            name: Some(ServiceKind::Envoy.service_name(parent).to_string()),
            annotations: Some(BTreeMap::from([(
                AWS_LB_BACKEND_PROTO_ANNOTATION.to_string(),
                "tcp".to_string(),
            )])),
            labels: Some(owner_labels(parent)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            external_traffic_policy: Some("Local".to_string()),
            ports: Some(vec![
                tcp_port("http", HTTP_PORT),
                tcp_port("https", HTTPS_PORT),
            ]),
            selector: Some(envoy_pod_selector()),
            type_: Some("LoadBalancer".to_string()),
            session_affinity: Some("None".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
