//! Contour CRD
//!
//! Declares a Contour ingress controller instance. The operator derives the
//! `contour` and `envoy` Services from it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Namespace that child resources are created in when none is given.
pub const DEFAULT_CHILD_NAMESPACE: &str = "projectcontour";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "operator.projectcontour.io",
    version = "v1alpha1",
    kind = "Contour",
    namespaced,
    status = "ContourStatus",
    shortname = "contour"
)]
#[serde(rename_all = "camelCase")]
pub struct ContourSpec {
    /// Desired number of Contour replicas
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Namespace for the Contour and Envoy resources
    #[serde(default)]
    pub namespace: NamespaceSpec,
}

impl Default for ContourSpec {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
            namespace: NamespaceSpec::default(),
        }
    }
}

fn default_replicas() -> i32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSpec {
    /// Name of the namespace that child resources are placed in
    #[serde(default = "default_namespace_name")]
    pub name: String,

    /// Remove the namespace when the Contour is deleted.
    /// Ignored when the namespace also hosts the Contour itself.
    #[serde(default)]
    pub remove_on_deletion: bool,
}

impl Default for NamespaceSpec {
    fn default() -> Self {
        Self {
            name: default_namespace_name(),
            remove_on_deletion: false,
        }
    }
}

fn default_namespace_name() -> String {
    DEFAULT_CHILD_NAMESPACE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContourStatus {
    /// Number of available Contour replicas
    #[serde(default)]
    pub available_contours: i32,

    /// Number of available Envoy pods
    #[serde(default)]
    pub available_envoys: i32,
}

impl Contour {
    /// Namespace that this Contour's child resources live in.
    ///
    /// An empty `spec.namespace.name` falls back to [`DEFAULT_CHILD_NAMESPACE`].
    pub fn child_namespace(&self) -> &str {
        let name = self.spec.namespace.name.as_str();
        if name.is_empty() {
            DEFAULT_CHILD_NAMESPACE
        } else {
            name
        }
    }

    /// True once the API server has marked this Contour for deletion.
    pub fn is_being_deleted(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_defaults_when_fields_omitted() {
        let spec: ContourSpec = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(spec.replicas, 2);
        assert_eq!(spec.namespace.name, "projectcontour");
        assert!(!spec.namespace.remove_on_deletion);
    }

    #[test]
    fn test_spec_uses_camel_case() {
        let spec: ContourSpec = serde_json::from_value(serde_json::json!({
            "replicas": 3,
            "namespace": { "name": "ingress", "removeOnDeletion": true }
        }))
        .unwrap();
        assert_eq!(spec.replicas, 3);
        assert_eq!(spec.namespace.name, "ingress");
        assert!(spec.namespace.remove_on_deletion);
    }

    #[test]
    fn test_child_namespace_falls_back_on_empty_name() {
        let mut contour = Contour::new("contour-sample", ContourSpec::default());
        assert_eq!(contour.child_namespace(), "projectcontour");

        contour.spec.namespace.name = String::new();
        assert_eq!(contour.child_namespace(), "projectcontour");

        contour.spec.namespace.name = "edge".to_string();
        assert_eq!(contour.child_namespace(), "edge");
    }
}
