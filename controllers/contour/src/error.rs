//! Controller-specific error types.
//!
//! This module defines error types specific to the Contour controller
//! that are not covered by upstream library errors.

use std::fmt;
use thiserror::Error;
use kube::Error as KubeError;
use service_client::StoreError;

/// Service store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            StoreOperation::Get => "get",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        };
        f.write_str(op)
    }
}

/// Errors that can occur in the Contour Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Service store call failed for a reason other than NotFound
    #[error("failed to {op} service {namespace}/{name}: {source}")]
    Store {
        op: StoreOperation,
        namespace: String,
        name: String,
        #[source]
        source: StoreError,
    },

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Resource is missing fields the controller relies on
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

impl ControllerError {
    /// Wrap a store error with the operation and object it was issued for.
    pub fn store(op: StoreOperation, namespace: &str, name: &str, source: StoreError) -> Self {
        ControllerError::Store {
            op,
            namespace: namespace.to_string(),
            name: name.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_message_names_operation_and_object() {
        let err = ControllerError::store(
            StoreOperation::Update,
            "projectcontour",
            "envoy",
            StoreError::InvalidRequest("conflict".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "failed to update service projectcontour/envoy: Invalid request: conflict"
        );
    }
}
