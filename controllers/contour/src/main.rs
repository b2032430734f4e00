//! Contour Controller
//!
//! Keeps the Services of each Contour converged with their desired state:
//! - `contour`: ClusterIP Service exposing the xDS control plane
//! - `envoy`: LoadBalancer Service exposing Envoy's HTTP/HTTPS listeners
//!
//! Services are only updated or deleted when they carry the owning
//! Contour's labels.

mod controller;
mod desired;
mod equality;
#[cfg(test)]
mod equality_test;
mod error;
mod ownership;
mod parent;
mod reconciler;
mod test_utils;
mod watcher;

use controller::Controller;
use crate::error::ControllerError;
use tracing::info;
use tracing_subscriber::EnvFilter;
use std::env;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Contour Controller");

    // Load configuration from environment variables
    let namespace = watch_namespace(env::var("WATCH_NAMESPACE").ok())?;

    info!("Configuration:");
    info!("  Namespace: {}", namespace.as_deref().unwrap_or("all namespaces"));

    // Initialize and run controller
    let controller = Controller::new(namespace).await?;
    controller.run().await?;

    Ok(())
}

/// Validates `WATCH_NAMESPACE`. Unset or empty means all namespaces.
fn watch_namespace(raw: Option<String>) -> Result<Option<String>, ControllerError> {
    let Some(ns) = raw.map(|ns| ns.trim().to_string()).filter(|ns| !ns.is_empty()) else {
        return Ok(None);
    };

    let valid_chars = ns
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ns.len() > 63 || !valid_chars || ns.starts_with('-') || ns.ends_with('-') {
        return Err(ControllerError::InvalidConfig(format!(
            "WATCH_NAMESPACE {:?} is not a valid namespace name",
            ns
        )));
    }
    Ok(Some(ns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_namespace_unset_or_empty_means_all() {
        assert_eq!(watch_namespace(None).unwrap(), None);
        assert_eq!(watch_namespace(Some(String::new())).unwrap(), None);
        assert_eq!(watch_namespace(Some("  ".to_string())).unwrap(), None);
    }

    #[test]
    fn test_watch_namespace_accepts_valid_name() {
        assert_eq!(
            watch_namespace(Some("contour-operator".to_string())).unwrap(),
            Some("contour-operator".to_string())
        );
    }

    #[test]
    fn test_watch_namespace_rejects_invalid_name() {
        let too_long = "a".repeat(64);
        for bad in ["Contour", "-edge", "edge-", "edge_ns", too_long.as_str()] {
            let err = watch_namespace(Some(bad.to_string())).unwrap_err();
            assert!(
                matches!(err, ControllerError::InvalidConfig(_)),
                "{} should be rejected",
                bad
            );
        }
    }
}
