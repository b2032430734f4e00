//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the Service
//! store, reconciler and Contour watcher together.

use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use crate::error::ControllerError;
use crds::Contour;
use kube::{Api, Client};
use service_client::KubeServiceStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for Contour management.
pub struct Controller {
    contour_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    ///
    /// Watches Contours in `namespace`, or in all namespaces when `None`.
    pub async fn new(namespace: Option<String>) -> Result<Self, ControllerError> {
        info!("Initializing Contour Controller");

        let kube_client = Client::try_default().await?;

        let contour_api: Api<Contour> = match namespace.as_deref() {
            Some(ns) => Api::namespaced(kube_client.clone(), ns),
            None => Api::all(kube_client.clone()),
        };

        // Child Services may live outside the watched namespace, so the store
        // addresses them by their own namespace.
        let store = KubeServiceStore::new(kube_client);
        let reconciler = Arc::new(Reconciler::new(Box::new(store)));

        let watcher_instance = Watcher::new(reconciler, contour_api);
        let contour_watcher = tokio::spawn(async move {
            watcher_instance.watch_contours().await
        });

        Ok(Self { contour_watcher })
    }

    /// Runs the controller until shutdown.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Contour Controller running");

        self.contour_watcher
            .await
            .map_err(|e| ControllerError::Watch(format!("Contour watcher panicked: {}", e)))??;

        Ok(())
    }
}
