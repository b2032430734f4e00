//! Kubernetes resource watchers.
//!
//! This module watches Contour resources and triggers reconciliation.
//! Events are handled one at a time, so a Contour is never reconciled
//! concurrently with itself.

use crate::reconciler::Reconciler;
use crate::error::ControllerError;
use crds::Contour;
use kube::Api;
use std::sync::Arc;
use tracing::{info, error, warn, debug};
use futures::TryStreamExt;
use kube_runtime::watcher;

/// Watches Contour resources for changes.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    contour_api: Api<Contour>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler>, contour_api: Api<Contour>) -> Self {
        Self {
            reconciler,
            contour_api,
        }
    }

    /// Starts watching Contour resources.
    ///
    /// Reconciliation failures are logged and retried on the next event for
    /// the same Contour; only a broken watch stream ends the loop.
    pub async fn watch_contours(&self) -> Result<(), ControllerError> {
        info!("Starting Contour watcher");

        let mut stream = Box::pin(watcher(self.contour_api.clone(), watcher::Config::default()));

        while let Some(event) = stream.try_next().await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {}", e)))?
        {
            match event {
                watcher::Event::Apply(contour) => {
                    let name = contour_name(&contour);
                    info!("Contour applied: {}", name);

                    if let Err(e) = self.reconciler.reconcile_contour(&contour).await {
                        error!("Failed to reconcile Contour {}: {}", name, e);
                    }
                }
                watcher::Event::Delete(contour) => {
                    let name = contour_name(&contour);
                    info!("Contour deleted: {}", name);

                    if let Err(e) = self.reconciler.cleanup_contour(&contour).await {
                        error!("Failed to clean up Contour {}: {}", name, e);
                    }
                }
                watcher::Event::Init => {
                    debug!("Contour watcher initialized");
                }
                watcher::Event::InitApply(contour) => {
                    let name = contour_name(&contour);
                    debug!("Contour init apply: {}", name);

                    if let Err(e) = self.reconciler.reconcile_contour(&contour).await {
                        warn!("Failed to reconcile Contour {}: {}", name, e);
                    }
                }
                watcher::Event::InitDone => {
                    info!("Contour watcher initialization complete");
                }
            }
        }

        Ok(())
    }
}

fn contour_name(contour: &Contour) -> String {
    format!(
        "{}/{}",
        contour.metadata.namespace.as_deref().unwrap_or("default"),
        contour.metadata.name.as_deref().unwrap_or("<unknown>")
    )
}
