//! Reconciliation logic for Contour CRDs.
//!
//! A Contour owns two Services in its child namespace:
//! - `contour`: ClusterIP Service for the xDS control plane
//! - `envoy`: LoadBalancer Service for the Envoy data plane
//!
//! Each pass either ensures both exist and match their desired state, or,
//! when the Contour is being deleted, ensures both are gone.

pub mod service;

pub use service::ServiceOutcome;

use crate::desired::ServiceKind;
use crate::error::ControllerError;
use crate::parent::ParentRef;
use crds::Contour;
use service_client::ServiceStore;
use tracing::{debug, info};

/// Reconciles Contour-owned resources.
pub struct Reconciler {
    pub(crate) store: Box<dyn ServiceStore + Send + Sync>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(store: Box<dyn ServiceStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Reconciles a Contour resource.
    ///
    /// Ensures the contour Service and then the envoy Service, stopping at the
    /// first error. A Contour marked for deletion is cleaned up instead.
    pub async fn reconcile_contour(&self, contour: &Contour) -> Result<(), ControllerError> {
        let parent = ParentRef::from_contour(contour)?;

        if contour.is_being_deleted() {
            return self.cleanup_contour(contour).await;
        }

        info!("Reconciling Contour {}", parent);
        for kind in ServiceKind::ALL {
            let outcome = self.ensure_service(&parent, kind).await?;
            debug!("Contour {}: {} service {:?}", parent, kind, outcome);
        }
        Ok(())
    }

    /// Deletes the Services owned by a Contour that is going away.
    pub async fn cleanup_contour(&self, contour: &Contour) -> Result<(), ControllerError> {
        let parent = ParentRef::from_contour(contour)?;

        info!("Cleaning up Contour {}", parent);
        for kind in ServiceKind::ALL {
            let outcome = self.ensure_service_deleted(&parent, kind).await?;
            debug!("Contour {}: {} service {:?}", parent, kind, outcome);
        }
        Ok(())
    }
}
