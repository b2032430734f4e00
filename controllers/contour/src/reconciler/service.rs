//! Service reconciliation.
//!
//! Ensures the contour and envoy Services exist and match their desired
//! state, or are gone. Services that are not labeled as owned by the
//! reconciled Contour are never updated or deleted.

use super::Reconciler;
use crate::desired::{desired_service, ServiceKind};
use crate::equality::service_changed;
use crate::error::{ControllerError, StoreOperation};
use crate::ownership::is_owned_by;
use crate::parent::ParentRef;
use k8s_openapi::api::core::v1::Service;
use service_client::StoreError;
use tracing::{debug, info};

/// Terminal state of a single Service reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// Service did not exist and was created
    Created,
    /// Service existed, was owned and differed from desired
    Updated,
    /// Service existed, was owned and already matched desired
    Unchanged,
    /// Service existed, was owned and was deleted
    Deleted,
    /// Service did not exist (or vanished while deleting)
    Absent,
    /// Service exists but is not labeled as owned by this Contour
    SkippedUnowned,
}

impl Reconciler {
    /// Ensures the Service of `kind` exists for `parent` and matches its desired state.
    pub async fn ensure_service(
        &self,
        parent: &ParentRef,
        kind: ServiceKind,
    ) -> Result<ServiceOutcome, ControllerError> {
        let desired = desired_service(parent, kind);

        let current = match self.current_service(parent, kind).await? {
            Some(current) => current,
            None => {
                self.create_service(&desired).await?;
                return Ok(ServiceOutcome::Created);
            }
        };

        self.update_service_if_needed(parent, kind, &current, &desired)
            .await
    }

    /// Ensures the Service of `kind` for `parent` is deleted, if it carries
    /// `parent`'s owner labels.
    pub async fn ensure_service_deleted(
        &self,
        parent: &ParentRef,
        kind: ServiceKind,
    ) -> Result<ServiceOutcome, ControllerError> {
        let Some(svc) = self.current_service(parent, kind).await? else {
            return Ok(ServiceOutcome::Absent);
        };
        let (namespace, name) = service_key(&svc, parent, kind);

        if !is_owned_by(&svc, parent) {
            info!("service {}/{} not labeled; skipping deletion", namespace, name);
            return Ok(ServiceOutcome::SkippedUnowned);
        }

        match self.store.delete(&svc).await {
            Ok(()) => {
                info!("deleted service {}/{}", namespace, name);
                Ok(ServiceOutcome::Deleted)
            }
            Err(StoreError::NotFound(_)) => {
                debug!("service {}/{} already deleted", namespace, name);
                Ok(ServiceOutcome::Absent)
            }
            Err(e) => Err(ControllerError::store(StoreOperation::Delete, namespace, name, e)),
        }
    }

    /// Returns the current Service of `kind` for `parent`, or `None` if it does not exist.
    async fn current_service(
        &self,
        parent: &ParentRef,
        kind: ServiceKind,
    ) -> Result<Option<Service>, ControllerError> {
        let namespace = parent.child_namespace.as_str();
        let name = kind.service_name(parent);
        match self.store.get(namespace, name).await {
            Ok(svc) => Ok(Some(svc)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(ControllerError::store(StoreOperation::Get, namespace, name, e)),
        }
    }

    async fn create_service(&self, svc: &Service) -> Result<(), ControllerError> {
        let namespace = svc.metadata.namespace.as_deref().unwrap_or_default();
        let name = svc.metadata.name.as_deref().unwrap_or_default();
        self.store
            .create(svc)
            .await
            .map_err(|e| ControllerError::store(StoreOperation::Create, namespace, name, e))?;
        info!("created service {}/{}", namespace, name);
        Ok(())
    }

    /// Updates `current` if it is owned by `parent` and differs from `desired`.
    async fn update_service_if_needed(
        &self,
        parent: &ParentRef,
        kind: ServiceKind,
        current: &Service,
        desired: &Service,
    ) -> Result<ServiceOutcome, ControllerError> {
        let (namespace, name) = service_key(current, parent, kind);

        if !is_owned_by(current, parent) {
            info!("service {}/{} missing owner labels; skipped updating", namespace, name);
            return Ok(ServiceOutcome::SkippedUnowned);
        }

        let (svc, changed) = service_changed(kind, current, desired);
        if !changed {
            debug!("service {}/{} unchanged; skipped updating", namespace, name);
            return Ok(ServiceOutcome::Unchanged);
        }

        self.store
            .update(&svc)
            .await
            .map_err(|e| ControllerError::store(StoreOperation::Update, namespace, name, e))?;
        info!("updated service {}/{}", namespace, name);
        Ok(ServiceOutcome::Updated)
    }
}

/// Namespace/name of an observed Service, falling back to the key it was fetched by.
fn service_key<'a>(
    svc: &'a Service,
    parent: &'a ParentRef,
    kind: ServiceKind,
) -> (&'a str, &'a str) {
    (
        svc.metadata
            .namespace
            .as_deref()
            .unwrap_or(parent.child_namespace.as_str()),
        svc.metadata
            .name
            .as_deref()
            .unwrap_or(kind.service_name(parent)),
    )
}
