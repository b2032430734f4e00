//! Kubernetes-backed Service store

use crate::error::StoreError;
use crate::service_trait::ServiceStore;
use k8s_openapi::api::core::v1::Service;
use kube::api::{DeleteParams, PostParams};
use kube::{Api, Client};
use tracing::debug;

/// Service store talking to the Kubernetes API server.
#[derive(Clone)]
pub struct KubeServiceStore {
    client: Client,
}

impl std::fmt::Debug for KubeServiceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeServiceStore").finish_non_exhaustive()
    }
}

impl KubeServiceStore {
    /// Create a store from an existing Kubernetes client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Service> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Extract `(namespace, name)` from a Service, rejecting objects without either.
pub(crate) fn object_key(service: &Service) -> Result<(&str, &str), StoreError> {
    let name = service
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| StoreError::InvalidRequest("Service missing name".to_string()))?;
    let namespace = service.metadata.namespace.as_deref().ok_or_else(|| {
        StoreError::InvalidRequest(format!("Service {} missing namespace", name))
    })?;
    Ok((namespace, name))
}

#[async_trait::async_trait]
impl ServiceStore for KubeServiceStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Service, StoreError> {
        debug!("GET service {}/{}", namespace, name);
        Ok(self.api(namespace).get(name).await?)
    }

    async fn create(&self, service: &Service) -> Result<Service, StoreError> {
        let (namespace, name) = object_key(service)?;
        debug!("POST service {}/{}", namespace, name);
        Ok(self
            .api(namespace)
            .create(&PostParams::default(), service)
            .await?)
    }

    async fn update(&self, service: &Service) -> Result<Service, StoreError> {
        let (namespace, name) = object_key(service)?;
        debug!("PUT service {}/{}", namespace, name);
        Ok(self
            .api(namespace)
            .replace(name, &PostParams::default(), service)
            .await?)
    }

    async fn delete(&self, service: &Service) -> Result<(), StoreError> {
        let (namespace, name) = object_key(service)?;
        debug!("DELETE service {}/{}", namespace, name);
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}
