//! ServiceStore trait for mocking
//!
//! This trait abstracts Service reads and writes so reconcilers can run
//! against the API server or against an in-memory mock in unit tests.

use crate::error::StoreError;
use k8s_openapi::api::core::v1::Service;

/// Get/create/update/delete primitives for `core/v1` Services.
///
/// Every method is a single remote call. A missing object is reported as
/// [`StoreError::NotFound`]; any other failure is opaque to callers.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ServiceStore: Send + Sync {
    /// Fetch the Service `namespace/name`.
    async fn get(&self, namespace: &str, name: &str) -> Result<Service, StoreError>;

    /// Create `service`, returning the object as stored by the server.
    async fn create(&self, service: &Service) -> Result<Service, StoreError>;

    /// Replace `service` (matched by namespace/name), returning the stored object.
    async fn update(&self, service: &Service) -> Result<Service, StoreError>;

    /// Delete `service` (matched by namespace/name).
    async fn delete(&self, service: &Service) -> Result<(), StoreError>;
}
