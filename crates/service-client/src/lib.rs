//! Service store for the Contour operator
//!
//! A narrow get/create/update/delete interface over Kubernetes `core/v1`
//! Services. Reconcilers depend on the [`ServiceStore`] trait; production code
//! uses [`KubeServiceStore`] and unit tests use `MockServiceStore`
//! (enabled with the `test-util` feature).
//!
//! # Example
//!
//! ```no_run
//! use service_client::{KubeServiceStore, ServiceStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let store = KubeServiceStore::new(client);
//!
//! match store.get("projectcontour", "envoy").await {
//!     Ok(svc) => println!("found {:?}", svc.metadata.uid),
//!     Err(e) if e.is_not_found() => println!("envoy Service does not exist"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod service_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeServiceStore;
pub use error::StoreError;
pub use service_trait::ServiceStore;
#[cfg(feature = "test-util")]
pub use mock::{CallCounts, MockOperation, MockServiceStore};
