//! Mock ServiceStore for unit testing
//!
//! Stores Services in memory and mimics the API server fields that matter to
//! reconcilers: `clusterIP`, `uid`, `resourceVersion` and LoadBalancer
//! `nodePort`s are assigned on create, and `resourceVersion` is bumped on
//! update. Every call is counted so tests can assert exactly which writes a
//! reconciliation pass issued.

use crate::client::object_key;
use crate::error::StoreError;
use crate::service_trait::ServiceStore;
use k8s_openapi::api::core::v1::Service;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Store operation, used to count calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Get,
    Create,
    Update,
    Delete,
}

/// Number of calls issued per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub get: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    /// Calls that mutate the store.
    pub fn writes(&self) -> usize {
        self.create + self.update + self.delete
    }
}

/// Mock Service store for testing
#[derive(Clone, Default)]
pub struct MockServiceStore {
    pub(crate) services: Arc<Mutex<HashMap<(String, String), Service>>>,
    pub(crate) calls: Arc<Mutex<CallCounts>>,
    pub(crate) failures: Arc<Mutex<HashMap<MockOperation, String>>>,
    pub(crate) vanish_on_delete: Arc<Mutex<HashSet<(String, String)>>>,
    // Counter for generating cluster IPs, node ports and resource versions
    pub(crate) next_id: Arc<Mutex<u32>>,
}

impl std::fmt::Debug for MockServiceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockServiceStore")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl MockServiceStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Service to the mock store as-is (for test setup, not counted)
    pub fn add_service(&self, service: Service) {
        let key = owned_key(&service);
        self.services.lock().unwrap().insert(key, service);
    }

    /// Read a stored Service without counting a call
    pub fn stored(&self, namespace: &str, name: &str) -> Option<Service> {
        self.services
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Snapshot of the calls issued so far
    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap()
    }

    /// Make every subsequent call of `op` fail with an opaque API error
    pub fn fail_on(&self, op: MockOperation, message: impl Into<String>) {
        self.failures.lock().unwrap().insert(op, message.into());
    }

    /// Clear an injected failure
    pub fn clear_failure(&self, op: MockOperation) {
        self.failures.lock().unwrap().remove(&op);
    }

    /// Simulate another deleter winning the race: the next delete of
    /// `namespace/name` removes the object and reports NotFound.
    pub fn vanish_before_delete(&self, namespace: &str, name: &str) {
        self.vanish_on_delete
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name.to_string()));
    }

    fn record(&self, op: MockOperation) -> Result<(), StoreError> {
        {
            let mut calls = self.calls.lock().unwrap();
            match op {
                MockOperation::Get => calls.get += 1,
                MockOperation::Create => calls.create += 1,
                MockOperation::Update => calls.update += 1,
                MockOperation::Delete => calls.delete += 1,
            }
        }
        match self.failures.lock().unwrap().get(&op) {
            Some(message) => Err(StoreError::Api(kube::Error::Service(message.clone().into()))),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> u32 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }

    /// Fill in the fields the API server assigns on create.
    fn apply_server_defaults(&self, service: &mut Service) {
        let id = self.next_id();
        service.metadata.uid = Some(uuid::Uuid::new_v4().to_string());
        service.metadata.resource_version = Some(id.to_string());

        let spec = service.spec.get_or_insert_with(Default::default);
        let is_load_balancer = spec.type_.as_deref() == Some("LoadBalancer");
        let cluster_ip = format!("10.96.{}.{}", id / 250, id % 250 + 1);
        spec.cluster_ip = Some(cluster_ip.clone());
        spec.cluster_ips = Some(vec![cluster_ip]);
        spec.type_.get_or_insert_with(|| "ClusterIP".to_string());
        spec.session_affinity.get_or_insert_with(|| "None".to_string());
        spec.internal_traffic_policy.get_or_insert_with(|| "Cluster".to_string());
        for port in spec.ports.iter_mut().flatten() {
            port.protocol.get_or_insert_with(|| "TCP".to_string());
            if is_load_balancer && port.node_port.is_none() {
                port.node_port = Some(30000 + self.next_id() as i32);
            }
        }
    }
}

fn owned_key(service: &Service) -> (String, String) {
    (
        service.metadata.namespace.clone().unwrap_or_default(),
        service.metadata.name.clone().unwrap_or_default(),
    )
}

#[async_trait::async_trait]
impl ServiceStore for MockServiceStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Service, StoreError> {
        self.record(MockOperation::Get)?;
        self.stored(namespace, name)
            .ok_or_else(|| StoreError::NotFound(format!("services \"{}\" not found", name)))
    }

    async fn create(&self, service: &Service) -> Result<Service, StoreError> {
        self.record(MockOperation::Create)?;
        let (namespace, name) = object_key(service)?;
        let key = (namespace.to_string(), name.to_string());
        if self.services.lock().unwrap().contains_key(&key) {
            return Err(StoreError::Api(kube::Error::Service(
                format!("services \"{}\" already exists", name).into(),
            )));
        }

        let mut created = service.clone();
        self.apply_server_defaults(&mut created);
        self.services.lock().unwrap().insert(key, created.clone());
        Ok(created)
    }

    async fn update(&self, service: &Service) -> Result<Service, StoreError> {
        self.record(MockOperation::Update)?;
        let (namespace, name) = object_key(service)?;
        let key = (namespace.to_string(), name.to_string());
        if !self.services.lock().unwrap().contains_key(&key) {
            return Err(StoreError::NotFound(format!("services \"{}\" not found", name)));
        }

        let mut updated = service.clone();
        updated.metadata.resource_version = Some(self.next_id().to_string());
        self.services.lock().unwrap().insert(key, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, service: &Service) -> Result<(), StoreError> {
        self.record(MockOperation::Delete)?;
        let (namespace, name) = object_key(service)?;
        let key = (namespace.to_string(), name.to_string());
        if self.vanish_on_delete.lock().unwrap().remove(&key) {
            self.services.lock().unwrap().remove(&key);
        }
        match self.services.lock().unwrap().remove(&key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("services \"{}\" not found", name))),
        }
    }
}
