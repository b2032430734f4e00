//! Ownership labels.
//!
//! A Service is owned by a Contour when it carries both owning-contour labels
//! with values equal to the Contour's name and namespace. Reconcilers check
//! this before every update or delete of an existing Service.

use crate::parent::ParentRef;
use crds::{OWNING_CONTOUR_NAME_LABEL, OWNING_CONTOUR_NS_LABEL};
use k8s_openapi::api::core::v1::Service;
use std::collections::BTreeMap;

/// Labels identifying `parent` as the owner of a resource.
pub fn owner_labels(parent: &ParentRef) -> BTreeMap<String, String> {
    BTreeMap::from([
        (OWNING_CONTOUR_NAME_LABEL.to_string(), parent.name.clone()),
        (OWNING_CONTOUR_NS_LABEL.to_string(), parent.namespace.clone()),
    ])
}

/// Returns true iff `service` carries both owner labels matching `parent` exactly.
pub fn is_owned_by(service: &Service, parent: &ParentRef) -> bool {
    let Some(labels) = service.metadata.labels.as_ref() else {
        return false;
    };
    labels.get(OWNING_CONTOUR_NAME_LABEL) == Some(&parent.name)
        && labels.get(OWNING_CONTOUR_NS_LABEL) == Some(&parent.namespace)
}
