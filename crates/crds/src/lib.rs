//! Contour Operator CRD Definitions
//!
//! Kubernetes Custom Resource Definitions and shared label keys for the
//! Contour operator controllers.

pub mod contour;
pub mod labels;

pub use contour::*;
pub use labels::*;
