//! Well-known label keys applied to operator-managed resources.

/// Label holding the name of the Contour that owns a resource.
pub const OWNING_CONTOUR_NAME_LABEL: &str =
    "contour.operator.projectcontour.io/owning-contour-name";

/// Label holding the namespace of the Contour that owns a resource.
pub const OWNING_CONTOUR_NS_LABEL: &str =
    "contour.operator.projectcontour.io/owning-contour-namespace";
