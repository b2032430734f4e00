//! Parent identity extracted from a Contour.

use crate::error::ControllerError;
use crds::Contour;

/// Identity of the Contour driving a reconciliation pass.
///
/// Captured once per pass so every step sees the same values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    /// Contour name
    pub name: String,
    /// Namespace the Contour itself lives in
    pub namespace: String,
    /// Namespace the child Services are placed in
    pub child_namespace: String,
}

impl ParentRef {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        child_namespace: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            child_namespace: child_namespace.into(),
        }
    }

    /// Extract the parent identity from a Contour.
    ///
    /// A Contour without a name cannot own anything and is rejected.
    pub fn from_contour(contour: &Contour) -> Result<Self, ControllerError> {
        let name = contour
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| ControllerError::InvalidResource("Contour missing name".to_string()))?;
        let namespace = contour.metadata.namespace.as_deref().unwrap_or("default");

        Ok(Self::new(name, namespace, contour.child_namespace()))
    }
}

impl std::fmt::Display for ParentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::ContourSpec;

    #[test]
    fn test_from_contour_reads_identity_and_child_namespace() {
        let mut contour = Contour::new("contour-sample", ContourSpec::default());
        contour.metadata.namespace = Some("operators".to_string());
        contour.spec.namespace.name = "ingress".to_string();

        let parent = ParentRef::from_contour(&contour).unwrap();
        assert_eq!(parent, ParentRef::new("contour-sample", "operators", "ingress"));
        assert_eq!(parent.to_string(), "operators/contour-sample");
    }

    #[test]
    fn test_from_contour_defaults_namespace() {
        let contour = Contour::new("contour-sample", ContourSpec::default());
        let parent = ParentRef::from_contour(&contour).unwrap();
        assert_eq!(parent.namespace, "default");
        assert_eq!(parent.child_namespace, "projectcontour");
    }

    #[test]
    fn test_from_contour_rejects_missing_name() {
        let mut contour = Contour::new("contour-sample", ContourSpec::default());
        contour.metadata.name = None;
        assert!(matches!(
            ParentRef::from_contour(&contour),
            Err(ControllerError::InvalidResource(_))
        ));
    }
}
