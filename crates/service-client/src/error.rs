//! Service store errors

use thiserror::Error;

/// Errors that can occur when reading or writing Services
#[derive(Debug, Error)]
pub enum StoreError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Kubernetes API error (other than 404)
    #[error("Kubernetes API error: {0}")]
    Api(#[source] kube::Error),

    /// Invalid request (e.g., object missing name or namespace)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl StoreError {
    /// Returns true when the error is the benign "resource does not exist" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound(ae.message),
            other => StoreError::Api(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(
            kube::core::ErrorResponse {
                status: "Failure".to_string(),
                message: format!("services \"envoy\" {}", reason),
                reason: reason.to_string(),
                code,
            }
            .into(),
        )
    }

    #[test]
    fn test_404_maps_to_not_found() {
        let err = StoreError::from(api_error(404, "NotFound"));
        assert!(err.is_not_found());
        match err {
            StoreError::NotFound(msg) => assert_eq!(msg, "services \"envoy\" NotFound"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_other_api_codes_map_to_api_error() {
        for code in [409, 500] {
            let err = StoreError::from(api_error(code, "Failed"));
            assert!(!err.is_not_found(), "{} should not be NotFound", code);
            assert!(matches!(err, StoreError::Api(kube::Error::Api(_))));
        }
    }

    #[test]
    fn test_non_api_error_maps_to_api_error() {
        let err = StoreError::from(kube::Error::Service("connection reset".into()));
        assert!(!err.is_not_found());
        assert!(matches!(err, StoreError::Api(kube::Error::Service(_))));
    }
}
