use super::backend::BackendError;
use thiserror::Error;

/// Failure of a gateway flow.
///
/// The `Display` output is the status text shown to the user, and is the
/// same for every flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Rejected before dispatch. Nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The service answered with `success: false`.
    #[error("Error: {0}")]
    Rejected(String),

    /// The service was unreachable or its reply could not be understood.
    #[error("Network error: {0}")]
    Network(String),
}

impl GatewayError {
    /// Builds a rejection from a reply's optional error text.
    pub(crate) fn rejected(error: Option<String>) -> Self {
        GatewayError::Rejected(error.unwrap_or_else(|| "unknown error".to_string()))
    }

    /// Builds a network error for a success reply that lacks `field`.
    pub(crate) fn missing_field(field: &str) -> Self {
        GatewayError::Network(format!("malformed reply: missing `{}`", field))
    }
}

impl From<BackendError> for GatewayError {
    fn from(e: BackendError) -> Self {
        GatewayError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(
            GatewayError::Validation("Cannot save empty composition".into()).to_string(),
            "Cannot save empty composition"
        );
        assert_eq!(
            GatewayError::Rejected("bad tempo".into()).to_string(),
            "Error: bad tempo"
        );
        assert_eq!(
            GatewayError::from(BackendError::Unreachable("timed out".into())).to_string(),
            "Network error: service unreachable: timed out"
        );
    }

    #[test]
    fn test_parse_failure_is_network_error() {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(matches!(GatewayError::from(err), GatewayError::Network(_)));
    }

    #[test]
    fn test_rejection_without_text() {
        assert_eq!(
            GatewayError::rejected(None),
            GatewayError::Rejected("unknown error".into())
        );
    }
}
