use alasr_types::{EnvelopeError, ErrorCode};
use thiserror::Error;

/// SDK errors.
///
/// `Clone` so that the failure of one in-flight fetch can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, Error)]
pub enum PortalError {
    /// Client is not configured (e.g. no API base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Login rejected by the backend
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Login succeeded but the account may not use the portal
    #[error("Access denied. Only super admins can access this portal.")]
    AccessDenied,

    /// Token refresh failed; stored credentials have been cleared
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Backend answered with a non-success status
    #[error("API error: {code} ({status}) - {message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Response received but not in any shape we understand
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Reading or writing stored credentials failed
    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl PortalError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True when the request never produced a response.
    pub fn is_network(&self) -> bool {
        matches!(self, PortalError::Network(_))
    }
}

impl From<EnvelopeError> for PortalError {
    fn from(e: EnvelopeError) -> Self {
        PortalError::Decode(e.to_string())
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        PortalError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> PortalError {
        PortalError::Api {
            status,
            code: ErrorCode::from_status(status),
            message: "x".into(),
        }
    }

    #[test]
    fn test_classification() {
        assert!(api(429).is_rate_limited());
        assert!(api(404).is_not_found());
        assert!(!api(500).is_rate_limited());
        assert!(PortalError::Network("down".into()).is_network());
        assert_eq!(PortalError::Network("down".into()).status(), None);
    }

    #[test]
    fn test_display_is_user_facing() {
        assert_eq!(
            api(429).to_string(),
            "API error: RATE_LIMITED (429) - x"
        );
        assert_eq!(
            PortalError::AccessDenied.to_string(),
            "Access denied. Only super admins can access this portal."
        );
    }
}
