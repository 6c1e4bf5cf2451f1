use serde::{Deserialize, Serialize};

/// Error codes the portal distinguishes when a backend call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCredentials,
    AccessDenied,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    InvalidInput,
    InternalError,
}

impl ErrorCode {
    /// Classify an HTTP status returned by the backend.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 409 | 422 => Self::InvalidInput,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            _ => Self::InternalError,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error body returned by the backend on failed requests.
///
/// Every field is optional; the backend is inconsistent about which ones it fills in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    /// Field-level validation failures, passed through as-is.
    #[serde(default)]
    pub errors: Option<Vec<serde_json::Value>>,
}
