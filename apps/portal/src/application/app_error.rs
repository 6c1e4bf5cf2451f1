use alasr_sdk::PortalError;
use alasr_types::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not signed in. Run `alasr-portal login` first.")]
    NotAuthenticated,
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Portal(PortalError::Api { code, .. }) => *code,
            AppError::Portal(PortalError::InvalidCredentials(_)) => ErrorCode::InvalidCredentials,
            AppError::Portal(PortalError::AccessDenied) => ErrorCode::AccessDenied,
            AppError::Portal(PortalError::SessionExpired) => ErrorCode::Unauthorized,
            AppError::Portal(_) => ErrorCode::InternalError,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::NotAuthenticated => ErrorCode::Unauthorized,
        }
    }

    /// The stored session can no longer authenticate requests.
    pub fn ends_session(&self) -> bool {
        match self {
            AppError::Portal(PortalError::SessionExpired) | AppError::NotAuthenticated => true,
            AppError::Portal(e) => e.status() == Some(401),
            _ => false,
        }
    }

    /// Message shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Portal(PortalError::Api { status: 429, .. }) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
