use std::sync::Arc;

use alasr_types::{normalize_object, ApiErrorBody, ErrorCode, RefreshTokenRequest, RefreshTokenResponse};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::credentials::CredentialStore;
use crate::error::PortalError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh-token";

/// Session lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Token refresh failed and credentials were cleared; the user must log in again.
    Expired,
    LoggedOut,
}

/// Authenticated request wrapper around a `Transport`.
///
/// Attaches the stored access token to every request. A 401 triggers one token
/// refresh and one retry of the original request; a failed refresh clears the
/// stored credentials and publishes `SessionEvent::Expired`.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Create a client backed by `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Config` if the base URL is missing or invalid.
    #[cfg(feature = "client")]
    pub fn new(
        config: &crate::transport::TransportConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, PortalError> {
        let transport = crate::transport::ReqwestTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), credentials))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            transport,
            credentials,
            events,
        }
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub async fn get(&self, path: &str) -> Result<Value, PortalError> {
        self.execute(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, PortalError> {
        self.execute(Method::Post, path, body).await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, PortalError> {
        self.execute(Method::Put, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, PortalError> {
        self.execute(Method::Delete, path, None).await
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, PortalError> {
        self.post(path, Some(to_value(body)?)).await
    }

    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, PortalError> {
        self.put(path, Some(to_value(body)?)).await
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, PortalError> {
        debug!(%method, path, "API request");

        let request = ApiRequest {
            method,
            path: path.to_string(),
            body,
            bearer: self.credentials.load().access_token,
        };

        let response = self.transport.send(request.clone()).await.inspect_err(|e| {
            warn!(%method, path, error = %e, "No response from backend");
        })?;

        if response.status != 401 || is_auth_path(path) {
            return into_result(path, response);
        }

        let Some(refresh_token) = self.credentials.load().refresh_token else {
            return into_result(path, response);
        };

        info!(path, "Access token rejected, refreshing");
        let access_token = match self.refresh_access_token(&refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.expire_session();
                return Err(PortalError::SessionExpired);
            }
        };

        let retry = ApiRequest {
            bearer: Some(access_token),
            ..request
        };
        let response = self.transport.send(retry).await?;
        into_result(path, response)
    }

    /// Exchange `refresh_token` for a new access token and store it.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, PortalError> {
        let body = to_value(&RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        })?;
        let request = ApiRequest {
            method: Method::Post,
            path: REFRESH_PATH.to_string(),
            body: Some(body),
            bearer: None,
        };

        let response = self.transport.send(request).await?;
        let body = into_result(REFRESH_PATH, response)?;
        let refreshed: RefreshTokenResponse = normalize_object(body)?;

        let mut credentials = self.credentials.load();
        credentials.access_token = Some(refreshed.access_token.clone());
        self.credentials.save(&credentials)?;

        debug!("Access token refreshed");
        Ok(refreshed.access_token)
    }

    fn expire_session(&self) {
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.publish(SessionEvent::Expired);
    }
}

fn is_auth_path(path: &str) -> bool {
    path == LOGIN_PATH || path == REFRESH_PATH
}

fn to_value<B: Serialize>(body: &B) -> Result<Value, PortalError> {
    serde_json::to_value(body).map_err(|e| PortalError::Decode(e.to_string()))
}

fn into_result(path: &str, response: ApiResponse) -> Result<Value, PortalError> {
    if response.is_success() {
        return Ok(response.body);
    }
    Err(api_error(path, response))
}

fn api_error(path: &str, response: ApiResponse) -> PortalError {
    let status = response.status;
    let parsed: ApiErrorBody = serde_json::from_value(response.body).unwrap_or_default();

    if let Some(errors) = &parsed.errors {
        for (index, error) in errors.iter().enumerate() {
            warn!(path, index = index + 1, %error, "Validation error");
        }
    }

    let message = parsed.message.unwrap_or_else(|| match status {
        404 => format!("The requested endpoint was not found: {path}"),
        429 => "Too many requests. Please wait a moment and try again.".to_string(),
        _ => format!("Request failed with status {status}"),
    });

    match status {
        403 => warn!(path, "Access forbidden"),
        429 => warn!(path, "Rate limited by backend"),
        500..=599 => warn!(path, status, %message, "Backend error"),
        _ => {}
    }

    PortalError::Api {
        status,
        code: ErrorCode::from_status(status),
        message,
    }
}
