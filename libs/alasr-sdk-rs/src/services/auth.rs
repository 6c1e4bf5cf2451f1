use std::sync::Arc;

use alasr_types::{access_token_expiry, LoginCredentials, LoginResponse, User};
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::client::{ApiClient, SessionEvent, LOGIN_PATH};
use crate::credentials::Credentials;
use crate::error::PortalError;

#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Sign in and store the session.
    ///
    /// Only super admins may use the portal; any other account is rejected with
    /// `PortalError::AccessDenied` and nothing is stored.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, PortalError> {
        let body = match self.api.post_json(LOGIN_PATH, credentials).await {
            Ok(body) => body,
            Err(PortalError::Api { status: 401, message, .. }) => {
                warn!("Login rejected");
                return Err(PortalError::InvalidCredentials(message));
            }
            Err(e) => return Err(e),
        };

        let response: LoginResponse = serde_json::from_value(body)
            .map_err(|e| PortalError::Decode(format!("Invalid response from server: {e}")))?;
        let payload = response
            .data
            .ok_or_else(|| PortalError::Decode("Invalid response from server".to_string()))?;
        let user = payload
            .user
            .ok_or_else(|| PortalError::Decode("User data not found in response".to_string()))?;

        if !user.is_super_admin {
            warn!(user_id = %user.id, "Non super admin login attempt");
            return Err(PortalError::AccessDenied);
        }

        self.api.credentials().save(&Credentials {
            access_token: Some(payload.access_token),
            refresh_token: Some(payload.refresh_token),
            user: Some(user.clone()),
        })?;

        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Sign out. Stored credentials are cleared even when the backend call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), PortalError> {
        let result = self.api.post("/auth/logout", None).await;

        self.api.credentials().clear()?;
        self.api.publish(SessionEvent::LoggedOut);

        match result {
            Ok(_) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Logout call failed, local session cleared");
                Err(e)
            }
        }
    }

    /// Explicitly exchange the stored refresh token for a new access token.
    pub async fn refresh_token(&self) -> Result<String, PortalError> {
        let refresh_token = self
            .api
            .credentials()
            .load()
            .refresh_token
            .ok_or(PortalError::SessionExpired)?;
        self.api.refresh_access_token(&refresh_token).await
    }

    pub fn current_user(&self) -> Option<User> {
        self.api.credentials().load().user
    }

    /// A stored access token and a stored super-admin user.
    pub fn is_authenticated(&self) -> bool {
        let credentials = self.api.credentials().load();
        credentials.access_token.is_some()
            && credentials.user.is_some_and(|u| u.is_super_admin)
    }

    /// Expiry of the stored access token, when it carries one.
    pub fn session_expiry(&self) -> Option<DateTime<Utc>> {
        let token = self.api.credentials().load().access_token?;
        access_token_expiry(&token).ok().flatten()
    }
}
