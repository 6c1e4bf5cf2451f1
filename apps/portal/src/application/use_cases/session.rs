use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use alasr_types::{LoginCredentials, User};

use crate::app_error::{AppError, AppResult};
use crate::application::ports::SessionGateway;
use crate::application::state::PortalState;
use crate::application::validators::{is_present, is_valid_email};

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub user: User,
    /// Expiry of the stored access token, when it carries one.
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct SessionUseCases {
    session: Arc<dyn SessionGateway>,
}

impl SessionUseCases {
    pub fn new(session: Arc<dyn SessionGateway>) -> Self {
        Self { session }
    }

    /// Sign in as a super admin.
    #[instrument(skip(self, state, password))]
    pub async fn login(
        &self,
        state: &mut PortalState,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        let email = email.trim();
        if !is_present(email) || !is_present(password) {
            return Err(AppError::InvalidInput(
                "Please enter email and password".into(),
            ));
        }
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }

        let user = self
            .session
            .login(&LoginCredentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        info!(user_id = %user.id, "Signed in");
        state.session = Some(user.clone());
        Ok(user)
    }

    /// Sign out. Local session state is cleared even when the backend call fails.
    #[instrument(skip(self, state))]
    pub async fn logout(&self, state: &mut PortalState) {
        if let Err(e) = self.session.logout().await {
            warn!(error = %e, "Logout request failed, local session cleared anyway");
        }
        *state = PortalState::default();
        info!("Signed out");
    }

    pub fn whoami(&self) -> AppResult<SessionInfo> {
        if !self.session.is_authenticated() {
            return Err(AppError::NotAuthenticated);
        }
        let user = self.session.current_user().ok_or(AppError::NotAuthenticated)?;
        Ok(SessionInfo {
            user,
            expires_at: self.session.session_expiry(),
        })
    }

    /// Restore the signed-in user into fresh state. False when there is no usable session.
    pub fn restore(&self, state: &mut PortalState) -> bool {
        state.session = self
            .session
            .is_authenticated()
            .then(|| self.session.current_user())
            .flatten();
        state.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_user, InMemorySessionGateway};
    use alasr_sdk::PortalError;
    use chrono::TimeZone;

    fn use_cases(session: Arc<InMemorySessionGateway>) -> SessionUseCases {
        SessionUseCases::new(session)
    }

    #[tokio::test]
    async fn test_login_validates_input() {
        let session = Arc::new(InMemorySessionGateway::new());
        let use_cases = use_cases(session.clone());
        let mut state = PortalState::default();

        assert!(matches!(
            use_cases.login(&mut state, "", "pw").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            use_cases.login(&mut state, "not-an-email", "pw").await,
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(session.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let admin = create_test_user(|u| {
            u.email = "admin@alasr.app".into();
            u.is_super_admin = true;
        });
        let session = Arc::new(InMemorySessionGateway::accepting(admin.clone(), "pw"));
        let use_cases = use_cases(session);
        let mut state = PortalState::default();

        let user = use_cases
            .login(&mut state, " admin@alasr.app ", "pw")
            .await
            .unwrap();

        assert_eq!(user.id, admin.id);
        assert_eq!(state.session.as_ref().map(|u| u.id.as_str()), Some(admin.id.as_str()));
        assert_eq!(use_cases.whoami().unwrap().user.id, admin.id);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let admin = create_test_user(|u| {
            u.email = "admin@alasr.app".into();
            u.is_super_admin = true;
        });
        let use_cases = use_cases(Arc::new(InMemorySessionGateway::accepting(admin, "pw")));
        let mut state = PortalState::default();

        let err = use_cases
            .login(&mut state, "admin@alasr.app", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Portal(PortalError::InvalidCredentials(_))));
        assert!(state.session.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_state_even_on_failure() {
        let admin = create_test_user(|u| u.is_super_admin = true);
        let session = Arc::new(InMemorySessionGateway::signed_in(admin.clone()));
        session.fail_logout();
        let use_cases = use_cases(session);
        let mut state = PortalState::default();
        state.session = Some(admin);
        state.users.set_items(vec![create_test_user(|_| {})]);

        use_cases.logout(&mut state).await;

        assert!(state.session.is_none());
        assert!(state.users.items.is_empty());
        assert!(matches!(use_cases.whoami(), Err(AppError::NotAuthenticated)));
    }

    #[test]
    fn test_whoami_reports_expiry() {
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let admin = create_test_user(|u| u.is_super_admin = true);
        let session = InMemorySessionGateway::signed_in(admin).with_expiry(expiry);
        let use_cases = use_cases(Arc::new(session));

        assert_eq!(use_cases.whoami().unwrap().expires_at, Some(expiry));

        let mut state = PortalState::default();
        assert!(use_cases.restore(&mut state));
        assert!(state.session.is_some());
    }

    #[test]
    fn test_whoami_requires_session() {
        let use_cases = use_cases(Arc::new(InMemorySessionGateway::new()));
        assert!(matches!(use_cases.whoami(), Err(AppError::NotAuthenticated)));
    }
}
