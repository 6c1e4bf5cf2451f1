use std::sync::Arc;

use tracing::{info, instrument, warn};

use alasr_types::{CreateUser, UpdateUser, User};

use crate::app_error::{AppError, AppResult};
use crate::application::ports::{MasjidGateway, UserGateway};
use crate::application::state::PortalState;
use crate::application::validators::{is_present, is_valid_email, matches_term};

#[derive(Clone)]
pub struct UsersUseCases {
    users: Arc<dyn UserGateway>,
    masajids: Arc<dyn MasjidGateway>,
}

impl UsersUseCases {
    pub fn new(users: Arc<dyn UserGateway>, masajids: Arc<dyn MasjidGateway>) -> Self {
        Self { users, masajids }
    }

    /// Load the user list, bypassing the cache.
    #[instrument(skip(self, state))]
    pub async fn load(&self, state: &mut PortalState) -> AppResult<()> {
        state.users.set_loading(true);
        match self.users.list(false).await {
            Ok(items) => {
                info!(count = items.len(), "Users loaded");
                state.users.set_items(items);
                Ok(())
            }
            Err(e) => {
                state.users.set_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Masajids for the assignment form. Cached.
    #[instrument(skip(self, state))]
    pub async fn load_masajids_for_forms(&self, state: &mut PortalState) {
        match self.masajids.list(true).await {
            Ok(items) => state.masajids.set_items(items),
            Err(e) => warn!(error = %e, "Failed to load masajids for assignment"),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> AppResult<User> {
        self.users.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn super_admins(&self) -> AppResult<Vec<User>> {
        self.users.super_admins().await
    }

    /// Create a user, optionally assigned to a masjid, then reload the list.
    #[instrument(skip(self, state, user), fields(email = %user.email))]
    pub async fn create(&self, state: &mut PortalState, user: CreateUser) -> AppResult<User> {
        if !is_present(&user.name) || !is_present(&user.password) {
            return Err(AppError::InvalidInput(
                "Please fill in all required fields".into(),
            ));
        }
        if !is_valid_email(&user.email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }

        let created = self.users.create(&user).await?;
        match &created.masjid_assignment {
            Some(assignment) => info!(
                user_id = %created.id,
                masjid_id = %assignment.masjid_id,
                role = %assignment.role,
                "User created with masjid assignment"
            ),
            None => info!(user_id = %created.id, "User created"),
        }

        self.users.clear_cache();
        if let Err(e) = self.load(state).await {
            warn!(error = %e, "Reload after create failed");
        }
        Ok(created)
    }

    #[instrument(skip(self, state, changes))]
    pub async fn update(
        &self,
        state: &mut PortalState,
        id: &str,
        changes: UpdateUser,
    ) -> AppResult<User> {
        if changes.name.as_deref().is_some_and(|n| !is_present(n)) {
            return Err(AppError::InvalidInput("Name cannot be empty".into()));
        }
        if changes.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }

        let updated = self.users.update(id, &changes).await?;
        self.apply(state, updated.clone());
        info!(user_id = %updated.id, "User updated");
        Ok(updated)
    }

    #[instrument(skip(self, state))]
    pub async fn promote(&self, state: &mut PortalState, id: &str) -> AppResult<User> {
        let updated = self.users.promote(id).await?;
        self.apply(state, updated.clone());
        info!(user_id = %updated.id, "User promoted to super admin");
        Ok(updated)
    }

    #[instrument(skip(self, state))]
    pub async fn demote(&self, state: &mut PortalState, id: &str) -> AppResult<User> {
        let updated = self.users.demote(id).await?;
        self.apply(state, updated.clone());
        info!(user_id = %updated.id, "User demoted from super admin");
        Ok(updated)
    }

    /// Deactivate an active user, activate an inactive one.
    pub async fn toggle_active(&self, state: &mut PortalState, user: &User) -> AppResult<User> {
        self.set_active(state, &user.id, !user.is_active).await
    }

    #[instrument(skip(self, state))]
    pub async fn set_active(
        &self,
        state: &mut PortalState,
        id: &str,
        active: bool,
    ) -> AppResult<User> {
        let updated = if active {
            self.users.activate(id).await?
        } else {
            self.users.deactivate(id).await?
        };
        self.apply(state, updated.clone());
        info!(user_id = %updated.id, is_active = updated.is_active, "User status changed");
        Ok(updated)
    }

    #[instrument(skip(self, state))]
    pub async fn delete(&self, state: &mut PortalState, id: &str) -> AppResult<()> {
        self.users.delete(id).await?;
        state.users.remove(id);
        self.users.clear_cache();
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    fn apply(&self, state: &mut PortalState, updated: User) {
        state.users.update(updated);
        self.users.clear_cache();
    }
}

/// Users whose name or email contains `term`, ignoring case.
pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| matches_term(&u.name, term) || matches_term(&u.email, term))
        .collect()
}
