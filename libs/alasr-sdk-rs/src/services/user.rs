use std::sync::Arc;
use std::time::Duration;

use alasr_types::{normalize_object, normalize_user_write, CreateUser, UpdateUser, User};
use futures::FutureExt;
use tracing::{info, instrument};

use super::{decode_list, segment};
use crate::cache::ListCache;
use crate::client::ApiClient;
use crate::error::PortalError;

const USERS_PATH: &str = "/super-admin/users";

#[derive(Clone)]
pub struct UserService {
    api: Arc<ApiClient>,
    cache: Arc<ListCache<User>>,
}

impl UserService {
    pub fn new(api: Arc<ApiClient>, freshness: Duration) -> Self {
        Self {
            api,
            cache: Arc::new(ListCache::new("users", freshness)),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self, use_cache: bool) -> Result<Arc<Vec<User>>, PortalError> {
        let api = Arc::clone(&self.api);
        self.cache
            .get_or_fetch(use_cache, move || {
                async move {
                    let body = api.get(USERS_PATH).await?;
                    decode_list("users", body)
                }
                .boxed()
            })
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, PortalError> {
        let body = self.api.get(&user_path(id)).await?;
        Ok(normalize_object(body)?)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: &CreateUser) -> Result<User, PortalError> {
        let result = self.api.post_json(USERS_PATH, user).await;
        self.cache.invalidate();
        let created = normalize_user_write(result?)?;
        info!(user_id = %created.id, "User created");
        Ok(created)
    }

    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: &UpdateUser) -> Result<User, PortalError> {
        let result = self.api.put_json(&user_path(id), changes).await;
        self.cache.invalidate();
        Ok(normalize_user_write(result?)?)
    }

    pub async fn promote(&self, id: &str) -> Result<User, PortalError> {
        self.transition(id, "promote").await
    }

    pub async fn demote(&self, id: &str) -> Result<User, PortalError> {
        self.transition(id, "demote").await
    }

    pub async fn activate(&self, id: &str) -> Result<User, PortalError> {
        self.transition(id, "activate").await
    }

    pub async fn deactivate(&self, id: &str) -> Result<User, PortalError> {
        self.transition(id, "deactivate").await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), PortalError> {
        let result = self.api.delete(&user_path(id)).await;
        self.cache.invalidate();
        result?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Current super admins. Not cached.
    pub async fn super_admins(&self) -> Result<Vec<User>, PortalError> {
        let body = self.api.get("/super-admin/list").await?;
        decode_list("super admins", body)
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate();
    }

    #[instrument(skip(self))]
    async fn transition(&self, id: &str, action: &'static str) -> Result<User, PortalError> {
        let result = self
            .api
            .put(&format!("{}/{}", user_path(id), action), None)
            .await;
        self.cache.invalidate();
        let user = normalize_object(result?)?;
        info!(user_id = %id, action, "User updated");
        Ok(user)
    }
}

fn user_path(id: &str) -> String {
    format!("{}/{}", USERS_PATH, segment(id))
}
