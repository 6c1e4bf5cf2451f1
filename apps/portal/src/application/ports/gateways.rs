use async_trait::async_trait;
use chrono::{DateTime, Utc};

use alasr_types::{
    AddMember, CreateMasjid, CreateUser, LoginCredentials, Masjid, MasjidMember,
    MasjidStatistics, Question, QuestionStatistics, UpdateMasjid, UpdateUser, User,
};

use crate::app_error::AppResult;

// ============================================================================
// Resource gateways
// ============================================================================

/// Masjid endpoints as seen by the use cases.
#[async_trait]
pub trait MasjidGateway: Send + Sync {
    /// `use_cache = false` forces a network call.
    async fn list(&self, use_cache: bool) -> AppResult<Vec<Masjid>>;
    async fn get(&self, id: &str) -> AppResult<Masjid>;
    async fn create(&self, masjid: &CreateMasjid) -> AppResult<Masjid>;
    async fn update(&self, id: &str, changes: &UpdateMasjid) -> AppResult<Masjid>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn statistics(&self, id: &str) -> AppResult<MasjidStatistics>;
    async fn members(&self, id: &str) -> AppResult<Vec<MasjidMember>>;
    async fn add_member(&self, masjid_id: &str, member: &AddMember) -> AppResult<()>;
    async fn remove_member(&self, masjid_id: &str, user_id: &str) -> AppResult<()>;
}

#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<User>>;
    async fn get(&self, id: &str) -> AppResult<User>;
    async fn create(&self, user: &CreateUser) -> AppResult<User>;
    async fn update(&self, id: &str, changes: &UpdateUser) -> AppResult<User>;
    async fn promote(&self, id: &str) -> AppResult<User>;
    async fn demote(&self, id: &str) -> AppResult<User>;
    async fn activate(&self, id: &str) -> AppResult<User>;
    async fn deactivate(&self, id: &str) -> AppResult<User>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn super_admins(&self) -> AppResult<Vec<User>>;
    fn clear_cache(&self);
}

#[async_trait]
pub trait QuestionGateway: Send + Sync {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<Question>>;
    /// Uncached questions of one masjid.
    async fn by_masjid(&self, masjid_id: &str) -> AppResult<Vec<Question>>;
    async fn get(&self, id: &str) -> AppResult<Question>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn masjid_statistics(&self, masjid_id: &str) -> AppResult<QuestionStatistics>;
}

// ============================================================================
// Session
// ============================================================================

#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<User>;
    async fn logout(&self) -> AppResult<()>;
    fn current_user(&self) -> Option<User>;
    fn is_authenticated(&self) -> bool;
    fn session_expiry(&self) -> Option<DateTime<Utc>>;
}
