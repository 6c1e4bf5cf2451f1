//! Gateway implementations backed by the SDK services.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use alasr_sdk::{MasjidService, PortalServices, QuestionService, UserService};
use alasr_types::{
    AddMember, CreateMasjid, CreateUser, LoginCredentials, Masjid, MasjidMember,
    MasjidStatistics, Question, QuestionStatistics, UpdateMasjid, UpdateUser, User,
};

use crate::app_error::AppResult;
use crate::application::ports::{MasjidGateway, QuestionGateway, SessionGateway, UserGateway};

#[async_trait]
impl MasjidGateway for MasjidService {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<Masjid>> {
        Ok(Arc::unwrap_or_clone(self.get_all(use_cache).await?))
    }

    async fn get(&self, id: &str) -> AppResult<Masjid> {
        Ok(self.get_by_id(id).await?)
    }

    async fn create(&self, masjid: &CreateMasjid) -> AppResult<Masjid> {
        Ok(MasjidService::create(self, masjid).await?)
    }

    async fn update(&self, id: &str, changes: &UpdateMasjid) -> AppResult<Masjid> {
        Ok(MasjidService::update(self, id, changes).await?)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        Ok(MasjidService::delete(self, id).await?)
    }

    async fn statistics(&self, id: &str) -> AppResult<MasjidStatistics> {
        Ok(MasjidService::statistics(self, id).await?)
    }

    async fn members(&self, id: &str) -> AppResult<Vec<MasjidMember>> {
        Ok(MasjidService::members(self, id).await?)
    }

    async fn add_member(&self, masjid_id: &str, member: &AddMember) -> AppResult<()> {
        Ok(MasjidService::add_member(self, masjid_id, member).await?)
    }

    async fn remove_member(&self, masjid_id: &str, user_id: &str) -> AppResult<()> {
        Ok(MasjidService::remove_member(self, masjid_id, user_id).await?)
    }
}

#[async_trait]
impl UserGateway for UserService {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<User>> {
        Ok(Arc::unwrap_or_clone(self.get_all(use_cache).await?))
    }

    async fn get(&self, id: &str) -> AppResult<User> {
        Ok(self.get_by_id(id).await?)
    }

    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        Ok(UserService::create(self, user).await?)
    }

    async fn update(&self, id: &str, changes: &UpdateUser) -> AppResult<User> {
        Ok(UserService::update(self, id, changes).await?)
    }

    async fn promote(&self, id: &str) -> AppResult<User> {
        Ok(UserService::promote(self, id).await?)
    }

    async fn demote(&self, id: &str) -> AppResult<User> {
        Ok(UserService::demote(self, id).await?)
    }

    async fn activate(&self, id: &str) -> AppResult<User> {
        Ok(UserService::activate(self, id).await?)
    }

    async fn deactivate(&self, id: &str) -> AppResult<User> {
        Ok(UserService::deactivate(self, id).await?)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        Ok(UserService::delete(self, id).await?)
    }

    async fn super_admins(&self) -> AppResult<Vec<User>> {
        Ok(UserService::super_admins(self).await?)
    }

    fn clear_cache(&self) {
        UserService::clear_cache(self);
    }
}

#[async_trait]
impl QuestionGateway for QuestionService {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<Question>> {
        Ok(Arc::unwrap_or_clone(self.get_all(use_cache).await?))
    }

    async fn by_masjid(&self, masjid_id: &str) -> AppResult<Vec<Question>> {
        Ok(QuestionService::by_masjid(self, masjid_id).await?)
    }

    async fn get(&self, id: &str) -> AppResult<Question> {
        Ok(self.get_by_id(id).await?)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        Ok(QuestionService::delete(self, id).await?)
    }

    async fn masjid_statistics(&self, masjid_id: &str) -> AppResult<QuestionStatistics> {
        Ok(QuestionService::masjid_statistics(self, masjid_id).await?)
    }
}

/// The session spans every service: signing out also drops their caches.
#[async_trait]
impl SessionGateway for PortalServices {
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<User> {
        Ok(self.auth.login(credentials).await?)
    }

    async fn logout(&self) -> AppResult<()> {
        let result = self.auth.logout().await;
        self.clear_caches();
        Ok(result?)
    }

    fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }

    fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    fn session_expiry(&self) -> Option<DateTime<Utc>> {
        self.auth.session_expiry()
    }
}
