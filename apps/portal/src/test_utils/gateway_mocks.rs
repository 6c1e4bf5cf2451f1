//! In-memory gateway implementations for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use alasr_sdk::PortalError;
use alasr_types::{
    AddMember, AssignmentUpdate, CreateMasjid, CreateUser, ErrorCode, LoginCredentials, Masjid,
    MasjidMember, MasjidStatistics, Question, QuestionStatistics, UpdateMasjid, UpdateUser, User,
};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{MasjidGateway, QuestionGateway, SessionGateway, UserGateway},
    test_utils::factories::next_id,
};

fn not_found(resource: &str, id: &str) -> AppError {
    AppError::Portal(PortalError::Api {
        status: 404,
        code: ErrorCode::NotFound,
        message: format!("{resource} {id} not found"),
    })
}

/// Records list calls and can fail the next one.
#[derive(Default)]
struct ListProbe {
    calls: Mutex<Vec<bool>>,
    fail_next: Mutex<Option<String>>,
}

impl ListProbe {
    fn record(&self, use_cache: bool) -> AppResult<()> {
        self.calls.lock().unwrap().push(use_cache);
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(AppError::Portal(PortalError::Network(message))),
            None => Ok(()),
        }
    }
}

// ============================================================================
// InMemoryMasjidGateway
// ============================================================================

#[derive(Default)]
pub struct InMemoryMasjidGateway {
    pub masajids: Mutex<Vec<Masjid>>,
    pub members: Mutex<HashMap<String, Vec<MasjidMember>>>,
    probe: ListProbe,
}

impl InMemoryMasjidGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_masajids(masajids: Vec<Masjid>) -> Self {
        Self {
            masajids: Mutex::new(masajids),
            ..Self::default()
        }
    }

    /// The `use_cache` flag of every list call so far.
    pub fn list_calls(&self) -> Vec<bool> {
        self.probe.calls.lock().unwrap().clone()
    }

    pub fn fail_next_list(&self, message: &str) {
        *self.probe.fail_next.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl MasjidGateway for InMemoryMasjidGateway {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<Masjid>> {
        self.probe.record(use_cache)?;
        Ok(self.masajids.lock().unwrap().clone())
    }

    async fn get(&self, id: &str) -> AppResult<Masjid> {
        self.masajids
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| not_found("Masjid", id))
    }

    async fn create(&self, masjid: &CreateMasjid) -> AppResult<Masjid> {
        let created = Masjid {
            id: next_id("masjid"),
            name: masjid.name.clone(),
            location: masjid.location.clone(),
            address: masjid.address.clone(),
            city: masjid.city.clone(),
            state: masjid.state.clone(),
            country: masjid.country.clone(),
            postal_code: masjid.postal_code.clone(),
            contact_email: masjid.contact_email.clone(),
            contact_phone: masjid.contact_phone.clone(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.masajids.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, changes: &UpdateMasjid) -> AppResult<Masjid> {
        let mut masajids = self.masajids.lock().unwrap();
        let masjid = masajids
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Masjid", id))?;

        if let Some(name) = &changes.name {
            masjid.name = name.clone();
        }
        let optional = [
            (&mut masjid.location, &changes.location),
            (&mut masjid.address, &changes.address),
            (&mut masjid.city, &changes.city),
            (&mut masjid.state, &changes.state),
            (&mut masjid.country, &changes.country),
            (&mut masjid.postal_code, &changes.postal_code),
            (&mut masjid.contact_email, &changes.contact_email),
            (&mut masjid.contact_phone, &changes.contact_phone),
        ];
        for (field, change) in optional {
            if change.is_some() {
                field.clone_from(change);
            }
        }
        masjid.updated_at = Some(Utc::now());
        Ok(masjid.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut masajids = self.masajids.lock().unwrap();
        let before = masajids.len();
        masajids.retain(|m| m.id != id);
        if masajids.len() == before {
            return Err(not_found("Masjid", id));
        }
        self.members.lock().unwrap().remove(id);
        Ok(())
    }

    async fn statistics(&self, id: &str) -> AppResult<MasjidStatistics> {
        self.get(id).await?;
        let total_members = self
            .members
            .lock()
            .unwrap()
            .get(id)
            .map_or(0, |m| m.len() as u64);
        Ok(MasjidStatistics {
            total_members,
            ..Default::default()
        })
    }

    async fn members(&self, id: &str) -> AppResult<Vec<MasjidMember>> {
        Ok(self.members.lock().unwrap().get(id).cloned().unwrap_or_default())
    }

    async fn add_member(&self, masjid_id: &str, member: &AddMember) -> AppResult<()> {
        self.get(masjid_id).await?;
        let entry = MasjidMember {
            id: next_id("member"),
            user_id: member.user_id.clone(),
            user_name: member.user_id.clone(),
            user_email: format!("{}@example.com", member.user_id),
            role: member.role,
            permissions: member.permissions.clone(),
            assigned_at: Some(Utc::now()),
        };
        self.members
            .lock()
            .unwrap()
            .entry(masjid_id.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn remove_member(&self, masjid_id: &str, user_id: &str) -> AppResult<()> {
        let mut members = self.members.lock().unwrap();
        let list = members
            .get_mut(masjid_id)
            .ok_or_else(|| not_found("Member", user_id))?;
        list.retain(|m| m.user_id != user_id);
        Ok(())
    }
}

// ============================================================================
// InMemoryUserGateway
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserGateway {
    pub users: Mutex<Vec<User>>,
    clear_cache_calls: AtomicUsize,
    probe: ListProbe,
}

impl InMemoryUserGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> Vec<bool> {
        self.probe.calls.lock().unwrap().clone()
    }

    pub fn fail_next_list(&self, message: &str) {
        *self.probe.fail_next.lock().unwrap() = Some(message.to_string());
    }

    pub fn clear_cache_calls(&self) -> usize {
        self.clear_cache_calls.load(Ordering::SeqCst)
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut User)) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("User", id))?;
        change(user);
        Ok(user.clone())
    }
}

#[async_trait]
impl UserGateway for InMemoryUserGateway {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<User>> {
        self.probe.record(use_cache)?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get(&self, id: &str) -> AppResult<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| not_found("User", id))
    }

    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Portal(PortalError::Api {
                status: 409,
                code: ErrorCode::InvalidInput,
                message: "Email already registered".into(),
            }));
        }
        let created = User {
            id: next_id("user"),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            is_super_admin: user.is_super_admin.unwrap_or(false),
            is_active: true,
            created_at: Utc::now(),
            masjid_assignment: user.masjid_assignment.clone(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, changes: &UpdateUser) -> AppResult<User> {
        self.modify(id, |user| {
            if let Some(name) = &changes.name {
                user.name = name.clone();
            }
            if let Some(email) = &changes.email {
                user.email = email.clone();
            }
            if changes.phone.is_some() {
                user.phone.clone_from(&changes.phone);
            }
            if let Some(is_active) = changes.is_active {
                user.is_active = is_active;
            }
            match &changes.masjid_assignment {
                AssignmentUpdate::Unchanged => {}
                AssignmentUpdate::Set(assignment) => {
                    user.masjid_assignment = Some(assignment.clone())
                }
                AssignmentUpdate::Remove => user.masjid_assignment = None,
            }
        })
    }

    async fn promote(&self, id: &str) -> AppResult<User> {
        self.modify(id, |u| u.is_super_admin = true)
    }

    async fn demote(&self, id: &str) -> AppResult<User> {
        self.modify(id, |u| u.is_super_admin = false)
    }

    async fn activate(&self, id: &str) -> AppResult<User> {
        self.modify(id, |u| u.is_active = true)
    }

    async fn deactivate(&self, id: &str) -> AppResult<User> {
        self.modify(id, |u| u.is_active = false)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(not_found("User", id));
        }
        Ok(())
    }

    async fn super_admins(&self) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.is_super_admin)
            .cloned()
            .collect())
    }

    fn clear_cache(&self) {
        self.clear_cache_calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// InMemoryQuestionGateway
// ============================================================================

#[derive(Default)]
pub struct InMemoryQuestionGateway {
    pub questions: Mutex<Vec<Question>>,
    probe: ListProbe,
}

impl InMemoryQuestionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Mutex::new(questions),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> Vec<bool> {
        self.probe.calls.lock().unwrap().clone()
    }

    pub fn fail_next_list(&self, message: &str) {
        *self.probe.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// Replace the stored questions, as if the backend changed underneath.
    pub fn set_questions(&self, questions: Vec<Question>) {
        *self.questions.lock().unwrap() = questions;
    }
}

#[async_trait]
impl QuestionGateway for InMemoryQuestionGateway {
    async fn list(&self, use_cache: bool) -> AppResult<Vec<Question>> {
        self.probe.record(use_cache)?;
        Ok(self.questions.lock().unwrap().clone())
    }

    async fn by_masjid(&self, masjid_id: &str) -> AppResult<Vec<Question>> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.masjid_id == masjid_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> AppResult<Question> {
        self.questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| not_found("Question", id))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut questions = self.questions.lock().unwrap();
        let before = questions.len();
        questions.retain(|q| q.id != id);
        if questions.len() == before {
            return Err(not_found("Question", id));
        }
        Ok(())
    }

    async fn masjid_statistics(&self, masjid_id: &str) -> AppResult<QuestionStatistics> {
        let questions = self.questions.lock().unwrap();
        let (total, pending) = questions
            .iter()
            .filter(|q| q.masjid_id == masjid_id)
            .fold((0, 0), |(total, pending), q| {
                (total + 1, pending + u64::from(q.status.is_pending()))
            });
        Ok(QuestionStatistics {
            total_questions: total,
            pending_questions: pending,
            replied_questions: total - pending,
            average_response_time: None,
        })
    }
}

// ============================================================================
// InMemorySessionGateway
// ============================================================================

/// Accepts one account and keeps the signed-in user in memory.
#[derive(Default)]
pub struct InMemorySessionGateway {
    account: Option<(User, String)>,
    current: Mutex<Option<User>>,
    expiry: Option<DateTime<Utc>>,
    login_calls: AtomicUsize,
    fail_logout: AtomicBool,
}

impl InMemorySessionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting(user: User, password: &str) -> Self {
        Self {
            account: Some((user, password.to_string())),
            ..Self::default()
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            current: Mutex::new(Some(user.clone())),
            account: Some((user, String::new())),
            ..Self::default()
        }
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn fail_logout(&self) {
        self.fail_logout.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionGateway for InMemorySessionGateway {
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<User> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match &self.account {
            Some((user, password))
                if user.email == credentials.email && *password == credentials.password =>
            {
                if !user.is_super_admin {
                    return Err(AppError::Portal(PortalError::AccessDenied));
                }
                *self.current.lock().unwrap() = Some(user.clone());
                Ok(user.clone())
            }
            _ => Err(AppError::Portal(PortalError::InvalidCredentials(
                "Invalid email or password".into(),
            ))),
        }
    }

    async fn logout(&self) -> AppResult<()> {
        *self.current.lock().unwrap() = None;
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(AppError::Portal(PortalError::Network("connection reset".into())));
        }
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.current.lock().unwrap().clone()
    }

    fn is_authenticated(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }

    fn session_expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }
}
