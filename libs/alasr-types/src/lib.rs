//! Shared types for the Al-Asr portal.
//!
//! This crate provides:
//! - Entity records mirroring the backend resources (`User`, `Masjid`, `MasjidMember`, `Question`)
//! - Permission flags in both their list and boolean-object forms
//! - Login and token-refresh payloads, plus unverified access-token inspection
//! - Response-envelope normalization so callers only ever see the canonical shape

mod auth;
mod envelope;
mod errors;
mod masjid;
mod permissions;
mod question;
mod token;
mod user;

pub use auth::{LoginCredentials, LoginPayload, LoginResponse, RefreshTokenRequest, RefreshTokenResponse};
pub use envelope::{
    EnvelopeError, normalize_list, normalize_members, normalize_object, normalize_user_write,
};
pub use errors::{ApiErrorBody, ErrorCode};
pub use masjid::{
    AddMember, AddMemberRequest, CreateMasjid, Masjid, MasjidMember, MasjidStatistics,
    UpdateMasjid,
};
pub use permissions::{MemberRole, Permission, PermissionFlags};
pub use question::{Question, QuestionStatistics, QuestionStatus};
pub use token::{AccessTokenClaims, TokenError, access_token_expiry, peek_access_token};
pub use user::{AssignmentUpdate, CreateUser, MasjidAssignment, UpdateUser, User};

/// Records that carry a backend identifier.
///
/// Used by list state containers to replace and remove entries by id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Masjid {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Question {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for MasjidMember {
    fn id(&self) -> &str {
        &self.id
    }
}
