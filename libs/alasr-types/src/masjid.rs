use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::{MemberRole, Permission, PermissionFlags};

/// Community center managed by the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Masjid {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Payload for `POST /masajids`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateMasjid {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

/// Payload for `PUT /masajids/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMasjid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

/// Aggregates returned by `GET /masajids/:id/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasjidStatistics {
    #[serde(default)]
    pub total_questions: u64,
    #[serde(default)]
    pub pending_questions: u64,
    #[serde(default)]
    pub total_events: u64,
    #[serde(default)]
    pub upcoming_events: u64,
    #[serde(default)]
    pub total_members: u64,
}

/// A user's membership in a masjid, in canonical form.
///
/// Built by `normalize_members`; the backend's own member shapes vary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasjidMember {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub role: MemberRole,
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
}

/// Member assignment as entered in the portal.
#[derive(Debug, Clone, PartialEq)]
pub struct AddMember {
    pub user_id: String,
    pub role: MemberRole,
    pub permissions: Vec<Permission>,
}

/// Wire format of `POST /masajids/:id/users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddMemberRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub role: MemberRole,
    pub permissions: PermissionFlags,
}

impl From<&AddMember> for AddMemberRequest {
    fn from(member: &AddMember) -> Self {
        Self {
            user_id: member.user_id.trim().to_string(),
            role: member.role,
            permissions: PermissionFlags::from_granted(&member.permissions),
        }
    }
}
