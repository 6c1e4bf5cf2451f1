use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::permissions::{MemberRole, PermissionFlags};

/// Platform user as returned by the super-admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    pub name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Missing means "not a super admin"; login relies on this defaulting to false.
    #[serde(default)]
    pub is_super_admin: bool,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    /// At most one masjid assignment per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masjid_assignment: Option<MasjidAssignment>,
}

fn default_active() -> bool {
    true
}

/// Association of a user to a masjid with a role and permission flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasjidAssignment {
    pub masjid_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masjid_name: Option<String>,

    pub role: MemberRole,

    #[serde(default)]
    pub permissions: PermissionFlags,
}

/// Payload for `POST /super-admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_super_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masjid_assignment: Option<MasjidAssignment>,
}

/// What an update does to the user's masjid assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssignmentUpdate {
    /// Field omitted from the payload.
    #[default]
    Unchanged,
    Set(MasjidAssignment),
    /// Sent as an explicit JSON `null`.
    Remove,
}

impl AssignmentUpdate {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, AssignmentUpdate::Unchanged)
    }
}

impl Serialize for AssignmentUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AssignmentUpdate::Set(assignment) => assignment.serialize(serializer),
            AssignmentUpdate::Unchanged | AssignmentUpdate::Remove => serializer.serialize_none(),
        }
    }
}

/// Payload for `PUT /super-admin/users/:id`. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "AssignmentUpdate::is_unchanged")]
    pub masjid_assignment: AssignmentUpdate,
}
