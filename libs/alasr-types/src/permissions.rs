use serde::{Deserialize, Deserializer, Serialize};

/// Role a user holds within a masjid.
///
/// The backend writes roles in lowercase while older payloads use the capitalized form,
/// so deserialization is case-insensitive. Serialization always uses the backend form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Imam,
}

impl MemberRole {
    /// Backend (lowercase) representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Imam => "imam",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(MemberRole::Admin),
            "imam" => Some(MemberRole::Imam),
            _ => None,
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Admin => write!(f, "Admin"),
            MemberRole::Imam => write!(f, "Imam"),
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberRole::parse(s).ok_or_else(|| format!("unknown role '{s}' (expected admin or imam)"))
    }
}

impl<'de> Deserialize<'de> for MemberRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MemberRole::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown role '{raw}'")))
    }
}

/// A single named permission that can be granted to a masjid member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CanViewComplaints,
    CanAnswerComplaints,
    CanViewQuestions,
    CanAnswerQuestions,
    CanChangePrayerTimes,
    CanCreateEvents,
    CanCreateNotifications,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::CanViewComplaints,
        Permission::CanAnswerComplaints,
        Permission::CanViewQuestions,
        Permission::CanAnswerQuestions,
        Permission::CanChangePrayerTimes,
        Permission::CanCreateEvents,
        Permission::CanCreateNotifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CanViewComplaints => "can_view_complaints",
            Permission::CanAnswerComplaints => "can_answer_complaints",
            Permission::CanViewQuestions => "can_view_questions",
            Permission::CanAnswerQuestions => "can_answer_questions",
            Permission::CanChangePrayerTimes => "can_change_prayer_times",
            Permission::CanCreateEvents => "can_create_events",
            Permission::CanCreateNotifications => "can_create_notifications",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Permission::ALL.into_iter().find(|p| p.as_str() == s.trim())
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::parse(s).ok_or_else(|| format!("unknown permission '{s}'"))
    }
}

/// Boolean-object form of the permission set, as the backend stores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFlags {
    #[serde(default)]
    pub can_view_complaints: bool,
    #[serde(default)]
    pub can_answer_complaints: bool,
    #[serde(default)]
    pub can_view_questions: bool,
    #[serde(default)]
    pub can_answer_questions: bool,
    #[serde(default)]
    pub can_change_prayer_times: bool,
    #[serde(default)]
    pub can_create_events: bool,
    #[serde(default)]
    pub can_create_notifications: bool,
}

impl PermissionFlags {
    /// Build the flag object with every listed permission set and the rest cleared.
    pub fn from_granted(granted: &[Permission]) -> Self {
        let mut flags = Self::default();
        for permission in granted {
            flags.set(*permission, true);
        }
        flags
    }

    pub fn is_granted(&self, permission: Permission) -> bool {
        match permission {
            Permission::CanViewComplaints => self.can_view_complaints,
            Permission::CanAnswerComplaints => self.can_answer_complaints,
            Permission::CanViewQuestions => self.can_view_questions,
            Permission::CanAnswerQuestions => self.can_answer_questions,
            Permission::CanChangePrayerTimes => self.can_change_prayer_times,
            Permission::CanCreateEvents => self.can_create_events,
            Permission::CanCreateNotifications => self.can_create_notifications,
        }
    }

    pub fn set(&mut self, permission: Permission, value: bool) {
        let slot = match permission {
            Permission::CanViewComplaints => &mut self.can_view_complaints,
            Permission::CanAnswerComplaints => &mut self.can_answer_complaints,
            Permission::CanViewQuestions => &mut self.can_view_questions,
            Permission::CanAnswerQuestions => &mut self.can_answer_questions,
            Permission::CanChangePrayerTimes => &mut self.can_change_prayer_times,
            Permission::CanCreateEvents => &mut self.can_create_events,
            Permission::CanCreateNotifications => &mut self.can_create_notifications,
        };
        *slot = value;
    }

    /// Granted permissions in declaration order.
    pub fn granted(&self) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| self.is_granted(*p))
            .collect()
    }
}
