use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply state of a user-submitted question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionStatus {
    #[serde(alias = "new")]
    New,
    #[serde(alias = "replied")]
    Replied,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::New => "New",
            QuestionStatus::Replied => "Replied",
        }
    }

    /// Pending questions are the ones that still need a reply.
    pub fn is_pending(&self) -> bool {
        matches!(self, QuestionStatus::New)
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "pending" => Ok(QuestionStatus::New),
            "replied" => Ok(QuestionStatus::Replied),
            _ => Err(format!("unknown status '{s}' (expected new or replied)")),
        }
    }
}

/// Question submitted by a user to a masjid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub masjid_id: String,
    /// Denormalized by the backend on some endpoints only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masjid_name: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    pub title: String,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_by: Option<String>,
    pub status: QuestionStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<DateTime<Utc>>,
}

/// Aggregates returned by `GET /questions/masjid/:id/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionStatistics {
    #[serde(default)]
    pub total_questions: u64,
    #[serde(default)]
    pub pending_questions: u64,
    #[serde(default)]
    pub replied_questions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_response_time: Option<f64>,
}
