//! Test data factories.
//!
//! Each factory builds a complete record with sensible defaults and a unique id.
//! Use the closure parameter to override specific fields as needed.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use alasr_types::{Masjid, Question, QuestionStatus, User};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// A fresh id such as `user-17`.
pub fn next_id(prefix: &str) -> String {
    format!("{prefix}-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Create a regular, active user with no masjid assignment.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: next_id("user"),
        name: "Yusuf Ahmed".to_string(),
        email: "yusuf@example.com".to_string(),
        phone: None,
        is_super_admin: false,
        is_active: true,
        created_at: test_datetime(),
        masjid_assignment: None,
    };
    overrides(&mut user);
    user
}

pub fn create_test_masjid(overrides: impl FnOnce(&mut Masjid)) -> Masjid {
    let mut masjid = Masjid {
        id: next_id("masjid"),
        name: "Masjid Al-Rahma".to_string(),
        location: None,
        address: Some("1 High Street".to_string()),
        city: Some("Birmingham".to_string()),
        state: None,
        country: Some("UK".to_string()),
        postal_code: None,
        contact_email: None,
        contact_phone: None,
        is_active: true,
        created_at: test_datetime(),
        updated_at: None,
    };
    overrides(&mut masjid);
    masjid
}

/// Create an unanswered question.
pub fn create_test_question(overrides: impl FnOnce(&mut Question)) -> Question {
    let mut question = Question {
        id: next_id("question"),
        masjid_id: "masjid-0".to_string(),
        masjid_name: None,
        user_id: "user-0".to_string(),
        user_name: "Maryam".to_string(),
        user_email: "maryam@example.com".to_string(),
        title: "Jumu'ah timing".to_string(),
        question_text: "When does the second khutbah start?".to_string(),
        reply: None,
        replied_by: None,
        status: QuestionStatus::New,
        submitted_at: test_datetime(),
        replied_at: None,
    };
    overrides(&mut question);
    question
}
