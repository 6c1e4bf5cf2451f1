//! Per-resource services over a shared `ApiClient`.

mod auth;
mod masjid;
mod question;
mod user;

pub use auth::AuthService;
pub use masjid::MasjidService;
pub use question::QuestionService;
pub use user::UserService;

use std::sync::Arc;
use std::time::Duration;

use alasr_types::normalize_list;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::client::ApiClient;
use crate::error::PortalError;

/// The four services, sharing one client and therefore one session.
#[derive(Clone)]
pub struct PortalServices {
    pub api: Arc<ApiClient>,
    pub auth: AuthService,
    pub masajids: MasjidService,
    pub questions: QuestionService,
    pub users: UserService,
}

impl PortalServices {
    /// `freshness` applies to every list cache.
    pub fn new(api: Arc<ApiClient>, freshness: Duration) -> Self {
        let masajids = MasjidService::new(Arc::clone(&api), freshness);
        let questions = QuestionService::new(Arc::clone(&api), masajids.clone(), freshness);
        let users = UserService::new(Arc::clone(&api), freshness);
        let auth = AuthService::new(Arc::clone(&api));

        Self {
            api,
            auth,
            masajids,
            questions,
            users,
        }
    }

    /// Drop every cached list.
    pub fn clear_caches(&self) {
        self.masajids.clear_cache();
        self.questions.clear_cache();
        self.users.clear_cache();
    }
}

fn decode_list<T: DeserializeOwned>(resource: &'static str, body: Value) -> Result<Vec<T>, PortalError> {
    let recognized = body.is_array() || body.get("data").is_some_and(Value::is_array);
    if !recognized {
        warn!(resource, "Unexpected list response format, treating as empty");
    }
    Ok(normalize_list(body)?)
}

/// Characters escaped in one path segment: the URL path set plus `/` and `%`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Percent-encode a path segment taken from user input.
fn segment(raw: &str) -> String {
    utf8_percent_encode(raw.trim(), PATH_SEGMENT).to_string()
}
