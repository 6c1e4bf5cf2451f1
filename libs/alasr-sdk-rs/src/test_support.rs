//! Scripted transport for SDK tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::PortalError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

type Scripted = Result<ApiResponse, PortalError>;

pub fn respond(status: u16, body: Value) -> Scripted {
    Ok(ApiResponse { status, body })
}

/// Replays queued responses per `(method, path)`.
///
/// The last queued response for a route is repeated once the queue is down to it.
/// Unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    sent: Mutex<Vec<ApiRequest>>,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` on the tokio clock before answering.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Default::default()
        }
    }

    pub fn push(&self, method: Method, path: &str, response: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, PortalError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let key = (request.method, request.path.clone());
        self.sent.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => respond(404, json!({ "message": format!("no route for {} {}", key.0, key.1) })),
        }
    }
}
