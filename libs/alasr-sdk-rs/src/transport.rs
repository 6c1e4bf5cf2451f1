//! HTTP transport seam.
//!
//! `ApiClient` talks to the backend through the `Transport` trait so that the
//! authentication and caching layers can be exercised without a network.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PortalError;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "ALASR_API_BASE_URL";

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        write!(f, "{}", s)
    }
}

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`, e.g. `/masajids/42`
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

/// Any response the backend produced, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns whatever the backend answered.
///
/// `Err` is reserved for requests that produced no response at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, PortalError>;
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Backend base URL including the API prefix (e.g. "https://api.example.com/api/v1")
    pub base_url: Option<String>,

    pub connect_timeout: Duration,

    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Validated base URL with any trailing slash removed.
    pub fn validated_base_url(&self) -> Result<String, PortalError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                PortalError::Config(format!(
                    "API base URL is not configured. Set {BASE_URL_ENV} in your environment \
                     (e.g. {BASE_URL_ENV}=https://backend.example.com/api/v1)."
                ))
            })?;

        let parsed = url::Url::parse(raw)
            .map_err(|e| PortalError::Config(format!("{BASE_URL_ENV} is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PortalError::Config(format!(
                "{BASE_URL_ENV} must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        Ok(raw.trim_end_matches('/').to_string())
    }
}

/// Stand-in used when the base URL is missing or invalid.
///
/// Every request fails with the configuration error, so commands that never
/// touch the backend still work.
#[derive(Debug, Clone)]
pub struct UnconfiguredTransport {
    reason: String,
}

impl UnconfiguredTransport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl Transport for UnconfiguredTransport {
    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, PortalError> {
        Err(PortalError::Config(self.reason.clone()))
    }
}

/// `reqwest`-backed transport.
#[cfg(feature = "client")]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "client")]
impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, PortalError> {
        let base_url = config.validated_base_url()?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PortalError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(feature = "client")]
#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, PortalError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: Option<&str>) -> TransportConfig {
        TransportConfig {
            base_url: base_url.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_base_url_is_a_config_error() {
        let err = config(None).validated_base_url().unwrap_err();
        match err {
            PortalError::Config(message) => assert!(message.contains(BASE_URL_ENV)),
            other => panic!("expected config error, got {other:?}"),
        }

        assert!(matches!(
            config(Some("   ")).validated_base_url(),
            Err(PortalError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            config(Some("not a url")).validated_base_url(),
            Err(PortalError::Config(_))
        ));
        assert!(matches!(
            config(Some("ftp://example.com")).validated_base_url(),
            Err(PortalError::Config(_))
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let base = config(Some("https://backend.example.com/api/v1/"))
            .validated_base_url()
            .unwrap();
        assert_eq!(base, "https://backend.example.com/api/v1");
    }

    #[test]
    fn test_success_range() {
        let ok = ApiResponse { status: 204, body: Value::Null };
        let err = ApiResponse { status: 429, body: Value::Null };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[tokio::test]
    async fn test_unconfigured_transport_reports_reason() {
        let transport = UnconfiguredTransport::new("ALASR_API_BASE_URL is not set");
        let err = transport
            .send(ApiRequest {
                method: Method::Get,
                path: "/masajids".into(),
                body: None,
                bearer: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PortalError::Config(ref m) if m.contains("ALASR_API_BASE_URL")));
    }
}
