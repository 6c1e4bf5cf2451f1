use std::path::PathBuf;
use std::time::Duration;

use alasr_sdk::TransportConfig;
use env_helpers::get_env_default;

pub struct AppConfig {
    /// Backend base URL including the API prefix. Missing is reported on first use.
    pub api_base_url: Option<String>,
    pub credentials_path: PathBuf,
    /// How long a fetched list is served from the cache.
    pub cache_ttl: Duration,
    /// Period of the pending-question badge refresh.
    pub badge_refresh: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Optional file receiving structured JSON logs.
    pub log_json_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url: Option<String> = std::env::var("ALASR_API_BASE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let credentials_path: String =
            get_env_default("ALASR_CREDENTIALS_PATH", ".alasr/credentials.json".to_string());
        let cache_ttl_secs: u64 = get_env_default("ALASR_CACHE_TTL_SECS", 300);
        let badge_refresh_secs: u64 = get_env_default("ALASR_BADGE_REFRESH_SECS", 300);
        let connect_timeout_secs: u64 = get_env_default("ALASR_CONNECT_TIMEOUT_SECS", 5);
        let request_timeout_secs: u64 = get_env_default("ALASR_REQUEST_TIMEOUT_SECS", 30);
        let log_json_file: Option<PathBuf> = std::env::var("ALASR_LOG_JSON_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            api_base_url,
            credentials_path: PathBuf::from(credentials_path),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            // A zero period would spin the refresh loop.
            badge_refresh: Duration::from_secs(badge_refresh_secs.max(1)),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            log_json_file,
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            base_url: self.api_base_url.clone(),
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        }
    }
}
