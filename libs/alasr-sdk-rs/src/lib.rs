//! Client SDK for the Al-Asr portal backend.
//!
//! ```no_run
//! use std::sync::Arc;
//! use alasr_sdk::{ApiClient, FileCredentialStore, PortalServices, TransportConfig, DEFAULT_FRESHNESS};
//!
//! # async fn example() -> Result<(), alasr_sdk::PortalError> {
//! let config = TransportConfig {
//!     base_url: Some("https://backend.example.com/api/v1".into()),
//!     ..Default::default()
//! };
//! let store = Arc::new(FileCredentialStore::new(".alasr/credentials.json"));
//! let api = Arc::new(ApiClient::new(&config, store)?);
//! let services = PortalServices::new(api, DEFAULT_FRESHNESS);
//!
//! let masajids = services.masajids.get_all(true).await?;
//! println!("{} masajids", masajids.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod credentials;
pub mod error;
pub mod services;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use cache::{ListCache, DEFAULT_FRESHNESS};
pub use client::{ApiClient, SessionEvent};
pub use credentials::{CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore};
pub use error::PortalError;
pub use services::{AuthService, MasjidService, PortalServices, QuestionService, UserService};
#[cfg(feature = "client")]
pub use transport::ReqwestTransport;
pub use transport::{
    ApiRequest, ApiResponse, Method, Transport, TransportConfig, UnconfiguredTransport,
};
