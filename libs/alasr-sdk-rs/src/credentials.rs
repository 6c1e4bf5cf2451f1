//! Persisted client state: tokens and the signed-in user.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use alasr_types::User;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PortalError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Storage for `Credentials`.
///
/// Loading never fails: unreadable state is treated as signed out.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Credentials;
    fn save(&self, credentials: &Credentials) -> Result<(), PortalError>;
    fn clear(&self) -> Result<(), PortalError>;
}

/// Process-local store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(credentials),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Credentials {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, credentials: &Credentials) -> Result<(), PortalError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = credentials.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), PortalError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Credentials::default();
        Ok(())
    }
}

/// JSON file store. The file is created on first save and removed on clear.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Credentials {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Credentials::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read credentials file");
                return Credentials::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Ignoring corrupt credentials file");
            Credentials::default()
        })
    }

    fn save(&self, credentials: &Credentials) -> Result<(), PortalError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PortalError::Storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(credentials)
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| PortalError::Storage(e.to_string()))?;

        // Tokens are bearer secrets.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| PortalError::Storage(e.to_string()))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), PortalError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortalError::Storage(e.to_string())),
        }
    }
}
