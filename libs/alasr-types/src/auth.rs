use serde::{Deserialize, Serialize};

use crate::user::User;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Envelope returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<LoginPayload>,
}

/// Session material inside a successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    /// Absent on malformed responses; login rejects those.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(rename = "accessToken", alias = "access_token")]
    pub access_token: String,
    #[serde(rename = "refreshToken", alias = "refresh_token")]
    pub refresh_token: String,
}

/// Body of `POST /auth/refresh-token`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response of `POST /auth/refresh-token`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenResponse {
    #[serde(alias = "accessToken")]
    pub access_token: String,
}
