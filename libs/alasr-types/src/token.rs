use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access-token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    #[error("Token expiry is out of range: {0}")]
    InvalidExpiry(i64),
}

/// Claims the portal reads from an access token.
///
/// The backend signs tokens with a secret the portal never sees, so these are
/// display-only and must not be used for authorization decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Decode the token payload without verifying its signature.
pub fn peek_access_token(token: &str) -> Result<AccessTokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(b"ignored"),
        &validation,
    )
    .map_err(|e| TokenError::InvalidFormat(e.to_string()))?;

    Ok(token_data.claims)
}

/// Expiry of an access token, if it carries one.
pub fn access_token_expiry(token: &str) -> Result<Option<DateTime<Utc>>, TokenError> {
    let claims = peek_access_token(token)?;
    match claims.exp {
        None => Ok(None),
        Some(exp) => DateTime::from_timestamp(exp, 0)
            .map(Some)
            .ok_or(TokenError::InvalidExpiry(exp)),
    }
}
