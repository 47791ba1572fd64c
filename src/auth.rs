//! Password hashing, one-time codes and session tokens.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::OneTimeCode;
use crate::models::config::AuthConfig;

/// Minutes a mailed one-time code stays valid.
pub const OTP_TTL_MINUTES: i64 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("generated code was rejected: {0}")]
    Code(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Session token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin email.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Hash `password` with Argon2id and a fresh random salt, as a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check `password` against a PHC string produced by [`hash_password`].
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Random six digit code in `100000..=999999`.
pub fn generate_otp() -> Result<OneTimeCode, AuthError> {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    OneTimeCode::new(code.to_string()).map_err(|e| AuthError::Code(e.to_string()))
}

/// Issue an HS256 session token for `subject`.
pub fn issue_token(subject: &str, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(config.token_ttl_minutes)).timestamp(),
    };
    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

/// Verify signature and expiry of a session token.
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}
