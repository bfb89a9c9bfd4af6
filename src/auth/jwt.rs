use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
pub const REFRESH_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: Uuid,
    /// Unique per token, so two tokens minted in the same second never collide.
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: user_id,
            jti: Uuid::now_v7(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

/// An access/refresh pair issued together.
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn issue_access(user_id: Uuid, secret: &str) -> Result<String, String> {
    encode_token(&Claims::new(user_id, Duration::seconds(ACCESS_TOKEN_TTL_SECS)), secret)
}

pub fn issue_refresh(user_id: Uuid, secret: &str) -> Result<String, String> {
    encode_token(&Claims::new(user_id, Duration::seconds(REFRESH_TOKEN_TTL_SECS)), secret)
}

pub fn issue_pair(user_id: Uuid, access_secret: &str, refresh_secret: &str) -> Result<TokenPair, String> {
    Ok(TokenPair {
        access_token: issue_access(user_id, access_secret)?,
        refresh_token: issue_refresh(user_id, refresh_secret)?,
    })
}

pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::InvalidSignature,
    })
}
