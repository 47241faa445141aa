use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cookies;

pub use cookies::{
    cookie_value, session_token, CredentialProbe, SessionCookieProbe, SECURE_SESSION_COOKIE,
    SESSION_COOKIE,
};

/// Identity carried by a validated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Claims of the signed session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &SessionUser, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.email.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            name: claims.name,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret is not configured")]
    MissingSecret,

    #[error("Session token generation error: {0}")]
    TokenGeneration(String),
}

/// Authoritative session check.
///
/// `Ok(None)` means the request carries no usable session (absent, forged,
/// expired). `Err` is reserved for faults of the store itself.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn validate(&self, headers: &HeaderMap) -> Result<Option<SessionUser>, SessionError>;
}

/// Session store backed by HS256-signed tokens in the session cookie
pub struct JwtSessionStore {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionStore {
    pub fn new(secret: &str) -> Result<Self, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Sign a session token for `user`, valid for `ttl`
    pub fn issue(&self, user: &SessionUser, ttl: Duration) -> Result<String, SessionError> {
        encode(&Header::new(Algorithm::HS256), &Claims::new(user, ttl), &self.encoding_key)
            .map_err(|e| SessionError::TokenGeneration(e.to_string()))
    }

    fn decode_token(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SessionStore for JwtSessionStore {
    async fn validate(&self, headers: &HeaderMap) -> Result<Option<SessionUser>, SessionError> {
        let Some(token) = session_token(headers) else {
            return Ok(None);
        };

        Ok(self.decode_token(token).map(SessionUser::from))
    }
}
