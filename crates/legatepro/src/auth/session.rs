//! Bearer session tokens. The token is a signed JWT whose subject is the
//! user id; expiry is validated on every request.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::AppContext;
use crate::domain::UserId;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signing material and token lifetime for sessions.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn from_secret(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn issue(&self, user: UserId) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| SessionError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<UserId, SessionError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| SessionError::Invalid)?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| SessionError::Invalid)?;
        Ok(UserId(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not sign session token")]
    Signing,
    #[error("invalid or expired session token")]
    Invalid,
}

/// Extractor resolving the session user id, failing closed with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppContext> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;

        let user = state
            .sessions
            .verify(token.trim())
            .map_err(|err| ApiError::Unauthorized(err.to_string()))?;

        Ok(AuthenticatedUser(user))
    }
}
