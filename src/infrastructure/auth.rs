use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Json},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    InvalidHeader,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid user ID format")]
    InvalidSubject,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// HMAC keys derived from the configured secret
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token whose subject is the given user id
    pub fn create_jwt(&self, user_id: i32, ttl: Duration) -> Result<String, AuthError> {
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing("expiration out of range".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration.max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected token: {}", e);
                AuthError::InvalidToken
            })
    }

    /// Verify a token and extract the acting user id from its subject
    pub fn verify(&self, token: &str) -> Result<i32, AuthError> {
        let claims = self.decode_jwt(token)?;
        parse_subject(&claims.sub)
    }
}

/// The subject must be a non-negative integer that fits a user id
fn parse_subject(sub: &str) -> Result<i32, AuthError> {
    sub.parse::<i32>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or(AuthError::InvalidSubject)
}

/// Acting identity extracted from a verified bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<JwtKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidHeader)?;

        let keys = Arc::<JwtKeys>::from_ref(state);
        let user_id = keys.verify(token.trim())?;

        Ok(AuthUser { user_id })
    }
}
