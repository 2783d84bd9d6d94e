//! Access token issuance and verification.
//!
//! This is the authentication collaborator boundary: the core trusts the
//! identity extracted here. Tokens are HS256 JWTs carrying the account
//! email as subject; credential hashing is a salted SHA-256 digest, kept
//! deliberately thin.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::state::AppState;

/// Access token lifetime in hours.
const TOKEN_TTL_HOURS: i64 = 24;

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// Issue an access token for an account.
pub fn issue_token(email: &str, secret: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
}

/// Verify an access token and return its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
}

/// Hash a credential with a per-account random salt.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand_salt();
    let digest = salted_digest(password, &salt);
    format!(
        "{}${}",
        base64::engine::general_purpose::STANDARD.encode(salt),
        base64::engine::general_purpose::STANDARD.encode(digest)
    )
}

/// Verify a credential against a stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = base64::engine::general_purpose::STANDARD.decode(salt_b64) else {
        return false;
    };
    let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(digest_b64) else {
        return false;
    };
    salted_digest(password, &salt).as_slice() == expected.as_slice()
}

fn salted_digest(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn rand_salt() -> [u8; 16] {
    // uuid v4 bytes double as a random salt without pulling in rand.
    *uuid::Uuid::new_v4().as_bytes()
}

/// Authenticated user extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::unauthorized("Missing bearer token"))?;

        let claims = verify_token(bearer.token(), &state.config.jwt_secret)?;
        Ok(AuthUser { email: claims.sub })
    }
}
