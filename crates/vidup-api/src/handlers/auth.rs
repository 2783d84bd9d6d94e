//! Registration and login handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::issue_token;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Referral code of the account that referred this one.
    #[serde(default)]
    pub referred_by: Option<String>,
}

/// Registration response.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub email: String,
    pub tier: String,
    pub referral_code: String,
}

/// Register a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let account = state
        .accounts
        .register(
            &payload.email,
            &payload.password,
            payload.referred_by,
            Utc::now(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            email: account.email,
            tier: account.tier.to_string(),
            referral_code: account.referral_code,
        }),
    ))
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub tier: String,
}

/// Verify credentials and issue an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let account = state
        .accounts
        .login(&payload.email, &payload.password, Utc::now())
        .await?;
    let token = issue_token(&account.email, &state.config.jwt_secret)?;
    Ok(Json(LoginResponse {
        token,
        tier: account.tier.to_string(),
    }))
}
