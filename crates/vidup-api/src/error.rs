//! API error types.
//!
//! User-visible failures carry stable `code` strings so calling
//! collaborators can branch on cause instead of parsing failure text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Daily quota exceeded")]
    QuotaExceeded { retry_after: DateTime<Utc> },

    #[error("Referral balance is empty")]
    NoBalance,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Transcode failed: {0}")]
    TranscodeFailed(#[from] vidup_media::MediaError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NoBalance => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ApiError::TranscodeFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::QuotaExceeded { .. } => "quota_exceeded",
            ApiError::NoBalance => "no_balance",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::InvalidSignature => "invalid_signature",
            ApiError::TranscodeFailed(_) => "transcode_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<vidup_store::StoreError> for ApiError {
    fn from(e: vidup_store::StoreError) -> Self {
        match e {
            vidup_store::StoreError::NotFound(what) => ApiError::NotFound(what),
            vidup_store::StoreError::DuplicateEmail(email) => {
                ApiError::Conflict(format!("Account already exists: {}", email))
            }
            vidup_store::StoreError::DuplicateReferralCode(code) => {
                ApiError::Conflict(format!("Referral code already in use: {}", code))
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::TranscodeFailed(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            ApiError::QuotaExceeded { retry_after } => format!(
                "Daily quota exceeded. Try again after {}",
                retry_after.to_rfc3339()
            ),
            _ => self.to_string(),
        };

        let retry_after = match &self {
            ApiError::QuotaExceeded { retry_after } => Some(retry_after.to_rfc3339()),
            _ => None,
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
            retry_after,
        };

        (status, Json(body)).into_response()
    }
}
