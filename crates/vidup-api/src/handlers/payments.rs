//! Payment provider callback handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::metrics::names;
use crate::state::AppState;

/// Signature header set by the payment provider.
pub const SIGNATURE_HEADER: &str = "x-payment-signature";

/// Confirmation payload delivered by the provider.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub email: String,
}

/// Confirmation response.
#[derive(Serialize)]
pub struct ConfirmResponse {
    pub status: String,
}

/// Apply a payment confirmation.
///
/// The body is taken raw so the HMAC covers exactly the bytes the
/// provider signed; parsing happens only after verification.
pub async fn confirm_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ConfirmResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::InvalidSignature)?;

    state.billing.verify_signature(&body, signature)?;

    let payload: ConfirmRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Malformed confirmation payload: {}", e)))?;

    state.billing.confirm(&payload.email, Utc::now()).await?;
    counter!(names::UPGRADES_TOTAL).increment(1);

    Ok(Json(ConfirmResponse {
        status: "confirmed".to_string(),
    }))
}
