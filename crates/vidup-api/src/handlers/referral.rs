//! Referral handlers.

use axum::extract::State;
use axum::Json;
use metrics::counter;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::metrics::names;
use crate::state::AppState;

/// Referral summary response.
#[derive(Serialize)]
pub struct ReferralResponse {
    pub referral_code: String,
    pub referral_bonus: u64,
    pub referred_by: Option<String>,
}

/// Get the caller's referral code and accrued bonus.
pub async fn get_referral(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ReferralResponse>> {
    let account = state.referrals.summary(&user.email).await?;
    Ok(Json(ReferralResponse {
        referral_code: account.referral_code,
        referral_bonus: account.referral_bonus,
        referred_by: account.referred_by,
    }))
}

/// Withdrawal response.
#[derive(Serialize)]
pub struct WithdrawResponse {
    pub amount: u64,
}

/// Withdraw the caller's full referral balance.
pub async fn withdraw(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<WithdrawResponse>> {
    let amount = state.referrals.withdraw(&user.email).await?;
    counter!(names::WITHDRAWALS_TOTAL).increment(1);
    Ok(Json(WithdrawResponse { amount }))
}
