//! Admin reporting handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use vidup_models::PRO_UNIT_PRICE_MINOR_UNITS;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Aggregate stats response.
#[derive(Serialize)]
pub struct StatsResponse {
    pub total_users: usize,
    pub total_pro: usize,
    /// `total_pro * unit price`, in minor currency units. A read-side
    /// projection over stored tiers; lapsed-but-unvisited pro accounts
    /// count until their next normalized read.
    pub revenue_minor_units: u64,
}

/// Aggregate user and revenue counts.
/// Only accessible to configured admin accounts.
pub async fn stats(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<StatsResponse>> {
    if !state.config.is_admin(&user.email) {
        return Err(ApiError::forbidden("Admin access required"));
    }

    let total_users = state.store.count().await;
    let total_pro = state.store.count_pro().await;
    Ok(Json(StatsResponse {
        total_users,
        total_pro,
        revenue_minor_units: total_pro as u64 * PRO_UNIT_PRICE_MINOR_UNITS,
    }))
}
