//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::admin::stats;
use crate::handlers::auth::{login, register};
use crate::handlers::health::health;
use crate::handlers::payments::confirm_payment;
use crate::handlers::referral::{get_referral, withdraw};
use crate::handlers::upload::upload;
use crate::middleware::{cors_layer, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let upload_routes = Router::new()
        .route("/upload", post(upload))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size));

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/referral", get(get_referral))
        .route("/referral/withdraw", post(withdraw))
        .route("/payments/confirm", post(confirm_payment))
        .route("/admin/stats", get(stats))
        .merge(upload_routes);

    if let Some(handle) = metrics_handle {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    router
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config))
        .with_state(state)
}
