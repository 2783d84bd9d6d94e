//! Axum HTTP API for the vidup backend.
//!
//! Wires the admission/accounting core (models + store) and the FFmpeg
//! transcoder into an HTTP surface: upload, auth, referral, payment
//! webhook, and admin reporting.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
