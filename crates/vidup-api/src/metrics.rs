//! Prometheus metrics for the API server.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "vidup_http_requests_total";

    pub const JOBS_COMMITTED_TOTAL: &str = "vidup_jobs_committed_total";
    pub const JOBS_DENIED_TOTAL: &str = "vidup_jobs_denied_total";
    pub const JOBS_FAILED_TOTAL: &str = "vidup_jobs_failed_total";

    pub const UPGRADES_TOTAL: &str = "vidup_upgrades_total";
    pub const WITHDRAWALS_TOTAL: &str = "vidup_withdrawals_total";
}
