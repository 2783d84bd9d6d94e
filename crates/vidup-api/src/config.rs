//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Directory for uploaded inputs and transcode outputs
    pub work_dir: PathBuf,
    /// Max upload body size
    pub max_body_size: usize,
    /// Kill transcodes that run longer than this
    pub transcode_timeout: Duration,
    /// HS256 secret for access tokens
    pub jwt_secret: String,
    /// Shared secret for payment webhook signatures
    pub payment_webhook_secret: String,
    /// Accounts allowed to call admin endpoints
    pub admin_emails: Vec<String>,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            work_dir: PathBuf::from("uploads"),
            max_body_size: 500 * 1024 * 1024, // 500MB
            transcode_timeout: Duration::from_secs(1800),
            jwt_secret: "dev-secret".to_string(),
            payment_webhook_secret: "dev-webhook-secret".to_string(),
            admin_emails: Vec::new(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            transcode_timeout: Duration::from_secs(
                std::env::var("TRANSCODE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.transcode_timeout.as_secs()),
            ),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            payment_webhook_secret: std::env::var("PAYMENT_WEBHOOK_SECRET")
                .unwrap_or(defaults.payment_webhook_secret),
            admin_emails: std::env::var("ADMIN_EMAILS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.admin_emails),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    /// Check if an account may call admin endpoints.
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert!(!config.is_production());
        assert_eq!(config.work_dir, PathBuf::from("uploads"));
        assert!(!config.is_admin("a@example.com"));
    }

    #[test]
    fn test_is_admin_matches_configured_emails() {
        let config = ApiConfig {
            admin_emails: vec!["ops@example.com".to_string()],
            ..ApiConfig::default()
        };
        assert!(config.is_admin("ops@example.com"));
        assert!(!config.is_admin("user@example.com"));
    }
}
