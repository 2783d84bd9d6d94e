//! Application state.

use std::sync::Arc;

use vidup_media::{FfmpegTranscoder, Transcoder};
use vidup_store::AccountStore;

use crate::config::ApiConfig;
use crate::services::{AccountService, BillingService, JobService, ReferralService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<AccountStore>,
    pub accounts: AccountService,
    pub jobs: JobService,
    pub billing: BillingService,
    pub referrals: ReferralService,
}

impl AppState {
    /// Create new application state with the FFmpeg-backed transcoder.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        tokio::fs::create_dir_all(&config.work_dir).await?;
        let transcoder: Arc<dyn Transcoder> = Arc::new(
            FfmpegTranscoder::new().with_timeout(config.transcode_timeout.as_secs()),
        );
        Ok(Self::with_parts(config, Arc::new(AccountStore::new()), transcoder))
    }

    /// Assemble state from explicit parts. Used by tests to swap in a mock
    /// transcoder and a pre-seeded store.
    pub fn with_parts(
        config: ApiConfig,
        store: Arc<AccountStore>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        let accounts = AccountService::new(Arc::clone(&store));
        let jobs = JobService::new(
            Arc::clone(&store),
            transcoder,
            config.work_dir.clone(),
        );
        let billing = BillingService::new(
            Arc::clone(&store),
            config.payment_webhook_secret.clone(),
        );
        let referrals = ReferralService::new(Arc::clone(&store));

        Self {
            config,
            store,
            accounts,
            jobs,
            billing,
            referrals,
        }
    }
}
