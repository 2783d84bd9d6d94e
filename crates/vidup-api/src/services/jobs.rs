//! Job orchestrator.
//!
//! Wraps the external transcoder with the admission and accounting
//! protocol. Per job the flow is
//! `Received -> Normalizing -> Admitted -> Transcoding -> {Committed |
//! RolledBack} -> Released`:
//!
//! 1. Subscription normalize, quota reset, and the admission check all run
//!    inside one per-account store scope, and the combined state persists
//!    even when the job is then denied.
//! 2. Admission uses a conditional increment: the quota slot is consumed
//!    at the moment of the check, so N concurrent jobs against one free
//!    account can never all observe the quota as available. A failed
//!    transcode rolls the reservation back, leaving usage unchanged.
//! 3. The transcoder runs with no account lock held.
//! 4. Temp input is released on every exit path; the output artifact is
//!    released by the caller once delivered, or here on failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

use vidup_media::{remove_quietly, Transcoder};
use vidup_models::{quota, subscription, Admission, EncodeProfile};
use vidup_store::AccountStore;

use crate::error::{ApiError, ApiResult};
use crate::metrics::names;

/// A finished transcode, ready for delivery.
///
/// The caller owns the output file and must remove it once the artifact
/// has been delivered (or discarded).
#[derive(Debug)]
pub struct JobArtifact {
    pub output: PathBuf,
}

/// Service orchestrating transcode jobs.
#[derive(Clone)]
pub struct JobService {
    store: Arc<AccountStore>,
    transcoder: Arc<dyn Transcoder>,
    work_dir: PathBuf,
    profile: EncodeProfile,
}

impl JobService {
    pub fn new(store: Arc<AccountStore>, transcoder: Arc<dyn Transcoder>, work_dir: PathBuf) -> Self {
        Self {
            store,
            transcoder,
            work_dir,
            profile: EncodeProfile::default(),
        }
    }

    /// Run a transcode job for an account.
    ///
    /// `input` is the job's private temp resource; it is removed before
    /// this function returns, on every path. On success the account's
    /// usage is already committed and the returned artifact is the
    /// caller's to deliver and clean up.
    pub async fn run_job(
        &self,
        email: &str,
        input: &Path,
        now: DateTime<Utc>,
    ) -> ApiResult<JobArtifact> {
        // Guaranteed release of the input on every exit path, including
        // errors below.
        let input_owned = input.to_path_buf();
        scopeguard::defer! {
            let _ = std::fs::remove_file(&input_owned);
        }

        // Normalize expiry, reset the window, and check admission in one
        // per-account scope. The reservation (conditional increment) is
        // part of the same scope, so concurrent requests serialize here.
        let (admission, window_start) = self
            .store
            .update(email, |account| {
                subscription::normalize(account, now);
                quota::reset_if_due(account, now);
                let admission = quota::admit(account);
                if admission.is_allowed() {
                    account.used_today += 1;
                    account.updated_at = now;
                }
                (admission, account.last_reset)
            })
            .await?;

        if let Admission::Denied { retry_after } = admission {
            counter!(names::JOBS_DENIED_TOTAL).increment(1);
            info!(email = %email, retry_after = %retry_after, "Job denied: quota exceeded");
            return Err(ApiError::QuotaExceeded { retry_after });
        }

        let output = self.work_dir.join(format!("output_{}.mp4", Uuid::new_v4()));

        // No account lock is held while the transcoder runs.
        match self.transcoder.transcode(input, &output, &self.profile).await {
            Ok(()) => {
                counter!(names::JOBS_COMMITTED_TOTAL).increment(1);
                info!(email = %email, output = %output.display(), "Job committed");
                Ok(JobArtifact { output })
            }
            Err(e) => {
                // Roll the reservation back: a failed job is not charged.
                // The reservation belongs to the window it was taken in;
                // if the window reset mid-transcode, its accounting is
                // fresh and must not be decremented.
                let rollback = self
                    .store
                    .update(email, |account| {
                        if account.last_reset == window_start {
                            account.used_today = account.used_today.saturating_sub(1);
                            account.updated_at = Utc::now();
                        }
                    })
                    .await;
                if let Err(rollback_err) = rollback {
                    warn!(email = %email, error = %rollback_err, "Failed to roll back usage");
                }
                remove_quietly(&output).await;
                counter!(names::JOBS_FAILED_TOTAL).increment(1);
                warn!(email = %email, error = %e, "Job failed during transcode");
                Err(ApiError::TranscodeFailed(e))
            }
        }
    }
}
