//! Quota admission policy over a rolling 24h usage window.
//!
//! Pure transforms: nothing here does I/O. Callers apply `reset_if_due`
//! first, check `admit`, and persist whatever state came out. The split
//! keeps the policy testable against synthetic clocks.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::account::{Account, Tier};

/// Length of the usage window in hours.
pub const QUOTA_WINDOW_HOURS: i64 = 24;

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Admission {
    Allowed,
    /// Quota exhausted; `retry_after` is when the window next resets.
    Denied { retry_after: DateTime<Utc> },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// Zero the usage counter if the 24h window has elapsed.
///
/// Returns true if a reset was applied. Calling it again with the same
/// clock is a no-op. Must run before `admit`.
pub fn reset_if_due(account: &mut Account, now: DateTime<Utc>) -> bool {
    if now - account.last_reset >= Duration::hours(QUOTA_WINDOW_HOURS) {
        account.used_today = 0;
        account.last_reset = now;
        account.updated_at = now;
        true
    } else {
        false
    }
}

/// Decide whether a job may proceed.
///
/// Pro accounts bypass the quota check entirely. Free accounts are admitted
/// while `used_today` is below their daily quota.
pub fn admit(account: &Account) -> Admission {
    match account.tier {
        Tier::Pro => Admission::Allowed,
        Tier::Free => {
            if account.used_today < account.daily_quota {
                Admission::Allowed
            } else {
                Admission::Denied {
                    retry_after: next_reset(account),
                }
            }
        }
    }
}

/// When the current usage window ends.
pub fn next_reset(account: &Account) -> DateTime<Utc> {
    account.last_reset + Duration::hours(QUOTA_WINDOW_HOURS)
}
