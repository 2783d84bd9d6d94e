//! Subscription lifecycle transitions.
//!
//! Expiry is a lazy transition: `normalize` runs on every tier-sensitive
//! read path instead of a background sweep, so a lapsed pro account is
//! downgraded in the same request that discovers it.

use chrono::{DateTime, Duration, Utc};

use crate::account::{Account, Tier};

/// Subscription duration applied by an upgrade, in days.
pub const SUBSCRIPTION_DAYS: i64 = 30;

/// Downgrade a pro account whose subscription has lapsed.
///
/// The expiry timestamp is retained for audit, not cleared. Returns true
/// if the account lapsed. Must run before any quota check.
pub fn normalize(account: &mut Account, now: DateTime<Utc>) -> bool {
    if account.tier == Tier::Pro {
        if let Some(expires_at) = account.subscription_expires_at {
            if now > expires_at {
                account.tier = Tier::Free;
                account.updated_at = now;
                return true;
            }
        }
    }
    false
}

/// Apply a pro upgrade, valid for [`SUBSCRIPTION_DAYS`] from `now`.
///
/// Idempotent-by-overwrite: a repeated upgrade replaces the expiry rather
/// than stacking durations. That is a deliberate simplification of the
/// billing model, not a bug.
pub fn upgrade(account: &mut Account, now: DateTime<Utc>) {
    account.tier = Tier::Pro;
    account.subscription_expires_at = Some(now + Duration::days(SUBSCRIPTION_DAYS));
    account.updated_at = now;
}
