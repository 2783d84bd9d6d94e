//! Referral attribution: code generation and bonus accounting types.
//!
//! `referred_by` is a named lookup key, never a foreign key. Resolution
//! failure is a valid no-op. The actual credit and withdraw mutations run
//! inside the store's per-account atomic scope.

use serde::Serialize;
use uuid::Uuid;

/// Bonus credited to a referrer per qualifying upgrade, in minor currency
/// units.
pub const REFERRAL_BONUS_MINOR_UNITS: u64 = 10_000;

/// Generate a short unique referral code.
pub fn generate_referral_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Outcome of a withdrawal attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WithdrawOutcome {
    /// Balance captured and zeroed; `amount` is what was paid out.
    Paid { amount: u64 },
    /// Nothing to withdraw. A normal negative result, not an error.
    NoBalance,
}
