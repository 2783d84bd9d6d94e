//! Account record and subscription tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::referral::generate_referral_code;

/// Daily job quota for the free tier.
pub const FREE_DAILY_QUOTA: u32 = 1;

/// Price of a pro subscription in minor currency units (used by the
/// admin revenue projection only).
pub const PRO_UNIT_PRICE_MINOR_UNITS: u64 = 9_900;

/// Subscription tier enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    /// Parse from string (case-insensitive). Unknown values fall back to free.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pro" => Tier::Pro,
            _ => Tier::Free,
        }
    }

    /// Daily job quota for this tier. `None` means the quota check is
    /// bypassed entirely, not a large number.
    pub fn daily_quota(&self) -> Option<u32> {
        match self {
            Tier::Free => Some(FREE_DAILY_QUOTA),
            Tier::Pro => None,
        }
    }

    /// Get the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account.
///
/// `email` is the external identity and is immutable after creation, as is
/// `referred_by`. `password_hash` is opaque here; it is owned by the auth
/// layer. Usage counters are mutated only through the quota policy and the
/// job orchestrator's commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub password_hash: String,
    pub tier: Tier,
    pub daily_quota: u32,
    pub used_today: u32,
    pub last_reset: DateTime<Utc>,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub referral_code: String,
    /// Referral code of the account that referred this one. A weak
    /// reference: dangling codes are valid and silently ignored.
    pub referred_by: Option<String>,
    /// Accrued referral bonus in minor currency units.
    pub referral_bonus: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new free-tier account with a fresh referral code.
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        referred_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            tier: Tier::Free,
            daily_quota: FREE_DAILY_QUOTA,
            used_today: 0,
            last_reset: now,
            subscription_expires_at: None,
            referral_code: generate_referral_code(),
            referred_by,
            referral_bonus: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
