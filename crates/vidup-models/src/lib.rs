//! Shared data models for the vidup backend.
//!
//! This crate provides:
//! - The `Account` record and subscription tiers
//! - Pure quota admission and 24h-window reset logic
//! - Subscription lazy-expiry and upgrade transitions
//! - Referral code generation and bonus constants
//! - The fixed encode profile handed to the transcoder
//!
//! Everything here is I/O-free; callers persist the transformed state.

pub mod account;
pub mod profile;
pub mod quota;
pub mod referral;
pub mod subscription;

// Re-export common types
pub use account::{Account, Tier, FREE_DAILY_QUOTA, PRO_UNIT_PRICE_MINOR_UNITS};
pub use profile::EncodeProfile;
pub use quota::{Admission, QUOTA_WINDOW_HOURS};
pub use referral::{generate_referral_code, WithdrawOutcome, REFERRAL_BONUS_MINOR_UNITS};
pub use subscription::SUBSCRIPTION_DAYS;
