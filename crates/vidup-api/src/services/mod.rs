//! Domain services: account lifecycle, job orchestration, billing, referrals.

pub mod account;
pub mod billing;
pub mod jobs;
pub mod referral;

pub use account::AccountService;
pub use billing::BillingService;
pub use jobs::{JobArtifact, JobService};
pub use referral::ReferralService;
