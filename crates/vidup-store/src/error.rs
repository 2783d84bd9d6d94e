//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during account store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Account already exists: {0}")]
    DuplicateEmail(String),

    #[error("Referral code already in use: {0}")]
    DuplicateReferralCode(String),
}

impl StoreError {
    pub fn not_found(email: impl Into<String>) -> Self {
        Self::NotFound(email.into())
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
