//! Referral balance reads and withdrawal.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use vidup_models::{Account, WithdrawOutcome};
use vidup_store::AccountStore;

use crate::error::{ApiError, ApiResult};

/// Service over the referral bonus ledger.
#[derive(Clone)]
pub struct ReferralService {
    store: Arc<AccountStore>,
}

impl ReferralService {
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    /// The account's own referral state.
    pub async fn summary(&self, email: &str) -> ApiResult<Account> {
        Ok(self.store.get(email).await?)
    }

    /// Withdraw the full referral balance.
    ///
    /// Capture-and-zero happens inside the account's atomic scope, so a
    /// concurrent withdrawal or credit can never observe a half-applied
    /// balance; of two racing withdrawals exactly one wins.
    pub async fn withdraw(&self, email: &str) -> ApiResult<u64> {
        let outcome = self
            .store
            .update(email, |account| {
                if account.referral_bonus == 0 {
                    WithdrawOutcome::NoBalance
                } else {
                    let amount = account.referral_bonus;
                    account.referral_bonus = 0;
                    account.updated_at = Utc::now();
                    WithdrawOutcome::Paid { amount }
                }
            })
            .await?;

        match outcome {
            WithdrawOutcome::Paid { amount } => {
                info!(email = %email, amount = amount, "Referral bonus withdrawn");
                Ok(amount)
            }
            WithdrawOutcome::NoBalance => Err(ApiError::NoBalance),
        }
    }
}
