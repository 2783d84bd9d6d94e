//! Account registration and login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use vidup_models::{subscription, Account};
use vidup_store::{AccountStore, StoreError};

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};

/// Retries when a freshly generated referral code collides.
const MAX_CODE_RETRIES: u32 = 3;

/// Service over account lifecycle.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    /// Register a new account.
    ///
    /// `referred_by` is captured as-is at creation and never validated
    /// against existing codes; attribution resolves lazily at upgrade
    /// time.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        referred_by: Option<String>,
        now: DateTime<Utc>,
    ) -> ApiResult<Account> {
        let password_hash = hash_password(password);

        for attempt in 0..MAX_CODE_RETRIES {
            let account = Account::new(email, password_hash.clone(), referred_by.clone(), now);
            match self.store.create(account.clone()).await {
                Ok(()) => {
                    info!(email = %email, referred = referred_by.is_some(), "Registered account");
                    return Ok(account);
                }
                Err(StoreError::DuplicateReferralCode(code)) => {
                    // Fresh code next loop iteration.
                    warn!(code = %code, attempt = attempt + 1, "Referral code collision, regenerating");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ApiError::internal(
            "Failed to allocate a unique referral code",
        ))
    }

    /// Verify credentials and return the account.
    ///
    /// The stored tier is normalized (and persisted) before it is
    /// reported, so a lapsed pro account logs in as free.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<Account> {
        let update = self
            .store
            .update(email, |account| {
                if subscription::normalize(account, now) {
                    account.updated_at = now;
                }
                account.clone()
            })
            .await;
        let account = match update {
            Ok(account) => account,
            // Same rejection for unknown email and bad password.
            Err(e) if e.is_not_found() => {
                return Err(ApiError::unauthorized("Invalid credentials"))
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_password(password, &account.password_hash) {
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        Ok(account)
    }
}
