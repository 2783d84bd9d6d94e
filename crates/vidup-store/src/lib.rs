//! Account store for the vidup backend.
//!
//! This crate provides:
//! - CRUD over `Account` records keyed by email
//! - Lookup by referral code
//! - A per-account atomic read-modify-write scope (`update`)
//!
//! Synchronization is scoped per account: each record sits behind its own
//! `tokio::sync::Mutex`, so unrelated users' jobs never contend and there
//! is no store-wide lock on any mutation path. The `update` closure is
//! synchronous, which makes it impossible to hold an account lock across
//! an await point; long-running work (the transcoder) always happens
//! outside the scope.

pub mod error;

pub use error::{StoreError, StoreResult};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use vidup_models::{Account, Tier};

type AccountSlot = Arc<Mutex<Account>>;

/// In-process account store.
///
/// The persistence engine behind the account data is out of scope here;
/// what matters is the contract: `get`, `get_by_referral_code`, `create`,
/// and an `update` that serializes read-modify-write per account.
#[derive(Default)]
pub struct AccountStore {
    accounts: RwLock<HashMap<String, AccountSlot>>,
    /// referral_code -> email index. Exactly one account owns a code.
    codes: RwLock<HashMap<String, String>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new account, rejecting duplicate emails and referral codes.
    pub async fn create(&self, account: Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(StoreError::DuplicateEmail(account.email));
        }
        let mut codes = self.codes.write().await;
        if codes.contains_key(&account.referral_code) {
            return Err(StoreError::DuplicateReferralCode(account.referral_code));
        }
        debug!(email = %account.email, code = %account.referral_code, "Creating account");
        codes.insert(account.referral_code.clone(), account.email.clone());
        accounts.insert(account.email.clone(), Arc::new(Mutex::new(account)));
        Ok(())
    }

    /// Fetch a snapshot of an account by email.
    pub async fn get(&self, email: &str) -> StoreResult<Account> {
        let slot = self.slot(email).await?;
        let account = slot.lock().await;
        Ok(account.clone())
    }

    /// Fetch a snapshot of an account by its referral code.
    ///
    /// A missing code is reported as not-found; callers treating
    /// `referred_by` as a weak reference ignore that outcome.
    pub async fn get_by_referral_code(&self, code: &str) -> StoreResult<Account> {
        let email = {
            let codes = self.codes.read().await;
            codes
                .get(code)
                .cloned()
                .ok_or_else(|| StoreError::not_found(code))?
        };
        self.get(&email).await
    }

    /// Atomic read-modify-write on a single account.
    ///
    /// The closure runs under the account's own mutex and its return value
    /// is passed back out, so admission decisions and captured balances
    /// leave the critical section as tagged outcomes. Two concurrent
    /// `update` calls for the same email are serialized; calls for
    /// different emails proceed in parallel.
    pub async fn update<T>(
        &self,
        email: &str,
        f: impl FnOnce(&mut Account) -> T,
    ) -> StoreResult<T> {
        let slot = self.slot(email).await?;
        let mut account = slot.lock().await;
        Ok(f(&mut account))
    }

    /// Total number of accounts.
    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Number of accounts whose stored tier is pro.
    ///
    /// Reads tiers as stored, without normalizing expiry; a lapsed but
    /// unvisited account still counts until its next tier-sensitive read.
    pub async fn count_pro(&self) -> usize {
        let accounts = self.accounts.read().await;
        let mut total = 0;
        for slot in accounts.values() {
            if slot.lock().await.tier == Tier::Pro {
                total += 1;
            }
        }
        total
    }

    async fn slot(&self, email: &str) -> StoreResult<AccountSlot> {
        let accounts = self.accounts.read().await;
        accounts
            .get(email)
            .cloned()
            .ok_or_else(|| StoreError::not_found(email))
    }
}
