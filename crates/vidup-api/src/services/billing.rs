//! Payment confirmation handling.
//!
//! The payment provider calls back with the paying account's identity.
//! Deliveries must carry an HMAC-SHA256 signature over the raw body; an
//! unsigned or mis-signed delivery never touches account state. Redelivery
//! of the same confirmation re-applies both the upgrade (expiry is
//! overwritten, not stacked) and the referral credit; that mirrors the
//! provider's at-least-once semantics and is deliberately not dedup'd.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, info, warn};

use vidup_models::{subscription, REFERRAL_BONUS_MINOR_UNITS};
use vidup_store::AccountStore;

use crate::error::{ApiError, ApiResult};

type HmacSha256 = Hmac<Sha256>;

/// Service applying payment confirmations.
#[derive(Clone)]
pub struct BillingService {
    store: Arc<AccountStore>,
    webhook_secret: String,
}

impl BillingService {
    pub fn new(store: Arc<AccountStore>, webhook_secret: String) -> Self {
        Self {
            store,
            webhook_secret,
        }
    }

    /// Verify the webhook signature (hex HMAC-SHA256 over the raw body).
    ///
    /// Comparison happens inside `Mac::verify_slice`, which is
    /// constant-time.
    pub fn verify_signature(&self, payload: &[u8], signature_hex: &str) -> ApiResult<()> {
        let signature = decode_hex(signature_hex).ok_or(ApiError::InvalidSignature)?;

        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())
            .map_err(|_| ApiError::internal("Invalid webhook secret"))?;
        mac.update(payload);
        mac.verify_slice(&signature).map_err(|_| {
            warn!("Payment webhook signature mismatch");
            ApiError::InvalidSignature
        })
    }

    /// Apply a confirmed payment: upgrade the account and credit its
    /// referrer, if the referral code resolves.
    pub async fn confirm(&self, email: &str, now: DateTime<Utc>) -> ApiResult<()> {
        // Missing account is a not-found signal to the provider, never a
        // silent success.
        let referred_by = self
            .store
            .update(email, |account| {
                subscription::upgrade(account, now);
                account.referred_by.clone()
            })
            .await?;

        info!(email = %email, "Subscription upgraded to pro");

        if let Some(code) = referred_by {
            self.credit_referrer(&code, email).await;
        }

        Ok(())
    }

    /// Credit the owner of `code` for a qualifying upgrade.
    ///
    /// `referred_by` is a weak reference: an unresolved code is a valid,
    /// silently-ignored state, not an error.
    async fn credit_referrer(&self, code: &str, upgraded_email: &str) {
        let referrer = match self.store.get_by_referral_code(code).await {
            Ok(account) => account,
            Err(e) if e.is_not_found() => {
                debug!(code = %code, "Referral code unresolved, skipping credit");
                return;
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Referrer lookup failed");
                return;
            }
        };

        let result = self
            .store
            .update(&referrer.email, |account| {
                account.referral_bonus += REFERRAL_BONUS_MINOR_UNITS;
                account.updated_at = Utc::now();
                account.referral_bonus
            })
            .await;

        match result {
            Ok(balance) => {
                info!(
                    referrer = %referrer.email,
                    upgraded = %upgraded_email,
                    balance = balance,
                    "Credited referral bonus"
                );
            }
            Err(e) => {
                warn!(referrer = %referrer.email, error = %e, "Failed to credit referrer");
            }
        }
    }
}

/// Decode a lowercase/uppercase hex string.
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Sign a payload the way the provider is expected to. Exposed for tests
/// and local tooling.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
    mac.update(payload);
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
