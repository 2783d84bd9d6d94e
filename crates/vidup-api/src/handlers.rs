//! Request handlers.

pub mod admin;
pub mod auth;
pub mod health;
pub mod payments;
pub mod referral;
pub mod upload;

pub use admin::*;
pub use auth::*;
pub use health::*;
pub use payments::*;
pub use referral::*;
pub use upload::*;
