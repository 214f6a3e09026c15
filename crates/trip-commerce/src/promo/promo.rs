//! Promo record and evaluation errors.

use crate::ids::PromoId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A discount code with an activation window and a minimum-spend gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promo {
    /// Unique promo identifier.
    pub id: PromoId,
    /// Display title.
    pub title: String,
    /// Code the customer types (matched case-insensitively).
    pub promo_code: String,
    /// Admin on/off switch.
    pub is_active: bool,
    /// Start of the validity window.
    pub start_date: DateTime<Utc>,
    /// End of the validity window.
    pub end_date: DateTime<Utc>,
    /// Minimum subtotal required to claim.
    pub minimum_claim_price: Option<Money>,
    /// Flat amount taken off the subtotal.
    pub promo_discount_price: Option<Money>,
}

impl Promo {
    pub fn matches_code(&self, code: &str) -> bool {
        self.promo_code.trim().eq_ignore_ascii_case(code.trim())
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_date
    }

    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }
}

/// Reasons a promo code cannot be applied.
///
/// The `Display` text is shown verbatim next to the promo input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoError {
    #[error("Invalid promo code")]
    InvalidPromoCode,

    #[error("Promo code is not active yet")]
    PromoNotYetActive,

    #[error("Promo code has expired")]
    PromoExpired,

    #[error("Minimum purchase of {minimum} required to use this promo")]
    MinimumPurchaseNotMet { minimum: Money },
}
