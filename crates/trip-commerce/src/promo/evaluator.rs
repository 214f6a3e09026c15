//! Promo code evaluation against a subtotal.

use crate::money::Money;
use crate::promo::{Promo, PromoError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A promo that applies, with the resulting totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromoEvaluation {
    /// The matched promo record.
    pub promo: Promo,
    /// Amount taken off the subtotal.
    pub discount_amount: Money,
    /// Subtotal minus discount, never below zero.
    pub final_total: Money,
    pub is_valid: bool,
}

/// Evaluate `code` against a promo snapshot at time `now`.
///
/// The first active promo whose code matches (ignoring case) wins; duplicates
/// later in the list are never consulted.
pub fn evaluate_promo_code(
    promos: &[Promo],
    code: &str,
    current_total: Money,
    now: DateTime<Utc>,
) -> Result<PromoEvaluation, PromoError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(PromoError::InvalidPromoCode);
    }

    let promo = promos
        .iter()
        .find(|p| p.is_active && p.matches_code(code))
        .ok_or(PromoError::InvalidPromoCode)?;

    if !promo.has_started(now) {
        return Err(PromoError::PromoNotYetActive);
    }
    if promo.has_expired(now) {
        return Err(PromoError::PromoExpired);
    }

    // Amounts are compared in minor units; the ingest layer tags every record
    // with the storefront currency.
    if let Some(minimum) = promo.minimum_claim_price {
        if current_total.amount < minimum.amount {
            return Err(PromoError::MinimumPurchaseNotMet { minimum });
        }
    }

    let discount_amount = promo
        .promo_discount_price
        .map(|d| Money::new(d.amount.max(0), current_total.currency))
        .unwrap_or_else(|| Money::zero(current_total.currency));
    let final_total = Money::new(
        current_total.amount.saturating_sub(discount_amount.amount),
        current_total.currency,
    )
    .non_negative();

    tracing::debug!(
        promo_id = %promo.id,
        code = %promo.promo_code,
        discount = discount_amount.amount,
        final_total = final_total.amount,
        "promo code applied"
    );

    Ok(PromoEvaluation {
        promo: promo.clone(),
        discount_amount,
        final_total,
        is_valid: true,
    })
}

/// [`evaluate_promo_code`] at the current wall-clock time.
pub fn evaluate_promo_code_now(
    promos: &[Promo],
    code: &str,
    current_total: Money,
) -> Result<PromoEvaluation, PromoError> {
    evaluate_promo_code(promos, code, current_total, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PromoId;
    use crate::money::Currency;
    use chrono::{Duration, TimeZone};

    fn idr(amount: i64) -> Money {
        Money::new(amount, Currency::IDR)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn promo(code: &str) -> Promo {
        Promo {
            id: PromoId::new(format!("promo-{code}")),
            title: "Holiday Sale".to_string(),
            promo_code: code.to_string(),
            is_active: true,
            start_date: now() - Duration::days(1),
            end_date: now() + Duration::days(1),
            minimum_claim_price: Some(idr(100)),
            promo_discount_price: Some(idr(20)),
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        let result = evaluate_promo_code(&[promo("SAVE10")], "save10", idr(150), now()).unwrap();
        assert_eq!(result.discount_amount, idr(20));
        assert_eq!(result.final_total, idr(130));
        assert!(result.is_valid);
    }

    #[test]
    fn test_unknown_code() {
        let result = evaluate_promo_code(&[promo("SAVE10")], "SAVE20", idr(150), now());
        assert_eq!(result, Err(PromoError::InvalidPromoCode));
    }

    #[test]
    fn test_empty_code() {
        let result = evaluate_promo_code(&[promo("SAVE10")], "  ", idr(150), now());
        assert_eq!(result, Err(PromoError::InvalidPromoCode));
    }

    #[test]
    fn test_inactive_promo_is_invalid() {
        let mut inactive = promo("SAVE10");
        inactive.is_active = false;
        let result = evaluate_promo_code(&[inactive], "SAVE10", idr(150), now());
        assert_eq!(result, Err(PromoError::InvalidPromoCode));
    }

    #[test]
    fn test_not_yet_active() {
        let mut future = promo("SAVE10");
        future.start_date = now() + Duration::hours(1);
        let result = evaluate_promo_code(&[future], "SAVE10", idr(150), now());
        assert_eq!(result, Err(PromoError::PromoNotYetActive));
    }

    #[test]
    fn test_expired() {
        let mut past = promo("SAVE10");
        past.end_date = now() - Duration::seconds(1);
        let result = evaluate_promo_code(&[past], "SAVE10", idr(150), now());
        assert_eq!(result, Err(PromoError::PromoExpired));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let mut exact = promo("SAVE10");
        exact.start_date = now();
        exact.end_date = now();
        assert!(evaluate_promo_code(&[exact], "SAVE10", idr(150), now()).is_ok());
    }

    #[test]
    fn test_minimum_not_met() {
        let result = evaluate_promo_code(&[promo("SAVE10")], "SAVE10", idr(50), now());
        assert_eq!(
            result,
            Err(PromoError::MinimumPurchaseNotMet { minimum: idr(100) })
        );
    }

    #[test]
    fn test_minimum_exactly_met() {
        let result = evaluate_promo_code(&[promo("SAVE10")], "SAVE10", idr(100), now()).unwrap();
        assert_eq!(result.final_total, idr(80));
    }

    #[test]
    fn test_final_total_never_negative() {
        let mut big = promo("BIG");
        big.minimum_claim_price = None;
        big.promo_discount_price = Some(idr(500));
        let result = evaluate_promo_code(&[big], "big", idr(150), now()).unwrap();
        assert!(result.final_total.is_zero());
    }

    #[test]
    fn test_missing_discount_is_zero() {
        let mut free = promo("NOTHING");
        free.promo_discount_price = None;
        let result = evaluate_promo_code(&[free], "nothing", idr(150), now()).unwrap();
        assert!(result.discount_amount.is_zero());
        assert_eq!(result.final_total, idr(150));
    }

    #[test]
    fn test_first_active_match_wins() {
        let mut inactive = promo("DUP");
        inactive.is_active = false;
        inactive.promo_discount_price = Some(idr(90));
        let mut first = promo("DUP");
        first.promo_discount_price = Some(idr(10));
        let mut second = promo("dup");
        second.promo_discount_price = Some(idr(30));

        let result =
            evaluate_promo_code(&[inactive, first, second], "Dup", idr(150), now()).unwrap();
        assert_eq!(result.discount_amount, idr(10));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PromoError::PromoExpired.to_string(), "Promo code has expired");
        assert_eq!(
            PromoError::MinimumPurchaseNotMet { minimum: idr(100000) }.to_string(),
            "Minimum purchase of Rp100000 required to use this promo"
        );
    }
}
