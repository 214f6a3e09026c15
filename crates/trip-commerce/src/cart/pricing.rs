//! Price resolution for activities, cart lines and whole carts.
//!
//! All three resolvers are pure and never fail: missing input degrades to a
//! zero display price with no original price.

use crate::cart::CartLine;
use crate::catalog::Activity;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Display price plus the struck-through original price, if any.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Price shown and charged after any active discount.
    pub display_price: Money,
    /// Pre-discount price. `None` when nothing in the aggregate is discounted.
    pub original_price: Option<Money>,
}

impl PriceBreakdown {
    /// Zero display price, no original price.
    pub fn zero(currency: Currency) -> Self {
        Self {
            display_price: Money::zero(currency),
            original_price: None,
        }
    }

    pub fn is_discounted(&self) -> bool {
        self.original_price.is_some()
    }

    /// Amount saved against the original price, zero when not discounted.
    pub fn savings(&self) -> Money {
        self.original_price
            .and_then(|original| original.try_subtract(&self.display_price))
            .map(|saved| saved.non_negative())
            .unwrap_or_else(|| Money::zero(self.display_price.currency))
    }

    /// Savings as a percentage of the original price.
    pub fn discount_percentage(&self) -> f64 {
        match self.original_price {
            Some(original) if original.amount > 0 => {
                (self.savings().amount as f64 / original.amount as f64) * 100.0
            }
            _ => 0.0,
        }
    }
}

/// Resolve the effective unit price of one activity.
pub fn resolve_activity_price(activity: Option<&Activity>) -> PriceBreakdown {
    let Some(activity) = activity else {
        return PriceBreakdown::zero(Currency::default());
    };

    match activity.active_discount() {
        Some(discount) => PriceBreakdown {
            display_price: discount,
            original_price: Some(activity.price),
        },
        None => PriceBreakdown {
            display_price: activity.price,
            original_price: None,
        },
    }
}

/// Resolve a line's totals: unit prices multiplied by quantity.
///
/// A quantity below one is treated as one.
pub fn resolve_line_price(line: Option<&CartLine>) -> PriceBreakdown {
    let Some(activity) = line.and_then(|l| l.activity.as_ref()) else {
        return PriceBreakdown::zero(Currency::default());
    };
    let quantity = line.map(CartLine::effective_quantity).unwrap_or(1);

    let unit = resolve_activity_price(Some(activity));
    PriceBreakdown {
        display_price: unit.display_price.saturating_mul(quantity),
        original_price: unit.original_price.map(|p| p.saturating_mul(quantity)),
    }
}

/// Sum line totals across a cart.
///
/// `original_price` only accumulates lines that carry a discount, so it is not
/// the full pre-discount cart total when discounted and undiscounted lines mix.
pub fn resolve_cart_totals(lines: &[CartLine]) -> PriceBreakdown {
    let currency = lines
        .iter()
        .find_map(|line| line.activity.as_ref())
        .map(|activity| activity.price.currency)
        .unwrap_or_default();
    aggregate_lines(lines, currency)
}

/// Amount saved across a cart, summed line by line.
///
/// Unlike `original - display` on [`resolve_cart_totals`], this stays correct
/// when discounted and undiscounted lines mix.
pub fn resolve_cart_savings(lines: &[CartLine]) -> Money {
    let currency = lines
        .iter()
        .find_map(|line| line.activity.as_ref())
        .map(|activity| activity.price.currency)
        .unwrap_or_default();
    savings_over_lines(lines, currency)
}

pub(crate) fn savings_over_lines(lines: &[CartLine], currency: Currency) -> Money {
    lines
        .iter()
        .filter(|line| line.activity.is_some())
        .map(|line| resolve_line_price(Some(line)).savings())
        .fold(Money::zero(currency), |acc, saved| {
            acc.try_add(&saved).unwrap_or(acc)
        })
}

pub(crate) fn aggregate_lines(lines: &[CartLine], currency: Currency) -> PriceBreakdown {
    let mut total_display = Money::zero(currency);
    let mut total_original = Money::zero(currency);
    let mut any_discount = false;

    for line in lines {
        if line.activity.is_none() {
            continue;
        }
        let resolved = resolve_line_price(Some(line));
        let Some(display) = total_display.try_add(&resolved.display_price) else {
            tracing::warn!(
                line_id = %line.id,
                expected = %currency,
                got = %resolved.display_price.currency,
                "skipping cart line priced in another currency"
            );
            continue;
        };
        total_display = display;

        if let Some(original) = resolved.original_price {
            if let Some(sum) = total_original.try_add(&original) {
                total_original = sum;
                any_discount = true;
            }
        }
    }

    PriceBreakdown {
        display_price: total_display,
        original_price: any_discount.then_some(total_original),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idr(amount: i64) -> Money {
        Money::new(amount, Currency::IDR)
    }

    fn line(price: i64, discount: Option<i64>, quantity: i64) -> CartLine {
        let mut activity = Activity::new("act", "Rafting", idr(price));
        activity.price_discount = discount.map(idr);
        CartLine::new(activity, quantity)
    }

    #[test]
    fn test_missing_activity_resolves_to_zero() {
        assert_eq!(
            resolve_activity_price(None),
            PriceBreakdown::zero(Currency::IDR)
        );
    }

    #[test]
    fn test_discounted_line_multiplies_both_prices() {
        let resolved = resolve_line_price(Some(&line(100, Some(80), 2)));
        assert_eq!(resolved.display_price, idr(160));
        assert_eq!(resolved.original_price, Some(idr(200)));
    }

    #[test]
    fn test_non_positive_quantity_defaults_to_one() {
        assert_eq!(resolve_line_price(Some(&line(100, None, 0))).display_price, idr(100));
        assert_eq!(resolve_line_price(Some(&line(100, None, -3))).display_price, idr(100));
    }

    #[test]
    fn test_line_without_activity_resolves_to_zero() {
        let mut empty = line(100, None, 2);
        empty.activity = None;
        assert_eq!(
            resolve_line_price(Some(&empty)),
            PriceBreakdown::zero(Currency::IDR)
        );
        assert_eq!(resolve_line_price(None), PriceBreakdown::zero(Currency::IDR));
    }

    #[test]
    fn test_empty_cart_totals() {
        assert_eq!(resolve_cart_totals(&[]), PriceBreakdown::zero(Currency::IDR));
    }

    #[test]
    fn test_cart_original_only_counts_discounted_lines() {
        let lines = vec![line(100, Some(80), 2), line(50, None, 1)];
        let totals = resolve_cart_totals(&lines);
        assert_eq!(totals.display_price, idr(210));
        assert_eq!(totals.original_price, Some(idr(200)));
    }

    #[test]
    fn test_cart_without_discounts_has_no_original() {
        let lines = vec![line(100, None, 1), line(50, Some(60), 3)];
        let totals = resolve_cart_totals(&lines);
        assert_eq!(totals.display_price, idr(250));
        assert_eq!(totals.original_price, None);
    }

    #[test]
    fn test_cart_skips_lines_in_other_currency() {
        let mut foreign = line(10, None, 1);
        if let Some(activity) = foreign.activity.as_mut() {
            activity.price = Money::new(10, Currency::USD);
        }
        let totals = resolve_cart_totals(&[line(100, None, 1), foreign]);
        assert_eq!(totals.display_price, idr(100));
    }

    #[test]
    fn test_savings_and_percentage() {
        let breakdown = resolve_line_price(Some(&line(100, Some(80), 2)));
        assert_eq!(breakdown.savings(), idr(40));
        assert!((breakdown.discount_percentage() - 20.0).abs() < 0.001);

        let plain = resolve_line_price(Some(&line(100, None, 2)));
        assert!(plain.savings().is_zero());
        assert_eq!(plain.discount_percentage(), 0.0);
    }

    #[test]
    fn test_mixed_cart_savings_sum_per_line() {
        let lines = vec![line(100, Some(80), 2), line(50, None, 1)];
        let totals = resolve_cart_totals(&lines);
        // The aggregate alone cannot express this saving.
        assert!(totals.savings().is_zero());
        assert_eq!(resolve_cart_savings(&lines), idr(40));
    }

    #[test]
    fn test_cart_savings_without_discounts() {
        assert!(resolve_cart_savings(&[line(100, None, 2)]).is_zero());
        assert!(resolve_cart_savings(&[]).is_zero());
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let json = serde_json::to_value(resolve_activity_price(None)).unwrap();
        assert!(json.get("displayPrice").is_some());
        assert!(json["originalPrice"].is_null());
    }
}
