//! Cart and cart line types.

use crate::cart::pricing::{aggregate_lines, savings_over_lines};
use crate::cart::PriceBreakdown;
use crate::catalog::Activity;
use crate::error::CommerceError;
use crate::ids::{ActivityId, CartId, CartLineId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 99;

/// An activity paired with a quantity, as stored in a cart or transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Line identifier (the collaborator's cart id).
    pub id: CartLineId,
    /// The activity booked. `None` when the collaborator sent an unusable record.
    pub activity: Option<Activity>,
    /// Number of tickets.
    pub quantity: i64,
}

impl CartLine {
    pub fn new(activity: Activity, quantity: i64) -> Self {
        Self {
            id: CartLineId::generate(),
            activity: Some(activity),
            quantity,
        }
    }

    /// Quantity used for pricing; anything below one counts as one.
    pub fn effective_quantity(&self) -> i64 {
        if self.quantity > 0 {
            self.quantity
        } else {
            1
        }
    }

    pub fn activity_id(&self) -> Option<&ActivityId> {
        self.activity.as_ref().map(|a| &a.id)
    }

    /// Display and original totals for this line.
    pub fn price(&self) -> PriceBreakdown {
        super::resolve_line_price(Some(self))
    }
}

/// A client-side shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
    /// Cart currency.
    pub currency: Currency,
}

impl Cart {
    pub fn new(currency: Currency) -> Self {
        Self {
            id: CartId::generate(),
            lines: Vec::new(),
            currency,
        }
    }

    /// Build a cart from lines fetched from the cart collaborator.
    pub fn from_lines(lines: Vec<CartLine>, currency: Currency) -> Self {
        Self {
            id: CartId::generate(),
            lines,
            currency,
        }
    }

    /// Add an activity to the cart.
    ///
    /// Adding an activity already in the cart increases that line's quantity.
    pub fn add_activity(
        &mut self,
        activity: Activity,
        quantity: i64,
    ) -> Result<CartLineId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if activity.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: activity.price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.activity_id() == Some(&activity.id))
        {
            let new_quantity = existing.quantity.saturating_add(quantity);
            if new_quantity > MAX_QUANTITY_PER_LINE {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_LINE,
                ));
            }
            existing.quantity = new_quantity;
            // Refresh the snapshot so a changed discount shows up immediately.
            existing.activity = Some(activity);
            return Ok(existing.id.clone());
        }

        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }

        let line = CartLine::new(activity, quantity);
        let id = line.id.clone();
        self.lines.push(line);
        Ok(id)
    }

    /// Update a line's quantity. A quantity of zero or less removes the line.
    pub fn update_quantity(
        &mut self,
        line_id: &CartLineId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return if self.remove_line(line_id) {
                Ok(())
            } else {
                Err(CommerceError::LineNotInCart(line_id.to_string()))
            };
        }
        if quantity > MAX_QUANTITY_PER_LINE {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_LINE,
            ));
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| &l.id == line_id)
            .ok_or_else(|| CommerceError::LineNotInCart(line_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line from the cart.
    pub fn remove_line(&mut self, line_id: &CartLineId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.id != line_id);
        self.lines.len() < len_before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total ticket count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(CartLine::effective_quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get_line(&self, line_id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    /// Display and original totals across all lines.
    pub fn totals(&self) -> PriceBreakdown {
        aggregate_lines(&self.lines, self.currency)
    }

    /// Amount saved by active discounts across all lines.
    pub fn savings(&self) -> Money {
        savings_over_lines(&self.lines, self.currency)
    }

    /// Cart price before any discount: display total plus savings.
    pub fn full_price(&self) -> Money {
        let totals = self.totals();
        totals
            .display_price
            .try_add(&self.savings())
            .unwrap_or(totals.display_price)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, price: i64) -> Activity {
        Activity::new(id, "Island Hopping", Money::new(price, Currency::IDR))
    }

    #[test]
    fn test_add_activity() {
        let mut cart = Cart::default();
        cart.add_activity(activity("a1", 100), 2).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_add_same_activity_merges_lines() {
        let mut cart = Cart::default();
        let first = cart.add_activity(activity("a1", 100), 1).unwrap();
        let second = cart.add_activity(activity("a1", 100), 2).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::default();
        assert!(matches!(
            cart.add_activity(activity("a1", 100), 0),
            Err(CommerceError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::default();
        let result = cart.add_activity(activity("a1", 100), MAX_QUANTITY_PER_LINE + 1);
        assert!(matches!(result, Err(CommerceError::QuantityExceedsLimit(..))));

        let id = cart.add_activity(activity("a1", 100), MAX_QUANTITY_PER_LINE).unwrap();
        assert!(cart.add_activity(activity("a1", 100), 1).is_err());
        assert_eq!(cart.get_line(&id).unwrap().quantity, MAX_QUANTITY_PER_LINE);
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut cart = Cart::new(Currency::IDR);
        let foreign = Activity::new("a1", "Tour", Money::new(100, Currency::USD));
        assert!(matches!(
            cart.add_activity(foreign, 1),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_update_quantity_and_remove() {
        let mut cart = Cart::default();
        let id = cart.add_activity(activity("a1", 100), 1).unwrap();

        cart.update_quantity(&id, 5).unwrap();
        assert_eq!(cart.item_count(), 5);

        cart.update_quantity(&id, 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.update_quantity(&id, 2),
            Err(CommerceError::LineNotInCart(_))
        ));
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::default();
        cart.add_activity(
            activity("a1", 100).with_discount(Money::new(80, Currency::IDR)),
            2,
        )
        .unwrap();
        cart.add_activity(activity("a2", 50), 1).unwrap();

        let totals = cart.totals();
        assert_eq!(totals.display_price.amount, 210);
        assert_eq!(totals.original_price.map(|m| m.amount), Some(200));
        assert_eq!(cart.savings().amount, 40);
        assert_eq!(cart.full_price().amount, 250);
    }

    #[test]
    fn test_empty_cart_totals_use_cart_currency() {
        let cart = Cart::new(Currency::USD);
        let totals = cart.totals();
        assert_eq!(totals.display_price, Money::zero(Currency::USD));
        assert!(totals.original_price.is_none());
    }
}
