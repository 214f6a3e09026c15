//! Bookable travel activities.

use crate::ids::{ActivityId, CategoryId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A bookable travel experience.
///
/// Only `price` and `price_discount` matter for pricing; the rest is carried
/// for display. Whether the discount applies is never stored, see
/// [`Activity::active_discount`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: ActivityId,
    /// Display title.
    pub title: String,
    /// Base unit price.
    pub price: Money,
    /// Discounted unit price, if the admin set one.
    pub price_discount: Option<Money>,
    /// Category this activity belongs to.
    pub category_id: Option<CategoryId>,
    /// Free-form location (city, province).
    pub location: Option<String>,
    /// Gallery image URLs.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Activity {
    /// Create an activity with a base price and no discount.
    pub fn new(id: impl Into<ActivityId>, title: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            price_discount: None,
            category_id: None,
            location: None,
            image_urls: Vec::new(),
        }
    }

    /// Set the discounted price.
    pub fn with_discount(mut self, price_discount: Money) -> Self {
        self.price_discount = Some(price_discount);
        self
    }

    /// The discounted price, if it is usable.
    ///
    /// A discount is usable only when it is strictly positive, strictly below
    /// the base price, and in the same currency.
    pub fn active_discount(&self) -> Option<Money> {
        self.price_discount.filter(|discount| {
            discount.currency == self.price.currency
                && discount.amount > 0
                && discount.amount < self.price.amount
        })
    }

    pub fn has_discount(&self) -> bool {
        self.active_discount().is_some()
    }
}
