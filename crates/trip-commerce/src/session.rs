//! Session-scoped storefront state.
//!
//! One [`StorefrontSession`] holds everything the UI layers share: the auth
//! token, the cart, the applied promo and pending notifications. It is owned
//! by a single controller and passed to whoever needs it; mutation goes through
//! intent methods so the promo can be kept consistent with the cart.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine, PriceBreakdown};
use crate::catalog::Activity;
use crate::checkout::{CheckoutRequest, PaymentMethod};
use crate::error::CommerceError;
use crate::ids::{CartLineId, UserId};
use crate::money::{Currency, Money};
use crate::promo::{evaluate_promo_code, Promo, PromoError, PromoEvaluation};

/// Maximum notifications kept before the oldest are dropped.
pub const MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// The logged-in user as returned by the auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A toast waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// A promo accepted against the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromo {
    pub promo: Promo,
    pub discount_amount: Money,
}

/// Totals shown on the checkout page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    /// Cart totals before the promo.
    pub subtotal: PriceBreakdown,
    pub promo_code: Option<String>,
    pub discount_amount: Money,
    /// Subtotal minus promo discount, never below zero.
    pub grand_total: Money,
}

#[derive(Debug, Clone)]
struct AuthState {
    token: String,
    user: Option<UserProfile>,
}

/// Storefront state for one browser session.
#[derive(Debug, Clone)]
pub struct StorefrontSession {
    auth: Option<AuthState>,
    cart: Cart,
    applied_promo: Option<AppliedPromo>,
    notifications: VecDeque<Notification>,
}

impl StorefrontSession {
    pub fn new(currency: Currency) -> Self {
        Self {
            auth: None,
            cart: Cart::new(currency),
            applied_promo: None,
            notifications: VecDeque::new(),
        }
    }

    // Auth

    pub fn login(&mut self, token: impl Into<String>, user: Option<UserProfile>) {
        self.auth = Some(AuthState {
            token: token.into(),
            user,
        });
        tracing::debug!("session authenticated");
    }

    /// Clear the token, user, cart and applied promo.
    pub fn logout(&mut self) {
        self.auth = None;
        self.cart.clear();
        self.applied_promo = None;
        tracing::debug!("session cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.role == UserRole::Admin).unwrap_or(false)
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.auth.as_ref().and_then(|a| a.user.as_ref())
    }

    /// Value for the `Authorization` header.
    pub fn auth_header(&self) -> Option<String> {
        self.auth.as_ref().map(|a| format!("Bearer {}", a.token))
    }

    // Cart

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Replace the cart with lines fetched from the cart collaborator.
    ///
    /// The applied promo is kept; [`Self::checkout_summary`] re-checks its minimum.
    pub fn replace_cart(&mut self, lines: Vec<CartLine>) {
        let currency = self.cart.currency;
        self.cart = Cart::from_lines(lines, currency);
    }

    pub fn add_to_cart(
        &mut self,
        activity: Activity,
        quantity: i64,
    ) -> Result<CartLineId, CommerceError> {
        let title = activity.title.clone();
        let id = self.cart.add_activity(activity, quantity)?;
        self.notify(NotificationLevel::Success, format!("{title} added to cart"));
        Ok(id)
    }

    pub fn update_quantity(
        &mut self,
        line_id: &CartLineId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        self.cart.update_quantity(line_id, quantity)
    }

    pub fn remove_from_cart(&mut self, line_id: &CartLineId) -> Result<(), CommerceError> {
        if self.cart.remove_line(line_id) {
            Ok(())
        } else {
            Err(CommerceError::LineNotInCart(line_id.to_string()))
        }
    }

    /// Empty the cart. The applied promo goes with it.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.applied_promo = None;
    }

    // Promo

    pub fn applied_promo(&self) -> Option<&AppliedPromo> {
        self.applied_promo.as_ref()
    }

    /// Evaluate `code` against the current cart total and remember it on success.
    ///
    /// Either way a notification is queued with the outcome.
    pub fn apply_promo(
        &mut self,
        promos: &[Promo],
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<PromoEvaluation, PromoError> {
        let subtotal = self.cart.totals().display_price;
        match evaluate_promo_code(promos, code, subtotal, now) {
            Ok(evaluation) => {
                self.applied_promo = Some(AppliedPromo {
                    promo: evaluation.promo.clone(),
                    discount_amount: evaluation.discount_amount,
                });
                self.notify(
                    NotificationLevel::Success,
                    format!("Promo {} applied", evaluation.promo.promo_code),
                );
                Ok(evaluation)
            }
            Err(error) => {
                self.notify(NotificationLevel::Error, error.to_string());
                Err(error)
            }
        }
    }

    pub fn remove_promo(&mut self) -> bool {
        self.applied_promo.take().is_some()
    }

    // Checkout

    /// Compute checkout totals.
    ///
    /// If the cart shrank below the applied promo's minimum, the promo is
    /// dropped and a warning is queued.
    pub fn checkout_summary(&mut self) -> CheckoutSummary {
        let subtotal = self.cart.totals();
        let currency = subtotal.display_price.currency;

        let still_eligible = self
            .applied_promo
            .as_ref()
            .and_then(|applied| applied.promo.minimum_claim_price)
            .map(|minimum| subtotal.display_price.amount >= minimum.amount)
            .unwrap_or(true);
        if !still_eligible {
            if let Some(dropped) = self.applied_promo.take() {
                self.notify(
                    NotificationLevel::Warning,
                    format!(
                        "Promo {} removed: cart is below the minimum purchase",
                        dropped.promo.promo_code
                    ),
                );
            }
        }

        let discount_amount = self
            .applied_promo
            .as_ref()
            .map(|applied| Money::new(applied.discount_amount.amount, currency))
            .unwrap_or_else(|| Money::zero(currency));
        let grand_total = Money::new(
            subtotal
                .display_price
                .amount
                .saturating_sub(discount_amount.amount),
            currency,
        )
        .non_negative();

        CheckoutSummary {
            subtotal,
            promo_code: self
                .applied_promo
                .as_ref()
                .map(|applied| applied.promo.promo_code.clone()),
            discount_amount,
            grand_total,
        }
    }

    /// Build the create-transaction payload for the current cart.
    pub fn checkout_request(
        &mut self,
        payment_method: &PaymentMethod,
    ) -> Result<CheckoutRequest, CommerceError> {
        if !self.is_authenticated() {
            return Err(CommerceError::NotAuthenticated);
        }
        if self.cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let summary = self.checkout_summary();
        Ok(CheckoutRequest {
            cart_ids: self.cart.lines.iter().map(|l| l.id.clone()).collect(),
            payment_method_id: payment_method.id.clone(),
            promo_code: summary.promo_code,
            total: summary.grand_total,
        })
    }

    // Notifications

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            level,
            message: message.into(),
        });
    }

    /// Take all pending notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }
}

impl Default for StorefrontSession {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}
