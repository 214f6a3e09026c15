//! Pricing, cart and promo logic for the travel-activity storefront.
//!
//! This crate turns the loosely-shaped records returned by the storefront's
//! REST collaborators into typed values and computes what the UI shows:
//!
//! - **Catalog**: Activities and categories
//! - **Cart**: Lines, effective prices, cart totals
//! - **Promo**: Code evaluation against a subtotal
//! - **Checkout**: Checkout request payload, transactions
//! - **Session**: Auth token, cart, applied promo and notifications for one session
//! - **Ingest**: Coercion of collaborator JSON at the boundary
//!
//! # Example
//!
//! ```rust
//! use trip_commerce::prelude::*;
//!
//! let snorkeling = Activity::new("act-1", "Snorkeling", Money::new(100, Currency::IDR))
//!     .with_discount(Money::new(80, Currency::IDR));
//!
//! let mut cart = Cart::new(Currency::IDR);
//! cart.add_activity(snorkeling, 2).unwrap();
//!
//! let totals = cart.totals();
//! assert_eq!(totals.display_price.amount, 160);
//! assert_eq!(totals.original_price.map(|m| m.amount), Some(200));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod ingest;
pub mod promo;
pub mod session;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Activity, Category};

    // Cart
    pub use crate::cart::{
        resolve_activity_price, resolve_cart_savings, resolve_cart_totals, resolve_line_price,
        Cart, CartLine, PriceBreakdown,
    };

    // Promo
    pub use crate::promo::{
        evaluate_promo_code, evaluate_promo_code_now, Promo, PromoError, PromoEvaluation,
    };

    // Checkout
    pub use crate::checkout::{CheckoutRequest, PaymentMethod, Transaction, TransactionStatus};

    // Session
    pub use crate::session::{
        AppliedPromo, CheckoutSummary, Notification, NotificationLevel, StorefrontSession,
        UserProfile, UserRole,
    };

    // Ingest
    pub use crate::ingest::IngestError;
}
