//! Commerce error types.

use thiserror::Error;

use crate::ingest::IngestError;
use crate::promo::PromoError;

/// Errors raised by cart, session and checkout operations.
///
/// The pricing functions never fail; they degrade to zero on missing input.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity below one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Line not in cart.
    #[error("Item not in cart: {0}")]
    LineNotInCart(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Operation requires a logged-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Promo evaluation failed.
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// Collaborator payload could not be read.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
