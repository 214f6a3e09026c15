//! Checkout module.
//!
//! Contains the checkout request sent to the transaction collaborator and the
//! transactions it returns.

mod payment;
mod transaction;

pub use payment::{CheckoutRequest, PaymentMethod};
pub use transaction::{Transaction, TransactionStatus};
