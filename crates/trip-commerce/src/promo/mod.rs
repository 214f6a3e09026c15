//! Promo codes.
//!
//! Promo records are managed by admins elsewhere; this module only reads a
//! freshly fetched snapshot and decides whether a code applies to a subtotal.

mod evaluator;
mod promo;

pub use evaluator::{evaluate_promo_code, evaluate_promo_code_now, PromoEvaluation};
pub use promo::{Promo, PromoError};
