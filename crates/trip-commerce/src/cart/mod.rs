//! Shopping cart module.
//!
//! Contains the cart, its lines, and the price resolution that turns them into
//! display and original totals.

mod cart;
mod pricing;

pub use cart::{Cart, CartLine, MAX_QUANTITY_PER_LINE};
pub use pricing::{
    resolve_activity_price, resolve_cart_savings, resolve_cart_totals, resolve_line_price, PriceBreakdown,
};
