//! Activity catalog module.
//!
//! Contains the bookable activity record and the categories that group them.

mod activity;
mod category;

pub use activity::Activity;
pub use category::Category;
