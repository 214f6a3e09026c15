//! Payment method selection and the checkout request payload.

use crate::ids::{CartLineId, PaymentMethodId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A bank the customer can transfer to. Selection only; no gateway logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
    pub image_url: Option<String>,
}

/// Body of the create-transaction call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Cart line ids being purchased.
    pub cart_ids: Vec<CartLineId>,
    pub payment_method_id: PaymentMethodId,
    /// Applied promo code, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    /// Grand total after the promo discount.
    pub total: Money,
}
