//! Transactions returned by the transaction collaborator.

use crate::cart::{resolve_cart_totals, CartLine, PriceBreakdown};
use crate::checkout::PaymentMethod;
use crate::ids::TransactionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting payment proof or confirmation.
    #[default]
    Pending,
    /// Paid and confirmed.
    Success,
    /// Payment rejected.
    Failed,
    /// Cancelled by the customer or expired.
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Success => "Success",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Cancelled => "Cancelled",
        }
    }

    /// Map a collaborator status label. Unknown labels count as pending.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "success" | "paid" => TransactionStatus::Success,
            "failed" => TransactionStatus::Failed,
            "cancelled" | "canceled" => TransactionStatus::Cancelled,
            _ => TransactionStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

/// A persisted purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub invoice_id: Option<String>,
    pub status: TransactionStatus,
    /// Purchased lines, owned by the transaction.
    pub lines: Vec<CartLine>,
    pub payment_method: Option<PaymentMethod>,
    pub order_date: Option<DateTime<Utc>>,
    /// Deadline for payment proof.
    pub expired_date: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Display and original totals across the purchased lines.
    pub fn totals(&self) -> PriceBreakdown {
        resolve_cart_totals(&self.lines)
    }

    /// Whether the payment deadline passed while still pending.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == TransactionStatus::Pending
            && self.expired_date.map(|deadline| now > deadline).unwrap_or(false)
    }
}
