//! Coercion of collaborator JSON into typed records.
//!
//! The REST collaborators return `{ "data": [...] }` envelopes whose records
//! are loosely shaped: prices may be numbers or numeric strings, optional
//! fields may be missing or `null`, and dates come in several ISO forms. All
//! of that is resolved here so the pricing code can take typed input.
//!
//! A record that cannot be coerced is skipped with a warning rather than
//! failing the whole list.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::cart::CartLine;
use crate::catalog::{Activity, Category};
use crate::checkout::{PaymentMethod, Transaction, TransactionStatus};
use crate::ids::{ActivityId, CartLineId, CategoryId, PromoId, TransactionId};
use crate::money::{Currency, Money};
use crate::promo::Promo;

/// Errors reading a collaborator payload as a whole.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Payload is not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    /// Payload is neither a `{ "data": [...] }` envelope nor a bare array.
    #[error("Expected a list of records under \"data\"")]
    MissingData,
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        IngestError::InvalidJson(e.to_string())
    }
}

/// A number that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

/// An identifier that may arrive as a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseId {
    Text(String),
    Number(i64),
}

impl LooseId {
    fn into_string(self) -> String {
        match self {
            LooseId::Text(s) => s,
            LooseId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivity {
    id: LooseId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<LooseNumber>,
    #[serde(default, alias = "price_discount")]
    price_discount: Option<LooseNumber>,
    #[serde(default, alias = "category_id")]
    category_id: Option<LooseId>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    province: Option<String>,
    #[serde(default, alias = "image_urls")]
    image_urls: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    id: LooseId,
    name: String,
    #[serde(default, alias = "image_url")]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPromo {
    id: LooseId,
    #[serde(default)]
    title: Option<String>,
    #[serde(alias = "promo_code")]
    promo_code: String,
    #[serde(default, alias = "is_active")]
    is_active: Option<bool>,
    #[serde(alias = "start_date")]
    start_date: String,
    #[serde(alias = "end_date")]
    end_date: String,
    #[serde(default, alias = "minimum_claim_price")]
    minimum_claim_price: Option<LooseNumber>,
    #[serde(default, alias = "promo_discount_price")]
    promo_discount_price: Option<LooseNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPaymentMethod {
    id: LooseId,
    name: String,
    #[serde(default, alias = "image_url")]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    id: LooseId,
    #[serde(default, alias = "invoice_id")]
    invoice_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "payment_method")]
    payment_method: Option<RawPaymentMethod>,
    #[serde(default, alias = "order_date")]
    order_date: Option<String>,
    #[serde(default, alias = "expired_date")]
    expired_date: Option<String>,
    #[serde(default, alias = "transaction_items")]
    transaction_items: Vec<Value>,
}

/// Parse an activity list payload.
pub fn parse_activities(json: &str, currency: Currency) -> Result<Vec<Activity>, IngestError> {
    let records = records_from_str(json)?;
    Ok(coerce_all(records, "activity", |raw: RawActivity| {
        activity_from_raw(raw, currency)
    }))
}

/// Parse a category list payload.
pub fn parse_categories(json: &str) -> Result<Vec<Category>, IngestError> {
    let records = records_from_str(json)?;
    Ok(coerce_all(records, "category", |raw: RawCategory| {
        Some(Category {
            id: CategoryId::new(raw.id.into_string()),
            name: raw.name,
            image_url: raw.image_url,
        })
    }))
}

/// Parse a cart payload into lines.
///
/// Each record is either `{ id, quantity, activity: {...} }` or a flattened
/// activity carrying its own `quantity`. Lines whose activity cannot be
/// coerced are kept with `activity: None`.
pub fn parse_cart_lines(json: &str, currency: Currency) -> Result<Vec<CartLine>, IngestError> {
    let records = records_from_str(json)?;
    Ok(records
        .into_iter()
        .map(|record| line_from_value(record, currency))
        .collect())
}

/// Parse a promo list payload.
pub fn parse_promos(json: &str, currency: Currency) -> Result<Vec<Promo>, IngestError> {
    let records = records_from_str(json)?;
    Ok(coerce_all(records, "promo", |raw: RawPromo| {
        promo_from_raw(raw, currency)
    }))
}

/// Parse a payment method list payload.
pub fn parse_payment_methods(json: &str) -> Result<Vec<PaymentMethod>, IngestError> {
    let records = records_from_str(json)?;
    Ok(coerce_all(records, "payment method", |raw: RawPaymentMethod| {
        Some(payment_method_from_raw(raw))
    }))
}

/// Parse a transaction list payload.
pub fn parse_transactions(
    json: &str,
    currency: Currency,
) -> Result<Vec<Transaction>, IngestError> {
    let records = records_from_str(json)?;
    Ok(coerce_all(records, "transaction", |raw: RawTransaction| {
        Some(Transaction {
            id: TransactionId::new(raw.id.into_string()),
            invoice_id: raw.invoice_id,
            status: raw
                .status
                .as_deref()
                .map(TransactionStatus::from_label)
                .unwrap_or_default(),
            lines: raw
                .transaction_items
                .into_iter()
                .map(|item| line_from_value(item, currency))
                .collect(),
            payment_method: raw.payment_method.map(payment_method_from_raw),
            order_date: raw.order_date.as_deref().and_then(parse_date),
            expired_date: raw.expired_date.as_deref().and_then(parse_date),
        })
    }))
}

/// Parse an ISO date as UTC.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (or with a
/// space separator) and bare `YYYY-MM-DD`, which means midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn records_from_str(json: &str) -> Result<Vec<Value>, IngestError> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value)
}

fn records_from_value(value: Value) -> Result<Vec<Value>, IngestError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(IngestError::MissingData),
        },
        _ => Err(IngestError::MissingData),
    }
}

fn coerce_all<R, T>(records: Vec<Value>, kind: &str, convert: impl Fn(R) -> Option<T>) -> Vec<T>
where
    R: DeserializeOwned,
{
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<R>(record) {
            Ok(raw) => {
                let converted = convert(raw);
                if converted.is_none() {
                    tracing::warn!(index, kind, "skipping record with unusable fields");
                }
                converted
            }
            Err(error) => {
                tracing::warn!(index, kind, %error, "skipping malformed record");
                None
            }
        })
        .collect()
}

fn money(value: Option<&LooseNumber>, currency: Currency) -> Option<Money> {
    value
        .and_then(LooseNumber::as_f64)
        .map(|n| Money::from_decimal(n, currency))
}

fn activity_from_raw(raw: RawActivity, currency: Currency) -> Option<Activity> {
    let price = money(raw.price.as_ref(), currency).filter(|p| !p.is_negative())?;
    let location = match (raw.city, raw.province) {
        (Some(city), Some(province)) => Some(format!("{city}, {province}")),
        (city, province) => city.or(province),
    };

    Some(Activity {
        id: ActivityId::new(raw.id.into_string()),
        title: raw.title.unwrap_or_default(),
        price,
        price_discount: money(raw.price_discount.as_ref(), currency),
        category_id: raw.category_id.map(|id| CategoryId::new(id.into_string())),
        location,
        image_urls: raw.image_urls.unwrap_or_default(),
    })
}

fn line_from_value(mut record: Value, currency: Currency) -> CartLine {
    let id = record
        .get("id")
        .cloned()
        .and_then(|v| serde_json::from_value::<LooseId>(v).ok())
        .map(|id| CartLineId::new(id.into_string()))
        .unwrap_or_else(CartLineId::generate);
    let quantity = record
        .get("quantity")
        .cloned()
        .and_then(|v| serde_json::from_value::<LooseNumber>(v).ok())
        .and_then(|n| n.as_f64())
        .map(|n| n as i64)
        .unwrap_or(1);

    let nested = record.get_mut("activity").map(Value::take);
    let activity_value = match nested {
        Some(nested) => nested,
        None => {
            if let Some(activity_id) = record.get("activityId").cloned() {
                if let Some(map) = record.as_object_mut() {
                    map.insert("id".to_string(), activity_id);
                }
            }
            record
        }
    };

    let activity = match serde_json::from_value::<RawActivity>(activity_value) {
        Ok(raw) => activity_from_raw(raw, currency),
        Err(error) => {
            tracing::warn!(line_id = %id, %error, "cart line has no usable activity");
            None
        }
    };

    CartLine {
        id,
        activity,
        quantity,
    }
}

fn promo_from_raw(raw: RawPromo, currency: Currency) -> Option<Promo> {
    let start_date = parse_date(&raw.start_date)?;
    let end_date = parse_date(&raw.end_date)?;

    Some(Promo {
        id: PromoId::new(raw.id.into_string()),
        title: raw.title.unwrap_or_default(),
        promo_code: raw.promo_code,
        is_active: raw.is_active.unwrap_or(false),
        start_date,
        end_date,
        minimum_claim_price: money(raw.minimum_claim_price.as_ref(), currency),
        promo_discount_price: money(raw.promo_discount_price.as_ref(), currency),
    })
}

fn payment_method_from_raw(raw: RawPaymentMethod) -> PaymentMethod {
    PaymentMethod {
        id: raw.id.into_string().into(),
        name: raw.name,
        image_url: raw.image_url,
    }
}
