//! Cart quote with an optional promo code.

use anyhow::Result;
use serde::Serialize;
use trip_commerce::ingest::{parse_cart_lines, parse_promos};
use trip_commerce::session::{CheckoutSummary, StorefrontSession};
use trip_commerce::Money;

use super::QuoteArgs;
use crate::context::Context;
use crate::output::{price_label, savings_label};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    item_count: i64,
    savings: Money,
    #[serde(flatten)]
    summary: CheckoutSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    promo_error: Option<String>,
}

/// Run the quote command.
pub fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let lines = parse_cart_lines(&ctx.read_payload(&args.cart)?, currency)?;

    let unpriced = lines.iter().filter(|l| l.activity.is_none()).count();
    if unpriced > 0 {
        ctx.output
            .warn(&format!("{} cart line(s) have no usable activity and count as zero", unpriced));
    }

    let mut session = StorefrontSession::new(currency);
    session.replace_cart(lines);

    let mut promo_error = None;
    if let (Some(code), Some(promos_path)) = (args.code.as_deref(), args.promos.as_deref()) {
        let promos = parse_promos(&ctx.read_payload(promos_path)?, currency)?;
        let now = ctx.now(args.at.as_deref())?;
        ctx.output
            .debug(&format!("Evaluating {} against {} promos at {}", code, promos.len(), now));
        if let Err(error) = session.apply_promo(&promos, code, now) {
            promo_error = Some(error.to_string());
        }
    }

    let summary = session.checkout_summary();
    let quote = Quote {
        item_count: session.cart().item_count(),
        savings: session.cart().savings(),
        summary,
        promo_error,
    };

    if ctx.output.is_json() {
        ctx.output.json(&quote);
        return Ok(());
    }

    for note in session.drain_notifications() {
        ctx.output.notification(&note);
    }

    ctx.output.header("Cart quote");
    ctx.output.kv("Items", &quote.item_count.to_string());
    ctx.output.kv("Subtotal", &price_label(&quote.summary.subtotal));
    if quote.savings.is_positive() {
        ctx.output.kv(
            "You save",
            &savings_label(quote.savings, session.cart().full_price()),
        );
    }
    if let Some(code) = &quote.summary.promo_code {
        ctx.output.kv(
            "Promo",
            &format!("{} (-{})", code, quote.summary.discount_amount.display()),
        );
    }
    ctx.output.kv("Total", &quote.summary.grand_total.display());

    Ok(())
}
