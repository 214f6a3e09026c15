//! Promo code check against a subtotal.

use anyhow::Result;
use trip_commerce::cart::resolve_cart_totals;
use trip_commerce::ingest::{parse_cart_lines, parse_promos};
use trip_commerce::promo::evaluate_promo_code;
use trip_commerce::Money;

use super::PromoArgs;
use crate::context::Context;

/// Run the promo command.
///
/// A rejected code is reported as an error so the exit status reflects it.
pub fn run(args: PromoArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let promos = parse_promos(&ctx.read_payload(&args.promos)?, currency)?;

    let subtotal = match (&args.cart, args.total) {
        (Some(cart), _) => {
            resolve_cart_totals(&parse_cart_lines(&ctx.read_payload(cart)?, currency)?)
                .display_price
        }
        (None, Some(total)) => Money::from_decimal(total, currency),
        (None, None) => Money::zero(currency),
    };
    let now = ctx.now(args.at.as_deref())?;
    ctx.output.debug(&format!(
        "Checking {} against {} promos (subtotal {}, at {})",
        args.code,
        promos.len(),
        subtotal,
        now
    ));

    let evaluation = evaluate_promo_code(&promos, &args.code, subtotal, now)?;

    if ctx.output.is_json() {
        ctx.output.json(&evaluation);
        return Ok(());
    }

    ctx.output.success(&format!("Promo {} applies", evaluation.promo.promo_code));
    if !evaluation.promo.title.is_empty() {
        ctx.output.kv("Title", &evaluation.promo.title);
    }
    ctx.output.kv("Subtotal", &subtotal.display());
    ctx.output.kv("Discount", &evaluation.discount_amount.display());
    ctx.output.kv("Total", &evaluation.final_total.display());
    ctx.output.kv("Valid until", &evaluation.promo.end_date.to_rfc3339());

    Ok(())
}
