//! Per-activity price listing.

use anyhow::{bail, Result};
use serde::Serialize;
use trip_commerce::cart::{resolve_line_price, CartLine, PriceBreakdown};
use trip_commerce::ingest::parse_activities;

use super::PriceArgs;
use crate::context::Context;
use crate::output::price_label;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PricedActivity {
    id: String,
    title: String,
    quantity: i64,
    #[serde(flatten)]
    price: PriceBreakdown,
}

/// Run the price command.
pub fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;
    let payload = ctx.read_payload(&args.activities)?;
    let activities = parse_activities(&payload, currency)?;
    ctx.output.debug(&format!("Loaded {} activities", activities.len()));

    let priced: Vec<PricedActivity> = activities
        .into_iter()
        .filter(|a| args.id.as_deref().map_or(true, |id| a.id.as_str() == id))
        .map(|activity| {
            let id = activity.id.to_string();
            let title = activity.title.clone();
            let line = CartLine::new(activity, args.quantity);
            PricedActivity {
                id,
                title,
                quantity: line.effective_quantity(),
                price: resolve_line_price(Some(&line)),
            }
        })
        .collect();

    if priced.is_empty() {
        match args.id {
            Some(id) => bail!("Activity '{}' not found", id),
            None => {
                ctx.output.info("No activities found.");
                return Ok(());
            }
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&priced);
        return Ok(());
    }

    ctx.output.header("Activity prices");
    ctx.output.table_row(&["ID", "TITLE", "QTY", "PRICE"], &[12, 32, 5, 30]);
    for item in &priced {
        ctx.output.table_row(
            &[
                &item.id,
                &item.title,
                &item.quantity.to_string(),
                &price_label(&item.price),
            ],
            &[12, 32, 5, 30],
        );
    }

    Ok(())
}
