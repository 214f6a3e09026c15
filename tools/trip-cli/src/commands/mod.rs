//! CLI command implementations.

pub mod config;
pub mod price;
pub mod promo;
pub mod quote;

use clap::{Args, Subcommand};

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    /// Activity list payload (`{ "data": [...] }`).
    pub activities: String,

    /// Only show the activity with this id.
    #[arg(long)]
    pub id: Option<String>,

    /// Quantity to price each activity at.
    #[arg(short, long, default_value = "1")]
    pub quantity: i64,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Cart payload (`{ "data": [...] }`).
    pub cart: String,

    /// Promo code to apply.
    #[arg(long, requires = "promos")]
    pub code: Option<String>,

    /// Promo list payload used with --code.
    #[arg(long)]
    pub promos: Option<String>,

    /// Evaluate promos at this time instead of now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Arguments for the promo command.
#[derive(Args)]
pub struct PromoArgs {
    /// Promo list payload (`{ "data": [...] }`).
    pub promos: String,

    /// Code the customer entered.
    pub code: String,

    /// Cart payload to take the subtotal from.
    #[arg(long, conflicts_with = "total", required_unless_present = "total")]
    pub cart: Option<String>,

    /// Subtotal as a decimal amount.
    #[arg(long)]
    pub total: Option<f64>,

    /// Evaluate at this time instead of now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
