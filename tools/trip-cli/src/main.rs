//! Trip CLI - quote carts and check promo codes against storefront snapshots.
//!
//! Commands:
//! - `trip price` - Show effective prices for an activity list
//! - `trip quote` - Total a cart, optionally with a promo code
//! - `trip promo` - Check a promo code against a subtotal
//! - `trip config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, PriceArgs, PromoArgs, QuoteArgs};

/// Trip CLI - price activities, quote carts and check promo codes
#[derive(Parser)]
#[command(name = "trip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show effective prices for an activity list
    Price(PriceArgs),

    /// Total a cart, optionally applying a promo code
    Quote(QuoteArgs),

    /// Check a promo code against a cart or subtotal
    Promo(PromoArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    logging::init_tracing(&ctx.config.logging, cli.verbose, cli.json);

    let result = match cli.command {
        Commands::Price(args) => commands::price::run(args, &ctx),
        Commands::Quote(args) => commands::quote::run(args, &ctx),
        Commands::Promo(args) => commands::promo::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
