//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{find_config_path, Context};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    if let Some(path) = find_config_path(&ctx.cwd) {
        ctx.output.kv("file", &path.display().to_string());
    }

    ctx.output.info("[storefront]");
    ctx.output.kv("currency", &ctx.config.storefront.currency);

    ctx.output.info("[promo]");
    ctx.output
        .kv("now", ctx.config.promo.now.as_deref().unwrap_or("(wall clock)"));

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output
        .kv("format", &format!("{:?}", ctx.config.logging.format).to_lowercase());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("trip.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();

    if let Err(e) = ctx.config.currency() {
        errors.push(format!("storefront.currency: {}", e));
    }
    if let Err(e) = ctx.config.fixed_now() {
        errors.push(format!("promo.now: {}", e));
    }
    if tracing_subscriber::EnvFilter::try_new(&ctx.config.logging.level).is_err() {
        errors.push(format!(
            "logging.level '{}' is not a valid filter",
            ctx.config.logging.level
        ));
    }

    if ctx.config.promo.now.is_some() {
        ctx.output
            .warn("promo.now is set; promo windows are evaluated at a fixed time");
    }

    if errors.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(error);
    }
    bail!("{} configuration error(s)", errors.len())
}
