//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use trip_commerce::Currency;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["trip.toml", ".trip.toml", "trip.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file or by discovery.
    ///
    /// A discovered config that cannot be parsed is an error, the same as an
    /// explicit one. Logging is not set up yet at this point, so nothing may be
    /// reported through `tracing`.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            find_config(&cwd)?.unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    pub fn currency(&self) -> Result<Currency> {
        self.config.currency()
    }

    /// Evaluation time: explicit override, then config, then the wall clock.
    pub fn now(&self, at: Option<&str>) -> Result<DateTime<Utc>> {
        if let Some(raw) = at {
            return trip_commerce::ingest::parse_date(raw)
                .with_context(|| format!("Invalid time: {}", raw));
        }
        Ok(self.config.fixed_now()?.unwrap_or_else(Utc::now))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Read a collaborator payload file.
    pub fn read_payload(&self, path: &str) -> Result<String> {
        let resolved = self.resolve_path(path);
        std::fs::read_to_string(&resolved)
            .with_context(|| format!("Failed to read payload: {}", resolved.display()))
    }
}

/// Path of the nearest config file, walking up from `start`.
pub fn find_config_path(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
        if !current.pop() {
            return None;
        }
    }
}

fn find_config(start: &Path) -> Result<Option<CliConfig>> {
    let Some(path) = find_config_path(start) else {
        return Ok(None);
    };
    let config = CliConfig::load(&path.to_string_lossy())
        .with_context(|| format!("Discovered config is invalid: {}", path.display()))?;
    Ok(Some(config))
}
