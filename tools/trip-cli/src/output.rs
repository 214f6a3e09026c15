//! Terminal and JSON rendering for storefront results.

use console::{style, StyledObject};
use trip_commerce::cart::PriceBreakdown;
use trip_commerce::session::{Notification, NotificationLevel};
use trip_commerce::Money;

/// Renders messages, notifications and price tables.
///
/// In JSON mode only [`Output::json`] and errors are printed, so stdout stays
/// machine-readable.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn info(&self, msg: &str) {
        self.emit(NotificationLevel::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.emit(NotificationLevel::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(NotificationLevel::Warning, msg);
    }

    /// Errors are printed in JSON mode too, as `{"error": ...}` on stderr.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        self.emit(NotificationLevel::Error, msg);
    }

    /// Show a queued session notification with its level's styling.
    pub fn notification(&self, note: &Notification) {
        self.emit(note.level, &note.message);
    }

    fn emit(&self, level: NotificationLevel, msg: &str) {
        if self.json {
            return;
        }
        let line = format!("{} {}", marker(level), msg);
        match level {
            NotificationLevel::Success | NotificationLevel::Info => println!("{}", line),
            NotificationLevel::Warning | NotificationLevel::Error => eprintln!("{}", line),
        }
    }

    /// Verbose-only detail.
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn marker(level: NotificationLevel) -> StyledObject<&'static str> {
    match level {
        NotificationLevel::Success => style("✓").green(),
        NotificationLevel::Info => style("ℹ").blue(),
        NotificationLevel::Warning => style("⚠").yellow(),
        NotificationLevel::Error => style("✗").red(),
    }
}

/// Display price, with the original struck through when it is higher.
///
/// A cart aggregate can carry an original below its display total (only
/// discounted lines count toward it); that original is not shown.
pub fn price_label(price: &PriceBreakdown) -> String {
    match price.original_price {
        Some(original) if original.amount > price.display_price.amount => format!(
            "{} {}",
            style(price.display_price.display()).green(),
            style(original.display()).dim().strikethrough()
        ),
        _ => price.display_price.display(),
    }
}

/// "Rp40 (16%)": amount saved and its share of the undiscounted price.
pub fn savings_label(savings: Money, full_price: Money) -> String {
    let percent = if full_price.amount > 0 {
        savings.amount as f64 / full_price.amount as f64 * 100.0
    } else {
        0.0
    };
    format!("{} ({:.0}%)", savings.display(), percent)
}
