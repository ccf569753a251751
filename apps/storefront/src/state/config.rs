//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                               │
//! │  2. Config file                                                         │
//! │     $STOREFRONT_CONFIG, or                                              │
//! │     ~/.config/storefront/storefront.toml (Linux)                        │
//! │     ~/Library/Application Support/com.storefront.storefront/...         │
//! │  3. Environment variables (STOREFRONT_*)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! snapshot_path = "/var/lib/storefront/snapshot.json"
//! status_poll_secs = 30
//! snapshot_reload_secs = 300
//! currency_symbol = "R$"
//! currency_decimals = 2
//! decimal_separator = ","
//! thousands_separator = "."
//! ```
//!
//! Store settings (opening hours, delivery fee, ...) are NOT here: they come
//! from the backend snapshot.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock is needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use storefront_core::Money;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("snapshot.json")
}

fn default_poll_secs() -> u64 {
    30
}

fn default_reload_secs() -> u64 {
    300
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

fn default_thousands_separator() -> String {
    ".".to_string()
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON file holding the backend rows.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// How often the store status is re-evaluated.
    #[serde(default = "default_poll_secs")]
    pub status_poll_secs: u64,

    /// How often the snapshot file is re-read for backend changes.
    #[serde(default = "default_reload_secs")]
    pub snapshot_reload_secs: u64,

    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Number of decimal places for currency
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

impl Default for AppConfig {
    /// Brazilian real formatting, 30 s status polling, 5 min snapshot reload.
    fn default() -> Self {
        AppConfig {
            snapshot_path: default_snapshot_path(),
            status_poll_secs: default_poll_secs(),
            snapshot_reload_secs: default_reload_secs(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `STOREFRONT_CONFIG`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("STOREFRONT_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| AppError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.status_poll_secs == 0 {
            return Err(AppError::InvalidConfig(
                "status_poll_secs must be greater than 0".into(),
            ));
        }

        if self.snapshot_reload_secs == 0 {
            return Err(AppError::InvalidConfig(
                "snapshot_reload_secs must be greater than 0".into(),
            ));
        }

        if self.currency_decimals > 2 {
            return Err(AppError::InvalidConfig(
                "currency_decimals must be at most 2".into(),
            ));
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("STOREFRONT_SNAPSHOT") {
            debug!(path = %path, "Overriding snapshot path from environment");
            self.snapshot_path = PathBuf::from(path);
        }

        if let Some(secs) = lookup("STOREFRONT_POLL_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.status_poll_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid STOREFRONT_POLL_SECS"),
            }
        }

        if let Some(secs) = lookup("STOREFRONT_RELOAD_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.snapshot_reload_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid STOREFRONT_RELOAD_SECS"),
            }
        }

        if let Some(symbol) = lookup("STOREFRONT_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// Formats money for customer-facing text.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::Money;
    /// use storefront_lib::state::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(123456)), "R$ 1.234,56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let whole = amount.major().abs();
        // Money carries two minor digits; fewer decimals truncate them
        let frac = amount.minor() / 10_i64.pow(u32::from(2 - self.currency_decimals.min(2)));

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(ch);
        }

        let sign = if amount.cents() < 0 { "-" } else { "" };
        if self.currency_decimals > 0 {
            format!(
                "{}{} {}{}{:0width$}",
                sign,
                self.currency_symbol,
                grouped,
                self.decimal_separator,
                frac,
                width = self.currency_decimals as usize
            )
        } else {
            format!("{}{} {}", sign, self.currency_symbol, grouped)
        }
    }
}
