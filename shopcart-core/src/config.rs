//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "storageKey": "cart",
//!   "currencySymbol": "$",
//!   "eventLog": true
//! }
//! ```
//! Keys this crate doesn't know about are ignored.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::services::persistence::DEFAULT_CART_KEY;

/// Settings file name inside the data directory
pub const SETTINGS_FILENAME: &str = "settings.json";

fn default_storage_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_true() -> bool {
    true
}

/// Raw settings.json structure
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default = "default_storage_key")]
    storage_key: String,
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
    #[serde(default = "default_true")]
    event_log: bool,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            currency_symbol: default_currency_symbol(),
            event_log: true,
        }
    }
}

/// Parse a boolean-ish environment value
fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok().as_deref() {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

/// Shopcart configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage slot holding the serialized cart
    pub storage_key: String,
    /// Symbol printed in front of amounts
    pub currency_symbol: String,
    /// Whether informational events are written to the event log
    pub event_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        let raw = SettingsFile::default();
        Self {
            storage_key: raw.storage_key,
            currency_symbol: raw.currency_symbol,
            event_log: raw.event_log,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Values can be overridden with environment variables:
    /// - `SHOPCART_STORAGE_KEY`
    /// - `SHOPCART_EVENT_LOG` (true/false, 1/0, yes/no)
    ///
    /// A settings file that does not parse is ignored.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(data_dir)?;

        let storage_key = std::env::var("SHOPCART_STORAGE_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| raw.storage_key.clone());

        let event_log = env_flag("SHOPCART_EVENT_LOG").unwrap_or(raw.event_log);

        Ok(Self {
            storage_key,
            currency_symbol: raw.currency_symbol,
            event_log,
        })
    }

    fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
        let settings_path = data_dir.join(SETTINGS_FILENAME);
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    /// Format an amount with the configured currency symbol
    pub fn money(&self, amount: rust_decimal::Decimal) -> String {
        format!("{}{}", self.currency_symbol, crate::domain::format_amount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.money(Decimal::new(55, 0)), "$55.00");
    }

    #[test]
    fn test_load_settings_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"currencySymbol": "€", "eventLog": false}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.money(Decimal::new(1999, 2)), "€19.99");
    }

    #[test]
    fn test_invalid_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), "{ nope").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{"theme": "dark", "currencySymbol": "£"}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency_symbol, "£");
        assert_eq!(config.storage_key, "cart");
    }
}
