//! User settings for wallet-ledger
//!
//! Display preferences plus the few knobs that change ledger behavior
//! (recurrence horizon, card limit enforcement).

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// strftime format used when printing transaction timestamps
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// How many months a recurring expense spans when no end month is given
    #[serde(default = "default_recurrence_horizon")]
    pub recurrence_horizon_months: u32,

    /// Reject card usage above the card limit
    #[serde(default)]
    pub enforce_card_limit: bool,
}

/// Largest accepted recurrence horizon (100 years)
pub const MAX_RECURRENCE_HORIZON_MONTHS: u32 = 1200;

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_timestamp_format() -> String {
    "%d/%m/%Y %H:%M".to_string()
}

fn default_recurrence_horizon() -> u32 {
    12
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            timestamp_format: default_timestamp_format(),
            recurrence_horizon_months: default_recurrence_horizon(),
            enforce_card_limit: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.recurrence_horizon_months == 0 {
            return Err(LedgerError::Config(
                "recurrence_horizon_months must be at least 1".into(),
            ));
        }
        if self.recurrence_horizon_months > MAX_RECURRENCE_HORIZON_MONTHS {
            return Err(LedgerError::Config(format!(
                "recurrence_horizon_months must be at most {}",
                MAX_RECURRENCE_HORIZON_MONTHS
            )));
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(LedgerError::Config(format!(
                "timestamp_format is not a valid strftime format: '{}'",
                self.timestamp_format
            )));
        }
        Ok(())
    }
}
