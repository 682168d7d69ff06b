//! Persistent CLI defaults.
//!
//! Loaded from `auto-finance/config.toml` under the platform config directory
//! (`~/.config` on Linux), or from the path given with `--config`. Flags on
//! the command line always win over the file.

use auto_finance_core::presets::{
    DEFAULT_ANNUAL_RATE_PERCENT, DEFAULT_DOWN_PAYMENT_FRACTION, DEFAULT_TENURE_YEARS,
};
use auto_finance_core::RoundingPolicy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CliConfig {
    /// Annual rate quoted to customers, e.g. 8.5
    pub annual_rate_percent: Option<Decimal>,
    pub tenure_years: Option<u32>,
    /// Down payment as a percentage of the vehicle price, e.g. 20
    pub down_payment_percent: Option<Decimal>,
    pub rounding: Option<RoundingPolicy>,
    /// Output format used when `--output` is not given
    pub output: Option<String>,
}

impl CliConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("auto-finance").join("config.toml"))
    }

    /// Load an explicit config file, or the default one if it exists.
    ///
    /// An explicit path must exist and parse; a broken default file is
    /// reported and ignored.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
            let config = toml::from_str::<CliConfig>(&content)
                .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))?;
            debug!("Loaded configuration from {:?}", path);
            return Ok(config);
        }

        let Some(path) = Self::config_path() else {
            debug!("Could not determine config directory");
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Ok(Self::default());
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<CliConfig>(&content) {
                Ok(config) => {
                    debug!("Loaded configuration from {:?}", path);
                    Ok(config)
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}", path, e);
                    Ok(Self::default())
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Ok(Self::default())
            }
        }
    }

    /// True when the file overrides any of the showroom loan defaults
    pub fn has_loan_defaults(&self) -> bool {
        self.annual_rate_percent.is_some()
            || self.tenure_years.is_some()
            || self.down_payment_percent.is_some()
            || self.rounding.is_some()
    }

    pub fn annual_rate_percent(&self) -> Decimal {
        self.annual_rate_percent.unwrap_or(DEFAULT_ANNUAL_RATE_PERCENT)
    }

    pub fn tenure_years(&self) -> u32 {
        self.tenure_years.unwrap_or(DEFAULT_TENURE_YEARS)
    }

    /// Down payment as a fraction of price (20 -> 0.20)
    pub fn down_payment_fraction(&self) -> Decimal {
        self.down_payment_percent
            .map(|pct| pct / dec!(100))
            .unwrap_or(DEFAULT_DOWN_PAYMENT_FRACTION)
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: CliConfig = toml::from_str(
            r#"
annual-rate-percent = "9.25"
tenure-years = 7
down-payment-percent = 25
rounding = "carry_precision"
output = "table"
"#,
        )
        .unwrap();
        assert_eq!(config.annual_rate_percent(), dec!(9.25));
        assert_eq!(config.tenure_years(), 7);
        assert_eq!(config.down_payment_fraction(), dec!(0.25));
        assert_eq!(config.rounding(), RoundingPolicy::CarryPrecision);
    }

    #[test]
    fn test_empty_config_uses_showroom_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.annual_rate_percent(), dec!(8.5));
        assert_eq!(config.tenure_years(), 5);
        assert_eq!(config.down_payment_fraction(), dec!(0.20));
        assert_eq!(config.rounding(), RoundingPolicy::RoundThenMultiply);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<CliConfig>("interest = 9").is_err());
    }
}
