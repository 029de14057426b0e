//! Screener configuration.
//!
//! Every section and field is optional in the file; anything left out keeps
//! its default. TOML is the primary format, JSON is accepted by extension.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analytics::{Criterion, EarningsSetupConfig, ForwardFactorConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for both calculators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub forward: ForwardFactorConfig,
    pub earnings: EarningsSetupConfig,
}

impl ScreenerConfig {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject threshold combinations that cannot classify sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        let forward = &self.forward;
        if forward.days_per_year <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "forward.days_per_year must be positive, got {}",
                forward.days_per_year
            )));
        }
        if forward.thresholds.moderate_pct > forward.thresholds.strong_pct {
            return Err(ConfigError::Invalid(format!(
                "forward.thresholds: moderate_pct ({}) exceeds strong_pct ({})",
                forward.thresholds.moderate_pct, forward.thresholds.strong_pct
            )));
        }

        let tiers = &self.earnings.tiers;
        let total = Criterion::ALL.len();
        if tiers.excellent_min_passes > total {
            return Err(ConfigError::Invalid(format!(
                "earnings.tiers.excellent_min_passes ({}) exceeds the {} criteria",
                tiers.excellent_min_passes, total
            )));
        }
        if tiers.marginal_min_passes > tiers.excellent_min_passes {
            return Err(ConfigError::Invalid(format!(
                "earnings.tiers: marginal_min_passes ({}) exceeds excellent_min_passes ({})",
                tiers.marginal_min_passes, tiers.excellent_min_passes
            )));
        }

        for (name, risk) in [
            ("earnings.reduced_risk", &self.earnings.reduced_risk),
            ("earnings.playbook.risk", &self.earnings.playbook.risk),
        ] {
            if risk.min_pct < 0.0 || risk.min_pct > risk.max_pct {
                return Err(ConfigError::Invalid(format!(
                    "{}: expected 0 <= min_pct <= max_pct, got {}",
                    name, risk
                )));
            }
        }

        Ok(())
    }

    /// Every floating-point setting, with its dotted path.
    fn numeric_fields(&self) -> [(&'static str, f64); 12] {
        let forward = &self.forward;
        let earnings = &self.earnings;
        [
            ("forward.days_per_year", forward.days_per_year),
            ("forward.thresholds.strong_pct", forward.thresholds.strong_pct),
            ("forward.thresholds.moderate_pct", forward.thresholds.moderate_pct),
            ("earnings.criteria.min_volume_millions", earnings.criteria.min_volume_millions),
            ("earnings.criteria.min_iv_ratio", earnings.criteria.min_iv_ratio),
            ("earnings.criteria.max_expected_move_pct", earnings.criteria.max_expected_move_pct),
            ("earnings.criteria.min_move_ratio", earnings.criteria.min_move_ratio),
            ("earnings.criteria.max_bid_ask_pct", earnings.criteria.max_bid_ask_pct),
            ("earnings.playbook.risk.min_pct", earnings.playbook.risk.min_pct),
            ("earnings.playbook.risk.max_pct", earnings.playbook.risk.max_pct),
            ("earnings.reduced_risk.min_pct", earnings.reduced_risk.min_pct),
            ("earnings.reduced_risk.max_pct", earnings.reduced_risk.max_pct),
        ]
    }
}
