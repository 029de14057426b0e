//! Forward factor analysis.
//!
//! Derives the forward implied volatility between two expirations and
//! measures how rich the front month is relative to it:
//!
//! - forward variance = (σ2²·t2 - σ1²·t1) / (t2 - t1)
//! - forward factor = (σ1 - σ_fwd) / σ_fwd
//!
//! A front month trading well above the forward vol favors a long calendar
//! spread (sell front, buy back).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::ForwardFactorInput;
use crate::error::{CalculatorError, CalculatorResult};

/// Trade signal derived from the forward factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForwardSignal {
    /// Forward factor at or above the strong threshold.
    StrongBuy,
    /// Between the moderate and strong thresholds.
    Moderate,
    NoTrade,
}

impl ForwardSignal {
    /// Whether the signal supports opening a calendar at all.
    pub fn is_tradeable(&self) -> bool {
        matches!(self, Self::StrongBuy | Self::Moderate)
    }
}

/// Forward factor thresholds, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub strong_pct: f64,
    pub moderate_pct: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            strong_pct: 20.0,
            moderate_pct: 10.0,
        }
    }
}

/// Configuration for the forward factor engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardFactorConfig {
    /// Calendar days used to annualize DTE.
    pub days_per_year: f64,
    pub thresholds: SignalThresholds,
}

impl Default for ForwardFactorConfig {
    fn default() -> Self {
        Self {
            days_per_year: 365.0,
            thresholds: SignalThresholds::default(),
        }
    }
}

/// Output of a forward factor calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardFactorResult {
    pub input: ForwardFactorInput,
    /// Front expiry in years.
    pub t1: f64,
    /// Back expiry in years.
    pub t2: f64,
    /// Total variance to the front expiry (σ1²·t1).
    pub front_variance: f64,
    /// Total variance to the back expiry (σ2²·t2).
    pub back_variance: f64,
    /// Annualized variance between the two expiries.
    pub forward_variance: f64,
    pub forward_vol_pct: f64,
    pub forward_factor_pct: f64,
    pub signal: ForwardSignal,
    /// Thresholds the signal was classified against.
    pub thresholds: SignalThresholds,
}

/// Forward factor engine.
#[derive(Debug, Clone, Default)]
pub struct ForwardFactorEngine {
    config: ForwardFactorConfig,
}

impl ForwardFactorEngine {
    pub fn new(config: ForwardFactorConfig) -> Self {
        Self { config }
    }

    pub fn with_thresholds(mut self, strong_pct: f64, moderate_pct: f64) -> Self {
        self.config.thresholds = SignalThresholds {
            strong_pct,
            moderate_pct,
        };
        self
    }

    pub fn config(&self) -> &ForwardFactorConfig {
        &self.config
    }

    /// Compute forward vol and forward factor for a pair of expirations.
    pub fn calculate(&self, input: &ForwardFactorInput) -> CalculatorResult<ForwardFactorResult> {
        input.validate()?;

        let t1 = input.front_dte / self.config.days_per_year;
        let t2 = input.back_dte / self.config.days_per_year;
        let sigma1 = input.front_iv / 100.0;
        let sigma2 = input.back_iv / 100.0;

        let front_variance = sigma1.powi(2) * t1;
        let back_variance = sigma2.powi(2) * t2;
        let forward_variance = (back_variance - front_variance) / (t2 - t1);

        debug!(
            t1,
            t2,
            front_variance,
            back_variance,
            forward_variance,
            "forward variance computed"
        );

        // Zero is allowed through: the factor goes to +inf and classifies as strong
        if forward_variance < 0.0 {
            return Err(CalculatorError::NegativeVariance { forward_variance });
        }

        let forward_vol = forward_variance.sqrt();
        let forward_factor = (sigma1 - forward_vol) / forward_vol;

        let forward_vol_pct = forward_vol * 100.0;
        let forward_factor_pct = forward_factor * 100.0;
        let signal = self.classify(forward_factor_pct);

        debug!(forward_vol_pct, forward_factor_pct, ?signal, "forward factor classified");

        Ok(ForwardFactorResult {
            input: *input,
            t1,
            t2,
            front_variance,
            back_variance,
            forward_variance,
            forward_vol_pct,
            forward_factor_pct,
            signal,
            thresholds: self.config.thresholds,
        })
    }

    /// Classify a forward factor (in percent). Lower bounds are inclusive.
    pub fn classify(&self, forward_factor_pct: f64) -> ForwardSignal {
        let thresholds = &self.config.thresholds;
        if forward_factor_pct >= thresholds.strong_pct {
            ForwardSignal::StrongBuy
        } else if forward_factor_pct >= thresholds.moderate_pct {
            ForwardSignal::Moderate
        } else {
            ForwardSignal::NoTrade
        }
    }
}
