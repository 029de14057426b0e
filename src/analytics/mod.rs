//! Options analytics module.
//!
//! Provides:
//! - Forward factor analysis (forward vol between two expirations)
//! - Earnings calendar setup checklist

pub mod earnings_setup;
pub mod forward_factor;

pub use earnings_setup::{
    Criterion, CriterionResult, CriteriaThresholds, EarningsResult, EarningsSetupConfig,
    EarningsSetupEngine, ExecutionPlan, RiskRange, SetupRecommendation, SetupTier, TierCutoffs,
};
pub use forward_factor::{
    ForwardFactorConfig, ForwardFactorEngine, ForwardFactorResult, ForwardSignal,
    SignalThresholds,
};
