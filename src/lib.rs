pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod report;

// Re-export commonly used types
pub use analytics::{
    CriterionResult, EarningsResult, EarningsSetupConfig, EarningsSetupEngine,
    ForwardFactorConfig, ForwardFactorEngine, ForwardFactorResult, ForwardSignal,
    SetupRecommendation, SetupTier,
};
pub use config::{ConfigError, ScreenerConfig};
pub use data::{EarningsInput, FormSnapshot, FormSource, ForwardFactorInput, RedFlag};
pub use error::{CalculatorError, CalculatorResult, ValidationError};
