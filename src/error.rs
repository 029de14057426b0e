//! Error types shared by the calculators.
//!
//! Every failure is scoped to a single calculation. Nothing is retried and
//! missing values are never replaced with defaults.

use thiserror::Error;

/// A required input is absent or violates a precondition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is absent, blank, unparseable or NaN.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Field is present but numerically zero.
    #[error("field {0} must be non-zero")]
    ZeroField(&'static str),

    #[error("field {field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("back month DTE must exceed front month DTE (front {front}, back {back})")]
    DteOrder { front: f64, back: f64 },

    #[error("implied volatilities must be positive (front {front}%, back {back}%)")]
    NegativeVolatility { front: f64, back: f64 },
}

impl ValidationError {
    /// Name of the offending field, when the error concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field) | Self::ZeroField(field) => Some(*field),
            Self::NonPositive { field, .. } => Some(*field),
            Self::DteOrder { .. } | Self::NegativeVolatility { .. } => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Back month variance does not cover front month variance.
    #[error("negative forward variance ({forward_variance:.6}): check the term structure inputs")]
    NegativeVariance { forward_variance: f64 },
}

pub type CalculatorResult<T> = Result<T, CalculatorError>;
