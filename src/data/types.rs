//! Input value objects for the two calculators.
//!
//! Each input is built once per calculation (usually from a form snapshot)
//! and handed to an engine by reference. Validation mirrors the precondition
//! order used by the engines, so the first violated rule is the one reported.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Field names, shared by the form readers and the validation errors.
pub mod fields {
    pub const FRONT_DTE: &str = "front_dte";
    pub const FRONT_IV: &str = "front_iv";
    pub const BACK_DTE: &str = "back_dte";
    pub const BACK_IV: &str = "back_iv";

    pub const TICKER: &str = "ticker";
    pub const VOLUME: &str = "volume";
    pub const EXPECTED_MOVE: &str = "expected_move";
    pub const HISTORICAL_MOVE: &str = "historical_move";
    pub const SPREAD_COST: &str = "spread_cost";
    pub const BID_ASK: &str = "bid_ask";
    pub const IS_BIOTECH: &str = "is_biotech";
    pub const IS_MEME: &str = "is_meme";
    pub const RECENT_GAP: &str = "recent_gap";
}

/// Two points on the implied volatility term structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardFactorInput {
    /// Front month days to expiration.
    pub front_dte: f64,
    /// Front month implied volatility, in percent.
    pub front_iv: f64,
    /// Back month days to expiration.
    pub back_dte: f64,
    /// Back month implied volatility, in percent.
    pub back_iv: f64,
}

impl ForwardFactorInput {
    pub fn new(front_dte: f64, front_iv: f64, back_dte: f64, back_iv: f64) -> Self {
        Self {
            front_dte,
            front_iv,
            back_dte,
            back_iv,
        }
    }

    /// Check preconditions in order: presence, DTE ordering, positive DTE,
    /// non-negative volatilities.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_present(fields::FRONT_DTE, self.front_dte)?;
        require_present(fields::FRONT_IV, self.front_iv)?;
        require_present(fields::BACK_DTE, self.back_dte)?;
        require_present(fields::BACK_IV, self.back_iv)?;

        if self.back_dte <= self.front_dte {
            return Err(ValidationError::DteOrder {
                front: self.front_dte,
                back: self.back_dte,
            });
        }

        if self.front_dte < 0.0 {
            return Err(ValidationError::NonPositive {
                field: fields::FRONT_DTE,
                value: self.front_dte,
            });
        }

        if self.front_iv < 0.0 || self.back_iv < 0.0 {
            return Err(ValidationError::NegativeVolatility {
                front: self.front_iv,
                back: self.back_iv,
            });
        }

        Ok(())
    }
}

/// Event-specific red flags for an earnings trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    Biotech,
    MemeStock,
    /// Gapped more than 15% on a recent report.
    RecentGap,
}

impl RedFlag {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Biotech => "Biotech",
            Self::MemeStock => "Meme stock",
            Self::RecentGap => "Recent gap >15%",
        }
    }
}

/// Trade inputs for an earnings calendar spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsInput {
    /// Underlying symbol. Used for labeling only.
    pub ticker: String,
    /// Average daily volume, in millions of shares.
    pub volume_millions: f64,
    /// Front month (post-earnings expiry) implied volatility, in percent.
    pub front_iv: f64,
    /// Back month implied volatility, in percent.
    pub back_iv: f64,
    /// Move implied by the options market, in percent.
    pub expected_move_pct: f64,
    /// Average historical earnings move, in percent.
    pub historical_move_pct: f64,
    /// Net debit of the calendar spread.
    pub spread_cost: Decimal,
    /// Combined bid-ask width of the two legs.
    pub bid_ask_spread: Decimal,
    pub is_biotech: bool,
    pub is_meme: bool,
    pub had_recent_gap: bool,
}

impl EarningsInput {
    /// Trimmed, uppercased ticker.
    pub fn normalized_ticker(&self) -> String {
        self.ticker.trim().to_uppercase()
    }

    /// Triggered flags in fixed order: biotech, meme, gap.
    pub fn red_flags(&self) -> Vec<RedFlag> {
        [
            (self.is_biotech, RedFlag::Biotech),
            (self.is_meme, RedFlag::MemeStock),
            (self.had_recent_gap, RedFlag::RecentGap),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.normalized_ticker().is_empty() {
            return Err(ValidationError::MissingField(fields::TICKER));
        }

        require_positive(fields::VOLUME, self.volume_millions)?;
        require_positive(fields::FRONT_IV, self.front_iv)?;
        require_positive(fields::BACK_IV, self.back_iv)?;
        require_positive(fields::EXPECTED_MOVE, self.expected_move_pct)?;
        require_positive(fields::HISTORICAL_MOVE, self.historical_move_pct)?;
        require_positive_decimal(fields::SPREAD_COST, self.spread_cost)?;
        require_positive_decimal(fields::BID_ASK, self.bid_ask_spread)?;

        Ok(())
    }
}

/// NaN/infinite counts as missing, zero is rejected separately.
fn require_present(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::MissingField(field));
    }
    if value == 0.0 {
        return Err(ValidationError::ZeroField(field));
    }
    Ok(value)
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = require_present(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(value)
}

fn require_positive_decimal(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::ZeroField(field));
    }
    if value.is_sign_negative() {
        return Err(ValidationError::NonPositive {
            field,
            value: value.try_into().unwrap_or(f64::NAN),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn earnings_input() -> EarningsInput {
        EarningsInput {
            ticker: " nvda ".to_string(),
            volume_millions: 2.0,
            front_iv: 50.0,
            back_iv: 15.0,
            expected_move_pct: 8.0,
            historical_move_pct: 2.0,
            spread_cost: dec!(10),
            bid_ask_spread: dec!(1),
            is_biotech: false,
            is_meme: false,
            had_recent_gap: false,
        }
    }

    #[test]
    fn test_forward_input_valid() {
        assert!(ForwardFactorInput::new(30.0, 40.0, 60.0, 30.0).validate().is_ok());
    }

    #[test]
    fn test_forward_input_missing_and_zero() {
        let input = ForwardFactorInput::new(30.0, f64::NAN, 60.0, 30.0);
        assert_eq!(
            input.validate(),
            Err(ValidationError::MissingField(fields::FRONT_IV))
        );

        let input = ForwardFactorInput::new(30.0, 40.0, 60.0, 0.0);
        assert_eq!(input.validate(), Err(ValidationError::ZeroField(fields::BACK_IV)));
    }

    #[test]
    fn test_forward_input_dte_order() {
        let input = ForwardFactorInput::new(60.0, 50.0, 30.0, 10.0);
        assert_eq!(
            input.validate(),
            Err(ValidationError::DteOrder { front: 60.0, back: 30.0 })
        );

        // Equal DTEs are rejected too
        let input = ForwardFactorInput::new(30.0, 50.0, 30.0, 10.0);
        assert!(matches!(input.validate(), Err(ValidationError::DteOrder { .. })));
    }

    #[test]
    fn test_forward_input_negative_values() {
        let input = ForwardFactorInput::new(-5.0, 40.0, 30.0, 30.0);
        assert!(matches!(
            input.validate(),
            Err(ValidationError::NonPositive { field: fields::FRONT_DTE, .. })
        ));

        let input = ForwardFactorInput::new(30.0, -40.0, 60.0, 30.0);
        assert!(matches!(
            input.validate(),
            Err(ValidationError::NegativeVolatility { .. })
        ));
    }

    #[test]
    fn test_earnings_ticker_normalized() {
        let input = earnings_input();
        assert_eq!(input.normalized_ticker(), "NVDA");
        assert!(input.validate().is_ok());

        let input = EarningsInput {
            ticker: "   ".to_string(),
            ..earnings_input()
        };
        assert_eq!(input.validate(), Err(ValidationError::MissingField(fields::TICKER)));
    }

    #[test]
    fn test_earnings_zero_and_negative() {
        let input = EarningsInput {
            historical_move_pct: 0.0,
            ..earnings_input()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::ZeroField(fields::HISTORICAL_MOVE))
        );

        let input = EarningsInput {
            spread_cost: dec!(0),
            ..earnings_input()
        };
        assert_eq!(input.validate(), Err(ValidationError::ZeroField(fields::SPREAD_COST)));

        let input = EarningsInput {
            bid_ask_spread: dec!(-0.5),
            ..earnings_input()
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::NonPositive { field: fields::BID_ASK, .. })
        ));
    }

    #[test]
    fn test_red_flag_order() {
        let input = EarningsInput {
            is_biotech: true,
            is_meme: false,
            had_recent_gap: true,
            ..earnings_input()
        };
        assert_eq!(input.red_flags(), vec![RedFlag::Biotech, RedFlag::RecentGap]);
        assert!(earnings_input().red_flags().is_empty());
    }
}
