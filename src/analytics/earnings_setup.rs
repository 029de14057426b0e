//! Earnings calendar setup checklist.
//!
//! Scores a pre-earnings calendar spread against six independent criteria:
//! - Volume: enough liquidity in the underlying
//! - IV ratio: front month IV rich relative to back month
//! - Expected move: the market is not pricing a huge move
//! - Overpricing: expected move well above the historical move
//! - Bid-ask: leg spreads small relative to the debit
//! - Red flags: no biotech, meme or recent-gap names
//!
//! Every criterion is always evaluated. The pass count picks the tier.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{EarningsInput, RedFlag};
use crate::error::CalculatorResult;
use crate::format::to_fixed;

/// The six checklist items, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Volume,
    IvRatio,
    ExpectedMove,
    Overpricing,
    BidAsk,
    RedFlags,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Self::Volume,
        Self::IvRatio,
        Self::ExpectedMove,
        Self::Overpricing,
        Self::BidAsk,
        Self::RedFlags,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::IvRatio => "IV Ratio",
            Self::ExpectedMove => "Expected Move",
            Self::Overpricing => "Overpricing",
            Self::BidAsk => "Bid-Ask",
            Self::RedFlags => "Red flags",
        }
    }
}

/// Outcome of a single checklist item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    /// Human-readable line with the computed value and the threshold.
    pub label: String,
    pub passed: bool,
}

impl CriterionResult {
    pub fn pass(criterion: Criterion, label: String) -> Self {
        Self {
            criterion,
            label,
            passed: true,
        }
    }

    pub fn fail(criterion: Criterion, label: String) -> Self {
        Self {
            criterion,
            label,
            passed: false,
        }
    }
}

/// Recommendation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupTier {
    Excellent,
    Marginal,
    Skip,
}

/// Range of account equity to put at risk, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRange {
    pub min_pct: f64,
    pub max_pct: f64,
}

impl RiskRange {
    pub fn new(min_pct: f64, max_pct: f64) -> Self {
        Self { min_pct, max_pct }
    }
}

impl fmt::Display for RiskRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}%", self.min_pct, self.max_pct)
    }
}

/// Execution playbook for a setup that meets every criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionPlan {
    /// Short call DTE window after the announcement.
    pub short_leg_min_dte: u32,
    pub short_leg_max_dte: u32,
    /// Minimum DTE for the long call.
    pub long_leg_min_dte: u32,
    /// Exit window, in minutes after the next session's open.
    pub exit_min_minutes: u32,
    pub exit_max_minutes: u32,
    pub risk: RiskRange,
}

impl Default for ExecutionPlan {
    fn default() -> Self {
        Self {
            short_leg_min_dte: 3,
            short_leg_max_dte: 7,
            long_leg_min_dte: 30,
            exit_min_minutes: 15,
            exit_max_minutes: 30,
            risk: RiskRange::new(3.0, 5.0),
        }
    }
}

/// What to do with the setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SetupRecommendation {
    /// Enter on earnings day following the plan.
    Execute(ExecutionPlan),
    /// Proceed only at reduced size.
    SizeDown {
        passed: usize,
        total: usize,
        risk: RiskRange,
    },
    Skip { passed: usize, total: usize },
}

/// Pass/fail thresholds for the checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaThresholds {
    pub min_volume_millions: f64,
    pub min_iv_ratio: f64,
    pub max_expected_move_pct: f64,
    /// Minimum expected/historical move ratio.
    pub min_move_ratio: f64,
    /// Maximum bid-ask width as a percentage of the debit.
    pub max_bid_ask_pct: f64,
}

impl Default for CriteriaThresholds {
    fn default() -> Self {
        Self {
            min_volume_millions: 1.5,
            min_iv_ratio: 2.5,
            max_expected_move_pct: 10.0,
            min_move_ratio: 3.0,
            max_bid_ask_pct: 20.0,
        }
    }
}

/// Pass counts needed for each tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCutoffs {
    pub excellent_min_passes: usize,
    pub marginal_min_passes: usize,
}

impl Default for TierCutoffs {
    fn default() -> Self {
        Self {
            excellent_min_passes: Criterion::ALL.len(),
            marginal_min_passes: 4,
        }
    }
}

/// Configuration for the earnings setup engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarningsSetupConfig {
    pub criteria: CriteriaThresholds,
    pub tiers: TierCutoffs,
    pub playbook: ExecutionPlan,
    /// Risk range suggested for marginal setups.
    pub reduced_risk: RiskRange,
}

impl Default for EarningsSetupConfig {
    fn default() -> Self {
        Self {
            criteria: CriteriaThresholds::default(),
            tiers: TierCutoffs::default(),
            playbook: ExecutionPlan::default(),
            reduced_risk: RiskRange::new(2.0, 3.0),
        }
    }
}

/// Complete checklist evaluation for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsResult {
    /// Uppercased ticker.
    pub ticker: String,
    /// Always six entries, in [`Criterion::ALL`] order.
    pub criteria: Vec<CriterionResult>,
    pub pass_count: usize,
    pub tier: SetupTier,
    pub iv_ratio: f64,
    pub move_ratio: f64,
    pub bid_ask_pct: f64,
    pub red_flags: Vec<RedFlag>,
    pub recommendation: SetupRecommendation,
}

impl EarningsResult {
    pub fn total(&self) -> usize {
        self.criteria.len()
    }

    pub fn failed_criteria(&self) -> Vec<&CriterionResult> {
        self.criteria.iter().filter(|c| !c.passed).collect()
    }

    /// One-line outcome, naming any failed criteria.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {}/{} criteria met ({:?})",
            self.ticker,
            self.pass_count,
            self.total(),
            self.tier
        );
        let failed = self.failed_criteria();
        if !failed.is_empty() {
            let names: Vec<&str> = failed.iter().map(|c| c.criterion.name()).collect();
            summary.push_str(&format!(", failed: {}", names.join(", ")));
        }
        summary
    }
}

/// Earnings calendar checklist engine.
#[derive(Debug, Clone, Default)]
pub struct EarningsSetupEngine {
    config: EarningsSetupConfig,
}

impl EarningsSetupEngine {
    pub fn new(config: EarningsSetupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EarningsSetupConfig {
        &self.config
    }

    /// Run the full checklist.
    pub fn evaluate(&self, input: &EarningsInput) -> CalculatorResult<EarningsResult> {
        input.validate()?;

        let ticker = input.normalized_ticker();
        let thresholds = &self.config.criteria;

        let iv_ratio = input.front_iv / input.back_iv;
        let move_ratio = input.expected_move_pct / input.historical_move_pct;
        let bid_ask_pct = bid_ask_percent(input.bid_ask_spread, input.spread_cost);
        let red_flags = input.red_flags();

        debug!(%ticker, iv_ratio, move_ratio, bid_ask_pct, "earnings ratios computed");

        let criteria = vec![
            check_volume(input.volume_millions, thresholds.min_volume_millions),
            check_iv_ratio(iv_ratio, thresholds.min_iv_ratio),
            check_expected_move(input.expected_move_pct, thresholds.max_expected_move_pct),
            check_overpricing(move_ratio, thresholds.min_move_ratio),
            check_bid_ask(bid_ask_pct, thresholds.max_bid_ask_pct),
            check_red_flags(&red_flags),
        ];

        let pass_count = criteria.iter().filter(|c| c.passed).count();
        let total = criteria.len();
        let tier = self.tier_for(pass_count);
        let recommendation = match tier {
            SetupTier::Excellent => SetupRecommendation::Execute(self.config.playbook.clone()),
            SetupTier::Marginal => SetupRecommendation::SizeDown {
                passed: pass_count,
                total,
                risk: self.config.reduced_risk,
            },
            SetupTier::Skip => SetupRecommendation::Skip {
                passed: pass_count,
                total,
            },
        };

        debug!(%ticker, pass_count, ?tier, "earnings setup evaluated");

        Ok(EarningsResult {
            ticker,
            criteria,
            pass_count,
            tier,
            iv_ratio,
            move_ratio,
            bid_ask_pct,
            red_flags,
            recommendation,
        })
    }

    /// Map a pass count to a tier. First match wins.
    pub fn tier_for(&self, pass_count: usize) -> SetupTier {
        let tiers = &self.config.tiers;
        if pass_count >= tiers.excellent_min_passes {
            SetupTier::Excellent
        } else if pass_count >= tiers.marginal_min_passes {
            SetupTier::Marginal
        } else {
            SetupTier::Skip
        }
    }
}

/// Bid-ask width as a percentage of the debit, computed exactly in decimal.
///
/// Quotients beyond the decimal range use the binary floating-point result.
/// `spread_cost` is already validated as positive.
fn bid_ask_percent(bid_ask: Decimal, spread_cost: Decimal) -> f64 {
    let exact = bid_ask
        .checked_div(spread_cost)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64());

    match exact {
        Some(pct) => pct,
        None => {
            let bid_ask = bid_ask.to_f64().unwrap_or(f64::NAN);
            let spread_cost = spread_cost.to_f64().unwrap_or(f64::NAN);
            debug!(bid_ask, spread_cost, "bid-ask percentage overflows decimal range");
            bid_ask / spread_cost * 100.0
        }
    }
}

fn check_volume(volume: f64, min: f64) -> CriterionResult {
    if volume >= min {
        CriterionResult::pass(Criterion::Volume, format!("Volume: {}M ≥ {}M", volume, min))
    } else {
        CriterionResult::fail(
            Criterion::Volume,
            format!("Volume: {}M < {}M (need more liquidity)", volume, min),
        )
    }
}

fn check_iv_ratio(ratio: f64, min: f64) -> CriterionResult {
    if ratio >= min {
        CriterionResult::pass(
            Criterion::IvRatio,
            format!("IV Ratio: {}x ≥ {}x", to_fixed(ratio, 2), min),
        )
    } else {
        CriterionResult::fail(
            Criterion::IvRatio,
            format!("IV Ratio: {}x < {}x (need more skew)", to_fixed(ratio, 2), min),
        )
    }
}

fn check_expected_move(expected: f64, max: f64) -> CriterionResult {
    if expected <= max {
        CriterionResult::pass(
            Criterion::ExpectedMove,
            format!("Expected Move: {}% ≤ {}%", expected, max),
        )
    } else {
        CriterionResult::fail(
            Criterion::ExpectedMove,
            format!("Expected Move: {}% > {}% (too volatile)", expected, max),
        )
    }
}

fn check_overpricing(ratio: f64, min: f64) -> CriterionResult {
    if ratio >= min {
        CriterionResult::pass(
            Criterion::Overpricing,
            format!("Overpricing: {}x historical ≥ {}x", to_fixed(ratio, 1), min),
        )
    } else {
        CriterionResult::fail(
            Criterion::Overpricing,
            format!("Overpricing: {}x historical < {}x", to_fixed(ratio, 1), min),
        )
    }
}

fn check_bid_ask(pct: f64, max: f64) -> CriterionResult {
    if pct <= max {
        CriterionResult::pass(
            Criterion::BidAsk,
            format!("Bid-Ask: {}% ≤ {}% of cost", to_fixed(pct, 1), max),
        )
    } else {
        CriterionResult::fail(
            Criterion::BidAsk,
            format!("Bid-Ask: {}% > {}% (too wide)", to_fixed(pct, 1), max),
        )
    }
}

fn check_red_flags(flags: &[RedFlag]) -> CriterionResult {
    if flags.is_empty() {
        return CriterionResult::pass(Criterion::RedFlags, "No red flags detected".to_string());
    }

    let names: Vec<&str> = flags.iter().map(RedFlag::label).collect();
    CriterionResult::fail(
        Criterion::RedFlags,
        format!("Red flags: {}", names.join(", ")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalculatorError, ValidationError};
    use rust_decimal_macros::dec;

    /// Every criterion passes.
    fn clean_setup() -> EarningsInput {
        EarningsInput {
            ticker: "nflx".to_string(),
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

    fn labels(result: &EarningsResult) -> Vec<&str> {
        result.criteria.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = EarningsSetupConfig::default();
        assert_eq!(config.criteria.min_volume_millions, 1.5);
        assert_eq!(config.criteria.min_iv_ratio, 2.5);
        assert_eq!(config.criteria.max_expected_move_pct, 10.0);
        assert_eq!(config.criteria.min_move_ratio, 3.0);
        assert_eq!(config.criteria.max_bid_ask_pct, 20.0);
        assert_eq!(config.tiers.excellent_min_passes, 6);
        assert_eq!(config.tiers.marginal_min_passes, 4);
        assert_eq!(config.reduced_risk.to_string(), "2-3%");
        assert_eq!(config.playbook.risk.to_string(), "3-5%");
    }

    #[test]
    fn test_all_criteria_pass_is_excellent() {
        let engine = EarningsSetupEngine::default();
        let result = engine.evaluate(&clean_setup()).unwrap();

        assert_eq!(result.ticker, "NFLX");
        assert_eq!(result.pass_count, 6);
        assert_eq!(result.total(), 6);
        assert_eq!(result.tier, SetupTier::Excellent);
        assert!((result.iv_ratio - 3.3333).abs() < 1e-3);
        assert_eq!(result.move_ratio, 4.0);
        assert_eq!(result.bid_ask_pct, 10.0);
        assert_eq!(
            labels(&result),
            vec![
                "Volume: 2M ≥ 1.5M",
                "IV Ratio: 3.33x ≥ 2.5x",
                "Expected Move: 8% ≤ 10%",
                "Overpricing: 4.0x historical ≥ 3x",
                "Bid-Ask: 10.0% ≤ 20% of cost",
                "No red flags detected",
            ]
        );
        assert_eq!(
            result.recommendation,
            SetupRecommendation::Execute(ExecutionPlan::default())
        );
    }

    #[test]
    fn test_low_volume_is_marginal() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            volume_millions: 1.0,
            front_iv: 45.0,
            back_iv: 15.0,
            bid_ask_spread: dec!(1.5),
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();

        assert_eq!(result.pass_count, 5);
        assert_eq!(result.tier, SetupTier::Marginal);
        assert_eq!(result.criteria[0].label, "Volume: 1M < 1.5M (need more liquidity)");
        assert_eq!(result.criteria[1].label, "IV Ratio: 3.00x ≥ 2.5x");
        assert_eq!(result.criteria[4].label, "Bid-Ask: 15.0% ≤ 20% of cost");
        assert_eq!(
            result.recommendation,
            SetupRecommendation::SizeDown {
                passed: 5,
                total: 6,
                risk: RiskRange::new(2.0, 3.0)
            }
        );
        assert_eq!(result.failed_criteria().len(), 1);
        assert_eq!(result.failed_criteria()[0].criterion, Criterion::Volume);
    }

    #[test]
    fn test_failing_labels() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            volume_millions: 0.8,
            front_iv: 40.0,
            back_iv: 20.0,
            expected_move_pct: 12.0,
            historical_move_pct: 6.0,
            spread_cost: dec!(2),
            bid_ask_spread: dec!(0.5),
            is_biotech: true,
            is_meme: true,
            had_recent_gap: true,
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();

        assert_eq!(result.pass_count, 0);
        assert_eq!(result.tier, SetupTier::Skip);
        assert_eq!(
            labels(&result),
            vec![
                "Volume: 0.8M < 1.5M (need more liquidity)",
                "IV Ratio: 2.00x < 2.5x (need more skew)",
                "Expected Move: 12% > 10% (too volatile)",
                "Overpricing: 2.0x historical < 3x",
                "Bid-Ask: 25.0% > 20% (too wide)",
                "Red flags: Biotech, Meme stock, Recent gap >15%",
            ]
        );
        assert_eq!(
            result.recommendation,
            SetupRecommendation::Skip { passed: 0, total: 6 }
        );
    }

    #[test]
    fn test_red_flag_label_lists_only_triggered() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            is_meme: true,
            had_recent_gap: true,
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();
        assert_eq!(result.criteria[5].label, "Red flags: Meme stock, Recent gap >15%");
        assert_eq!(result.red_flags, vec![RedFlag::MemeStock, RedFlag::RecentGap]);
        assert_eq!(result.pass_count, 5);
    }

    #[test]
    fn test_tier_boundaries() {
        let engine = EarningsSetupEngine::default();
        assert_eq!(engine.tier_for(6), SetupTier::Excellent);
        assert_eq!(engine.tier_for(5), SetupTier::Marginal);
        assert_eq!(engine.tier_for(4), SetupTier::Marginal);
        assert_eq!(engine.tier_for(3), SetupTier::Skip);
        assert_eq!(engine.tier_for(0), SetupTier::Skip);
    }

    #[test]
    fn test_four_passes_is_marginal_three_is_skip() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            volume_millions: 1.0,
            is_biotech: true,
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();
        assert_eq!(result.pass_count, 4);
        assert_eq!(result.tier, SetupTier::Marginal);

        let input = EarningsInput {
            expected_move_pct: 11.0,
            historical_move_pct: 1.0,
            ..input
        };
        let result = engine.evaluate(&input).unwrap();
        assert_eq!(result.pass_count, 3);
        assert_eq!(result.tier, SetupTier::Skip);
    }

    #[test]
    fn test_inclusive_thresholds() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            volume_millions: 1.5,
            front_iv: 50.0,
            back_iv: 20.0,
            expected_move_pct: 10.0,
            historical_move_pct: 2.5,
            spread_cost: dec!(10),
            bid_ask_spread: dec!(2),
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();

        // 2 / 10 is exactly 20% in decimal
        assert_eq!(result.bid_ask_pct, 20.0);
        assert!(result.criteria.iter().all(|c| c.passed));
        assert_eq!(result.tier, SetupTier::Excellent);
    }

    #[test]
    fn test_all_criteria_always_evaluated() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            volume_millions: 0.1,
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();
        let order: Vec<Criterion> = result.criteria.iter().map(|c| c.criterion).collect();
        assert_eq!(order, Criterion::ALL.to_vec());
    }

    #[test]
    fn test_validation_errors() {
        let engine = EarningsSetupEngine::default();

        let input = EarningsInput {
            ticker: String::new(),
            ..clean_setup()
        };
        assert_eq!(
            engine.evaluate(&input),
            Err(CalculatorError::Validation(ValidationError::MissingField(
                "ticker"
            )))
        );

        let input = EarningsInput {
            back_iv: 0.0,
            ..clean_setup()
        };
        assert_eq!(
            engine.evaluate(&input),
            Err(CalculatorError::Validation(ValidationError::ZeroField(
                "back_iv"
            )))
        );
    }

    #[test]
    fn test_custom_tiers() {
        let config = EarningsSetupConfig {
            tiers: TierCutoffs {
                excellent_min_passes: 5,
                marginal_min_passes: 3,
            },
            ..Default::default()
        };
        let engine = EarningsSetupEngine::new(config);
        assert_eq!(engine.tier_for(5), SetupTier::Excellent);
        assert_eq!(engine.tier_for(3), SetupTier::Marginal);
        assert_eq!(engine.tier_for(2), SetupTier::Skip);
    }

    #[test]
    fn test_summary_and_idempotence() {
        let engine = EarningsSetupEngine::default();
        let first = engine.evaluate(&clean_setup()).unwrap();
        let second = engine.evaluate(&clean_setup()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.summary(), "NFLX: 6/6 criteria met (Excellent)");

        let input = EarningsInput {
            volume_millions: 1.0,
            is_meme: true,
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();
        assert_eq!(
            result.summary(),
            "NFLX: 4/6 criteria met (Marginal), failed: Volume, Red flags"
        );
    }

    #[test]
    fn test_label_ties_round_half_up() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            front_iv: 1.0,
            back_iv: 8.0,
            expected_move_pct: 1.0,
            historical_move_pct: 4.0,
            spread_cost: dec!(100),
            bid_ask_spread: dec!(1.25),
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();

        assert_eq!(result.criteria[1].label, "IV Ratio: 0.13x < 2.5x (need more skew)");
        assert_eq!(result.criteria[3].label, "Overpricing: 0.3x historical < 3x");
        assert_eq!(result.criteria[4].label, "Bid-Ask: 1.3% ≤ 20% of cost");
    }

    #[test]
    fn test_bid_ask_beyond_decimal_range_still_scores() {
        let engine = EarningsSetupEngine::default();
        let input = EarningsInput {
            spread_cost: dec!(0.001),
            bid_ask_spread: dec!(10000000000000000000000000),
            ..clean_setup()
        };
        let result = engine.evaluate(&input).unwrap();

        assert!((result.bid_ask_pct / 1e30 - 1.0).abs() < 1e-9);
        assert!(!result.criteria[4].passed);
        assert!(result.criteria[4].label.ends_with("% > 20% (too wide)"));
        assert_eq!(result.pass_count, 5);
        assert_eq!(result.tier, SetupTier::Marginal);
    }
}
