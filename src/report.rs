//! Text rendering for calculator results.
//!
//! Engines return structured data only. This module owns the wording shown
//! to the trader: signal badges, checklist marks and recommendation prose.

use crate::analytics::{
    EarningsResult, ForwardFactorResult, ForwardSignal, SetupRecommendation, SetupTier,
};
use crate::format::to_fixed;

const SEPARATOR: &str = "============================================================";

/// How a verdict should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Warning,
    Negative,
}

impl Tone {
    /// Wrap text in the ANSI color for this tone.
    pub fn paint(&self, text: &str) -> String {
        let color = match self {
            Tone::Positive => "\x1b[32m", // Green
            Tone::Warning => "\x1b[33m",  // Yellow
            Tone::Negative => "\x1b[31m", // Red
        };
        format!("{}{}\x1b[0m", color, text)
    }
}

fn styled(text: &str, tone: Tone, color: bool) -> String {
    if color {
        tone.paint(text)
    } else {
        text.to_string()
    }
}

pub fn signal_badge(signal: ForwardSignal) -> &'static str {
    match signal {
        ForwardSignal::StrongBuy => "🟢 STRONG BUY",
        ForwardSignal::Moderate => "🟡 MODERATE",
        ForwardSignal::NoTrade => "🔴 NO TRADE",
    }
}

pub fn signal_tone(signal: ForwardSignal) -> Tone {
    match signal {
        ForwardSignal::StrongBuy => Tone::Positive,
        ForwardSignal::Moderate => Tone::Warning,
        ForwardSignal::NoTrade => Tone::Negative,
    }
}

pub fn tier_tone(tier: SetupTier) -> Tone {
    match tier {
        SetupTier::Excellent => Tone::Positive,
        SetupTier::Marginal => Tone::Warning,
        SetupTier::Skip => Tone::Negative,
    }
}

/// Recommendation paragraph for a forward factor result.
pub fn forward_recommendation(result: &ForwardFactorResult) -> String {
    let ff = result.forward_factor_pct;
    let strong = result.thresholds.strong_pct;

    match result.signal {
        ForwardSignal::StrongBuy => format!(
            "Strong Setup! Forward Factor of {}% is well above the {}% threshold. \
             Consider entering a long calendar spread (sell {}-day, buy {}-day). \
             The front IV ({}%) is significantly elevated vs forward volatility ({}%), \
             suggesting a profitable mean reversion opportunity.",
            to_fixed(ff, 1),
            strong,
            result.input.front_dte,
            result.input.back_dte,
            result.input.front_iv,
            to_fixed(result.forward_vol_pct, 1)
        ),
        ForwardSignal::Moderate => format!(
            "Moderate Setup. Forward Factor of {}% is positive but below the ideal {}% threshold. \
             This could work but has lower edge. Consider waiting for better setups or sizing down.",
            to_fixed(ff, 1),
            strong
        ),
        ForwardSignal::NoTrade => format!(
            "Skip This Trade. Forward Factor of {}% is too low. \
             The term structure doesn't show enough misalignment to justify the trade. \
             Look for other opportunities.",
            to_fixed(ff, 1)
        ),
    }
}

/// Full forward factor report. `color` paints the signal line by tone.
pub fn render_forward(result: &ForwardFactorResult, color: bool) -> String {
    let badge = styled(signal_badge(result.signal), signal_tone(result.signal), color);
    let mut lines = vec![
        SEPARATOR.to_string(),
        "Forward Factor".to_string(),
        SEPARATOR.to_string(),
        format!("Forward Volatility: {}%", to_fixed(result.forward_vol_pct, 2)),
        format!("Forward Factor:     {}%", to_fixed(result.forward_factor_pct, 2)),
        format!("Signal:             {}", badge),
        String::new(),
    ];
    lines.push(forward_recommendation(result));
    lines.join("\n")
}

/// Checklist line with a pass/fail mark.
pub fn checklist_line(passed: bool, label: &str) -> String {
    let mark = if passed { "✓" } else { "✗" };
    format!("{} {}", mark, label)
}

/// Recommendation block for an earnings result.
pub fn earnings_recommendation(result: &EarningsResult) -> String {
    let ticker = &result.ticker;

    match &result.recommendation {
        SetupRecommendation::Execute(plan) => [
            format!("🎯 EXCELLENT SETUP for {}!", ticker),
            "All criteria met. This is a high-probability earnings calendar trade.".to_string(),
            String::new(),
            "Execution:".to_string(),
            "• Enter today (earnings day) for better liquidity".to_string(),
            format!(
                "• Sell front month call ({}-{} DTE post-earnings)",
                plan.short_leg_min_dte, plan.short_leg_max_dte
            ),
            format!("• Buy back month call ({}+ DTE)", plan.long_leg_min_dte),
            format!("• Risk {} of account maximum", plan.risk),
            format!(
                "• Exit {}-{} min after market open tomorrow",
                plan.exit_min_minutes, plan.exit_max_minutes
            ),
        ]
        .join("\n"),
        SetupRecommendation::SizeDown {
            passed,
            total,
            risk,
        } => [
            format!("⚠️ MARGINAL SETUP for {}", ticker),
            format!(
                "{}/{} criteria met. Consider if the failed criteria are deal-breakers.",
                passed, total
            ),
            format!("If you proceed, consider sizing down to {} risk.", risk),
        ]
        .join("\n"),
        SetupRecommendation::Skip { passed, total } => [
            format!("❌ SKIP THIS TRADE for {}", ticker),
            format!(
                "Only {}/{} criteria met. Too many red flags for this earnings play.",
                passed, total
            ),
            "Look for better setups with higher IV ratios and no red flags.".to_string(),
        ]
        .join("\n"),
    }
}

/// Full checklist report. `color` paints the verdict heading by tier.
pub fn render_earnings(result: &EarningsResult, color: bool) -> String {
    let mut lines = vec![
        SEPARATOR.to_string(),
        format!("Earnings Calendar Setup: {}", result.ticker),
        SEPARATOR.to_string(),
    ];
    lines.extend(
        result
            .criteria
            .iter()
            .map(|c| checklist_line(c.passed, &c.label)),
    );

    let failed = result.failed_criteria();
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|c| c.criterion.name()).collect();
        lines.push(format!("Failed: {}", names.join(", ")));
    }
    lines.push(String::new());

    let recommendation = earnings_recommendation(result);
    let mut blocks = recommendation.splitn(2, '\n');
    if let Some(heading) = blocks.next() {
        lines.push(styled(heading, tier_tone(result.tier), color));
    }
    lines.extend(blocks.map(str::to_string));
    lines.join("\n")
}
