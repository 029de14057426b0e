//! Number formatting for labels and reports.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fixed-point text with `dp` decimals, ties rounded away from zero.
///
/// Rounding applies to the exact binary value, so `0.125` gives `"0.13"`
/// while `1.005`, stored just below the tie, gives `"1.00"`. Values outside
/// the decimal range fall back to the standard formatter.
pub fn to_fixed(value: f64, dp: u32) -> String {
    // Collapse -0.0 so it prints without a sign
    let value = if value == 0.0 { 0.0 } else { value };

    if let Some(exact) = Decimal::from_f64_retain(value) {
        let mut rounded = exact.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(dp);
        if rounded.scale() == dp {
            return rounded.to_string();
        }
    }

    format!("{:.*}", dp as usize, value)
}
