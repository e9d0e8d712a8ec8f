//! Whole-minor-unit rounding helpers.
//!
//! Every portion of an expense is rounded down to the currency's minor unit
//! and the leftover is handed out one unit at a time in a fixed order, so
//! portions always add back up to the exact expense amount.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` down to `scale` fractional digits.
pub fn floor_to_scale(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::ToNegativeInfinity)
}

/// Whether `value` is expressible in whole minor units of `scale`.
pub fn fits_scale(value: Decimal, scale: u32) -> bool {
    value.normalize().scale() <= scale
}

/// Spread `remainder` over `portions`, one `unit` at a time, visiting the
/// slots listed in `order` and wrapping around as often as needed.
///
/// A negative remainder takes units away instead, skipping slots that hold
/// less than one unit. `remainder` must be a whole multiple of `unit`.
pub fn distribute(portions: &mut [Decimal], order: &[usize], remainder: Decimal, unit: Decimal) {
    if order.is_empty() || unit <= Decimal::ZERO {
        return;
    }
    let step = if remainder.is_sign_negative() { -unit } else { unit };
    let mut left = remainder;
    let mut cursor = 0usize;
    let mut skipped = 0usize;

    while left.abs() >= unit {
        let slot = order[cursor % order.len()];
        cursor += 1;
        if step < Decimal::ZERO && portions[slot] < unit {
            skipped += 1;
            if skipped >= order.len() {
                break;
            }
            continue;
        }
        skipped = 0;
        portions[slot] += step;
        left -= step;
    }
    debug_assert!(left.is_zero(), "undistributed remainder {left}");
}
