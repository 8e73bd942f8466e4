// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for labels and ticks.

use crate::stats::round_to;

/// Formats `value` with exactly `places` fractional digits; halves round away from zero.
///
/// Non-finite values format as `NaN`, `Infinity` or `-Infinity`.
pub fn to_fixed(value: f64, places: u32) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let places = places.min(20);
    let rounded = round_to(value, places);
    // `-0.0` would otherwise print with a sign.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0$}", places as usize)
}

/// Fractional digits needed to tell ticks `step` apart.
pub fn precision_for_step(step: f64) -> u32 {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let digits = -step.abs().log10().floor();
    if digits <= 0.0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation, reason = "bounded to a small digit count")]
        {
            digits.min(20.0) as u32
        }
    }
}

/// Formats a tick value for a linear axis with the given tick step.
pub fn format_tick(value: f64, step: f64) -> String {
    to_fixed(value, precision_for_step(step))
}

/// Formats a `start - end` range label with whole numbers.
pub fn range_label(start: f64, end: f64) -> String {
    format!("{} - {}", to_fixed(start, 0), to_fixed(end, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_fixed_rounds_halves_up() {
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.005, 1), "1.0");
        assert_eq!(to_fixed(3.0, 2), "3.00");
        assert_eq!(to_fixed(-0.2, 0), "0");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
    }

    #[test]
    fn tick_precision_follows_step() {
        assert_eq!(precision_for_step(10.0), 0);
        assert_eq!(precision_for_step(1.0), 0);
        assert_eq!(precision_for_step(0.2), 1);
        assert_eq!(precision_for_step(0.05), 2);
        assert_eq!(format_tick(0.30000000000000004, 0.1), "0.3");
    }

    #[test]
    fn range_labels() {
        assert_eq!(range_label(0.0, 12.5), "0 - 13");
    }
}
