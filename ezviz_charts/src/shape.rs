// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout generators: pie angles and stacked offsets.

use core::f64::consts::TAU;

/// Angles allotted to one value by [`pie`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    /// Position of the value in the input.
    pub index: usize,
    /// The value.
    pub value: f64,
    /// Start angle, clockwise from 12 o'clock.
    pub start_angle: f64,
    /// End angle, including the slice's share of padding.
    pub end_angle: f64,
    /// Padding to remove between adjacent slices.
    pub pad_angle: f64,
}

impl PieSlice {
    /// Angle halfway through the slice.
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + (self.end_angle - self.start_angle) / 2.0
    }
}

/// Lays `values` out around a circle in input order.
///
/// Non-positive and `NaN` values get zero sweep (but still a share of padding). The pad angle
/// is capped so padding never exceeds the available sweep.
pub fn pie(values: &[f64], start_angle: f64, end_angle: f64, pad_angle: f64) -> Vec<PieSlice> {
    let n = values.len() as f64;
    let sum: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let sweep = (end_angle - start_angle).clamp(-TAU, TAU);
    let pad = if values.is_empty() {
        0.0
    } else {
        (sweep.abs() / n).min(pad_angle.max(0.0))
    };
    let signed_pad = pad * sweep.signum();
    let k = if sum > 0.0 {
        (sweep - n * signed_pad) / sum
    } else {
        0.0
    };

    let mut angle = start_angle;
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let share = if value > 0.0 { value * k } else { 0.0 };
            let next = angle + share + signed_pad;
            let slice = PieSlice {
                index,
                value,
                start_angle: angle,
                end_angle: next,
                pad_angle: pad,
            };
            angle = next;
            slice
        })
        .collect()
}

/// One stacked segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackSegment {
    /// Baseline of the segment.
    pub y0: f64,
    /// Top of the segment.
    pub y1: f64,
}

/// Stacks `values` on top of each other, in order, from zero.
pub fn stack(values: impl IntoIterator<Item = f64>) -> Vec<StackSegment> {
    let mut y0 = 0.0;
    values
        .into_iter()
        .map(|v| {
            let segment = StackSegment { y0, y1: y0 + v };
            y0 += v;
            segment
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn pie_splits_a_full_turn_proportionally() {
        let slices = pie(&[1.0, 3.0], 0.0, TAU, 0.0);
        assert_approx_eq!(f64, slices[0].end_angle, PI / 2.0, epsilon = 1e-12);
        assert_approx_eq!(f64, slices[1].start_angle, PI / 2.0, epsilon = 1e-12);
        assert_approx_eq!(f64, slices[1].end_angle, TAU, epsilon = 1e-12);
        assert_approx_eq!(f64, slices[0].mid_angle(), PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn pie_padding_keeps_the_total_sweep() {
        let slices = pie(&[1.0, 1.0, 1.0], 0.0, TAU, 0.015);
        let Some(last) = slices.last() else {
            panic!("three slices");
        };
        assert_approx_eq!(f64, last.end_angle, TAU, epsilon = 1e-12);
        assert!(slices.iter().all(|s| s.pad_angle == 0.015));
    }

    #[test]
    fn pie_ignores_missing_values() {
        let slices = pie(&[f64::NAN, 2.0, -1.0], 0.0, TAU, 0.0);
        assert_eq!(slices[0].start_angle, slices[0].end_angle);
        assert_approx_eq!(f64, slices[1].end_angle, TAU, epsilon = 1e-12);
        assert_eq!(slices[2].start_angle, slices[2].end_angle);
        assert!(pie(&[0.0, 0.0], 0.0, TAU, 0.0).iter().all(|s| s.end_angle == 0.0));
    }

    #[test]
    fn stack_accumulates() {
        let segments = stack([1.0, 2.0, 3.0]);
        assert_eq!(
            segments,
            [
                StackSegment { y0: 0.0, y1: 1.0 },
                StackSegment { y0: 1.0, y1: 3.0 },
                StackSegment { y0: 3.0, y1: 6.0 },
            ]
        );
    }
}
