// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves and transition timing.

use core::f64::consts::PI;

/// An easing curve mapping normalized time `t ∈ [0, 1]` to progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Symmetric cubic ease-in-out.
    CubicInOut,
    /// Bounce at the end (d3's `easeBounce`).
    #[default]
    Bounce,
    /// Sinusoidal ease-in-out.
    SinInOut,
}

impl Ease {
    /// Applies the curve. Inputs outside `[0, 1]` are clamped.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
            Self::Bounce => bounce_out(t),
            Self::SinInOut => (1.0 - (PI * t).cos()) / 2.0,
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const B1: f64 = 4.0 / 11.0;
    const B2: f64 = 6.0 / 11.0;
    const B3: f64 = 8.0 / 11.0;
    const B4: f64 = 3.0 / 4.0;
    const B5: f64 = 9.0 / 11.0;
    const B6: f64 = 10.0 / 11.0;
    const B7: f64 = 15.0 / 16.0;
    const B8: f64 = 21.0 / 22.0;
    const B9: f64 = 63.0 / 64.0;
    const B0: f64 = 1.0 / B1 / B1;

    if t < B1 {
        B0 * t * t
    } else if t < B3 {
        let u = t - B2;
        B0 * u * u + B4
    } else if t < B6 {
        let u = t - B5;
        B0 * u * u + B7
    } else {
        let u = t - B8;
        B0 * u * u + B9
    }
}

/// Timing for an animated change of a mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Duration in seconds. Zero applies changes immediately.
    pub duration: f64,
    /// Easing curve.
    pub ease: Ease,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration: 0.5,
            ease: Ease::Bounce,
        }
    }
}

impl Transition {
    /// A transition that completes immediately.
    pub const NONE: Self = Self {
        duration: 0.0,
        ease: Ease::Linear,
    };

    /// Creates a transition.
    pub fn new(duration: f64, ease: Ease) -> Self {
        Self {
            duration: duration.max(0.0),
            ease,
        }
    }

    /// Eased progress after `elapsed` seconds.
    pub fn progress(&self, elapsed: f64) -> f64 {
        if self.duration <= 0.0 || !self.duration.is_finite() {
            return 1.0;
        }
        self.ease.apply(elapsed / self.duration)
    }

    /// Whether the transition has run to completion after `elapsed` seconds.
    pub fn is_finished(&self, elapsed: f64) -> bool {
        self.duration <= 0.0 || !self.duration.is_finite() || elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for ease in [Ease::Linear, Ease::CubicInOut, Ease::Bounce, Ease::SinInOut] {
            assert_approx_eq!(f64, ease.apply(0.0), 0.0, epsilon = 1e-9);
            assert_approx_eq!(f64, ease.apply(1.0), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_duration_is_immediate() {
        let t = Transition::NONE;
        assert_eq!(t.progress(0.0), 1.0);
        assert!(t.is_finished(0.0));
    }

    #[test]
    fn progress_clamps_past_the_end() {
        let t = Transition::new(0.5, Ease::Linear);
        assert_approx_eq!(f64, t.progress(0.25), 0.5, epsilon = 1e-12);
        assert_eq!(t.progress(3.0), 1.0);
        assert!(!t.is_finished(0.25));
        assert!(t.is_finished(0.5));
    }
}
