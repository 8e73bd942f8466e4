// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Guides for radial charts: rings, spokes and their labels.
//!
//! All three components draw around the frame origin. Angular scales are in degrees, clockwise
//! from 12 o'clock; radial scales map to distances from the centre.

use ezviz_core::{Curve, Mark, Shape, TextAnchor, TextBaseline, TextShape, Transition};
use kurbo::Point;
use peniko::Color;

use crate::component::radians;
use crate::format::to_fixed;
use crate::frame::Frame;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::z_order;

const RING_COLOR: Color = Color::from_rgb8(0xdd, 0xdd, 0xdd);
const LABEL_FONT_SIZE: f64 = 10.0;

/// A band or linear scale laid out around, or out from, the centre.
#[derive(Clone, Debug, PartialEq)]
pub enum RadialScale {
    /// One position per key.
    Band(ScaleBand),
    /// Evenly spaced numeric positions.
    Linear(ScaleLinear),
}

impl From<ScaleBand> for RadialScale {
    fn from(scale: ScaleBand) -> Self {
        Self::Band(scale)
    }
}

impl From<ScaleLinear> for RadialScale {
    fn from(scale: ScaleLinear) -> Self {
        Self::Linear(scale)
    }
}

impl RadialScale {
    fn range(&self) -> (f64, f64) {
        match self {
            Self::Band(s) => s.range(),
            Self::Linear(s) => s.range(),
        }
    }

    /// Labels spread evenly over the range, with their angles in degrees.
    ///
    /// A linear scale yields `count + 1` whole-number steps of its domain, where `count` is its
    /// tick count. A band scale yields its keys, plus a trailing blank entry when `close` is set
    /// so the last sector is also bounded.
    fn divisions(&self, close: bool) -> Vec<(String, f64)> {
        let (labels, count): (Vec<String>, usize) = match self {
            Self::Linear(s) => {
                let (d0, d1) = s.domain();
                let count = s.ticks(10).len();
                let increment = (d0.max(d1) - d0.min(d1)) / count.max(1) as f64;
                (
                    (0..=count)
                        .map(|i| to_fixed(increment * i as f64, 0))
                        .collect(),
                    count,
                )
            }
            Self::Band(s) => {
                let mut keys: Vec<String> = s.domain().map(str::to_owned).collect();
                let count = keys.len();
                if close {
                    keys.push(String::new());
                }
                (keys, count)
            }
        };
        let spread = ScaleLinear::new((0.0, count as f64), self.range());
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label, spread.map(i as f64)))
            .collect()
    }
}

fn polar(radius: f64, degrees: f64) -> Point {
    let (sin, cos) = radians(degrees).sin_cos();
    Point::new(radius * sin, -radius * cos)
}

/// Outer circle, a ring per radial tick and a spoke per angular division.
#[derive(Clone, Debug)]
pub struct CircularAxis {
    radius: f64,
    radial_scale: RadialScale,
    ring_scale: RadialScale,
    transition: Transition,
}

impl CircularAxis {
    /// An axis of `radius` with angular (`radial_scale`) and radial (`ring_scale`) scales.
    pub fn new(
        radius: f64,
        radial_scale: impl Into<RadialScale>,
        ring_scale: impl Into<RadialScale>,
    ) -> Self {
        Self {
            radius,
            radial_scale: radial_scale.into(),
            ring_scale: ring_scale.into(),
            transition: Transition::default(),
        }
    }

    /// Sets the transition timing.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Ring radii, in scale order.
    pub fn ring_radii(&self) -> Vec<f64> {
        match &self.ring_scale {
            RadialScale::Linear(s) => s.ticks(10).into_iter().map(|v| s.map(v)).collect(),
            RadialScale::Band(s) => {
                let half = s.bandwidth() / 2.0;
                s.domain().filter_map(|k| s.map(k)).map(|r| r + half).collect()
            }
        }
    }

    /// Draws the axis around the frame origin.
    pub fn render(&self, frame: &mut Frame<'_>) {
        frame.push(
            Mark::builder(frame.id("outer-circle", "circle"))
                .circle(Point::ZERO, self.radius)
                .no_fill()
                .stroke(RING_COLOR, 2.0)
                .z_index(z_order::GRID_LINES)
                .transition(self.transition)
                .class("outer-circle")
                .build(),
        );
        for (i, r) in self.ring_radii().into_iter().enumerate() {
            frame.push(
                Mark::builder(frame.id("ring", &i.to_string()))
                    .circle(Point::ZERO, r)
                    .enter(Shape::Circle {
                        center: Point::ZERO,
                        radius: 0.0,
                    })
                    .no_fill()
                    .stroke(RING_COLOR, 1.0)
                    .z_index(z_order::GRID_LINES)
                    .transition(self.transition)
                    .class("ring")
                    .build(),
            );
        }
        for (i, (_, angle)) in self.radial_scale.divisions(true).into_iter().enumerate() {
            frame.push(
                Mark::builder(frame.id("spoke", &i.to_string()))
                    .polyline(vec![Point::ZERO, polar(self.radius, angle)], Curve::Linear)
                    .stroke(RING_COLOR, 1.0)
                    .z_index(z_order::GRID_LINES)
                    .transition(self.transition)
                    .class("spoke")
                    .build(),
            );
        }
    }
}

/// Labels around the rim, one per angular division, turned to follow the circle.
#[derive(Clone, Debug)]
pub struct CircularSectorLabels {
    radius: f64,
    radial_scale: RadialScale,
    anchor: TextAnchor,
    capitalize: bool,
}

impl CircularSectorLabels {
    /// Labels at `radius` for `radial_scale`.
    pub fn new(radius: f64, radial_scale: impl Into<RadialScale>) -> Self {
        Self {
            radius,
            radial_scale: radial_scale.into(),
            anchor: TextAnchor::Middle,
            capitalize: false,
        }
    }

    /// Sets the anchor relative to the division angle.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Upper-cases label text.
    pub fn with_capitalize(mut self, capitalize: bool) -> Self {
        self.capitalize = capitalize;
        self
    }

    /// Draws the labels around the frame origin.
    pub fn render(&self, frame: &mut Frame<'_>) {
        for (label, angle) in self.radial_scale.divisions(false) {
            let text = if self.capitalize {
                label.to_uppercase()
            } else {
                label
            };
            frame.push(
                Mark::builder(frame.id("sector-label", &text))
                    .text(
                        TextShape::new(polar(self.radius, angle), text.as_str(), LABEL_FONT_SIZE)
                            .with_anchor(self.anchor)
                            .with_angle(angle),
                    )
                    .z_index(z_order::AXIS_LABELS)
                    .class("sector-label")
                    .build(),
            );
        }
    }
}

/// A label per ring, set just outside the ring at the start angle.
#[derive(Clone, Debug)]
pub struct CircularRingLabels {
    ring_scale: ScaleBand,
    start_angle: f64,
}

impl CircularRingLabels {
    /// Labels for the keys of `ring_scale`.
    pub fn new(ring_scale: ScaleBand) -> Self {
        Self {
            ring_scale,
            start_angle: 0.0,
        }
    }

    /// Sets the angle labels start at, in degrees.
    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.start_angle = degrees;
        self
    }

    /// Draws the labels around the frame origin.
    pub fn render(&self, frame: &mut Frame<'_>) {
        for key in self.ring_scale.domain() {
            let Some(r) = self.ring_scale.map(key) else {
                continue;
            };
            let a = self.start_angle;
            // Nudged along the ring and outward, clear of the stroke.
            let at = polar(r, a) + polar(5.0, a + 90.0).to_vec2() + polar(5.0, a).to_vec2();
            frame.push(
                Mark::builder(frame.id("ring-label", key))
                    .text(
                        TextShape::new(at, key, LABEL_FONT_SIZE)
                            .with_baseline(TextBaseline::Alphabetic)
                            .with_angle(self.start_angle),
                    )
                    .z_index(z_order::AXIS_LABELS)
                    .class("ring-label")
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn linear_divisions_use_whole_number_steps() {
        let scale = RadialScale::from(ScaleLinear::new((0.0, 10.0), (0.0, 360.0)));
        let divisions = scale.divisions(false);
        // Eleven ticks (0..=10) split the domain into eleven steps.
        assert_eq!(divisions.len(), 12);
        assert_eq!(divisions[1].0, "1");
        assert_approx_eq!(f64, divisions[11].1, 360.0, epsilon = 1e-9);
    }

    #[test]
    fn band_spokes_close_the_last_sector() {
        let band = ScaleBand::new(["a", "b", "c", "d"], (0.0, 360.0));
        let rings = ScaleLinear::new((0.0, 1.0), (0.0, 100.0));
        let axis = CircularAxis::new(100.0, band.clone(), rings);
        let mut marks = Vec::new();
        axis.render(&mut Frame::new(&mut marks));
        let spokes: Vec<&Mark> = marks.iter().filter(|m| m.class == "spoke").collect();
        assert_eq!(spokes.len(), 5);
        let Shape::Polyline { points, .. } = &spokes[1].payload.shape else {
            panic!("spokes are lines");
        };
        assert_approx_eq!(f64, points[1].x, 100.0, epsilon = 1e-9);
        assert_approx_eq!(f64, points[1].y, 0.0, epsilon = 1e-9);

        let mut labels = Vec::new();
        CircularSectorLabels::new(104.0, band).render(&mut Frame::new(&mut labels));
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn band_rings_sit_mid_band() {
        let rings = ScaleBand::new(["inner", "outer"], (20.0, 100.0));
        let angles = ScaleLinear::new((0.0, 1.0), (0.0, 360.0));
        let axis = CircularAxis::new(100.0, angles, rings.clone());
        assert_eq!(axis.ring_radii(), [40.0, 80.0]);

        let mut labels = Vec::new();
        CircularRingLabels::new(rings).render(&mut Frame::new(&mut labels));
        let Shape::Text(text) = &labels[0].payload.shape else {
            panic!("ring labels are text");
        };
        // Five units right of, and five above, the ring's top point.
        assert_approx_eq!(f64, text.pos.x, 5.0, epsilon = 1e-9);
        assert_approx_eq!(f64, text.pos.y, -25.0, epsilon = 1e-9);
    }
}
