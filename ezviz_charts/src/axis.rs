// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis guides.
//!
//! An [`Axis`] draws along the origin of its frame: hosts translate the frame to the edge the
//! axis belongs to (for example `(0, height)` for a bottom axis). Ticks and labels point away
//! from the plot according to [`AxisOrient`]; optional gridlines point into it.

use std::sync::Arc;

use ezviz_core::{Curve, Mark, TextAnchor, TextBaseline, TextShape, Transition};
use kurbo::{Point, Vec2};
use peniko::Color;
use peniko::color::palette::css;

use crate::format::format_tick;
use crate::frame::Frame;
use crate::measure::{TextMeasurer, widest};
use crate::scale::{ScaleBand, ScaleLinear, ScaleTime};
use crate::time::format_time;
use crate::z_order;

/// Which side of the plot an axis sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// Above the plot; ticks point up.
    Top,
    /// Below the plot; ticks point down.
    Bottom,
    /// Left of the plot; ticks point left.
    Left,
    /// Right of the plot; ticks point right.
    Right,
}

impl AxisOrient {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// `+1` when ticks point towards increasing coordinates.
    fn sign(self) -> f64 {
        match self {
            Self::Bottom | Self::Right => 1.0,
            Self::Top | Self::Left => -1.0,
        }
    }
}

/// The scale an axis reads ticks from.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    /// One tick per band, centred.
    Band(ScaleBand),
    /// Nice numeric ticks.
    Linear(ScaleLinear),
    /// Calendar ticks.
    Time(ScaleTime),
}

impl From<ScaleBand> for AxisScale {
    fn from(scale: ScaleBand) -> Self {
        Self::Band(scale)
    }
}

impl From<ScaleLinear> for AxisScale {
    fn from(scale: ScaleLinear) -> Self {
        Self::Linear(scale)
    }
}

impl From<ScaleTime> for AxisScale {
    fn from(scale: ScaleTime) -> Self {
        Self::Time(scale)
    }
}

/// A resolved tick: position along the axis plus its label.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Offset along the axis.
    pub position: f64,
    /// Label text.
    pub label: String,
}

/// An axis with ticks, labels and an optional title and grid.
#[derive(Clone)]
pub struct Axis {
    scale: AxisScale,
    orient: AxisOrient,
    tick_count: usize,
    tick_size: f64,
    tick_padding: f64,
    font_size: f64,
    label_angle: f64,
    color: Color,
    grid: Option<f64>,
    title: Option<String>,
    transition: Transition,
    tick_formatter: Option<Arc<dyn Fn(f64, f64) -> String>>,
}

impl core::fmt::Debug for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Axis")
            .field("scale", &self.scale)
            .field("orient", &self.orient)
            .field("tick_count", &self.tick_count)
            .field("tick_size", &self.tick_size)
            .field("label_angle", &self.label_angle)
            .field("grid", &self.grid)
            .field("title", &self.title)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .finish_non_exhaustive()
    }
}

impl Axis {
    /// Creates an axis with ten ticks of size 6.
    pub fn new(scale: impl Into<AxisScale>, orient: AxisOrient) -> Self {
        Self {
            scale: scale.into(),
            orient,
            tick_count: 10,
            tick_size: 6.0,
            tick_padding: 3.0,
            font_size: 10.0,
            label_angle: 0.0,
            color: css::BLACK,
            grid: None,
            title: None,
            transition: Transition::default(),
            tick_formatter: None,
        }
    }

    /// An axis below the plot.
    pub fn bottom(scale: impl Into<AxisScale>) -> Self {
        Self::new(scale, AxisOrient::Bottom)
    }

    /// An axis above the plot.
    pub fn top(scale: impl Into<AxisScale>) -> Self {
        Self::new(scale, AxisOrient::Top)
    }

    /// An axis left of the plot.
    pub fn left(scale: impl Into<AxisScale>) -> Self {
        Self::new(scale, AxisOrient::Left)
    }

    /// An axis right of the plot.
    pub fn right(scale: impl Into<AxisScale>) -> Self {
        Self::new(scale, AxisOrient::Right)
    }

    /// Sets the approximate tick count for continuous scales.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the tick length.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Rotates tick labels by `degrees`.
    pub fn with_label_angle(mut self, degrees: f64) -> Self {
        self.label_angle = degrees;
        self
    }

    /// Draws gridlines of `length` into the plot.
    pub fn with_grid(mut self, length: f64) -> Self {
        self.grid = Some(length);
        self
    }

    /// Sets the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the transition timing.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Formats continuous tick labels with `f(value, step)`.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// The orientation.
    pub fn orient(&self) -> AxisOrient {
        self.orient
    }

    /// Ticks in axis order.
    pub fn ticks(&self) -> Vec<Tick> {
        match &self.scale {
            AxisScale::Band(scale) => {
                let half = scale.bandwidth() / 2.0;
                scale
                    .domain()
                    .filter_map(|key| {
                        scale.map(key).map(|start| Tick {
                            position: start + half,
                            label: key.to_owned(),
                        })
                    })
                    .collect()
            }
            AxisScale::Linear(scale) => {
                let step = scale.tick_step(self.tick_count);
                scale
                    .ticks(self.tick_count)
                    .into_iter()
                    .map(|v| Tick {
                        position: scale.map(v),
                        label: self.format(v, step, format_tick),
                    })
                    .collect()
            }
            AxisScale::Time(scale) => {
                let step = scale.tick_step(self.tick_count);
                scale
                    .ticks(self.tick_count)
                    .into_iter()
                    .map(|v| Tick {
                        position: scale.map(v),
                        label: self.format(v, step, format_time),
                    })
                    .collect()
            }
        }
    }

    fn format(&self, v: f64, step: f64, default: fn(f64, f64) -> String) -> String {
        match &self.tick_formatter {
            Some(f) => f(v, step),
            None => default(v, step),
        }
    }

    fn range(&self) -> (f64, f64) {
        match &self.scale {
            AxisScale::Band(s) => s.range(),
            AxisScale::Linear(s) => s.range(),
            AxisScale::Time(s) => s.range(),
        }
    }

    /// Thickness the axis needs away from the plot: ticks, labels and title.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> f64 {
        let labels: Vec<String> = self.ticks().into_iter().map(|t| t.label).collect();
        let (w, h) = (
            widest(measurer, labels.iter().map(String::as_str), self.font_size),
            self.font_size,
        );
        let theta = self.label_angle.to_radians();
        let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
        let label_extent = if self.orient.is_horizontal() {
            sin * w + cos * h
        } else {
            cos * w + sin * h
        };
        let title = if self.title.is_some() {
            self.font_size * 2.0
        } else {
            0.0
        };
        self.tick_size.max(0.0) + self.tick_padding + label_extent + title
    }

    /// Maps an offset along the axis and a distance across it to a point.
    fn at(&self, along: f64, across: f64) -> Point {
        if self.orient.is_horizontal() {
            Point::new(along, across)
        } else {
            Point::new(across, along)
        }
    }

    /// Draws the axis at the frame origin.
    pub fn render(&self, frame: &mut Frame<'_>) {
        let k = self.orient.sign();
        let (r0, r1) = self.range();
        let outer = k * self.tick_size;

        frame.push(
            Mark::builder(frame.id("domain", "path"))
                .polyline(
                    vec![
                        self.at(r0, outer),
                        self.at(r0, 0.0),
                        self.at(r1, 0.0),
                        self.at(r1, outer),
                    ],
                    Curve::Linear,
                )
                .stroke(self.color, 1.0)
                .z_index(z_order::AXIS_RULES)
                .transition(self.transition)
                .class("domain")
                .build(),
        );

        let (anchor, baseline) = match self.orient {
            AxisOrient::Bottom => (TextAnchor::Middle, TextBaseline::Hanging),
            AxisOrient::Top => (TextAnchor::Middle, TextBaseline::Alphabetic),
            AxisOrient::Left => (TextAnchor::End, TextBaseline::Middle),
            AxisOrient::Right => (TextAnchor::Start, TextBaseline::Middle),
        };
        // Rotated labels hang off their tick, away from the plot.
        let anchor = if self.label_angle == 0.0 || !self.orient.is_horizontal() {
            anchor
        } else if (self.label_angle < 0.0) == (self.orient == AxisOrient::Bottom) {
            TextAnchor::End
        } else {
            TextAnchor::Start
        };
        let label_offset = k * (self.tick_size.max(0.0) + self.tick_padding);

        for tick in self.ticks() {
            let p = tick.position;
            frame.push(
                Mark::builder(frame.id("tick", &tick.label))
                    .polyline(vec![self.at(p, 0.0), self.at(p, outer)], Curve::Linear)
                    .stroke(self.color, 1.0)
                    .z_index(z_order::AXIS_RULES)
                    .transition(self.transition)
                    .class("tick")
                    .build(),
            );
            if let Some(length) = self.grid {
                frame.push(
                    Mark::builder(frame.id("grid", &tick.label))
                        .polyline(
                            vec![self.at(p, 0.0), self.at(p, -k * length)],
                            Curve::Linear,
                        )
                        .stroke(self.color.with_alpha(0.15), 1.0)
                        .z_index(z_order::GRID_LINES)
                        .transition(self.transition)
                        .class("grid")
                        .build(),
                );
            }
            frame.push(
                Mark::builder(frame.id("label", &tick.label))
                    .text(
                        TextShape::new(self.at(p, label_offset), tick.label, self.font_size)
                            .with_anchor(anchor)
                            .with_baseline(baseline)
                            .with_angle(self.label_angle),
                    )
                    .fill(self.color)
                    .z_index(z_order::AXIS_LABELS)
                    .transition(self.transition)
                    .class("tick-label")
                    .build(),
            );
        }

        if let Some(title) = &self.title {
            let (pos, angle) = match self.orient {
                AxisOrient::Left | AxisOrient::Right => (
                    Point::new(k * (label_offset.abs() + 3.0 * self.font_size), r1.min(r0)),
                    -90.0,
                ),
                AxisOrient::Top | AxisOrient::Bottom => (
                    Point::new(r1.max(r0), k * (label_offset.abs() + 2.0 * self.font_size)),
                    0.0,
                ),
            };
            frame.push(
                Mark::builder(frame.id("title", "text"))
                    .text(
                        TextShape::new(pos, title.as_str(), self.font_size)
                            .with_anchor(TextAnchor::End)
                            .with_baseline(TextBaseline::Middle)
                            .with_angle(angle),
                    )
                    .fill(self.color)
                    .z_index(z_order::AXIS_LABELS)
                    .transition(self.transition)
                    .class("axis-title")
                    .build(),
            );
        }
    }

    /// Draws the axis in a child frame translated by `offset`.
    pub fn render_at(&self, frame: &mut Frame<'_>, key: &str, offset: Vec2) {
        self.render(&mut frame.child(key, offset));
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::Shape;
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn labels(marks: &[Mark]) -> Vec<&TextShape> {
        marks
            .iter()
            .filter_map(|m| match &m.payload.shape {
                Shape::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn band_ticks_sit_mid_band() {
        let axis = Axis::bottom(ScaleBand::new(["a", "b"], (0.0, 100.0)));
        let ticks = axis.ticks();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].position, 25.0);
        assert_eq!(ticks[1].label, "b");
    }

    #[test]
    fn bottom_labels_hang_below_ticks() {
        let axis = Axis::bottom(ScaleLinear::new((0.0, 10.0), (0.0, 100.0))).with_tick_count(2);
        let mut marks = Vec::new();
        axis.render(&mut Frame::new(&mut marks));
        let texts = labels(&marks);
        assert_eq!(
            texts.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            ["0", "5", "10"]
        );
        assert_approx_eq!(f64, texts[1].pos.x, 50.0, epsilon = 1e-9);
        assert_approx_eq!(f64, texts[1].pos.y, 9.0, epsilon = 1e-9);
        assert_eq!(texts[1].baseline, TextBaseline::Hanging);
    }

    #[test]
    fn left_axis_points_left_and_grid_points_right() {
        let axis = Axis::left(ScaleLinear::new((0.0, 1.0), (100.0, 0.0)))
            .with_tick_count(1)
            .with_grid(80.0);
        let mut marks = Vec::new();
        axis.render(&mut Frame::new(&mut marks));
        let grid = marks.iter().find(|m| m.class == "grid");
        let Some(Shape::Polyline { points, .. }) = grid.map(|m| &m.payload.shape) else {
            panic!("grid lines are polylines");
        };
        assert_eq!(points[1].x, 80.0);
        let texts = labels(&marks);
        assert!(texts.iter().all(|t| t.pos.x < 0.0 && t.anchor == TextAnchor::End));
    }

    #[test]
    fn custom_formatter_and_measure() {
        let axis = Axis::bottom(ScaleLinear::new((0.0, 1.0), (0.0, 10.0)))
            .with_tick_count(1)
            .with_tick_formatter(|v, _| format!("{v}%"));
        assert_eq!(axis.ticks()[0].label, "0%");
        // Unrotated bottom labels only add their line height.
        assert_approx_eq!(
            f64,
            axis.measure(&HeuristicTextMeasurer),
            6.0 + 3.0 + 10.0,
            epsilon = 1e-9
        );
    }
}
