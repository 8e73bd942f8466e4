// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Donut slices with outside labels and connector lines.

use core::f64::consts::{PI, TAU};

use ezviz_core::{ArcShape, Curve, Mark, Shape, TextAnchor, TextBaseline, TextShape};
use kurbo::Point;
use peniko::color::palette::css;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, default_colors, radius_for,
    resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::scale::{ColorKeying, ColorScale, ScaleSlot};
use crate::shape::pie;
use crate::stats::DerivedStatistics;
use crate::z_order;

const PAD_ANGLE: f64 = 0.015;
const LABEL_FONT_SIZE: f64 = 11.0;

/// A donut of one series' values, in input order, drawn around the local origin.
///
/// Each slice gets a label outside the ring, on the side its midpoint faces, joined to the slice
/// by a three-point connector.
#[derive(Clone, Debug)]
pub struct Donut {
    config: ComponentConfig,
    radius: Option<f64>,
    inner_radius: Option<f64>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for Donut {
    fn default() -> Self {
        Self::new()
    }
}

impl Donut {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(300.0, 300.0, default_colors()),
            radius: None,
            inner_radius: None,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the outer radius; defaults to half the shorter side.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the inner radius; defaults to a quarter of the outer radius.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = Some(inner_radius);
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }

    /// The outer radius for the current size.
    pub fn radius(&self) -> f64 {
        radius_for(self.radius, self.size())
    }

    /// The inner radius for the current size.
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius.unwrap_or_else(|| self.radius() / 4.0)
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }
}

impl Configurable for Donut {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for Donut {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(stats.category_names.iter(), self.config.colors().to_vec())
        })
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (radius, inner) = (self.radius(), self.inner_radius());
        let values: Vec<f64> = series.values.iter().map(|d| d.value()).collect();
        for (datum, slice) in series.values.iter().zip(pie(&values, 0.0, TAU, PAD_ANGLE)) {
            let arc = ArcShape::new(Point::ZERO, inner, radius, slice.start_angle, slice.end_angle)
                .with_pad_angle(slice.pad_angle);
            let mid = slice.mid_angle();
            let side = if mid < PI { 1.0 } else { -1.0 };
            let elbow = arc.point_at(radius * 0.9, mid);
            let label_at = Point::new(radius * 1.2 * side, elbow.y);
            let line_end = Point::new(radius * 0.95 * 1.2 * side, elbow.y);
            let anchor = if side > 0.0 {
                TextAnchor::Start
            } else {
                TextAnchor::End
            };

            let mut collapsed = arc;
            collapsed.end_angle = collapsed.start_angle;
            frame.push(
                Mark::builder(frame.id("slice", &datum.key))
                    .arc(arc)
                    .enter(Shape::Arc(collapsed))
                    .fill(color_of(
                        self.color_scale.get(),
                        &datum.key,
                        datum.value(),
                    ))
                    .z_index(z_order::SERIES_FILL)
                    .transition(self.transition())
                    .event(self.config.event(series, datum))
                    .class("slice")
                    .build(),
            );
            frame.push(
                Mark::builder(frame.id("label", &datum.key))
                    .text(
                        TextShape::new(label_at, datum.key.as_str(), LABEL_FONT_SIZE)
                            .with_anchor(anchor)
                            .with_baseline(TextBaseline::Middle),
                    )
                    .fill(css::BLACK)
                    .z_index(z_order::SERIES_LABELS)
                    .transition(self.transition())
                    .class("label")
                    .build(),
            );
            frame.push(
                Mark::builder(frame.id("line", &datum.key))
                    .polyline(vec![arc.centroid(), elbow, line_end], Curve::Linear)
                    .stroke(css::GRAY, 1.0)
                    .opacity(0.5)
                    .z_index(z_order::SERIES_STROKE)
                    .transition(self.transition())
                    .class("line")
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
    fn slices_labels_and_lines_per_datum() {
        let input = SeriesInput::Single(Series::from_pairs("G", [("a", 1.0), ("b", 3.0)]));
        let mut donut = Donut::new().with_size(200.0, 100.0);
        let mut marks = Vec::new();
        let Ok(()) = donut.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        assert_eq!(donut.radius(), 50.0);
        assert_eq!(donut.inner_radius(), 12.5);
        assert_eq!(marks.len(), 6);

        // "a" covers the first quarter turn, so its label sits on the right.
        let Shape::Text(label) = &marks[1].payload.shape else {
            panic!("second mark is the label");
        };
        assert_eq!(label.anchor, TextAnchor::Start);
        assert_approx_eq!(f64, label.pos.x, 60.0, epsilon = 1e-9);
        // "b" is centred in the left half.
        let Shape::Text(label) = &marks[4].payload.shape else {
            panic!("fifth mark is the label");
        };
        assert_eq!(label.anchor, TextAnchor::End);
        assert_approx_eq!(f64, label.pos.x, -60.0, epsilon = 1e-9);
    }

    #[test]
    fn slices_enter_with_zero_sweep() {
        let input = SeriesInput::Single(Series::from_pairs("G", [("a", 1.0)]));
        let mut marks = Vec::new();
        let Ok(()) = Donut::new().render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        let Some(Shape::Arc(enter)) = marks[0].enter.as_ref().map(|e| e.shape.clone()) else {
            panic!("slices enter as arcs");
        };
        assert_eq!(enter.start_angle, enter.end_angle);
    }
}
