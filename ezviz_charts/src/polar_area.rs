// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polar area segments: equal angles, radius by value.

use ezviz_core::{ArcShape, Mark, Shape};
use kurbo::Point;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, default_colors, radians,
    radius_for, resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::scale::{ColorKeying, ColorScale, ScaleBand, ScaleLinear, ScaleSlot};
use crate::shape::pie;
use crate::stats::DerivedStatistics;
use crate::z_order;

/// One equal-angle segment per datum, around the local origin.
///
/// The angular scale only contributes its range; segments split it evenly in input order.
#[derive(Clone, Debug)]
pub struct PolarArea {
    config: ComponentConfig,
    radius: Option<f64>,
    start_angle: f64,
    end_angle: f64,
    x_scale: ScaleSlot<ScaleBand>,
    y_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for PolarArea {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarArea {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(300.0, 300.0, default_colors()),
            radius: None,
            start_angle: 0.0,
            end_angle: 360.0,
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the outer radius; defaults to half the shorter side.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the angular extent in degrees.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Supplies the angular scale, in degrees.
    pub fn with_x_scale(mut self, scale: ScaleBand) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the radial value scale.
    pub fn with_y_scale(mut self, scale: ScaleLinear) -> Self {
        self.y_scale.supply(scale);
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

    /// The angular scale, once resolved.
    pub fn x_scale(&self) -> Option<&ScaleBand> {
        self.x_scale.get()
    }

    /// The radial scale, once resolved.
    pub fn y_scale(&self) -> Option<&ScaleLinear> {
        self.y_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }
}

impl Configurable for PolarArea {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for PolarArea {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(stats.category_names.iter(), self.config.colors().to_vec())
        })?;
        let angles = (self.start_angle, self.end_angle);
        self.x_scale.resolve_with(|| {
            ScaleBand::new(stats.category_names.iter(), angles)
                .with_padding(0.15)
                .with_round(true)
        });
        let radius = self.radius();
        let max = stats.max_or_zero();
        self.y_scale
            .resolve_with(|| ScaleLinear::new((0.0, max), (0.0, radius)).nice());
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (Some(x), Some(y)) = (self.x_scale.get(), self.y_scale.get()) else {
            return;
        };
        let (a, b) = x.range();
        let equal = vec![1.0; series.values.len()];
        let slices = pie(&equal, radians(a.min(b)), radians(a.max(b)), 0.0);
        for (datum, slice) in series.values.iter().zip(slices) {
            let arc = ArcShape::new(
                Point::ZERO,
                0.0,
                y.map(datum.value()),
                slice.start_angle,
                slice.end_angle,
            );
            let mut collapsed = arc;
            collapsed.outer_radius = 0.0;
            frame.push(
                Mark::builder(frame.id("segment", &datum.key))
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
                    .class("segment")
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::TAU;

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn segments_split_the_circle_evenly() {
        let input = SeriesInput::Single(Series::from_pairs(
            "Wind",
            [("N", 10.0), ("E", 5.0), ("S", 2.5), ("W", 7.5)],
        ));
        let mut polar = PolarArea::new().with_size(100.0, 100.0);
        let mut marks = Vec::new();
        let Ok(()) = polar.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        assert_eq!(marks.len(), 4);
        let Shape::Arc(east) = &marks[1].payload.shape else {
            panic!("segments are arcs");
        };
        let (a, b) = polar.x_scale().map_or((0.0, 0.0), ScaleBand::range);
        assert_eq!((a, b), (0.0, 360.0));
        assert_approx_eq!(f64, east.start_angle, TAU / 4.0, epsilon = 1e-9);
        assert_approx_eq!(f64, east.outer_radius, 25.0, epsilon = 1e-9);
        assert_eq!(east.inner_radius, 0.0);
    }
}
