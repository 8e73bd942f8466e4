// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concentric circular bars (a "progress" or radial bar chart).

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
use crate::stats::DerivedStatistics;
use crate::z_order;

/// One ring per category; each ring sweeps clockwise in proportion to its value.
///
/// Drawn around the local origin. The value scale maps into degrees.
#[derive(Clone, Debug)]
pub struct BarsCircular {
    config: ComponentConfig,
    radius: Option<f64>,
    inner_radius: Option<f64>,
    start_angle: f64,
    end_angle: f64,
    x_scale: ScaleSlot<ScaleBand>,
    y_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for BarsCircular {
    fn default() -> Self {
        Self::new()
    }
}

impl BarsCircular {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(300.0, 300.0, default_colors()),
            radius: None,
            inner_radius: None,
            start_angle: 0.0,
            end_angle: 270.0,
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

    /// Sets the inner radius; defaults to a quarter of the outer radius.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = Some(inner_radius);
        self
    }

    /// Sets the angle, in degrees, the largest value sweeps to.
    pub fn with_angles(mut self, start_angle: f64, end_angle: f64) -> Self {
        self.start_angle = start_angle;
        self.end_angle = end_angle;
        self
    }

    /// Supplies the ring scale over categories (range in radius units).
    pub fn with_x_scale(mut self, scale: ScaleBand) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the sweep scale (range in degrees).
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

    /// The inner radius for the current size.
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius.unwrap_or_else(|| self.radius() / 4.0)
    }

    /// The ring scale, once resolved.
    pub fn x_scale(&self) -> Option<&ScaleBand> {
        self.x_scale.get()
    }

    /// The sweep scale, once resolved.
    pub fn y_scale(&self) -> Option<&ScaleLinear> {
        self.y_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }
}

impl Configurable for BarsCircular {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for BarsCircular {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        let (inner, outer) = (self.inner_radius(), self.radius());
        let angles = (self.start_angle, self.end_angle);
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(stats.category_names.iter(), self.config.colors().to_vec())
        })?;
        self.x_scale.resolve_with(|| {
            ScaleBand::new(stats.category_names.iter(), (inner, outer))
                .with_padding(0.15)
                .with_round(true)
        });
        self.y_scale
            .resolve_with(|| ScaleLinear::new((0.0, stats.max_or_zero()), angles));
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (Some(x), Some(y)) = (self.x_scale.get(), self.y_scale.get()) else {
            return;
        };
        let start = radians(self.start_angle);
        for datum in &series.values {
            let r0 = x.map(&datum.key).unwrap_or(f64::NAN);
            let r1 = r0 + x.bandwidth();
            let end = radians(y.map(datum.value()));
            frame.push(
                Mark::builder(frame.id("bar", &datum.key))
                    .arc(ArcShape::new(Point::ZERO, r0, r1, start, end))
                    .enter(Shape::Arc(ArcShape::new(Point::ZERO, r0, r1, start, start)))
                    .fill(color_of(
                        self.color_scale.get(),
                        &datum.key,
                        datum.value(),
                    ))
                    .z_index(z_order::SERIES_FILL)
                    .transition(self.transition())
                    .event(self.config.event(series, datum))
                    .class("bar")
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
    fn largest_value_sweeps_to_the_end_angle() {
        let input = SeriesInput::Single(Series::from_pairs("G", [("a", 2.0), ("b", 4.0)]));
        let mut bars = BarsCircular::new().with_size(200.0, 200.0);
        let mut marks = Vec::new();
        let Ok(()) = bars.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        assert_eq!(bars.radius(), 100.0);
        assert_eq!(bars.inner_radius(), 25.0);
        let Shape::Arc(b) = &marks[1].payload.shape else {
            panic!("bars are arcs");
        };
        assert_approx_eq!(f64, b.end_angle, 270_f64.to_radians(), epsilon = 1e-12);
        let Shape::Arc(a) = &marks[0].payload.shape else {
            panic!("bars are arcs");
        };
        assert_approx_eq!(f64, a.end_angle, 135_f64.to_radians(), epsilon = 1e-12);
        assert!(a.outer_radius <= b.inner_radius);
    }
}
