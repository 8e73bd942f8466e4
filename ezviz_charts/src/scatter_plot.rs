// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dots over dated category keys.

use ezviz_core::{Mark, Shape};
use kurbo::Point;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, default_colors, resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::line_chart::{key_time, time_domain};
use crate::scale::{ColorKeying, ColorScale, ScaleLinear, ScaleSlot, ScaleTime};
use crate::stats::DerivedStatistics;
use crate::z_order;

const DOT_RADIUS: f64 = 3.0;

/// A dot per value, placed by the time of its key and coloured by series.
///
/// Dots rise from the bottom edge. Paired with [`LineChart`](crate::LineChart) over the same
/// scales it marks the data points of each line.
#[derive(Clone, Debug)]
pub struct ScatterPlot {
    config: ComponentConfig,
    radius: f64,
    x_scale: ScaleSlot<ScaleTime>,
    y_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for ScatterPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterPlot {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 400.0, default_colors()),
            radius: DOT_RADIUS,
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the dot radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Supplies the time scale.
    pub fn with_x_scale(mut self, scale: ScaleTime) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the value scale.
    pub fn with_y_scale(mut self, scale: ScaleLinear) -> Self {
        self.y_scale.supply(scale);
        self
    }

    /// Supplies the colour scale; it must be ordinal over series keys.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }

    /// The dot radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The time scale, once resolved.
    pub fn x_scale(&self) -> Option<&ScaleTime> {
        self.x_scale.get()
    }

    /// The value scale, once resolved.
    pub fn y_scale(&self) -> Option<&ScaleLinear> {
        self.y_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }
}

impl Configurable for ScatterPlot {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for ScatterPlot {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(stats.group_names.iter(), self.config.colors().to_vec())
        })?;
        let size = self.size();
        let dates = time_domain(data);
        self.x_scale
            .resolve_with(|| ScaleTime::new(dates, (0.0, size.width)));
        let max = stats.max_or_zero() * 1.05;
        self.y_scale
            .resolve_with(|| ScaleLinear::new((0.0, max), (size.height, 0.0)));
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (Some(x), Some(y)) = (self.x_scale.get(), self.y_scale.get()) else {
            return;
        };
        let color = color_of(self.color_scale.get(), &series.key, f64::NAN);
        let baseline = y.range().0;
        for datum in &series.values {
            let cx = x.map(key_time(&datum.key));
            frame.push(
                Mark::builder(frame.id("dot", &datum.key))
                    .circle(Point::new(cx, y.map(datum.value())), self.radius)
                    .enter(Shape::Circle {
                        center: Point::new(cx, baseline),
                        radius: self.radius,
                    })
                    .fill(color)
                    .z_index(z_order::SERIES_POINTS)
                    .transition(self.transition())
                    .event(self.config.event(series, datum))
                    .class("dot")
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn week(order: [(&'static str, f64); 2]) -> SeriesInput {
        SeriesInput::Multi(vec![Series::from_pairs("A", order)])
    }

    #[test]
    fn dots_rise_from_the_baseline() {
        let mut dots = ScatterPlot::new().with_size(100.0, 105.0);
        let mut marks = Vec::new();
        let Ok(()) = dots.render(
            &mut Frame::new(&mut marks),
            &week([("0", 10.0), ("100", 20.0)]),
        ) else {
            panic!("render should succeed");
        };
        assert_eq!(marks.len(), 2);
        let Shape::Circle { center, radius } = &marks[1].payload.shape else {
            panic!("dots are circles");
        };
        assert_approx_eq!(f64, center.x, 100.0, epsilon = 1e-9);
        // 0..21 onto 105..0 puts 20 at 5.
        assert_approx_eq!(f64, center.y, 5.0, epsilon = 1e-9);
        assert_eq!(*radius, DOT_RADIUS);
        assert_eq!(
            marks[1].enter_state().shape,
            Shape::Circle {
                center: Point::new(center.x, 105.0),
                radius: DOT_RADIUS
            }
        );
        assert!(marks.iter().all(|m| m.event.is_some()));
    }

    #[test]
    fn dots_are_keyed_by_category() {
        let ids = |input: &SeriesInput| {
            let mut marks = Vec::new();
            let Ok(()) = ScatterPlot::new().render(&mut Frame::new(&mut marks), input) else {
                panic!("render should succeed");
            };
            marks.iter().map(|m| m.id).collect::<Vec<_>>()
        };
        let forward = ids(&week([("0", 1.0), ("50", 2.0)]));
        let backward = ids(&week([("50", 2.0), ("0", 1.0)]));
        assert_eq!(forward[0], backward[1]);
        assert_eq!(forward[1], backward[0]);
    }
}
