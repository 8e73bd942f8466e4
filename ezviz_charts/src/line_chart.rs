// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time series lines.

use ezviz_core::{Curve, Ease, Mark, Shape, Transition};
use kurbo::Point;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, default_colors, extent,
    resolve_color,
};
use crate::data::{Series, SeriesInput, parse_date};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::scale::{ColorKeying, ColorScale, ScaleLinear, ScaleSlot, ScaleTime};
use crate::stats::DerivedStatistics;
use crate::z_order;

const LINE_WIDTH: f64 = 1.5;

/// Time of a category key in unix seconds: a number of seconds, or a `YYYY-MM-DD` date.
///
/// Keys that are neither map to `NaN`.
pub fn key_time(key: &str) -> f64 {
    key.trim()
        .parse::<f64>()
        .ok()
        .or_else(|| parse_date(key))
        .unwrap_or(f64::NAN)
}

/// Extent of the first series' key times; every series is drawn against it.
pub(crate) fn time_domain(data: &SeriesInput) -> (f64, f64) {
    extent(
        data.series()
            .first()
            .into_iter()
            .flat_map(|s| s.values.iter().map(|d| key_time(&d.key))),
    )
}

/// A cardinal line per series, coloured by series key.
///
/// Lines enter flattened along the bottom edge and rise into place. Data points are marked by
/// a [`ScatterPlot`](crate::ScatterPlot) sharing the same scales.
#[derive(Clone, Debug)]
pub struct LineChart {
    config: ComponentConfig,
    x_scale: ScaleSlot<ScaleTime>,
    y_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new()
    }
}

impl LineChart {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 400.0, default_colors()),
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
        .with_transition(Transition::new(1.5, Ease::CubicInOut))
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

impl Configurable for LineChart {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for LineChart {
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
        let points: Vec<Point> = series
            .values
            .iter()
            .map(|d| Point::new(x.map(key_time(&d.key)), y.map(d.value())))
            .collect();
        let baseline = y.range().0;
        let flat = points.iter().map(|p| Point::new(p.x, baseline)).collect();

        frame.push(
            Mark::builder(frame.id("line", &series.key))
                .polyline(points, Curve::Cardinal)
                .enter(Shape::Polyline {
                    points: flat,
                    curve: Curve::Cardinal,
                    closed: false,
                })
                .stroke(color, LINE_WIDTH)
                .z_index(z_order::SERIES_STROKE)
                .transition(self.transition())
                .class("line")
                .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn keys_parse_as_seconds_or_dates() {
        assert_eq!(key_time("86400"), 86_400.0);
        assert_eq!(key_time("1970-01-03"), 2.0 * 86_400.0);
        assert!(key_time("Monday").is_nan());
    }

    #[test]
    fn lines_span_the_first_series_dates() {
        let input = SeriesInput::Multi(vec![
            Series::from_pairs("A", [("0", 10.0), ("100", 20.0)]),
            Series::from_pairs("B", [("0", 5.0), ("50", 15.0), ("100", 0.0)]),
        ]);
        let mut line = LineChart::new().with_size(200.0, 105.0);
        let mut marks = Vec::new();
        let Ok(()) = line.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        assert_eq!(marks.len(), 2);
        let Shape::Polyline { points, curve, .. } = &marks[1].payload.shape else {
            panic!("series B starts with its line");
        };
        assert_eq!(*curve, Curve::Cardinal);
        assert_approx_eq!(f64, points[1].x, 100.0, epsilon = 1e-9);
        // y spans 0..21 onto 105..0, so 15 sits at 30.
        assert_approx_eq!(f64, points[1].y, 30.0, epsilon = 1e-9);
        assert_eq!(marks[1].payload.paint.fill, None);
        assert!(marks.iter().all(|m| m.event.is_none()));
        assert_eq!(line.transition().duration, 1.5);
    }
}
