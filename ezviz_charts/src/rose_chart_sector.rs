// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One sector of a rose (Nightingale) chart.

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

/// A wedge per series whose arcs grow outward with value.
///
/// With an angular scale over series keys each series gets its own band of the circle;
/// otherwise every series uses the configured start and end angles. When stacked, each arc
/// starts where the previous one in the series ended.
#[derive(Clone, Debug)]
pub struct RoseChartSector {
    config: ComponentConfig,
    radius: Option<f64>,
    start_angle: f64,
    end_angle: f64,
    stacked: bool,
    x_scale: Option<ScaleBand>,
    y_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for RoseChartSector {
    fn default() -> Self {
        Self::new()
    }
}

impl RoseChartSector {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(300.0, 300.0, default_colors()),
            radius: None,
            start_angle: 0.0,
            end_angle: 45.0,
            stacked: false,
            x_scale: None,
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the outer radius; defaults to half the shorter side.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the sector's angles in degrees, used when no angular scale is supplied.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Stacks arcs within a series instead of overlaying them.
    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    /// Supplies the angular scale over series keys, in degrees.
    pub fn with_x_scale(mut self, scale: ScaleBand) -> Self {
        self.x_scale = Some(scale);
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

    /// The radial scale, once resolved.
    pub fn y_scale(&self) -> Option<&ScaleLinear> {
        self.y_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }

    /// Sector angles in degrees for `key`.
    fn angles_for(&self, key: &str) -> (f64, f64) {
        match &self.x_scale {
            Some(x) => {
                let start = x.map(key).unwrap_or(f64::NAN);
                (start, start + x.bandwidth())
            }
            None => (self.start_angle, self.end_angle),
        }
    }
}

impl Configurable for RoseChartSector {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for RoseChartSector {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(stats.category_names.iter(), self.config.colors().to_vec())
        })?;
        let max = if self.stacked {
            stats.group_totals_max.unwrap_or(0.0)
        } else {
            stats.max_or_zero()
        };
        let radius = self.radius();
        self.y_scale
            .resolve_with(|| ScaleLinear::new((0.0, max), (0.0, radius)));
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let Some(y) = self.y_scale.get() else {
            return;
        };
        let (start, end) = self.angles_for(&series.key);
        let mut base = 0.0;
        for datum in &series.values {
            let value = datum.value();
            let arc = ArcShape::new(
                Point::ZERO,
                y.map(base),
                y.map(base + value),
                radians(start),
                radians(end),
            );
            if self.stacked {
                base += value;
            }
            let mut collapsed = arc;
            collapsed.outer_radius = collapsed.inner_radius;
            frame.push(
                Mark::builder(frame.id("arc", &datum.key))
                    .arc(arc)
                    .enter(Shape::Arc(collapsed))
                    .fill(color_of(
                        self.color_scale.get(),
                        &datum.key,
                        value,
                    ))
                    .z_index(z_order::SERIES_FILL)
                    .transition(self.transition())
                    .event(self.config.event(series, datum))
                    .class("arc")
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn arcs(marks: &[Mark]) -> Vec<ArcShape> {
        marks
            .iter()
            .map(|m| match &m.payload.shape {
                Shape::Arc(a) => *a,
                other => panic!("expected arcs, got {other:?}"),
            })
            .collect()
    }

    fn input() -> SeriesInput {
        SeriesInput::Multi(vec![
            Series::from_pairs("N", [("a", 2.0), ("b", 3.0)]),
            Series::from_pairs("E", [("a", 5.0), ("b", 1.0)]),
        ])
    }

    #[test]
    fn overlaid_arcs_all_start_at_the_centre() {
        let mut sector = RoseChartSector::new().with_size(100.0, 100.0);
        let mut marks = Vec::new();
        let Ok(()) = sector.render(&mut Frame::new(&mut marks), &input()) else {
            panic!("render should succeed");
        };
        let arcs = arcs(&marks);
        // Max value 5 maps to the 50px radius.
        assert_approx_eq!(f64, arcs[0].outer_radius, 20.0, epsilon = 1e-9);
        assert!(arcs.iter().all(|a| a.inner_radius == 0.0));
        assert_approx_eq!(f64, arcs[0].end_angle, 45_f64.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn stacked_arcs_continue_outward_within_a_band() {
        let x = ScaleBand::new(["N", "E"], (0.0, 360.0));
        let mut sector = RoseChartSector::new()
            .with_size(100.0, 100.0)
            .with_stacked(true)
            .with_x_scale(x);
        let mut marks = Vec::new();
        let Ok(()) = sector.render(&mut Frame::new(&mut marks), &input()) else {
            panic!("render should succeed");
        };
        let arcs = arcs(&marks);
        // Group totals max is 6.
        assert_approx_eq!(f64, arcs[1].inner_radius, 2.0 / 6.0 * 50.0, epsilon = 1e-9);
        assert_approx_eq!(f64, arcs[1].outer_radius, 50.0 * 5.0 / 6.0, epsilon = 1e-9);
        // "E" owns the second half of the circle.
        assert_approx_eq!(f64, arcs[2].start_angle, 180_f64.to_radians(), epsilon = 1e-9);
        assert_approx_eq!(f64, arcs[2].end_angle, 360_f64.to_radians(), epsilon = 1e-9);
    }
}
