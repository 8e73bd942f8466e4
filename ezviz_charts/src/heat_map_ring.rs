// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concentric rings of heat map segments.

use ezviz_core::{ArcShape, Mark};
use kurbo::Point;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, heat_colors, radians, radius_for,
    resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::scale::{ColorKeying, ColorScale, ScaleBand, ScaleSlot};
use crate::shape::pie;
use crate::stats::DerivedStatistics;
use crate::z_order;

const PAD_ANGLE: f64 = 0.015;

/// One ring per series, split into equal segments per category and coloured by value bucket.
///
/// Rings are drawn around the local origin. The row scale places each series' ring between
/// `y(key)` and `y(key) + bandwidth`; a series missing from it spans the whole annulus.
#[derive(Clone, Debug)]
pub struct HeatMapRing {
    config: ComponentConfig,
    radius: Option<f64>,
    inner_radius: f64,
    start_angle: f64,
    end_angle: f64,
    thresholds: Option<Vec<f64>>,
    x_scale: ScaleSlot<ScaleBand>,
    y_scale: ScaleSlot<ScaleBand>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for HeatMapRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatMapRing {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(300.0, 300.0, heat_colors()),
            radius: None,
            inner_radius: 20.0,
            start_angle: 0.0,
            end_angle: 360.0,
            thresholds: None,
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

    /// Sets the inner radius.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = inner_radius;
        self
    }

    /// Sets the angular extent in degrees, clockwise from 12 o'clock.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Sets the bucket break points; defaults to the data's derived thresholds.
    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Supplies the angular scale over categories, in degrees.
    pub fn with_x_scale(mut self, scale: ScaleBand) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the radial scale over series keys.
    pub fn with_y_scale(mut self, scale: ScaleBand) -> Self {
        self.y_scale.supply(scale);
        self
    }

    /// Supplies the colour scale; it must be a threshold or linear scale.
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
    pub fn y_scale(&self) -> Option<&ScaleBand> {
        self.y_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }

    fn ring_for(&self, key: &str) -> (f64, f64) {
        self.y_scale
            .get()
            .and_then(|y| y.map(key).map(|r| (r, r + y.bandwidth())))
            .unwrap_or((self.inner_radius, self.radius()))
    }
}

impl Configurable for HeatMapRing {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for HeatMapRing {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        let radius = self.radius();
        let thresholds = self
            .thresholds
            .clone()
            .unwrap_or_else(|| stats.thresholds.clone());
        resolve_color(&mut self.color_scale, ColorKeying::Value, || {
            ColorScale::threshold(thresholds, self.config.colors().to_vec())
        })?;
        let angles = (self.start_angle, self.end_angle);
        self.x_scale.resolve_with(|| {
            ScaleBand::new(stats.category_names.iter(), angles)
                .with_padding(0.1)
                .with_round(true)
        });
        let inner = self.inner_radius;
        self.y_scale.resolve_with(|| {
            ScaleBand::new(stats.group_names.iter(), (radius, inner))
                .with_padding(0.1)
                .with_round(true)
        });
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (start, end) = self.x_scale.get().map_or(
            (self.start_angle, self.end_angle),
            |x| {
                let (a, b) = x.range();
                (a.min(b), a.max(b))
            },
        );
        let (inner, outer) = self.ring_for(&series.key);
        let equal = vec![1.0; series.values.len()];
        let slices = pie(&equal, radians(start), radians(end), PAD_ANGLE);
        for (datum, slice) in series.values.iter().zip(slices) {
            let arc = ArcShape::new(Point::ZERO, inner, outer, slice.start_angle, slice.end_angle)
                .with_pad_angle(slice.pad_angle);
            frame.push(
                Mark::builder(frame.id("segment", &datum.key))
                    .arc(arc)
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
