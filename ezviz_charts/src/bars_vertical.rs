// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical bars, one per category.

use ezviz_core::{Mark, Shape};
use kurbo::Rect;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, default_colors, resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::scale::{ColorKeying, ColorScale, ScaleBand, ScaleLinear, ScaleSlot};
use crate::stats::DerivedStatistics;
use crate::z_order;

/// Vertical bars keyed by category, growing up from the bottom edge.
///
/// Inferred scales: a rounded band scale over the categories with 15% padding, a linear scale
/// from zero to the largest value, and an ordinal colour scale over the categories.
#[derive(Clone, Debug)]
pub struct BarsVertical {
    config: ComponentConfig,
    x_scale: ScaleSlot<ScaleBand>,
    y_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for BarsVertical {
    fn default() -> Self {
        Self::new()
    }
}

impl BarsVertical {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 400.0, default_colors()),
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
    }

    /// Supplies the category band scale.
    pub fn with_x_scale(mut self, scale: ScaleBand) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the value scale. Its range should run from 0 to the drawing height.
    pub fn with_y_scale(mut self, scale: ScaleLinear) -> Self {
        self.y_scale.supply(scale);
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }

    /// The category scale, once resolved.
    pub fn x_scale(&self) -> Option<&ScaleBand> {
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

    /// Drops inferred scales so the next render infers them again.
    pub fn clear_inferred(&mut self) {
        self.x_scale.clear_inferred();
        self.y_scale.clear_inferred();
        self.color_scale.clear_inferred();
    }
}

impl Configurable for BarsVertical {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for BarsVertical {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        let size = self.size();
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(stats.category_names.iter(), self.config.colors().to_vec())
        })?;
        self.x_scale.resolve_with(|| {
            ScaleBand::new(stats.category_names.iter(), (0.0, size.width))
                .with_padding(0.15)
                .with_round(true)
        });
        self.y_scale.resolve_with(|| {
            ScaleLinear::new((0.0, stats.max_or_zero()), (0.0, size.height)).nice()
        });
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (Some(x), Some(y)) = (self.x_scale.get(), self.y_scale.get()) else {
            return;
        };
        let height = self.size().height;
        let bandwidth = x.bandwidth();
        for datum in &series.values {
            let x0 = x.map(&datum.key).unwrap_or(f64::NAN);
            let bar = y.map(datum.value());
            let target = Rect::new(x0, height - bar, x0 + bandwidth, height).abs();
            let enter = Rect::new(x0, height, x0 + bandwidth, height);
            frame.push(
                Mark::builder(frame.id("bar", &datum.key))
                    .rect(target)
                    .enter(Shape::Rect(enter))
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
