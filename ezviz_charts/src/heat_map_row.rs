// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One row of heat map cells.

use ezviz_core::Mark;
use kurbo::Rect;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, heat_colors, resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::scale::{ColorKeying, ColorScale, ScaleBand, ScaleSlot};
use crate::stats::DerivedStatistics;
use crate::z_order;

/// A row of cells per series, one per category, coloured by value bucket.
///
/// Each series draws at the top of its local frame; hosts offset rows with the row scale.
#[derive(Clone, Debug)]
pub struct HeatMapRow {
    config: ComponentConfig,
    thresholds: Option<Vec<f64>>,
    x_scale: ScaleSlot<ScaleBand>,
    y_scale: ScaleSlot<ScaleBand>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for HeatMapRow {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatMapRow {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 100.0, heat_colors()),
            thresholds: None,
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the bucket break points; defaults to the data's derived thresholds.
    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Supplies the column scale over categories.
    pub fn with_x_scale(mut self, scale: ScaleBand) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the row scale over series keys.
    pub fn with_y_scale(mut self, scale: ScaleBand) -> Self {
        self.y_scale.supply(scale);
        self
    }

    /// Supplies the colour scale; it must be a threshold or linear scale.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }

    /// The column scale, once resolved.
    pub fn x_scale(&self) -> Option<&ScaleBand> {
        self.x_scale.get()
    }

    /// The row scale, once resolved.
    pub fn y_scale(&self) -> Option<&ScaleBand> {
        self.y_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }
}

impl Configurable for HeatMapRow {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for HeatMapRow {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        let size = self.size();
        let thresholds = self
            .thresholds
            .clone()
            .unwrap_or_else(|| stats.thresholds.clone());
        resolve_color(&mut self.color_scale, ColorKeying::Value, || {
            ColorScale::threshold(thresholds, self.config.colors().to_vec())
        })?;
        self.x_scale.resolve_with(|| {
            ScaleBand::new(stats.category_names.iter(), (0.0, size.width)).with_padding(0.1)
        });
        self.y_scale.resolve_with(|| {
            ScaleBand::new(stats.group_names.iter(), (0.0, size.height)).with_padding(0.1)
        });
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (Some(x), Some(y)) = (self.x_scale.get(), self.y_scale.get()) else {
            return;
        };
        let (cell_w, cell_h) = (x.bandwidth(), y.bandwidth());
        for datum in &series.values {
            let x0 = x.map(&datum.key).unwrap_or(f64::NAN);
            frame.push(
                Mark::builder(frame.id("cell", &datum.key))
                    .rect(Rect::new(x0, 0.0, x0 + cell_w, cell_h))
                    .fill(color_of(
                        self.color_scale.get(),
                        &datum.key,
                        datum.value(),
                    ))
                    .z_index(z_order::SERIES_FILL)
                    .transition(self.transition())
                    .event(self.config.event(series, datum))
                    .class("cell")
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleKind;

    fn input() -> SeriesInput {
        SeriesInput::Multi(vec![
            Series::from_pairs("Mon", [("9am", 0.0), ("10am", 100.0)]),
            Series::from_pairs("Tue", [("9am", 50.0), ("10am", 60.0)]),
        ])
    }

    #[test]
    fn cells_are_bucketed_by_derived_thresholds() {
        let mut row = HeatMapRow::new().with_size(200.0, 100.0);
        let mut marks = Vec::new();
        let Ok(()) = row.render(&mut Frame::new(&mut marks), &input()) else {
            panic!("render should succeed");
        };
        let Some(ColorScale::Threshold(scale)) = row.color_scale() else {
            panic!("heat maps infer threshold colours");
        };
        assert_eq!(scale.domain(), [15.0, 40.0, 55.0, 90.0]);
        let colors = heat_colors();
        assert_eq!(marks[0].payload.paint.fill, Some(colors[0]));
        // 100 falls past the last break point, beyond the four-colour range.
        assert_eq!(marks[1].payload.paint.fill, Some(crate::component::MISSING_COLOR));
        assert_eq!(marks[2].payload.paint.fill, Some(colors[2]));
    }

    #[test]
    fn ordinal_colour_scale_is_rejected() {
        let Ok(scale) = ColorScale::ordinal(["a"], heat_colors()) else {
            panic!("valid scale");
        };
        let mut row = HeatMapRow::new().with_color_scale(scale);
        let mut marks = Vec::new();
        assert_eq!(
            row.render(&mut Frame::new(&mut marks), &input()),
            Err(ChartError::ScaleMismatch {
                expected: ScaleKind::Threshold,
                found: ScaleKind::Ordinal
            })
        );
    }
}
