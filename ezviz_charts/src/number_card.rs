// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A row of values written out in their cells.

use ezviz_core::{Mark, TextAnchor, TextBaseline, TextShape};
use kurbo::Point;

use crate::component::{ComponentConfig, Configurable, SeriesComponent, color_of, resolve_color};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::proportional_area_circles::{steel_blues, value_ramp};
use crate::scale::{ColorKeying, ColorScale, ScaleBand, ScaleSlot};
use crate::stats::DerivedStatistics;
use crate::z_order;

const FONT_SIZE: f64 = 12.0;

/// Each value as text centred in its category cell, shaded along a value ramp.
///
/// Each series draws along the top row of its local frame; hosts offset rows with the row scale.
#[derive(Clone, Debug)]
pub struct NumberCard {
    config: ComponentConfig,
    x_scale: ScaleSlot<ScaleBand>,
    y_scale: ScaleSlot<ScaleBand>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for NumberCard {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberCard {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 100.0, steel_blues()),
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
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

    /// Supplies the colour scale; it must be keyed by value.
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

impl Configurable for NumberCard {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for NumberCard {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        let values = (stats.min_or_zero(), stats.max_or_zero());
        resolve_color(&mut self.color_scale, ColorKeying::Value, || {
            value_ramp(self.config.colors(), values)
        })?;
        let size = self.size();
        self.x_scale.resolve_with(|| {
            ScaleBand::new(stats.category_names.iter(), (0.0, size.width)).with_padding(0.05)
        });
        self.y_scale.resolve_with(|| {
            ScaleBand::new(stats.group_names.iter(), (0.0, size.height)).with_padding(0.05)
        });
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (Some(x), Some(y)) = (self.x_scale.get(), self.y_scale.get()) else {
            return;
        };
        let cy = y.bandwidth() / 2.0;
        for datum in &series.values {
            let cx = x.map(&datum.key).unwrap_or(f64::NAN) + x.bandwidth() / 2.0;
            frame.push(
                Mark::builder(frame.id("number", &datum.key))
                    .text(
                        TextShape::new(Point::new(cx, cy), datum.value.text(), FONT_SIZE)
                            .with_anchor(TextAnchor::Middle)
                            .with_baseline(TextBaseline::Middle),
                    )
                    .fill(color_of(
                        self.color_scale.get(),
                        &datum.key,
                        datum.value(),
                    ))
                    .z_index(z_order::SERIES_LABELS)
                    .transition(self.transition())
                    .event(self.config.event(series, datum))
                    .class("number")
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::Shape;
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::data::Datum;

    #[test]
    fn values_are_written_in_their_cells() {
        let input = SeriesInput::Multi(vec![Series::new(
            "Mon",
            vec![Datum::new("1am", "2.50"), Datum::new("2am", 10.0)],
        )]);
        let mut card = NumberCard::new().with_size(200.0, 100.0);
        let mut marks = Vec::new();
        let Ok(()) = card.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        let texts: Vec<&TextShape> = marks
            .iter()
            .filter_map(|m| match &m.payload.shape {
                Shape::Text(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 2);
        // Source text is kept as written.
        assert_eq!(texts[0].text, "2.50");
        assert_eq!(texts[0].anchor, TextAnchor::Middle);
        let Some(cols) = card.x_scale() else {
            panic!("columns resolved");
        };
        let Some(second) = cols.map("2am") else {
            panic!("2am is a column");
        };
        assert_approx_eq!(f64, texts[1].pos.x, second + cols.bandwidth() / 2.0, epsilon = 1e-9);
        let blues = steel_blues();
        assert_eq!(marks[0].payload.paint.fill, Some(blues[0]));
        assert_eq!(marks[1].payload.paint.fill, Some(blues[1]));
        assert!(marks.iter().all(|m| m.event.is_some()));
    }

    #[test]
    fn numbers_are_keyed_by_category() {
        let ids = |pairs: [(&'static str, f64); 2]| {
            let input = SeriesInput::Multi(vec![Series::from_pairs("G", pairs)]);
            let mut marks = Vec::new();
            let Ok(()) = NumberCard::new().render(&mut Frame::new(&mut marks), &input) else {
                panic!("render should succeed");
            };
            marks.iter().map(|m| m.id).collect::<Vec<_>>()
        };
        let forward = ids([("a", 1.0), ("b", 2.0)]);
        let backward = ids([("b", 2.0), ("a", 1.0)]);
        assert_eq!(forward[0], backward[1]);
        assert_eq!(forward[1], backward[0]);
    }
}
