// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One stacked bar per series.

use ezviz_core::{Mark, Shape};
use kurbo::Rect;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, default_colors, resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::scale::{ColorKeying, ColorScale, ScaleLinear, ScaleSlot};
use crate::shape::stack;
use crate::stats::DerivedStatistics;
use crate::z_order;

/// A single bar per series, its categories stacked bottom to top in input order.
///
/// The bar spans the full component width; hosts place one component per series.
#[derive(Clone, Debug)]
pub struct BarsStacked {
    config: ComponentConfig,
    y_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for BarsStacked {
    fn default() -> Self {
        Self::new()
    }
}

impl BarsStacked {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(100.0, 300.0, default_colors()),
            y_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
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
        self.y_scale.clear_inferred();
        self.color_scale.clear_inferred();
    }
}

impl Configurable for BarsStacked {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for BarsStacked {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        let height = self.size().height;
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(stats.category_names.iter(), self.config.colors().to_vec())
        })?;
        let max = stats
            .group_totals_max
            .or(stats.category_total)
            .unwrap_or(0.0);
        self.y_scale
            .resolve_with(|| ScaleLinear::new((0.0, max), (0.0, height)).nice());
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let Some(y) = self.y_scale.get() else {
            return;
        };
        let size = self.size();
        let (width, height) = (size.width, size.height);
        let segments = stack(series.values.iter().map(|d| d.value()));
        for (datum, segment) in series.values.iter().zip(segments) {
            let top = height - y.map(segment.y1);
            let target = Rect::new(0.0, top, width, top + y.map(datum.value())).abs();
            frame.push(
                Mark::builder(frame.id("bar", &datum.key))
                    .rect(target)
                    .enter(Shape::Rect(Rect::new(0.0, height, width, height)))
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
    use super::*;

    #[test]
    fn segments_stack_in_input_order() {
        let input = SeriesInput::Multi(vec![
            Series::from_pairs("A", [("x", 1.0), ("y", 3.0)]),
            Series::from_pairs("B", [("x", 2.0), ("y", 2.0)]),
        ]);
        let mut bars = BarsStacked::new().with_size(20.0, 80.0);
        let mut marks = Vec::new();
        let Ok(()) = bars.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        assert_eq!(bars.y_scale().map(ScaleLinear::domain), Some((0.0, 4.0)));
        let rects: Vec<_> = marks.iter().filter_map(|m| m.payload.bounds()).collect();
        // Series A: x spans [0, 1] and y spans [1, 4] in value space, 20 units per value.
        assert_eq!(rects[0], Rect::new(0.0, 60.0, 20.0, 80.0));
        assert_eq!(rects[1], Rect::new(0.0, 0.0, 20.0, 60.0));
        assert_eq!(rects[2], Rect::new(0.0, 40.0, 20.0, 80.0));
        assert_ne!(marks[0].id, marks[2].id);
    }
}
