// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A row of circles sized and shaded by value, as used by punch cards.

use kurbo::Point;
use peniko::Color;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::labeled_node::{LabeledNode, Node};
use crate::scale::{
    ColorKeying, ColorScale, ScaleBand, ScaleLinear, ScaleLinearColor, ScaleSlot,
};
use crate::stats::DerivedStatistics;

/// Light and dark steel blue, the ends of the default value ramp.
pub(crate) fn steel_blues() -> Vec<Color> {
    vec![Color::from_rgb8(100, 186, 255), Color::from_rgb8(49, 91, 126)]
}

/// A linear colour ramp over `values` from the first to the last of `colors`.
pub(crate) fn value_ramp(colors: &[Color], values: (f64, f64)) -> Result<ColorScale, ChartError> {
    match colors {
        [] => Err(ChartError::EmptyRange),
        [only] => Ok(ColorScale::Linear(ScaleLinearColor::new(values, (*only, *only)))),
        [low, .., high] => Ok(ColorScale::Linear(ScaleLinearColor::new(
            values,
            (*low, *high),
        ))),
    }
}

/// One circle per category, centred in its cell, with area and shade following the value and
/// the value written beside it.
///
/// Each series is drawn along the top row of its local frame; hosts offset rows with the row
/// scale.
#[derive(Clone, Debug)]
pub struct ProportionalAreaCircles {
    config: ComponentConfig,
    min_radius: f64,
    max_radius: f64,
    show_labels: bool,
    x_scale: ScaleSlot<ScaleBand>,
    y_scale: ScaleSlot<ScaleBand>,
    size_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for ProportionalAreaCircles {
    fn default() -> Self {
        Self::new()
    }
}

impl ProportionalAreaCircles {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 100.0, steel_blues()),
            min_radius: 2.0,
            max_radius: 20.0,
            show_labels: true,
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            size_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the radii the smallest and largest values map to.
    pub fn with_radius_range(mut self, min: f64, max: f64) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    /// Shows or hides the value labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
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

    /// Supplies the value to radius scale.
    pub fn with_size_scale(mut self, scale: ScaleLinear) -> Self {
        self.size_scale.supply(scale);
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

    /// The radius scale, once resolved.
    pub fn size_scale(&self) -> Option<&ScaleLinear> {
        self.size_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }
}

impl Configurable for ProportionalAreaCircles {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for ProportionalAreaCircles {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let stats = DerivedStatistics::from_input(data);
        let values = (stats.min_or_zero(), stats.max_or_zero());
        resolve_color(&mut self.color_scale, ColorKeying::Value, || {
            value_ramp(self.config.colors(), values)
        })?;
        let radii = (self.min_radius, self.max_radius);
        self.size_scale
            .resolve_with(|| ScaleLinear::new(values, radii));
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
        let (Some(x), Some(y), Some(size)) = (
            self.x_scale.get(),
            self.y_scale.get(),
            self.size_scale.get(),
        ) else {
            return;
        };
        let cy = y.bandwidth() / 2.0;
        let nodes = LabeledNode::new("spot")
            .with_labels(self.show_labels)
            .with_transition(self.transition());
        for datum in &series.values {
            let cx = x.map(&datum.key).unwrap_or(f64::NAN) + x.bandwidth() / 2.0;
            nodes.draw(
                frame,
                Node {
                    key: &datum.key,
                    center: Point::new(cx, cy),
                    radius: size.map(datum.value()),
                    color: color_of(self.color_scale.get(), &datum.key, datum.value()),
                    label: datum.value.text().into_owned(),
                    event: Some(self.config.event(series, datum)),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::Shape;
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn circles_scale_between_the_radius_bounds() {
        let input = SeriesInput::Multi(vec![
            Series::from_pairs("Mon", [("1am", 0.0), ("2am", 10.0)]),
            Series::from_pairs("Tue", [("1am", 5.0), ("2am", 2.0)]),
        ]);
        let mut circles = ProportionalAreaCircles::new().with_size(200.0, 100.0);
        let mut marks = Vec::new();
        let Ok(()) = circles.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        let spots: Vec<_> = marks.iter().filter(|m| m.class == "spot").collect();
        let radii: Vec<f64> = spots
            .iter()
            .map(|m| match &m.payload.shape {
                Shape::Circle { radius, .. } => *radius,
                other => panic!("expected circles, got {other:?}"),
            })
            .collect();
        assert_approx_eq!(f64, radii[0], 2.0, epsilon = 1e-9);
        assert_approx_eq!(f64, radii[1], 20.0, epsilon = 1e-9);
        assert_approx_eq!(f64, radii[2], 11.0, epsilon = 1e-9);
        let blues = steel_blues();
        assert_eq!(spots[0].payload.paint.fill, Some(blues[0]));
        assert_eq!(spots[1].payload.paint.fill, Some(blues[1]));
        let labels: Vec<&str> = marks
            .iter()
            .filter_map(|m| match &m.payload.shape {
                Shape::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, ["0", "10", "5", "2"]);
    }
}
