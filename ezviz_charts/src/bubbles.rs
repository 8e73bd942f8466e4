// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubbles placed by `x`/`y` and sized by value.

use kurbo::Point;
use peniko::color::palette::css;

use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, color_of, default_colors, extent,
    resolve_color,
};
use crate::data::{Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::labeled_node::{LabeledNode, Node};
use crate::scale::{ColorKeying, ColorScale, ScaleLinear, ScaleSlot};

/// A bubble per datum, coloured by series, sized by value and labelled with its key.
#[derive(Clone, Debug)]
pub struct Bubbles {
    config: ComponentConfig,
    min_radius: f64,
    max_radius: f64,
    show_labels: bool,
    x_scale: ScaleSlot<ScaleLinear>,
    y_scale: ScaleSlot<ScaleLinear>,
    size_scale: ScaleSlot<ScaleLinear>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for Bubbles {
    fn default() -> Self {
        Self::new()
    }
}

impl Bubbles {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(300.0, 300.0, default_colors()),
            min_radius: 10.0,
            max_radius: 20.0,
            show_labels: true,
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
            size_scale: ScaleSlot::default(),
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the radius range the size scale is inferred with.
    pub fn with_radius_range(mut self, min_radius: f64, max_radius: f64) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    /// Shows or hides the key labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Supplies the horizontal scale.
    pub fn with_x_scale(mut self, scale: ScaleLinear) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the vertical scale.
    pub fn with_y_scale(mut self, scale: ScaleLinear) -> Self {
        self.y_scale.supply(scale);
        self
    }

    /// Supplies the value-to-radius scale.
    pub fn with_size_scale(mut self, scale: ScaleLinear) -> Self {
        self.size_scale.supply(scale);
        self
    }

    /// Supplies the colour scale; it must be ordinal over series keys.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }

    /// The horizontal scale, once resolved.
    pub fn x_scale(&self) -> Option<&ScaleLinear> {
        self.x_scale.get()
    }

    /// The vertical scale, once resolved.
    pub fn y_scale(&self) -> Option<&ScaleLinear> {
        self.y_scale.get()
    }

    /// The value-to-radius scale, once resolved.
    pub fn size_scale(&self) -> Option<&ScaleLinear> {
        self.size_scale.get()
    }

    /// The colour scale, once resolved.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.get()
    }
}

impl Configurable for Bubbles {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl SeriesComponent for Bubbles {
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError> {
        let all = data.series();
        let leaves = || all.iter().flat_map(|s| s.values.iter());
        let size = self.size();
        let radii = (self.min_radius, self.max_radius);
        resolve_color(&mut self.color_scale, ColorKeying::Key, || {
            ColorScale::ordinal(
                all.iter().map(|s| s.key.as_str()),
                self.config.colors().to_vec(),
            )
        })?;
        self.size_scale
            .resolve_with(|| ScaleLinear::new(extent(leaves().map(|d| d.value())), radii));
        self.x_scale.resolve_with(|| {
            ScaleLinear::new(extent(leaves().map(|d| d.x())), (0.0, size.width)).nice()
        });
        self.y_scale.resolve_with(|| {
            ScaleLinear::new(extent(leaves().map(|d| d.y())), (size.height, 0.0)).nice()
        });
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>, series: &Series) {
        let (Some(x), Some(y), Some(r)) =
            (self.x_scale.get(), self.y_scale.get(), self.size_scale.get())
        else {
            return;
        };
        let color = color_of(self.color_scale.get(), &series.key, f64::NAN);
        let nodes = LabeledNode::new("bubble")
            .with_stroke(css::WHITE, 1.0)
            .with_labels(self.show_labels)
            .with_transition(self.transition());
        for datum in &series.values {
            nodes.draw(
                frame,
                Node {
                    key: &datum.key,
                    center: Point::new(x.map(datum.x()), y.map(datum.y())),
                    radius: r.map(datum.value()),
                    color,
                    label: datum.key.clone(),
                    event: Some(self.config.event(series, datum)),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::Shape;
    use serde_json::json;

    use super::*;
    use crate::data::Datum;

    #[test]
    fn bubbles_use_xy_and_value() {
        let Ok(input) = SeriesInput::from_json_value(&json!([
            { "key": "S1", "values": [
                { "key": "p", "value": 1, "x": 0, "y": 0 },
                { "key": "q", "value": 3, "x": 10, "y": 10 }
            ]},
            { "key": "S2", "values": [{ "key": "r", "value": 2, "x": 5, "y": 5 }] }
        ])) else {
            panic!("input should parse");
        };
        let mut bubbles = Bubbles::new().with_size(100.0, 50.0);
        let mut marks = Vec::new();
        let Ok(()) = bubbles.render(&mut Frame::new(&mut marks), &input) else {
            panic!("render should succeed");
        };
        // Each bubble is followed by its label.
        assert_eq!(marks.len(), 6);
        assert_eq!(
            marks[2].payload.shape,
            Shape::Circle {
                center: Point::new(100.0, 0.0),
                radius: 20.0
            }
        );
        assert_eq!(
            marks[4].payload.shape,
            Shape::Circle {
                center: Point::new(50.0, 25.0),
                radius: 15.0
            }
        );
        let Shape::Text(label) = &marks[3].payload.shape else {
            panic!("q is labelled");
        };
        assert_eq!(label.text, "q");
        assert_eq!(label.pos, Point::new(80.0, -20.0));
        assert_ne!(marks[0].payload.paint.fill, marks[4].payload.paint.fill);
        assert_eq!(bubbles.size_scale().map(ScaleLinear::range), Some((10.0, 20.0)));
    }

    #[test]
    fn bubbles_keep_identity_when_reordered() {
        let points = |order: [&'static str; 2]| {
            SeriesInput::Single(Series::new(
                "S",
                order
                    .iter()
                    .enumerate()
                    .map(|(i, k)| {
                        let at = i as f64;
                        Datum::new(*k, 1.0 + at).with_xy(at, 1.0)
                    })
                    .collect(),
            ))
        };
        let ids = |input: &SeriesInput| {
            let mut marks = Vec::new();
            let Ok(()) = Bubbles::new()
                .with_labels(false)
                .render(&mut Frame::new(&mut marks), input)
            else {
                panic!("render should succeed");
            };
            marks.iter().map(|m| m.id).collect::<Vec<_>>()
        };
        let forward = ids(&points(["a", "b"]));
        let backward = ids(&points(["b", "a"]));
        assert_eq!(forward.len(), 2);
        assert_eq!(forward[0], backward[1]);
        assert_eq!(forward[1], backward[0]);
    }
}
