// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legends.
//!
//! A [`Legend`] is a framed box with a bold title. Its content depends on the scales it is handed:
//! a size scale gets a column of graded circles, and a colour scale gets either swatches
//! (ordinal and linear scales) or a threshold ramp. When both are present they share the box,
//! size legend on top.

use ezviz_core::{Curve, Mark, TextAnchor, TextBaseline, TextShape};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use peniko::color::palette::css;

use crate::format::{format_tick, range_label};
use crate::frame::Frame;
use crate::scale::{
    ColorScale, ScaleKind, ScaleKindOf, ScaleLinear, ScaleLinearColor, ScaleThreshold,
};
use crate::z_order;

const FONT_SIZE: f64 = 10.0;
const SWATCH_WIDTH: f64 = 20.0;
const SIZE_ITEMS: usize = 4;

/// The legend renderer a scale calls for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LegendScaleKind {
    /// Swatch per key.
    Ordinal,
    /// Colour ramp with break point ticks.
    Threshold,
    /// Swatches at the domain ends.
    Linear,
    /// Swatches at the domain ends.
    Time,
    /// No legend can be drawn.
    Unsupported,
}

/// Picks the legend renderer for `scale` from its declared kind.
///
/// Band scales have no legend; they are logged and reported as
/// [`LegendScaleKind::Unsupported`].
pub fn classify(scale: &dyn ScaleKindOf) -> LegendScaleKind {
    match scale.kind() {
        ScaleKind::Ordinal => LegendScaleKind::Ordinal,
        ScaleKind::Threshold => LegendScaleKind::Threshold,
        ScaleKind::Linear => LegendScaleKind::Linear,
        ScaleKind::Time => LegendScaleKind::Time,
        kind @ ScaleKind::Band => {
            tracing::warn!(?kind, "legend does not support this scale");
            LegendScaleKind::Unsupported
        }
    }
}

/// A framed legend box.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    size: Size,
    title: Option<String>,
    opacity: f64,
    color_scale: Option<ColorScale>,
    size_scale: Option<ScaleLinear>,
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl Legend {
    /// An empty 150 × 200 legend.
    pub fn new() -> Self {
        Self {
            size: Size::new(150.0, 200.0),
            title: None,
            opacity: 0.7,
            color_scale: None,
            size_scale: None,
        }
    }

    /// Sets the box size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Sets the bold heading.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the colour scale to explain.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale = Some(scale);
        self
    }

    /// Sets the radius scale to explain.
    pub fn with_size_scale(mut self, scale: ScaleLinear) -> Self {
        self.size_scale = Some(scale);
        self
    }

    /// The box size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The colour scale, if any.
    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.color_scale.as_ref()
    }

    /// Draws the box at the frame origin.
    pub fn render(&self, frame: &mut Frame<'_>) {
        let Size { width, height } = self.size;
        frame.push(
            Mark::builder(frame.id("frame", "rect"))
                .rect(Rect::new(0.0, 0.0, width, height))
                .fill(css::WHITE)
                .stroke(css::BLACK, 1.0)
                .opacity(self.opacity)
                .z_index(z_order::LEGEND_SWATCHES - 1)
                .class("legend-box")
                .build(),
        );
        if let Some(title) = &self.title {
            frame.push(
                Mark::builder(frame.id("title", "text"))
                    .text(
                        TextShape::new(Point::new(10.0, 5.0), title.as_str(), FONT_SIZE + 1.0)
                            .with_baseline(TextBaseline::Hanging)
                            .with_bold(true),
                    )
                    .z_index(z_order::LEGEND_LABELS)
                    .class("legend-title")
                    .build(),
            );
        }

        let content = Size::new(width - 20.0, height - 35.0);
        let color = self.color_scale.as_ref();
        let parts = usize::from(self.size_scale.is_some()) + usize::from(color.is_some());
        if parts == 0 {
            return;
        }
        let part = Size::new(content.width, content.height / parts as f64);
        let mut top = 20.0;
        if let Some(size_scale) = &self.size_scale {
            let mut sub = frame.child("size", Vec2::new(10.0, top));
            size_items(&mut sub, size_scale, part);
            top += part.height;
        }
        if let Some(scale) = color {
            let mut sub = frame.child("color", Vec2::new(10.0, top));
            match scale {
                ColorScale::Ordinal(s) => {
                    let items: Vec<(String, Option<Color>)> = s
                        .domain()
                        .map(|k| (k.to_owned(), s.map(k).copied()))
                        .collect();
                    swatches(&mut sub, &items, part);
                }
                ColorScale::Linear(s) => swatches(&mut sub, &end_items(s), part),
                ColorScale::Threshold(s) => threshold_ramp(&mut sub, s, part),
            }
        }
    }
}

/// Swatch items for the two ends of a colour ramp; none when the domain is not finite.
fn end_items(scale: &ScaleLinearColor) -> Vec<(String, Option<Color>)> {
    let (a, b) = scale.domain();
    if !a.is_finite() || !b.is_finite() {
        return Vec::new();
    }
    let step = (b - a).abs() / 10.0;
    vec![
        (format_tick(a, step), scale.map(a)),
        (format_tick(b, step), scale.map(b)),
    ]
}

/// Four graded circles with their value ranges.
fn size_items(frame: &mut Frame<'_>, scale: &ScaleLinear, size: Size) {
    let (d0, d1) = scale.domain();
    let (lo, hi) = (d0.min(d1), d0.max(d1));
    if !lo.is_finite() || !hi.is_finite() {
        return;
    }
    let n = SIZE_ITEMS as f64;
    let increment = (hi - lo) / n;
    let y_step = size.height / (n * 2.0);
    let rows = ScaleLinear::new((0.0, n - 1.0), (y_step, size.height - y_step));
    let x = scale.map(hi);
    for i in 0..SIZE_ITEMS {
        let (start, end) = (lo + increment * i as f64, lo + increment * (i + 1) as f64);
        let y = rows.map(i as f64);
        let label = range_label(start, end);
        frame.push(
            Mark::builder(frame.id("size-circle", &label))
                .circle(Point::new(x, y), scale.map(start))
                .fill(css::LIGHT_GRAY)
                .stroke(css::GRAY, 1.0)
                .z_index(z_order::LEGEND_SWATCHES)
                .class("legend-item")
                .build(),
        );
        frame.push(
            Mark::builder(frame.id("size-label", &label))
                .text(
                    TextShape::new(Point::new(x * 2.0 + 5.0, y), label.as_str(), FONT_SIZE)
                        .with_baseline(TextBaseline::Middle),
                )
                .z_index(z_order::LEGEND_LABELS)
                .class("legend-label")
                .build(),
        );
    }
}

/// A swatch and label per item, spread down the available height.
fn swatches(frame: &mut Frame<'_>, items: &[(String, Option<Color>)], size: Size) {
    let n = items.len().max(1) as f64;
    let item_height = size.height / n - 20.0;
    for (i, (label, color)) in items.iter().enumerate() {
        let y = 10.0 + (item_height + 20.0) * i as f64;
        frame.push(
            Mark::builder(frame.id("swatch", label))
                .rect(Rect::new(0.0, y, SWATCH_WIDTH, y + item_height).abs())
                .fill(color.unwrap_or(css::LIGHT_GRAY))
                .stroke(Color::from_rgb8(0xdd, 0xdd, 0xdd), 1.0)
                .z_index(z_order::LEGEND_SWATCHES)
                .class("legend-item")
                .build(),
        );
        frame.push(
            Mark::builder(frame.id("swatch-label", label))
                .text(
                    TextShape::new(
                        Point::new(40.0, y + item_height / 2.0),
                        label.as_str(),
                        FONT_SIZE,
                    )
                    .with_baseline(TextBaseline::Middle),
                )
                .z_index(z_order::LEGEND_LABELS)
                .class("legend-label")
                .build(),
        );
    }
}

/// A vertical ramp of bucket colours with a tick at each break point.
fn threshold_ramp(frame: &mut Frame<'_>, scale: &ScaleThreshold<Color>, size: Size) {
    let domain = scale.domain();
    let lo = domain.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = domain.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return;
    }
    let margin = (hi - lo) * 0.1;
    let y = ScaleLinear::new((lo - margin, hi + margin), (0.0, size.height));
    let (y_lo, y_hi) = y.domain();

    for (i, color) in scale.range().iter().enumerate() {
        let Some((start, end)) = scale.invert_extent(color) else {
            continue;
        };
        let (start, end) = (start.unwrap_or(y_lo), end.unwrap_or(y_hi));
        frame.push(
            Mark::builder(frame.id("bucket", &i.to_string()))
                .rect(Rect::new(0.0, y.map(start), 10.0, y.map(end)))
                .fill(*color)
                .z_index(z_order::LEGEND_SWATCHES)
                .class("legend-item")
                .build(),
        );
    }
    let step = y.tick_step(10);
    for (i, &value) in domain.iter().enumerate() {
        let key = i.to_string();
        let label = format_tick(value, step);
        let at = y.map(value);
        frame.push(
            Mark::builder(frame.id("bucket-tick", &key))
                .polyline(vec![Point::new(0.0, at), Point::new(13.0, at)], Curve::Linear)
                .stroke(css::BLACK, 1.0)
                .z_index(z_order::LEGEND_LABELS)
                .class("tick")
                .build(),
        );
        frame.push(
            Mark::builder(frame.id("bucket-label", &key))
                .text(
                    TextShape::new(Point::new(16.0, at), label.as_str(), FONT_SIZE)
                        .with_anchor(TextAnchor::Start)
                        .with_baseline(TextBaseline::Middle),
                )
                .z_index(z_order::LEGEND_LABELS)
                .class("legend-label")
                .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::Shape;

    use super::*;
    use crate::scale::{ScaleBand, ScaleOrdinal, ScaleTime};

    fn texts(marks: &[Mark]) -> Vec<&str> {
        marks
            .iter()
            .filter_map(|m| match &m.payload.shape {
                Shape::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn classification_follows_declared_kind() {
        let ordinal = ScaleOrdinal::new(["a"], vec![css::RED]);
        let threshold = ScaleThreshold::new(vec![1.0], vec![css::RED, css::BLUE]);
        let linear = ScaleLinear::new((0.0, 1.0), (0.0, 1.0));
        assert_eq!(classify(&ordinal), LegendScaleKind::Ordinal);
        assert_eq!(classify(&threshold), LegendScaleKind::Threshold);
        assert_eq!(classify(&linear), LegendScaleKind::Linear);
        assert_eq!(
            classify(&ScaleTime::new((0.0, 1.0), (0.0, 1.0))),
            LegendScaleKind::Time
        );
        assert_eq!(
            classify(&ScaleBand::new(["a"], (0.0, 1.0))),
            LegendScaleKind::Unsupported
        );
    }

    #[test]
    fn ordinal_scales_get_swatches() {
        let Ok(scale) = ColorScale::ordinal(["Apples", "Pears"], vec![css::RED, css::GREEN]) else {
            panic!("valid scale");
        };
        let legend = Legend::new().with_title("Fruit").with_color_scale(scale);
        let mut marks = Vec::new();
        legend.render(&mut Frame::new(&mut marks));
        assert_eq!(texts(&marks), ["Fruit", "Apples", "Pears"]);
        let swatches: Vec<&Mark> = marks.iter().filter(|m| m.class == "legend-item").collect();
        // Content is 130 × 165; two items leave 62.5 each after the 20 unit gaps.
        assert_eq!(
            swatches[1].payload.shape,
            Shape::Rect(Rect::new(10.0, 112.5, 30.0, 175.0))
        );
        assert_eq!(swatches[1].payload.paint.fill, Some(css::GREEN));
    }

    #[test]
    fn threshold_scales_get_a_ramp() {
        let Ok(scale) = ColorScale::threshold(vec![10.0, 20.0], vec![css::RED, css::BLUE]) else {
            panic!("valid scale");
        };
        let mut marks = Vec::new();
        Legend::new()
            .with_color_scale(scale)
            .render(&mut Frame::new(&mut marks));
        assert_eq!(texts(&marks), ["10", "20"]);
        assert_eq!(marks.iter().filter(|m| m.class == "legend-item").count(), 2);
    }

    #[test]
    fn size_and_colour_legends_stack() {
        let Ok(colors) = ColorScale::ordinal(["a"], vec![css::RED]) else {
            panic!("valid scale");
        };
        let sizes = ScaleLinear::new((0.0, 40.0), (10.0, 20.0));
        let mut marks = Vec::new();
        Legend::new()
            .with_size_scale(sizes)
            .with_color_scale(colors)
            .render(&mut Frame::new(&mut marks));
        assert_eq!(
            texts(&marks),
            ["0 - 10", "10 - 20", "20 - 30", "30 - 40", "a"]
        );
    }

    #[test]
    fn non_finite_domains_draw_no_items() {
        let colors = ColorScale::Linear(ScaleLinearColor::new(
            (f64::NAN, f64::NAN),
            (css::WHITE, css::BLACK),
        ));
        let sizes = ScaleLinear::new((f64::NAN, f64::NAN), (2.0, 20.0));
        let mut marks = Vec::new();
        Legend::new()
            .with_title("Key")
            .with_size_scale(sizes)
            .with_color_scale(colors)
            .render(&mut Frame::new(&mut marks));
        assert_eq!(texts(&marks), ["Key"]);
        assert!(marks.iter().all(|m| m.class != "legend-item"));
    }

    #[test]
    fn equal_break_points_keep_distinct_ids() {
        let Ok(scale) =
            ColorScale::threshold(vec![1.0, 1.0, 1.0], vec![css::RED, css::GREEN, css::BLUE])
        else {
            panic!("valid scale");
        };
        let mut marks = Vec::new();
        Legend::new()
            .with_color_scale(scale)
            .render(&mut Frame::new(&mut marks));
        let ticks: Vec<_> = marks.iter().filter(|m| m.class == "tick").map(|m| m.id).collect();
        assert_eq!(ticks.len(), 3);
        let mut ids: Vec<_> = marks.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), marks.len());
    }
}
