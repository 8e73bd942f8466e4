// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart titles.
//!
//! A title reserves a strip at the top of the canvas during layout and draws a main line plus an
//! optional sub line, centred on the frame origin.

use ezviz_core::{Mark, TextAnchor, TextBaseline, TextShape};
use peniko::Color;
use peniko::color::palette::css;

use crate::frame::Frame;
use crate::measure::TextMeasurer;
use crate::z_order;

/// A main title with an optional subtitle.
#[derive(Clone, Debug, PartialEq)]
pub struct Title {
    main_text: String,
    sub_text: Option<String>,
    height: f64,
    font_size: f64,
    sub_font_size: f64,
    color: Color,
}

impl Default for Title {
    fn default() -> Self {
        Self::new("Title").with_sub_text("Sub Title")
    }
}

impl Title {
    /// A title with no subtitle.
    pub fn new(main_text: impl Into<String>) -> Self {
        Self {
            main_text: main_text.into(),
            sub_text: None,
            height: 40.0,
            font_size: 14.0,
            sub_font_size: 11.0,
            color: css::BLACK,
        }
    }

    /// Sets the main line.
    pub fn with_main_text(mut self, text: impl Into<String>) -> Self {
        self.main_text = text.into();
        self
    }

    /// Sets the sub line.
    pub fn with_sub_text(mut self, text: impl Into<String>) -> Self {
        self.sub_text = Some(text.into());
        self
    }

    /// Sets the minimum height reserved by layout.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Sets the text colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The main line.
    pub fn main_text(&self) -> &str {
        &self.main_text
    }

    /// The sub line, if any.
    pub fn sub_text(&self) -> Option<&str> {
        self.sub_text.as_deref()
    }

    /// Height the title reserves: the configured height, or more if the text needs it.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> f64 {
        let main = measurer.measure(&self.main_text, self.font_size).1;
        let sub = self
            .sub_text
            .as_deref()
            .map_or(0.0, |t| measurer.measure(t, self.sub_font_size).1);
        self.height.max(main + sub + 15.0)
    }

    /// Draws the lines centred on the frame origin, 15 and 30 units down.
    pub fn render(&self, frame: &mut Frame<'_>) {
        let lines = [
            ("title", Some(self.main_text.as_str()), self.font_size, 15.0),
            ("sub-title", self.sub_text.as_deref(), self.sub_font_size, 30.0),
        ];
        for (class, text, font_size, y) in lines {
            let Some(text) = text else {
                continue;
            };
            frame.push(
                Mark::builder(frame.id(class, "text"))
                    .text(
                        TextShape::new((0.0, y).into(), text, font_size)
                            .with_anchor(TextAnchor::Middle)
                            .with_baseline(TextBaseline::Alphabetic)
                            .with_bold(class == "title"),
                    )
                    .fill(self.color)
                    .z_index(z_order::TITLES)
                    .class(class)
                    .build(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::Shape;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    #[test]
    fn default_draws_both_lines() {
        let mut marks = Vec::new();
        Title::default().render(&mut Frame::new(&mut marks));
        let texts: Vec<(&str, f64)> = marks
            .iter()
            .filter_map(|m| match &m.payload.shape {
                Shape::Text(t) => Some((t.text.as_str(), t.pos.y)),
                _ => None,
            })
            .collect();
        assert_eq!(texts, [("Title", 15.0), ("Sub Title", 30.0)]);
    }

    #[test]
    fn sub_line_is_optional() {
        let mut marks = Vec::new();
        Title::new("Sales").render(&mut Frame::new(&mut marks));
        assert_eq!(marks.len(), 1);
        assert_eq!(Title::new("Sales").measure(&HeuristicTextMeasurer), 40.0);
    }
}
