// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small attribution line in the corner of the canvas.

use ezviz_core::{Mark, TextAnchor, TextShape};
use kurbo::Point;
use peniko::color::palette::css;

use crate::frame::Frame;
use crate::z_order;

/// Right-aligned credit text, drawn ending at the frame origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditTag {
    text: String,
    href: String,
}

impl Default for CreditTag {
    fn default() -> Self {
        Self::new("d3-ez.net", "http://d3-ez.net")
    }
}

impl CreditTag {
    /// A tag showing `text` that links to `href`.
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }

    /// The visible text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The link target.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Draws the text.
    pub fn render(&self, frame: &mut Frame<'_>) {
        frame.push(
            Mark::builder(frame.id("credit", "text"))
                .text(
                    TextShape::new(Point::ZERO, self.text.as_str(), 10.0)
                        .with_anchor(TextAnchor::End),
                )
                .fill(css::GRAY)
                .z_index(z_order::TITLES)
                .class("credit-tag")
                .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::Shape;

    use super::*;

    #[test]
    fn ends_at_the_anchor() {
        let mut marks = Vec::new();
        CreditTag::default().render(&mut Frame::new(&mut marks));
        let Shape::Text(text) = &marks[0].payload.shape else {
            panic!("credit is text");
        };
        assert_eq!(text.text, "d3-ez.net");
        assert_eq!(text.anchor, TextAnchor::End);
        assert_eq!(text.pos, Point::ZERO);
    }
}
