// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A measure/arrange helper for the chart canvas.
//!
//! - **Measure**: guides report the space they reserve (legend width, title height).
//! - **Arrange**: the canvas (size less margins) is split into chart, legend, title and credit
//!   boxes. Reserved space is subtracted before the chart body is sized, so scale inference sees
//!   the final drawing area.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Outer whitespace around the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margin {
    /// The same margin on every side.
    pub const fn uniform(m: f64) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(15.0)
    }
}

/// Inputs to [`CanvasLayout::arrange`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSpec {
    /// Outer size of the drawing.
    pub size: Size,
    /// Whitespace around the canvas.
    pub margin: Margin,
    /// Legend box size, if a legend is shown. The width is taken from the chart.
    pub legend: Option<Size>,
    /// Title height, if a title is shown. The height is taken from the chart.
    pub title_height: Option<f64>,
}

/// Output of the arrange pass, in absolute drawing coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    /// Size less margins.
    pub canvas: Rect,
    /// The chart body's drawing area.
    pub chart: Rect,
    /// The legend box.
    pub legend: Option<Rect>,
    /// The title box, spanning the canvas width.
    pub title: Option<Rect>,
    /// Anchor for the credit tag (bottom-right of the canvas).
    pub credit: Point,
}

impl CanvasLayout {
    /// Splits the canvas between chart, legend and title.
    pub fn arrange(spec: &LayoutSpec) -> Self {
        let m = spec.margin;
        let canvas = Rect::new(
            m.left,
            m.top,
            (spec.size.width - m.right).max(m.left),
            (spec.size.height - m.bottom).max(m.top),
        );
        let title_h = spec.title_height.unwrap_or(0.0).clamp(0.0, canvas.height());
        let legend_w = spec
            .legend
            .map_or(0.0, |s| s.width)
            .clamp(0.0, canvas.width());

        let chart = Rect::new(
            canvas.x0,
            canvas.y0 + title_h,
            canvas.x1 - legend_w,
            canvas.y1,
        );
        let legend = spec.legend.map(|s| {
            Rect::new(
                canvas.x1 - legend_w,
                canvas.y0 + title_h,
                canvas.x1,
                (canvas.y0 + title_h + s.height).min(canvas.y1),
            )
        });
        let title = spec
            .title_height
            .map(|_| Rect::new(canvas.x0, canvas.y0, canvas.x1, canvas.y0 + title_h));

        Self {
            canvas,
            chart,
            legend,
            title,
            credit: Point::new(canvas.x1, canvas.y1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guides_shrink_the_chart_before_it_is_sized() {
        let layout = CanvasLayout::arrange(&LayoutSpec {
            size: Size::new(600.0, 400.0),
            margin: Margin::default(),
            legend: Some(Size::new(150.0, 200.0)),
            title_height: Some(40.0),
        });
        assert_eq!(layout.canvas, Rect::new(15.0, 15.0, 585.0, 385.0));
        assert_eq!(layout.chart.size(), Size::new(420.0, 330.0));
        assert_eq!(layout.chart.origin(), Point::new(15.0, 55.0));
        assert_eq!(layout.legend, Some(Rect::new(435.0, 55.0, 585.0, 255.0)));
        assert_eq!(layout.title, Some(Rect::new(15.0, 15.0, 585.0, 55.0)));
        assert_eq!(layout.credit, Point::new(585.0, 385.0));
    }

    #[test]
    fn without_guides_the_chart_fills_the_canvas() {
        let layout = CanvasLayout::arrange(&LayoutSpec {
            size: Size::new(100.0, 50.0),
            margin: Margin::uniform(0.0),
            legend: None,
            title_height: None,
        });
        assert_eq!(layout.chart, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(layout.legend, None);
        assert_eq!(layout.title, None);
    }

    #[test]
    fn oversized_guides_are_clamped() {
        let layout = CanvasLayout::arrange(&LayoutSpec {
            size: Size::new(100.0, 100.0),
            margin: Margin::uniform(10.0),
            legend: Some(Size::new(500.0, 500.0)),
            title_height: Some(500.0),
        });
        assert_eq!(layout.chart.width(), 0.0);
        assert_eq!(layout.chart.height(), 0.0);
    }
}
