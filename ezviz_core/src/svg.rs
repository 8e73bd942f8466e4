// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization of sampled scene items.
//!
//! Output is a flat list of primitives in paint order. Non-finite coordinates are written as
//! `0`, and paths containing non-finite points are emitted empty, so coercion artifacts in the
//! data never produce invalid documents.

use kurbo::{BezPath, PathEl, Point, Size};
use peniko::Color;

use crate::mark::{Paint, Shape, TextAnchor, TextBaseline, TextShape};
use crate::scene::SceneItem;

/// Writes a complete SVG document.
pub fn write_document(size: Size, background: Option<Color>, items: &[SceneItem]) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = num(size.width),
        h = num(size.height),
    ));
    out.push('\n');
    if let Some(color) = background {
        out.push_str(&format!(
            r#"<rect class="background" x="0" y="0" width="{}" height="{}""#,
            num(size.width),
            num(size.height)
        ));
        write_color_attr(&mut out, "fill", Some(color));
        out.push_str("/>\n");
    }
    for item in items {
        write_item(&mut out, item);
    }
    out.push_str("</svg>\n");
    out
}

fn write_item(out: &mut String, item: &SceneItem) {
    let paint = &item.payload.paint;
    match &item.payload.shape {
        Shape::Rect(rect) => {
            let r = rect.abs();
            out.push_str(&format!(
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}""#,
                item.class,
                num(r.x0),
                num(r.y0),
                num(r.width()),
                num(r.height()),
            ));
            write_paint_attrs(out, paint);
            out.push_str("/>\n");
        }
        Shape::Circle { center, radius } => {
            out.push_str(&format!(
                r#"<circle class="{}" cx="{}" cy="{}" r="{}""#,
                item.class,
                num(center.x),
                num(center.y),
                num(radius.max(0.0)),
            ));
            write_paint_attrs(out, paint);
            out.push_str("/>\n");
        }
        Shape::Text(text) => write_text(out, item.class, text, paint),
        shape => {
            let d = shape
                .to_path()
                .filter(path_is_finite)
                .map(|p| p.to_svg())
                .unwrap_or_default();
            out.push_str(&format!(r#"<path class="{}" d="{d}""#, item.class));
            write_paint_attrs(out, paint);
            out.push_str("/>\n");
        }
    }
}

fn write_text(out: &mut String, class: &str, text: &TextShape, paint: &Paint) {
    let baseline = match text.baseline {
        TextBaseline::Middle => "middle",
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Hanging => "hanging",
        TextBaseline::Ideographic => "ideographic",
    };
    out.push_str(&format!(
        r#"<text class="{class}" x="{}" y="{}" font-family="sans-serif" font-size="{}" dominant-baseline="{baseline}""#,
        num(text.pos.x),
        num(text.pos.y),
        num(text.font_size),
    ));
    out.push_str(match text.anchor {
        TextAnchor::Start => r#" text-anchor="start""#,
        TextAnchor::Middle => r#" text-anchor="middle""#,
        TextAnchor::End => r#" text-anchor="end""#,
    });
    if text.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    if text.angle != 0.0 && text.angle.is_finite() {
        out.push_str(&format!(
            r#" transform="rotate({} {} {})""#,
            num(text.angle),
            num(text.pos.x),
            num(text.pos.y)
        ));
    }
    write_paint_attrs(out, paint);
    out.push('>');
    out.push_str(&escape_xml(&text.text));
    out.push_str("</text>\n");
}

fn write_paint_attrs(out: &mut String, paint: &Paint) {
    write_color_attr(out, "fill", paint.fill);
    if paint.stroke.is_some() && paint.stroke_width > 0.0 {
        write_color_attr(out, "stroke", paint.stroke);
        out.push_str(&format!(r#" stroke-width="{}""#, num(paint.stroke_width)));
    }
    let opacity = if paint.opacity.is_finite() {
        paint.opacity.clamp(0.0, 1.0)
    } else {
        1.0
    };
    if opacity < 1.0 {
        out.push_str(&format!(r#" opacity="{}""#, num(opacity)));
    }
}

fn write_color_attr(out: &mut String, name: &str, color: Option<Color>) {
    let Some(color) = color else {
        out.push_str(&format!(r#" {name}="none""#));
        return;
    };
    let rgba = color.to_rgba8();
    out.push_str(&format!(
        r##" {name}="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    ));
    if rgba.a != 255 {
        out.push_str(&format!(
            r#" {name}-opacity="{}""#,
            num(f64::from(rgba.a) / 255.0)
        ));
    }
}

fn path_is_finite(path: &BezPath) -> bool {
    let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
    path.elements().iter().all(|el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => finite(p),
        PathEl::QuadTo(a, b) => finite(a) && finite(b),
        PathEl::CurveTo(a, b, c) => finite(a) && finite(b) && finite(c),
        PathEl::ClosePath => true,
    })
}

/// Formats a coordinate with at most three decimals; non-finite values become `0`.
pub fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_owned();
    }
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 {
        "0".to_owned()
    } else {
        format!("{r}")
    }
}

/// Escapes text content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::id::MarkId;
    use crate::mark::{ArcShape, MarkPayload};

    fn item(shape: Shape) -> SceneItem {
        SceneItem {
            id: MarkId::from_raw(1),
            z_index: 0,
            class: "bar",
            payload: MarkPayload::new(shape, Paint::default()),
        }
    }

    #[test]
    fn nan_rect_becomes_zero_sized() {
        let svg = write_document(
            Size::new(10.0, 10.0),
            None,
            &[item(Shape::Rect(Rect::new(1.0, 2.0, f64::NAN, 4.0)))],
        );
        assert!(svg.contains(r#"width="0""#), "{svg}");
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn nan_arc_becomes_empty_path() {
        let arc = ArcShape::new(Point::ZERO, 0.0, 10.0, 0.0, f64::NAN);
        let svg = write_document(Size::new(10.0, 10.0), None, &[item(Shape::Arc(arc))]);
        assert!(svg.contains(r#"d="""#), "{svg}");
    }

    #[test]
    fn text_is_escaped() {
        let text = TextShape::new(Point::new(1.0, 2.0), "a < b & c", 10.0);
        let svg = write_document(Size::new(10.0, 10.0), None, &[item(Shape::Text(text))]);
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.123_456), "0.123");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(f64::INFINITY), "0");
    }
}
