// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marks: stable-identity visual elements and their interpolatable payloads.

use core::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;
use peniko::color::palette::css;

use crate::dispatch::MarkEvent;
use crate::ease::Transition;
use crate::id::MarkId;

/// Flattening tolerance used when converting arcs and circles to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// `x` is the start of the text run.
    #[default]
    Start,
    /// `x` is the middle of the text run.
    Middle,
    /// `x` is the end of the text run.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// `y` is the alphabetic baseline.
    #[default]
    Alphabetic,
    /// `y` is the vertical middle.
    Middle,
    /// `y` is the hanging baseline (top).
    Hanging,
    /// `y` is the ideographic baseline.
    Ideographic,
}

/// Interpolation used when turning a polyline into a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Curve {
    /// Straight segments.
    #[default]
    Linear,
    /// Cardinal spline with zero tension (passes through every point).
    Cardinal,
}

/// A slice of an annulus.
///
/// Angles are in radians, measured clockwise from 12 o'clock, so `0..TAU` is a full turn
/// starting at the top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcShape {
    /// Center of the circle the arc belongs to.
    pub center: Point,
    /// Inner radius (0 for a pie slice).
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
    /// Start angle.
    pub start_angle: f64,
    /// End angle.
    pub end_angle: f64,
    /// Angular gap removed from the slice, half at each end.
    pub pad_angle: f64,
}

impl ArcShape {
    /// Creates an unpadded arc.
    pub fn new(
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            pad_angle: 0.0,
        }
    }

    /// Sets the pad angle.
    pub fn with_pad_angle(mut self, pad_angle: f64) -> Self {
        self.pad_angle = pad_angle;
        self
    }

    /// The point at `radius` along `angle` (clockwise from 12 o'clock).
    pub fn point_at(&self, radius: f64, angle: f64) -> Point {
        polar(self.center, radius, angle)
    }

    /// Midpoint of the slice, halfway between the radii and the angles.
    pub fn centroid(&self) -> Point {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        let a = (self.start_angle + self.end_angle) / 2.0;
        self.point_at(r, a)
    }

    /// Angle halfway through the slice.
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    fn padded_angles(&self) -> (f64, f64) {
        let (a0, a1) = (self.start_angle, self.end_angle);
        let pad = self.pad_angle.max(0.0) / 2.0;
        if pad == 0.0 {
            return (a0, a1);
        }
        if a1 >= a0 {
            if a1 - a0 > 2.0 * pad {
                (a0 + pad, a1 - pad)
            } else {
                let mid = (a0 + a1) / 2.0;
                (mid, mid)
            }
        } else if a0 - a1 > 2.0 * pad {
            (a0 - pad, a1 + pad)
        } else {
            let mid = (a0 + a1) / 2.0;
            (mid, mid)
        }
    }

    /// Converts the slice into a closed path.
    pub fn to_path(&self) -> BezPath {
        let finite = [
            self.center.x,
            self.center.y,
            self.inner_radius,
            self.outer_radius,
            self.start_angle,
            self.end_angle,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return BezPath::new();
        }
        let (a0, a1) = self.padded_angles();
        let sweep = (a1 - a0).clamp(-TAU, TAU);
        let inner = self.inner_radius.max(0.0);
        let outer = self.outer_radius.max(inner);
        Circle::new(self.center, outer)
            .segment(inner, a0 - FRAC_PI_2, sweep)
            .to_path(PATH_TOLERANCE)
    }

    fn contains(&self, p: Point) -> bool {
        let d = p - self.center;
        let r = d.hypot();
        let (lo_r, hi_r) = ordered(self.inner_radius, self.outer_radius);
        if r < lo_r || r > hi_r {
            return false;
        }
        let (lo, hi) = ordered(self.start_angle, self.end_angle);
        if hi - lo >= TAU {
            return true;
        }
        let angle = d.x.atan2(-d.y);
        (angle - lo).rem_euclid(TAU) <= hi - lo
    }
}

/// Point at `radius` from `center` along `angle` (clockwise from 12 o'clock).
pub(crate) fn polar(center: Point, radius: f64, angle: f64) -> Point {
    let (sin, cos) = (angle - FRAC_PI_2).sin_cos();
    Point::new(center.x + radius * cos, center.y + radius * sin)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// An unshaped text run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    /// Anchor position.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Rotation about `pos`, in degrees.
    pub angle: f64,
    /// Bold weight.
    pub bold: bool,
}

impl TextShape {
    /// Creates a start-anchored, alphabetic-baseline text run.
    pub fn new(pos: Point, text: impl Into<String>, font_size: f64) -> Self {
        Self {
            pos,
            text: text.into(),
            font_size,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            angle: 0.0,
            bold: false,
        }
    }

    /// Sets the horizontal anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the vertical baseline.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the rotation in degrees.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Sets bold weight.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

/// Geometry of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Annulus slice.
    Arc(ArcShape),
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// Open or closed sequence of points.
    Polyline {
        /// Vertices in order.
        points: Vec<Point>,
        /// How vertices are joined.
        curve: Curve,
        /// Whether the last vertex joins the first.
        closed: bool,
    },
    /// Arbitrary path. Paths are not interpolated; they snap to the target.
    Path(BezPath),
    /// Text run.
    Text(TextShape),
}

/// The kind of a mark, independent of its geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// [`Shape::Rect`].
    Rect,
    /// [`Shape::Arc`].
    Arc,
    /// [`Shape::Circle`].
    Circle,
    /// [`Shape::Polyline`].
    Polyline,
    /// [`Shape::Path`].
    Path,
    /// [`Shape::Text`].
    Text,
}

impl Shape {
    /// Returns the kind of this shape.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Arc(_) => MarkKind::Arc,
            Self::Circle { .. } => MarkKind::Circle,
            Self::Polyline { .. } => MarkKind::Polyline,
            Self::Path(_) => MarkKind::Path,
            Self::Text(_) => MarkKind::Text,
        }
    }

    /// Moves the shape by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Self::Rect(rect) => *rect = *rect + offset,
            Self::Arc(arc) => arc.center += offset,
            Self::Circle { center, .. } => *center += offset,
            Self::Polyline { points, .. } => {
                for p in points {
                    *p += offset;
                }
            }
            Self::Path(path) => path.apply_affine(kurbo::Affine::translate(offset)),
            Self::Text(text) => text.pos += offset,
        }
    }

    /// Converts the geometry to a path. Text has no path.
    pub fn to_path(&self) -> Option<BezPath> {
        match self {
            Self::Rect(rect) => Some(rect.abs().to_path(PATH_TOLERANCE)),
            Self::Arc(arc) => Some(arc.to_path()),
            Self::Circle { center, radius } => {
                Some(Circle::new(*center, radius.max(0.0)).to_path(PATH_TOLERANCE))
            }
            Self::Polyline {
                points,
                curve,
                closed,
            } => Some(polyline_path(points, *curve, *closed)),
            Self::Path(path) => Some(path.clone()),
            Self::Text(_) => None,
        }
    }

    /// Bounding box of the geometry. Text has no bounds at this layer.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(rect) => Some(rect.abs()),
            Self::Circle { center, radius } => {
                let r = radius.abs();
                Some(Rect::new(
                    center.x - r,
                    center.y - r,
                    center.x + r,
                    center.y + r,
                ))
            }
            Self::Text(_) => None,
            other => other.to_path().map(|p| p.bounding_box()),
        }
    }

    /// Whether `p` lies inside the filled geometry.
    ///
    /// Polylines and text are never hit.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect(rect) => rect.abs().contains(p),
            Self::Arc(arc) => arc.contains(p),
            Self::Circle { center, radius } => center.distance(p) <= radius.abs(),
            Self::Path(path) => path.contains(p),
            Self::Polyline { .. } | Self::Text(_) => false,
        }
    }

    /// Interpolates from `self` toward `to`.
    ///
    /// Shapes of different kinds snap to `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return to.clone();
        }
        match (self, to) {
            (Self::Rect(a), Self::Rect(b)) => Self::Rect(Rect::new(
                mix(a.x0, b.x0, t),
                mix(a.y0, b.y0, t),
                mix(a.x1, b.x1, t),
                mix(a.y1, b.y1, t),
            )),
            (Self::Arc(a), Self::Arc(b)) => Self::Arc(ArcShape {
                center: mix_point(a.center, b.center, t),
                inner_radius: mix(a.inner_radius, b.inner_radius, t),
                outer_radius: mix(a.outer_radius, b.outer_radius, t),
                start_angle: mix(a.start_angle, b.start_angle, t),
                end_angle: mix(a.end_angle, b.end_angle, t),
                pad_angle: mix(a.pad_angle, b.pad_angle, t),
            }),
            (
                Self::Circle {
                    center: ca,
                    radius: ra,
                },
                Self::Circle {
                    center: cb,
                    radius: rb,
                },
            ) => Self::Circle {
                center: mix_point(*ca, *cb, t),
                radius: mix(*ra, *rb, t),
            },
            (
                Self::Polyline { points: pa, .. },
                Self::Polyline {
                    points: pb,
                    curve,
                    closed,
                },
            ) => {
                // Vertices missing from the source start at the source's last vertex.
                let points = pb
                    .iter()
                    .enumerate()
                    .map(|(i, b)| match pa.get(i).or(pa.last()) {
                        Some(a) => mix_point(*a, *b, t),
                        None => *b,
                    })
                    .collect();
                Self::Polyline {
                    points,
                    curve: *curve,
                    closed: *closed,
                }
            }
            (Self::Text(a), Self::Text(b)) => Self::Text(TextShape {
                pos: mix_point(a.pos, b.pos, t),
                font_size: mix(a.font_size, b.font_size, t),
                angle: mix(a.angle, b.angle, t),
                ..b.clone()
            }),
            _ => to.clone(),
        }
    }
}

fn polyline_path(points: &[Point], curve: Curve, closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    let n = points.len();
    match curve {
        Curve::Cardinal if n > 2 => {
            for i in 0..n - 1 {
                let p0 = points[i.saturating_sub(1)];
                let p1 = points[i];
                let p2 = points[i + 1];
                let p3 = points[(i + 2).min(n - 1)];
                let c1 = p1 + (p2 - p0) / 6.0;
                let c2 = p2 - (p3 - p1) / 6.0;
                path.curve_to(c1, c2, p2);
            }
        }
        _ => {
            for p in &points[1..] {
                path.line_to(*p);
            }
        }
    }
    if closed {
        path.close_path();
    }
    path
}

pub(crate) fn mix(a: f64, b: f64, t: f64) -> f64 {
    if t >= 1.0 || !a.is_finite() {
        b
    } else {
        a + (b - a) * t
    }
}

fn mix_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(mix(a.x, b.x, t), mix(a.y, b.y, t))
}

fn mix_color(a: Color, b: Color, t: f64) -> Color {
    let a = a.to_rgba8();
    let b = b.to_rgba8();
    let channel = |x: u8, y: u8| -> u8 {
        let v = mix(f64::from(x), f64::from(y), t).round().clamp(0.0, 255.0);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the u8 range")]
        {
            v as u8
        }
    };
    Color::from_rgba8(
        channel(a.r, b.r),
        channel(a.g, b.g),
        channel(a.b, b.b),
        channel(a.a, b.a),
    )
}

/// Fill, stroke and opacity of a mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Fill colour; `None` leaves the interior unpainted.
    pub fill: Option<Color>,
    /// Stroke colour; `None` draws no outline.
    pub stroke: Option<Color>,
    /// Stroke width in scene units.
    pub stroke_width: f64,
    /// Group opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Some(css::BLACK),
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

impl Paint {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        let color = |a: Option<Color>, b: Option<Color>| match (a, b) {
            (Some(a), Some(b)) => Some(mix_color(a, b, t)),
            (_, b) => b,
        };
        Self {
            fill: color(self.fill, to.fill),
            stroke: color(self.stroke, to.stroke),
            stroke_width: mix(self.stroke_width, to.stroke_width, t),
            opacity: mix(self.opacity, to.opacity, t),
        }
    }
}

/// A complete visual state: geometry plus paint.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkPayload {
    /// Geometry.
    pub shape: Shape,
    /// Paint.
    pub paint: Paint,
}

impl MarkPayload {
    /// Creates a payload.
    pub fn new(shape: Shape, paint: Paint) -> Self {
        Self { shape, paint }
    }

    /// Returns the kind of the geometry.
    pub fn kind(&self) -> MarkKind {
        self.shape.kind()
    }

    /// The same payload with a different opacity.
    #[must_use]
    pub fn with_opacity(&self, opacity: f64) -> Self {
        let mut out = self.clone();
        out.paint.opacity = opacity;
        out
    }

    /// Interpolates geometry and paint toward `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            shape: self.shape.lerp(&to.shape, t),
            paint: self.paint.lerp(&to.paint, t),
        }
    }

    /// Moves the geometry by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.shape.translate(offset);
    }

    /// Whether `p` hits this payload. Fully transparent payloads are never hit.
    pub fn contains(&self, p: Point) -> bool {
        self.paint.opacity > 0.0 && self.shape.contains(p)
    }

    /// Bounding box of the geometry.
    pub fn bounds(&self) -> Option<Rect> {
        self.shape.bounds()
    }
}

/// A keyed visual element emitted by a render pass.
#[derive(Clone, Debug)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Paint order; ties are broken by id.
    pub z_index: i32,
    /// Target state.
    pub payload: MarkPayload,
    /// State a newly entering mark animates from. `None` fades in from transparent.
    pub enter: Option<MarkPayload>,
    /// Timing for entering, updating and exiting.
    pub transition: Transition,
    /// Semantic event attached to pointer interaction.
    pub event: Option<MarkEvent>,
    /// Class name written to SVG output.
    pub class: &'static str,
}

impl Mark {
    /// Starts building a mark.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder {
            id,
            z_index: 0,
            shape: Shape::Path(BezPath::new()),
            paint: Paint::default(),
            enter: None,
            enter_opacity: None,
            transition: Transition::default(),
            event: None,
            class: "mark",
        }
    }

    /// Returns the kind of the target geometry.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }

    /// The state this mark animates from when it first appears.
    pub fn enter_state(&self) -> MarkPayload {
        match &self.enter {
            Some(enter) => enter.clone(),
            None => self.payload.with_opacity(0.0),
        }
    }

    /// Moves target and enter states by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.payload.translate(offset);
        if let Some(enter) = &mut self.enter {
            enter.translate(offset);
        }
    }
}

/// Builder for [`Mark`].
#[derive(Clone, Debug)]
pub struct MarkBuilder {
    id: MarkId,
    z_index: i32,
    shape: Shape,
    paint: Paint,
    enter: Option<Shape>,
    enter_opacity: Option<f64>,
    transition: Transition,
    event: Option<MarkEvent>,
    class: &'static str,
}

impl MarkBuilder {
    /// Sets the target geometry.
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Rectangle geometry.
    pub fn rect(self, rect: Rect) -> Self {
        self.shape(Shape::Rect(rect))
    }

    /// Arc geometry.
    pub fn arc(self, arc: ArcShape) -> Self {
        self.shape(Shape::Arc(arc))
    }

    /// Circle geometry.
    pub fn circle(self, center: Point, radius: f64) -> Self {
        self.shape(Shape::Circle { center, radius })
    }

    /// Open polyline geometry; drawn without fill.
    pub fn polyline(mut self, points: Vec<Point>, curve: Curve) -> Self {
        self.paint.fill = None;
        self.shape(Shape::Polyline {
            points,
            curve,
            closed: false,
        })
    }

    /// Closed polygon geometry.
    pub fn polygon(self, points: Vec<Point>) -> Self {
        self.shape(Shape::Polyline {
            points,
            curve: Curve::Linear,
            closed: true,
        })
    }

    /// Path geometry.
    pub fn path(self, path: BezPath) -> Self {
        self.shape(Shape::Path(path))
    }

    /// Text geometry.
    pub fn text(self, text: TextShape) -> Self {
        self.shape(Shape::Text(text))
    }

    /// Sets the fill colour.
    pub fn fill(mut self, color: Color) -> Self {
        self.paint.fill = Some(color);
        self
    }

    /// Leaves the interior unpainted.
    pub fn no_fill(mut self) -> Self {
        self.paint.fill = None;
        self
    }

    /// Sets the outline.
    pub fn stroke(mut self, color: Color, width: f64) -> Self {
        self.paint.stroke = Some(color);
        self.paint.stroke_width = width;
        self
    }

    /// Sets the opacity.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.paint.opacity = opacity;
        self
    }

    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the geometry a newly entering mark animates from.
    ///
    /// The enter state shares the target paint unless [`MarkBuilder::enter_opacity`] is set.
    pub fn enter(mut self, shape: Shape) -> Self {
        self.enter = Some(shape);
        self
    }

    /// Sets the opacity a newly entering mark animates from.
    pub fn enter_opacity(mut self, opacity: f64) -> Self {
        self.enter_opacity = Some(opacity);
        self
    }

    /// Sets the transition timing.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Attaches a semantic event.
    pub fn event(mut self, event: MarkEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// Sets the class name.
    pub fn class(mut self, class: &'static str) -> Self {
        self.class = class;
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        let enter = match (self.enter, self.enter_opacity) {
            (None, None) => None,
            (shape, opacity) => {
                let mut paint = self.paint;
                if let Some(opacity) = opacity {
                    paint.opacity = opacity;
                }
                Some(MarkPayload::new(
                    shape.unwrap_or_else(|| self.shape.clone()),
                    paint,
                ))
            }
        };
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::new(self.shape, self.paint),
            enter,
            transition: self.transition,
            event: self.event,
            class: self.class,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn rect_interpolates_halfway() {
        let a = Shape::Rect(Rect::new(0.0, 100.0, 10.0, 100.0));
        let b = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 100.0));
        let Shape::Rect(mid) = a.lerp(&b, 0.5) else {
            panic!("expected a rect");
        };
        assert_approx_eq!(f64, mid.y0, 50.0, epsilon = 1e-9);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn mismatched_kinds_snap_to_target() {
        let a = Shape::Circle {
            center: Point::ZERO,
            radius: 3.0,
        };
        let b = Shape::Rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(a.lerp(&b, 0.1), b);
    }

    #[test]
    fn nan_source_snaps_to_target() {
        assert_eq!(mix(f64::NAN, 4.0, 0.25), 4.0);
    }

    #[test]
    fn arc_hit_test_uses_clockwise_from_top() {
        let arc = ArcShape::new(Point::ZERO, 10.0, 20.0, 0.0, FRAC_PI_2);
        // Upper-right quadrant in screen space.
        assert!(Shape::Arc(arc).contains(Point::new(10.0, -10.0)));
        // Lower-right quadrant is past the end angle.
        assert!(!Shape::Arc(arc).contains(Point::new(10.0, 10.0)));
        // Inside the hole.
        assert!(!Shape::Arc(arc).contains(Point::new(2.0, -2.0)));
    }

    #[test]
    fn arc_centroid_matches_polar_midpoint() {
        let arc = ArcShape::new(Point::new(100.0, 100.0), 0.0, 20.0, 0.0, FRAC_PI_2 * 2.0);
        let c = arc.centroid();
        assert_approx_eq!(f64, c.x, 110.0, epsilon = 1e-9);
        assert_approx_eq!(f64, c.y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn builder_enter_shares_paint() {
        let mark = Mark::builder(MarkId::from_raw(1))
            .rect(Rect::new(0.0, 0.0, 10.0, 10.0))
            .fill(css::RED)
            .enter(Shape::Rect(Rect::new(0.0, 10.0, 10.0, 10.0)))
            .build();
        let enter = mark.enter_state();
        assert_eq!(enter.paint.fill, Some(css::RED));
        assert_eq!(enter.paint.opacity, 1.0);

        let faded = Mark::builder(MarkId::from_raw(2))
            .circle(Point::ZERO, 4.0)
            .build()
            .enter_state();
        assert_eq!(faded.paint.opacity, 0.0);
    }

    #[test]
    fn cardinal_polyline_passes_through_vertices() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(20.0, 0.0),
        ];
        let path = polyline_path(&points, Curve::Cardinal, false);
        let end = path.elements().last().and_then(|el| el.end_point());
        assert_eq!(end, Some(Point::new(20.0, 0.0)));
    }

    #[test]
    fn translate_moves_enter_state() {
        let mut mark = Mark::builder(MarkId::from_raw(3))
            .circle(Point::ZERO, 4.0)
            .enter(Shape::Circle {
                center: Point::ZERO,
                radius: 0.0,
            })
            .build();
        mark.translate(Vec2::new(5.0, 6.0));
        let Some(Shape::Circle { center, .. }) = mark.enter.map(|e| e.shape) else {
            panic!("expected a circle enter state");
        };
        assert_eq!(center, Point::new(5.0, 6.0));
    }
}
