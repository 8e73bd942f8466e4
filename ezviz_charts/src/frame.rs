// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed, translated mark sinks for one render pass.

use ezviz_core::{Mark, MarkId};
use kurbo::Vec2;

/// Collects marks for one render pass.
///
/// A frame carries a local origin and an id scope. Child frames nest both, so a component can
/// draw in its own coordinates and key its marks by data keys alone; identities stay stable
/// across passes no matter the order in which marks are emitted.
#[derive(Debug)]
pub struct Frame<'a> {
    marks: &'a mut Vec<Mark>,
    origin: Vec2,
    scope: MarkId,
}

impl<'a> Frame<'a> {
    /// A root frame writing into `marks`.
    pub fn new(marks: &'a mut Vec<Mark>) -> Self {
        Self {
            marks,
            origin: Vec2::ZERO,
            scope: MarkId::ROOT,
        }
    }

    /// A nested frame scoped by `key` and shifted by `offset`.
    pub fn child(&mut self, key: &str, offset: Vec2) -> Frame<'_> {
        Frame {
            marks: &mut *self.marks,
            origin: self.origin + offset,
            scope: self.scope.child(key),
        }
    }

    /// A nested frame scoped by `key` sharing this frame's origin.
    pub fn group(&mut self, key: &str) -> Frame<'_> {
        self.child(key, Vec2::ZERO)
    }

    /// Id of the `class` mark for data key `key` in this scope.
    pub fn id(&self, class: &str, key: &str) -> MarkId {
        self.scope.child(class).child(key)
    }

    /// The id scope.
    pub fn scope(&self) -> MarkId {
        self.scope
    }

    /// Offset of local coordinates on the canvas.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Emits a mark given in local coordinates.
    pub fn push(&mut self, mut mark: Mark) {
        mark.translate(self.origin);
        self.marks.push(mark);
    }

    /// Number of marks emitted so far, across every frame sharing the sink.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Whether nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect};

    use super::*;

    #[test]
    fn children_nest_origin_and_scope() {
        let mut marks = Vec::new();
        let mut root = Frame::new(&mut marks);
        let mut chart = root.child("chartbox", Vec2::new(10.0, 20.0));
        let mut series = chart.child("A", Vec2::new(5.0, 0.0));
        let id = series.id("bar", "x");
        series.push(
            Mark::builder(id)
                .rect(Rect::new(0.0, 0.0, 1.0, 1.0))
                .build(),
        );
        assert_eq!(id, MarkId::ROOT.child("chartbox").child("A").child("bar").child("x"));
        assert_eq!(marks.len(), 1);
        assert_eq!(
            marks[0].payload.bounds().map(|r| r.origin()),
            Some(Point::new(15.0, 20.0))
        );
    }

    #[test]
    fn ids_do_not_depend_on_emission_order() {
        let mut marks = Vec::new();
        let mut root = Frame::new(&mut marks);
        let a = root.group("A").id("bar", "x");
        let b = root.group("B").id("bar", "x");
        assert_ne!(a, b);
        assert_eq!(a, root.group("A").id("bar", "x"));
    }
}
