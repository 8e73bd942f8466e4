// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A circle with a text label off its upper-left edge.

use ezviz_core::{Mark, MarkEvent, Shape, TextAnchor, TextBaseline, TextShape, Transition};
use kurbo::Point;
use peniko::Color;
use peniko::color::palette::css;

use crate::frame::Frame;
use crate::z_order;

/// One node of a node-based component, as placed by its host.
#[derive(Clone, Debug)]
pub struct Node<'a> {
    /// Data key the node's marks are identified by.
    pub key: &'a str,
    /// Centre in the frame's coordinates.
    pub center: Point,
    /// Circle radius.
    pub radius: f64,
    /// Circle fill.
    pub color: Color,
    /// Label text.
    pub label: String,
    /// Event fired when the circle is hit.
    pub event: Option<MarkEvent>,
}

/// Draws labelled circles for bubble and punch card components.
///
/// Each node is a circle that grows from zero radius and a label anchored at its end to the
/// point `(-r, -r)` off the centre. Hosts decide placement, size and colour per node.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledNode {
    class: &'static str,
    opacity: f64,
    stroke: Option<(Color, f64)>,
    font_size: f64,
    show_label: bool,
    transition: Transition,
}

impl Default for LabeledNode {
    fn default() -> Self {
        Self::new("labeled-node")
    }
}

impl LabeledNode {
    /// Nodes whose circles carry `class`.
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            opacity: 1.0,
            stroke: None,
            font_size: 10.0,
            show_label: true,
            transition: Transition::default(),
        }
    }

    /// Sets the circle opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Outlines the circle.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some((color, width));
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Shows or hides labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_label = show;
        self
    }

    /// Sets the transition timing.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// The circle class.
    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Whether labels are drawn.
    pub fn shows_labels(&self) -> bool {
        self.show_label
    }

    /// Emits the circle and, if shown, the label of `node`.
    pub fn draw(&self, frame: &mut Frame<'_>, node: Node<'_>) {
        let Node {
            key,
            center,
            radius,
            color,
            label,
            event,
        } = node;
        let mut circle = Mark::builder(frame.id(self.class, key))
            .circle(center, radius)
            .enter(Shape::Circle {
                center,
                radius: 0.0,
            })
            .fill(color)
            .opacity(self.opacity)
            .z_index(z_order::SERIES_POINTS)
            .transition(self.transition)
            .class(self.class);
        if let Some((stroke, width)) = self.stroke {
            circle = circle.stroke(stroke, width);
        }
        if let Some(event) = event {
            circle = circle.event(event);
        }
        frame.push(circle.build());

        if !self.show_label {
            return;
        }
        let at = Point::new(center.x - radius, center.y - radius);
        frame.push(
            Mark::builder(frame.id("node-label", key))
                .text(
                    TextShape::new(at, label, self.font_size)
                        .with_anchor(TextAnchor::End)
                        .with_baseline(TextBaseline::Middle),
                )
                .fill(css::BLACK)
                .z_index(z_order::SERIES_LABELS)
                .transition(self.transition)
                .class("node-label")
                .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: &str, radius: f64) -> Node<'_> {
        Node {
            key,
            center: Point::new(50.0, 40.0),
            radius,
            color: css::RED,
            label: key.to_owned(),
            event: None,
        }
    }

    #[test]
    fn label_sits_off_the_upper_left() {
        let mut marks = Vec::new();
        let nodes = LabeledNode::new("bubble").with_stroke(css::WHITE, 1.0);
        nodes.draw(&mut Frame::new(&mut marks), node("p", 10.0));
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].class, "bubble");
        assert_eq!(marks[0].payload.paint.stroke, Some(css::WHITE));
        let Shape::Text(label) = &marks[1].payload.shape else {
            panic!("second mark is the label");
        };
        assert_eq!(label.text, "p");
        assert_eq!(label.pos, Point::new(40.0, 30.0));
        assert_eq!(label.anchor, TextAnchor::End);
    }

    #[test]
    fn ids_follow_keys_not_order() {
        let nodes = LabeledNode::new("bubble");
        let mut first = Vec::new();
        let mut frame = Frame::new(&mut first);
        nodes.draw(&mut frame, node("a", 5.0));
        nodes.draw(&mut frame, node("b", 5.0));
        let mut second = Vec::new();
        let mut frame = Frame::new(&mut second);
        nodes.draw(&mut frame, node("b", 8.0));
        nodes.draw(&mut frame, node("a", 8.0));
        assert_eq!(first[0].id, second[2].id);
        assert_eq!(first[1].id, second[3].id);
        assert_ne!(first[0].id, first[1].id);
    }

    #[test]
    fn hidden_labels_leave_only_circles() {
        let mut marks = Vec::new();
        LabeledNode::new("spot")
            .with_labels(false)
            .draw(&mut Frame::new(&mut marks), node("a", 3.0));
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].class, "spot");
    }
}
