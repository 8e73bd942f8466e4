// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The persistent render target.

use kurbo::{Point, Size, Vec2};
use peniko::Color;

use crate::dispatch::{EventKind, MarkEvent};
use crate::id::MarkId;
use crate::mark::Mark;
use crate::scene::{MarkDiff, Scene};
use crate::svg;

/// A named layer group with its own origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Layer name (`chartbox`, `legendbox`, ...).
    pub name: &'static str,
    /// Offset of the layer's local coordinates on the canvas.
    pub origin: Point,
}

/// The root structure created the first time a chart renders onto a canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasRoot {
    serial: u64,
    layers: Vec<Layer>,
}

impl CanvasRoot {
    /// Creation number of this root on its canvas.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Layers in creation order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Offset of a layer, or zero when the layer is unknown.
    pub fn offset(&self, name: &str) -> Vec2 {
        self.layer(name).map_or(Vec2::ZERO, |l| l.origin.to_vec2())
    }
}

/// A drawing surface that retains elements between render passes.
#[derive(Debug)]
pub struct Canvas {
    size: Size,
    background: Option<Color>,
    scene: Scene,
    root: Option<CanvasRoot>,
    roots_created: u64,
    commits: u64,
    hovered: Option<(MarkId, MarkEvent)>,
}

impl Canvas {
    /// Creates an empty canvas.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            background: None,
            scene: Scene::new(),
            root: None,
            roots_created: 0,
            commits: 0,
            hovered: None,
        }
    }

    /// Sets a background fill written behind every element.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Canvas size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resizes the canvas.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// The root structure, once created.
    pub fn root(&self) -> Option<&CanvasRoot> {
        self.root.as_ref()
    }

    /// How many times a root has been created on this canvas.
    pub fn roots_created(&self) -> u64 {
        self.roots_created
    }

    /// Number of committed render passes.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// The retained scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Creates the root on first use, then keeps layer origins current.
    ///
    /// Returns `true` when the root was created by this call.
    pub fn ensure_root(&mut self, layers: &[(&'static str, Point)]) -> bool {
        match &mut self.root {
            Some(root) => {
                for &(name, origin) in layers {
                    match root.layers.iter_mut().find(|l| l.name == name) {
                        Some(layer) => layer.origin = origin,
                        None => root.layers.push(Layer { name, origin }),
                    }
                }
                false
            }
            None => {
                self.roots_created += 1;
                tracing::debug!(
                    serial = self.roots_created,
                    layers = layers.len(),
                    "creating canvas root"
                );
                self.root = Some(CanvasRoot {
                    serial: self.roots_created,
                    layers: layers
                        .iter()
                        .map(|&(name, origin)| Layer { name, origin })
                        .collect(),
                });
                true
            }
        }
    }

    /// Reconciles one render pass.
    pub fn commit(&mut self, marks: Vec<Mark>, now: f64) -> Vec<MarkDiff> {
        let removed = self.scene.advance(now);
        let diffs = self.scene.tick(marks, now);
        self.commits += 1;
        tracing::debug!(
            pass = self.commits,
            enter = diffs.iter().filter(|d| d.is_enter()).count(),
            update = diffs.iter().filter(|d| d.is_update()).count(),
            exit = diffs.iter().filter(|d| d.is_exit()).count(),
            removed,
            "committed render pass"
        );
        if let Some((id, _)) = &self.hovered
            && self.scene.get(*id).is_none()
        {
            self.hovered = None;
        }
        diffs
    }

    /// Routes a pointer position to value and series hover events.
    pub fn pointer_move(&mut self, p: Point, now: f64) {
        let hit = self
            .scene
            .hit_test(p, now)
            .and_then(|e| e.event.clone().map(|ev| (e.id, ev)));
        if self.hovered.as_ref().map(|(id, _)| *id) == hit.as_ref().map(|(id, _)| *id) {
            return;
        }
        let previous = self.hovered.take();
        let series = |h: &Option<(MarkId, MarkEvent)>| {
            h.as_ref().and_then(|(_, ev)| ev.datum.series.clone())
        };
        let series_changed = series(&previous) != series(&hit);
        if let Some((_, ev)) = &previous {
            ev.dispatch.call(EventKind::ValueMouseOut, &ev.datum);
            if series_changed && ev.datum.series.is_some() {
                ev.dispatch.call(EventKind::SeriesMouseOut, &ev.datum);
            }
        }
        if let Some((_, ev)) = &hit {
            ev.dispatch.call(EventKind::ValueMouseOver, &ev.datum);
            if series_changed && ev.datum.series.is_some() {
                ev.dispatch.call(EventKind::SeriesMouseOver, &ev.datum);
            }
        }
        self.hovered = hit;
    }

    /// The pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        if let Some((_, ev)) = self.hovered.take() {
            ev.dispatch.call(EventKind::ValueMouseOut, &ev.datum);
            if ev.datum.series.is_some() {
                ev.dispatch.call(EventKind::SeriesMouseOut, &ev.datum);
            }
        }
    }

    /// Routes a click to value and series click events.
    ///
    /// Returns `true` when an interactive element was hit.
    pub fn click(&mut self, p: Point, now: f64) -> bool {
        let Some(ev) = self.scene.hit_test(p, now).and_then(|e| e.event.clone()) else {
            return false;
        };
        ev.dispatch.call(EventKind::ValueClick, &ev.datum);
        if ev.datum.series.is_some() {
            ev.dispatch.call(EventKind::SeriesClick, &ev.datum);
        }
        true
    }

    /// Settles finished transitions and serializes the scene as displayed at `now`.
    pub fn to_svg(&mut self, now: f64) -> String {
        self.scene.advance(now);
        svg::write_document(self.size, self.background, &self.scene.items(now))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kurbo::Rect;

    use super::*;
    use crate::dispatch::{Dispatch, EventDatum};
    use crate::ease::Transition;

    fn bar(dispatch: &Dispatch, series: &str, key: &str, x: f64) -> Mark {
        Mark::builder(MarkId::keyed(series).child(key))
            .rect(Rect::new(x, 0.0, x + 10.0, 10.0))
            .transition(Transition::NONE)
            .event(MarkEvent::new(
                dispatch,
                EventDatum::new(Some(series), key, x),
            ))
            .build()
    }

    #[test]
    fn root_is_created_once() {
        let mut canvas = Canvas::new(100.0, 100.0);
        assert!(canvas.ensure_root(&[("chartbox", Point::new(15.0, 15.0))]));
        assert!(!canvas.ensure_root(&[("chartbox", Point::new(20.0, 15.0))]));
        assert_eq!(canvas.roots_created(), 1);
        let Some(root) = canvas.root() else {
            panic!("root missing");
        };
        assert_eq!(root.offset("chartbox"), Vec2::new(20.0, 15.0));
    }

    #[test]
    fn hover_fires_value_and_series_events() {
        let dispatch = Dispatch::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            EventKind::ValueMouseOver,
            EventKind::ValueMouseOut,
            EventKind::SeriesMouseOver,
            EventKind::SeriesMouseOut,
        ] {
            let log = Rc::clone(&log);
            dispatch.on(kind, move |kind, d| {
                log.borrow_mut().push((kind, d.key.clone()));
            });
        }
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.commit(
            vec![
                bar(&dispatch, "A", "x", 0.0),
                bar(&dispatch, "A", "y", 20.0),
            ],
            0.0,
        );

        canvas.pointer_move(Point::new(5.0, 5.0), 0.0);
        canvas.pointer_move(Point::new(6.0, 5.0), 0.0);
        canvas.pointer_move(Point::new(25.0, 5.0), 0.0);
        canvas.pointer_leave();

        let log = log.borrow();
        assert_eq!(
            *log,
            vec![
                (EventKind::ValueMouseOver, "x".to_owned()),
                (EventKind::SeriesMouseOver, "x".to_owned()),
                (EventKind::ValueMouseOut, "x".to_owned()),
                (EventKind::ValueMouseOver, "y".to_owned()),
                (EventKind::ValueMouseOut, "y".to_owned()),
                (EventKind::SeriesMouseOut, "y".to_owned()),
            ]
        );
    }

    #[test]
    fn click_reports_hit() {
        let dispatch = Dispatch::new();
        let clicked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&clicked);
        dispatch.on(EventKind::ValueClick, move |_, d| {
            *sink.borrow_mut() = Some(d.value);
        });
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.commit(vec![bar(&dispatch, "A", "y", 20.0)], 0.0);
        assert!(!canvas.click(Point::new(5.0, 5.0), 0.0));
        assert!(canvas.click(Point::new(25.0, 5.0), 0.0));
        assert_eq!(*clicked.borrow(), Some(20.0));
    }

    #[test]
    fn svg_output_drops_finished_exits() {
        let dispatch = Dispatch::new();
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.commit(vec![bar(&dispatch, "A", "x", 0.0)], 0.0);
        assert!(canvas.to_svg(0.0).contains("<rect"));
        canvas.commit(Vec::new(), 1.0);
        assert!(!canvas.to_svg(1.0).contains("<rect"));
        assert!(canvas.scene().is_empty());
    }
}
