// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained elements and keyed reconciliation.
//!
//! A [`Scene`] holds one [`Element`] per live [`MarkId`] in an arena. Each render pass hands the
//! scene a fresh set of marks; [`Scene::tick`] joins them against the arena by id:
//!
//! - ids not in the arena enter, animating from the mark's enter state,
//! - ids already in the arena update, animating from whatever is currently displayed,
//! - arena ids missing from the pass exit, fading to transparent before removal.
//!
//! Elements are never matched by position, so reordering data keeps identities intact.

use hashbrown::{HashMap, HashSet};
use kurbo::Point;

use crate::dispatch::MarkEvent;
use crate::ease::Transition;
use crate::id::MarkId;
use crate::mark::{Mark, MarkKind, MarkPayload};

/// Where an element is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Animating in after first appearing.
    Entering,
    /// Animating toward a new target.
    Updating,
    /// At rest on its target.
    Present,
    /// Fading out; removed once the fade completes.
    Exiting,
}

/// A retained visual element.
#[derive(Clone, Debug)]
pub struct Element {
    /// Stable identity.
    pub id: MarkId,
    /// Creation order; unchanged by updates and revivals.
    pub serial: u64,
    /// Paint order.
    pub z_index: i32,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
    /// Class name for SVG output.
    pub class: &'static str,
    /// Semantic event fired on pointer interaction.
    pub event: Option<MarkEvent>,
    from: MarkPayload,
    to: MarkPayload,
    start: f64,
    transition: Transition,
}

impl Element {
    /// The displayed state at `now`.
    pub fn sample(&self, now: f64) -> MarkPayload {
        let t = self.transition.progress(now - self.start);
        self.from.lerp(&self.to, t)
    }

    /// The state the element is animating toward.
    pub fn target(&self) -> &MarkPayload {
        &self.to
    }

    /// The kind of the target geometry.
    pub fn kind(&self) -> MarkKind {
        self.to.kind()
    }

    /// Whether the current transition has completed at `now`.
    pub fn is_settled(&self, now: f64) -> bool {
        self.transition.is_finished(now - self.start)
    }

    fn retarget(&mut self, to: MarkPayload, transition: Transition, now: f64) -> MarkPayload {
        let current = self.sample(now);
        self.from = current.clone();
        self.to = to;
        self.start = now;
        self.transition = transition;
        current
    }
}

/// One change produced by reconciliation.
#[derive(Clone, Debug)]
pub enum MarkDiff {
    /// A new element appeared.
    Enter {
        /// Element id.
        id: MarkId,
        /// Geometry kind.
        kind: MarkKind,
        /// Creation serial.
        serial: u64,
        /// State the element animates from.
        from: Box<MarkPayload>,
        /// Target state.
        to: Box<MarkPayload>,
    },
    /// An existing element got a new target.
    Update {
        /// Element id.
        id: MarkId,
        /// Geometry kind of the new target.
        kind: MarkKind,
        /// Creation serial.
        serial: u64,
        /// Whether the element was exiting and has been brought back.
        revived: bool,
        /// The displayed state when the update began.
        from: Box<MarkPayload>,
        /// Target state.
        to: Box<MarkPayload>,
    },
    /// An element is no longer bound and is fading out.
    Exit {
        /// Element id.
        id: MarkId,
        /// Geometry kind.
        kind: MarkKind,
        /// Creation serial.
        serial: u64,
        /// The displayed state when the exit began.
        from: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// Id of the affected element.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }

    /// Whether this is an enter.
    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter { .. })
    }

    /// Whether this is an update.
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update { .. })
    }

    /// Whether this is an exit.
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }
}

/// A sampled element, ready to serialize.
#[derive(Clone, Debug)]
pub struct SceneItem {
    /// Element id.
    pub id: MarkId,
    /// Paint order.
    pub z_index: i32,
    /// Class name.
    pub class: &'static str,
    /// Displayed state.
    pub payload: MarkPayload,
}

/// The retained element arena.
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Option<Element>>,
    free: Vec<usize>,
    index: HashMap<MarkId, usize>,
    next_serial: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live elements, including exiting ones.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the scene holds no elements.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Looks up an element.
    pub fn get(&self, id: MarkId) -> Option<&Element> {
        self.index
            .get(&id)
            .and_then(|&slot| self.slots.get(slot))
            .and_then(Option::as_ref)
    }

    /// Iterates live elements in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Reconciles a render pass against the retained elements.
    ///
    /// When several marks share an id the last one wins.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>, now: f64) -> Vec<MarkDiff> {
        let mut pass: Vec<Mark> = Vec::new();
        let mut positions: HashMap<MarkId, usize> = HashMap::new();
        for mark in marks {
            if let Some(&at) = positions.get(&mark.id) {
                tracing::warn!(id = ?mark.id, "duplicate mark id in one pass; keeping the last");
                pass[at] = mark;
            } else {
                positions.insert(mark.id, pass.len());
                pass.push(mark);
            }
        }

        let mut diffs = Vec::with_capacity(pass.len());
        let mut seen: HashSet<MarkId> = HashSet::with_capacity(pass.len());
        for mark in pass {
            seen.insert(mark.id);
            match self.index.get(&mark.id).copied() {
                Some(slot) => {
                    let Some(element) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
                        continue;
                    };
                    let revived = element.lifecycle == Lifecycle::Exiting;
                    let kind = mark.kind();
                    let to = mark.payload.clone();
                    let from = element.retarget(mark.payload, mark.transition, now);
                    element.lifecycle = Lifecycle::Updating;
                    element.z_index = mark.z_index;
                    element.class = mark.class;
                    element.event = mark.event;
                    diffs.push(MarkDiff::Update {
                        id: mark.id,
                        kind,
                        serial: element.serial,
                        revived,
                        from: Box::new(from),
                        to: Box::new(to),
                    });
                }
                None => {
                    let serial = self.next_serial;
                    self.next_serial += 1;
                    let from = mark.enter_state();
                    diffs.push(MarkDiff::Enter {
                        id: mark.id,
                        kind: mark.kind(),
                        serial,
                        from: Box::new(from.clone()),
                        to: Box::new(mark.payload.clone()),
                    });
                    self.insert(Element {
                        id: mark.id,
                        serial,
                        z_index: mark.z_index,
                        lifecycle: Lifecycle::Entering,
                        class: mark.class,
                        event: mark.event,
                        from,
                        to: mark.payload,
                        start: now,
                        transition: mark.transition,
                    });
                }
            }
        }

        for element in self.slots.iter_mut().filter_map(Option::as_mut) {
            if seen.contains(&element.id) || element.lifecycle == Lifecycle::Exiting {
                continue;
            }
            let current = element.sample(now);
            let faded = current.with_opacity(0.0);
            let transition = element.transition;
            element.retarget(faded, transition, now);
            element.lifecycle = Lifecycle::Exiting;
            diffs.push(MarkDiff::Exit {
                id: element.id,
                kind: element.kind(),
                serial: element.serial,
                from: Box::new(current),
            });
        }

        diffs
    }

    fn insert(&mut self, element: Element) {
        let id = element.id;
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(element);
                slot
            }
            None => {
                self.slots.push(Some(element));
                self.slots.len() - 1
            }
        };
        self.index.insert(id, slot);
    }

    /// Settles finished transitions and removes elements whose exit has completed.
    ///
    /// Returns the number of removed elements.
    pub fn advance(&mut self, now: f64) -> usize {
        let mut removed = 0;
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            let Some(element) = entry else {
                continue;
            };
            if !element.is_settled(now) {
                continue;
            }
            match element.lifecycle {
                Lifecycle::Exiting => {
                    self.index.remove(&element.id);
                    *entry = None;
                    self.free.push(slot);
                    removed += 1;
                }
                Lifecycle::Entering | Lifecycle::Updating => {
                    element.lifecycle = Lifecycle::Present;
                }
                Lifecycle::Present => {}
            }
        }
        removed
    }

    /// Whether every element is at rest at `now`.
    pub fn is_settled(&self, now: f64) -> bool {
        self.iter().all(|e| e.is_settled(now))
    }

    /// Samples every element at `now`, in paint order.
    pub fn items(&self, now: f64) -> Vec<SceneItem> {
        let mut items: Vec<SceneItem> = self
            .iter()
            .map(|e| SceneItem {
                id: e.id,
                z_index: e.z_index,
                class: e.class,
                payload: e.sample(now),
            })
            .collect();
        items.sort_by_key(|item| (item.z_index, item.id));
        items
    }

    /// The topmost interactive element under `p` at `now`.
    ///
    /// Only elements carrying an event are candidates; exiting elements are ignored.
    pub fn hit_test(&self, p: Point, now: f64) -> Option<&Element> {
        self.iter()
            .filter(|e| e.event.is_some() && e.lifecycle != Lifecycle::Exiting)
            .filter(|e| e.sample(now).contains(p))
            .max_by_key(|e| (e.z_index, e.id))
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::dispatch::{Dispatch, EventDatum};
    use crate::mark::Shape;

    fn bar(key: &str, height: f64) -> Mark {
        let x = f64::from(u8::try_from(key.len()).unwrap_or(0)) * 10.0;
        Mark::builder(MarkId::keyed("bars").child(key))
            .rect(Rect::new(x, 100.0 - height, x + 8.0, 100.0))
            .enter(Shape::Rect(Rect::new(x, 100.0, x + 8.0, 100.0)))
            .transition(Transition::new(1.0, crate::Ease::Linear))
            .build()
    }

    #[test]
    fn enter_update_exit_by_key() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![bar("a", 10.0), bar("bb", 20.0)], 0.0);
        assert_eq!(diffs.iter().filter(|d| d.is_enter()).count(), 2);

        let diffs = scene.tick(vec![bar("bb", 30.0), bar("ccc", 5.0)], 2.0);
        assert_eq!(diffs.iter().filter(|d| d.is_enter()).count(), 1);
        assert_eq!(diffs.iter().filter(|d| d.is_update()).count(), 1);
        assert_eq!(diffs.iter().filter(|d| d.is_exit()).count(), 1);

        // The exiting bar stays until its fade completes.
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.advance(3.0), 1);
        assert_eq!(scene.len(), 2);
        assert!(scene.get(MarkId::keyed("bars").child("a")).is_none());
    }

    #[test]
    fn serials_survive_reordering() {
        let mut scene = Scene::new();
        scene.tick(vec![bar("a", 10.0), bar("bb", 20.0)], 0.0);
        let serial = |scene: &Scene, key: &str| {
            scene
                .get(MarkId::keyed("bars").child(key))
                .map(|e| e.serial)
        };
        let before = (serial(&scene, "a"), serial(&scene, "bb"));
        scene.tick(vec![bar("bb", 20.0), bar("a", 10.0)], 1.0);
        assert_eq!((serial(&scene, "a"), serial(&scene, "bb")), before);
    }

    #[test]
    fn update_starts_from_displayed_state() {
        let mut scene = Scene::new();
        scene.tick(vec![bar("a", 100.0)], 0.0);
        // Halfway through the enter animation the bar is 50 tall.
        let diffs = scene.tick(vec![bar("a", 0.0)], 0.5);
        let Some(MarkDiff::Update { from, .. }) = diffs.first() else {
            panic!("expected an update");
        };
        let Shape::Rect(rect) = from.shape else {
            panic!("expected a rect");
        };
        assert!((rect.height() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn exiting_key_is_revived() {
        let mut scene = Scene::new();
        scene.tick(vec![bar("a", 10.0)], 0.0);
        let serial = scene.iter().next().map(|e| e.serial);
        scene.tick(Vec::new(), 1.0);
        let diffs = scene.tick(vec![bar("a", 10.0)], 1.2);
        assert!(matches!(
            diffs.first(),
            Some(MarkDiff::Update { revived: true, .. })
        ));
        assert_eq!(scene.iter().next().map(|e| e.serial), serial);
        scene.advance(10.0);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn duplicate_ids_keep_the_last_mark() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![bar("a", 10.0), bar("a", 40.0)], 0.0);
        assert_eq!(diffs.len(), 1);
        let Some(element) = scene.get(MarkId::keyed("bars").child("a")) else {
            panic!("missing element");
        };
        let Shape::Rect(rect) = element.target().shape else {
            panic!("expected a rect");
        };
        assert!((rect.height() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn hit_test_prefers_higher_z() {
        let dispatch = Dispatch::new();
        let event = |key: &str| crate::MarkEvent::new(&dispatch, EventDatum::new(None, key, 1.0));
        let low = Mark::builder(MarkId::from_raw(1))
            .rect(Rect::new(0.0, 0.0, 10.0, 10.0))
            .transition(Transition::NONE)
            .event(event("low"))
            .build();
        let high = Mark::builder(MarkId::from_raw(2))
            .rect(Rect::new(5.0, 5.0, 15.0, 15.0))
            .z_index(5)
            .transition(Transition::NONE)
            .event(event("high"))
            .build();
        let mut scene = Scene::new();
        scene.tick(vec![high, low], 0.0);
        let hit = scene.hit_test(Point::new(7.0, 7.0), 0.0);
        assert_eq!(hit.map(|e| e.id), Some(MarkId::from_raw(2)));
        let hit = scene.hit_test(Point::new(2.0, 2.0), 0.0);
        assert_eq!(hit.map(|e| e.id), Some(MarkId::from_raw(1)));
        assert!(scene.hit_test(Point::new(50.0, 50.0), 0.0).is_none());
    }
}
