// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named semantic events.
//!
//! Components fire value and series events through a [`Dispatch`]; applications subscribe with
//! [`Dispatch::on`]. A dispatch handle is cheap to clone and clones share subscribers, so a chart
//! can hand its dispatch to every component it hosts.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// The semantic events a component may fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer entered a value element.
    ValueMouseOver,
    /// Pointer left a value element.
    ValueMouseOut,
    /// A value element was clicked.
    ValueClick,
    /// Pointer entered a series group.
    SeriesMouseOver,
    /// Pointer left a series group.
    SeriesMouseOut,
    /// A series group was clicked.
    SeriesClick,
}

/// The datum an event reports.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDatum {
    /// Key of the series the element belongs to, if any.
    pub series: Option<String>,
    /// Category key (or series key for series-level elements).
    pub key: String,
    /// Value bound to the element.
    pub value: f64,
}

impl EventDatum {
    /// Creates a datum.
    pub fn new(series: Option<&str>, key: impl Into<String>, value: f64) -> Self {
        Self {
            series: series.map(str::to_owned),
            key: key.into(),
            value,
        }
    }
}

type Handler = Rc<dyn Fn(EventKind, &EventDatum)>;

#[derive(Default)]
struct Subscribers {
    handlers: HashMap<EventKind, SmallVec<[(Option<String>, Handler); 2]>>,
}

/// A shared event dispatcher.
#[derive(Clone, Default)]
pub struct Dispatch {
    inner: Rc<RefCell<Subscribers>>,
}

impl Dispatch {
    /// Creates a dispatcher with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes an anonymous handler.
    pub fn on(&self, kind: EventKind, handler: impl Fn(EventKind, &EventDatum) + 'static) {
        self.inner
            .borrow_mut()
            .handlers
            .entry(kind)
            .or_default()
            .push((None, Rc::new(handler)));
    }

    /// Subscribes a named handler, replacing any handler with the same name for `kind`.
    pub fn on_named(
        &self,
        kind: EventKind,
        name: &str,
        handler: impl Fn(EventKind, &EventDatum) + 'static,
    ) {
        let mut inner = self.inner.borrow_mut();
        let list = inner.handlers.entry(kind).or_default();
        list.retain(|(n, _)| n.as_deref() != Some(name));
        list.push((Some(name.to_owned()), Rc::new(handler)));
    }

    /// Removes the named handler for `kind`.
    pub fn off_named(&self, kind: EventKind, name: &str) {
        if let Some(list) = self.inner.borrow_mut().handlers.get_mut(&kind) {
            list.retain(|(n, _)| n.as_deref() != Some(name));
        }
    }

    /// Removes every handler for `kind`.
    pub fn off(&self, kind: EventKind) {
        self.inner.borrow_mut().handlers.remove(&kind);
    }

    /// Number of handlers subscribed to `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(&kind)
            .map_or(0, SmallVec::len)
    }

    /// Invokes every handler subscribed to `kind`.
    ///
    /// Handlers are cloned out before invocation, so a handler may subscribe or unsubscribe.
    pub fn call(&self, kind: EventKind, datum: &EventDatum) {
        let handlers: SmallVec<[Handler; 2]> = match self.inner.borrow().handlers.get(&kind) {
            Some(list) => list.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return,
        };
        for handler in handlers {
            handler(kind, datum);
        }
    }

    /// Whether two handles share subscribers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut map = f.debug_map();
        for (kind, list) in &inner.handlers {
            map.entry(kind, &list.len());
        }
        map.finish()
    }
}

/// An event attached to a mark: where to fire it, and what to report.
#[derive(Clone, Debug)]
pub struct MarkEvent {
    /// Dispatcher of the component that emitted the mark.
    pub dispatch: Dispatch,
    /// Reported datum.
    pub datum: EventDatum,
}

impl MarkEvent {
    /// Creates a mark event.
    pub fn new(dispatch: &Dispatch, datum: EventDatum) -> Self {
        Self {
            dispatch: dispatch.clone(),
            datum,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn handlers_receive_datum() {
        let dispatch = Dispatch::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        dispatch.on(EventKind::ValueClick, move |_, d| {
            sink.borrow_mut().push(d.key.clone());
        });
        dispatch.call(
            EventKind::ValueClick,
            &EventDatum::new(Some("Fruit"), "Apples", 3.0),
        );
        dispatch.call(
            EventKind::ValueMouseOver,
            &EventDatum::new(None, "ignored", 0.0),
        );
        assert_eq!(*seen.borrow(), vec!["Apples".to_owned()]);
    }

    #[test]
    fn named_handlers_replace_each_other() {
        let dispatch = Dispatch::new();
        dispatch.on_named(EventKind::SeriesClick, "tooltip", |_, _| {});
        dispatch.on_named(EventKind::SeriesClick, "tooltip", |_, _| {});
        assert_eq!(dispatch.handler_count(EventKind::SeriesClick), 1);
        dispatch.off_named(EventKind::SeriesClick, "tooltip");
        assert_eq!(dispatch.handler_count(EventKind::SeriesClick), 0);
    }

    #[test]
    fn handler_may_subscribe_during_call() {
        let dispatch = Dispatch::new();
        let inner = dispatch.clone();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        dispatch.on(EventKind::ValueMouseOver, move |_, _| {
            c.set(c.get() + 1);
            inner.on(EventKind::ValueMouseOut, |_, _| {});
        });
        let datum = EventDatum::new(None, "a", 1.0);
        dispatch.call(EventKind::ValueMouseOver, &datum);
        assert_eq!(count.get(), 1);
        assert_eq!(dispatch.handler_count(EventKind::ValueMouseOut), 1);
    }

    #[test]
    fn clones_share_subscribers() {
        let a = Dispatch::new();
        let b = a.clone();
        b.on(EventKind::ValueClick, |_, _| {});
        assert!(a.ptr_eq(&b));
        assert_eq!(a.handler_count(EventKind::ValueClick), 1);
    }
}
