// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene primitives for `ezviz`.
//!
//! This crate is the layer below the chart components:
//! - **Marks** are stable-identity visual elements (rect, arc, circle, polyline, path, text)
//!   with a target state, an optional enter state and a transition.
//! - **Scene** reconciles successive mark sets by [`MarkId`] into enter/update/exit diffs and
//!   samples in-flight transitions at an explicit time.
//! - **Canvas** is the persistent render target: it owns a scene, remembers whether its root
//!   layers were created, routes pointer input to semantic events and serializes to SVG.
//!
//! Time is always supplied by the host as seconds (`now: f64`); nothing here sleeps or
//! spawns.

mod canvas;
mod dispatch;
mod ease;
mod id;
mod mark;
mod scene;
pub mod svg;

pub use canvas::{Canvas, CanvasRoot, Layer};
pub use dispatch::{Dispatch, EventDatum, EventKind, MarkEvent};
pub use ease::{Ease, Transition};
pub use id::MarkId;
pub use mark::{
    ArcShape, Curve, Mark, MarkBuilder, MarkKind, MarkPayload, Paint, Shape, TextAnchor,
    TextBaseline, TextShape,
};
pub use scene::{Element, Lifecycle, MarkDiff, Scene, SceneItem};
