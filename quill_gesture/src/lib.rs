// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quill Gesture: deterministic touch-to-gesture dispatch.
//!
//! Every touch on a pen/touch surface is claimed by at most one gesture. When
//! a touch begins, an ordered list of recognizers inspects it (its position,
//! its kind, the scene around it, the other touches currently down) and the
//! first one that wants it returns a [`Gesture`]. From then on the gesture
//! alone receives that touch's `began`, `moved` and exactly one terminal call
//! (`ended`, `endedDrag`, or `cancelled`).
//!
//! - [`Recognizers`]: the ordered registry. Registration order is priority.
//! - [`Gesture`]: a named set of lifecycle handlers, with an optional drag
//!   threshold.
//! - [`Dispatcher`]: one binding state machine per live touch, fed with
//!   [`Event`](quill_input::Event)s or whole [`Frame`](quill_input::Frame)s.
//! - [`EventContext`]: what recognizers and handlers see: the sample, the
//!   [`Scene`](quill_scene::Scene), the binding's [`BindingState`], and the
//!   host's singletons.
//!
//! ## Example
//!
//! A pencil draws unless it starts near a toolbar, in which case the toolbar
//! gesture claims it first.
//!
//! ```
//! use kurbo::Point;
//! use quill_gesture::{Dispatcher, Gesture, Outcome, Recognizers};
//! use quill_input::{Event, Phase, PointerKind, TouchId};
//! use quill_scene::{Capabilities, Interactive, Query, Scene};
//!
//! const TOOLBAR: Capabilities = Capabilities::from_bits(1 << 0);
//!
//! struct Item(Point, Capabilities);
//!
//! impl Interactive for Item {
//!     fn position(&self) -> Point {
//!         self.0
//!     }
//!     fn capabilities(&self) -> Capabilities {
//!         self.1
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Canvas {
//!     strokes: Vec<Vec<Point>>,
//!     toolbar_taps: u32,
//! }
//!
//! let mut recognizers: Recognizers<Item, Canvas> = Recognizers::new();
//! recognizers
//!     .push("toolbar", |ctx| {
//!         let near = Query::capable(TOOLBAR).near(ctx.position()).too_far(50.0);
//!         Ok(ctx
//!             .find(&near)
//!             .map(|_| Gesture::<Item, Canvas>::new("toolbar").ended(|ctx| ctx.host.toolbar_taps += 1)))
//!     })
//!     .push("draw", |ctx| {
//!         if ctx.kind() != PointerKind::Pencil {
//!             return Ok(None);
//!         }
//!         Ok(Some(
//!             Gesture::<Item, Canvas>::new("draw")
//!                 .began(|ctx| ctx.host.strokes.push(vec![ctx.event.position]))
//!                 .moved(|ctx| {
//!                     let at = ctx.event.position;
//!                     if let Some(stroke) = ctx.host.strokes.last_mut() {
//!                         stroke.push(at);
//!                     }
//!                 }),
//!         ))
//!     });
//!
//! let mut scene = Scene::new();
//! scene.insert(None, Item(Point::new(100.0, 100.0), TOOLBAR));
//! let mut canvas = Canvas::default();
//! let mut dispatcher = Dispatcher::new(recognizers);
//!
//! let pencil = |phase, id, x, t| {
//!     Event::new(PointerKind::Pencil, phase, TouchId(id), Point::new(x, 300.0), t)
//! };
//! let outcome = dispatcher.dispatch(&pencil(Phase::Began, 1, 10.0, 0), &scene, &mut canvas)?;
//! assert!(matches!(outcome, Outcome::Claimed { recognizer: 1, .. }));
//! dispatcher.dispatch(&pencil(Phase::Moved, 1, 20.0, 8), &scene, &mut canvas)?;
//! dispatcher.dispatch(&pencil(Phase::Ended, 1, 20.0, 16), &scene, &mut canvas)?;
//!
//! assert_eq!(canvas.strokes, [vec![Point::new(10.0, 300.0), Point::new(20.0, 300.0)]]);
//! assert_eq!(dispatcher.binding_count(), 0);
//! # Ok::<(), quill_gesture::DispatchError>(())
//! ```
//!
//! ## Determinism
//!
//! Dispatch is single-threaded and synchronous. Given the same scene, the same
//! recognizers and the same sample sequence, the same gestures bind and the
//! same handlers run in the same order.
//!
//! ## Logging
//!
//! Bind, release, unclaimed touches, and dropped samples are reported with
//! [`tracing`] events under this crate's target. No subscriber is installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod context;
pub mod dispatcher;
mod error;
mod gesture;
pub mod recognizer;
mod state;

pub use config::{DispatchConfig, PseudoConfig};
pub use context::EventContext;
pub use dispatcher::{Dispatcher, FrameReport, IgnoreReason, Outcome};
pub use error::DispatchError;
pub use gesture::{Gesture, Handler, Lifecycle};
pub use recognizer::{Recognition, Recognizer, RecognizerError, RecognizerFn, Recognizers};
pub use state::BindingState;
