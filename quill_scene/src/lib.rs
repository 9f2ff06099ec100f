// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quill Scene: an arena scene graph with capability-aware spatial queries.
//!
//! Gesture recognizers on a pen/touch surface keep asking the same question:
//! "is there something near this touch that can act as X?". This crate holds
//! the interactive objects and answers that question deterministically.
//!
//! - [`Scene`]: a hierarchy of host items in an arena, addressed by
//!   generational [`NodeId`]s. Parents own their children; parent links are
//!   plain ids.
//! - [`Interactive`]: the trait host items implement: an anchor position, a
//!   distance function, and a [`Capabilities`] mask.
//! - [`Query`]: `find`/`find_all` requests (`what`, `near`, `too_far`,
//!   `recursive`, `that`) resolved in pre-order.
//! - [`Outline`]: a polyline/polygon whose distance is measured to its edges,
//!   so non-point shapes can be found by proximity.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use quill_scene::{Capabilities, Interactive, Query, Scene};
//!
//! const TOOLBAR: Capabilities = Capabilities::from_bits(1 << 0);
//!
//! struct Thing {
//!     at: Point,
//!     caps: Capabilities,
//! }
//!
//! impl Interactive for Thing {
//!     fn position(&self) -> Point {
//!         self.at
//!     }
//!     fn capabilities(&self) -> Capabilities {
//!         self.caps
//!     }
//! }
//!
//! let mut scene = Scene::new();
//! let toolbar = scene.insert(None, Thing { at: Point::new(100.0, 100.0), caps: TOOLBAR });
//! scene.insert(None, Thing { at: Point::new(110.0, 100.0), caps: Capabilities::empty() });
//!
//! let query = Query::capable(TOOLBAR).near(Point::new(120.0, 100.0)).too_far(50.0);
//! assert_eq!(scene.find(&query).map(|f| f.id), Some(toolbar));
//! ```
//!
//! Queries never mutate the scene. The scene is mutated by host code between
//! dispatch passes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod outline;
pub mod query;
mod scene;
mod types;

pub use outline::Outline;
pub use query::{Found, Metric, Query, What};
pub use scene::{Preorder, Scene};
pub use types::{Capabilities, Interactive, NodeId};
