// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-binding state: drag distance, positions, pseudo-touch flags, and a
//! slot for the gesture's own data.
//!
//! One [`BindingState`] is created when a touch is claimed and handed to every
//! lifecycle call for that touch. Gesture handlers are separate synchronous
//! calls, so anything a gesture needs to remember between them lives here
//! (or in storage its recognizer closed over), never in a handler's locals.
//!
//! ## Drag distance
//!
//! `drag_dist` is the path length travelled since the binding was created:
//! every `Moved` sample, and the final `Ended` sample, adds the distance from
//! the previous position. It never decreases. There is no global drag
//! threshold; a gesture compares [`BindingState::drag_dist`] against its own,
//! and marks the binding as dragging (directly with
//! [`BindingState::mark_dragging`] or through
//! [`Gesture::drag_threshold`](crate::Gesture::drag_threshold)) so the release
//! is delivered as `EndedDrag` rather than `Ended`.
//!
//! ## Gesture data
//!
//! ```
//! # use quill_gesture::BindingState;
//! # fn demo(state: &mut BindingState) {
//! struct Grab {
//!     offset: f64,
//! }
//!
//! // In `began`:
//! state.set_data(Grab { offset: 4.0 });
//! // In `moved`:
//! if let Some(grab) = state.data_mut::<Grab>() {
//!     grab.offset += 1.0;
//! }
//! # }
//! ```

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use kurbo::{Point, Vec2};
use quill_input::{Event, PointerKind};

/// Mutable state owned by one binding.
pub struct BindingState {
    kind: PointerKind,
    start_position: Point,
    position: Point,
    previous_position: Point,
    drag_dist: f64,
    dragging: bool,
    began_at: u64,
    last_timestamp: u64,
    pseudo_count: usize,
    data: Option<Box<dyn Any>>,
}

impl fmt::Debug for BindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingState")
            .field("kind", &self.kind)
            .field("start_position", &self.start_position)
            .field("position", &self.position)
            .field("previous_position", &self.previous_position)
            .field("drag_dist", &self.drag_dist)
            .field("dragging", &self.dragging)
            .field("began_at", &self.began_at)
            .field("last_timestamp", &self.last_timestamp)
            .field("pseudo_count", &self.pseudo_count)
            .field("data", &self.data.is_some())
            .finish()
    }
}

impl BindingState {
    /// Fresh state for a touch beginning with `event`.
    pub(crate) fn begin(event: &Event, pseudo_count: usize) -> Self {
        Self {
            kind: event.kind,
            start_position: event.position,
            position: event.position,
            previous_position: event.position,
            drag_dist: 0.0,
            dragging: false,
            began_at: event.timestamp,
            last_timestamp: event.timestamp,
            pseudo_count,
            data: None,
        }
    }

    /// Record a move to `pos`, returning the distance it added.
    pub(crate) fn update(&mut self, pos: Point, timestamp: u64) -> f64 {
        let step = self.position.distance(pos);
        self.previous_position = self.position;
        self.position = pos;
        // `drag_dist` must never decrease, NaN included.
        if step > 0.0 {
            self.drag_dist += step;
        }
        self.last_timestamp = self.last_timestamp.max(timestamp);
        step
    }

    /// Kind of the contact that owns this binding.
    pub fn kind(&self) -> PointerKind {
        self.kind
    }

    /// Cumulative path length since the binding was created.
    pub fn drag_dist(&self) -> f64 {
        self.drag_dist
    }

    /// Returns `true` once the path length is strictly above `threshold`.
    pub fn dragged_beyond(&self, threshold: f64) -> bool {
        self.drag_dist > threshold
    }

    /// Position of the `Began` sample.
    pub fn start_position(&self) -> Point {
        self.start_position
    }

    /// Most recent position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position before the most recent move.
    pub fn previous_position(&self) -> Point {
        self.previous_position
    }

    /// Movement of the most recent move.
    pub fn last_delta(&self) -> Vec2 {
        self.position - self.previous_position
    }

    /// Straight-line offset from the start position.
    pub fn total_offset(&self) -> Vec2 {
        self.position - self.start_position
    }

    /// Timestamp of the `Began` sample.
    pub fn began_at(&self) -> u64 {
        self.began_at
    }

    /// Timestamp of the latest sample.
    pub fn last_timestamp(&self) -> u64 {
        self.last_timestamp
    }

    /// Milliseconds between `Began` and the latest sample.
    pub fn elapsed_ms(&self) -> u64 {
        self.last_timestamp - self.began_at
    }

    /// Returns `true` if other qualifying touches were live when this one began.
    pub fn pseudo(&self) -> bool {
        self.pseudo_count > 0
    }

    /// How many other qualifying touches were live when this one began.
    pub fn pseudo_count(&self) -> usize {
        self.pseudo_count
    }

    /// Returns `true` once the binding has been marked as a drag.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Mark this binding as a drag, so its release is `EndedDrag`.
    ///
    /// There is no way back: once dragging, always dragging.
    pub fn mark_dragging(&mut self) {
        self.dragging = true;
    }

    /// Store the gesture's own data, replacing anything stored before.
    pub fn set_data<D: Any>(&mut self, data: D) {
        self.data = Some(Box::new(data));
    }

    /// Borrow the stored data if it is a `D`.
    pub fn data<D: Any>(&self) -> Option<&D> {
        self.data.as_deref()?.downcast_ref()
    }

    /// Mutably borrow the stored data if it is a `D`.
    pub fn data_mut<D: Any>(&mut self) -> Option<&mut D> {
        self.data.as_deref_mut()?.downcast_mut()
    }

    /// Take the stored data out if it is a `D`; other types are left in place.
    pub fn take_data<D: Any>(&mut self) -> Option<D> {
        match self.data.take()?.downcast::<D>() {
            Ok(data) => Some(*data),
            Err(other) => {
                self.data = Some(other);
                None
            }
        }
    }
}
