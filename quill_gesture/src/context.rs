// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The value every recognizer and lifecycle handler receives.

use kurbo::Point;
use quill_input::{Event, PointerKind, TouchId};
use quill_scene::{Found, Interactive, Query, Scene};

use crate::state::BindingState;

/// Per-call bundle: the current sample, the scene, the binding's state, and the
/// host's singletons.
///
/// A context is rebuilt for every call. Only [`state`](Self::state) carries
/// over between calls for the same touch.
///
/// Recognizers see `&EventContext` and may read everything, including the
/// host. Lifecycle handlers see `&mut EventContext` and may update the state
/// and the host. The scene is always shared; it cannot change during a pass.
pub struct EventContext<'a, T, H> {
    /// The sample being dispatched.
    pub event: &'a Event,
    /// The scene recognizers query.
    pub scene: &'a Scene<T>,
    /// State owned by this touch's binding.
    pub state: &'a mut BindingState,
    /// Host singletons, forwarded untouched.
    pub host: &'a mut H,
}

impl<T, H> core::fmt::Debug for EventContext<'_, T, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventContext")
            .field("event", self.event)
            .field("scene_len", &self.scene.len())
            .field("state", &*self.state)
            .finish_non_exhaustive()
    }
}

impl<'a, T, H> EventContext<'a, T, H> {
    pub(crate) fn new(
        event: &'a Event,
        scene: &'a Scene<T>,
        state: &'a mut BindingState,
        host: &'a mut H,
    ) -> Self {
        Self {
            event,
            scene,
            state,
            host,
        }
    }

    /// Id of the touch being dispatched.
    pub fn id(&self) -> TouchId {
        self.event.id
    }

    /// Kind of the touch being dispatched.
    pub fn kind(&self) -> PointerKind {
        self.event.kind
    }

    /// Position of the current sample.
    pub fn position(&self) -> Point {
        self.event.position
    }

    /// Returns `true` if other qualifying touches were live when this one began.
    pub fn pseudo(&self) -> bool {
        self.state.pseudo()
    }

    /// How many other qualifying touches were live when this one began.
    pub fn pseudo_count(&self) -> usize {
        self.state.pseudo_count()
    }
}

impl<'a, T: Interactive, H> EventContext<'a, T, H> {
    /// Run a `find` over the scene.
    ///
    /// The result borrows the scene, not the context, so handlers can keep it
    /// while updating [`state`](Self::state).
    pub fn find(&self, query: &Query<'_, T>) -> Option<Found<'a, T>> {
        self.scene.find(query)
    }

    /// Run a `find_all` over the scene.
    pub fn find_all(&self, query: &Query<'_, T>) -> alloc::vec::Vec<Found<'a, T>> {
        self.scene.find_all(query)
    }
}
