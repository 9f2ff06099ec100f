// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gestures: named, immutable sets of lifecycle handlers.
//!
//! A recognizer produces a [`Gesture`] when it wants a fresh touch. The
//! dispatcher then owns it for the lifetime of that touch and calls its
//! handlers as samples arrive. Handlers that are not set are no-ops, and a
//! gesture with no handlers at all is a valid way to claim a touch and ignore
//! it (a veto over lower-priority recognizers).
//!
//! ```
//! use quill_gesture::{Gesture, Lifecycle};
//!
//! struct Host {
//!     taps: u32,
//!     drags: u32,
//! }
//!
//! let gesture = Gesture::<kurbo::Point, Host>::new("tap-or-drag")
//!     .with_drag_threshold(10.0)
//!     .ended(|ctx| ctx.host.taps += 1)
//!     .ended_drag(|ctx| ctx.host.drags += 1);
//!
//! assert!(gesture.has(Lifecycle::EndedDrag));
//! assert!(!gesture.has(Lifecycle::Moved));
//!
//! let veto: Gesture<kurbo::Point, Host> = Gesture::new("block");
//! assert!(veto.is_empty());
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;

use crate::context::EventContext;

const LIFECYCLE_COUNT: usize = 5;

/// The lifecycle calls a gesture can handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// The touch was claimed by this gesture.
    Began,
    /// The touch moved.
    Moved,
    /// The touch lifted without being marked as a drag.
    Ended,
    /// The touch lifted after being marked as a drag.
    EndedDrag,
    /// The input source lost the touch, or the host cancelled it.
    Cancelled,
}

impl Lifecycle {
    /// Every lifecycle, in the order a touch can see them.
    pub const ALL: [Self; LIFECYCLE_COUNT] = [
        Self::Began,
        Self::Moved,
        Self::Ended,
        Self::EndedDrag,
        Self::Cancelled,
    ];

    /// Returns `true` for calls that end a binding.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::EndedDrag | Self::Cancelled)
    }

    /// Handler name, as used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Began => "began",
            Self::Moved => "moved",
            Self::Ended => "ended",
            Self::EndedDrag => "endedDrag",
            Self::Cancelled => "cancelled",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lifecycle callback.
pub type Handler<T, H> = Box<dyn FnMut(&mut EventContext<'_, T, H>)>;

/// A named set of lifecycle handlers bound to one touch.
///
/// Build it with [`Gesture::new`] and the handler methods; once a recognizer
/// returns it, it cannot change.
pub struct Gesture<T, H> {
    name: Cow<'static, str>,
    handlers: [Option<Handler<T, H>>; LIFECYCLE_COUNT],
    drag_threshold: Option<f64>,
}

impl<T, H> fmt::Debug for Gesture<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Present<'g, T, H>(&'g Gesture<T, H>);

        impl<T, H> fmt::Debug for Present<'_, T, H> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set()
                    .entries(Lifecycle::ALL.into_iter().filter(|l| self.0.has(*l)))
                    .finish()
            }
        }

        f.debug_struct("Gesture")
            .field("name", &self.name)
            .field("handlers", &Present(self))
            .field("drag_threshold", &self.drag_threshold)
            .finish()
    }
}

impl<T, H> Gesture<T, H> {
    /// A gesture with no handlers.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            handlers: core::array::from_fn(|_| None),
            drag_threshold: None,
        }
    }

    /// Set the handler for `lifecycle`, replacing any previous one.
    #[must_use]
    pub fn on<F>(mut self, lifecycle: Lifecycle, handler: F) -> Self
    where
        F: FnMut(&mut EventContext<'_, T, H>) + 'static,
    {
        self.handlers[lifecycle.index()] = Some(Box::new(handler));
        self
    }

    /// Set the [`Lifecycle::Began`] handler.
    #[must_use]
    pub fn began<F>(self, handler: F) -> Self
    where
        F: FnMut(&mut EventContext<'_, T, H>) + 'static,
    {
        self.on(Lifecycle::Began, handler)
    }

    /// Set the [`Lifecycle::Moved`] handler.
    #[must_use]
    pub fn moved<F>(self, handler: F) -> Self
    where
        F: FnMut(&mut EventContext<'_, T, H>) + 'static,
    {
        self.on(Lifecycle::Moved, handler)
    }

    /// Set the [`Lifecycle::Ended`] handler.
    #[must_use]
    pub fn ended<F>(self, handler: F) -> Self
    where
        F: FnMut(&mut EventContext<'_, T, H>) + 'static,
    {
        self.on(Lifecycle::Ended, handler)
    }

    /// Set the [`Lifecycle::EndedDrag`] handler.
    #[must_use]
    pub fn ended_drag<F>(self, handler: F) -> Self
    where
        F: FnMut(&mut EventContext<'_, T, H>) + 'static,
    {
        self.on(Lifecycle::EndedDrag, handler)
    }

    /// Set the [`Lifecycle::Cancelled`] handler.
    #[must_use]
    pub fn cancelled<F>(self, handler: F) -> Self
    where
        F: FnMut(&mut EventContext<'_, T, H>) + 'static,
    {
        self.on(Lifecycle::Cancelled, handler)
    }

    /// Mark the binding as dragging once its drag distance exceeds `threshold`.
    ///
    /// The check runs before the `Moved` handler sees the sample.
    #[must_use]
    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = Some(threshold);
        self
    }

    /// The gesture's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The drag threshold set with [`with_drag_threshold`](Self::with_drag_threshold).
    pub fn drag_threshold(&self) -> Option<f64> {
        self.drag_threshold
    }

    /// Returns `true` if a handler is set for `lifecycle`.
    pub fn has(&self, lifecycle: Lifecycle) -> bool {
        self.handlers[lifecycle.index()].is_some()
    }

    /// Returns `true` if no handler is set.
    pub fn is_empty(&self) -> bool {
        self.handlers.iter().all(Option::is_none)
    }

    pub(crate) fn name_cow(&self) -> &Cow<'static, str> {
        &self.name
    }

    /// Call the handler for `lifecycle`, returning whether one was set.
    pub(crate) fn invoke(&mut self, lifecycle: Lifecycle, ctx: &mut EventContext<'_, T, H>) -> bool {
        match &mut self.handlers[lifecycle.index()] {
            Some(handler) => {
                handler(ctx);
                true
            }
            None => false,
        }
    }

    /// The terminal lifecycle for a release, given whether the binding was
    /// marked as dragging.
    ///
    /// `EndedDrag` is chosen only when the binding is dragging *and* the
    /// gesture handles it; everything else resolves to `Ended`.
    pub(crate) fn release_for(&self, dragging: bool) -> Lifecycle {
        if dragging && self.has(Lifecycle::EndedDrag) {
            Lifecycle::EndedDrag
        } else {
            Lifecycle::Ended
        }
    }
}
