// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recognizer registry: an ordered list of functions deciding who claims a
//! fresh touch.
//!
//! ## Priority
//!
//! Registration order is the only precedence mechanism. When a touch begins,
//! recognizers are asked in order and the first one returning a [`Gesture`]
//! wins; later recognizers are not consulted. There is no separate "stop
//! propagation" call: a recognizer that must block lower-priority ones
//! registers earlier and returns a gesture (possibly with no handlers)
//! whenever its own test matches.
//!
//! ## Multi-touch coordination
//!
//! Each touch gets its own binding. Gestures that need a second finger share
//! correlation state outside the binding, usually an `Rc<RefCell<_>>` captured
//! by both the first gesture's handlers and a later recognizer that checks it
//! when the second finger begins.
//!
//! ```
//! use quill_gesture::{Gesture, Recognizers};
//! use quill_scene::{Capabilities, Query};
//!
//! const BLOCK: Capabilities = Capabilities::from_bits(1 << 0);
//!
//! let mut recognizers: Recognizers<kurbo::Point, ()> = Recognizers::new();
//! recognizers
//!     .push("block-zone", |ctx| {
//!         let query = Query::capable(BLOCK).near(ctx.position()).too_far(20.0);
//!         Ok(ctx.find(&query).map(|_| Gesture::new("block")))
//!     })
//!     .push("tap", |_| Ok(Some(Gesture::new("tap"))));
//!
//! assert_eq!(recognizers.names().collect::<Vec<_>>(), ["block-zone", "tap"]);
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::context::EventContext;
use crate::gesture::Gesture;

/// What a recognizer returns: a gesture, nothing, or a failure.
pub type Recognition<T, H> = Result<Option<Gesture<T, H>>, RecognizerError>;

/// A recognizer function.
pub type RecognizerFn<T, H> = Box<dyn Fn(&EventContext<'_, T, H>) -> Recognition<T, H>>;

/// A recognizer that could not decide.
///
/// The dispatcher fails closed: the touch stays unbound and lower-priority
/// recognizers are not consulted for it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RecognizerError {
    message: Cow<'static, str>,
}

impl RecognizerError {
    /// A failure described by `message`.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One registered recognizer.
pub struct Recognizer<T, H> {
    name: Cow<'static, str>,
    recognize: RecognizerFn<T, H>,
}

impl<T, H> fmt::Debug for Recognizer<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T, H> Recognizer<T, H> {
    /// The name it was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_cow(&self) -> &Cow<'static, str> {
        &self.name
    }

    pub(crate) fn recognize(&self, ctx: &EventContext<'_, T, H>) -> Recognition<T, H> {
        (self.recognize)(ctx)
    }
}

/// Recognizers in priority order, highest first.
pub struct Recognizers<T, H> {
    entries: Vec<Recognizer<T, H>>,
}

impl<T, H> fmt::Debug for Recognizers<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<T, H> Default for Recognizers<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H> Recognizers<T, H> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `recognize` with the lowest priority so far.
    pub fn push<F>(&mut self, name: impl Into<Cow<'static, str>>, recognize: F) -> &mut Self
    where
        F: Fn(&EventContext<'_, T, H>) -> Recognition<T, H> + 'static,
    {
        self.entries.push(Recognizer {
            name: name.into(),
            recognize: Box::new(recognize),
        });
        self
    }

    /// Number of registered recognizers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(Recognizer::name)
    }

    /// Recognizers in priority order.
    pub fn iter(&self) -> core::slice::Iter<'_, Recognizer<T, H>> {
        self.entries.iter()
    }
}

impl<'r, T, H> IntoIterator for &'r Recognizers<T, H> {
    type Item = &'r Recognizer<T, H>;
    type IntoIter = core::slice::Iter<'r, Recognizer<T, H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
