// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatcher: one binding state machine per live touch.
//!
//! Every touch id runs its own machine, independent of the others:
//!
//! - **Unbound + `Began`**: build fresh [`BindingState`], ask the recognizers in
//!   order, bind the first gesture returned and call its `began`. If nobody
//!   claims the touch it stays unbound and the sample is dropped.
//! - **Bound + `Moved`**: add the step to `drag_dist`, apply the gesture's drag
//!   threshold if it has one, call `moved`.
//! - **Bound + `Ended`**: record the release position as a final step (with
//!   the same drag threshold check), then call `endedDrag` if the binding is
//!   dragging and the gesture handles it, otherwise `ended`; then drop the
//!   binding.
//! - **Bound + `Cancelled`** (or [`Dispatcher::cancel`]): call `cancelled`,
//!   then drop the binding.
//! - **Unbound + anything else**: ignored.
//! - **Bound + `Began`**: ignored; a touch is never bound twice.
//!
//! A binding is removed from the dispatcher before its terminal handler runs
//! and is consumed by that call, so every binding sees exactly one terminal
//! lifecycle.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use quill_gesture::{Dispatcher, Gesture, Lifecycle, Outcome, Recognizers};
//! use quill_input::{Event, Phase, PointerKind, TouchId};
//! use quill_scene::Scene;
//!
//! #[derive(Default)]
//! struct Host {
//!     log: Vec<&'static str>,
//! }
//!
//! let mut recognizers = Recognizers::new();
//! recognizers.push("tap", |_| {
//!     Ok(Some(
//!         Gesture::<Point, Host>::new("tap")
//!             .began(|ctx| ctx.host.log.push("began"))
//!             .ended(|ctx| ctx.host.log.push("ended")),
//!     ))
//! });
//! let mut dispatcher = Dispatcher::new(recognizers);
//! let scene = Scene::new();
//! let mut host = Host::default();
//!
//! let at = |phase, t| Event::new(PointerKind::Finger, phase, TouchId(1), Point::new(4.0, 4.0), t);
//! dispatcher.dispatch(&at(Phase::Began, 0), &scene, &mut host).unwrap();
//! assert!(dispatcher.is_bound(TouchId(1)));
//!
//! let outcome = dispatcher.dispatch(&at(Phase::Ended, 16), &scene, &mut host).unwrap();
//! assert_eq!(outcome, Outcome::Finished(Lifecycle::Ended));
//! assert_eq!(host.log, ["began", "ended"]);
//! assert!(!dispatcher.is_bound(TouchId(1)));
//! ```

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use quill_input::{Event, Frame, Phase, PointerKind, TouchId};
use quill_scene::Scene;

use crate::config::DispatchConfig;
use crate::context::EventContext;
use crate::error::DispatchError;
use crate::gesture::{Gesture, Lifecycle};
use crate::recognizer::Recognizers;
use crate::state::BindingState;

/// What dispatching one sample did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A recognizer claimed the touch and its gesture is now bound.
    Claimed {
        /// Name of the bound gesture.
        gesture: Cow<'static, str>,
        /// Registry index of the recognizer that produced it.
        recognizer: usize,
    },
    /// No recognizer claimed the touch. It stays unbound.
    Unclaimed,
    /// A non-terminal lifecycle was delivered to the bound gesture.
    Delivered(Lifecycle),
    /// The terminal lifecycle that ended the binding.
    Finished(Lifecycle),
    /// The sample did not apply to the touch's current state.
    Ignored(IgnoreReason),
}

/// Why a sample was ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// `Moved`, `Ended`, or `Cancelled` for a touch with no binding.
    Unbound,
    /// `Began` for a touch that is already bound.
    AlreadyBound,
}

/// Everything [`Dispatcher::dispatch_frame`] did with one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Outcome of every sample that was dispatched, in dispatch order.
    pub outcomes: Vec<(TouchId, Outcome)>,
    /// Samples that were dropped, in dispatch order.
    pub errors: Vec<DispatchError>,
}

impl FrameReport {
    /// Returns `true` if nothing was dropped.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Touches claimed during the frame.
    pub fn claimed(&self) -> impl Iterator<Item = TouchId> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Claimed { .. }))
            .map(|(id, _)| *id)
    }
}

/// A touch that has begun and not yet ended, bound or not.
#[derive(Copy, Clone, Debug)]
struct LiveTouch {
    kind: PointerKind,
    began_at: u64,
}

struct Binding<T, H> {
    gesture: Gesture<T, H>,
    state: BindingState,
}

impl<T, H> fmt::Debug for Binding<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("gesture", &self.gesture)
            .field("state", &self.state)
            .finish()
    }
}

impl<T, H> Binding<T, H> {
    /// Record `event` as the next step, then apply the gesture's threshold.
    fn track(&mut self, event: &Event) {
        self.state.update(event.position, event.timestamp);
        if let Some(threshold) = self.gesture.drag_threshold()
            && self.state.dragged_beyond(threshold)
        {
            self.state.mark_dragging();
        }
    }

    /// Deliver the terminal call. Consumes the binding.
    fn terminate(
        mut self,
        lifecycle: Lifecycle,
        event: &Event,
        scene: &Scene<T>,
        host: &mut H,
    ) -> Lifecycle {
        debug_assert!(lifecycle.is_terminal(), "{lifecycle} is not terminal");
        let mut ctx = EventContext::new(event, scene, &mut self.state, host);
        self.gesture.invoke(lifecycle, &mut ctx);
        tracing::debug!(
            id = %event.id,
            gesture = %self.gesture.name(),
            lifecycle = %lifecycle,
            drag_dist = self.state.drag_dist(),
            "touch released"
        );
        lifecycle
    }
}

/// Routes touch samples to gestures.
///
/// `T` is the scene item type recognizers query; `H` is the host's singleton
/// bundle, forwarded untouched to every recognizer and handler.
///
/// A touch stays live until its `Ended` or `Cancelled` sample arrives, and
/// live touches count towards the pseudo count of touches that begin later.
/// Hosts whose input source can lose a contact without reporting it must call
/// [`cancel`](Self::cancel) for that id.
pub struct Dispatcher<T, H> {
    recognizers: Recognizers<T, H>,
    bindings: HashMap<TouchId, Binding<T, H>>,
    live: HashMap<TouchId, LiveTouch>,
    config: DispatchConfig,
}

impl<T, H> fmt::Debug for Dispatcher<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("recognizers", &self.recognizers)
            .field("bindings", &self.bindings)
            .field("live", &self.live)
            .field("config", &self.config)
            .finish()
    }
}

impl<T, H> Dispatcher<T, H> {
    /// A dispatcher over `recognizers` with the default configuration.
    pub fn new(recognizers: Recognizers<T, H>) -> Self {
        Self::with_config(recognizers, DispatchConfig::default())
    }

    /// A dispatcher over `recognizers` with `config`.
    pub fn with_config(recognizers: Recognizers<T, H>, config: DispatchConfig) -> Self {
        Self {
            recognizers,
            bindings: HashMap::new(),
            live: HashMap::new(),
            config,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The recognizer registry.
    pub fn recognizers(&self) -> &Recognizers<T, H> {
        &self.recognizers
    }

    /// Dispatch one normalized sample.
    ///
    /// Errors are per-sample: the dispatcher stays consistent and other touches
    /// are unaffected.
    pub fn dispatch(
        &mut self,
        event: &Event,
        scene: &Scene<T>,
        host: &mut H,
    ) -> Result<Outcome, DispatchError> {
        match event.phase {
            Phase::Began => self.begin(event, scene, host),
            Phase::Moved => Ok(self.advance(event, scene, host)),
            Phase::Ended => Ok(self.release(event, scene, host, false)),
            Phase::Cancelled => Ok(self.release(event, scene, host, true)),
        }
    }

    /// Normalize and dispatch every sample of `frame`, in frame order.
    ///
    /// Malformed samples and recognizer failures are collected in the report;
    /// the rest of the frame is still dispatched.
    pub fn dispatch_frame(&mut self, frame: &Frame, scene: &Scene<T>, host: &mut H) -> FrameReport {
        let mut report = FrameReport::default();
        for (id, raw) in frame.samples() {
            let event = match Event::try_from_raw(id, raw) {
                Ok(event) => event,
                Err(malformed) => {
                    tracing::warn!(id = %id, reason = %malformed.reason, "dropping malformed sample");
                    report.errors.push(malformed.into());
                    continue;
                }
            };
            match self.dispatch(&event, scene, host) {
                Ok(outcome) => report.outcomes.push((id, outcome)),
                Err(err) => report.errors.push(err),
            }
        }
        report
    }

    /// Cancel the binding for `id`, delivering `cancelled`.
    ///
    /// Returns `true` if a binding was cancelled. Also forgets `id` as a live
    /// touch, bound or not, so it no longer counts as a pseudo touch.
    pub fn cancel(&mut self, id: TouchId, scene: &Scene<T>, host: &mut H) -> bool {
        self.live.remove(&id);
        let Some(binding) = self.bindings.remove(&id) else {
            return false;
        };
        let event = Event::new(
            binding.state.kind(),
            Phase::Cancelled,
            id,
            binding.state.position(),
            binding.state.last_timestamp(),
        );
        binding.terminate(Lifecycle::Cancelled, &event, scene, host);
        true
    }

    /// Cancel every binding, in ascending id order, and forget all live
    /// touches. Returns how many bindings were cancelled.
    pub fn cancel_all(&mut self, scene: &Scene<T>, host: &mut H) -> usize {
        let mut cancelled = 0;
        for id in self.bound_ids() {
            if self.cancel(id, scene, host) {
                cancelled += 1;
            }
        }
        self.live.clear();
        cancelled
    }

    /// Returns `true` if `id` is bound.
    pub fn is_bound(&self, id: TouchId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Name of the gesture bound to `id`.
    pub fn gesture_of(&self, id: TouchId) -> Option<&str> {
        self.bindings.get(&id).map(|b| b.gesture.name())
    }

    /// State of the binding for `id`.
    pub fn state_of(&self, id: TouchId) -> Option<&BindingState> {
        self.bindings.get(&id).map(|b| &b.state)
    }

    /// Bound ids in ascending order.
    pub fn bound_ids(&self) -> Vec<TouchId> {
        let mut ids: Vec<_> = self.bindings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of live bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if `id` has begun and not yet ended, bound or not.
    pub fn is_live(&self, id: TouchId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of touches that have begun and not yet ended, bound or not.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn begin(
        &mut self,
        event: &Event,
        scene: &Scene<T>,
        host: &mut H,
    ) -> Result<Outcome, DispatchError> {
        if self.bindings.contains_key(&event.id) {
            tracing::trace!(id = %event.id, "began for a bound touch ignored");
            return Ok(Outcome::Ignored(IgnoreReason::AlreadyBound));
        }

        let pseudo_count = self.pseudo_count(event);
        self.live.insert(
            event.id,
            LiveTouch {
                kind: event.kind,
                began_at: event.timestamp,
            },
        );
        let mut state = BindingState::begin(event, pseudo_count);

        let mut claimed = None;
        {
            let ctx = EventContext::new(event, scene, &mut state, host);
            for (index, recognizer) in self.recognizers.iter().enumerate() {
                match recognizer.recognize(&ctx) {
                    Ok(Some(gesture)) => {
                        claimed = Some((index, gesture));
                        break;
                    }
                    Ok(None) => {}
                    Err(source) => {
                        tracing::warn!(
                            id = %event.id,
                            recognizer = %recognizer.name(),
                            error = %source,
                            "recognizer failed; touch left unbound"
                        );
                        return Err(DispatchError::RecognizerFailure {
                            id: event.id,
                            recognizer: recognizer.name_cow().clone(),
                            source,
                        });
                    }
                }
            }
        }

        let Some((recognizer, mut gesture)) = claimed else {
            tracing::trace!(id = %event.id, "touch unclaimed");
            return Ok(Outcome::Unclaimed);
        };
        gesture.invoke(
            Lifecycle::Began,
            &mut EventContext::new(event, scene, &mut state, host),
        );
        let name = gesture.name_cow().clone();
        tracing::debug!(
            id = %event.id,
            gesture = %name,
            recognizer,
            pseudo_count,
            "touch bound"
        );
        self.bindings.insert(event.id, Binding { gesture, state });
        Ok(Outcome::Claimed {
            gesture: name,
            recognizer,
        })
    }

    fn advance(&mut self, event: &Event, scene: &Scene<T>, host: &mut H) -> Outcome {
        let Some(binding) = self.bindings.get_mut(&event.id) else {
            tracing::trace!(id = %event.id, "moved for an unbound touch ignored");
            return Outcome::Ignored(IgnoreReason::Unbound);
        };
        binding.track(event);
        let mut ctx = EventContext::new(event, scene, &mut binding.state, host);
        binding.gesture.invoke(Lifecycle::Moved, &mut ctx);
        Outcome::Delivered(Lifecycle::Moved)
    }

    fn release(&mut self, event: &Event, scene: &Scene<T>, host: &mut H, cancelled: bool) -> Outcome {
        self.live.remove(&event.id);
        let Some(mut binding) = self.bindings.remove(&event.id) else {
            tracing::trace!(id = %event.id, phase = ?event.phase, "release for an unbound touch ignored");
            return Outcome::Ignored(IgnoreReason::Unbound);
        };
        let lifecycle = if cancelled {
            Lifecycle::Cancelled
        } else {
            binding.track(event);
            binding.gesture.release_for(binding.state.is_dragging())
        };
        Outcome::Finished(binding.terminate(lifecycle, event, scene, host))
    }

    /// Other live touches that count towards `event`'s pseudo count.
    fn pseudo_count(&self, event: &Event) -> usize {
        let pseudo = &self.config.pseudo;
        self.live
            .iter()
            .filter(|&(id, touch)| {
                *id != event.id
                    && pseudo.kinds.includes(touch.kind)
                    && pseudo
                        .max_age_ms
                        .is_none_or(|max| event.timestamp.saturating_sub(touch.began_at) <= max)
            })
            .count()
    }
}
