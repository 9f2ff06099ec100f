// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quill Input: normalized pen/touch samples and per-frame batches.
//!
//! This crate defines the input vocabulary the gesture dispatcher consumes:
//!
//! - [`Event`]: an immutable, normalized sample `{kind, phase, id, position,
//!   pressure, timestamp}`.
//! - [`RawSample`]: what a platform layer reports, with every field that can be
//!   missing kept optional.
//! - [`Event::try_from_raw`]: normalization, failing with [`MalformedEvent`].
//! - [`Frame`]: one frame's batch of raw samples in arrival order.
//!
//! It knows nothing about scenes or gestures. Platform glue (winit, web
//! pointer events, `UITouch`) fills a [`Frame`]; `quill_gesture` dispatches it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod event;
mod frame;
mod types;

pub use event::{Event, MalformedEvent, MalformedReason, RawSample};
pub use frame::Frame;
pub use types::{Phase, PointerKind, PointerKinds, TouchId};
