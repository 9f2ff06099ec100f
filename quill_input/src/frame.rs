// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame batches of raw samples.
//!
//! A frame driver collects everything the platform reported since the last
//! frame into a [`Frame`] and hands it to dispatch in one go. Samples keep
//! their arrival order across touches; a per-touch view is a filter over it.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::event::RawSample;
use crate::types::TouchId;

/// Few contacts are down at once.
const TOUCHES_INLINE: usize = 8;

/// One frame's worth of raw samples, in arrival order.
///
/// ```
/// use quill_input::{Frame, Phase, PointerKind, RawSample, TouchId};
///
/// let mut frame = Frame::new();
/// frame.push(TouchId(2), RawSample::new(PointerKind::Finger, Phase::Began, 0.0, 0.0, 16));
/// frame.push(TouchId(1), RawSample::new(PointerKind::Pencil, Phase::Moved, 5.0, 5.0, 16));
/// frame.push(TouchId(2), RawSample::new(PointerKind::Finger, Phase::Moved, 1.0, 0.0, 17));
///
/// let order: Vec<_> = frame.samples().map(|(id, s)| (id, s.phase)).collect();
/// assert_eq!(order, vec![
///     (TouchId(2), Some(Phase::Began)),
///     (TouchId(1), Some(Phase::Moved)),
///     (TouchId(2), Some(Phase::Moved)),
/// ]);
/// assert_eq!(frame.touches().collect::<Vec<_>>(), [TouchId(2), TouchId(1)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Frame {
    samples: Vec<(TouchId, RawSample)>,
    touches: SmallVec<[TouchId; TOUCHES_INLINE]>,
}

impl Frame {
    /// An empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample for `id`.
    pub fn push(&mut self, id: TouchId, sample: RawSample) {
        if !self.touches.contains(&id) {
            self.touches.push(id);
        }
        self.samples.push((id, sample));
    }

    /// Number of distinct touches in the frame.
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    /// Number of samples in the frame.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no samples were pushed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct touches in first-arrival order.
    pub fn touches(&self) -> impl Iterator<Item = TouchId> + '_ {
        self.touches.iter().copied()
    }

    /// Samples for one touch in arrival order, empty if it did not report
    /// this frame.
    pub fn samples_for(&self, id: TouchId) -> impl Iterator<Item = &RawSample> + '_ {
        self.samples
            .iter()
            .filter(move |(t, _)| *t == id)
            .map(|(_, sample)| sample)
    }

    /// Every sample in arrival order, which is dispatch order.
    pub fn samples(&self) -> impl Iterator<Item = (TouchId, &RawSample)> + '_ {
        self.samples.iter().map(|(id, sample)| (*id, sample))
    }

    /// Remove every sample, keeping the allocation.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.touches.clear();
    }
}

impl Extend<(TouchId, RawSample)> for Frame {
    fn extend<I: IntoIterator<Item = (TouchId, RawSample)>>(&mut self, iter: I) {
        for (id, sample) in iter {
            self.push(id, sample);
        }
    }
}

impl FromIterator<(TouchId, RawSample)> for Frame {
    fn from_iter<I: IntoIterator<Item = (TouchId, RawSample)>>(iter: I) -> Self {
        let mut frame = Self::new();
        frame.extend(iter);
        frame
    }
}
