// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher configuration.

use quill_input::PointerKinds;

/// How pseudo touches are counted.
///
/// When a touch begins, its `pseudo_count` is the number of *other* live
/// touches (bound or not) whose kind is in [`kinds`](Self::kinds) and, when
/// [`max_age_ms`](Self::max_age_ms) is set, which began at most that many
/// milliseconds earlier. A touch is pseudo when the count is non-zero.
///
/// The default counts held fingers of any age, so a finger resting on the
/// surface turns a pencil stroke (or a second finger) into a pseudo touch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PseudoConfig {
    /// Kinds of live touches that count.
    pub kinds: PointerKinds,
    /// Ignore live touches older than this.
    pub max_age_ms: Option<u64>,
}

impl Default for PseudoConfig {
    fn default() -> Self {
        Self {
            kinds: PointerKinds::FINGER,
            max_age_ms: None,
        }
    }
}

/// Dispatcher configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Pseudo-touch counting.
    pub pseudo: PseudoConfig,
}
