// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by dispatch.

use alloc::borrow::Cow;

use quill_input::{MalformedEvent, TouchId};

use crate::recognizer::RecognizerError;

/// A sample that dispatch could not act on.
///
/// Neither variant is fatal: the affected sample is dropped, other touches
/// are unaffected, and the host decides whether to surface it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// A raw sample could not be normalized.
    #[error(transparent)]
    Malformed(#[from] MalformedEvent),
    /// A recognizer failed while a touch began. The touch was left unbound.
    #[error("recognizer `{recognizer}` failed for touch {id}: {source}")]
    RecognizerFailure {
        /// The touch that began.
        id: TouchId,
        /// Name of the failing recognizer.
        recognizer: Cow<'static, str>,
        /// What it reported.
        source: RecognizerError,
    },
}

impl DispatchError {
    /// The touch the error concerns.
    pub fn id(&self) -> TouchId {
        match self {
            Self::Malformed(m) => m.id,
            Self::RecognizerFailure { id, .. } => *id,
        }
    }
}
