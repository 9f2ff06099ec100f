// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers and enumerations shared by samples and events.

use core::fmt;

/// Identifier of one touch or pencil contact, stable from `Began` to its end.
///
/// Platform layers reuse ids after a contact ends; a reused id starts a fresh
/// contact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TouchId(pub u64);

impl fmt::Display for TouchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What produced a sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A finger on the surface.
    Finger,
    /// A pencil or stylus tip.
    Pencil,
}

bitflags::bitflags! {
    /// A set of [`PointerKind`]s.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointerKinds: u8 {
        /// Fingers.
        const FINGER = 0b0000_0001;
        /// Pencils.
        const PENCIL = 0b0000_0010;
    }
}

impl PointerKinds {
    /// Returns `true` if `kind` is in the set.
    pub fn includes(self, kind: PointerKind) -> bool {
        self.contains(kind.into())
    }
}

impl From<PointerKind> for PointerKinds {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Finger => Self::FINGER,
            PointerKind::Pencil => Self::PENCIL,
        }
    }
}

/// Lifecycle phase of a sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The contact touched down.
    Began,
    /// The contact moved.
    Moved,
    /// The contact lifted.
    Ended,
    /// The input source lost the contact.
    Cancelled,
}

impl Phase {
    /// Returns `true` for phases that end a contact.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn kinds_include() {
        let fingers = PointerKinds::FINGER;
        assert!(fingers.includes(PointerKind::Finger), "finger in finger set");
        assert!(!fingers.includes(PointerKind::Pencil), "pencil not in finger set");
        assert!(PointerKinds::all().includes(PointerKind::Pencil), "all includes pencil");
    }

    #[test]
    fn terminal_phases() {
        assert!(Phase::Ended.is_terminal(), "ended is terminal");
        assert!(Phase::Cancelled.is_terminal(), "cancelled is terminal");
        assert!(!Phase::Began.is_terminal(), "began is not terminal");
        assert!(!Phase::Moved.is_terminal(), "moved is not terminal");
    }

    #[test]
    fn touch_id_display() {
        assert_eq!(format!("{}", TouchId(7)), "#7");
    }
}
