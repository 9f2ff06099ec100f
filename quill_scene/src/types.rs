// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, capability masks, and the
//! [`Interactive`] trait host items implement.

use kurbo::Point;

/// Identifier for a node in a [`Scene`](crate::Scene).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a `NodeId`
/// still refers to a live node. Stale ids never alias a different live node
/// because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Bitmask describing which roles a scene item can act in.
///
/// Capabilities replace runtime type inspection: instead of asking "is this
/// node a toolbar?", a query asks whether the node advertises the toolbar bit.
///
/// The mask is open-ended. The scene crate defines no roles of its own; hosts
/// define theirs with [`Capabilities::from_bits`]:
///
/// ```
/// use quill_scene::Capabilities;
///
/// const TOOLBAR: Capabilities = Capabilities::from_bits(1 << 0);
/// const HANDLE: Capabilities = Capabilities::from_bits(1 << 1);
///
/// let caps = TOOLBAR | HANDLE;
/// assert!(caps.contains(TOOLBAR));
/// assert!(!Capabilities::empty().contains(HANDLE));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u64);

impl Capabilities {
    /// An empty mask (no roles).
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Construct a mask from raw bits. All bits are accepted.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Return the underlying bit representation.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns true if no bits are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every bit of `other` is set in `self`.
    ///
    /// An empty `other` is contained in every mask.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl core::ops::BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl core::ops::BitAnd for Capabilities {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// An item that can live in a [`Scene`](crate::Scene) and take part in queries.
///
/// Only [`position`](Self::position) is required. Shapes that are not points
/// (outlines, strokes, regions) override
/// [`distance_to_point`](Self::distance_to_point) so `near` queries measure
/// to their edge rather than to their anchor.
pub trait Interactive {
    /// Anchor position of the item in scene coordinates.
    fn position(&self) -> Point;

    /// Distance from `pt` to this item.
    ///
    /// Defaults to the Euclidean distance from [`position`](Self::position).
    fn distance_to_point(&self, pt: Point) -> f64 {
        self.position().distance(pt)
    }

    /// Distance from `pt` to the centre of this item.
    ///
    /// Defaults to the Euclidean distance from [`position`](Self::position).
    fn center_distance_to_point(&self, pt: Point) -> f64 {
        self.position().distance(pt)
    }

    /// Roles this item can act in.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }
}

impl Interactive for Point {
    fn position(&self) -> Point {
        *self
    }
}
