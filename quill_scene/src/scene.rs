// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene arena: ownership from parent to children, parents as plain ids.

use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::types::NodeId;

/// Inline capacity of the traversal stack; deeper scenes spill to the heap.
const STACK_INLINE: usize = 16;

#[derive(Clone, Debug)]
struct Node<T> {
    item: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// A hierarchy of interactive items stored in an arena.
///
/// Nodes are addressed by generational [`NodeId`]s. Children are kept in
/// insertion order, which is the order queries visit them in. Parent links are
/// plain ids and never own anything.
///
/// The scene is built and mutated by host code. Dispatch borrows it immutably,
/// so it cannot change while a pass is running.
///
/// ```
/// use kurbo::Point;
/// use quill_scene::Scene;
///
/// let mut scene = Scene::new();
/// let group = scene.insert(None, Point::new(0.0, 0.0));
/// let a = scene.insert(Some(group), Point::new(10.0, 0.0));
/// let b = scene.insert(Some(group), Point::new(20.0, 0.0));
///
/// assert_eq!(scene.children_of(group), &[a, b]);
/// assert_eq!(scene.parent_of(b), Some(group));
///
/// scene.remove(group);
/// assert!(!scene.is_alive(a));
/// assert!(scene.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Scene<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    len: usize,
}

impl<T> Default for Scene<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scene<T> {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `item` as the last child of `parent`, or as a new top-level node.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a stale id, or if the arena outgrows `u32` slots.
    pub fn insert(&mut self, parent: Option<NodeId>, item: T) -> NodeId {
        if let Some(p) = parent {
            assert!(self.is_alive(p), "insert under a stale parent {p:?}");
        }
        let node = Node {
            item,
            parent,
            children: Vec::new(),
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("scene slot count exceeds u32");
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        };
        match parent {
            Some(p) => {
                if let Some(parent_node) = self.node_mut(p) {
                    parent_node.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.len += 1;
        id
    }

    /// Remove `id` and its whole subtree, returning the item stored at `id`.
    ///
    /// Returns `None` if `id` is stale.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let parent = self.node(id)?.parent;
        let siblings = match parent {
            Some(p) => self.node_mut(p).map(|n| &mut n.children),
            None => Some(&mut self.roots),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|c| *c != id);
        }

        let mut stack: SmallVec<[NodeId; STACK_INLINE]> = SmallVec::new();
        if let Some(n) = self.node(id) {
            stack.extend(n.children.iter().copied());
        }
        while let Some(child) = stack.pop() {
            if let Some(node) = self.take(child) {
                stack.extend(node.children);
            }
        }
        self.take(id).map(|n| n.item)
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Borrow the item stored at `id`.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|n| &n.item)
    }

    /// Mutably borrow the item stored at `id`.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|n| &mut n.item)
    }

    /// Parent of `id`, or `None` for top-level or stale nodes.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order. Empty for stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Top-level nodes in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Every live node in pre-order.
    pub fn iter(&self) -> Preorder<'_, T> {
        Preorder::new(self, &self.roots, true)
    }

    /// Descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Preorder<'_, T> {
        Preorder::new(self, self.children_of(id), true)
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    fn take(&mut self, id: NodeId) -> Option<Node<T>> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        let node = slot.node.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node)
    }
}

/// Pre-order iterator over a scene, children in insertion order.
///
/// Created by [`Scene::iter`] and [`Scene::descendants`]; queries use the
/// same walk so their visiting order is identical.
#[derive(Debug)]
pub struct Preorder<'s, T> {
    scene: &'s Scene<T>,
    stack: SmallVec<[NodeId; STACK_INLINE]>,
    recursive: bool,
}

impl<'s, T> Preorder<'s, T> {
    pub(crate) fn new(scene: &'s Scene<T>, top: &[NodeId], recursive: bool) -> Self {
        let mut stack = SmallVec::new();
        stack.extend(top.iter().rev().copied());
        Self {
            scene,
            stack,
            recursive,
        }
    }
}

impl<'s, T> Iterator for Preorder<'s, T> {
    type Item = (NodeId, &'s T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.scene.node(id) else {
                continue;
            };
            if self.recursive {
                self.stack.extend(node.children.iter().rev().copied());
            }
            return Some((id, &node.item));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn ids<T>(it: Preorder<'_, T>) -> Vec<NodeId> {
        it.map(|(id, _)| id).collect()
    }

    #[test]
    fn insert_keeps_children_in_order() {
        let mut scene = Scene::new();
        let root = scene.insert(None, 0);
        let a = scene.insert(Some(root), 1);
        let b = scene.insert(Some(root), 2);
        let c = scene.insert(Some(a), 3);

        assert_eq!(scene.len(), 4);
        assert_eq!(scene.children_of(root), &[a, b]);
        assert_eq!(scene.parent_of(c), Some(a));
        assert_eq!(scene.parent_of(root), None);
        assert_eq!(scene.roots(), &[root]);
    }

    #[test]
    fn iteration_is_preorder() {
        let mut scene = Scene::new();
        let r1 = scene.insert(None, "r1");
        let a = scene.insert(Some(r1), "a");
        let a1 = scene.insert(Some(a), "a1");
        let b = scene.insert(Some(r1), "b");
        let r2 = scene.insert(None, "r2");

        assert_eq!(ids(scene.iter()), vec![r1, a, a1, b, r2]);
        assert_eq!(ids(scene.descendants(r1)), vec![a, a1, b]);
        let names: Vec<_> = scene.iter().map(|(_, n)| *n).collect();
        assert_eq!(names, vec!["r1", "a", "a1", "b", "r2"]);
    }

    #[test]
    fn remove_drops_subtree_and_detaches() {
        let mut scene = Scene::new();
        let root = scene.insert(None, 0);
        let a = scene.insert(Some(root), 1);
        let a1 = scene.insert(Some(a), 2);
        let b = scene.insert(Some(root), 3);

        assert_eq!(scene.remove(a), Some(1));
        assert!(!scene.is_alive(a), "removed node is stale");
        assert!(!scene.is_alive(a1), "descendants are removed too");
        assert_eq!(scene.children_of(root), &[b]);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.remove(a), None, "second remove is a no-op");
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut scene = Scene::new();
        let a = scene.insert(None, 1);
        scene.remove(a);
        let b = scene.insert(None, 2);

        assert_eq!(a.idx(), b.idx(), "slot is reused");
        assert_ne!(a, b, "reused slot yields a new id");
        assert_eq!(scene.get(a), None);
        assert_eq!(scene.get(b), Some(&2));
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut scene = Scene::new();
        let a = scene.insert(None, 1);
        if let Some(v) = scene.get_mut(a) {
            *v = 7;
        }
        assert_eq!(scene.get(a), Some(&7));
    }

    #[test]
    #[should_panic(expected = "stale parent")]
    fn insert_under_stale_parent_panics() {
        let mut scene = Scene::new();
        let a = scene.insert(None, 1);
        scene.remove(a);
        scene.insert(Some(a), 2);
    }
}
