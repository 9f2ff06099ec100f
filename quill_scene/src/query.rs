// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial and capability queries: `find` and `find_all`.
//!
//! A [`Query`] names what to look for (a capability mask or a predicate over
//! the item), optionally where (`near` a point, within `too_far`), and how far
//! down the tree to look (`recursive`). An extra `that` predicate can refine
//! matches using the node id, for example to exclude the node a gesture is
//! already holding.
//!
//! ## Resolution
//!
//! - Candidates are visited in pre-order, children in insertion order.
//! - Without `near`, [`Scene::find`] returns the first match.
//! - With `near`, it returns the match with the smallest distance; ties keep
//!   the earlier node in pre-order.
//! - [`Scene::find_all`] returns every match in pre-order.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use quill_scene::{Query, Scene};
//!
//! let mut scene = Scene::new();
//! let far = scene.insert(None, Point::new(100.0, 0.0));
//! let near = scene.insert(None, Point::new(10.0, 0.0));
//!
//! let query = Query::any().near(Point::ORIGIN).too_far(50.0);
//! let found = scene.find(&query).unwrap();
//! assert_eq!(found.id, near);
//! assert_eq!(found.distance, Some(10.0));
//!
//! // Nothing is within 5 units.
//! assert!(scene.find(&Query::any().near(Point::ORIGIN).too_far(5.0)).is_none());
//! # let _ = far;
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

use crate::scene::{Preorder, Scene};
use crate::types::{Capabilities, Interactive, NodeId};

/// Which distance a `near` query measures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// [`Interactive::distance_to_point`]: distance to the item's edge.
    #[default]
    Edge,
    /// [`Interactive::center_distance_to_point`]: distance to the item's centre.
    Center,
}

/// What a query looks for.
pub enum What<'a, T> {
    /// Items whose [`Interactive::capabilities`] contain every bit of the mask.
    Capable(Capabilities),
    /// Items for which the predicate holds.
    Matching(Box<dyn Fn(&T) -> bool + 'a>),
}

impl<T> fmt::Debug for What<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capable(caps) => f.debug_tuple("Capable").field(caps).finish(),
            Self::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

/// A `find`/`find_all` request.
///
/// Build one with [`Query::capable`], [`Query::matching`], or [`Query::any`],
/// then refine it with the builder methods. Queries are read-only and can be
/// reused across calls.
pub struct Query<'a, T> {
    what: What<'a, T>,
    near: Option<Point>,
    too_far: f64,
    recursive: bool,
    that: Option<Box<dyn Fn(NodeId, &T) -> bool + 'a>>,
    metric: Metric,
}

impl<T> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("what", &self.what)
            .field("near", &self.near)
            .field("too_far", &self.too_far)
            .field("recursive", &self.recursive)
            .field("that", &self.that.as_ref().map(|_| ".."))
            .field("metric", &self.metric)
            .finish()
    }
}

impl<'a, T> Query<'a, T> {
    fn with_what(what: What<'a, T>) -> Self {
        Self {
            what,
            near: None,
            too_far: f64::INFINITY,
            recursive: true,
            that: None,
            metric: Metric::Edge,
        }
    }

    /// Look for items advertising every bit of `caps`.
    pub fn capable(caps: Capabilities) -> Self {
        Self::with_what(What::Capable(caps))
    }

    /// Look for items for which `pred` holds.
    pub fn matching(pred: impl Fn(&T) -> bool + 'a) -> Self {
        Self::with_what(What::Matching(Box::new(pred)))
    }

    /// Look for any item.
    pub fn any() -> Self {
        Self::capable(Capabilities::empty())
    }

    /// Rank matches by distance to `pt`.
    #[must_use]
    pub fn near(mut self, pt: Point) -> Self {
        self.near = Some(pt);
        self
    }

    /// Reject matches farther than `limit` from the `near` point.
    ///
    /// The limit is inclusive. It has no effect without [`near`](Self::near).
    #[must_use]
    pub fn too_far(mut self, limit: f64) -> Self {
        self.too_far = limit;
        self
    }

    /// Visit the whole subtree (`true`, the default) or direct children only.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Require an extra predicate over the node id and item.
    #[must_use]
    pub fn that(mut self, pred: impl Fn(NodeId, &T) -> bool + 'a) -> Self {
        self.that = Some(Box::new(pred));
        self
    }

    /// Choose which distance `near` measures.
    #[must_use]
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// The `near` point, if any.
    pub fn near_point(&self) -> Option<Point> {
        self.near
    }
}

impl<T: Interactive> Query<'_, T> {
    /// Test a single candidate.
    ///
    /// Returns `None` when it does not match, otherwise `Some(distance)`
    /// where the distance is present only for `near` queries.
    fn test(&self, id: NodeId, item: &T) -> Option<Option<f64>> {
        let wanted = match &self.what {
            What::Capable(caps) => item.capabilities().contains(*caps),
            What::Matching(pred) => pred(item),
        };
        if !wanted {
            return None;
        }
        let distance = match self.near {
            Some(pt) => {
                let d = match self.metric {
                    Metric::Edge => item.distance_to_point(pt),
                    Metric::Center => item.center_distance_to_point(pt),
                };
                // Written so NaN never matches.
                if !(d <= self.too_far) {
                    return None;
                }
                Some(d)
            }
            None => None,
        };
        if let Some(that) = &self.that
            && !that(id, item)
        {
            return None;
        }
        Some(distance)
    }
}

/// A query match.
#[derive(Debug)]
pub struct Found<'s, T> {
    /// The matching node.
    pub id: NodeId,
    /// The item stored at [`id`](Self::id).
    pub item: &'s T,
    /// Distance to the `near` point, when the query had one.
    pub distance: Option<f64>,
}

impl<T> Clone for Found<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Found<'_, T> {}

impl<T: Interactive> Scene<T> {
    /// Find the best match anywhere in the scene, starting from the top level.
    ///
    /// See the [module docs](crate::query) for resolution rules.
    pub fn find(&self, query: &Query<'_, T>) -> Option<Found<'_, T>> {
        resolve(Preorder::new(self, self.roots(), query.recursive), query)
    }

    /// Find the best match among the descendants of `scope`.
    ///
    /// `scope` itself is never a candidate. Returns `None` for stale scopes.
    pub fn find_in(&self, scope: NodeId, query: &Query<'_, T>) -> Option<Found<'_, T>> {
        resolve(
            Preorder::new(self, self.children_of(scope), query.recursive),
            query,
        )
    }

    /// Every match in the scene, in pre-order.
    pub fn find_all(&self, query: &Query<'_, T>) -> Vec<Found<'_, T>> {
        collect(Preorder::new(self, self.roots(), query.recursive), query)
    }

    /// Every match among the descendants of `scope`, in pre-order.
    pub fn find_all_in(&self, scope: NodeId, query: &Query<'_, T>) -> Vec<Found<'_, T>> {
        collect(
            Preorder::new(self, self.children_of(scope), query.recursive),
            query,
        )
    }
}

fn resolve<'s, T: Interactive>(
    candidates: Preorder<'s, T>,
    query: &Query<'_, T>,
) -> Option<Found<'s, T>> {
    let mut best: Option<Found<'s, T>> = None;
    for (id, item) in candidates {
        let Some(distance) = query.test(id, item) else {
            continue;
        };
        let found = Found { id, item, distance };
        let Some(d) = distance else {
            // No `near`: first pre-order match wins.
            return Some(found);
        };
        match best.and_then(|b| b.distance) {
            // Strictly closer only, so ties keep the earlier node.
            Some(best_d) if d >= best_d => {}
            _ => best = Some(found),
        }
    }
    best
}

fn collect<'s, T: Interactive>(
    candidates: Preorder<'s, T>,
    query: &Query<'_, T>,
) -> Vec<Found<'s, T>> {
    candidates
        .filter_map(|(id, item)| {
            query
                .test(id, item)
                .map(|distance| Found { id, item, distance })
        })
        .collect()
}
