// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outline distance: let non-point shapes take part in `near` queries.
//!
//! An [`Outline`] is a polyline, optionally closed into a polygon. Its
//! distance to a point is the distance to the nearest edge, measured the same
//! way a stroked segment is hit-tested: nearest point on each segment, then the
//! minimum. This does not fill the interior; a point inside a closed outline
//! is as far from it as it is from the nearest edge.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, ParamCurveNearest, Point};

use crate::types::Interactive;

/// A polyline or polygon in scene coordinates.
///
/// ```
/// use kurbo::Point;
/// use quill_scene::{Interactive, Outline};
///
/// let square = Outline::closed(vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ]);
/// assert_eq!(square.distance_to_point(Point::new(5.0, -3.0)), 3.0);
/// assert_eq!(square.position(), Point::new(5.0, 5.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    points: Vec<Point>,
    closed: bool,
}

impl Outline {
    /// An open polyline through `points`.
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// A polygon through `points`; the last point connects back to the first.
    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// The vertices.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Whether the outline closes back on itself.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Iterate the outline's segments.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 2 => {
                Some(Line::new(last, first))
            }
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| Line::new(w[0], w[1]))
            .chain(closing)
    }

    /// Average of the vertices. The origin for an empty outline.
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::ORIGIN;
        }
        let sum = self
            .points
            .iter()
            .fold(kurbo::Vec2::ZERO, |acc, p| acc + p.to_vec2());
        (sum / self.points.len() as f64).to_point()
    }
}

impl Interactive for Outline {
    fn position(&self) -> Point {
        self.centroid()
    }

    /// Distance to the nearest edge. Infinite for an empty outline.
    fn distance_to_point(&self, pt: Point) -> f64 {
        match self.points.as_slice() {
            [] => f64::INFINITY,
            [only] => only.distance(pt),
            _ => self
                .segments()
                .map(|seg| seg.nearest(pt, 0.).distance_sq)
                .fold(f64::INFINITY, f64::min)
                .sqrt(),
        }
    }
}
