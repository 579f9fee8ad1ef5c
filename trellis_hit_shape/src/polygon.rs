// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple closed polygons.
//!
//! Polygons here are small (the docking compass uses quads) so vertices are kept
//! inline in a [`SmallVec`]. The containment test is the even-odd crossing rule.

use kurbo::{BezPath, Point, Rect};
use smallvec::SmallVec;

/// A closed polygon given by its vertices in order.
///
/// The closing edge from the last vertex back to the first is implicit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    points: SmallVec<[Point; 8]>,
}

impl Polygon {
    /// Create a polygon from its vertices.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Create a polygon covering `rect`, wound clockwise from the top-left corner.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new([
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ])
    }

    /// The vertices of the polygon.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` if the polygon has fewer than three vertices.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Even-odd containment test.
    ///
    /// Points exactly on a left or top edge count as inside; points on a right
    /// or bottom edge may fall either way, which is enough for pointer input.
    pub fn contains(&self, pt: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > pt.y) != (b.y > pt.y) {
                let x_cross = (b.x - a.x) * (pt.y - a.y) / (b.y - a.y) + a.x;
                if pt.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Axis-aligned bounds of the vertices, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut it = self.points.iter();
        let first = it.next()?;
        let mut r = Rect::from_points(*first, *first);
        for p in it {
            r = r.union_pt(*p);
        }
        Some(r)
    }

    /// Map a polygon expressed in normalized `0..1` coordinates into `rect`.
    pub fn denormalize(&self, rect: Rect) -> Self {
        Self::new(self.points.iter().map(|p| {
            Point::new(
                rect.x0 + p.x * rect.width(),
                rect.y0 + p.y * rect.height(),
            )
        }))
    }

    /// Build a closed [`BezPath`], for handing the outline to a canvas.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut it = self.points.iter();
        if let Some(first) = it.next() {
            path.move_to(*first);
            for p in it {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_trapezoid() -> Polygon {
        Polygon::new([
            Point::new(0.0, 0.0),
            Point::new(0.3, 0.3),
            Point::new(0.3, 0.7),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn trapezoid_contains_points_near_its_long_edge() {
        let poly = left_trapezoid();
        assert!(poly.contains(Point::new(0.05, 0.5)));
        assert!(poly.contains(Point::new(0.25, 0.5)));
        assert!(!poly.contains(Point::new(0.35, 0.5)));
        // Above the diagonal that bounds the trapezoid.
        assert!(!poly.contains(Point::new(0.2, 0.1)));
    }

    #[test]
    fn degenerate_polygon_never_contains() {
        let poly = Polygon::new([Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(poly.is_degenerate());
        assert!(!poly.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn denormalize_maps_into_rect() {
        let poly = Polygon::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let mapped = poly.denormalize(Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(mapped.bounding_box(), Some(Rect::new(10.0, 20.0, 110.0, 70.0)));
        assert!(mapped.contains(Point::new(50.0, 50.0)));
    }
}
