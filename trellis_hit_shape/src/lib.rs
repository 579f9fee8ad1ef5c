// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Hit Shape: narrow-phase hit testing in normalized widget space.
//!
//! A widget is first hit-tested against its arranged rectangle. When it carries
//! a hit-shape override, the point is then mapped into the widget's normalized
//! space, where `(0, 0)` is the top-left corner of the arranged rectangle and
//! `(1, 1)` the bottom-right, and the override decides.
//!
//! Expressing shapes in normalized space means they survive any resize without
//! being rebuilt: a round button stays round whatever size layout hands it.
//!
//! # Key types
//!
//! - [`HitShape`]: the closed set of overrides a widget can carry.
//! - [`NormalizedHitTest`]: the capability each shape implements.
//! - [`Polygon`]: small closed polygons, also used by the docking compass.
//! - [`AlphaMask`]: coverage masks sampled with nearest-neighbour lookup.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use trellis_hit_shape::{HitShape, Polygon};
//!
//! // A diamond inscribed in the widget.
//! let diamond = HitShape::Polygon(Polygon::new([
//!     Point::new(0.5, 0.0),
//!     Point::new(1.0, 0.5),
//!     Point::new(0.5, 1.0),
//!     Point::new(0.0, 0.5),
//! ]));
//! let widget = Rect::new(100.0, 100.0, 200.0, 200.0);
//! assert!(diamond.hit(widget, Point::new(150.0, 150.0)));
//! assert!(!diamond.hit(widget, Point::new(105.0, 105.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use kurbo::{BezPath, Circle, Point, Rect, RoundedRect, Shape};

mod mask;
mod polygon;

pub use mask::AlphaMask;
pub use polygon::Polygon;

/// Capability for shapes that answer hit queries in normalized space.
pub trait NormalizedHitTest {
    /// Returns `true` if the normalized point `pt` is inside the shape.
    fn hit_test_normalized(&self, pt: Point) -> bool;
}

impl NormalizedHitTest for Rect {
    fn hit_test_normalized(&self, pt: Point) -> bool {
        self.contains(pt)
    }
}

impl NormalizedHitTest for Circle {
    fn hit_test_normalized(&self, pt: Point) -> bool {
        Shape::contains(self, pt)
    }
}

impl NormalizedHitTest for RoundedRect {
    fn hit_test_normalized(&self, pt: Point) -> bool {
        self.bounding_box().contains(pt) && Shape::contains(self, pt)
    }
}

/// Fill-only test using the path's own winding rule.
impl NormalizedHitTest for BezPath {
    fn hit_test_normalized(&self, pt: Point) -> bool {
        self.bounding_box().contains(pt) && Shape::contains(self, pt)
    }
}

impl NormalizedHitTest for Polygon {
    fn hit_test_normalized(&self, pt: Point) -> bool {
        self.contains(pt)
    }
}

impl NormalizedHitTest for AlphaMask {
    fn hit_test_normalized(&self, pt: Point) -> bool {
        self.contains(pt)
    }
}

/// A hit-shape override attached to a widget.
#[derive(Clone, Debug)]
pub enum HitShape {
    /// A sub-rectangle of the widget.
    Rect(Rect),
    /// An ellipse inscribed in the widget when the circle is `(0.5, 0.5), 0.5`.
    Circle(Circle),
    /// A rounded rectangle.
    RoundedRect(RoundedRect),
    /// An arbitrary filled path.
    Path(BezPath),
    /// A closed polygon.
    Polygon(Polygon),
    /// A per-texel coverage mask.
    AlphaMask(AlphaMask),
}

impl NormalizedHitTest for HitShape {
    fn hit_test_normalized(&self, pt: Point) -> bool {
        match self {
            Self::Rect(r) => r.hit_test_normalized(pt),
            Self::Circle(c) => c.hit_test_normalized(pt),
            Self::RoundedRect(r) => r.hit_test_normalized(pt),
            Self::Path(p) => p.hit_test_normalized(pt),
            Self::Polygon(p) => p.hit_test_normalized(pt),
            Self::AlphaMask(m) => m.hit_test_normalized(pt),
        }
    }
}

impl HitShape {
    /// Test a point given in the same space as `bounds`.
    ///
    /// Returns `false` for degenerate bounds.
    pub fn hit(&self, bounds: Rect, pt: Point) -> bool {
        normalize(bounds, pt).is_some_and(|local| self.hit_test_normalized(local))
    }
}

/// Map `pt` into the normalized space of `bounds`.
///
/// Returns `None` when `bounds` has no area.
pub fn normalize(bounds: Rect, pt: Point) -> Option<Point> {
    let w = bounds.width();
    let h = bounds.height();
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(Point::new((pt.x - bounds.x0) / w, (pt.y - bounds.y0) / h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn normalize_maps_corners() {
        let bounds = Rect::new(10.0, 20.0, 30.0, 60.0);
        assert_eq!(normalize(bounds, Point::new(10.0, 20.0)), Some(Point::ZERO));
        assert_eq!(
            normalize(bounds, Point::new(30.0, 60.0)),
            Some(Point::new(1.0, 1.0))
        );
        assert_eq!(normalize(Rect::new(0.0, 0.0, 0.0, 5.0), Point::ZERO), None);
    }

    #[test]
    fn circle_override_rejects_corners() {
        let shape = HitShape::Circle(Circle::new((0.5, 0.5), 0.5));
        let bounds = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert!(shape.hit(bounds, Point::new(20.0, 20.0)));
        assert!(!shape.hit(bounds, Point::new(2.0, 2.0)));
    }

    #[test]
    fn rect_override_scales_with_bounds() {
        let shape = HitShape::Rect(Rect::new(0.0, 0.0, 0.5, 1.0));
        assert!(shape.hit(Rect::new(0.0, 0.0, 100.0, 10.0), Point::new(40.0, 5.0)));
        assert!(!shape.hit(Rect::new(0.0, 0.0, 100.0, 10.0), Point::new(60.0, 5.0)));
        assert!(shape.hit(Rect::new(0.0, 0.0, 200.0, 10.0), Point::new(60.0, 5.0)));
    }

    #[test]
    fn mask_override() {
        let mask = AlphaMask::new(2, 1, vec![0, 255], 1).unwrap();
        let shape = HitShape::AlphaMask(mask);
        let bounds = Rect::new(0.0, 0.0, 20.0, 10.0);
        assert!(!shape.hit(bounds, Point::new(5.0, 5.0)));
        assert!(shape.hit(bounds, Point::new(15.0, 5.0)));
    }
}
