// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The docking compass: which leaf and zone a point drops into.

use kurbo::{Point, Rect, Size};
use trellis_hit_shape::Polygon;
use trellis_widget::WidgetId;

use crate::tree::{DockContent, DockTree};
use crate::types::{DockNodeId, DockZone};

/// Where a drop at some point would land.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Target leaf.
    pub leaf: DockNodeId,
    /// Zone of the leaf under the point.
    pub zone: DockZone,
    /// Outline of the zone in container coordinates, for previews.
    pub polygon: Polygon,
}

/// The five compass zones of a `size` leaf, in normalized leaf space.
///
/// The side trapezoids are `fraction` of the shorter side thick, converted
/// to each axis so they have the same thickness in pixels. The center zone
/// is the rectangle they leave.
pub fn compass(size: Size, fraction: f64) -> [(DockZone, Polygon); 5] {
    let short = size.width.min(size.height);
    let tx = (fraction * short / size.width).clamp(0.0, 0.5);
    let ty = (fraction * short / size.height).clamp(0.0, 0.5);
    let p = Point::new;
    [
        (
            DockZone::Center,
            Polygon::from_rect(Rect::new(tx, ty, 1.0 - tx, 1.0 - ty)),
        ),
        (
            DockZone::Left,
            Polygon::new([p(0.0, 0.0), p(tx, ty), p(tx, 1.0 - ty), p(0.0, 1.0)]),
        ),
        (
            DockZone::Right,
            Polygon::new([p(1.0, 0.0), p(1.0, 1.0), p(1.0 - tx, 1.0 - ty), p(1.0 - tx, ty)]),
        ),
        (
            DockZone::Top,
            Polygon::new([p(0.0, 0.0), p(1.0, 0.0), p(1.0 - tx, ty), p(tx, ty)]),
        ),
        (
            DockZone::Bottom,
            Polygon::new([p(0.0, 1.0), p(tx, 1.0 - ty), p(1.0 - tx, 1.0 - ty), p(1.0, 1.0)]),
        ),
    ]
}

/// Fraction of `leaf` that keeps `widget` pixels, or an even split when the
/// widget would not fit.
fn keep_extent(widget: f64, leaf: f64) -> f64 {
    if widget > 0.0 && widget < leaf {
        widget / leaf
    } else {
        0.5
    }
}

impl DockTree {
    /// The leaf whose last laid out bounds contain `pt`.
    pub fn leaf_at(&self, pt: Point) -> Option<DockNodeId> {
        let mut id = self.root();
        loop {
            let node = self.node(id)?;
            if !node.bounds().contains(pt) {
                return None;
            }
            match node.content() {
                DockContent::Leaf { .. } => return Some(id),
                DockContent::Split { children, .. } => {
                    id = *children
                        .iter()
                        .find(|c| self.node(**c).is_some_and(|n| n.bounds().contains(pt)))?;
                }
            }
        }
    }

    /// Classify `pt` against the compass of the leaf under it.
    ///
    /// Empty leaves only accept the center.
    pub fn placement(&self, pt: Point) -> Option<Placement> {
        let leaf = self.leaf_at(pt)?;
        let bounds = self.node(leaf)?.bounds();
        if self.widgets_in(leaf).is_empty() {
            return Some(Placement {
                leaf,
                zone: DockZone::Center,
                polygon: Polygon::from_rect(bounds),
            });
        }
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return None;
        }
        let local = Point::new(
            (pt.x - bounds.x0) / bounds.width(),
            (pt.y - bounds.y0) / bounds.height(),
        );
        let zones = compass(bounds.size(), self.config.compass_fraction);
        let (zone, polygon) = zones
            .iter()
            .find(|(_, poly)| poly.contains(local))
            .unwrap_or(&zones[0]);
        Some(Placement {
            leaf,
            zone: *zone,
            polygon: polygon.denormalize(bounds),
        })
    }

    /// Dock `widget` wherever a drop at `pt` lands.
    ///
    /// For side zones the split tries to give the widget its current
    /// `widget_size`; a widget at least as large as the leaf gets half.
    pub fn attach_widget_at(
        &mut self,
        widget: WidgetId,
        widget_size: Size,
        pt: Point,
    ) -> Option<DockNodeId> {
        let Placement { leaf, zone, .. } = self.placement(pt)?;
        let leaf_size = self.node(leaf)?.bounds().size();
        let split = match zone {
            DockZone::Left => keep_extent(widget_size.width, leaf_size.width),
            DockZone::Right => 1.0 - keep_extent(widget_size.width, leaf_size.width),
            DockZone::Top => keep_extent(widget_size.height, leaf_size.height),
            DockZone::Bottom => 1.0 - keep_extent(widget_size.height, leaf_size.height),
            DockZone::Center => 0.5,
        };
        self.attach_widget(widget, leaf, zone, split)
    }
}
