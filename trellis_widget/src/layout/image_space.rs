// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

use super::{Layout, layout_slots, place};
use crate::tree::Tree;
use crate::types::{AutoSize, WidgetId};

/// Places children authored against a fixed reference resolution.
///
/// Child positions and sizes are in reference pixels. The reference canvas is
/// scaled uniformly to fit the padded rectangle and centered in it. Children
/// with a negative size, or lying entirely outside the reference canvas, are
/// skipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageSpaceLayout {
    /// Resolution the children were authored against.
    pub reference: Size,
}

impl ImageSpaceLayout {
    /// Create a layout for the given reference resolution.
    pub fn new(reference: Size) -> Self {
        Self { reference }
    }

    /// Scale factor and origin mapping reference space into `target`.
    pub fn transform(&self, target: Rect) -> Option<(f64, Point)> {
        if self.reference.width <= 0.0 || self.reference.height <= 0.0 {
            return None;
        }
        let scale = (target.width() / self.reference.width)
            .min(target.height() / self.reference.height);
        let origin = Point::new(
            target.x0 + (target.width() - self.reference.width * scale) * 0.5,
            target.y0 + (target.height() - self.reference.height * scale) * 0.5,
        );
        Some((scale, origin))
    }

    fn in_reference(&self, tree: &Tree, child: WidgetId) -> Option<Rect> {
        let props = tree.props(child)?;
        if props.size.width < 0.0 || props.size.height < 0.0 {
            return None;
        }
        let rect = Rect::from_origin_size(props.position, props.size);
        let canvas = Rect::from_origin_size(Point::ZERO, self.reference);
        let overlaps = rect.x1 > canvas.x0
            && rect.x0 < canvas.x1
            && rect.y1 > canvas.y0
            && rect.y0 < canvas.y1;
        overlaps.then_some(rect)
    }
}

impl Layout for ImageSpaceLayout {
    fn measure(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize, _available: Size) -> Size {
        for child in layout_slots(tree, id) {
            if let Some(rect) = self.in_reference(tree, child) {
                tree.measure(child, false, false, rect.size());
            }
        }
        self.reference
    }

    fn arrange(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize) {
        let Some(padded) = tree.padded_rect(id) else {
            return;
        };
        let Some((scale, origin)) = self.transform(padded) else {
            return;
        };
        for child in layout_slots(tree, id) {
            let Some(r) = self.in_reference(tree, child) else {
                continue;
            };
            let rect = Rect::new(
                origin.x + r.x0 * scale,
                origin.y + r.y0 * scale,
                origin.x + r.x1 * scale,
                origin.y + r.y1 * scale,
            );
            tree.measure(child, false, false, rect.size());
            place(tree, child, rect, false, false);
        }
    }
}
