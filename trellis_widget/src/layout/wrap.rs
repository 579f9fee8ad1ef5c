// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

use super::{Layout, layout_slots, place};
use crate::tree::Tree;
use crate::types::{AutoSize, WidgetId};

/// Primary axis of a flow layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left to right, wrapping downwards.
    #[default]
    Horizontal,
    /// Top to bottom, wrapping rightwards.
    Vertical,
}

impl Axis {
    fn main(self, s: Size) -> f64 {
        match self {
            Self::Horizontal => s.width,
            Self::Vertical => s.height,
        }
    }

    fn cross(self, s: Size) -> f64 {
        match self {
            Self::Horizontal => s.height,
            Self::Vertical => s.width,
        }
    }

    fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    fn auto_main(self, auto: AutoSize) -> bool {
        match self {
            Self::Horizontal => auto.width,
            Self::Vertical => auto.height,
        }
    }
}

/// Lays children in a line along one axis, optionally wrapping.
///
/// Each child advances the pen by its measured size plus `spacing`. When
/// `wrap` is set, a child that would overflow the line starts a new one. A
/// widget that fits its content along the primary axis never wraps, since its
/// line length is whatever the content needs.
///
/// With `stretch` on a non-wrapping layout, children are measured twice: once
/// to find the largest cross extent and once more with that extent imposed,
/// so every child shares it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WrapLayout {
    /// Primary axis.
    pub axis: Axis,
    /// Gap between consecutive children and between lines.
    pub spacing: f64,
    /// Start a new line on overflow.
    pub wrap: bool,
    /// Share the largest cross extent between all children.
    pub stretch: bool,
    wrapping: bool,
}

impl WrapLayout {
    /// Horizontal flow.
    pub fn horizontal(spacing: f64, wrap: bool) -> Self {
        Self {
            axis: Axis::Horizontal,
            spacing,
            wrap,
            ..Self::default()
        }
    }

    /// Vertical flow.
    pub fn vertical(spacing: f64, wrap: bool) -> Self {
        Self {
            axis: Axis::Vertical,
            spacing,
            wrap,
            ..Self::default()
        }
    }

    /// Enable the stretch pre-pass.
    pub fn stretched(mut self) -> Self {
        self.stretch = true;
        self
    }

    /// Walk children in order, yielding each one's `(main, cross)` offset.
    fn flow(
        &self,
        tree: &Tree,
        children: &[WidgetId],
        line_length: f64,
        mut visit: impl FnMut(WidgetId, f64, f64, Size),
    ) -> Size {
        let mut pen = 0.0_f64;
        let mut line_cross = 0.0_f64;
        let mut line_start = 0.0_f64;
        let mut widest = 0.0_f64;
        for &child in children {
            let m = tree.measured_size(child).unwrap_or(Size::ZERO);
            let main = self.axis.main(m);
            if self.wrapping && pen > 0.0 && pen + main > line_length {
                line_start += line_cross + self.spacing;
                pen = 0.0;
                line_cross = 0.0;
            }
            visit(child, pen, line_start, m);
            widest = widest.max(pen + main);
            pen += main + self.spacing;
            line_cross = line_cross.max(self.axis.cross(m));
        }
        self.axis.size(widest, line_start + line_cross)
    }
}

impl Layout for WrapLayout {
    fn measure(&mut self, tree: &mut Tree, id: WidgetId, auto: AutoSize, available: Size) -> Size {
        self.wrapping = self.wrap && !self.axis.auto_main(auto);
        let children = layout_slots(tree, id);
        let mut cross_max = 0.0_f64;
        for &child in &children {
            let size = tree.props(child).map_or(Size::ZERO, |p| p.size);
            let m = tree.measure(child, true, true, size);
            cross_max = cross_max.max(self.axis.cross(m));
        }
        if self.stretch && !self.wrapping {
            let (aw, ah) = match self.axis {
                Axis::Horizontal => (true, false),
                Axis::Vertical => (false, true),
            };
            for &child in &children {
                let size = tree.props(child).map_or(Size::ZERO, |p| p.size);
                let main = self.axis.main(size);
                tree.measure(child, aw, ah, self.axis.size(main, cross_max));
            }
        }
        self.flow(tree, &children, self.axis.main(available), |_, _, _, _| {})
    }

    fn arrange(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize) {
        let Some(padded) = tree.padded_rect(id) else {
            return;
        };
        let children = layout_slots(tree, id);
        let axis = self.axis;
        let mut placed = smallvec::SmallVec::<[(WidgetId, Rect); 16]>::new();
        self.flow(tree, &children, axis.main(padded.size()), |child, main, cross, m| {
            let offset = axis.size(main, cross);
            let origin = Point::new(padded.x0 + offset.width, padded.y0 + offset.height);
            placed.push((child, Rect::from_origin_size(origin, m)));
        });
        for (child, rect) in placed {
            place(tree, child, rect, false, false);
        }
    }
}
