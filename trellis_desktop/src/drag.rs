// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget dragging geometry.

use kurbo::{Point, Rect, Size};
use trellis_widget::{WidgetId, WindowRole};

/// A drag in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DragState {
    pub(crate) widget: WidgetId,
    /// Cursor position when the drag began.
    pub(crate) cursor_start: Point,
    /// Widget position the cursor delta is applied to.
    pub(crate) anchor: Point,
    /// Widget position when the drag began.
    pub(crate) position_start: Point,
    pub(crate) size_start: Size,
    pub(crate) window_start: Option<WindowRole>,
    /// Arranged rectangle when the drag began.
    pub(crate) rect_start: Rect,
    /// Dock container the widget was pulled out of.
    pub(crate) undocked_from: Option<WidgetId>,
}

/// Clamp a position relative to `bounds` so the widget's origin stays inside
/// `bounds`, at least `margin` pixels from the far edges.
pub fn clamp_drag_position(position: Point, bounds: Rect, margin: f64) -> Point {
    Point::new(
        position.x.clamp(0.0, (bounds.width() - margin).max(0.0)),
        position.y.clamp(0.0, (bounds.height() - margin).max(0.0)),
    )
}

/// Left edge for a window restored from `maximized` to `restored_width`
/// that keeps the cursor at the same relative horizontal offset.
pub fn restore_x(cursor_x: f64, maximized: Rect, restored_width: f64) -> f64 {
    let relative = if maximized.width() > 0.0 {
        ((cursor_x - maximized.x0) / maximized.width()).clamp(0.0, 1.0)
    } else {
        0.0
    };
    cursor_x - relative * restored_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_stay_inside_the_parent() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 80.0);
        assert_eq!(
            clamp_drag_position(Point::new(-20.0, 30.0), bounds, 1.0),
            Point::new(0.0, 30.0)
        );
        assert_eq!(
            clamp_drag_position(Point::new(150.0, 200.0), bounds, 1.0),
            Point::new(99.0, 79.0)
        );
    }

    #[test]
    fn restore_keeps_relative_cursor_offset() {
        let maximized = Rect::new(0.0, 0.0, 1000.0, 600.0);
        assert_eq!(restore_x(300.0, maximized, 200.0), 240.0);
        assert_eq!(restore_x(0.0, maximized, 200.0), 0.0);
    }
}
