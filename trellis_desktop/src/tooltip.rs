// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Vec2};
use trellis_widget::{TooltipPlacement, WidgetId};

/// Offset of cursor-placed tooltips from the cursor.
pub const CURSOR_OFFSET: Vec2 = Vec2::new(12.0, 16.0);

/// Hover bookkeeping for tooltips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TooltipState {
    /// When the current hover began.
    pub(crate) since: u64,
    /// Tooltip widget currently shown.
    pub(crate) shown: Option<WidgetId>,
}

/// Top-left corner of a tooltip for a widget at `owner`.
pub fn tooltip_origin(placement: TooltipPlacement, owner: Rect, cursor: Point) -> Point {
    match placement {
        TooltipPlacement::Cursor => cursor + CURSOR_OFFSET,
        TooltipPlacement::Below => Point::new(owner.x0, owner.y1),
        TooltipPlacement::Right => Point::new(owner.x1, owner.y0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placements() {
        let owner = Rect::new(10.0, 10.0, 50.0, 30.0);
        let cursor = Point::new(20.0, 20.0);
        assert_eq!(
            tooltip_origin(TooltipPlacement::Cursor, owner, cursor),
            Point::new(32.0, 36.0)
        );
        assert_eq!(
            tooltip_origin(TooltipPlacement::Below, owner, cursor),
            Point::new(10.0, 30.0)
        );
        assert_eq!(
            tooltip_origin(TooltipPlacement::Right, owner, cursor),
            Point::new(50.0, 10.0)
        );
    }
}
