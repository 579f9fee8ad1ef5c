// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: identifiers, flags, and per-widget properties.

use alloc::string::String;

use kurbo::{Insets, Point, Rect, Size};
use trellis_hit_shape::HitShape;

use crate::canvas::Color;

/// Identifier for a widget in the tree (generational).
///
/// An id whose widget has been removed never resolves again, even if its slot
/// is reused, so ids double as weak references.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Input participation flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputFlags: u8 {
        /// The widget never receives input; hits resolve to the nearest ancestor that does.
        const NO_INPUT          = 0b0000_0001;
        /// A press with the drag button starts dragging the widget.
        const ALLOW_DRAG        = 0b0000_0010;
        /// Keyboard shortcuts may fire while this widget has focus.
        const SHORTCUTS_ALLOWED = 0b0000_0100;
        /// The widget itself is never a hit result; its children still are.
        const TRANSPARENT       = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Z-order flags controlling a widget's band among its siblings.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ZOrder: u8 {
        /// Stays below normal siblings and never moves when brought on top.
        const STAY_BACKGROUND = 0b0000_0001;
        /// Stays above normal siblings.
        const STAY_FOREGROUND = 0b0000_0010;
        /// Above everything else; also the first hit-test root while open.
        const POPUP           = 0b0000_0100;
        /// Blocks input to everything outside its subtree while it owns focus.
        const EXCLUSIVE       = 0b0000_1000;
    }
}

/// Ordering band derived from [`ZOrder`] flags.
///
/// Sibling lists are always sorted by band, background first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZBand {
    /// `STAY_BACKGROUND`.
    Background,
    /// No z-order flags.
    Normal,
    /// `STAY_FOREGROUND` or `EXCLUSIVE`.
    Foreground,
    /// `POPUP`.
    Popup,
}

impl ZOrder {
    /// The band these flags select. Popup wins over foreground, which wins over background.
    pub fn band(self) -> ZBand {
        if self.contains(Self::POPUP) {
            ZBand::Popup
        } else if self.intersects(Self::STAY_FOREGROUND | Self::EXCLUSIVE) {
            ZBand::Foreground
        } else if self.contains(Self::STAY_BACKGROUND) {
            ZBand::Background
        } else {
            ZBand::Normal
        }
    }
}

/// Visibility of a widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Laid out, drawn and hit-tested.
    #[default]
    Visible,
    /// Occupies layout space but is neither drawn nor hit-tested.
    Invisible,
    /// Skipped by layout entirely.
    Collapsed,
}

/// Per-axis auto-size switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AutoSize {
    /// Fit the content horizontally.
    pub width: bool,
    /// Fit the content vertically.
    pub height: bool,
}

impl AutoSize {
    /// Fixed size on both axes.
    pub const NONE: Self = Self {
        width: false,
        height: false,
    };
    /// Fit content on both axes.
    pub const BOTH: Self = Self {
        width: true,
        height: true,
    };

    /// Axis-wise AND with permission flags from the parent.
    pub fn allowed(self, width: bool, height: bool) -> Self {
        Self {
            width: self.width && width,
            height: self.height && height,
        }
    }
}

/// Mouse cursor shapes a widget can request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Platform default arrow.
    #[default]
    Default,
    /// Text caret.
    Text,
    /// Pointing hand.
    Pointer,
    /// Four-way move.
    Move,
    /// Horizontal resize (left/right).
    ResizeHorizontal,
    /// Vertical resize (up/down).
    ResizeVertical,
    /// Action not allowed.
    NotAllowed,
}

/// Cell assignment for children of a grid layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub column: usize,
}

impl GridCell {
    /// Create a cell reference.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Where a tooltip appears relative to its owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TooltipPlacement {
    /// Just below and to the right of the cursor.
    #[default]
    Cursor,
    /// Below the owner, left-aligned.
    Below,
    /// Right of the owner, top-aligned.
    Right,
}

/// A tooltip attached to a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tooltip {
    /// Widget shown as the tooltip. It is hosted by the desktop while shown.
    pub widget: WidgetId,
    /// Hover time before showing, or `None` for the desktop default.
    pub delay_ms: Option<u64>,
    /// Placement policy.
    pub placement: TooltipPlacement,
}

/// Window role: enables caption dragging, double-click maximize, and
/// restore-on-drag for top-level widgets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowRole {
    /// Whether the window can be maximized and restored.
    pub resizable: bool,
    /// Height of the caption strip at the top of the window.
    pub caption_height: f64,
    /// Currently filling the whole desktop.
    pub maximized: bool,
    /// Position and size to return to when restored.
    pub restore: Option<Rect>,
}

impl WindowRole {
    /// A resizable window with the given caption height.
    pub fn resizable(caption_height: f64) -> Self {
        Self {
            resizable: true,
            caption_height,
            ..Self::default()
        }
    }

    /// Returns `true` if `pt` lies in the caption strip of `rect`.
    pub fn caption_contains(&self, rect: Rect, pt: Point) -> bool {
        let caption = Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + self.caption_height);
        caption.contains(pt)
    }
}

/// Identifier of a share-inputs group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShareGroup(pub u32);

/// Author-controlled widget attributes.
///
/// Changing these takes effect on the next geometry pass. Use
/// [`Tree::set_z_order`](crate::Tree::set_z_order) rather than writing
/// `z_order` directly so the sibling list stays banded.
#[derive(Clone, Debug)]
pub struct WidgetProps {
    /// Debug name, used in log output.
    pub name: Option<String>,
    /// Position relative to the parent's padded rectangle, for layouts that honour it.
    pub position: Point,
    /// Explicit size.
    pub size: Size,
    /// Per-axis content fitting.
    pub auto_size: AutoSize,
    /// Space between the widget's rectangle and its content.
    pub padding: Insets,
    /// Opacity multiplied into everything drawn by the subtree.
    pub opacity: f32,
    /// Visibility state.
    pub visibility: Visibility,
    /// Child index shown by a stack layout.
    pub layer: usize,
    /// Sibling ordering band.
    pub z_order: ZOrder,
    /// Input participation.
    pub input: InputFlags,
    /// Cell used by a grid layout.
    pub grid_cell: GridCell,
    /// Solid background drawn before the widget's own content.
    pub background: Option<Color>,
    /// Hit-shape override in normalized widget space.
    pub hit_shape: Option<HitShape>,
    /// Requested cursor while hovered.
    pub cursor: Option<Cursor>,
    /// Attached tooltip.
    pub tooltip: Option<Tooltip>,
    /// Window behaviour for top-level widgets.
    pub window: Option<WindowRole>,
    /// Can be dropped into dock containers.
    pub dockable: bool,
}

impl Default for WidgetProps {
    fn default() -> Self {
        Self {
            name: None,
            position: Point::ZERO,
            size: Size::ZERO,
            auto_size: AutoSize::NONE,
            padding: Insets::ZERO,
            opacity: 1.0,
            visibility: Visibility::Visible,
            layer: 0,
            z_order: ZOrder::empty(),
            input: InputFlags::empty(),
            grid_cell: GridCell::default(),
            background: None,
            hit_shape: None,
            cursor: None,
            tooltip: None,
            window: None,
            dockable: false,
        }
    }
}

impl WidgetProps {
    /// Properties for a widget at `position` with an explicit `size`.
    pub fn sized(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            ..Self::default()
        }
    }

    /// Set the debug name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the input flags.
    pub fn with_input(mut self, input: InputFlags) -> Self {
        self.input = input;
        self
    }

    /// Replace the z-order flags.
    pub fn with_z_order(mut self, z_order: ZOrder) -> Self {
        self.z_order = z_order;
        self
    }

    /// Replace the padding.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Replace the auto-size switches.
    pub fn with_auto_size(mut self, auto_size: AutoSize) -> Self {
        self.auto_size = auto_size;
        self
    }

    /// Place the widget in a grid cell.
    pub fn in_cell(mut self, row: usize, column: usize) -> Self {
        self.grid_cell = GridCell::new(row, column);
        self
    }

    /// Give the widget a window role.
    pub fn with_window(mut self, window: WindowRole) -> Self {
        self.window = Some(window);
        self
    }

    /// Mark the widget as dockable.
    pub fn dockable(mut self) -> Self {
        self.dockable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_precedence() {
        assert_eq!(ZOrder::empty().band(), ZBand::Normal);
        assert_eq!(ZOrder::STAY_BACKGROUND.band(), ZBand::Background);
        assert_eq!(ZOrder::EXCLUSIVE.band(), ZBand::Foreground);
        assert_eq!(
            (ZOrder::STAY_BACKGROUND | ZOrder::STAY_FOREGROUND).band(),
            ZBand::Foreground
        );
        assert_eq!((ZOrder::POPUP | ZOrder::EXCLUSIVE).band(), ZBand::Popup);
        assert!(ZBand::Background < ZBand::Normal);
        assert!(ZBand::Foreground < ZBand::Popup);
    }

    #[test]
    fn caption_strip() {
        let role = WindowRole::resizable(20.0);
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(role.caption_contains(rect, Point::new(50.0, 10.0)));
        assert!(!role.caption_contains(rect, Point::new(50.0, 30.0)));
    }
}
