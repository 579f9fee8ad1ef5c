// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout strategies.
//!
//! A [`Layout`] positions the layout slots of one widget. Both passes are
//! driven by the tree: [`Tree::measure`] hands the strategy the padded space on
//! offer, and [`Tree::arrange`] calls it once the widget's own rectangle is
//! final. Strategies call back into `measure`/`arrange` for each child.
//!
//! Collapsed children are skipped by every strategy. Invisible children are
//! laid out normally; the tree refuses to stamp them, which keeps them out of
//! drawing and hit testing.

use kurbo::{Rect, Size};
use smallvec::SmallVec;

use crate::tree::Tree;
use crate::types::{AutoSize, Visibility, WidgetId};

mod box_layout;
mod grid;
mod image_space;
mod stack;
mod wrap;

pub use box_layout::{BoxLayout, HAlign, VAlign};
pub use grid::{GridLayout, TrackSizing};
pub use image_space::ImageSpaceLayout;
pub use stack::StackLayout;
pub use wrap::{Axis, WrapLayout};

/// Strategy object implementing the two-pass protocol for a widget's children.
pub trait Layout: core::fmt::Debug {
    /// Measure children inside `available` (the widget's proposed size minus
    /// padding) and return the content size.
    ///
    /// `auto` holds the axes on which the widget itself is fitting its content.
    fn measure(&mut self, tree: &mut Tree, id: WidgetId, auto: AutoSize, available: Size) -> Size;

    /// Position children inside the widget's padded rectangle, which is final
    /// when this is called.
    fn arrange(&mut self, tree: &mut Tree, id: WidgetId, auto: AutoSize);
}

/// Layout slots of `id` that take part in layout.
pub fn layout_slots(tree: &Tree, id: WidgetId) -> SmallVec<[WidgetId; 16]> {
    tree.slots_of(id)
        .iter()
        .copied()
        .filter(|c| tree.visibility(*c) != Visibility::Collapsed)
        .collect()
}

/// Give `child` its rectangle and run its arrange pass.
pub fn place(tree: &mut Tree, child: WidgetId, rect: Rect, allow_auto_width: bool, allow_auto_height: bool) {
    tree.set_rect(child, rect);
    tree.arrange(child, allow_auto_width, allow_auto_height);
}
