// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Dock: resizable, splittable panes for Trellis widgets.
//!
//! A [`DockTree`] partitions a rectangle into leaves. Each leaf holds a list
//! of widgets, shown one at a time like tabs. Splits are binary, vertical or
//! horizontal, positioned by a normalized fraction.
//!
//! - [`DockTree::attach_widget`] adds a widget to a leaf's center, or splits
//!   the leaf to put the widget on one side.
//! - [`DockTree::detach_widget`] removes a widget; a leaf left empty is
//!   folded away and its sibling takes the parent's place.
//! - [`DockTree::placement`] classifies a point against the docking compass
//!   of the leaf under it, for drag-and-drop previews.
//! - [`DockTree::trace_separator`] and [`DockTree::drag_separator`] implement
//!   resizing.
//!
//! [`DockContainer`] is the widget that hosts a dock tree in a
//! [`trellis_widget::Tree`]. It implements [`trellis_widget::DockHost`], which
//! is how the desktop previews and performs drops without knowing about this
//! crate.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use trellis_dock::{DockContainer, DockZone};
//! use trellis_widget::{Panel, Tree, WidgetProps};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, WidgetProps::default(), Panel);
//! let host = DockContainer::create(
//!     &mut tree,
//!     Some(root),
//!     WidgetProps::sized(Point::ZERO, Size::new(300.0, 200.0)),
//! );
//! let left = tree.create(WidgetProps::default().dockable(), Panel);
//! let right = tree.create(WidgetProps::default().dockable(), Panel);
//!
//! DockContainer::with(&mut tree, host, |dock, tree| {
//!     let leaf = dock.dock().root();
//!     dock.attach(tree, host, left, leaf, DockZone::Center, 0.5);
//!     dock.attach(tree, host, right, leaf, DockZone::Right, 0.5);
//! });
//!
//! tree.begin_frame();
//! tree.set_rect(root, Rect::new(0.0, 0.0, 300.0, 200.0));
//! tree.measure(root, false, false, Size::new(300.0, 200.0));
//! tree.arrange(root, false, false);
//!
//! assert_eq!(tree.rect(left), Some(Rect::new(0.0, 0.0, 150.0, 200.0)));
//! assert_eq!(tree.rect(right), Some(Rect::new(150.0, 0.0, 300.0, 200.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod container;
mod placement;
mod tree;
mod types;

pub use container::{DockContainer, DockLayout};
pub use placement::{Placement, compass};
pub use tree::{DockContent, DockNode, DockShape, DockSlot, DockTree};
pub use types::{DockConfig, DockNodeId, DockZone, SplitKind};
