// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Widget: a retained widget tree with two-pass layout.
//!
//! Widgets live in a [`Tree`] arena and are addressed by generational
//! [`WidgetId`]s. Each widget pairs author-controlled [`WidgetProps`] with a
//! behaviour implementing [`Widget`] and a [`Layout`](layout::Layout) strategy
//! for its children.
//!
//! ## Layout protocol
//!
//! Geometry is computed once per frame, top down:
//!
//! 1. [`Tree::begin_frame`] advances the visibility frame. Nothing is live.
//! 2. [`Tree::measure`] (pass 1) asks a widget how big it wants to be given a
//!    proposed size. Per axis, a widget either fits its content (auto-size,
//!    when the parent allows it) or takes exactly what it was offered.
//! 3. The parent sets the child's rectangle, then [`Tree::arrange`] (pass 2)
//!    positions the child's own children. Every widget arranged this way is
//!    stamped with the current frame.
//!
//! Only stamped widgets are drawn and hit-tested. Invisible, collapsed,
//! degenerate and off-layout widgets simply never get stamped.
//!
//! ## Z-order
//!
//! Sibling lists are kept in four contiguous bands: background, normal,
//! foreground/exclusive, popup. [`Tree::add_widget`] and [`Tree::bring_on_top`]
//! only reorder within those bands.
//!
//! ## Input
//!
//! [`Tree::trace`] finds the topmost live widget under a point. The
//! `forward_*` methods deliver events to a widget and mirror them to its
//! share-inputs group; mouse buttons can be claimed by an ancestor through
//! [`Widget::wants_mouse_override`]. Handlers queue side effects in
//! [`Requests`] for the desktop to apply.
//!
//! ## Drawing
//!
//! [`Tree::draw`] walks live widgets into a [`Canvas`], accumulating clip and
//! opacity. [`CommandList`] is a recording canvas for tests and tools.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod canvas;
mod draw;
pub mod events;
pub mod layout;
mod route;
mod tree;
mod types;
mod widget;

pub use canvas::{Canvas, Color, CommandList, DrawCommand, FontId, TextAlign, TextStyle};
pub use draw::DrawOptions;
pub use route::Forwarded;
pub use tree::{DEGENERATE_EXTENT, SelfAndAncestors, Tree};
pub use types::{
    AutoSize, Cursor, GridCell, InputFlags, ShareGroup, Tooltip, TooltipPlacement, Visibility,
    WidgetId, WidgetProps, WindowRole, ZBand, ZOrder,
};
pub use widget::{DockHost, DrawCx, EventCx, Panel, Requests, Widget};
