// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Desktop: the root of a widget hierarchy and its input routing.
//!
//! A [`Desktop`] owns a [`trellis_widget::Tree`] and covers one viewport. It
//! keeps the state that only makes sense once per screen:
//!
//! - keyboard focus and mouse focus (the widget capturing a held button),
//! - the open popup, the fullscreen widget, and the exclusive widget found
//!   above the focus,
//! - the widget being dragged, and a drag requested by a handler,
//! - double-click recognition, keyboard [`Shortcuts`], hover and tooltips.
//!
//! ## Frame order
//!
//! 1. Feed input: [`Desktop::mouse_button`], [`Desktop::mouse_move`],
//!    [`Desktop::mouse_wheel`], [`Desktop::key`], [`Desktop::char`] and the
//!    joystick methods. Events are resolved against last frame's geometry.
//! 2. [`Desktop::update_geometry`] moves the dragged widget, lays everything
//!    out and starts requested drags.
//! 3. [`Desktop::tick`] shows due tooltips, and [`Desktop::draw`] renders.
//!
//! ## Dragging and docking
//!
//! A drag starts when the drag button is pressed on a widget with
//! [`InputFlags::ALLOW_DRAG`](trellis_widget::InputFlags::ALLOW_DRAG), on the
//! caption of a top-level window, or when a handler asks for one. Dockable
//! widgets dragged over a widget implementing
//! [`DockHost`](trellis_widget::DockHost) show a drop preview there and are
//! docked on release. Escape puts the widget back.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use trellis_desktop::Desktop;
//! use trellis_widget::events::{Modifiers, MouseButton, MouseButtonEvent, MouseMoveEvent};
//! use trellis_widget::{InputFlags, Panel, WidgetProps};
//!
//! let mut desktop = Desktop::new();
//! let card = desktop.insert(
//!     WidgetProps::sized(Point::new(10.0, 10.0), Size::new(50.0, 50.0))
//!         .with_input(InputFlags::ALLOW_DRAG),
//!     Panel,
//! );
//! desktop.update_geometry(Size::new(320.0, 240.0));
//!
//! let press = MouseButtonEvent {
//!     button: MouseButton::Left,
//!     pressed: true,
//!     position: Point::new(20.0, 20.0),
//!     modifiers: Modifiers::empty(),
//!     timestamp: 0,
//! };
//! desktop.mouse_button(&press);
//! desktop.mouse_move(&MouseMoveEvent {
//!     position: Point::new(70.0, 40.0),
//!     modifiers: Modifiers::empty(),
//!     timestamp: 16,
//! });
//! desktop.update_geometry(Size::new(320.0, 240.0));
//! desktop.mouse_button(&MouseButtonEvent { pressed: false, position: Point::new(70.0, 40.0), ..press });
//!
//! assert_eq!(desktop.dragging(), None);
//! assert_eq!(desktop.tree().props(card).unwrap().position, Point::new(60.0, 30.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod desktop;
mod drag;
mod input;
mod shortcuts;
mod tooltip;

#[cfg(test)]
mod testing;

pub use config::DesktopConfig;
pub use desktop::Desktop;
pub use drag::{clamp_drag_position, restore_x};
pub use shortcuts::{KeyCombination, Shortcuts};
pub use tooltip::{CURSOR_OFFSET, tooltip_origin};
