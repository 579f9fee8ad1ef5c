// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget behaviour: the trait every widget implements and the contexts it receives.

use core::any::Any;

use kurbo::{Point, Rect};

use crate::canvas::Canvas;
use crate::events::{
    CharEvent, JoystickAxisEvent, JoystickButtonEvent, KeyEvent, MouseButtonEvent,
    MouseMoveEvent, MouseWheelEvent,
};
use crate::tree::Tree;
use crate::types::{Cursor, WidgetId};

/// Side effects a handler asks the desktop to perform once dispatch returns.
///
/// Handlers run while the desktop is mid-dispatch, so anything that changes
/// desktop state is queued here instead of applied in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Requests {
    /// Start dragging this widget at the end of the next geometry pass.
    pub drag: Option<WidgetId>,
    /// Move keyboard focus here.
    pub focus: Option<WidgetId>,
    /// Open this widget as the popup, anchored at the point.
    pub open_popup: Option<(WidgetId, Point)>,
    /// Close the open popup.
    pub close_popup: bool,
}

impl Requests {
    /// Returns `true` if nothing was requested.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Context handed to event handlers.
#[derive(Debug)]
pub struct EventCx<'a> {
    tree: &'a mut Tree,
    id: WidgetId,
    requests: &'a mut Requests,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(tree: &'a mut Tree, id: WidgetId, requests: &'a mut Requests) -> Self {
        Self { tree, id, requests }
    }

    /// The widget receiving the event.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The widget's arranged rectangle.
    pub fn rect(&self) -> Rect {
        self.tree.rect(self.id).unwrap_or(Rect::ZERO)
    }

    /// The widget's padded (content) rectangle.
    pub fn padded_rect(&self) -> Rect {
        self.tree.padded_rect(self.id).unwrap_or(Rect::ZERO)
    }

    /// Read access to the tree.
    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// Write access to the tree.
    ///
    /// The receiving widget's behaviour is checked out while its handler runs,
    /// so events forwarded to it from here are dropped.
    pub fn tree_mut(&mut self) -> &mut Tree {
        self.tree
    }

    /// Ask the desktop to start dragging this widget after the next geometry pass.
    pub fn request_drag(&mut self) {
        self.requests.drag = Some(self.id);
    }

    /// Ask the desktop to move focus to `target`.
    pub fn request_focus(&mut self, target: WidgetId) {
        self.requests.focus = Some(target);
    }

    /// Ask the desktop to open `popup` at `anchor`.
    pub fn open_popup(&mut self, popup: WidgetId, anchor: Point) {
        self.requests.open_popup = Some((popup, anchor));
    }

    /// Ask the desktop to close the open popup.
    pub fn close_popup(&mut self) {
        self.requests.close_popup = true;
    }
}

/// Context handed to draw callbacks.
#[derive(Clone, Copy, Debug)]
pub struct DrawCx<'a> {
    /// The tree being drawn.
    pub tree: &'a Tree,
    /// The widget being drawn.
    pub id: WidgetId,
    /// Arranged rectangle.
    pub rect: Rect,
    /// Padded rectangle.
    pub padded: Rect,
    /// Accumulated opacity, already applied as global alpha.
    pub opacity: f32,
}

/// Widget behaviour.
///
/// Geometry, flags and children live in the [`Tree`]; a `Widget` only supplies
/// drawing and reactions. Every method has a no-op default, so a plain
/// container is just a unit struct. Handlers return `true` when they consumed
/// the event.
pub trait Widget: Any + core::fmt::Debug {
    /// Draw content before children.
    fn draw(&mut self, cx: &DrawCx<'_>, canvas: &mut dyn Canvas) {
        let _ = (cx, canvas);
    }

    /// Draw overlays after children.
    fn post_draw(&mut self, cx: &DrawCx<'_>, canvas: &mut dyn Canvas) {
        let _ = (cx, canvas);
    }

    /// Key press or release while focused.
    fn on_key(&mut self, cx: &mut EventCx<'_>, event: &KeyEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Text input while focused.
    fn on_char(&mut self, cx: &mut EventCx<'_>, event: &CharEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Mouse button press or release.
    fn on_mouse_button(&mut self, cx: &mut EventCx<'_>, event: &MouseButtonEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Second press of a double click. Delivered after the press itself.
    fn on_double_click(&mut self, cx: &mut EventCx<'_>, event: &MouseButtonEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Wheel scroll.
    fn on_mouse_wheel(&mut self, cx: &mut EventCx<'_>, event: &MouseWheelEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Cursor motion over the widget, or anywhere while it holds the mouse.
    fn on_mouse_move(&mut self, cx: &mut EventCx<'_>, event: &MouseMoveEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// The cursor started hovering the widget.
    fn on_mouse_enter(&mut self, cx: &mut EventCx<'_>) {
        let _ = cx;
    }

    /// The cursor stopped hovering the widget.
    fn on_mouse_leave(&mut self, cx: &mut EventCx<'_>) {
        let _ = cx;
    }

    /// Joystick button while focused.
    fn on_joystick_button(&mut self, cx: &mut EventCx<'_>, event: &JoystickButtonEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Joystick axis while focused.
    fn on_joystick_axis(&mut self, cx: &mut EventCx<'_>, event: &JoystickAxisEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Keyboard focus arrived.
    fn on_focus_received(&mut self, cx: &mut EventCx<'_>) {
        let _ = cx;
    }

    /// Keyboard focus left.
    fn on_focus_lost(&mut self, cx: &mut EventCx<'_>) {
        let _ = cx;
    }

    /// Asked, from the root down, before a mouse button event reaches a
    /// descendant. Returning `true` claims the event: nothing below sees it.
    fn wants_mouse_override(&mut self, cx: &mut EventCx<'_>, event: &MouseButtonEvent) -> bool {
        let _ = (cx, event);
        false
    }

    /// Cursor to show at `pt`, overriding the `cursor` property.
    fn cursor_at(&self, tree: &Tree, id: WidgetId, pt: Point) -> Option<Cursor> {
        let _ = (tree, id, pt);
        None
    }

    /// The docking capability, for widgets that host docked children.
    fn dock_host(&mut self) -> Option<&mut dyn DockHost> {
        None
    }
}

/// A widget with no behaviour of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct Panel;

impl Widget for Panel {}

/// Capability of widgets that manage docked children.
///
/// The tree and the desktop only ever see docking through this trait, so the
/// widget core does not depend on the docking crate.
pub trait DockHost {
    /// Lay docked children out inside the host's padded rectangle.
    fn update_layout(&mut self, tree: &mut Tree, host: WidgetId);

    /// Show where `widget` would land if dropped at `at`.
    ///
    /// Returns `false` (and shows nothing) when the drop would be refused.
    fn preview_drop(&mut self, tree: &Tree, host: WidgetId, widget: WidgetId, at: Point) -> bool;

    /// Hide the drop preview.
    fn clear_preview(&mut self);

    /// Dock `widget` at the zone under `at`. Returns `false` when refused.
    fn accept_drop(&mut self, tree: &mut Tree, host: WidgetId, widget: WidgetId, at: Point)
    -> bool;

    /// Forget `widget` without touching its tree links.
    ///
    /// Called by [`Tree::detach`] for widgets linked to this host.
    fn release(&mut self, tree: &mut Tree, host: WidgetId, widget: WidgetId) -> bool;

    /// Dock `widget` back where it was last released from.
    ///
    /// Returns `false` when the host has no record of it or the place is gone.
    fn restore(&mut self, tree: &mut Tree, host: WidgetId, widget: WidgetId) -> bool;
}
