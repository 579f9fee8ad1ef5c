// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input routing.
//!
//! Presses are hit-tested against the open popup first, then the exclusive
//! widget (or the fullscreen widget, or the whole desktop). A hit on a
//! `NO_INPUT` widget goes to its nearest ancestor that takes input. The target
//! is focused and raised, then the press is classified:
//!
//! 1. A double click is delivered as a press followed by a double-click
//!    event. On a window caption it also toggles maximize.
//! 2. Otherwise an ancestor may claim the press through
//!    [`Widget::wants_mouse_override`](trellis_widget::Widget::wants_mouse_override).
//! 3. Otherwise a press of the drag button on an `ALLOW_DRAG` widget, or on
//!    a window caption, starts a drag and is not delivered.
//! 4. Otherwise the target receives it.
//!
//! Releases go to the widget holding mouse focus, if the matching press
//! landed on a widget. While a drag is in progress every event is swallowed,
//! except the drag button release, which drops the widget, and Escape, which
//! cancels the drag.

use kurbo::Point;
use smallvec::SmallVec;
use trellis_event_state::click::ClickKind;
use trellis_widget::events::{
    CharEvent, JoystickAxisEvent, JoystickButtonEvent, Key, KeyEvent, MouseButtonEvent,
    MouseMoveEvent, MouseWheelEvent,
};
use trellis_widget::{InputFlags, Requests, WidgetId};

use crate::desktop::Desktop;
use crate::drag::{DragState, clamp_drag_position, restore_x};
use crate::shortcuts::KeyCombination;

impl Desktop {
    /// Route a mouse button event. Returns `true` if it was consumed.
    pub fn mouse_button(&mut self, event: &MouseButtonEvent) -> bool {
        self.cursor = event.position;
        if self.drag.is_some() {
            if !event.pressed && event.button == self.config.drag_button {
                self.handle_dragging();
                self.end_drag(event.position);
                self.captured = false;
            }
            return true;
        }
        if event.pressed {
            self.press(event)
        } else {
            self.release(event)
        }
    }

    fn press(&mut self, event: &MouseButtonEvent) -> bool {
        self.hide_tooltip();
        let Some(hit) = self
            .hit_test(event.position, true)
            .and_then(|h| self.accepting(h))
        else {
            if self.exclusive().is_none() {
                self.set_focus(None);
            }
            return false;
        };
        self.set_focus(Some(hit));
        self.tree.bring_on_top(hit, true);
        self.mouse_focus = Some(hit);
        self.captured = true;

        let kind = self.clicks.on_press(
            hit,
            event.button.index(),
            event.position,
            event.timestamp,
        );
        let caption = self.caption_at(hit, event.position);
        let mut requests = Requests::default();
        let handled = if kind == ClickKind::Double {
            let forwarded = self.tree.forward_mouse_button(hit, event, &mut requests);
            self.mouse_focus = Some(forwarded.handler);
            self.tree.forward_double_click(hit, event, &mut requests);
            if let Some(window) = caption {
                self.toggle_maximize(window);
            }
            true
        } else if let Some(handler) = self.tree.mouse_override(hit, event, &mut requests) {
            self.mouse_focus = Some(handler);
            true
        } else if event.button == self.config.drag_button
            && (self.tree.input_flags(hit).contains(InputFlags::ALLOW_DRAG) || caption.is_some())
        {
            self.begin_drag(caption.unwrap_or(hit));
            true
        } else {
            self.tree.deliver_mouse_button(hit, event, &mut requests)
        };
        self.apply(requests);
        handled
    }

    fn release(&mut self, event: &MouseButtonEvent) -> bool {
        if !core::mem::replace(&mut self.captured, false) {
            return false;
        }
        let Some(target) = self.mouse_focus.filter(|id| self.tree.is_alive(*id)) else {
            return false;
        };
        let mut requests = Requests::default();
        let handled = self.tree.deliver_mouse_button(target, event, &mut requests);
        self.apply(requests);
        handled
    }

    /// Route cursor motion.
    ///
    /// While a button is held the mouse-focus widget receives moves; otherwise
    /// the widget under the cursor does. Hover changes send enter and leave
    /// notifications and restart the tooltip delay.
    pub fn mouse_move(&mut self, event: &MouseMoveEvent) -> bool {
        self.cursor = event.position;
        if self.drag.is_some() {
            self.update_dock_preview(event.position);
            return true;
        }
        let hit = self
            .hit_test(event.position, false)
            .and_then(|h| self.accepting(h));
        self.set_hover(hit, event.timestamp);
        let target = if self.captured { self.mouse_focus } else { hit };
        let Some(target) = target.filter(|id| self.tree.is_alive(*id)) else {
            return false;
        };
        let mut requests = Requests::default();
        let handled = self.tree.forward_mouse_move(target, event, &mut requests);
        self.apply(requests);
        handled
    }

    /// Route a wheel event to the widget under the cursor.
    pub fn mouse_wheel(&mut self, event: &MouseWheelEvent) -> bool {
        self.cursor = event.position;
        if self.drag.is_some() {
            return true;
        }
        let Some(target) = self
            .hit_test(event.position, false)
            .and_then(|h| self.accepting(h))
        else {
            return false;
        };
        let mut requests = Requests::default();
        let handled = self.tree.forward_mouse_wheel(target, event, &mut requests);
        self.apply(requests);
        handled
    }

    /// Route a key event.
    ///
    /// Presses matching a registered shortcut run it instead of reaching the
    /// focus, provided nothing is focused or the focus has
    /// [`InputFlags::SHORTCUTS_ALLOWED`].
    pub fn key(&mut self, event: &KeyEvent) -> bool {
        if self.drag.is_some() {
            if event.pressed && event.key == Key::Escape {
                self.cancel_drag();
            }
            return true;
        }
        if event.pressed
            && self.shortcuts_enabled()
            && self
                .shortcuts
                .fire(KeyCombination::new(event.key, event.modifiers))
        {
            return true;
        }
        let Some(focus) = self.live_focus() else {
            return false;
        };
        let mut requests = Requests::default();
        let handled = self.tree.forward_key(focus, event, &mut requests);
        self.apply(requests);
        handled
    }

    /// Route text input to the focus.
    pub fn char(&mut self, event: &CharEvent) -> bool {
        if self.drag.is_some() {
            return true;
        }
        let Some(focus) = self.live_focus() else {
            return false;
        };
        let mut requests = Requests::default();
        let handled = self.tree.forward_char(focus, event, &mut requests);
        self.apply(requests);
        handled
    }

    /// Route a joystick button to the focus.
    pub fn joystick_button(&mut self, event: &JoystickButtonEvent) -> bool {
        if self.drag.is_some() {
            return true;
        }
        let Some(focus) = self.live_focus() else {
            return false;
        };
        let mut requests = Requests::default();
        let handled = self.tree.forward_joystick_button(focus, event, &mut requests);
        self.apply(requests);
        handled
    }

    /// Route joystick axis motion to the focus.
    pub fn joystick_axis(&mut self, event: &JoystickAxisEvent) -> bool {
        if self.drag.is_some() {
            return true;
        }
        let Some(focus) = self.live_focus() else {
            return false;
        };
        let mut requests = Requests::default();
        let handled = self.tree.forward_joystick_axis(focus, event, &mut requests);
        self.apply(requests);
        handled
    }

    /// Move the dragged widget to follow the cursor.
    ///
    /// The new position is the position at drag start plus the cursor delta,
    /// clamped so the widget's origin stays inside its parent's padded
    /// rectangle. A maximized window is restored first, under the cursor at
    /// the same relative horizontal offset. Runs at the start of every
    /// geometry pass.
    pub fn handle_dragging(&mut self) {
        let Some(mut drag) = self.drag else {
            return;
        };
        let id = drag.widget;
        let parent = self.tree.parent_of(id);
        let bounds = parent
            .and_then(|p| self.tree.padded_rect(p))
            .unwrap_or(self.rect);
        let Some(props) = self.tree.props_mut(id) else {
            self.drag = None;
            return;
        };
        if let Some(mut window) = props.window
            && window.maximized
            && window.resizable
            && self.cursor != drag.cursor_start
        {
            let restored = window.restore.take().map_or(props.size, |r| r.size());
            let grip = drag.cursor_start.y - drag.rect_start.y0;
            window.maximized = false;
            props.window = Some(window);
            props.size = restored;
            drag.anchor = Point::new(
                restore_x(self.cursor.x, drag.rect_start, restored.width) - bounds.x0,
                self.cursor.y - grip - bounds.y0,
            );
            drag.cursor_start = self.cursor;
            tracing::debug!(widget = ?id, "maximized window restored by drag");
        }
        let target = drag.anchor + (self.cursor - drag.cursor_start);
        props.position = clamp_drag_position(target, bounds, self.config.drag_margin);
        self.drag = Some(drag);
    }

    /// Start dragging `id`. A docked widget is pulled out of its container
    /// and floats at its current rectangle.
    pub(crate) fn begin_drag(&mut self, id: WidgetId) -> bool {
        let Some(rect) = self.tree.rect(id).filter(|_| self.tree.is_alive(id)) else {
            tracing::debug!(widget = ?id, "drag refused: no geometry");
            return false;
        };
        let undocked_from = self.tree.dock_container_of(id);
        if undocked_from.is_some() {
            self.tree.detach(id);
            if let Some(props) = self.tree.props_mut(id) {
                props.position = (rect.origin() - self.rect.origin()).to_point();
                props.size = rect.size();
            }
            self.tree.add_widget(self.root, id);
            self.tree.bring_on_top(id, false);
        }
        let Some(props) = self.tree.props(id) else {
            return false;
        };
        self.drag = Some(DragState {
            widget: id,
            cursor_start: self.cursor,
            anchor: props.position,
            position_start: props.position,
            size_start: props.size,
            window_start: props.window,
            rect_start: rect,
            undocked_from,
        });
        self.mouse_focus = Some(id);
        tracing::debug!(widget = ?id, ?undocked_from, "drag began");
        true
    }

    /// Finish the drag. A dockable widget dropped on a dock container is
    /// docked there; anything else stays where it was dropped.
    fn end_drag(&mut self, at: Point) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.clear_dock_preview();
        let dockable = self.tree.props(drag.widget).is_some_and(|p| p.dockable);
        if dockable
            && let Some(host) = self.dock_host_at(at, drag.widget)
            && self.drop_into(host, drag.widget, at)
        {
            tracing::debug!(widget = ?drag.widget, ?host, "drag ended: docked");
            return;
        }
        tracing::debug!(widget = ?drag.widget, "drag ended");
    }

    /// Abandon the drag and put the widget back where it started.
    fn cancel_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.clear_dock_preview();
        self.captured = false;
        if let Some(props) = self.tree.props_mut(drag.widget) {
            props.position = drag.position_start;
            props.size = drag.size_start;
            props.window = drag.window_start;
        }
        if let Some(host) = drag.undocked_from
            && !self.restore_into(host, drag.widget)
        {
            self.drop_into(host, drag.widget, drag.rect_start.center());
        }
        tracing::debug!(widget = ?drag.widget, "drag cancelled");
    }

    /// The dock host under `at`, looking beneath the dragged widget.
    fn dock_host_at(&mut self, at: Point, dragged: WidgetId) -> Option<WidgetId> {
        let hit = self.tree.trace_excluding(self.root, at, dragged)?;
        let chain: SmallVec<[WidgetId; 16]> = self.tree.self_and_ancestors(hit).collect();
        chain.into_iter().find(|id| {
            self.tree
                .with_widget(*id, |w, _| w.dock_host().is_some())
                .unwrap_or(false)
        })
    }

    fn drop_into(&mut self, host: WidgetId, widget: WidgetId, at: Point) -> bool {
        self.tree
            .with_widget(host, |w, tree| {
                w.dock_host()
                    .is_some_and(|dock| dock.accept_drop(tree, host, widget, at))
            })
            .unwrap_or(false)
    }

    fn restore_into(&mut self, host: WidgetId, widget: WidgetId) -> bool {
        self.tree
            .with_widget(host, |w, tree| {
                w.dock_host()
                    .is_some_and(|dock| dock.restore(tree, host, widget))
            })
            .unwrap_or(false)
    }

    fn update_dock_preview(&mut self, at: Point) {
        let Some(drag) = self.drag else {
            return;
        };
        if !self.tree.props(drag.widget).is_some_and(|p| p.dockable) {
            return;
        }
        let host = self.dock_host_at(at, drag.widget);
        if host != self.dock_target {
            self.clear_dock_preview();
        }
        self.dock_target = host;
        if let Some(host) = host {
            self.tree.with_widget(host, |w, tree| {
                if let Some(dock) = w.dock_host() {
                    dock.preview_drop(tree, host, drag.widget, at);
                }
            });
        }
    }

    fn clear_dock_preview(&mut self) {
        if let Some(host) = self.dock_target.take() {
            self.tree.with_widget(host, |w, _| {
                if let Some(dock) = w.dock_host() {
                    dock.clear_preview();
                }
            });
        }
    }

    /// Topmost widget under `pt` among those currently allowed to take input.
    fn hit_test(&mut self, pt: Point, close_popup_on_miss: bool) -> Option<WidgetId> {
        if let Some(popup) = self.popup {
            if let Some(hit) = self.tree.trace(popup, pt) {
                return Some(hit);
            }
            if close_popup_on_miss {
                self.close_popup();
            }
        }
        let scope = self
            .exclusive()
            .or(self.fullscreen)
            .unwrap_or(self.root);
        self.tree.trace(scope, pt)
    }

    /// Nearest widget at or above `id` that takes input.
    fn accepting(&self, id: WidgetId) -> Option<WidgetId> {
        self.tree
            .self_and_ancestors(id)
            .find(|w| *w != self.root && !self.tree.input_flags(*w).contains(InputFlags::NO_INPUT))
    }

    /// The top-level resizable window whose caption is under `pt`, when the
    /// press landed on the window itself.
    fn caption_at(&self, hit: WidgetId, pt: Point) -> Option<WidgetId> {
        if self.tree.parent_of(hit) != Some(self.root) {
            return None;
        }
        let window = self.tree.props(hit)?.window.filter(|w| w.resizable)?;
        let rect = self.tree.rect(hit)?;
        window.caption_contains(rect, pt).then_some(hit)
    }

    fn set_hover(&mut self, hit: Option<WidgetId>, timestamp: u64) {
        if hit == self.hover {
            return;
        }
        let previous = core::mem::replace(&mut self.hover, hit);
        self.hide_tooltip();
        self.tooltip.since = timestamp;
        let mut requests = Requests::default();
        if let Some(old) = previous.filter(|id| self.tree.is_alive(*id)) {
            self.tree.deliver(old, &mut requests, |w, cx| w.on_mouse_leave(cx));
        }
        if let Some(new) = hit {
            self.tree.deliver(new, &mut requests, |w, cx| w.on_mouse_enter(cx));
        }
        self.apply(requests);
    }

    fn live_focus(&self) -> Option<WidgetId> {
        self.focus.filter(|id| self.tree.is_live(*id))
    }

    fn shortcuts_enabled(&self) -> bool {
        self.focus.filter(|id| self.tree.is_alive(*id)).is_none_or(|id| {
            self.tree
                .input_flags(id)
                .contains(InputFlags::SHORTCUTS_ALLOWED)
        })
    }
}
