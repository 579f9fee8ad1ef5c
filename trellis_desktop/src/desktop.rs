// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Desktop state, geometry and focus.

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;
use trellis_event_state::click::ClickState;
use trellis_widget::layout::Layout;
use trellis_widget::{
    AutoSize, Canvas, Cursor, DrawOptions, InputFlags, Panel, Requests, Tree, Visibility, Widget,
    WidgetId, WidgetProps, ZOrder,
};

use crate::config::DesktopConfig;
use crate::drag::DragState;
use crate::shortcuts::Shortcuts;
use crate::tooltip::{TooltipState, tooltip_origin};

/// The desktop root lays its children out itself, so its own strategy is empty.
#[derive(Clone, Copy, Debug)]
struct TopLevel;

impl Layout for TopLevel {
    fn measure(&mut self, _tree: &mut Tree, _id: WidgetId, _auto: AutoSize, available: Size) -> Size {
        available
    }

    fn arrange(&mut self, _tree: &mut Tree, _id: WidgetId, _auto: AutoSize) {}
}

/// Root of a widget hierarchy and its input routing.
///
/// A desktop owns a [`Tree`] whose root covers the viewport. Top-level
/// widgets are the root's children; their `position` and `size` properties
/// are their desktop rectangle, unless they are maximized windows, which fill
/// the desktop.
///
/// Each frame runs in a fixed order: input ([`mouse_button`](Self::mouse_button),
/// [`key`](Self::key), ...), then [`update_geometry`](Self::update_geometry),
/// then [`draw`](Self::draw). Input is resolved against the geometry of the
/// previous pass.
///
/// ```rust
/// use kurbo::{Point, Size};
/// use trellis_desktop::Desktop;
/// use trellis_widget::events::{Modifiers, MouseButton, MouseButtonEvent};
/// use trellis_widget::{Panel, WidgetProps};
///
/// let mut desktop = Desktop::new();
/// let a = desktop.insert(WidgetProps::sized(Point::new(10.0, 10.0), Size::new(100.0, 80.0)), Panel);
/// let b = desktop.insert(WidgetProps::sized(Point::new(60.0, 40.0), Size::new(100.0, 80.0)), Panel);
/// desktop.update_geometry(Size::new(800.0, 600.0));
///
/// // A press on the overlap focuses the topmost widget.
/// let press = MouseButtonEvent {
///     button: MouseButton::Left,
///     pressed: true,
///     position: Point::new(80.0, 60.0),
///     modifiers: Modifiers::empty(),
///     timestamp: 0,
/// };
/// desktop.mouse_button(&press);
/// assert_eq!(desktop.focus(), Some(b));
///
/// // Pressing `a` brings it on top.
/// desktop.mouse_button(&MouseButtonEvent { position: Point::new(20.0, 20.0), ..press });
/// assert_eq!(desktop.focus(), Some(a));
/// assert_eq!(desktop.tree().children_of(desktop.root()), &[b, a]);
/// ```
#[derive(Debug)]
pub struct Desktop {
    pub(crate) tree: Tree,
    pub(crate) root: WidgetId,
    /// Input thresholds.
    pub config: DesktopConfig,
    pub(crate) rect: Rect,
    pub(crate) focus: Option<WidgetId>,
    /// Widget receiving button releases, and moves while a button is held.
    pub(crate) mouse_focus: Option<WidgetId>,
    pub(crate) captured: bool,
    pub(crate) hover: Option<WidgetId>,
    pub(crate) popup: Option<WidgetId>,
    pub(crate) fullscreen: Option<WidgetId>,
    pub(crate) drag: Option<DragState>,
    /// Drag requested by a handler, started after the next geometry pass.
    pub(crate) pending_drag: Option<WidgetId>,
    /// Dock host currently showing a drop preview.
    pub(crate) dock_target: Option<WidgetId>,
    pub(crate) clicks: ClickState<WidgetId>,
    pub(crate) shortcuts: Shortcuts,
    pub(crate) tooltip: TooltipState,
    pub(crate) cursor: Point,
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Desktop {
    /// Create an empty desktop with default thresholds.
    pub fn new() -> Self {
        Self::with_config(DesktopConfig::default())
    }

    /// Create an empty desktop.
    pub fn with_config(config: DesktopConfig) -> Self {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            WidgetProps::default()
                .named("desktop")
                .with_input(InputFlags::NO_INPUT | InputFlags::TRANSPARENT),
            Panel,
        );
        tree.set_layout(root, TopLevel);
        Self {
            tree,
            root,
            config,
            rect: Rect::ZERO,
            focus: None,
            mouse_focus: None,
            captured: false,
            hover: None,
            popup: None,
            fullscreen: None,
            drag: None,
            pending_drag: None,
            dock_target: None,
            clicks: ClickState::with_config(config.double_click),
            shortcuts: Shortcuts::new(),
            tooltip: TooltipState::default(),
            cursor: Point::ZERO,
        }
    }

    /// The widget tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The widget tree, mutably.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The root widget; top-level widgets are its children.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// The desktop rectangle of the last geometry pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Create a top-level widget.
    pub fn insert(&mut self, props: WidgetProps, widget: impl Widget) -> WidgetId {
        self.tree.insert(Some(self.root), props, widget)
    }

    /// Make `id` a top-level widget, on top of its band.
    pub fn add_widget(&mut self, id: WidgetId) -> bool {
        self.tree.add_widget(self.root, id)
    }

    /// Remove `id` and its subtree from the tree.
    pub fn remove_widget(&mut self, id: WidgetId) {
        self.clicks.forget(&id);
        self.tree.remove(id);
        self.forget_stale();
    }

    /// Keyboard shortcut table.
    pub fn shortcuts_mut(&mut self) -> &mut Shortcuts {
        &mut self.shortcuts
    }

    /// Widget with keyboard focus.
    pub fn focus(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Widget receiving releases and captured moves.
    pub fn mouse_focus(&self) -> Option<WidgetId> {
        self.mouse_focus
    }

    /// Widget under the cursor as of the last move.
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hover
    }

    /// The open popup.
    pub fn popup(&self) -> Option<WidgetId> {
        self.popup
    }

    /// The fullscreen widget.
    pub fn fullscreen(&self) -> Option<WidgetId> {
        self.fullscreen
    }

    /// The widget being dragged.
    pub fn dragging(&self) -> Option<WidgetId> {
        self.drag.map(|d| d.widget)
    }

    /// The tooltip widget currently shown.
    pub fn tooltip(&self) -> Option<WidgetId> {
        self.tooltip.shown
    }

    /// Lay `id` out over the whole desktop and bypass every other top-level
    /// widget for layout, drawing and input. `None` restores normal mode.
    pub fn set_fullscreen(&mut self, id: Option<WidgetId>) {
        let id = id.filter(|w| self.tree.is_alive(*w));
        if self.fullscreen != id {
            tracing::debug!(fullscreen = ?id, "fullscreen changed");
        }
        self.fullscreen = id;
    }

    /// Run the geometry pass for a desktop of `size`.
    ///
    /// Advances the visibility frame, moves the dragged widget, lays out the
    /// top-level widgets (or only the fullscreen one and the open popup), then
    /// starts any drag a handler requested since the last pass.
    pub fn update_geometry(&mut self, size: Size) {
        self.forget_stale();
        self.handle_dragging();
        let frame = self.tree.begin_frame();
        self.rect = Rect::from_origin_size(Point::ZERO, size);
        self.tree.set_rect(self.root, self.rect);
        self.tree.measure(self.root, false, false, size);
        self.tree.arrange(self.root, false, false);
        match self.fullscreen {
            Some(id) => {
                self.layout_top_level(id, true);
                if let Some(popup) = self.popup.filter(|p| *p != id) {
                    self.layout_top_level(popup, false);
                }
            }
            None => {
                let children: SmallVec<[WidgetId; 16]> =
                    self.tree.slots_of(self.root).iter().copied().collect();
                for id in children {
                    self.layout_top_level(id, false);
                }
            }
        }
        if let Some(id) = self.pending_drag.take() {
            self.begin_drag(id);
        }
        tracing::trace!(frame, ?size, "desktop geometry updated");
    }

    fn layout_top_level(&mut self, id: WidgetId, fill: bool) {
        let Some(props) = self.tree.props(id) else {
            return;
        };
        if props.visibility == Visibility::Collapsed {
            return;
        }
        let fill = fill || props.window.is_some_and(|w| w.maximized);
        let (rect, auto) = if fill {
            (self.rect, false)
        } else {
            let origin = self.rect.origin() + props.position.to_vec2();
            (Rect::from_origin_size(origin, props.size), true)
        };
        self.tree.measure(id, auto, auto, rect.size());
        self.tree.set_rect(id, rect);
        self.tree.arrange(id, auto, auto);
    }

    /// Draw the desktop, or only the fullscreen widget and the open popup.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, options: &DrawOptions) {
        let Some(fullscreen) = self.fullscreen else {
            self.tree.draw(self.root, canvas, options);
            return;
        };
        self.tree.draw(fullscreen, canvas, options);
        if let Some(popup) = self.popup.filter(|p| *p != fullscreen) {
            self.tree.draw(popup, canvas, options);
        }
    }

    /// Move keyboard focus.
    ///
    /// No-op when `target` already has focus, is stale, or does not take
    /// input. Otherwise the old focus is told it lost focus, the new one that
    /// it received it, and mouse focus follows.
    pub fn set_focus(&mut self, target: Option<WidgetId>) -> bool {
        if target == self.focus {
            return false;
        }
        if let Some(t) = target
            && (!self.tree.is_alive(t) || self.tree.input_flags(t).contains(InputFlags::NO_INPUT))
        {
            tracing::debug!(widget = ?t, "focus refused");
            return false;
        }
        let previous = core::mem::replace(&mut self.focus, target);
        self.mouse_focus = target;
        let mut requests = Requests::default();
        if let Some(old) = previous {
            self.tree.forward_focus_lost(old, &mut requests);
        }
        if let Some(new) = target {
            self.tree.forward_focus_received(new, &mut requests);
        }
        tracing::debug!(?previous, focus = ?target, "focus changed");
        self.apply(requests);
        true
    }

    /// The nearest live exclusive widget at or above the focus.
    ///
    /// While one exists, input outside its subtree is blocked.
    pub fn exclusive(&self) -> Option<WidgetId> {
        let focus = self.focus?;
        self.tree.self_and_ancestors(focus).find(|id| {
            self.tree.is_live(*id)
                && self
                    .tree
                    .props(*id)
                    .is_some_and(|p| p.z_order.contains(ZOrder::EXCLUSIVE))
        })
    }

    /// Open `popup` at `anchor` as a top-level widget above everything.
    ///
    /// A different open popup is closed first.
    pub fn open_popup(&mut self, popup: WidgetId, anchor: Point) -> bool {
        if !self.tree.is_alive(popup) || popup == self.root {
            return false;
        }
        if self.popup.is_some_and(|p| p != popup) {
            self.close_popup();
        }
        let Some(props) = self.tree.props_mut(popup) else {
            return false;
        };
        props.position = anchor;
        let z_order = props.z_order | ZOrder::POPUP;
        self.tree.set_z_order(popup, z_order);
        self.tree.add_widget(self.root, popup);
        self.tree.bring_on_top(popup, false);
        self.popup = Some(popup);
        tracing::debug!(?popup, ?anchor, "popup opened");
        true
    }

    /// Close the open popup. The popup is unparented, not destroyed.
    pub fn close_popup(&mut self) {
        let Some(popup) = self.popup.take() else {
            return;
        };
        self.tree.detach(popup);
        if self
            .focus
            .is_some_and(|f| self.tree.is_ancestor_or_self(popup, f))
        {
            self.set_focus(None);
        }
        tracing::debug!(?popup, "popup closed");
    }

    /// Toggle maximize on a top-level resizable window.
    pub fn toggle_maximize(&mut self, id: WidgetId) -> bool {
        if self.tree.parent_of(id) != Some(self.root) {
            return false;
        }
        let Some(props) = self.tree.props_mut(id) else {
            return false;
        };
        let Some(mut window) = props.window.filter(|w| w.resizable) else {
            return false;
        };
        if window.maximized {
            window.maximized = false;
            if let Some(r) = window.restore.take() {
                props.position = r.origin();
                props.size = r.size();
            }
        } else {
            window.restore = Some(Rect::from_origin_size(props.position, props.size));
            window.maximized = true;
        }
        props.window = Some(window);
        tracing::debug!(?id, maximized = window.maximized, "window toggled");
        true
    }

    /// Show the hovered widget's tooltip once it has been hovered long enough.
    pub fn tick(&mut self, now_ms: u64) {
        if self.drag.is_some() || self.tooltip.shown.is_some() {
            return;
        }
        let Some(owner) = self.hover else {
            return;
        };
        let Some(tip) = self.tree.props(owner).and_then(|p| p.tooltip) else {
            return;
        };
        let delay = tip.delay_ms.unwrap_or(self.config.default_tooltip_delay_ms);
        if now_ms.saturating_sub(self.tooltip.since) < delay {
            return;
        }
        let (Some(owner_rect), true) = (self.tree.rect(owner), self.tree.is_alive(tip.widget))
        else {
            return;
        };
        let origin = tooltip_origin(tip.placement, owner_rect, self.cursor);
        let Some(props) = self.tree.props_mut(tip.widget) else {
            return;
        };
        props.position = (origin - self.rect.origin()).to_point();
        props.input |= InputFlags::TRANSPARENT;
        let z_order = props.z_order | ZOrder::POPUP;
        self.tree.set_z_order(tip.widget, z_order);
        self.tree.add_widget(self.root, tip.widget);
        self.tree.bring_on_top(tip.widget, false);
        self.tooltip.shown = Some(tip.widget);
        tracing::debug!(?owner, tooltip = ?tip.widget, "tooltip shown");
    }

    pub(crate) fn hide_tooltip(&mut self) {
        if let Some(tip) = self.tooltip.shown.take() {
            self.tree.detach(tip);
        }
    }

    /// Cursor for the captured or hovered widget.
    ///
    /// Each widget from there up to the root is asked via
    /// [`Widget::cursor_at`], then its `cursor` property; the first answer wins.
    pub fn cursor(&self) -> Cursor {
        if self.drag.is_some() {
            return Cursor::Move;
        }
        let target = if self.captured {
            self.mouse_focus
        } else {
            self.hover
        };
        let Some(target) = target else {
            return Cursor::Default;
        };
        for id in self.tree.self_and_ancestors(target) {
            if let Some(cursor) = self
                .tree
                .widget_dyn(id)
                .and_then(|w| w.cursor_at(&self.tree, id, self.cursor))
            {
                return cursor;
            }
            if let Some(cursor) = self.tree.props(id).and_then(|p| p.cursor) {
                return cursor;
            }
        }
        Cursor::Default
    }

    /// Apply side effects queued by handlers.
    pub(crate) fn apply(&mut self, requests: Requests) {
        if requests.is_empty() {
            return;
        }
        if let Some(id) = requests.drag {
            self.pending_drag = Some(id);
        }
        if requests.close_popup {
            self.close_popup();
        }
        if let Some((popup, anchor)) = requests.open_popup {
            self.open_popup(popup, anchor);
        }
        if let Some(target) = requests.focus {
            self.set_focus(Some(target));
        }
    }

    /// Drop references to widgets that no longer exist.
    pub(crate) fn forget_stale(&mut self) {
        let tree = &self.tree;
        let alive = |id: &WidgetId| tree.is_alive(*id);
        self.focus = self.focus.filter(alive);
        self.mouse_focus = self.mouse_focus.filter(alive);
        self.hover = self.hover.filter(alive);
        self.popup = self.popup.filter(alive);
        self.fullscreen = self.fullscreen.filter(alive);
        self.pending_drag = self.pending_drag.filter(alive);
        self.dock_target = self.dock_target.filter(alive);
        self.tooltip.shown = self.tooltip.shown.filter(alive);
        if self.drag.is_some_and(|d| !tree.is_alive(d.widget)) {
            self.drag = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Log, Recorder, at};
    use trellis_widget::{Tooltip, TooltipPlacement, WindowRole};

    #[test]
    fn top_level_widgets_use_their_own_rectangle() {
        let mut desktop = Desktop::new();
        let a = desktop.insert(at(10.0, 20.0, 100.0, 50.0), Panel);
        desktop.update_geometry(Size::new(800.0, 600.0));
        assert_eq!(desktop.tree().rect(a), Some(Rect::new(10.0, 20.0, 110.0, 70.0)));
        assert!(desktop.tree().is_live(desktop.root()));
        assert_eq!(desktop.tree().trace(desktop.root(), Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn maximized_windows_fill_the_desktop() {
        let mut desktop = Desktop::new();
        let w = desktop.insert(
            at(10.0, 20.0, 100.0, 50.0).with_window(WindowRole::resizable(20.0)),
            Panel,
        );
        assert!(desktop.toggle_maximize(w));
        desktop.update_geometry(Size::new(800.0, 600.0));
        assert_eq!(desktop.tree().rect(w), Some(Rect::new(0.0, 0.0, 800.0, 600.0)));

        assert!(desktop.toggle_maximize(w));
        desktop.update_geometry(Size::new(800.0, 600.0));
        assert_eq!(desktop.tree().rect(w), Some(Rect::new(10.0, 20.0, 110.0, 70.0)));
    }

    #[test]
    fn fullscreen_bypasses_other_widgets() {
        let mut desktop = Desktop::new();
        let a = desktop.insert(at(0.0, 0.0, 100.0, 100.0), Panel);
        let b = desktop.insert(at(200.0, 0.0, 100.0, 100.0), Panel);
        desktop.set_fullscreen(Some(b));
        desktop.update_geometry(Size::new(400.0, 300.0));
        assert!(!desktop.tree().is_live(a));
        assert_eq!(desktop.tree().rect(b), Some(Rect::new(0.0, 0.0, 400.0, 300.0)));

        desktop.set_fullscreen(None);
        desktop.update_geometry(Size::new(400.0, 300.0));
        assert!(desktop.tree().is_live(a));
    }

    #[test]
    fn focus_changes_notify_both_sides() {
        let log = Log::default();
        let mut desktop = Desktop::new();
        let a = desktop.insert(at(0.0, 0.0, 10.0, 10.0), Recorder::new("a", &log));
        let b = desktop.insert(at(0.0, 0.0, 10.0, 10.0), Recorder::new("b", &log));
        let inert = desktop.insert(
            at(0.0, 0.0, 10.0, 10.0).with_input(InputFlags::NO_INPUT),
            Panel,
        );

        assert!(desktop.set_focus(Some(a)));
        assert!(!desktop.set_focus(Some(a)));
        assert!(desktop.set_focus(Some(b)));
        assert!(!desktop.set_focus(Some(inert)));
        assert_eq!(desktop.focus(), Some(b));
        assert_eq!(desktop.mouse_focus(), Some(b));
        assert_eq!(
            log.take(),
            [("a", "focus"), ("a", "blur"), ("b", "focus")]
        );
    }

    #[test]
    fn exclusive_is_found_above_the_focus() {
        let mut desktop = Desktop::new();
        let dialog = desktop.insert(
            at(0.0, 0.0, 100.0, 100.0).with_z_order(ZOrder::EXCLUSIVE),
            Panel,
        );
        let field = desktop
            .tree_mut()
            .insert(Some(dialog), at(10.0, 10.0, 20.0, 20.0), Panel);
        desktop.update_geometry(Size::new(200.0, 200.0));
        desktop.set_focus(Some(field));
        assert_eq!(desktop.exclusive(), Some(dialog));
        desktop.set_focus(None);
        assert_eq!(desktop.exclusive(), None);
    }

    #[test]
    fn popups_sit_above_everything_and_close_cleanly() {
        let mut desktop = Desktop::new();
        let front = desktop.insert(
            at(0.0, 0.0, 50.0, 50.0).with_z_order(ZOrder::STAY_FOREGROUND),
            Panel,
        );
        let menu = desktop.tree_mut().create(at(0.0, 0.0, 30.0, 40.0), Panel);
        assert!(desktop.open_popup(menu, Point::new(5.0, 5.0)));
        desktop.set_focus(Some(menu));
        desktop.update_geometry(Size::new(200.0, 200.0));
        assert_eq!(desktop.tree().children_of(desktop.root()), &[front, menu]);
        assert_eq!(desktop.tree().rect(menu), Some(Rect::new(5.0, 5.0, 35.0, 45.0)));

        desktop.close_popup();
        assert_eq!(desktop.popup(), None);
        assert_eq!(desktop.focus(), None);
        assert!(desktop.tree().is_alive(menu));
        assert_eq!(desktop.tree().parent_of(menu), None);
    }

    #[test]
    fn tooltips_wait_for_their_delay() {
        let mut desktop = Desktop::new();
        let tip = desktop.tree_mut().create(at(0.0, 0.0, 40.0, 12.0), Panel);
        let owner = desktop.insert(
            WidgetProps {
                tooltip: Some(Tooltip {
                    widget: tip,
                    delay_ms: None,
                    placement: TooltipPlacement::Below,
                }),
                ..at(10.0, 10.0, 50.0, 20.0)
            },
            Panel,
        );
        desktop.update_geometry(Size::new(200.0, 200.0));
        desktop.hover = Some(owner);
        desktop.tooltip.since = 1_000;

        desktop.tick(1_499);
        assert_eq!(desktop.tooltip(), None);
        desktop.tick(1_500);
        assert_eq!(desktop.tooltip(), Some(tip));
        desktop.update_geometry(Size::new(200.0, 200.0));
        assert_eq!(desktop.tree().rect(tip), Some(Rect::new(10.0, 30.0, 50.0, 42.0)));
        assert_eq!(
            desktop.tree().trace(desktop.root(), Point::new(20.0, 35.0)),
            None,
            "tooltips never take input"
        );

        desktop.hide_tooltip();
        assert_eq!(desktop.tree().parent_of(tip), None);
    }

    #[test]
    fn cursor_walks_up_to_the_nearest_request() {
        let mut desktop = Desktop::new();
        let window = desktop.insert(
            WidgetProps {
                cursor: Some(Cursor::Pointer),
                ..at(0.0, 0.0, 100.0, 100.0)
            },
            Panel,
        );
        let child = desktop
            .tree_mut()
            .insert(Some(window), at(0.0, 0.0, 10.0, 10.0), Panel);
        desktop.hover = Some(child);
        assert_eq!(desktop.cursor(), Cursor::Pointer);
        desktop.hover = None;
        assert_eq!(desktop.cursor(), Cursor::Default);
    }

    #[test]
    fn removed_widgets_are_forgotten() {
        let mut desktop = Desktop::new();
        let a = desktop.insert(at(0.0, 0.0, 10.0, 10.0), Panel);
        desktop.set_focus(Some(a));
        desktop.remove_widget(a);
        assert_eq!(desktop.focus(), None);
        assert_eq!(desktop.mouse_focus(), None);
    }
}
