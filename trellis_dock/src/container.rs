// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dock container widget.

use core::any::Any;

use kurbo::{Point, Size};
use trellis_widget::events::{MouseButton, MouseButtonEvent, MouseMoveEvent};
use trellis_widget::layout::Layout;
use trellis_widget::{
    AutoSize, Canvas, Color, Cursor, DockHost, DrawCx, EventCx, Tree, Widget, WidgetId,
    WidgetProps,
};

use crate::placement::Placement;
use crate::tree::{DockSlot, DockTree};
use crate::types::{DockConfig, DockNodeId, DockZone, SplitKind};

#[derive(Clone, Copy, Debug)]
struct SplitterDrag {
    node: DockNodeId,
    anchor: Point,
    anchor_split: f64,
}

/// A widget that lays its docked children out with a [`DockTree`].
///
/// Docked widgets are ordinary children of the container in the widget tree,
/// linked back to it through [`Tree::dock_container_of`]. Only the active tab
/// of each leaf is arranged, so the others are neither drawn nor hit-tested.
///
/// The container claims left presses on its separators before its children
/// see them and resizes the split while the button is held. During a drag
/// from the desktop it shows the compass zone the dragged widget would drop
/// into.
#[derive(Debug)]
pub struct DockContainer {
    dock: DockTree,
    splitter: Option<SplitterDrag>,
    preview: Option<Placement>,
    /// Last widget undocked and where it sat.
    released: Option<(WidgetId, DockSlot)>,
    /// Fill of the drop preview.
    pub preview_color: Color,
    /// Fill of the separator bands.
    pub separator_color: Color,
}

impl Default for DockContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl DockContainer {
    /// Create a container with the default thresholds.
    pub fn new() -> Self {
        Self::with_config(DockConfig::default())
    }

    /// Create a container with custom thresholds.
    pub fn with_config(config: DockConfig) -> Self {
        Self {
            dock: DockTree::with_config(config),
            splitter: None,
            preview: None,
            released: None,
            preview_color: Color::rgba(0.2, 0.45, 0.9, 0.35),
            separator_color: Color::rgba(0.3, 0.3, 0.3, 1.0),
        }
    }

    /// Insert a container into `tree` with [`DockLayout`] as its layout.
    pub fn create(tree: &mut Tree, parent: Option<WidgetId>, props: WidgetProps) -> WidgetId {
        let id = tree.insert(parent, props, Self::new());
        tree.set_layout(id, DockLayout);
        id
    }

    /// Run `f` on the container behind `host`.
    ///
    /// Returns `None` if `host` is stale, is not a container, or is already
    /// checked out.
    pub fn with<R>(
        tree: &mut Tree,
        host: WidgetId,
        f: impl FnOnce(&mut Self, &mut Tree) -> R,
    ) -> Option<R> {
        tree.with_widget(host, |w, tree| {
            (w as &mut dyn Any)
                .downcast_mut::<Self>()
                .map(|container| f(container, tree))
        })
        .flatten()
    }

    /// The dock tree.
    pub fn dock(&self) -> &DockTree {
        &self.dock
    }

    /// The dock tree, mutably. Structural edits made here bypass the widget
    /// tree links; use [`attach`](Self::attach) and [`detach`](Self::detach)
    /// to move widgets in and out.
    pub fn dock_mut(&mut self) -> &mut DockTree {
        &mut self.dock
    }

    /// The drop preview currently shown, if any.
    pub fn preview(&self) -> Option<&Placement> {
        self.preview.as_ref()
    }

    /// Returns `true` while a separator is being dragged.
    pub fn is_resizing(&self) -> bool {
        self.splitter.is_some()
    }

    /// Dock `widget` into `leaf` (see [`DockTree::attach_widget`]) and make it
    /// a child of `host`.
    ///
    /// Refused if the widget is already docked in any container.
    pub fn attach(
        &mut self,
        tree: &mut Tree,
        host: WidgetId,
        widget: WidgetId,
        leaf: DockNodeId,
        zone: DockZone,
        split: f64,
    ) -> Option<DockNodeId> {
        self.link(tree, host, widget, |dock, _| {
            dock.attach_widget(widget, leaf, zone, split)
        })
    }

    /// Dock `widget` wherever a drop at `at` lands, keeping its current size
    /// where the split allows.
    pub fn attach_at(
        &mut self,
        tree: &mut Tree,
        host: WidgetId,
        widget: WidgetId,
        at: Point,
    ) -> Option<DockNodeId> {
        self.link(tree, host, widget, |dock, size| {
            dock.attach_widget_at(widget, size, at)
        })
    }

    fn link(
        &mut self,
        tree: &mut Tree,
        host: WidgetId,
        widget: WidgetId,
        place: impl FnOnce(&mut DockTree, Size) -> Option<DockNodeId>,
    ) -> Option<DockNodeId> {
        if !tree.is_alive(widget) || tree.is_ancestor_or_self(widget, host) {
            return None;
        }
        if let Some(other) = tree.dock_container_of(widget) {
            tracing::debug!(?widget, container = ?other, "dock attach refused: already docked");
            return None;
        }
        let size = tree
            .rect(widget)
            .map(|r| r.size())
            .filter(|s| s.width > 0.0 && s.height > 0.0)
            .or_else(|| tree.props(widget).map(|p| p.size))
            .unwrap_or(Size::ZERO);
        let leaf = place(&mut self.dock, size)?;
        if !tree.add_widget(host, widget) {
            self.dock.remove_widget(widget);
            return None;
        }
        tree.set_dock_container(widget, Some(host));
        tracing::debug!(?widget, ?host, ?leaf, "docked");
        Some(leaf)
    }

    /// Undock `widget` and unparent it. The widget stays alive, floating.
    pub fn detach(&mut self, tree: &mut Tree, host: WidgetId, widget: WidgetId) -> bool {
        if tree.dock_container_of(widget) != Some(host) {
            return false;
        }
        self.undock(widget);
        tree.set_dock_container(widget, None);
        tree.detach(widget);
        tracing::debug!(?widget, ?host, "undocked");
        true
    }

    /// Dock `widget` back where it was before the last time it was undocked
    /// from this container.
    pub fn restore(
        &mut self,
        tree: &mut Tree,
        host: WidgetId,
        widget: WidgetId,
    ) -> Option<DockNodeId> {
        let slot = match self.released {
            Some((released, slot)) if released == widget => slot,
            _ => return None,
        };
        let leaf = self.link(tree, host, widget, |dock, _| dock.restore_widget(widget, slot))?;
        self.released = None;
        Some(leaf)
    }

    fn undock(&mut self, widget: WidgetId) -> bool {
        let Some(slot) = self.dock.slot_of(widget) else {
            return false;
        };
        self.released = Some((widget, slot));
        self.dock.remove_widget(widget)
    }

    /// Bring `widget` to the front of its leaf.
    pub fn activate(&mut self, widget: WidgetId) -> bool {
        match self.dock.find_widget(widget) {
            Some((leaf, index)) => self.dock.activate(leaf, index),
            None => false,
        }
    }

    fn accepts(tree: &Tree, host: WidgetId, widget: WidgetId) -> bool {
        tree.props(widget).is_some_and(|p| p.dockable)
            && tree.dock_container_of(widget).is_none()
            && !tree.is_ancestor_or_self(widget, host)
    }

    /// Start or end a separator drag. Returns `true` if the event was used.
    fn splitter_button(&mut self, event: &MouseButtonEvent) -> bool {
        if event.button != MouseButton::Left {
            return false;
        }
        if !event.pressed {
            return self.splitter.take().is_some();
        }
        let Some(node) = self.dock.trace_separator(event.position) else {
            return false;
        };
        let Some((_, split)) = self.dock.split_of(node) else {
            return false;
        };
        self.splitter = Some(SplitterDrag {
            node,
            anchor: event.position,
            anchor_split: split,
        });
        true
    }
}

impl Widget for DockContainer {
    fn post_draw(&mut self, _cx: &DrawCx<'_>, canvas: &mut dyn Canvas) {
        for node in self.dock.splits() {
            if let Some(band) = self.dock.separator_rect(node) {
                canvas.fill_rect(band, self.separator_color);
            }
        }
        if let Some(preview) = &self.preview {
            canvas.fill_path(&preview.polygon.to_path(), self.preview_color);
        }
    }

    fn wants_mouse_override(&mut self, _cx: &mut EventCx<'_>, event: &MouseButtonEvent) -> bool {
        self.splitter_button(event)
    }

    fn on_mouse_button(&mut self, _cx: &mut EventCx<'_>, event: &MouseButtonEvent) -> bool {
        self.splitter_button(event)
    }

    fn on_mouse_move(&mut self, _cx: &mut EventCx<'_>, event: &MouseMoveEvent) -> bool {
        let Some(drag) = self.splitter else {
            return false;
        };
        let delta = match self.dock.split_of(drag.node) {
            Some((SplitKind::Vertical, _)) => event.position.x - drag.anchor.x,
            Some((SplitKind::Horizontal, _)) => event.position.y - drag.anchor.y,
            None => {
                self.splitter = None;
                return false;
            }
        };
        self.dock.drag_separator(drag.node, drag.anchor_split, delta)
    }

    fn on_focus_lost(&mut self, _cx: &mut EventCx<'_>) {
        self.splitter = None;
    }

    fn cursor_at(&self, _tree: &Tree, _id: WidgetId, pt: Point) -> Option<Cursor> {
        let node = match self.splitter {
            Some(drag) => drag.node,
            None => self.dock.trace_separator(pt)?,
        };
        match self.dock.split_of(node)?.0 {
            SplitKind::Vertical => Some(Cursor::ResizeHorizontal),
            SplitKind::Horizontal => Some(Cursor::ResizeVertical),
        }
    }

    fn dock_host(&mut self) -> Option<&mut dyn DockHost> {
        Some(self)
    }
}

impl DockHost for DockContainer {
    fn update_layout(&mut self, tree: &mut Tree, host: WidgetId) {
        let pruned = self
            .dock
            .retain_widgets(|w| tree.dock_container_of(w) == Some(host));
        if pruned > 0 {
            tracing::debug!(?host, pruned, "pruned stale docked widgets");
        }
        if self
            .splitter
            .is_some_and(|d| self.dock.split_of(d.node).is_none())
        {
            self.splitter = None;
        }
        let Some(padded) = tree.padded_rect(host) else {
            return;
        };
        self.dock.update(padded, &mut |_, widgets, active, rect| {
            if let Some(&widget) = widgets.get(active) {
                tree.set_rect(widget, rect);
                tree.measure(widget, false, false, rect.size());
                tree.arrange(widget, false, false);
            }
        });
    }

    fn preview_drop(&mut self, tree: &Tree, host: WidgetId, widget: WidgetId, at: Point) -> bool {
        self.preview = if Self::accepts(tree, host, widget) {
            self.dock.placement(at)
        } else {
            None
        };
        self.preview.is_some()
    }

    fn clear_preview(&mut self) {
        self.preview = None;
    }

    fn accept_drop(
        &mut self,
        tree: &mut Tree,
        host: WidgetId,
        widget: WidgetId,
        at: Point,
    ) -> bool {
        self.preview = None;
        Self::accepts(tree, host, widget) && self.attach_at(tree, host, widget, at).is_some()
    }

    fn release(&mut self, _tree: &mut Tree, _host: WidgetId, widget: WidgetId) -> bool {
        self.undock(widget)
    }

    fn restore(&mut self, tree: &mut Tree, host: WidgetId, widget: WidgetId) -> bool {
        self.preview = None;
        DockContainer::restore(self, tree, host, widget).is_some()
    }
}

/// Layout strategy of a [`DockContainer`]: fills the offered space and hands
/// arrangement to the container's dock tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct DockLayout;

impl Layout for DockLayout {
    fn measure(&mut self, _tree: &mut Tree, _id: WidgetId, _auto: AutoSize, available: Size) -> Size {
        available
    }

    fn arrange(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize) {
        tree.with_widget(id, |w, tree| {
            if let Some(host) = w.dock_host() {
                host.update_layout(tree, id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::Rect;
    use trellis_widget::events::Modifiers;
    use trellis_widget::{CommandList, Panel, Requests};

    struct Scene {
        tree: Tree,
        root: WidgetId,
        host: WidgetId,
    }

    impl Scene {
        fn new() -> Self {
            let mut tree = Tree::new();
            let root = tree.insert(None, WidgetProps::default(), Panel);
            let host = DockContainer::create(
                &mut tree,
                Some(root),
                WidgetProps::sized(Point::ZERO, Size::new(200.0, 100.0)),
            );
            Self { tree, root, host }
        }

        fn panel(&mut self) -> WidgetId {
            self.tree.create(WidgetProps::default().dockable(), Panel)
        }

        fn attach(&mut self, widget: WidgetId, zone: DockZone) -> Option<DockNodeId> {
            let host = self.host;
            DockContainer::with(&mut self.tree, host, |d, tree| {
                let leaf = d.dock().leaves()[0];
                d.attach(tree, host, widget, leaf, zone, 0.5)
            })
            .flatten()
        }

        fn layout(&mut self) {
            self.tree.begin_frame();
            self.tree.set_rect(self.root, Rect::new(0.0, 0.0, 200.0, 100.0));
            self.tree
                .measure(self.root, false, false, Size::new(200.0, 100.0));
            self.tree.arrange(self.root, false, false);
        }

        fn dock<R>(&mut self, f: impl FnOnce(&mut DockContainer, &mut Tree) -> R) -> R {
            DockContainer::with(&mut self.tree, self.host, f).unwrap()
        }
    }

    fn button(pressed: bool, x: f64, y: f64) -> MouseButtonEvent {
        MouseButtonEvent {
            button: MouseButton::Left,
            pressed,
            position: Point::new(x, y),
            modifiers: Modifiers::empty(),
            timestamp: 0,
        }
    }

    #[test]
    fn docked_widgets_follow_the_dock_tree() {
        let mut s = Scene::new();
        let a = s.panel();
        let b = s.panel();
        let c = s.panel();
        s.attach(a, DockZone::Center);
        s.attach(b, DockZone::Center);
        s.attach(c, DockZone::Right);
        s.layout();

        assert_eq!(s.tree.parent_of(a), Some(s.host));
        assert_eq!(s.tree.dock_container_of(c), Some(s.host));
        assert_eq!(s.tree.rect(a), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(s.tree.rect(c), Some(Rect::new(100.0, 0.0, 200.0, 100.0)));
        assert!(!s.tree.is_live(b), "inactive tabs are not arranged");
        assert_eq!(s.tree.trace(s.root, Point::new(150.0, 50.0)), Some(c));

        s.dock(|d, _| d.activate(b));
        s.layout();
        assert!(s.tree.is_live(b));
        assert!(!s.tree.is_live(a));
    }

    #[test]
    fn widgets_dock_into_one_container_at_a_time() {
        let mut s = Scene::new();
        let other = DockContainer::create(&mut s.tree, Some(s.root), WidgetProps::default());
        let a = s.panel();
        assert!(s.attach(a, DockZone::Center).is_some());
        let refused = DockContainer::with(&mut s.tree, other, |d, tree| {
            let leaf = d.dock().root();
            d.attach(tree, other, a, leaf, DockZone::Center, 0.5)
        });
        assert_eq!(refused, Some(None));
        assert_eq!(s.tree.parent_of(a), Some(s.host));
    }

    #[test]
    fn tree_detach_releases_from_the_dock() {
        let mut s = Scene::new();
        let a = s.panel();
        let b = s.panel();
        s.attach(a, DockZone::Center);
        s.attach(b, DockZone::Left);
        assert!(s.tree.detach(b));

        assert_eq!(s.tree.dock_container_of(b), None);
        assert!(s.tree.is_alive(b));
        s.dock(|d, _| {
            assert_eq!(d.dock().widgets(), [a]);
            assert!(d.dock().is_leaf(d.dock().root()));
        });

        let host = s.host;
        assert!(s.dock(|d, tree| d.detach(tree, host, a)));
        assert_eq!(s.tree.parent_of(a), None);
        assert!(s.dock(|d, _| d.dock().widgets().is_empty()));
    }

    #[test]
    fn released_widgets_can_be_restored() {
        let mut s = Scene::new();
        let a = s.panel();
        let b = s.panel();
        s.attach(a, DockZone::Center);
        s.attach(b, DockZone::Left);
        s.layout();
        let docked = s.tree.rect(b);
        let shape = s.dock(|d, _| d.dock().shape());

        assert!(s.tree.detach(b));
        let host = s.host;
        assert_eq!(s.dock(|d, tree| d.restore(tree, host, a)), None);
        assert!(s.dock(|d, tree| d.restore(tree, host, b)).is_some());
        assert_eq!(s.dock(|d, tree| d.restore(tree, host, b)), None);
        s.layout();

        assert_eq!(s.dock(|d, _| d.dock().shape()), shape);
        assert_eq!(s.tree.parent_of(b), Some(host));
        assert_eq!(s.tree.dock_container_of(b), Some(host));
        assert_eq!(s.tree.rect(b), docked);
    }

    #[test]
    fn removed_widgets_leave_the_dock() {
        let mut s = Scene::new();
        let a = s.panel();
        let b = s.panel();
        s.attach(a, DockZone::Center);
        s.attach(b, DockZone::Bottom);
        s.tree.remove(a);
        s.layout();
        assert_eq!(s.dock(|d, _| d.dock().widgets()), [b]);
        assert_eq!(s.tree.rect(b), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
    }

    #[test]
    fn separator_press_is_claimed_and_drags_the_split() {
        let mut s = Scene::new();
        let a = s.panel();
        let b = s.panel();
        s.attach(a, DockZone::Center);
        s.attach(b, DockZone::Right);
        s.layout();

        let mut requests = Requests::default();
        let out = s
            .tree
            .forward_mouse_button(a, &button(true, 99.0, 50.0), &mut requests);
        assert_eq!(out.handler, s.host);
        assert!(out.handled);
        assert!(s.dock(|d, _| d.is_resizing()));

        let host = s.host;
        let moved = MouseMoveEvent {
            position: Point::new(129.0, 70.0),
            modifiers: Modifiers::empty(),
            timestamp: 0,
        };
        assert!(s.tree.forward_mouse_move(host, &moved, &mut requests));
        s.tree
            .forward_mouse_button(host, &button(false, 129.0, 70.0), &mut requests);
        assert!(!s.dock(|d, _| d.is_resizing()));

        s.layout();
        assert_eq!(s.tree.rect(a), Some(Rect::new(0.0, 0.0, 130.0, 100.0)));

        let away = s
            .tree
            .forward_mouse_button(a, &button(true, 20.0, 50.0), &mut requests);
        assert_eq!(away.handler, a);
    }

    #[test]
    fn separators_show_resize_cursors() {
        let mut s = Scene::new();
        let a = s.panel();
        let b = s.panel();
        s.attach(a, DockZone::Center);
        s.attach(b, DockZone::Top);
        s.layout();
        let host = s.host;
        let container = s.tree.widget::<DockContainer>(host).unwrap();
        assert_eq!(
            container.cursor_at(&s.tree, host, Point::new(20.0, 50.0)),
            Some(Cursor::ResizeVertical)
        );
        assert_eq!(container.cursor_at(&s.tree, host, Point::new(20.0, 20.0)), None);
    }

    #[test]
    fn drops_preview_then_dock_dockable_widgets() {
        let mut s = Scene::new();
        let a = s.panel();
        s.attach(a, DockZone::Center);
        s.layout();
        let floating = s.tree.insert(
            Some(s.root),
            WidgetProps::sized(Point::new(50.0, 20.0), Size::new(40.0, 30.0)).dockable(),
            Panel,
        );
        let plain = s.tree.create(WidgetProps::default(), Panel);
        let host = s.host;

        assert!(!s.dock(|d, tree| d.preview_drop(tree, host, plain, Point::new(10.0, 50.0))));
        assert!(s.dock(|d, tree| d.preview_drop(tree, host, floating, Point::new(10.0, 50.0))));
        let zone = s.dock(|d, _| d.preview().map(|p| p.zone));
        assert_eq!(zone, Some(DockZone::Left));

        let mut list = CommandList::new();
        s.tree.draw(s.root, &mut list, &trellis_widget::DrawOptions::default());
        let previews: Vec<_> = list.fills().filter(|(_, c)| c.a < 1.0).collect();
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].0, Rect::new(0.0, 0.0, 30.0, 100.0));

        assert!(s.dock(|d, tree| d.accept_drop(tree, host, floating, Point::new(10.0, 50.0))));
        assert!(s.dock(|d, _| d.preview().is_none()));
        assert_eq!(s.tree.parent_of(floating), Some(host));
        s.layout();
        assert_eq!(s.tree.rect(floating), Some(Rect::new(0.0, 0.0, 40.0, 100.0)));
    }
}
