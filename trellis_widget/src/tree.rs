// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, geometry passes, hit testing, z-order.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use hashbrown::HashMap;
use kurbo::{Insets, Point, Rect, Size};
use smallvec::SmallVec;

use crate::layout::{BoxLayout, Layout};
use crate::types::{
    InputFlags, ShareGroup, Visibility, WidgetId, WidgetProps, ZBand, ZOrder,
};
use crate::widget::Widget;

/// Rectangles thinner than this on either axis are treated as degenerate.
pub const DEGENERATE_EXTENT: f64 = 1e-6;

/// Arena of widgets.
///
/// The tree owns every widget. Parents own their children through the
/// children list; parent, dock-container and desktop links are plain ids and
/// never keep anything alive.
///
/// Geometry is produced by the two layout passes. Each geometry pass starts
/// with [`Tree::begin_frame`]; a widget is *live* (drawable and hit-testable)
/// only if [`Tree::arrange`] stamped it during the current frame.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect, Size};
/// use trellis_widget::{Panel, Tree, WidgetProps};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, WidgetProps::default(), Panel);
/// let child = tree.insert(
///     Some(root),
///     WidgetProps::sized(Point::new(10.0, 10.0), Size::new(30.0, 20.0)),
///     Panel,
/// );
///
/// tree.begin_frame();
/// tree.set_rect(root, Rect::new(0.0, 0.0, 100.0, 100.0));
/// tree.measure(root, false, false, Size::new(100.0, 100.0));
/// tree.arrange(root, false, false);
///
/// assert_eq!(tree.rect(child), Some(Rect::new(10.0, 10.0, 40.0, 30.0)));
/// assert_eq!(tree.trace(root, Point::new(15.0, 15.0)), Some(child));
/// assert_eq!(tree.trace(root, Point::new(80.0, 80.0)), Some(root));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    frame: u64,
    share_groups: HashMap<ShareGroup, SmallVec<[WidgetId; 4]>>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("frame", &self.frame)
            .field("share_groups", &self.share_groups.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Geometry {
    pub(crate) measured: Size,
    pub(crate) rect: Rect,
    pub(crate) padded: Rect,
    pub(crate) frame: u64,
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<WidgetId>,
    /// Render order, bottom first.
    pub(crate) children: Vec<WidgetId>,
    /// Layout order.
    pub(crate) slots: Vec<WidgetId>,
    pub(crate) props: WidgetProps,
    pub(crate) share_group: Option<ShareGroup>,
    pub(crate) dock_container: Option<WidgetId>,
    pub(crate) geometry: Geometry,
    /// `None` while checked out by [`Tree::with_layout`].
    layout: Option<Box<dyn Layout>>,
    /// `None` while checked out by [`Tree::with_widget`].
    widget: Option<Box<dyn Widget>>,
}

impl Node {
    fn new(generation: u32, props: WidgetProps, widget: Box<dyn Widget>) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            slots: Vec::new(),
            props,
            share_group: None,
            dock_container: None,
            geometry: Geometry::default(),
            layout: Some(Box::new(BoxLayout::default())),
            widget: Some(widget),
        }
    }
}

/// Iterator over a widget and its ancestors, innermost first.
#[derive(Clone, Debug)]
pub struct SelfAndAncestors<'a> {
    tree: &'a Tree,
    next: Option<WidgetId>,
}

impl Iterator for SelfAndAncestors<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<WidgetId> {
        let id = self.next?;
        self.next = self.tree.parent_of(id);
        Some(id)
    }
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            // Fresh nodes carry frame 0 and must not count as live.
            frame: 1,
            share_groups: HashMap::new(),
        }
    }

    // ---- structure -------------------------------------------------------

    /// Create an unparented widget.
    pub fn create(&mut self, props: WidgetProps, widget: impl Widget) -> WidgetId {
        self.create_boxed(props, Box::new(widget))
    }

    /// Create an unparented widget from a boxed behaviour.
    pub fn create_boxed(&mut self, props: WidgetProps, widget: Box<dyn Widget>) -> WidgetId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, props, widget));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, props, widget)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "WidgetId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        WidgetId::new(idx, generation)
    }

    /// Create a widget and add it to `parent` (or leave it unparented if `None`).
    pub fn insert(
        &mut self,
        parent: Option<WidgetId>,
        props: WidgetProps,
        widget: impl Widget,
    ) -> WidgetId {
        let id = self.create(props, widget);
        if let Some(p) = parent {
            self.add_widget(p, id);
        }
        id
    }

    /// Replace a widget's layout strategy.
    pub fn set_layout(&mut self, id: WidgetId, layout: impl Layout + 'static) {
        if let Some(n) = self.node_opt_mut(id) {
            n.layout = Some(Box::new(layout));
        }
    }

    /// Make `child` the topmost child of its band under `parent`, and the last
    /// layout slot.
    ///
    /// A child of another parent is detached from it first. Adding a widget to
    /// its current parent is a no-op. Returns `false` for stale ids and for
    /// additions that would create a cycle.
    pub fn add_widget(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::debug!(?parent, ?child, "add_widget refused: would create a cycle");
            return false;
        }
        if self.parent_of(child) == Some(parent) {
            return true;
        }
        if self.parent_of(child).is_some() {
            self.detach(child);
        }
        let band = self.band_of(child);
        let Some(p) = self.node_opt(parent) else {
            return false;
        };
        let at = self.band_insert_index(&p.children, band);
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.insert(at, child);
            p.slots.push(child);
        }
        if let Some(c) = self.node_opt_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Unlink `id` from its parent and from the dock container holding it.
    ///
    /// The widget stays alive in the arena, unparented, until it is re-added
    /// or [removed](Self::remove). Returns `true` if it had a parent.
    pub fn detach(&mut self, id: WidgetId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(host) = self.node_opt(id).and_then(|n| n.dock_container) {
            self.with_widget(host, |w, tree| {
                if let Some(dock) = w.dock_host() {
                    dock.release(tree, host, id);
                }
            });
            if let Some(n) = self.node_opt_mut(id) {
                n.dock_container = None;
            }
        }
        let Some(parent) = self.parent_of(id) else {
            return false;
        };
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
            p.slots.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
        true
    }

    /// Remove a widget and its subtree from the arena.
    ///
    /// Ids of removed widgets become stale immediately.
    pub fn remove(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        self.set_share_group(id, None);
        let children = self
            .node_opt(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` to position `index` in its parent's layout slots.
    pub fn move_slot(&mut self, id: WidgetId, index: usize) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        if let Some(p) = self.node_opt_mut(parent) {
            p.slots.retain(|c| *c != id);
            let at = index.min(p.slots.len());
            p.slots.insert(at, id);
        }
    }

    // ---- z-order ---------------------------------------------------------

    /// Change a widget's z-order flags and move it to the top of its new band.
    pub fn set_z_order(&mut self, id: WidgetId, z_order: ZOrder) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        if n.props.z_order == z_order {
            return;
        }
        n.props.z_order = z_order;
        let Some(parent) = n.parent else {
            return;
        };
        self.restack(parent, id);
    }

    /// Reorder `id` within its siblings.
    ///
    /// Popups go to the very end, foreground and exclusive widgets just before
    /// the first popup, normal widgets just before the first
    /// foreground/exclusive/popup sibling. Background widgets never move.
    /// With `recursive`, the same is applied to every ancestor.
    pub fn bring_on_top(&mut self, id: WidgetId, recursive: bool) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        if self.band_of(id) != ZBand::Background {
            self.restack(parent, id);
        }
        if recursive {
            self.bring_on_top(parent, true);
        }
    }

    fn restack(&mut self, parent: WidgetId, id: WidgetId) {
        let band = self.band_of(id);
        let Some(p) = self.node_opt_mut(parent) else {
            return;
        };
        let mut siblings = core::mem::take(&mut p.children);
        siblings.retain(|c| *c != id);
        let at = self.band_insert_index(&siblings, band);
        siblings.insert(at, id);
        if let Some(p) = self.node_opt_mut(parent) {
            p.children = siblings;
        }
    }

    /// First index whose sibling sits in a higher band than `band`.
    fn band_insert_index(&self, siblings: &[WidgetId], band: ZBand) -> usize {
        siblings
            .iter()
            .position(|s| self.band_of(*s) > band)
            .unwrap_or(siblings.len())
    }

    /// Ordering band of a widget.
    pub fn band_of(&self, id: WidgetId) -> ZBand {
        self.node_opt(id)
            .map_or(ZBand::Normal, |n| n.props.z_order.band())
    }

    // ---- queries ---------------------------------------------------------

    /// Returns `true` if `id` refers to a widget in the arena.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns `true` if `id` was arranged during the current frame.
    pub fn is_live(&self, id: WidgetId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.geometry.frame == self.frame)
    }

    /// Current visibility frame.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Start a new geometry pass. Every widget stops being live until arranged again.
    pub fn begin_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    /// Widget attributes.
    pub fn props(&self, id: WidgetId) -> Option<&WidgetProps> {
        self.node_opt(id).map(|n| &n.props)
    }

    /// Mutable widget attributes. Use [`Tree::set_z_order`] for z-order changes.
    pub fn props_mut(&mut self, id: WidgetId) -> Option<&mut WidgetProps> {
        self.node_opt_mut(id).map(|n| &mut n.props)
    }

    /// Input flags, or empty for stale ids.
    pub fn input_flags(&self, id: WidgetId) -> InputFlags {
        self.node_opt(id)
            .map_or(InputFlags::empty(), |n| n.props.input)
    }

    /// Visibility, or `Collapsed` for stale ids.
    pub fn visibility(&self, id: WidgetId) -> Visibility {
        self.node_opt(id)
            .map_or(Visibility::Collapsed, |n| n.props.visibility)
    }

    /// Parent of a widget.
    pub fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children in render order, bottom first.
    pub fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Children in layout order.
    pub fn slots_of(&self, id: WidgetId) -> &[WidgetId] {
        self.node_opt(id).map_or(&[], |n| n.slots.as_slice())
    }

    /// `id` followed by its ancestors up to the root.
    pub fn self_and_ancestors(&self, id: WidgetId) -> SelfAndAncestors<'_> {
        SelfAndAncestors {
            tree: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// Returns `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        self.self_and_ancestors(id).any(|a| a == ancestor)
    }

    /// Arranged rectangle as of the last geometry pass.
    pub fn rect(&self, id: WidgetId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.geometry.rect)
    }

    /// Arranged rectangle minus padding.
    pub fn padded_rect(&self, id: WidgetId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.geometry.padded)
    }

    /// Size computed by the last [`Tree::measure`].
    pub fn measured_size(&self, id: WidgetId) -> Option<Size> {
        self.node_opt(id).map(|n| n.geometry.measured)
    }

    /// Set a widget's rectangle ahead of [`Tree::arrange`].
    ///
    /// Parents (or layout strategies) call this to position a child.
    pub fn set_rect(&mut self, id: WidgetId, rect: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.geometry.rect = rect;
        }
    }

    // ---- layout passes ---------------------------------------------------

    /// Pass 1: compute the size of `id` for a parent proposing `proposed`.
    ///
    /// The layout strategy measures children inside `proposed` minus padding.
    /// On each axis where auto-sizing is both allowed by the caller and enabled
    /// on the widget, the result is the content size plus padding; otherwise it
    /// is exactly the proposed size.
    pub fn measure(
        &mut self,
        id: WidgetId,
        allow_auto_width: bool,
        allow_auto_height: bool,
        proposed: Size,
    ) -> Size {
        let Some(n) = self.node_opt(id) else {
            return Size::ZERO;
        };
        let pad = n.props.padding;
        let auto = n
            .props
            .auto_size
            .allowed(allow_auto_width, allow_auto_height);
        let adjusted = Size::new(
            (proposed.width - pad.x_value()).max(0.0),
            (proposed.height - pad.y_value()).max(0.0),
        );
        let content = self
            .with_layout(id, |layout, tree| layout.measure(tree, id, auto, adjusted))
            .unwrap_or(Size::ZERO);
        let measured = Size::new(
            if auto.width {
                content.width + pad.x_value()
            } else {
                proposed.width
            },
            if auto.height {
                content.height + pad.y_value()
            } else {
                proposed.height
            },
        );
        if let Some(n) = self.node_opt_mut(id) {
            n.geometry.measured = measured;
        }
        measured
    }

    /// Pass 2: position the children of `id` inside its rectangle.
    ///
    /// The rectangle must have been set by the parent. Auto-sized axes are
    /// rebuilt from the rectangle's origin and the measured size. Widgets that
    /// are not `Visible`, or whose rectangle is degenerate, are left unstamped
    /// and their children are not arranged.
    pub fn arrange(&mut self, id: WidgetId, allow_auto_width: bool, allow_auto_height: bool) {
        let frame = self.frame;
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        if n.props.visibility != Visibility::Visible {
            return;
        }
        let auto = n
            .props
            .auto_size
            .allowed(allow_auto_width, allow_auto_height);
        let mut rect = n.geometry.rect;
        if auto.width {
            rect.x1 = rect.x0 + n.geometry.measured.width;
        }
        if auto.height {
            rect.y1 = rect.y0 + n.geometry.measured.height;
        }
        n.geometry.rect = rect;
        n.geometry.padded = inset(rect, n.props.padding);
        if is_degenerate(rect) {
            tracing::trace!(?id, ?rect, "arrange skipped: degenerate rectangle");
            return;
        }
        n.geometry.frame = frame;
        self.with_layout(id, |layout, tree| layout.arrange(tree, id, auto));
    }

    // ---- hit testing -----------------------------------------------------

    /// Topmost live widget under `pt` in the subtree of `root`.
    ///
    /// Children are tested in reverse render order before their parent. A
    /// widget is a candidate only if it is live, `pt` is inside its rectangle,
    /// and its hit-shape override (if any) accepts the point. Transparent
    /// widgets are never returned themselves.
    pub fn trace(&self, root: WidgetId, pt: Point) -> Option<WidgetId> {
        self.trace_inner(root, pt, None)
    }

    /// Like [`Tree::trace`], but ignores the subtree of `exclude`.
    ///
    /// Used to look under a widget that is being dragged.
    pub fn trace_excluding(&self, root: WidgetId, pt: Point, exclude: WidgetId) -> Option<WidgetId> {
        self.trace_inner(root, pt, Some(exclude))
    }

    fn trace_inner(&self, id: WidgetId, pt: Point, exclude: Option<WidgetId>) -> Option<WidgetId> {
        if exclude == Some(id) || !self.is_live(id) {
            return None;
        }
        let n = self.node_opt(id)?;
        let rect = n.geometry.rect;
        debug_assert!(!is_degenerate(rect), "live widget with degenerate rectangle");
        if !rect.contains(pt) {
            return None;
        }
        if let Some(shape) = &n.props.hit_shape
            && !shape.hit(rect, pt)
        {
            return None;
        }
        for child in n.children.iter().rev() {
            if let Some(hit) = self.trace_inner(*child, pt, exclude) {
                return Some(hit);
            }
        }
        if n.props.input.contains(InputFlags::TRANSPARENT) {
            None
        } else {
            Some(id)
        }
    }

    // ---- share groups and dock links -------------------------------------

    /// Put `id` in a share-inputs group, or take it out with `None`.
    pub fn set_share_group(&mut self, id: WidgetId, group: Option<ShareGroup>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let previous = core::mem::replace(&mut n.share_group, group);
        if previous == group {
            return;
        }
        if let Some(old) = previous
            && let Some(members) = self.share_groups.get_mut(&old)
        {
            members.retain(|m| *m != id);
            if members.is_empty() {
                self.share_groups.remove(&old);
            }
        }
        if let Some(new) = group {
            self.share_groups.entry(new).or_default().push(id);
        }
    }

    /// Share-inputs group of a widget.
    pub fn share_group_of(&self, id: WidgetId) -> Option<ShareGroup> {
        self.node_opt(id).and_then(|n| n.share_group)
    }

    /// Members of a share-inputs group, in join order.
    pub fn share_group_members(&self, group: ShareGroup) -> &[WidgetId] {
        self.share_groups.get(&group).map_or(&[], |m| m.as_slice())
    }

    /// Dock container currently holding `id`.
    pub fn dock_container_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.dock_container)
    }

    /// Record (or clear) the dock container holding `id`.
    ///
    /// Dock hosts maintain this link; [`Tree::detach`] uses it to release the
    /// widget from its host.
    pub fn set_dock_container(&mut self, id: WidgetId, host: Option<WidgetId>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.dock_container = host;
        }
    }

    // ---- behaviour access ------------------------------------------------

    /// Run `f` with the widget's behaviour checked out of the tree.
    ///
    /// Returns `None` for stale ids, or if the behaviour is already checked
    /// out further up the call stack.
    pub fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Option<R> {
        let mut widget = self.node_opt_mut(id)?.widget.take()?;
        let result = f(widget.as_mut(), self);
        if let Some(n) = self.node_opt_mut(id) {
            n.widget = Some(widget);
        }
        Some(result)
    }

    /// Run `f` with the widget's layout strategy checked out of the tree.
    pub fn with_layout<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Layout, &mut Self) -> R,
    ) -> Option<R> {
        let mut layout = self.node_opt_mut(id)?.layout.take()?;
        let result = f(layout.as_mut(), self);
        if let Some(n) = self.node_opt_mut(id) {
            n.layout = Some(layout);
        }
        Some(result)
    }

    /// The widget's behaviour, unless it is checked out.
    pub fn widget_dyn(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.node_opt(id)?.widget.as_deref()
    }

    /// The widget's behaviour, if it is a `T`.
    pub fn widget<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        let w: &dyn Widget = self.node_opt(id)?.widget.as_deref()?;
        (w as &dyn Any).downcast_ref::<T>()
    }

    /// The widget's behaviour, mutably, if it is a `T`.
    pub fn widget_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        let w: &mut dyn Widget = self.node_opt_mut(id)?.widget.as_deref_mut()?;
        (w as &mut dyn Any).downcast_mut::<T>()
    }

    pub(crate) fn node_opt(&self, id: WidgetId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    pub(crate) fn node_opt_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }
}

/// `rect` shrunk by `padding`, never inverted.
pub(crate) fn inset(rect: Rect, padding: Insets) -> Rect {
    let x0 = rect.x0 + padding.x0;
    let y0 = rect.y0 + padding.y0;
    Rect::new(
        x0,
        y0,
        (rect.x1 - padding.x1).max(x0),
        (rect.y1 - padding.y1).max(y0),
    )
}

/// Returns `true` if `rect` has (near) zero extent on either axis, or is NaN.
pub(crate) fn is_degenerate(rect: Rect) -> bool {
    !(rect.width() > DEGENERATE_EXTENT && rect.height() > DEGENERATE_EXTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AutoSize;
    use crate::widget::Panel;
    use kurbo::Circle;
    use trellis_hit_shape::HitShape;

    fn layout_root(tree: &mut Tree, root: WidgetId, size: Size) {
        tree.begin_frame();
        tree.set_rect(root, Rect::from_origin_size(Point::ZERO, size));
        tree.measure(root, false, false, size);
        tree.arrange(root, false, false);
    }

    fn panel_at(tree: &mut Tree, parent: WidgetId, rect: Rect) -> WidgetId {
        tree.insert(
            Some(parent),
            WidgetProps::sized(rect.origin(), rect.size()),
            Panel,
        )
    }

    #[test]
    fn insert_and_remove_make_ids_stale() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let a = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = panel_at(&mut tree, a, Rect::new(0.0, 0.0, 5.0, 5.0));
        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(b));
        assert!(tree.children_of(root).is_empty());
        // Slot reuse bumps the generation.
        let c = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(tree.is_alive(c));
        assert!(!tree.is_alive(a));
    }

    #[test]
    fn add_widget_reparents_and_rejects_cycles() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let a = tree.insert(Some(root), WidgetProps::default(), Panel);
        let b = tree.insert(Some(root), WidgetProps::default(), Panel);
        let c = tree.insert(Some(a), WidgetProps::default(), Panel);

        assert!(tree.add_widget(b, c));
        assert_eq!(tree.parent_of(c), Some(b));
        assert!(tree.children_of(a).is_empty());
        assert_eq!(tree.slots_of(b), &[c]);

        assert!(!tree.add_widget(c, root), "root under its own descendant");
        assert!(!tree.add_widget(c, c));
        assert!(tree.add_widget(b, c), "re-adding to the same parent is fine");
        assert_eq!(tree.children_of(b), &[c]);
    }

    #[test]
    fn detach_keeps_widget_alive() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let a = tree.insert(Some(root), WidgetProps::default(), Panel);
        assert!(tree.detach(a));
        assert!(tree.is_alive(a));
        assert_eq!(tree.parent_of(a), None);
        assert!(!tree.detach(a));
    }

    #[test]
    fn reverse_order_trace_and_transparency() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let a = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 60.0, 60.0));
        let b = panel_at(&mut tree, root, Rect::new(40.0, 40.0, 100.0, 100.0));
        layout_root(&mut tree, root, Size::new(100.0, 100.0));

        let both = Point::new(50.0, 50.0);
        assert_eq!(tree.trace(root, both), Some(b));

        if let Some(p) = tree.props_mut(b) {
            p.input |= InputFlags::TRANSPARENT;
        }
        assert_eq!(tree.trace(root, both), Some(a));
        assert_eq!(tree.trace(root, Point::new(90.0, 90.0)), Some(root));
    }

    #[test]
    fn trace_excluding_looks_underneath() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let a = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 60.0, 60.0));
        let b = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 60.0, 60.0));
        layout_root(&mut tree, root, Size::new(100.0, 100.0));
        assert_eq!(tree.trace_excluding(root, Point::new(5.0, 5.0), b), Some(a));
    }

    #[test]
    fn hit_shape_override_filters_corners() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let round = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 40.0, 40.0));
        if let Some(p) = tree.props_mut(round) {
            p.hit_shape = Some(HitShape::Circle(Circle::new((0.5, 0.5), 0.5)));
        }
        layout_root(&mut tree, root, Size::new(100.0, 100.0));
        assert_eq!(tree.trace(root, Point::new(20.0, 20.0)), Some(round));
        assert_eq!(tree.trace(root, Point::new(1.0, 1.0)), Some(root));
    }

    #[test]
    fn only_current_frame_is_live() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let a = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!tree.is_live(a), "never arranged");
        layout_root(&mut tree, root, Size::new(100.0, 100.0));
        assert!(tree.is_live(a));
        tree.begin_frame();
        assert!(!tree.is_live(a));
        assert_eq!(tree.trace(root, Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn invisible_and_degenerate_widgets_are_not_stamped() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let hidden = panel_at(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0));
        let flat = panel_at(&mut tree, root, Rect::new(20.0, 20.0, 30.0, 20.0));
        let inner = panel_at(&mut tree, hidden, Rect::new(0.0, 0.0, 5.0, 5.0));
        if let Some(p) = tree.props_mut(hidden) {
            p.visibility = Visibility::Invisible;
        }
        layout_root(&mut tree, root, Size::new(100.0, 100.0));
        assert!(!tree.is_live(hidden));
        assert!(!tree.is_live(inner));
        assert!(!tree.is_live(flat));
        assert_eq!(tree.trace(root, Point::new(5.0, 5.0)), Some(root));
    }

    #[test]
    fn measure_then_arrange_is_idempotent() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let fit = tree.insert(
            Some(root),
            WidgetProps::sized(Point::new(5.0, 5.0), Size::new(0.0, 0.0))
                .with_auto_size(AutoSize::BOTH)
                .with_padding(Insets::uniform(2.0)),
            Panel,
        );
        let _leaf = panel_at(&mut tree, fit, Rect::new(0.0, 0.0, 20.0, 10.0));

        layout_root(&mut tree, root, Size::new(100.0, 100.0));
        let first = (tree.measured_size(fit), tree.rect(fit), tree.padded_rect(fit));
        layout_root(&mut tree, root, Size::new(100.0, 100.0));
        let second = (tree.measured_size(fit), tree.rect(fit), tree.padded_rect(fit));
        assert_eq!(first, second);
        assert_eq!(first.1, Some(Rect::new(5.0, 5.0, 29.0, 19.0)));
        assert_eq!(first.2, Some(Rect::new(7.0, 7.0, 27.0, 17.0)));
    }

    #[test]
    fn measure_subtracts_padding_and_clamps() {
        let mut tree = Tree::new();
        let w = tree.insert(
            None,
            WidgetProps::default()
                .with_padding(Insets::uniform(10.0))
                .with_auto_size(AutoSize::BOTH),
            Panel,
        );
        // No children: content is empty, so the auto size is just the padding.
        assert_eq!(tree.measure(w, true, true, Size::new(5.0, 5.0)), Size::new(20.0, 20.0));
        // Auto-size not allowed by the parent: the proposal wins.
        assert_eq!(tree.measure(w, false, false, Size::new(5.0, 5.0)), Size::new(5.0, 5.0));
    }

    #[test]
    fn z_order_banding_survives_bring_on_top() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let flags = [
            ZOrder::POPUP,
            ZOrder::empty(),
            ZOrder::STAY_BACKGROUND,
            ZOrder::STAY_FOREGROUND,
            ZOrder::empty(),
            ZOrder::EXCLUSIVE,
            ZOrder::STAY_BACKGROUND,
            ZOrder::POPUP,
        ];
        let ids: Vec<WidgetId> = flags
            .iter()
            .map(|z| {
                tree.insert(
                    Some(root),
                    WidgetProps::default().with_z_order(*z),
                    Panel,
                )
            })
            .collect();

        let banded = |tree: &Tree| {
            let bands: Vec<ZBand> = tree
                .children_of(root)
                .iter()
                .map(|c| tree.band_of(*c))
                .collect();
            bands.windows(2).all(|w| w[0] <= w[1])
        };
        assert!(banded(&tree));

        // A fixed pseudo-random walk over the siblings.
        let mut k = 7_usize;
        for _ in 0..64 {
            k = (k * 31 + 11) % ids.len();
            tree.bring_on_top(ids[k], false);
            assert!(banded(&tree), "banding broken after raising {k}");
        }
    }

    #[test]
    fn bring_on_top_within_band() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let bg = tree.insert(
            Some(root),
            WidgetProps::default().with_z_order(ZOrder::STAY_BACKGROUND),
            Panel,
        );
        let a = tree.insert(Some(root), WidgetProps::default(), Panel);
        let b = tree.insert(Some(root), WidgetProps::default(), Panel);
        let fg = tree.insert(
            Some(root),
            WidgetProps::default().with_z_order(ZOrder::STAY_FOREGROUND),
            Panel,
        );
        let bg2 = tree.insert(
            Some(root),
            WidgetProps::default().with_z_order(ZOrder::STAY_BACKGROUND),
            Panel,
        );
        assert_eq!(tree.children_of(root), &[bg, bg2, a, b, fg]);

        tree.bring_on_top(a, false);
        assert_eq!(tree.children_of(root), &[bg, bg2, b, a, fg]);

        tree.bring_on_top(bg, false);
        assert_eq!(tree.children_of(root), &[bg, bg2, b, a, fg], "background stays");

        tree.set_z_order(b, ZOrder::POPUP);
        assert_eq!(tree.children_of(root), &[bg, bg2, a, fg, b]);
    }

    #[test]
    fn bring_on_top_recursive_raises_ancestors() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let w1 = tree.insert(Some(root), WidgetProps::default(), Panel);
        let w2 = tree.insert(Some(root), WidgetProps::default(), Panel);
        let inner = tree.insert(Some(w1), WidgetProps::default(), Panel);
        let _sibling = tree.insert(Some(w1), WidgetProps::default(), Panel);
        tree.bring_on_top(inner, true);
        assert_eq!(tree.children_of(root), &[w2, w1]);
        assert_eq!(tree.children_of(w1).last(), Some(&inner));
    }

    #[test]
    fn layout_slots_are_independent_of_render_order() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let a = tree.insert(Some(root), WidgetProps::default(), Panel);
        let b = tree.insert(Some(root), WidgetProps::default(), Panel);
        tree.bring_on_top(a, false);
        assert_eq!(tree.children_of(root), &[b, a]);
        assert_eq!(tree.slots_of(root), &[a, b]);
        tree.move_slot(b, 0);
        assert_eq!(tree.slots_of(root), &[b, a]);
    }

    #[test]
    fn share_group_membership() {
        let mut tree = Tree::new();
        let a = tree.create(WidgetProps::default(), Panel);
        let b = tree.create(WidgetProps::default(), Panel);
        let g = ShareGroup(3);
        tree.set_share_group(a, Some(g));
        tree.set_share_group(b, Some(g));
        assert_eq!(tree.share_group_members(g), &[a, b]);
        tree.remove(a);
        assert_eq!(tree.share_group_members(g), &[b]);
        tree.set_share_group(b, None);
        assert!(tree.share_group_members(g).is_empty());
    }

    #[test]
    fn downcast_behaviour() {
        #[derive(Debug, Default)]
        struct Counter(u32);
        impl Widget for Counter {}

        let mut tree = Tree::new();
        let c = tree.create(WidgetProps::default(), Counter::default());
        if let Some(counter) = tree.widget_mut::<Counter>(c) {
            counter.0 += 1;
        }
        assert_eq!(tree.widget::<Counter>(c).map(|c| c.0), Some(1));
        assert!(tree.widget::<Panel>(c).is_none());
    }
}
