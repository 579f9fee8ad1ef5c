// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dock tree: a binary space partition of leaves holding widgets.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use trellis_widget::WidgetId;

use crate::types::{DockConfig, DockNodeId, DockZone, SplitKind};

/// What a dock node holds.
#[derive(Clone, Debug, PartialEq)]
pub enum DockContent {
    /// A pane showing one of its widgets at a time, like a tab strip.
    Leaf {
        /// Widgets in tab order.
        widgets: Vec<WidgetId>,
        /// Index of the displayed widget.
        active: usize,
    },
    /// Two panes sharing the node's rectangle.
    Split {
        /// Orientation of the split line.
        kind: SplitKind,
        /// Position of the split line as a fraction of the node's extent.
        split: f64,
        /// The left/top pane, then the right/bottom pane.
        children: [DockNodeId; 2],
    },
}

impl DockContent {
    fn empty_leaf() -> Self {
        Self::Leaf {
            widgets: Vec::new(),
            active: 0,
        }
    }
}

/// A node of a [`DockTree`].
#[derive(Clone, Debug)]
pub struct DockNode {
    generation: u32,
    parent: Option<DockNodeId>,
    content: DockContent,
    bounds: Rect,
}

impl DockNode {
    /// What the node holds.
    pub fn content(&self) -> &DockContent {
        &self.content
    }

    /// Rectangle assigned by the last [`DockTree::update`].
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The split node above this one.
    pub fn parent(&self) -> Option<DockNodeId> {
        self.parent
    }

    /// Returns `true` for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, DockContent::Leaf { .. })
    }
}

/// Structural snapshot of a dock tree, ignoring node ids and bounds.
#[derive(Clone, Debug, PartialEq)]
pub enum DockShape {
    /// A leaf with its widgets and active index.
    Leaf {
        /// Widgets in tab order.
        widgets: Vec<WidgetId>,
        /// Index of the displayed widget.
        active: usize,
    },
    /// A split with its two subtrees.
    Split {
        /// Orientation of the split line.
        kind: SplitKind,
        /// Position of the split line.
        split: f64,
        /// Left/top subtree.
        first: Box<DockShape>,
        /// Right/bottom subtree.
        second: Box<DockShape>,
    },
}

/// Where a docked widget sits, as returned by [`DockTree::slot_of`].
///
/// Taken just before the widget is removed, it lets
/// [`DockTree::restore_widget`] put the widget back into the same place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DockSlot {
    /// One tab of a leaf that has other tabs.
    Tab {
        /// The leaf.
        leaf: DockNodeId,
        /// Tab index.
        index: usize,
        /// Whether it was the displayed tab.
        active: bool,
    },
    /// The only widget of one pane of a split. Removing it folds the sibling
    /// pane into `parent`.
    Pane {
        /// The split node.
        parent: DockNodeId,
        /// Orientation of the split line.
        kind: SplitKind,
        /// Position of the split line.
        split: f64,
        /// `true` for the left/top pane.
        leading: bool,
    },
    /// The only widget of the root leaf.
    Root,
}

/// Arena of dock nodes rooted at a single node.
///
/// The root always exists. It starts as an empty leaf; attaching a widget to
/// a populated leaf on one of its sides turns the leaf into a split, and
/// detaching the last widget of a leaf folds its sibling back into the parent.
///
/// ```rust
/// use trellis_dock::{DockContent, DockTree, DockZone};
/// # use trellis_widget::{Panel, Tree, WidgetProps};
/// # let mut widgets = Tree::new();
/// # let a = widgets.create(WidgetProps::default(), Panel);
/// # let b = widgets.create(WidgetProps::default(), Panel);
///
/// let mut dock = DockTree::new();
/// let root = dock.root();
/// dock.attach_widget(a, root, DockZone::Center, 0.5);
/// let leaf = dock.attach_widget(b, root, DockZone::Left, 0.5).unwrap();
///
/// assert!(matches!(dock.node(root).unwrap().content(), DockContent::Split { .. }));
/// assert_eq!(dock.widgets_in(leaf), &[b]);
///
/// dock.detach_widget(leaf, 0);
/// assert_eq!(dock.widgets_in(dock.root()), &[a]);
/// ```
#[derive(Clone, Debug)]
pub struct DockTree {
    nodes: Vec<Option<DockNode>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: DockNodeId,
    /// Thresholds for placement and splitter handling.
    pub config: DockConfig,
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DockTree {
    /// Create a tree holding one empty leaf.
    pub fn new() -> Self {
        Self::with_config(DockConfig::default())
    }

    /// Create a tree with custom thresholds.
    pub fn with_config(config: DockConfig) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: DockNodeId::new(0, 1),
            config,
        };
        tree.root = tree.alloc(DockContent::empty_leaf(), None);
        tree
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Dock node indices are stored as u32 by design."
    )]
    fn alloc(&mut self, content: DockContent, parent: Option<DockNodeId>) -> DockNodeId {
        let idx = self.free_list.pop().unwrap_or_else(|| {
            self.nodes.push(None);
            self.generations.push(0);
            self.nodes.len() - 1
        });
        let generation = self.generations[idx].wrapping_add(1);
        self.generations[idx] = generation;
        self.nodes[idx] = Some(DockNode {
            generation,
            parent,
            content,
            bounds: Rect::ZERO,
        });
        DockNodeId::new(idx as u32, generation)
    }

    fn free(&mut self, id: DockNodeId) -> Option<DockNode> {
        self.node(id)?;
        let node = self.nodes[id.idx()].take();
        self.free_list.push(id.idx());
        node
    }

    /// The root node.
    pub fn root(&self) -> DockNodeId {
        self.root
    }

    /// Look a node up. Returns `None` for stale ids.
    pub fn node(&self, id: DockNodeId) -> Option<&DockNode> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: DockNodeId) -> Option<&mut DockNode> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    /// Returns `true` if `id` is a live leaf.
    pub fn is_leaf(&self, id: DockNodeId) -> bool {
        self.node(id).is_some_and(DockNode::is_leaf)
    }

    /// Widgets of a leaf in tab order; empty for splits and stale ids.
    pub fn widgets_in(&self, leaf: DockNodeId) -> &[WidgetId] {
        match self.node(leaf).map(|n| &n.content) {
            Some(DockContent::Leaf { widgets, .. }) => widgets,
            _ => &[],
        }
    }

    /// The widget a leaf displays.
    pub fn active_widget(&self, leaf: DockNodeId) -> Option<WidgetId> {
        match &self.node(leaf)?.content {
            DockContent::Leaf { widgets, active } => widgets.get(*active).copied(),
            DockContent::Split { .. } => None,
        }
    }

    /// Display the widget at `index` of a leaf.
    pub fn activate(&mut self, leaf: DockNodeId, index: usize) -> bool {
        match self.node_mut(leaf).map(|n| &mut n.content) {
            Some(DockContent::Leaf { widgets, active }) if index < widgets.len() => {
                *active = index;
                true
            }
            _ => false,
        }
    }

    /// Leaf and tab index holding `widget`.
    pub fn find_widget(&self, widget: WidgetId) -> Option<(DockNodeId, usize)> {
        self.leaves().into_iter().find_map(|leaf| {
            let index = self.widgets_in(leaf).iter().position(|w| *w == widget)?;
            Some((leaf, index))
        })
    }

    /// Returns `true` if `widget` is docked anywhere in this tree.
    pub fn contains(&self, widget: WidgetId) -> bool {
        self.find_widget(widget).is_some()
    }

    /// All leaves, left/top first.
    pub fn leaves(&self) -> Vec<DockNodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.node(id).map(|n| &n.content) {
                Some(DockContent::Leaf { .. }) => out.push(id),
                Some(DockContent::Split { children, .. }) => {
                    stack.push(children[1]);
                    stack.push(children[0]);
                }
                None => {}
            }
        }
        out
    }

    /// All split nodes, each before its descendants.
    pub fn splits(&self) -> Vec<DockNodeId> {
        let mut out = Vec::new();
        let mut queue = vec![self.root];
        while let Some(id) = queue.pop() {
            if let Some(DockContent::Split { children, .. }) = self.node(id).map(|n| &n.content) {
                out.push(id);
                queue.extend(children.iter().rev());
            }
        }
        out
    }

    /// Every docked widget, leaf by leaf.
    pub fn widgets(&self) -> Vec<WidgetId> {
        self.leaves()
            .into_iter()
            .flat_map(|leaf| self.widgets_in(leaf).iter().copied())
            .collect()
    }

    /// Dock `widget` into `leaf`.
    ///
    /// Into the center, or into an empty leaf, the widget becomes the leaf's
    /// last tab. Into a side of a populated leaf, the leaf becomes a split: the
    /// widget gets a new leaf on that side and the existing tabs move, active
    /// index intact, to the other. `split` is the fraction given to the left or
    /// top pane.
    ///
    /// Returns the leaf now holding the widget, or `None` if `leaf` is not a
    /// leaf or the widget is already docked in this tree.
    pub fn attach_widget(
        &mut self,
        widget: WidgetId,
        leaf: DockNodeId,
        zone: DockZone,
        split: f64,
    ) -> Option<DockNodeId> {
        if self.contains(widget) {
            tracing::debug!(?widget, "dock attach refused: already docked");
            return None;
        }
        let node = self.node_mut(leaf)?;
        let DockContent::Leaf { widgets, active } = &mut node.content else {
            tracing::debug!(?leaf, "dock attach refused: not a leaf");
            return None;
        };
        let kind = match zone.split_kind() {
            Some(kind) if !widgets.is_empty() => kind,
            _ => {
                widgets.push(widget);
                if widgets.len() == 1 {
                    *active = 0;
                }
                return Some(leaf);
            }
        };
        let existing = core::mem::replace(&mut node.content, DockContent::empty_leaf());
        let fresh = DockContent::Leaf {
            widgets: vec![widget],
            active: 0,
        };
        let (first, second) = if zone.is_leading() {
            (fresh, existing)
        } else {
            (existing, fresh)
        };
        let first = self.alloc(first, Some(leaf));
        let second = self.alloc(second, Some(leaf));
        if let Some(node) = self.node_mut(leaf) {
            node.content = DockContent::Split {
                kind,
                split: sanitize_split(split),
                children: [first, second],
            };
        }
        tracing::debug!(?widget, ?leaf, ?zone, "dock split");
        Some(if zone.is_leading() { first } else { second })
    }

    /// Remove the tab at `index` from `leaf`.
    ///
    /// A leaf left empty is pruned: its parent split takes over the sibling's
    /// content, so the split disappears. An empty root stays as an empty leaf.
    pub fn detach_widget(&mut self, leaf: DockNodeId, index: usize) -> Option<WidgetId> {
        let node = self.node_mut(leaf)?;
        let DockContent::Leaf { widgets, active } = &mut node.content else {
            return None;
        };
        if index >= widgets.len() {
            return None;
        }
        let widget = widgets.remove(index);
        if index < *active {
            *active -= 1;
        } else if *active >= widgets.len() {
            *active = widgets.len().saturating_sub(1);
        }
        if widgets.is_empty() {
            self.prune(leaf);
        }
        tracing::debug!(?widget, ?leaf, "dock detach");
        Some(widget)
    }

    /// Where `widget` sits, for a later [`restore_widget`](Self::restore_widget).
    pub fn slot_of(&self, widget: WidgetId) -> Option<DockSlot> {
        let (leaf, index) = self.find_widget(widget)?;
        let node = self.node(leaf)?;
        let DockContent::Leaf { widgets, active } = &node.content else {
            return None;
        };
        if widgets.len() > 1 {
            return Some(DockSlot::Tab {
                leaf,
                index,
                active: *active == index,
            });
        }
        let Some(parent) = node.parent else {
            return Some(DockSlot::Root);
        };
        match &self.node(parent)?.content {
            DockContent::Split {
                kind,
                split,
                children,
            } => Some(DockSlot::Pane {
                parent,
                kind: *kind,
                split: *split,
                leading: children[0] == leaf,
            }),
            DockContent::Leaf { .. } => None,
        }
    }

    /// Dock `widget` back into the place `slot` describes.
    ///
    /// A tab is reinserted at its index, clamped to the leaf's tabs. A pane
    /// splits `parent` again with the same orientation and fraction, moving
    /// whatever `parent` holds now to the other side.
    ///
    /// Returns the leaf now holding the widget, or `None` if the widget is
    /// already docked or the nodes `slot` names are gone.
    pub fn restore_widget(&mut self, widget: WidgetId, slot: DockSlot) -> Option<DockNodeId> {
        if self.contains(widget) {
            return None;
        }
        match slot {
            DockSlot::Root => {
                let root = self.root;
                self.attach_widget(widget, root, DockZone::Center, 0.5)
            }
            DockSlot::Tab {
                leaf,
                index,
                active,
            } => {
                let node = self.node_mut(leaf)?;
                let DockContent::Leaf {
                    widgets,
                    active: shown,
                } = &mut node.content
                else {
                    return None;
                };
                let index = index.min(widgets.len());
                widgets.insert(index, widget);
                if active || widgets.len() == 1 {
                    *shown = index;
                } else if index <= *shown {
                    *shown += 1;
                }
                tracing::debug!(?widget, ?leaf, index, "dock restored tab");
                Some(leaf)
            }
            DockSlot::Pane {
                parent,
                kind,
                split,
                leading,
            } => {
                let node = self.node_mut(parent)?;
                let kept = core::mem::replace(&mut node.content, DockContent::empty_leaf());
                let fresh = DockContent::Leaf {
                    widgets: vec![widget],
                    active: 0,
                };
                let (first, second) = if leading {
                    (fresh, kept)
                } else {
                    (kept, fresh)
                };
                let first = self.alloc(first, Some(parent));
                let second = self.alloc(second, Some(parent));
                let (restored, moved) = if leading {
                    (first, second)
                } else {
                    (second, first)
                };
                let grandchildren = match self.node(moved).map(|n| &n.content) {
                    Some(DockContent::Split { children, .. }) => Some(*children),
                    _ => None,
                };
                for child in grandchildren.into_iter().flatten() {
                    if let Some(c) = self.node_mut(child) {
                        c.parent = Some(moved);
                    }
                }
                if let Some(node) = self.node_mut(parent) {
                    node.content = DockContent::Split {
                        kind,
                        split: sanitize_split(split),
                        children: [first, second],
                    };
                }
                tracing::debug!(?widget, ?parent, "dock restored pane");
                Some(restored)
            }
        }
    }

    /// Remove `widget` from whichever leaf holds it.
    pub fn remove_widget(&mut self, widget: WidgetId) -> bool {
        match self.find_widget(widget) {
            Some((leaf, index)) => self.detach_widget(leaf, index).is_some(),
            None => false,
        }
    }

    /// Detach every widget for which `keep` returns `false`.
    ///
    /// Returns how many were removed.
    pub fn retain_widgets(&mut self, mut keep: impl FnMut(WidgetId) -> bool) -> usize {
        let mut removed = 0;
        while let Some(widget) = self.widgets().into_iter().find(|w| !keep(*w)) {
            if !self.remove_widget(widget) {
                break;
            }
            removed += 1;
        }
        removed
    }

    fn prune(&mut self, leaf: DockNodeId) {
        let Some(parent) = self.node(leaf).and_then(|n| n.parent) else {
            return;
        };
        let Some(DockContent::Split { children, .. }) = self.node(parent).map(|n| &n.content)
        else {
            return;
        };
        let sibling = if children[0] == leaf {
            children[1]
        } else {
            children[0]
        };
        self.free(leaf);
        let Some(adopted) = self.free(sibling) else {
            return;
        };
        if let DockContent::Split { children, .. } = &adopted.content {
            for child in *children {
                if let Some(c) = self.node_mut(child) {
                    c.parent = Some(parent);
                }
            }
        }
        if let Some(p) = self.node_mut(parent) {
            p.content = adopted.content;
        }
        tracing::debug!(?leaf, ?parent, "dock pruned empty leaf");
    }

    /// Lay the whole tree out in `rect`.
    ///
    /// `apply` is called for every leaf with its id, tabs, active index and
    /// rectangle.
    pub fn update(
        &mut self,
        rect: Rect,
        apply: &mut impl FnMut(DockNodeId, &[WidgetId], usize, Rect),
    ) {
        self.update_recursive(self.root, rect, apply);
    }

    /// Lay the subtree of `id` out in `rect`.
    ///
    /// A split puts its line at the floor of `split` times its extent, clamped
    /// so each side keeps at least the minimum pane extent, and recurses into
    /// both halves.
    pub fn update_recursive(
        &mut self,
        id: DockNodeId,
        rect: Rect,
        apply: &mut impl FnMut(DockNodeId, &[WidgetId], usize, Rect),
    ) {
        let min = self.config.min_pane_extent;
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.bounds = rect;
        match &node.content {
            DockContent::Leaf { widgets, active } => apply(id, widgets, *active, rect),
            DockContent::Split {
                kind,
                split,
                children,
            } => {
                let (kind, split, children) = (*kind, *split, *children);
                let (first, second) = split_rect(kind, split, rect, min);
                self.update_recursive(children[0], first, apply);
                self.update_recursive(children[1], second, apply);
            }
        }
    }

    /// Split orientation and fraction of a split node.
    pub fn split_of(&self, id: DockNodeId) -> Option<(SplitKind, f64)> {
        match self.node(id)?.content {
            DockContent::Split { kind, split, .. } => Some((kind, split)),
            DockContent::Leaf { .. } => None,
        }
    }

    /// The draggable band of a split node, centered on its split line.
    pub fn separator_rect(&self, id: DockNodeId) -> Option<Rect> {
        let node = self.node(id)?;
        let DockContent::Split { kind, children, .. } = &node.content else {
            return None;
        };
        let first = self.node(children[0])?.bounds;
        let half = self.config.separator_width * 0.5;
        let b = node.bounds;
        Some(match kind {
            SplitKind::Vertical => Rect::new(first.x1 - half, b.y0, first.x1 + half, b.y1),
            SplitKind::Horizontal => Rect::new(b.x0, first.y1 - half, b.x1, first.y1 + half),
        })
    }

    /// The split node whose separator band contains `pt`, innermost first.
    pub fn trace_separator(&self, pt: Point) -> Option<DockNodeId> {
        self.trace_separator_from(self.root, pt)
    }

    fn trace_separator_from(&self, id: DockNodeId, pt: Point) -> Option<DockNodeId> {
        let node = self.node(id)?;
        let DockContent::Split { children, .. } = &node.content else {
            return None;
        };
        if !node.bounds.contains(pt) {
            return None;
        }
        children
            .iter()
            .find_map(|c| self.trace_separator_from(*c, pt))
            .or_else(|| self.separator_rect(id).filter(|r| r.contains(pt)).map(|_| id))
    }

    /// Set a split's fraction directly, clamped into the open unit interval.
    pub fn set_split(&mut self, id: DockNodeId, value: f64) -> bool {
        match self.node_mut(id).map(|n| &mut n.content) {
            Some(DockContent::Split { split, .. }) => {
                *split = sanitize_split(value);
                true
            }
            _ => false,
        }
    }

    /// Move a split line by `delta` pixels from where it was at `anchor_split`.
    ///
    /// The result keeps at least the minimum pane extent on both sides.
    /// Returns `false` for leaves and for splits too small to move.
    pub fn drag_separator(&mut self, id: DockNodeId, anchor_split: f64, delta: f64) -> bool {
        let min = self.config.min_pane_extent;
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let bounds = node.bounds;
        let DockContent::Split { kind, split, .. } = &mut node.content else {
            return false;
        };
        let extent = match kind {
            SplitKind::Vertical => bounds.width(),
            SplitKind::Horizontal => bounds.height(),
        };
        if !(extent > 2.0 * min) {
            return false;
        }
        let px = (anchor_split * extent + delta).clamp(min, extent - min);
        *split = px / extent;
        true
    }

    /// Structural snapshot, for comparing trees.
    pub fn shape(&self) -> Option<DockShape> {
        self.shape_of(self.root)
    }

    fn shape_of(&self, id: DockNodeId) -> Option<DockShape> {
        Some(match &self.node(id)?.content {
            DockContent::Leaf { widgets, active } => DockShape::Leaf {
                widgets: widgets.clone(),
                active: *active,
            },
            DockContent::Split {
                kind,
                split,
                children,
            } => DockShape::Split {
                kind: *kind,
                split: *split,
                first: Box::new(self.shape_of(children[0])?),
                second: Box::new(self.shape_of(children[1])?),
            },
        })
    }
}

fn sanitize_split(split: f64) -> f64 {
    if split.is_nan() {
        0.5
    } else {
        split.clamp(0.0, 1.0)
    }
}

/// Pixel offset of a split line along an axis of length `extent`.
fn split_offset(split: f64, extent: f64, min: f64) -> f64 {
    if extent < 2.0 * min {
        return (extent * 0.5).floor();
    }
    (split * extent).floor().clamp(min, extent - min)
}

fn split_rect(kind: SplitKind, split: f64, rect: Rect, min: f64) -> (Rect, Rect) {
    match kind {
        SplitKind::Vertical => {
            let x = rect.x0 + split_offset(split, rect.width(), min);
            (
                Rect::new(rect.x0, rect.y0, x, rect.y1),
                Rect::new(x, rect.y0, rect.x1, rect.y1),
            )
        }
        SplitKind::Horizontal => {
            let y = rect.y0 + split_offset(split, rect.height(), min);
            (
                Rect::new(rect.x0, rect.y0, rect.x1, y),
                Rect::new(rect.x0, y, rect.x1, rect.y1),
            )
        }
    }
}
