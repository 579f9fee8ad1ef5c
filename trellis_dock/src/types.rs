// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared docking types.

/// Identifier for a node of a [`DockTree`](crate::DockTree) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DockNodeId(pub(crate) u32, pub(crate) u32);

impl DockNodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Orientation of a split node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitKind {
    /// Left and right panes, separated by a vertical line.
    Vertical,
    /// Top and bottom panes, separated by a horizontal line.
    Horizontal,
}

/// Where a widget lands relative to a leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DockZone {
    /// Left side of the leaf.
    Left,
    /// Right side of the leaf.
    Right,
    /// Top side of the leaf.
    Top,
    /// Bottom side of the leaf.
    Bottom,
    /// Into the leaf itself, as another tab.
    Center,
}

impl DockZone {
    /// The split a drop into this zone creates, or `None` for the center.
    pub fn split_kind(self) -> Option<SplitKind> {
        match self {
            Self::Left | Self::Right => Some(SplitKind::Vertical),
            Self::Top | Self::Bottom => Some(SplitKind::Horizontal),
            Self::Center => None,
        }
    }

    /// Whether the new widget takes the first (left/top) child of the split.
    pub fn is_leading(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

/// Docking thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockConfig {
    /// Compass zone thickness as a fraction of the leaf's shorter side.
    pub compass_fraction: f64,
    /// Width of the draggable band centered on each split line.
    pub separator_width: f64,
    /// Smallest extent, in pixels, a split may leave either pane.
    pub min_pane_extent: f64,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            compass_fraction: 0.3,
            separator_width: 6.0,
            min_pane_extent: 1.0,
        }
    }
}
