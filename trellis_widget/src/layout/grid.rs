// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use super::{Layout, layout_slots, place};
use crate::tree::Tree;
use crate::types::{AutoSize, WidgetId};

/// How grid track weights are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrackSizing {
    /// Weights are shares of the available space minus spacing.
    #[default]
    Normalized,
    /// Weights are pixel sizes.
    Pixels,
}

/// Fixed grid of weighted columns and rows.
///
/// Each child occupies exactly the cell named by its
/// [`grid_cell`](crate::WidgetProps::grid_cell) property and is stretched to
/// fill it. Children naming a cell outside the grid are not arranged.
///
/// ```rust
/// use kurbo::{Point, Rect, Size};
/// use trellis_widget::layout::GridLayout;
/// use trellis_widget::{Panel, Tree, WidgetProps};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(None, WidgetProps::default(), Panel);
/// tree.set_layout(root, GridLayout::normalized([0.3, 0.7], [1.0], 0.0));
/// let right = tree.insert(Some(root), WidgetProps::default().in_cell(0, 1), Panel);
///
/// tree.begin_frame();
/// tree.set_rect(root, Rect::new(0.0, 0.0, 100.0, 50.0));
/// tree.measure(root, false, false, Size::new(100.0, 50.0));
/// tree.arrange(root, false, false);
/// assert_eq!(tree.rect(right), Some(Rect::new(30.0, 0.0, 100.0, 50.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridLayout {
    /// Column weights, left to right.
    pub columns: Vec<f64>,
    /// Row weights, top to bottom.
    pub rows: Vec<f64>,
    /// Interpretation of the weights.
    pub sizing: TrackSizing,
    /// Gap between adjacent cells on both axes.
    pub spacing: f64,
    /// `(start, length)` per column, relative to the padded origin.
    column_offsets: Vec<(f64, f64)>,
    /// `(start, length)` per row, relative to the padded origin.
    row_offsets: Vec<(f64, f64)>,
}

impl GridLayout {
    /// Grid whose weights share the available space.
    pub fn normalized(
        columns: impl IntoIterator<Item = f64>,
        rows: impl IntoIterator<Item = f64>,
        spacing: f64,
    ) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows: rows.into_iter().collect(),
            sizing: TrackSizing::Normalized,
            spacing,
            ..Self::default()
        }
    }

    /// Grid whose weights are pixel sizes.
    pub fn pixels(
        columns: impl IntoIterator<Item = f64>,
        rows: impl IntoIterator<Item = f64>,
        spacing: f64,
    ) -> Self {
        Self {
            sizing: TrackSizing::Pixels,
            ..Self::normalized(columns, rows, spacing)
        }
    }

    /// Offsets computed by the last arrange: `(start, length)` per column.
    pub fn column_offsets(&self) -> &[(f64, f64)] {
        &self.column_offsets
    }

    /// Offsets computed by the last arrange: `(start, length)` per row.
    pub fn row_offsets(&self) -> &[(f64, f64)] {
        &self.row_offsets
    }

    fn track_lengths(&self, weights: &[f64], available: f64) -> Vec<f64> {
        match self.sizing {
            TrackSizing::Pixels => weights.iter().map(|w| w.max(0.0)).collect(),
            TrackSizing::Normalized => {
                let sum: f64 = weights.iter().map(|w| w.max(0.0)).sum();
                if sum <= 0.0 {
                    return weights.iter().map(|_| 0.0).collect();
                }
                let free = (available - gaps(weights.len(), self.spacing)).max(0.0);
                weights.iter().map(|w| w.max(0.0) * free / sum).collect()
            }
        }
    }

    fn offsets(&self, weights: &[f64], available: f64) -> Vec<(f64, f64)> {
        let mut at = 0.0;
        self.track_lengths(weights, available)
            .into_iter()
            .map(|len| {
                let start = at;
                at += len + self.spacing;
                (start, len)
            })
            .collect()
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Track counts are tiny."
)]
fn gaps(tracks: usize, spacing: f64) -> f64 {
    tracks.saturating_sub(1) as f64 * spacing
}

impl Layout for GridLayout {
    fn measure(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize, available: Size) -> Size {
        let columns = self.offsets(&self.columns, available.width);
        let rows = self.offsets(&self.rows, available.height);
        for child in layout_slots(tree, id) {
            let Some(cell) = tree.props(child).map(|p| p.grid_cell) else {
                continue;
            };
            if let (Some(c), Some(r)) = (columns.get(cell.column), rows.get(cell.row)) {
                tree.measure(child, false, false, Size::new(c.1, r.1));
            }
        }
        let extent = |tracks: &[(f64, f64)]| tracks.last().map_or(0.0, |(s, l)| s + l);
        Size::new(extent(&columns), extent(&rows))
    }

    fn arrange(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize) {
        let Some(padded) = tree.padded_rect(id) else {
            return;
        };
        self.column_offsets = self.offsets(&self.columns, padded.width());
        self.row_offsets = self.offsets(&self.rows, padded.height());
        for child in layout_slots(tree, id) {
            let Some(cell) = tree.props(child).map(|p| p.grid_cell) else {
                continue;
            };
            let (Some(&(cx, cw)), Some(&(ry, rh))) = (
                self.column_offsets.get(cell.column),
                self.row_offsets.get(cell.row),
            ) else {
                tracing::debug!(?child, ?cell, "grid cell out of range");
                continue;
            };
            let x0 = padded.x0 + cx;
            let y0 = padded.y0 + ry;
            place(tree, child, Rect::new(x0, y0, x0 + cw, y0 + rh), false, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WidgetProps;
    use crate::widget::Panel;
    use kurbo::{Insets, Point};

    fn run(tree: &mut Tree, root: WidgetId, rect: Rect) {
        tree.begin_frame();
        tree.set_rect(root, rect);
        tree.measure(root, false, false, rect.size());
        tree.arrange(root, false, false);
    }

    #[test]
    fn weighted_columns_split_padded_rect() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        tree.set_layout(root, GridLayout::normalized([0.3, 0.7], [1.0], 0.0));
        let left = tree.insert(Some(root), WidgetProps::default().in_cell(0, 0), Panel);
        let right = tree.insert(Some(root), WidgetProps::default().in_cell(0, 1), Panel);
        run(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 50.0));

        let r = tree.rect(right).unwrap();
        assert_eq!(r.x0, 30.0);
        assert_eq!(r.x1, 100.0);
        assert_eq!(tree.rect(left), Some(Rect::new(0.0, 0.0, 30.0, 50.0)));
    }

    #[test]
    fn spacing_is_removed_before_sharing() {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            WidgetProps::default().with_padding(Insets::uniform(5.0)),
            Panel,
        );
        tree.set_layout(root, GridLayout::normalized([1.0, 1.0], [1.0, 3.0], 10.0));
        let bottom_right = tree.insert(Some(root), WidgetProps::default().in_cell(1, 1), Panel);
        run(&mut tree, root, Rect::new(0.0, 0.0, 120.0, 90.0));
        // Padded 110 x 80; columns (110 - 10) / 2 = 50; rows 70 split 1:3.
        assert_eq!(
            tree.rect(bottom_right),
            Some(Rect::new(65.0, 32.5, 115.0, 85.0))
        );
    }

    #[test]
    fn pixel_tracks_and_content_size() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let grid = tree.insert(
            Some(root),
            WidgetProps::sized(Point::ZERO, Size::ZERO).with_auto_size(crate::AutoSize::BOTH),
            Panel,
        );
        tree.set_layout(grid, GridLayout::pixels([20.0, 30.0], [15.0], 2.0));
        let cell = tree.insert(Some(grid), WidgetProps::default().in_cell(0, 1), Panel);
        run(&mut tree, root, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(tree.measured_size(grid), Some(Size::new(52.0, 15.0)));
        assert_eq!(tree.rect(cell), Some(Rect::new(22.0, 0.0, 52.0, 15.0)));
    }

    #[test]
    fn out_of_range_cells_are_skipped() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        tree.set_layout(root, GridLayout::normalized([1.0], [1.0], 0.0));
        let stray = tree.insert(Some(root), WidgetProps::default().in_cell(3, 0), Panel);
        run(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!tree.is_live(stray));
    }
}
