// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw traversal.

use kurbo::Rect;
use smallvec::SmallVec;

use crate::canvas::{Canvas, Color};
use crate::tree::{Tree, is_degenerate};
use crate::types::WidgetId;
use crate::widget::DrawCx;

/// Options for [`Tree::draw`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawOptions {
    /// Outline every live widget's rectangle and padded rectangle.
    pub debug_layout: bool,
    /// Outline color for arranged rectangles.
    pub debug_rect_color: Color,
    /// Outline color for padded rectangles.
    pub debug_padded_color: Color,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            debug_layout: false,
            debug_rect_color: Color::rgba(1.0, 0.0, 1.0, 0.8),
            debug_padded_color: Color::rgba(0.0, 1.0, 1.0, 0.5),
        }
    }
}

impl Tree {
    /// Draw the subtree of `root` as of the last geometry pass.
    ///
    /// Each live widget is clipped to its rectangle intersected with its
    /// ancestors' and drawn with its opacity multiplied into theirs: its
    /// background, [`Widget::draw`](crate::Widget::draw), its children bottom
    /// first, then [`Widget::post_draw`](crate::Widget::post_draw). Widgets
    /// that are not live, fully clipped, or fully transparent are skipped with
    /// their subtree.
    pub fn draw(&mut self, root: WidgetId, canvas: &mut dyn Canvas, options: &DrawOptions) {
        self.draw_recursive(root, canvas, options, None, 1.0);
    }

    fn draw_recursive(
        &mut self,
        id: WidgetId,
        canvas: &mut dyn Canvas,
        options: &DrawOptions,
        clip: Option<Rect>,
        parent_opacity: f32,
    ) {
        if !self.is_live(id) {
            return;
        }
        let Some(n) = self.node_opt(id) else {
            return;
        };
        let rect = n.geometry.rect;
        let padded = n.geometry.padded;
        debug_assert!(!is_degenerate(rect), "drawing a degenerate rectangle");
        let clip = clip.map_or(rect, |c| c.intersect(rect));
        if is_degenerate(clip) {
            return;
        }
        let opacity = parent_opacity * n.props.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }
        let background = n.props.background;
        let children: SmallVec<[WidgetId; 16]> = n.children.iter().copied().collect();

        canvas.save();
        canvas.intersect_scissor(rect);
        canvas.set_global_alpha(opacity);
        if let Some(color) = background {
            canvas.fill_rect(rect, color);
        }
        self.with_widget(id, |w, tree| {
            let cx = DrawCx {
                tree,
                id,
                rect,
                padded,
                opacity,
            };
            w.draw(&cx, canvas);
        });
        for child in children {
            self.draw_recursive(child, canvas, options, Some(clip), opacity);
        }
        canvas.set_global_alpha(opacity);
        self.with_widget(id, |w, tree| {
            let cx = DrawCx {
                tree,
                id,
                rect,
                padded,
                opacity,
            };
            w.post_draw(&cx, canvas);
        });
        if options.debug_layout {
            canvas.stroke_rect(rect, options.debug_rect_color, 1.0);
            if padded != rect {
                canvas.stroke_rect(padded, options.debug_padded_color, 1.0);
            }
        }
        canvas.restore();
    }
}
