// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

use super::{Layout, layout_slots, place};
use crate::tree::Tree;
use crate::types::{AutoSize, WidgetId};

/// Horizontal alignment of box children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HAlign {
    /// Use the child's own `position.x` and width.
    #[default]
    None,
    /// Flush with the left edge.
    Left,
    /// Flush with the right edge.
    Right,
    /// Centered.
    Center,
    /// Fill the available width.
    Stretch,
}

/// Vertical alignment of box children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VAlign {
    /// Use the child's own `position.y` and height.
    #[default]
    None,
    /// Flush with the top edge.
    Top,
    /// Flush with the bottom edge.
    Bottom,
    /// Centered.
    Center,
    /// Fill the available height.
    Stretch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AxisAlign {
    None,
    Start,
    End,
    Center,
    Stretch,
}

impl From<HAlign> for AxisAlign {
    fn from(a: HAlign) -> Self {
        match a {
            HAlign::None => Self::None,
            HAlign::Left => Self::Start,
            HAlign::Right => Self::End,
            HAlign::Center => Self::Center,
            HAlign::Stretch => Self::Stretch,
        }
    }
}

impl From<VAlign> for AxisAlign {
    fn from(a: VAlign) -> Self {
        match a {
            VAlign::None => Self::None,
            VAlign::Top => Self::Start,
            VAlign::Bottom => Self::End,
            VAlign::Center => Self::Center,
            VAlign::Stretch => Self::Stretch,
        }
    }
}

impl AxisAlign {
    /// Start and length of a child on one axis.
    fn resolve(self, start: f64, extent: f64, position: f64, size: f64) -> (f64, f64) {
        match self {
            Self::None => (start + position, size),
            Self::Start => (start, size),
            Self::End => (start + extent - size, size),
            Self::Center => (start + (extent - size) * 0.5, size),
            Self::Stretch => (start, extent),
        }
    }
}

/// Aligns every child independently inside the padded rectangle.
///
/// Axes never influence each other: a child's horizontal placement depends
/// only on horizontal inputs. With [`HAlign::None`] / [`VAlign::None`] the
/// child's own position is used, relative to the padded origin. Stretched axes
/// are never auto-sized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoxLayout {
    /// Horizontal rule.
    pub horizontal: HAlign,
    /// Vertical rule.
    pub vertical: VAlign,
}

impl BoxLayout {
    /// Create a box layout.
    pub fn new(horizontal: HAlign, vertical: VAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Stretch children over the whole padded rectangle.
    pub fn fill() -> Self {
        Self::new(HAlign::Stretch, VAlign::Stretch)
    }
}

impl Layout for BoxLayout {
    fn measure(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize, available: Size) -> Size {
        let h = AxisAlign::from(self.horizontal);
        let v = AxisAlign::from(self.vertical);
        let mut content = Size::ZERO;
        for child in layout_slots(tree, id) {
            let Some(props) = tree.props(child) else {
                continue;
            };
            let (position, size) = (props.position, props.size);
            let proposed = Size::new(
                if h == AxisAlign::Stretch {
                    available.width
                } else {
                    size.width
                },
                if v == AxisAlign::Stretch {
                    available.height
                } else {
                    size.height
                },
            );
            let m = tree.measure(
                child,
                h != AxisAlign::Stretch,
                v != AxisAlign::Stretch,
                proposed,
            );
            let w = if h == AxisAlign::None {
                position.x + m.width
            } else {
                m.width
            };
            let ht = if v == AxisAlign::None {
                position.y + m.height
            } else {
                m.height
            };
            content.width = content.width.max(w);
            content.height = content.height.max(ht);
        }
        content
    }

    fn arrange(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize) {
        let h = AxisAlign::from(self.horizontal);
        let v = AxisAlign::from(self.vertical);
        let Some(padded) = tree.padded_rect(id) else {
            return;
        };
        for child in layout_slots(tree, id) {
            let (Some(props), Some(m)) = (tree.props(child), tree.measured_size(child)) else {
                continue;
            };
            let (x, w) = h.resolve(padded.x0, padded.width(), props.position.x, m.width);
            let (y, ht) = v.resolve(padded.y0, padded.height(), props.position.y, m.height);
            place(
                tree,
                child,
                Rect::new(x, y, x + w, y + ht),
                h != AxisAlign::Stretch,
                v != AxisAlign::Stretch,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AutoSize, Visibility, WidgetProps};
    use crate::widget::Panel;
    use kurbo::{Insets, Point};

    fn run(tree: &mut Tree, root: WidgetId, size: Size) {
        tree.begin_frame();
        tree.set_rect(root, Rect::from_origin_size(Point::ZERO, size));
        tree.measure(root, false, false, size);
        tree.arrange(root, false, false);
    }

    fn aligned(h: HAlign, v: VAlign) -> (Tree, WidgetId, WidgetId) {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            WidgetProps::default().with_padding(Insets::uniform(10.0)),
            Panel,
        );
        tree.set_layout(root, BoxLayout::new(h, v));
        let child = tree.insert(
            Some(root),
            WidgetProps::sized(Point::new(5.0, 7.0), Size::new(20.0, 10.0)),
            Panel,
        );
        (tree, root, child)
    }

    #[test]
    fn none_alignment_is_absolute_within_padding() {
        let (mut tree, root, child) = aligned(HAlign::None, VAlign::None);
        run(&mut tree, root, Size::new(100.0, 100.0));
        assert_eq!(tree.rect(child), Some(Rect::new(15.0, 17.0, 35.0, 27.0)));
    }

    #[test]
    fn edge_and_center_alignment() {
        let (mut tree, root, child) = aligned(HAlign::Right, VAlign::Center);
        run(&mut tree, root, Size::new(100.0, 100.0));
        assert_eq!(tree.rect(child), Some(Rect::new(70.0, 45.0, 90.0, 55.0)));

        let (mut tree, root, child) = aligned(HAlign::Left, VAlign::Bottom);
        run(&mut tree, root, Size::new(100.0, 100.0));
        assert_eq!(tree.rect(child), Some(Rect::new(10.0, 80.0, 30.0, 90.0)));
    }

    #[test]
    fn stretch_fills_padded_rect() {
        let (mut tree, root, child) = aligned(HAlign::Stretch, VAlign::Stretch);
        run(&mut tree, root, Size::new(100.0, 60.0));
        assert_eq!(tree.rect(child), Some(Rect::new(10.0, 10.0, 90.0, 50.0)));
    }

    #[test]
    fn axes_are_independent() {
        let (mut tree, root, child) = aligned(HAlign::Stretch, VAlign::None);
        run(&mut tree, root, Size::new(100.0, 50.0));
        let short = tree.rect(child).unwrap();
        let short_m = tree.measured_size(child).unwrap();
        run(&mut tree, root, Size::new(100.0, 80.0));
        let tall = tree.rect(child).unwrap();
        let tall_m = tree.measured_size(child).unwrap();
        assert_eq!((short.x0, short.x1), (tall.x0, tall.x1));
        assert_eq!(short_m.width, tall_m.width);

        run(&mut tree, root, Size::new(140.0, 50.0));
        let wide = tree.rect(child).unwrap();
        assert_eq!((short.y0, short.y1), (wide.y0, wide.y1));
        assert_eq!(wide.width(), 120.0);
    }

    #[test]
    fn auto_sized_parent_fits_children() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let fit = tree.insert(
            Some(root),
            WidgetProps::sized(Point::new(1.0, 1.0), Size::ZERO)
                .with_auto_size(AutoSize::BOTH)
                .with_padding(Insets::uniform(1.0)),
            Panel,
        );
        tree.insert(
            Some(fit),
            WidgetProps::sized(Point::new(10.0, 0.0), Size::new(5.0, 5.0)),
            Panel,
        );
        tree.insert(
            Some(fit),
            WidgetProps::sized(Point::ZERO, Size::new(8.0, 12.0)),
            Panel,
        );
        run(&mut tree, root, Size::new(100.0, 100.0));
        assert_eq!(tree.measured_size(fit), Some(Size::new(17.0, 14.0)));
        assert_eq!(tree.rect(fit), Some(Rect::new(1.0, 1.0, 18.0, 15.0)));
    }

    #[test]
    fn collapsed_children_take_no_space() {
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), Panel);
        let fit = tree.insert(
            Some(root),
            WidgetProps::default().with_auto_size(AutoSize::BOTH),
            Panel,
        );
        let gone = tree.insert(
            Some(fit),
            WidgetProps::sized(Point::ZERO, Size::new(50.0, 50.0)),
            Panel,
        );
        tree.insert(
            Some(fit),
            WidgetProps::sized(Point::ZERO, Size::new(5.0, 5.0)),
            Panel,
        );
        if let Some(p) = tree.props_mut(gone) {
            p.visibility = Visibility::Collapsed;
        }
        run(&mut tree, root, Size::new(100.0, 100.0));
        assert_eq!(tree.measured_size(fit), Some(Size::new(5.0, 5.0)));
        assert!(!tree.is_live(gone));
    }
}
