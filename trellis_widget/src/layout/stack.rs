// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

use super::{Layout, place};
use crate::tree::Tree;
use crate::types::{AutoSize, Visibility, WidgetId};

/// Shows only the slot selected by the widget's `layer` property, filling the
/// padded rectangle. The other slots are not laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackLayout;

fn active_layer(tree: &Tree, id: WidgetId) -> Option<WidgetId> {
    let layer = tree.props(id)?.layer;
    let child = *tree.slots_of(id).get(layer)?;
    (tree.visibility(child) != Visibility::Collapsed).then_some(child)
}

impl Layout for StackLayout {
    fn measure(&mut self, tree: &mut Tree, id: WidgetId, auto: AutoSize, available: Size) -> Size {
        match active_layer(tree, id) {
            Some(child) => tree.measure(child, auto.width, auto.height, available),
            None => Size::ZERO,
        }
    }

    fn arrange(&mut self, tree: &mut Tree, id: WidgetId, _auto: AutoSize) {
        let (Some(child), Some(padded)) = (active_layer(tree, id), tree.padded_rect(id)) else {
            return;
        };
        place(tree, child, padded, false, false);
    }
}
