// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_event_state::click::DoubleClickConfig;
use trellis_widget::events::MouseButton;

/// Input thresholds of a [`Desktop`](crate::Desktop).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesktopConfig {
    /// Double-click time window and tolerance box.
    pub double_click: DoubleClickConfig,
    /// Button that starts widget drags.
    pub drag_button: MouseButton,
    /// Pixels of a dragged widget that always stay inside its parent.
    pub drag_margin: f64,
    /// Hover time before a tooltip without its own delay appears.
    pub default_tooltip_delay_ms: u64,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            double_click: DoubleClickConfig::default(),
            drag_button: MouseButton::Left,
            drag_margin: 1.0,
            default_tooltip_delay_ms: 500,
        }
    }
}
