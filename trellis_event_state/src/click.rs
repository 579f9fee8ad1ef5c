// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double-click recognition.
//!
//! A press is a double click when it lands on the same target, with the same
//! button, as the previous press, no later than
//! [`DoubleClickConfig::max_interval_ms`] after it, and inside a square box of
//! half-size [`DoubleClickConfig::max_offset`] around it.
//!
//! ## Usage
//!
//! ```
//! use kurbo::Point;
//! use trellis_event_state::click::{ClickKind, ClickState};
//!
//! let mut state: ClickState<u32> = ClickState::new();
//!
//! assert_eq!(state.on_press(7, 0, Point::new(10.0, 10.0), 1000), ClickKind::Single);
//! assert_eq!(state.on_press(7, 0, Point::new(12.0, 9.0), 1200), ClickKind::Double);
//! // The pair is consumed; a third press starts over.
//! assert_eq!(state.on_press(7, 0, Point::new(12.0, 9.0), 1300), ClickKind::Single);
//! ```
//!
//! ## Rules
//!
//! 1. **Same target and button**: a press on another target or with another
//!    button never pairs with the previous one; it becomes the new candidate.
//! 2. **Time window**: `elapsed <= max_interval_ms`. Timestamps that go
//!    backwards count as zero elapsed time.
//! 3. **Tolerance box**: `|dx| <= max_offset && |dy| <= max_offset`. The box is
//!    axis-aligned, not a circle.
//! 4. **Consumption**: once a double click is reported, the candidate is
//!    cleared so triple clicks do not report two doubles.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// Mouse button identifier.
pub type Button = u8;

/// Thresholds for double-click recognition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleClickConfig {
    /// Longest gap between two presses that still pairs them, in milliseconds.
    pub max_interval_ms: u64,
    /// Half-size of the square tolerance box around the first press.
    pub max_offset: f64,
}

impl Default for DoubleClickConfig {
    fn default() -> Self {
        Self {
            max_interval_ms: 250,
            max_offset: 4.0,
        }
    }
}

/// A remembered press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Target the press resolved to.
    pub target: K,
    /// Button that was pressed.
    pub button: Button,
    /// Pointer position at press time.
    pub position: Point,
    /// Timestamp of the press in milliseconds.
    pub time: u64,
}

/// Classification of a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickKind {
    /// A press that did not complete a pair.
    Single,
    /// A press that completed a double click.
    Double,
}

/// Double-click state machine.
///
/// Tracks the last unpaired press. Targets are compared by value, so callers
/// should use stable handles (for example generational widget ids).
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    /// Active thresholds.
    pub config: DoubleClickConfig,
    last: Option<Press<K>>,
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Create a state machine with [`DoubleClickConfig::default`] thresholds
    /// (250 ms, 4 px).
    pub fn new() -> Self {
        Self::with_config(DoubleClickConfig::default())
    }

    /// Create a state machine with custom thresholds.
    pub fn with_config(config: DoubleClickConfig) -> Self {
        Self { config, last: None }
    }

    /// Record a press and classify it.
    pub fn on_press(
        &mut self,
        target: K,
        button: Button,
        position: Point,
        timestamp: u64,
    ) -> ClickKind {
        let press = Press {
            target,
            button,
            position,
            time: timestamp,
        };
        if let Some(prev) = self.last.take()
            && self.pairs_with(&prev, &press)
        {
            return ClickKind::Double;
        }
        self.last = Some(press);
        ClickKind::Single
    }

    fn pairs_with(&self, prev: &Press<K>, next: &Press<K>) -> bool {
        if prev.target != next.target || prev.button != next.button {
            return false;
        }
        let elapsed = next.time.saturating_sub(prev.time);
        if elapsed > self.config.max_interval_ms {
            return false;
        }
        let dx = (next.position.x - prev.position.x).abs();
        let dy = (next.position.y - prev.position.y).abs();
        dx <= self.config.max_offset && dy <= self.config.max_offset
    }

    /// Forget the remembered press.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Forget the remembered press if it belongs to `target`.
    ///
    /// Call this when a target goes away so a recycled handle cannot pair with
    /// a press on its predecessor.
    pub fn forget(&mut self, target: &K) {
        if self.last.as_ref().is_some_and(|p| p.target == *target) {
            self.last = None;
        }
    }

    /// The press currently waiting for a partner, if any.
    pub fn pending(&self) -> Option<&Press<K>> {
        self.last.as_ref()
    }
}

impl<K: PartialEq + Clone> Default for ClickState<K> {
    fn default() -> Self {
        Self::new()
    }
}
