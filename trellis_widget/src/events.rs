// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input event payloads delivered to widgets.
//!
//! All timestamps are milliseconds on a monotonic clock chosen by the host.

use kurbo::{Point, Vec2};

bitflags::bitflags! {
    /// Keyboard modifier state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Super / Command / Windows.
        const SUPER = 0b0000_1000;
    }
}

/// Logical key identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape.
    Escape,
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Space bar.
    Space,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key `F1..=F24`.
    Function(u8),
    /// A key producing this (lowercase) character.
    Character(char),
    /// Any other key by platform code.
    Code(u32),
}

/// Key press or release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// `true` on press, `false` on release.
    pub pressed: bool,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Event time.
    pub timestamp: u64,
}

/// Text input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharEvent {
    /// The produced character.
    pub ch: char,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Event time.
    pub timestamp: u64,
}

/// Mouse button identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// Additional buttons by index (3 and up).
    Other(u8),
}

impl MouseButton {
    /// Compact numeric index: left 0, right 1, middle 2.
    pub fn index(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Other(n) => n,
        }
    }
}

/// Mouse button press or release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseButtonEvent {
    /// The button.
    pub button: MouseButton,
    /// `true` on press, `false` on release.
    pub pressed: bool,
    /// Cursor position in desktop coordinates.
    pub position: Point,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Event time.
    pub timestamp: u64,
}

/// Mouse wheel scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseWheelEvent {
    /// Scroll delta in lines (positive y scrolls content up).
    pub delta: Vec2,
    /// Cursor position in desktop coordinates.
    pub position: Point,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Event time.
    pub timestamp: u64,
}

/// Cursor motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseMoveEvent {
    /// Cursor position in desktop coordinates.
    pub position: Point,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// Event time.
    pub timestamp: u64,
}

/// Joystick or gamepad button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoystickButtonEvent {
    /// Device index.
    pub device: u32,
    /// Button index.
    pub button: u32,
    /// `true` on press, `false` on release.
    pub pressed: bool,
    /// Event time.
    pub timestamp: u64,
}

/// Joystick or gamepad axis motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoystickAxisEvent {
    /// Device index.
    pub device: u32,
    /// Axis index.
    pub axis: u32,
    /// Axis value in `-1.0..=1.0`.
    pub value: f64,
    /// Event time.
    pub timestamp: u64,
}
