// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording widget for routing tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Size};
use trellis_widget::events::{CharEvent, KeyEvent, MouseButtonEvent, MouseMoveEvent};
use trellis_widget::{EventCx, Widget, WidgetProps};

pub(crate) type Entry = (&'static str, &'static str);

/// Shared event log.
#[derive(Clone, Debug, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<Entry>>>);

impl Log {
    fn push(&self, entry: Entry) {
        self.0.borrow_mut().push(entry);
    }

    /// Drain everything recorded so far.
    pub(crate) fn take(&self) -> Vec<Entry> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Logs every event it receives under its name.
#[derive(Debug)]
pub(crate) struct Recorder {
    name: &'static str,
    log: Log,
    claim: bool,
    drag: bool,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            claim: false,
            drag: false,
        }
    }

    /// Claim mouse buttons aimed at descendants.
    pub(crate) fn claiming(mut self) -> Self {
        self.claim = true;
        self
    }

    /// Ask for a drag on every press.
    pub(crate) fn dragging(mut self) -> Self {
        self.drag = true;
        self
    }

    fn record(&self, event: &'static str) {
        self.log.push((self.name, event));
    }
}

impl Widget for Recorder {
    fn on_key(&mut self, _cx: &mut EventCx<'_>, _event: &KeyEvent) -> bool {
        self.record("key");
        true
    }

    fn on_char(&mut self, _cx: &mut EventCx<'_>, _event: &CharEvent) -> bool {
        self.record("char");
        true
    }

    fn on_mouse_button(&mut self, cx: &mut EventCx<'_>, event: &MouseButtonEvent) -> bool {
        self.record(if event.pressed { "press" } else { "release" });
        if self.drag && event.pressed {
            cx.request_drag();
        }
        true
    }

    fn on_double_click(&mut self, _cx: &mut EventCx<'_>, _event: &MouseButtonEvent) -> bool {
        self.record("double");
        true
    }

    fn on_mouse_move(&mut self, _cx: &mut EventCx<'_>, _event: &MouseMoveEvent) -> bool {
        self.record("move");
        true
    }

    fn on_mouse_enter(&mut self, _cx: &mut EventCx<'_>) {
        self.record("enter");
    }

    fn on_mouse_leave(&mut self, _cx: &mut EventCx<'_>) {
        self.record("leave");
    }

    fn on_focus_received(&mut self, _cx: &mut EventCx<'_>) {
        self.record("focus");
    }

    fn on_focus_lost(&mut self, _cx: &mut EventCx<'_>) {
        self.record("blur");
    }

    fn wants_mouse_override(&mut self, _cx: &mut EventCx<'_>, _event: &MouseButtonEvent) -> bool {
        if self.claim {
            self.record("claim");
        }
        self.claim
    }
}

/// Props for a widget at `(x, y)` of size `w` by `h`.
pub(crate) fn at(x: f64, y: f64, w: f64, h: f64) -> WidgetProps {
    WidgetProps::sized(Point::new(x, y), Size::new(w, h))
}
