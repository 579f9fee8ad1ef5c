// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event forwarding.
//!
//! Every `forward_*` method delivers to one widget and then replays the event
//! to the other members of that widget's share-inputs group. Mouse buttons
//! first go through the override chain: ancestors are asked, root first,
//! whether they want to claim the event, and the first one that does handles
//! it instead of the target.

use smallvec::SmallVec;

use crate::events::{
    CharEvent, JoystickAxisEvent, JoystickButtonEvent, KeyEvent, MouseButtonEvent,
    MouseMoveEvent, MouseWheelEvent,
};
use crate::tree::Tree;
use crate::types::WidgetId;
use crate::widget::{EventCx, Requests, Widget};

/// Result of forwarding a mouse button event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Forwarded {
    /// The widget that handled the event: the target, or the ancestor that claimed it.
    pub handler: WidgetId,
    /// Whether the handler consumed it.
    pub handled: bool,
}

impl Tree {
    /// Deliver to `id` alone, with no fan-out.
    pub fn deliver<R>(
        &mut self,
        id: WidgetId,
        requests: &mut Requests,
        f: impl FnOnce(&mut dyn Widget, &mut EventCx<'_>) -> R,
    ) -> Option<R> {
        self.with_widget(id, |w, tree| {
            let mut cx = EventCx::new(tree, id, requests);
            f(w, &mut cx)
        })
    }

    /// Deliver to `id`, then to every other member of its share group.
    ///
    /// Returns whether `id` itself consumed the event.
    fn deliver_shared(
        &mut self,
        id: WidgetId,
        requests: &mut Requests,
        mut f: impl FnMut(&mut dyn Widget, &mut EventCx<'_>) -> bool,
    ) -> bool {
        let handled = self.deliver(id, requests, &mut f).unwrap_or(false);
        if let Some(group) = self.share_group_of(id) {
            let peers: SmallVec<[WidgetId; 4]> = self
                .share_group_members(group)
                .iter()
                .copied()
                .filter(|m| *m != id)
                .collect();
            for peer in peers {
                self.deliver(peer, requests, &mut f);
            }
        }
        handled
    }

    /// Path from the root down to `id`, inclusive.
    pub fn path_to(&self, id: WidgetId) -> SmallVec<[WidgetId; 16]> {
        let mut path: SmallVec<[WidgetId; 16]> = self.self_and_ancestors(id).collect();
        path.reverse();
        path
    }

    /// Forward a key event.
    pub fn forward_key(&mut self, id: WidgetId, event: &KeyEvent, requests: &mut Requests) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_key(cx, event))
    }

    /// Forward a character event.
    pub fn forward_char(&mut self, id: WidgetId, event: &CharEvent, requests: &mut Requests) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_char(cx, event))
    }

    /// Ask the ancestors of `id`, root first, whether one of them claims a
    /// mouse button event via [`Widget::wants_mouse_override`].
    ///
    /// Returns the claimer. Ancestors below it are not asked.
    pub fn mouse_override(
        &mut self,
        id: WidgetId,
        event: &MouseButtonEvent,
        requests: &mut Requests,
    ) -> Option<WidgetId> {
        let path = self.path_to(id);
        for &ancestor in path.iter().take(path.len().saturating_sub(1)) {
            let claimed = self
                .deliver(ancestor, requests, |w, cx| w.wants_mouse_override(cx, event))
                .unwrap_or(false);
            if claimed {
                tracing::trace!(?ancestor, target = ?id, "mouse button claimed by ancestor");
                return Some(ancestor);
            }
        }
        None
    }

    /// Deliver a mouse button event to `id` and its share group, skipping the
    /// override chain.
    pub fn deliver_mouse_button(
        &mut self,
        id: WidgetId,
        event: &MouseButtonEvent,
        requests: &mut Requests,
    ) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_mouse_button(cx, event))
    }

    /// Forward a mouse button event through the override chain.
    ///
    /// If an ancestor [claims](Self::mouse_override) the event it has handled
    /// it and nothing further is delivered. Otherwise `id` receives it,
    /// followed by its share group.
    pub fn forward_mouse_button(
        &mut self,
        id: WidgetId,
        event: &MouseButtonEvent,
        requests: &mut Requests,
    ) -> Forwarded {
        if let Some(handler) = self.mouse_override(id, event, requests) {
            return Forwarded {
                handler,
                handled: true,
            };
        }
        Forwarded {
            handler: id,
            handled: self.deliver_mouse_button(id, event, requests),
        }
    }

    /// Forward the second press of a double click.
    pub fn forward_double_click(
        &mut self,
        id: WidgetId,
        event: &MouseButtonEvent,
        requests: &mut Requests,
    ) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_double_click(cx, event))
    }

    /// Forward a wheel event.
    pub fn forward_mouse_wheel(
        &mut self,
        id: WidgetId,
        event: &MouseWheelEvent,
        requests: &mut Requests,
    ) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_mouse_wheel(cx, event))
    }

    /// Forward cursor motion.
    pub fn forward_mouse_move(
        &mut self,
        id: WidgetId,
        event: &MouseMoveEvent,
        requests: &mut Requests,
    ) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_mouse_move(cx, event))
    }

    /// Forward a joystick button event.
    pub fn forward_joystick_button(
        &mut self,
        id: WidgetId,
        event: &JoystickButtonEvent,
        requests: &mut Requests,
    ) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_joystick_button(cx, event))
    }

    /// Forward a joystick axis event.
    pub fn forward_joystick_axis(
        &mut self,
        id: WidgetId,
        event: &JoystickAxisEvent,
        requests: &mut Requests,
    ) -> bool {
        self.deliver_shared(id, requests, |w, cx| w.on_joystick_axis(cx, event))
    }

    /// Tell `id` it received keyboard focus.
    pub fn forward_focus_received(&mut self, id: WidgetId, requests: &mut Requests) {
        self.deliver_shared(id, requests, |w, cx| {
            w.on_focus_received(cx);
            false
        });
    }

    /// Tell `id` it lost keyboard focus.
    pub fn forward_focus_lost(&mut self, id: WidgetId, requests: &mut Requests) {
        self.deliver_shared(id, requests, |w, cx| {
            w.on_focus_lost(cx);
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Key, Modifiers, MouseButton};
    use crate::types::{ShareGroup, WidgetProps};
    use crate::widget::Panel;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Point;

    type Log = Rc<RefCell<Vec<(&'static str, &'static str)>>>;

    #[derive(Debug)]
    struct Recorder {
        name: &'static str,
        log: Log,
        claim: bool,
    }

    impl Widget for Recorder {
        fn on_key(&mut self, _cx: &mut EventCx<'_>, _event: &KeyEvent) -> bool {
            self.log.borrow_mut().push((self.name, "key"));
            true
        }

        fn on_mouse_button(&mut self, _cx: &mut EventCx<'_>, _event: &MouseButtonEvent) -> bool {
            self.log.borrow_mut().push((self.name, "button"));
            true
        }

        fn wants_mouse_override(
            &mut self,
            _cx: &mut EventCx<'_>,
            _event: &MouseButtonEvent,
        ) -> bool {
            self.log.borrow_mut().push((self.name, "override?"));
            self.claim
        }

        fn on_focus_received(&mut self, cx: &mut EventCx<'_>) {
            self.log.borrow_mut().push((self.name, "focus"));
            cx.request_drag();
        }
    }

    fn recorder(name: &'static str, log: &Log, claim: bool) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
            claim,
        }
    }

    fn press() -> MouseButtonEvent {
        MouseButtonEvent {
            button: MouseButton::Left,
            pressed: true,
            position: Point::ZERO,
            modifiers: Modifiers::empty(),
            timestamp: 0,
        }
    }

    #[test]
    fn share_group_replays_to_peers() {
        let log: Log = Rc::default();
        let mut tree = Tree::new();
        let a = tree.create(WidgetProps::default(), recorder("a", &log, false));
        let b = tree.create(WidgetProps::default(), recorder("b", &log, false));
        let c = tree.create(WidgetProps::default(), recorder("c", &log, false));
        let lone = tree.create(WidgetProps::default(), recorder("lone", &log, false));
        for id in [a, b, c] {
            tree.set_share_group(id, Some(ShareGroup(1)));
        }
        let key = KeyEvent {
            key: Key::Enter,
            pressed: true,
            modifiers: Modifiers::empty(),
            timestamp: 0,
        };
        let mut requests = Requests::default();
        assert!(tree.forward_key(b, &key, &mut requests));
        assert_eq!(*log.borrow(), [("b", "key"), ("a", "key"), ("c", "key")]);

        log.borrow_mut().clear();
        tree.forward_key(lone, &key, &mut requests);
        assert_eq!(*log.borrow(), [("lone", "key")]);
    }

    #[test]
    fn override_chain_is_walked_root_first() {
        let log: Log = Rc::default();
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), recorder("root", &log, false));
        let dock = tree.insert(Some(root), WidgetProps::default(), recorder("dock", &log, true));
        let leaf = tree.insert(Some(dock), WidgetProps::default(), recorder("leaf", &log, false));

        let mut requests = Requests::default();
        let out = tree.forward_mouse_button(leaf, &press(), &mut requests);
        assert_eq!(
            out,
            Forwarded {
                handler: dock,
                handled: true
            }
        );
        assert_eq!(
            *log.borrow(),
            [("root", "override?"), ("dock", "override?")]
        );
    }

    #[test]
    fn unclaimed_button_reaches_target() {
        let log: Log = Rc::default();
        let mut tree = Tree::new();
        let root = tree.insert(None, WidgetProps::default(), recorder("root", &log, false));
        let leaf = tree.insert(Some(root), WidgetProps::default(), recorder("leaf", &log, true));

        let mut requests = Requests::default();
        let out = tree.forward_mouse_button(leaf, &press(), &mut requests);
        assert_eq!(out.handler, leaf);
        assert_eq!(*log.borrow(), [("root", "override?"), ("leaf", "button")]);
    }

    #[test]
    fn handlers_queue_requests() {
        let log: Log = Rc::default();
        let mut tree = Tree::new();
        let w = tree.create(WidgetProps::default(), recorder("w", &log, false));
        let mut requests = Requests::default();
        tree.forward_focus_received(w, &mut requests);
        assert_eq!(requests.drag, Some(w));
    }

    #[test]
    fn stale_targets_are_ignored() {
        let mut tree = Tree::new();
        let w = tree.create(WidgetProps::default(), Panel);
        tree.remove(w);
        let mut requests = Requests::default();
        let out = tree.forward_mouse_button(w, &press(), &mut requests);
        assert!(!out.handled);
        assert!(requests.is_empty());
    }
}
