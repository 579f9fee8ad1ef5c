// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard shortcuts.

use alloc::boxed::Box;

use hashbrown::HashMap;
use trellis_widget::events::{Key, Modifiers};

/// A key together with the exact modifier state that triggers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    /// The key.
    pub key: Key,
    /// Modifiers that must be held, and no others.
    pub modifiers: Modifiers,
}

impl KeyCombination {
    /// A key with modifiers.
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key with no modifiers.
    pub const fn key_only(key: Key) -> Self {
        Self::new(key, Modifiers::empty())
    }

    /// A key with Ctrl.
    pub const fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL)
    }
}

type Action = Box<dyn FnMut()>;

/// Table of shortcut actions, checked by the desktop before key events reach
/// the focused widget.
#[derive(Default)]
pub struct Shortcuts {
    actions: HashMap<KeyCombination, Action>,
}

impl core::fmt::Debug for Shortcuts {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shortcuts")
            .field("registered", &self.actions.len())
            .finish_non_exhaustive()
    }
}

impl Shortcuts {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to `combo`. Returns `true` if an older binding was replaced.
    pub fn register(&mut self, combo: KeyCombination, action: impl FnMut() + 'static) -> bool {
        self.actions.insert(combo, Box::new(action)).is_some()
    }

    /// Remove the binding of `combo`.
    pub fn unregister(&mut self, combo: KeyCombination) -> bool {
        self.actions.remove(&combo).is_some()
    }

    /// Returns `true` if `combo` is bound.
    pub fn contains(&self, combo: KeyCombination) -> bool {
        self.actions.contains_key(&combo)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run the action bound to `combo`. Returns `true` if one ran.
    pub fn fire(&mut self, combo: KeyCombination) -> bool {
        let Some(action) = self.actions.get_mut(&combo) else {
            return false;
        };
        tracing::debug!(?combo, "shortcut fired");
        action();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[test]
    fn modifiers_must_match_exactly() {
        let hits = Rc::new(Cell::new(0));
        let mut shortcuts = Shortcuts::new();
        let counter = hits.clone();
        shortcuts.register(KeyCombination::ctrl(Key::Character('s')), move || {
            counter.set(counter.get() + 1);
        });

        assert!(shortcuts.fire(KeyCombination::ctrl(Key::Character('s'))));
        assert!(!shortcuts.fire(KeyCombination::key_only(Key::Character('s'))));
        assert!(!shortcuts.fire(KeyCombination::new(
            Key::Character('s'),
            Modifiers::CTRL | Modifiers::SHIFT
        )));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn rebinding_replaces() {
        let mut shortcuts = Shortcuts::new();
        let combo = KeyCombination::key_only(Key::Function(5));
        assert!(!shortcuts.register(combo, || {}));
        assert!(shortcuts.register(combo, || {}));
        assert_eq!(shortcuts.len(), 1);
        assert!(shortcuts.unregister(combo));
        assert!(shortcuts.is_empty());
    }
}
