//! Keyboard state tracking for modifier-aware gestures.
//!
//! The grid forwards every key-down and key-up it receives to a per-instance
//! [`KeyDownSet`]. Gesture code then asks the set whether a modifier is held,
//! rather than reading ambient keyboard state.
//!
//! Shift-range selection is gated on [`KeyDownSet::is_exactly_one_key_down`]:
//! Shift must be the *only* key held, so compound chords such as
//! Ctrl+Shift never extend a selection by accident.
//!
//! ```
//! use horizon_grid::widget::keyboard::{KeyCode, KeyDownSet};
//!
//! let mut keys = KeyDownSet::new();
//! keys.key_down(KeyCode::SHIFT);
//! assert!(keys.is_exactly_one_key_down(KeyCode::SHIFT));
//!
//! keys.key_down(KeyCode::CTRL);
//! assert!(!keys.is_exactly_one_key_down(KeyCode::SHIFT));
//! ```

use std::collections::HashSet;

use horizon_grid_core::logging::targets;

/// A platform key code, as delivered with key events.
///
/// The associated constants follow the conventional DOM/Windows virtual key
/// numbering, which is what most hosts report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const BACKSPACE: Self = Self(8);
    pub const TAB: Self = Self(9);
    pub const ENTER: Self = Self(13);
    pub const SHIFT: Self = Self(16);
    pub const CTRL: Self = Self(17);
    pub const ALT: Self = Self(18);
    pub const ESCAPE: Self = Self(27);
    pub const SPACE: Self = Self(32);
    pub const PAGE_UP: Self = Self(33);
    pub const PAGE_DOWN: Self = Self(34);
    pub const END: Self = Self(35);
    pub const HOME: Self = Self(36);
    pub const LEFT_ARROW: Self = Self(37);
    pub const UP_ARROW: Self = Self(38);
    pub const RIGHT_ARROW: Self = Self(39);
    pub const DOWN_ARROW: Self = Self(40);
    pub const DELETE: Self = Self(46);
    pub const META: Self = Self(91);

    /// Returns `true` for Shift, Ctrl, Alt and Meta.
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::SHIFT | Self::CTRL | Self::ALT | Self::META)
    }

    /// Returns `true` for the arrow, Home/End and Page keys.
    pub fn is_navigation(self) -> bool {
        (Self::PAGE_UP.0..=Self::DOWN_ARROW.0).contains(&self.0)
    }
}

impl From<u16> for KeyCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// The set of keys currently held down on one grid instance.
///
/// Entries are added on key-down and removed on key-up. Nothing persists
/// beyond the grid's lifetime.
#[derive(Debug, Clone, Default)]
pub struct KeyDownSet {
    keys: HashSet<KeyCode>,
}

impl KeyDownSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `code` as held. Returns `false` on key repeat.
    pub fn key_down(&mut self, code: KeyCode) -> bool {
        let inserted = self.keys.insert(code);
        tracing::trace!(target: targets::KEYBOARD, code = code.0, held = self.keys.len(), "key down");
        inserted
    }

    /// Marks `code` as released. Returns `false` if it was not held.
    pub fn key_up(&mut self, code: KeyCode) -> bool {
        let removed = self.keys.remove(&code);
        tracing::trace!(target: targets::KEYBOARD, code = code.0, held = self.keys.len(), "key up");
        removed
    }

    /// Returns `true` if `code` is held, regardless of other keys.
    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.keys.contains(&code)
    }

    /// Returns `true` iff `code` is held and no other key is.
    pub fn is_exactly_one_key_down(&self, code: KeyCode) -> bool {
        self.keys.len() == 1 && self.keys.contains(&code)
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no key is held.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Forgets every held key, e.g. when the grid loses focus and key-up
    /// events will not arrive.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Iterates the held keys in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_up() {
        let mut keys = KeyDownSet::new();
        assert!(keys.key_down(KeyCode::SHIFT));
        assert!(!keys.key_down(KeyCode::SHIFT));
        assert!(keys.is_key_down(KeyCode::SHIFT));
        assert_eq!(keys.len(), 1);

        assert!(keys.key_up(KeyCode::SHIFT));
        assert!(!keys.key_up(KeyCode::SHIFT));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_exactly_one_key_down() {
        let mut keys = KeyDownSet::new();
        assert!(!keys.is_exactly_one_key_down(KeyCode::SHIFT));

        keys.key_down(KeyCode::SHIFT);
        assert!(keys.is_exactly_one_key_down(KeyCode::SHIFT));
        assert!(!keys.is_exactly_one_key_down(KeyCode::CTRL));

        keys.key_down(KeyCode::CTRL);
        assert!(!keys.is_exactly_one_key_down(KeyCode::SHIFT));
        assert!(keys.is_key_down(KeyCode::SHIFT));

        keys.key_up(KeyCode::CTRL);
        assert!(keys.is_exactly_one_key_down(KeyCode::SHIFT));
    }

    #[test]
    fn test_clear() {
        let mut keys = KeyDownSet::new();
        keys.key_down(KeyCode::ALT);
        keys.key_down(KeyCode(65));
        keys.clear();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_key_classification() {
        assert!(KeyCode::SHIFT.is_modifier());
        assert!(!KeyCode::TAB.is_modifier());
        assert!(KeyCode::UP_ARROW.is_navigation());
        assert!(KeyCode::HOME.is_navigation());
        assert!(!KeyCode::ENTER.is_navigation());
        assert_eq!(KeyCode::from(16), KeyCode::SHIFT);
    }
}
