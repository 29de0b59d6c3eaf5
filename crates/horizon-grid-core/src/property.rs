//! Property system for Horizon Grid.
//!
//! A [`Property<T>`] holds durable state with change detection. When `set()`
//! reports a change, the owner emits the matching notification signal, which
//! is how the grid tells the rendering layer that a full state-dependent
//! refresh is due (column metrics, legacy selection, sort, filter row).
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::{Property, Signal};
//!
//! struct FilterToggle {
//!     enabled: Property<bool>,
//!     enabled_changed: Signal<bool>,
//! }
//!
//! impl FilterToggle {
//!     fn toggle(&self) {
//!         let next = !self.enabled.get();
//!         if self.enabled.set(next) {
//!             self.enabled_changed.emit(next);
//!         }
//!     }
//! }
//!
//! let toggle = FilterToggle { enabled: Property::new(false), enabled_changed: Signal::new() };
//! toggle.toggle();
//! assert!(toggle.enabled.get());
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::logging::targets;

/// A reactive property that tracks changes.
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a clone of the current value.
    ///
    /// Large values are better stored behind an `Arc` so this stays cheap.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            tracing::trace!(target: targets::PROPERTY, "property changed");
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}
