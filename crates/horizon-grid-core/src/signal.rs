//! Signal/slot system for Horizon Grid.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism. The
//! grid exposes every host callback (rows selected, rows updated, column
//! resized, ...) as a [`Signal`] field, and the imperative signal bus is built
//! from signals as well.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Delivery
//!
//! Slots are invoked synchronously, one after another, on the emitting
//! thread. There is no queuing and no replay: a slot connected after an
//! emission never observes it. Before invoking slots, `emit` takes a snapshot
//! of the connection list and releases the lock, so a slot may connect or
//! disconnect (including itself) without deadlocking. Such changes take
//! effect on the next emission.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let column_resized = Signal::<(usize, f32)>::new();
//!
//! let conn_id = column_resized.connect(|(index, width)| {
//!     println!("column {index} is now {width}px wide");
//! });
//!
//! column_resized.emit((2, 120.0));
//! column_resized.disconnect(conn_id);
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected,
    /// a one-shot connection fires, or the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Slot<Args>,
    /// Removed before its first invocation.
    once: bool,
}

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(usize, f32)` for multiple arguments.
///
/// A signal with no connections is a valid no-op: emitting it does nothing.
/// Callers that must skip work entirely when nobody listens can check
/// [`has_connections`](Self::has_connections) first.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.insert(Arc::new(slot), false)
    }

    /// Connect a slot that is disconnected right before its first invocation.
    ///
    /// ```
    /// use horizon_grid_core::Signal;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let clicked = Signal::<()>::new();
    /// let hits = Arc::new(AtomicUsize::new(0));
    /// let hits_clone = hits.clone();
    /// clicked.connect_once(move |_| {
    ///     hits_clone.fetch_add(1, Ordering::SeqCst);
    /// });
    ///
    /// clicked.emit(());
    /// clicked.emit(());
    /// assert_eq!(hits.load(Ordering::SeqCst), 1);
    /// ```
    pub fn connect_once<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.insert(Arc::new(slot), true)
    }

    fn insert(&self, slot: Slot<Args>, once: bool) -> ConnectionId {
        let id = self.connections.lock().insert(Connection { slot, once });
        tracing::trace!(target: targets::SIGNAL, ?id, once, "slot connected");
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Returns `true` if at least one slot is connected.
    pub fn has_connections(&self) -> bool {
        !self.connections.lock().is_empty()
    }

    /// Emit the signal, invoking every slot connected at the time of the call.
    ///
    /// Returns the number of slots invoked.
    #[tracing::instrument(skip_all, target = "horizon_grid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        let slots: Vec<Slot<Args>> = {
            let mut connections = self.connections.lock();
            let once_ids: Vec<ConnectionId> = connections
                .iter()
                .filter(|(_, conn)| conn.once)
                .map(|(id, _)| id)
                .collect();
            let slots = connections
                .values()
                .map(|conn| Arc::clone(&conn.slot))
                .collect();
            for id in once_ids {
                connections.remove(id);
            }
            slots
        };

        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in &slots {
            slot(&args);
        }
        slots.len()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Connect a slot with automatic disconnection when the guard is dropped.
    ///
    /// The guard holds a weak reference, so it never keeps the signal alive
    /// and dropping it after the signal is gone is harmless.
    ///
    /// ```
    /// use horizon_grid_core::Signal;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let signal = Arc::new(Signal::<i32>::new());
    /// let counter = Arc::new(AtomicI32::new(0));
    /// {
    ///     let counter_clone = counter.clone();
    ///     let _guard = Signal::connect_scoped(&signal, move |&n| {
    ///         counter_clone.fetch_add(n, Ordering::SeqCst);
    ///     });
    ///     signal.emit(42);
    /// }
    /// signal.emit(43);
    /// assert_eq!(counter.load(Ordering::SeqCst), 42);
    /// ```
    pub fn connect_scoped<F>(this: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = this.connect(slot);
        ConnectionGuard {
            signal: Arc::downgrade(this),
            id: Some(id),
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`].
pub struct ConnectionGuard<Args: 'static> {
    signal: Weak<Signal<Args>>,
    id: Option<ConnectionId>,
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// The ID of the guarded connection, if still connected through this guard.
    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// Disconnect now instead of waiting for the drop.
    ///
    /// Returns `true` if a live connection was removed.
    pub fn disconnect(&mut self) -> bool {
        match (self.id.take(), self.signal.upgrade()) {
            (Some(id), Some(signal)) => signal.disconnect(id),
            _ => false,
        }
    }

    /// Keep the connection alive for the lifetime of the signal.
    pub fn detach(mut self) -> Option<ConnectionId> {
        self.id.take()
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<Args: 'static> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}

impl<Args: 'static> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<(usize, f32)>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<usize>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_emit_without_connections_is_noop() {
        let signal = Signal::<String>::new();
        assert!(!signal.has_connections());
        assert_eq!(signal.emit("nobody".to_string()), 0);
    }

    #[test]
    fn test_multiple_connections_in_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order_clone = order.clone();
            signal.connect(move |_| order_clone.lock().push(n));
        }

        assert_eq!(signal.connection_count(), 3);
        assert_eq!(signal.emit(()), 3);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_connect_once_fires_once() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        signal.connect_once(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(signal.connection_count(), 1);

        signal.emit(());
        signal.emit(());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_late_connection_sees_no_replay() {
        let signal = Signal::<i32>::new();
        signal.emit(7);

        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();
        signal.connect(move |&v| received_clone.lock().push(v));

        assert!(received.lock().is_empty());
        signal.emit(8);
        assert_eq!(*received.lock(), vec![8]);
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let signal_clone = Arc::downgrade(&signal);
        let hits_clone = hits.clone();
        let own_id_clone = own_id.clone();
        let id = signal.connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            if let (Some(signal), Some(id)) = (signal_clone.upgrade(), *own_id_clone.lock()) {
                signal.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Arc::new(Signal::<i32>::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let received_clone = received.clone();
            let _guard = Signal::connect_scoped(&signal, move |&value| {
                received_clone.lock().push(value);
            });
            signal.emit(1);
        }

        signal.emit(2);
        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn test_connection_guard_outliving_signal() {
        let signal = Arc::new(Signal::<i32>::new());
        let mut guard = Signal::connect_scoped(&signal, |_| {});
        drop(signal);
        assert!(!guard.disconnect());
    }

    #[test]
    fn test_connection_guard_detach() {
        let signal = Arc::new(Signal::<i32>::new());
        let guard = Signal::connect_scoped(&signal, |_| {});
        let id = guard.detach();
        assert!(id.is_some());
        assert_eq!(signal.connection_count(), 1);
    }
}
