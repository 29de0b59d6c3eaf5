//! Imperative signal bus.
//!
//! The bus carries transient, high-frequency interactions (cell selection,
//! drag-enter, scroll-to-column) straight to whichever rendering component
//! subscribed, bypassing the grid's durable-state notifications.
//!
//! Delivery is synchronous and in-process. Each dispatch reaches every
//! handler subscribed to its kind at that moment exactly once; nothing is
//! queued and nothing is replayed to later subscribers.
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use horizon_grid::widget::{EventBus, GridSignal};
//!
//! let bus = EventBus::new();
//! let scrolled = Arc::new(AtomicUsize::new(0));
//! let scrolled_clone = scrolled.clone();
//! let subscription = bus.on_scroll_to_column(move |column| {
//!     scrolled_clone.store(column, Ordering::SeqCst);
//! });
//!
//! bus.dispatch(GridSignal::ScrollToColumn(4));
//! assert_eq!(scrolled.load(Ordering::SeqCst), 4);
//! subscription.unsubscribe();
//! ```

use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{ConnectionGuard, Signal};

use super::events::{CellPosition, GridSignal, SignalKind};

/// Handle to a bus subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    kind: SignalKind,
    guard: ConnectionGuard<GridSignal>,
}

impl Subscription {
    /// Kind of signal this subscription receives.
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// Removes the handler. Returns `false` if the bus was already gone.
    pub fn unsubscribe(mut self) -> bool {
        self.guard.disconnect()
    }

    /// Keeps the handler connected for the bus's lifetime.
    pub fn detach(self) {
        self.guard.detach();
    }
}

/// Per-grid bus for imperative signals.
#[derive(Debug)]
pub struct EventBus {
    channels: [Arc<Signal<GridSignal>>; 3],
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            channels: SignalKind::ALL.map(|_| Arc::new(Signal::new())),
        }
    }
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `signal` to the current subscribers of its kind. Returns the
    /// number of handlers invoked.
    pub fn dispatch(&self, signal: GridSignal) -> usize {
        let delivered = self.channels[signal.kind().channel()].emit(signal);
        tracing::trace!(target: targets::BUS, ?signal, delivered, "bus dispatch");
        delivered
    }

    /// Subscribes `handler` to signals of `kind`.
    pub fn subscribe<F>(&self, kind: SignalKind, handler: F) -> Subscription
    where
        F: Fn(&GridSignal) + Send + Sync + 'static,
    {
        let guard = Signal::connect_scoped(&self.channels[kind.channel()], handler);
        tracing::trace!(target: targets::BUS, ?kind, "bus subscribe");
        Subscription { kind, guard }
    }

    /// Number of current subscribers of `kind`.
    pub fn subscriber_count(&self, kind: SignalKind) -> usize {
        self.channels[kind.channel()].connection_count()
    }

    /// Subscribes to cell selection: `(cell, open_editor)`.
    pub fn on_cell_selected<F>(&self, handler: F) -> Subscription
    where
        F: Fn(CellPosition, bool) + Send + Sync + 'static,
    {
        self.subscribe(SignalKind::CellSelected, move |signal| {
            if let GridSignal::CellSelected {
                row_index,
                column_index,
                open_editor,
            } = *signal
            {
                handler(CellPosition::new(row_index, column_index), open_editor);
            }
        })
    }

    /// Subscribes to drag-enter with the row under the pointer.
    pub fn on_drag_enter<F>(&self, handler: F) -> Subscription
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.subscribe(SignalKind::DragEnter, move |signal| {
            if let GridSignal::DragEnter { over_row_index } = *signal {
                handler(over_row_index);
            }
        })
    }

    /// Subscribes to scroll-to-column with the column layout position.
    pub fn on_scroll_to_column<F>(&self, handler: F) -> Subscription
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.subscribe(SignalKind::ScrollToColumn, move |signal| {
            if let GridSignal::ScrollToColumn(column) = *signal {
                handler(column);
            }
        })
    }
}

static_assertions::assert_impl_all!(EventBus: Send, Sync);
static_assertions::assert_impl_all!(Subscription: Send, Sync);
