//! Core systems for Horizon Grid.
//!
//! This crate provides the foundational pieces shared by the grid crates:
//!
//! - **Signal/Slot System**: Type-safe, synchronous notification used for every
//!   host callback and for the imperative signal bus
//! - **Property System**: Durable state with change detection
//! - **Logging**: `tracing` targets and span helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let rows_selected = Signal::<Vec<usize>>::new();
//!
//! let conn_id = rows_selected.connect(|rows| {
//!     println!("selected rows: {:?}", rows);
//! });
//!
//! rows_selected.emit(vec![3, 4, 5]);
//! rows_selected.disconnect(conn_id);
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
