//! Grid controller and interaction plumbing.
//!
//! - `DataGrid`: the per-instance controller and its `GridSignals`
//! - `EventBus`: imperative signals for the rendering layer
//! - `commit`: normalization of edits into `RangeUpdate`s
//! - `keyboard`: held-key tracking for modifier-aware gestures

pub mod bus;
pub mod commit;
pub mod events;
pub mod grid;
pub mod keyboard;

pub use bus::{EventBus, Subscription};
pub use commit::{RangeUpdate, RowsUpdate, UpdateAction, build_range_update};
pub use events::{
    CellCommit, CellCopyPaste, CellPosition, CellsDragged, ColumnResize, DragHandleDoubleClick,
    GridSignal, RowClick, SignalKind, SortState,
};
pub use grid::{DataGrid, GridSignals};
pub use keyboard::{KeyCode, KeyDownSet};
