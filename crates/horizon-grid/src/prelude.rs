//! Prelude module for Horizon Grid.
//!
//! ```
//! use horizon_grid::prelude::*;
//! ```

// ============================================================================
// Signal/Slot and Property System
// ============================================================================

pub use horizon_grid_core::{ConnectionId, Property, Signal};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use crate::config::{
    CellNavigationMode, GridConfig, RowSelectMode, RowSelectionConfig, SortDirection,
};
pub use crate::error::GridError;

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    Column, ColumnLock, ColumnWidth, KeySelection, Row, RowRef, RowSource, SelectBy,
};

// ============================================================================
// Layout
// ============================================================================

pub use crate::layout::{ColumnMetrics, ComputedColumn, HeaderRow, HeaderRowType};

// ============================================================================
// Grid
// ============================================================================

pub use crate::widget::{
    CellCommit, CellCopyPaste, CellPosition, CellsDragged, DataGrid, DragHandleDoubleClick,
    EventBus, GridSignal, GridSignals, KeyCode, RangeUpdate, RowsUpdate, SignalKind,
    Subscription, UpdateAction,
};
