//! Event payloads delivered to and raised by the grid.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SortDirection;
use crate::model::{Column, Row};

/// A cell address: row index plus column layout position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    /// Row index.
    pub row_index: usize,
    /// Column layout position.
    pub column_index: usize,
}

impl CellPosition {
    /// Creates a cell position.
    pub fn new(row_index: usize, column_index: usize) -> Self {
        Self {
            row_index,
            column_index,
        }
    }
}

/// A committed single-cell edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCommit {
    /// Edited row.
    pub row_index: usize,
    /// Key of the edited column.
    pub cell_key: String,
    /// Updated field values, usually `{cell_key: value}`.
    pub updated: Value,
}

/// A double click on the drag-fill handle of a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DragHandleDoubleClick {
    /// Row holding the handle.
    pub row_index: usize,
    /// Column layout position of the handle.
    pub column_index: usize,
    /// Data of the row holding the handle.
    pub row: Row,
}

/// A drag-fill gesture copying one cell's value over a row range.
#[derive(Debug, Clone, PartialEq)]
pub struct CellsDragged {
    /// Key of the dragged column.
    pub cell_key: String,
    /// First row of the filled range.
    pub from_row: usize,
    /// Last row of the filled range, inclusive.
    pub to_row: usize,
    /// Value written into the range.
    pub value: Value,
}

/// A paste of one copied cell into another row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellCopyPaste {
    /// Key of the pasted column.
    pub cell_key: String,
    /// Row the value was copied from.
    pub origin_row: usize,
    /// Row the value is pasted into.
    pub target_row: usize,
    /// Pasted value.
    pub value: Value,
}

/// A click or double click on a row, as reported to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RowClick {
    /// Clicked row.
    pub row_index: usize,
    /// Data of the clicked row.
    pub row: Row,
    /// The clicked column, if the position is valid.
    pub column: Option<Column>,
}

/// A column width change made by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnResize {
    /// Column layout position.
    pub column_index: usize,
    /// Requested width, before clamping.
    pub width: f32,
}

/// The active sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    /// Key of the sorted column.
    pub column_key: String,
    /// Sort direction.
    pub direction: SortDirection,
}

/// Imperative signals sent over the [`EventBus`](super::EventBus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSignal {
    /// Move cell selection, optionally opening the editor.
    CellSelected {
        /// Row index.
        row_index: usize,
        /// Column layout position.
        column_index: usize,
        /// Open the cell editor after selecting.
        open_editor: bool,
    },
    /// A drag-fill gesture entered a row.
    DragEnter {
        /// Row under the pointer.
        over_row_index: usize,
    },
    /// Scroll the viewport so the column is visible.
    ScrollToColumn(usize),
}

impl GridSignal {
    /// Kind of the signal, used to route it to subscribers.
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::CellSelected { .. } => SignalKind::CellSelected,
            Self::DragEnter { .. } => SignalKind::DragEnter,
            Self::ScrollToColumn(_) => SignalKind::ScrollToColumn,
        }
    }
}

/// Discriminant of a [`GridSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// [`GridSignal::CellSelected`].
    CellSelected,
    /// [`GridSignal::DragEnter`].
    DragEnter,
    /// [`GridSignal::ScrollToColumn`].
    ScrollToColumn,
}

impl SignalKind {
    /// Every kind, in channel order.
    pub const ALL: [SignalKind; 3] = [Self::CellSelected, Self::DragEnter, Self::ScrollToColumn];

    pub(crate) fn channel(self) -> usize {
        match self {
            Self::CellSelected => 0,
            Self::DragEnter => 1,
            Self::ScrollToColumn => 2,
        }
    }
}
