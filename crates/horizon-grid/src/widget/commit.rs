//! Row update commit pipeline.
//!
//! Cell edits, drag-fill, copy/paste and column-fill all end up as one
//! [`RangeUpdate`] describing which rows change and how. The update is fully
//! resolved against the row source before any handler sees it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use horizon_grid_core::PerfSpan;
use horizon_grid_core::logging::{span_names, targets};

use crate::error::{GridError, Result};
use crate::model::{Row, RowSource, field_value};

/// The gesture that produced an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateAction {
    /// A single cell was edited.
    CellUpdate,
    /// A value was filled down to the last row.
    ColumnFill,
    /// A copied cell was pasted.
    CopyPaste,
    /// A value was dragged over a range.
    CellDrag,
}

/// A request to update a row range.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsUpdate {
    /// Key of the updated column.
    pub cell_key: String,
    /// First row of the range.
    pub from_row: usize,
    /// Last row of the range, inclusive.
    pub to_row: usize,
    /// Updated field values.
    pub updated: Value,
    /// The producing gesture.
    pub action: UpdateAction,
    /// Source row of a copy/paste.
    pub origin_row: Option<usize>,
}

impl RowsUpdate {
    /// Creates a request without an origin row.
    pub fn new(
        cell_key: impl Into<String>,
        from_row: usize,
        to_row: usize,
        updated: Value,
        action: UpdateAction,
    ) -> Self {
        Self {
            cell_key: cell_key.into(),
            from_row,
            to_row,
            updated,
            action,
            origin_row: None,
        }
    }

    /// Sets the copy/paste source row.
    pub fn with_origin_row(mut self, origin_row: usize) -> Self {
        self.origin_row = Some(origin_row);
        self
    }
}

/// A resolved update, as delivered to `grid_rows_updated` handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeUpdate {
    /// Key of the updated column.
    pub cell_key: String,
    /// First row of the range.
    pub from_row: usize,
    /// Last row of the range, inclusive.
    pub to_row: usize,
    /// Key of the source row: the origin row for copy/paste, else `from_row`.
    pub from_row_id: Value,
    /// Key of `to_row`.
    pub to_row_id: Value,
    /// Keys of every row in the range, in order.
    pub row_ids: Vec<Value>,
    /// Updated field values.
    pub updated: Value,
    /// The producing gesture.
    pub action: UpdateAction,
    /// Data of the source row.
    pub from_row_data: Row,
}

/// Resolves `request` against `rows`, reading row keys from `row_key`.
pub fn build_range_update(request: &RowsUpdate, rows: &dyn RowSource, row_key: &str) -> Result<RangeUpdate> {
    let _span = PerfSpan::new(span_names::COMMIT);
    let len = rows.row_count();

    if request.from_row > request.to_row {
        tracing::warn!(target: targets::COMMIT, from = request.from_row, to = request.to_row, "inverted commit range");
        return Err(GridError::InvalidRange {
            from: request.from_row,
            to: request.to_row,
        });
    }

    let fetch = |index: usize| {
        rows.row(index).ok_or_else(|| {
            tracing::warn!(target: targets::COMMIT, index, len, "commit row out of range");
            GridError::RowOutOfRange { index, len }
        })
    };

    let source_index = match (request.action, request.origin_row) {
        (UpdateAction::CopyPaste, Some(origin)) => origin,
        (UpdateAction::CopyPaste, None) => {
            tracing::warn!(target: targets::COMMIT, "copy/paste commit without origin row");
            return Err(GridError::MissingOriginRow);
        }
        _ => request.from_row,
    };

    let range_rows = (request.from_row..=request.to_row)
        .map(&fetch)
        .collect::<Result<Vec<_>>>()?;
    let from_row_data = fetch(source_index)?;

    let row_ids: Vec<Value> = range_rows.iter().map(|row| field_value(row, row_key)).collect();
    let to_row_id = row_ids.last().cloned().unwrap_or(Value::Null);

    let update = RangeUpdate {
        cell_key: request.cell_key.clone(),
        from_row: request.from_row,
        to_row: request.to_row,
        from_row_id: field_value(&from_row_data, row_key),
        to_row_id,
        row_ids,
        updated: request.updated.clone(),
        action: request.action,
        from_row_data,
    };
    tracing::debug!(
        target: targets::COMMIT,
        action = ?update.action,
        cell_key = %update.cell_key,
        from = update.from_row,
        to = update.to_row,
        "rows update resolved"
    );
    Ok(update)
}
