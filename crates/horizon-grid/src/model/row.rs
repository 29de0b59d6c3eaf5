//! Row data access.
//!
//! The grid never stores full row sets. Rows are fetched on demand through a
//! [`RowSource`], the equivalent of a `row_getter(index)` plus `rows_count`
//! pair. Each row is a JSON object whose fields are read by name, and the
//! configured `row_key` field identifies a row.

use serde_json::Value;

/// A single row: a JSON object keyed by column/field name.
pub type Row = Value;

/// Provides row data to the grid.
///
/// Implementations must be cheap to query repeatedly; the grid calls `row`
/// for every index it touches during selection and commits.
pub trait RowSource: Send + Sync {
    /// Number of rows currently available.
    fn row_count(&self) -> usize;

    /// Returns the row at `index`, or `None` if it is out of range.
    fn row(&self, index: usize) -> Option<Row>;
}

impl RowSource for [Row] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, index: usize) -> Option<Row> {
        self.get(index).cloned()
    }
}

impl RowSource for Vec<Row> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn row(&self, index: usize) -> Option<Row> {
        self.get(index).cloned()
    }
}

/// A row source backed by a closure, for hosts that compute rows lazily.
///
/// ```
/// use horizon_grid::model::{FnRowSource, RowSource};
/// use serde_json::json;
///
/// let rows = FnRowSource::new(3, |i| json!({ "id": format!("r{i}") }));
/// assert_eq!(rows.row_count(), 3);
/// assert_eq!(rows.row(1).unwrap()["id"], "r1");
/// assert!(rows.row(3).is_none());
/// ```
pub struct FnRowSource<F> {
    count: usize,
    getter: F,
}

impl<F> FnRowSource<F>
where
    F: Fn(usize) -> Row + Send + Sync,
{
    /// Creates a source of `count` rows produced by `getter`.
    pub fn new(count: usize, getter: F) -> Self {
        Self { count, getter }
    }
}

impl<F> RowSource for FnRowSource<F>
where
    F: Fn(usize) -> Row + Send + Sync,
{
    fn row_count(&self) -> usize {
        self.count
    }

    fn row(&self, index: usize) -> Option<Row> {
        (index < self.count).then(|| (self.getter)(index))
    }
}

/// A row together with its index, as carried by selection events.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRef {
    /// Index of the row in the row source.
    pub row_index: usize,
    /// The row data at the time of the event.
    pub row: Row,
}

impl RowRef {
    /// Creates a new row reference.
    pub fn new(row_index: usize, row: Row) -> Self {
        Self { row_index, row }
    }
}

/// Returns the value of `field` on `row`, or `Null` when absent.
pub fn field_value(row: &Row, field: &str) -> Value {
    row.get(field).cloned().unwrap_or(Value::Null)
}

/// Canonical text form of a key value, used for hashing key sets.
///
/// Strings hash by their content so that `"r1"` and the JSON string `"r1"`
/// agree; every other value uses its JSON text.
pub fn key_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
