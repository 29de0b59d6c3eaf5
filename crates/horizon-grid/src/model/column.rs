//! Column definitions.
//!
//! A [`Column`] is the declared, authoritative description of a grid column.
//! Computed positions and widths live in
//! [`ColumnMetrics`](crate::layout::ColumnMetrics) and are derived from a
//! column set on demand.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{Column, ColumnWidth};
//!
//! let columns = vec![
//!     Column::new("id", "ID").with_width(60.0).locked(),
//!     Column::new("name", "Name").sortable(),
//!     Column::new("notes", "Notes").with_percent_width(40.0).resizable(false),
//! ];
//! assert_eq!(columns[1].width, ColumnWidth::Auto);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GridError, Result};

/// Key of the checkbox column injected when row selection is enabled.
pub const SELECT_COLUMN_KEY: &str = "select-row";

/// Width of the injected checkbox column.
pub const SELECT_COLUMN_WIDTH: f32 = 60.0;

/// Declared width of a column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "WidthRepr", into = "WidthRepr")]
pub enum ColumnWidth {
    /// Shares the width left over by fixed and percentage columns.
    #[default]
    Auto,
    /// A fixed width in pixels.
    Fixed(f32),
    /// A percentage of the grid's total width.
    Percent(f32),
}

impl ColumnWidth {
    /// Returns `true` if the column takes part in flexible distribution.
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// JSON shape of a width: a number of pixels, `"auto"` or `"NN%"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WidthRepr {
    Pixels(f32),
    Text(String),
}

impl TryFrom<WidthRepr> for ColumnWidth {
    type Error = String;

    fn try_from(repr: WidthRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            WidthRepr::Pixels(px) if px.is_finite() && px >= 0.0 => Ok(Self::Fixed(px)),
            WidthRepr::Pixels(px) => Err(format!("invalid column width {px}")),
            WidthRepr::Text(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("auto") {
                    return Ok(Self::Auto);
                }
                let pct = text
                    .strip_suffix('%')
                    .and_then(|n| n.trim().parse::<f32>().ok())
                    .filter(|p| p.is_finite() && *p >= 0.0)
                    .ok_or_else(|| format!("invalid column width '{text}'"))?;
                Ok(Self::Percent(pct))
            }
        }
    }
}

impl From<ColumnWidth> for WidthRepr {
    fn from(width: ColumnWidth) -> Self {
        match width {
            ColumnWidth::Auto => Self::Text("auto".to_string()),
            ColumnWidth::Fixed(px) => Self::Pixels(px),
            ColumnWidth::Percent(p) => Self::Text(format!("{p}%")),
        }
    }
}

/// Which edge, if any, a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "LockRepr", into = "LockRepr")]
pub enum ColumnLock {
    /// Scrolls with the grid.
    #[default]
    None,
    /// Pinned to the leading edge.
    Start,
    /// Pinned to the trailing edge.
    End,
}

/// JSON shape of a lock: `true`/`false` or `"start"`/`"end"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LockRepr {
    Flag(bool),
    Anchor(String),
}

impl TryFrom<LockRepr> for ColumnLock {
    type Error = String;

    fn try_from(repr: LockRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            LockRepr::Flag(true) => Ok(Self::Start),
            LockRepr::Flag(false) => Ok(Self::None),
            LockRepr::Anchor(anchor) => match anchor.as_str() {
                "start" => Ok(Self::Start),
                "end" => Ok(Self::End),
                "none" => Ok(Self::None),
                other => Err(format!("unknown lock anchor '{other}'")),
            },
        }
    }
}

impl From<ColumnLock> for LockRepr {
    fn from(lock: ColumnLock) -> Self {
        match lock {
            ColumnLock::None => Self::Flag(false),
            ColumnLock::Start => Self::Anchor("start".to_string()),
            ColumnLock::End => Self::Anchor("end".to_string()),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A declared grid column.
///
/// `metadata` is passed through untouched; hosts use it to carry formatter,
/// editor or styling descriptors for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Unique, stable identifier of the column within its set.
    pub key: String,
    /// Header text.
    #[serde(default)]
    pub name: String,
    /// Declared width.
    #[serde(default)]
    pub width: ColumnWidth,
    /// Edge the column is pinned to.
    #[serde(default)]
    pub locked: ColumnLock,
    /// Whether the user may resize the column.
    #[serde(default = "default_true")]
    pub resizable: bool,
    /// Whether clicking the header sorts by this column.
    #[serde(default)]
    pub sortable: bool,
    /// Whether the filter row shows a filter for this column.
    #[serde(default)]
    pub filterable: bool,
    /// Opaque pass-through for the rendering layer.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

impl Column {
    /// Creates a resizable, flexible-width column.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            width: ColumnWidth::Auto,
            locked: ColumnLock::None,
            resizable: true,
            sortable: false,
            filterable: false,
            metadata: Value::Null,
        }
    }

    /// The checkbox column prepended when row selection is enabled.
    pub fn select_column() -> Self {
        Self {
            key: SELECT_COLUMN_KEY.to_string(),
            name: String::new(),
            width: ColumnWidth::Fixed(SELECT_COLUMN_WIDTH),
            locked: ColumnLock::Start,
            resizable: false,
            sortable: false,
            filterable: false,
            metadata: serde_json::json!({ "formatter": "checkbox" }),
        }
    }

    /// Sets a fixed pixel width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Sets a width as a percentage of the grid's total width.
    pub fn with_percent_width(mut self, percent: f32) -> Self {
        self.width = ColumnWidth::Percent(percent);
        self
    }

    /// Pins the column to the leading edge.
    pub fn locked(mut self) -> Self {
        self.locked = ColumnLock::Start;
        self
    }

    /// Pins the column to the trailing edge.
    pub fn locked_end(mut self) -> Self {
        self.locked = ColumnLock::End;
        self
    }

    /// Sets whether the column can be resized.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Makes the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Makes the column filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Attaches pass-through metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns `true` if the column is pinned to either edge.
    pub fn is_locked(&self) -> bool {
        self.locked != ColumnLock::None
    }
}

/// Comparator deciding whether two column definitions are interchangeable.
pub type ColumnEquality = Arc<dyn Fn(&Column, &Column) -> bool + Send + Sync>;

/// Default comparator: structural equality of every attribute.
pub fn same_column(a: &Column, b: &Column) -> bool {
    a == b
}

/// Returns the default [`ColumnEquality`].
pub fn default_column_equality() -> ColumnEquality {
    Arc::new(same_column)
}

/// Compares two column sets pairwise with `equality`.
pub fn same_columns(prev: &[Column], next: &[Column], equality: &ColumnEquality) -> bool {
    prev.len() == next.len() && prev.iter().zip(next).all(|(a, b)| equality(a, b))
}

/// Fails if two columns share a key or a key is empty.
pub fn validate_column_keys(columns: &[Column]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if column.key.is_empty() {
            return Err(GridError::config("column key must not be empty"));
        }
        if !seen.insert(column.key.as_str()) {
            return Err(GridError::config(format!(
                "duplicate column key '{}'",
                column.key
            )));
        }
    }
    Ok(())
}
