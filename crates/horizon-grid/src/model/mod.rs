//! Data model for Horizon Grid.
//!
//! These types describe what the grid shows and what is selected, without
//! any layout or event handling:
//!
//! - `Column`: a declared column with width rule, lock and pass-through metadata
//! - `RowSource`: on-demand access to row data
//! - `SelectBy` / `Membership`: host-owned selection descriptors
//! - `RowSelection`: the legacy/descriptor selection state machine
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  RowSource  │────>│ RowSelection │────>│  DataGrid   │
//! │   (rows)    │     │  (outcomes)  │     │  (signals)  │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                            │
//!                     ┌──────────────┐
//!                     │  Membership  │
//!                     │  (SelectBy)  │
//!                     └──────────────┘
//! ```

mod column;
mod descriptor;
mod row;
mod selection;

pub use column::{
    Column, ColumnEquality, ColumnLock, ColumnWidth, SELECT_COLUMN_KEY, SELECT_COLUMN_WIDTH,
    default_column_equality, same_column, same_columns, validate_column_keys,
};
pub use descriptor::{KeySelection, Membership, SelectBy};
pub use row::{FnRowSource, Row, RowRef, RowSource, field_value, key_text};
pub use selection::{RowSelection, RowSnapshot, SelectionOutcome};
