//! Horizon Grid - the interaction and layout-state core of a data grid.
//!
//! This crate decides column widths, tracks row selection (including
//! shift-range and select-all), normalizes edits into row range updates and
//! routes transient interactions to a rendering layer. It does not paint.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> horizon_grid::Result<()> {
//!     let rows: Vec<Row> = vec![json!({ "id": "a", "qty": 1 }), json!({ "id": "b", "qty": 2 })];
//!     let columns = vec![Column::new("id", "ID").with_width(60.0), Column::new("qty", "Qty")];
//!     let mut grid = DataGrid::new(GridConfig::new(), columns, Arc::new(rows))?;
//!
//!     grid.set_viewport_width(400.0)?;
//!     assert_eq!(grid.column_metrics().columns[1].width, 340.0);
//!
//!     grid.signals().grid_rows_updated.connect(|update| {
//!         println!("{:?} rows {:?}", update.action, update.row_ids);
//!     });
//!     grid.on_commit(CellCommit { row_index: 1, cell_key: "qty".into(), updated: json!({ "qty": 5 }) })?;
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! Events are emitted through `tracing` under the targets listed in
//! [`horizon_grid_core::logging::targets`].

pub use horizon_grid_core::{ConnectionGuard, ConnectionId, PerfSpan, Property, Signal, logging};

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod prelude;
pub mod widget;

pub use error::{GridError, Result};
