//! Layout state: column metrics and header rows.
//!
//! Nothing here paints. The layout types describe sizes and positions that a
//! rendering layer reads from the grid.

mod header;
mod metrics;

pub use header::{HeaderRow, HeaderRowType, header_rows, row_offset_height};
pub use metrics::{
    ColumnMetrics, ColumnMetricsCache, ComputedColumn, SelectColumnInjector, compute_metrics,
    resize_column,
};
