//! Header row layout.

use crate::config::GridConfig;

/// Kind of a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRowType {
    /// Column titles.
    Header,
    /// Per-column filter inputs.
    Filter,
}

/// One row of the grid header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderRow {
    /// What the row shows.
    pub row_type: HeaderRowType,
    /// Row height.
    pub height: f32,
    /// Whether the row hosts filter inputs.
    pub filterable: bool,
}

/// Header rows for `config`. The filter row is present only while
/// filtering is toggled on.
pub fn header_rows(config: &GridConfig, can_filter: bool) -> Vec<HeaderRow> {
    let mut rows = vec![HeaderRow {
        row_type: HeaderRowType::Header,
        height: config.header_row_height(),
        filterable: false,
    }];
    if can_filter {
        rows.push(HeaderRow {
            row_type: HeaderRowType::Filter,
            height: config.header_filters_height,
            filterable: true,
        });
    }
    rows
}

/// Vertical offset of the first data row: the summed header heights.
pub fn row_offset_height(rows: &[HeaderRow]) -> f32 {
    rows.iter().map(|row| row.height).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only() {
        let rows = header_rows(&GridConfig::default(), false);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_type, HeaderRowType::Header);
        assert_eq!(row_offset_height(&rows), 35.0);
    }

    #[test]
    fn test_filter_row() {
        let config = GridConfig::default().with_header_row_height(50.0);
        let rows = header_rows(&config, true);
        assert_eq!(rows[1].row_type, HeaderRowType::Filter);
        assert!(rows[1].filterable);
        assert_eq!(row_offset_height(&rows), 95.0);
    }
}
