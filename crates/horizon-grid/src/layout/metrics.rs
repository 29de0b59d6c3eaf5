//! Column metrics engine.
//!
//! Turns declared column widths into pixel positions for a given total width.
//! A computed [`ColumnMetrics`] is an immutable snapshot shared as
//! `Arc<ColumnMetrics>`; every change (new columns, new width, a resize)
//! produces a new snapshot.
//!
//! # Width distribution
//!
//! - `Fixed(w)` keeps `w`.
//! - `Percent(p)` resolves to `floor(p / 100 * total_width)`.
//! - Locked `Auto` columns take `min_column_width`.
//! - Unlocked `Auto` columns share what is left equally, never going below
//!   `min_column_width`. Whole pixels lost to integer division go one each
//!   to the first flexible columns.
//!
//! Columns are laid out start-locked first, then unlocked, then end-locked,
//! each group in declared order.

use std::sync::Arc;

use horizon_grid_core::PerfSpan;
use horizon_grid_core::logging::{span_names, targets};

use crate::error::{GridError, Result};
use crate::model::{Column, ColumnLock, ColumnWidth, SELECT_COLUMN_KEY, validate_column_keys};

/// A column with its computed position and width.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedColumn {
    /// The declared column.
    pub column: Column,
    /// Offset of the column's leading edge.
    pub left: f32,
    /// Computed width.
    pub width: f32,
}

/// Computed widths and positions for a column set.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetrics {
    /// Columns in layout order.
    pub columns: Vec<ComputedColumn>,
    /// The total width the metrics were computed for.
    pub total_width: f32,
    /// The minimum column width in effect.
    pub min_column_width: f32,
    /// Sum of all computed column widths.
    pub width: f32,
}

impl ColumnMetrics {
    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The column at layout position `index`.
    pub fn column(&self, index: usize) -> Option<&ComputedColumn> {
        self.columns.get(index)
    }

    /// Layout position of the column with `key`.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column.key == key)
    }

    /// Layout position of the column containing horizontal offset `x`.
    pub fn column_at(&self, x: f32) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| x >= c.left && x < c.left + c.width)
    }

    /// The declared columns in layout order.
    pub fn declared_columns(&self) -> Vec<Column> {
        self.columns.iter().map(|c| c.column.clone()).collect()
    }
}

/// Computes metrics for `columns` at `total_width`.
///
/// Fails if column keys are empty or duplicated.
pub fn compute_metrics(
    columns: &[Column],
    total_width: f32,
    min_column_width: f32,
) -> Result<ColumnMetrics> {
    let _span = PerfSpan::new(span_names::METRICS);
    validate_column_keys(columns)?;

    let ordered: Vec<&Column> = [ColumnLock::Start, ColumnLock::None, ColumnLock::End]
        .into_iter()
        .flat_map(|lock| columns.iter().filter(move |c| c.locked == lock))
        .collect();

    let mut widths: Vec<Option<f32>> = ordered
        .iter()
        .map(|column| match column.width {
            ColumnWidth::Fixed(w) => Some(w),
            ColumnWidth::Percent(p) => Some((p / 100.0 * total_width).floor()),
            ColumnWidth::Auto if column.is_locked() => Some(min_column_width),
            ColumnWidth::Auto => None,
        })
        .collect();

    let flexible = widths.iter().filter(|w| w.is_none()).count();
    if flexible > 0 {
        let allocated: f32 = widths.iter().flatten().sum();
        let unallocated = (total_width - allocated).max(0.0).floor();
        let share = (unallocated / flexible as f32).floor();
        let (share, mut leftover) = if share >= min_column_width {
            (share, (unallocated - share * flexible as f32) as usize)
        } else {
            (min_column_width, 0)
        };
        for width in widths.iter_mut().filter(|w| w.is_none()) {
            let extra = if leftover > 0 {
                leftover -= 1;
                1.0
            } else {
                0.0
            };
            *width = Some(share + extra);
        }
    }

    let mut left = 0.0;
    let computed: Vec<ComputedColumn> = ordered
        .into_iter()
        .zip(widths)
        .map(|(column, width)| {
            let width = width.unwrap_or(min_column_width);
            let entry = ComputedColumn {
                column: column.clone(),
                left,
                width,
            };
            left += width;
            entry
        })
        .collect();

    tracing::debug!(
        target: targets::METRICS,
        columns = computed.len(),
        flexible,
        total_width,
        width = left,
        "column metrics computed"
    );

    Ok(ColumnMetrics {
        columns: computed,
        total_width,
        min_column_width,
        width: left,
    })
}

/// Returns new metrics with the column at layout position `index` resized.
///
/// The width is clamped to `min_column_width` and the column becomes
/// `Fixed`. The input snapshot is not modified.
pub fn resize_column(metrics: &ColumnMetrics, index: usize, new_width: f32) -> Result<ColumnMetrics> {
    if index >= metrics.len() {
        tracing::warn!(target: targets::METRICS, index, len = metrics.len(), "resize of unknown column");
        return Err(GridError::ColumnOutOfRange {
            index,
            len: metrics.len(),
        });
    }
    let width = new_width.max(metrics.min_column_width);
    let mut columns = metrics.declared_columns();
    columns[index].width = ColumnWidth::Fixed(width);
    tracing::debug!(target: targets::METRICS, index, requested = new_width, width, "column resized");
    compute_metrics(&columns, metrics.total_width, metrics.min_column_width)
}

#[derive(Debug, Clone)]
struct MetricsKey {
    columns: Arc<[Column]>,
    total_width: f32,
    min_column_width: f32,
}

impl MetricsKey {
    fn matches(&self, columns: &Arc<[Column]>, total_width: f32, min_column_width: f32) -> bool {
        Arc::ptr_eq(&self.columns, columns)
            && self.total_width == total_width
            && self.min_column_width == min_column_width
    }
}

/// Memo cell for column metrics.
///
/// Keyed on the identity of the column set together with the total width and
/// the minimum column width. A hit returns the same `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ColumnMetricsCache {
    entry: Option<(MetricsKey, Arc<ColumnMetrics>)>,
}

impl ColumnMetricsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns cached metrics for the key, computing them on a miss.
    pub fn get_or_compute(
        &mut self,
        columns: &Arc<[Column]>,
        total_width: f32,
        min_column_width: f32,
    ) -> Result<Arc<ColumnMetrics>> {
        if let Some((key, metrics)) = &self.entry
            && key.matches(columns, total_width, min_column_width)
        {
            tracing::trace!(target: targets::METRICS, "metrics cache hit");
            return Ok(metrics.clone());
        }
        let metrics = Arc::new(compute_metrics(columns, total_width, min_column_width)?);
        self.entry = Some((
            MetricsKey {
                columns: columns.clone(),
                total_width,
                min_column_width,
            },
            metrics.clone(),
        ));
        Ok(metrics)
    }

    /// Replaces the cached metrics under the current key, e.g. after a
    /// resize. Does nothing if the cache is empty.
    pub fn update(&mut self, metrics: Arc<ColumnMetrics>) {
        if let Some((_, cached)) = &mut self.entry {
            *cached = metrics;
        }
    }

    /// Currently cached metrics, if any.
    pub fn current(&self) -> Option<&Arc<ColumnMetrics>> {
        self.entry.as_ref().map(|(_, metrics)| metrics)
    }

    /// Drops the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// Prepends the checkbox column to a column set, memoized on the set's
/// identity.
#[derive(Debug, Clone, Default)]
pub struct SelectColumnInjector {
    memo: Option<(Arc<[Column]>, Arc<[Column]>)>,
}

impl SelectColumnInjector {
    /// Creates an injector with an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `columns`, with the checkbox column prepended when `show` is
    /// set and the set does not already contain one.
    pub fn columns_for(&mut self, columns: &Arc<[Column]>, show: bool) -> Arc<[Column]> {
        if !show || columns.iter().any(|c| c.key == SELECT_COLUMN_KEY) {
            return columns.clone();
        }
        if let Some((source, injected)) = &self.memo
            && Arc::ptr_eq(source, columns)
        {
            return injected.clone();
        }
        let injected: Arc<[Column]> = std::iter::once(Column::select_column())
            .chain(columns.iter().cloned())
            .collect();
        self.memo = Some((columns.clone(), injected.clone()));
        injected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(metrics: &ColumnMetrics) -> Vec<f32> {
        metrics.columns.iter().map(|c| c.width).collect()
    }

    fn keys(metrics: &ColumnMetrics) -> Vec<&str> {
        metrics.columns.iter().map(|c| c.column.key.as_str()).collect()
    }

    #[test]
    fn test_flexible_columns_share_width() {
        let columns = vec![
            Column::new("a", "A").with_width(100.0),
            Column::new("b", "B"),
            Column::new("c", "C"),
        ];
        let metrics = compute_metrics(&columns, 500.0, 80.0).unwrap();
        assert_eq!(widths(&metrics), vec![100.0, 200.0, 200.0]);
        assert_eq!(metrics.width, 500.0);
        let lefts: Vec<f32> = metrics.columns.iter().map(|c| c.left).collect();
        assert_eq!(lefts, vec![0.0, 100.0, 300.0]);
    }

    #[test]
    fn test_leftover_pixels_distributed() {
        let columns = vec![Column::new("a", "A"), Column::new("b", "B"), Column::new("c", "C")];
        let metrics = compute_metrics(&columns, 302.0, 50.0).unwrap();
        assert_eq!(widths(&metrics), vec![101.0, 101.0, 100.0]);
        assert_eq!(metrics.width, 302.0);
    }

    #[test]
    fn test_flexible_floored_at_minimum() {
        let columns = vec![
            Column::new("a", "A").with_width(400.0),
            Column::new("b", "B"),
            Column::new("c", "C"),
        ];
        let metrics = compute_metrics(&columns, 500.0, 80.0).unwrap();
        assert_eq!(widths(&metrics), vec![400.0, 80.0, 80.0]);
        assert_eq!(metrics.width, 560.0);
    }

    #[test]
    fn test_percent_width() {
        let columns = vec![
            Column::new("a", "A").with_percent_width(25.0),
            Column::new("b", "B"),
        ];
        let metrics = compute_metrics(&columns, 333.0, 50.0).unwrap();
        assert_eq!(widths(&metrics), vec![83.0, 250.0]);
    }

    #[test]
    fn test_locked_ordering_and_width() {
        let columns = vec![
            Column::new("tail", "T").locked_end(),
            Column::new("a", "A"),
            Column::new("id", "ID").locked(),
            Column::new("b", "B"),
        ];
        let metrics = compute_metrics(&columns, 400.0, 60.0).unwrap();
        assert_eq!(keys(&metrics), vec!["id", "a", "b", "tail"]);
        assert_eq!(widths(&metrics), vec![60.0, 140.0, 140.0, 60.0]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let columns = vec![Column::new("a", "A"), Column::new("a", "B")];
        assert!(compute_metrics(&columns, 300.0, 80.0).unwrap_err().is_config());
    }

    #[test]
    fn test_resize_clamps_and_recomputes() {
        let columns = vec![Column::new("a", "A"), Column::new("b", "B")];
        let metrics = compute_metrics(&columns, 400.0, 80.0).unwrap();

        let resized = resize_column(&metrics, 0, 10.0).unwrap();
        assert_eq!(resized.columns[0].width, 80.0);
        assert_eq!(resized.columns[0].column.width, ColumnWidth::Fixed(80.0));
        assert_eq!(resized.columns[1].width, 320.0);
        assert_eq!(metrics.columns[0].width, 200.0);

        let resized = resize_column(&metrics, 1, 250.0).unwrap();
        assert_eq!(widths(&resized), vec![150.0, 250.0]);
    }

    #[test]
    fn test_resize_out_of_range() {
        let metrics = compute_metrics(&[Column::new("a", "A")], 100.0, 50.0).unwrap();
        assert_eq!(
            resize_column(&metrics, 3, 100.0).unwrap_err(),
            GridError::ColumnOutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn test_cache_returns_same_arc() {
        let columns: Arc<[Column]> = vec![Column::new("a", "A")].into();
        let mut cache = ColumnMetricsCache::new();
        let first = cache.get_or_compute(&columns, 300.0, 80.0).unwrap();
        let second = cache.get_or_compute(&columns, 300.0, 80.0).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let third = cache.get_or_compute(&columns, 400.0, 80.0).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));

        let copy: Arc<[Column]> = columns.iter().cloned().collect();
        let fourth = cache.get_or_compute(&copy, 400.0, 80.0).unwrap();
        assert!(!Arc::ptr_eq(&third, &fourth));
        assert_eq!(*third, *fourth);
    }

    #[test]
    fn test_cache_update_and_invalidate() {
        let columns: Arc<[Column]> = vec![Column::new("a", "A"), Column::new("b", "B")].into();
        let mut cache = ColumnMetricsCache::new();
        let metrics = cache.get_or_compute(&columns, 300.0, 80.0).unwrap();
        let resized = Arc::new(resize_column(&metrics, 0, 100.0).unwrap());
        cache.update(resized.clone());
        let again = cache.get_or_compute(&columns, 300.0, 80.0).unwrap();
        assert!(Arc::ptr_eq(&again, &resized));

        cache.invalidate();
        assert!(cache.current().is_none());
    }

    #[test]
    fn test_select_column_injection() {
        let columns: Arc<[Column]> = vec![Column::new("a", "A")].into();
        let mut injector = SelectColumnInjector::new();

        let plain = injector.columns_for(&columns, false);
        assert!(Arc::ptr_eq(&plain, &columns));

        let injected = injector.columns_for(&columns, true);
        assert_eq!(injected.len(), 2);
        assert_eq!(injected[0].key, SELECT_COLUMN_KEY);
        assert!(!injected[0].filterable);
        assert!(Arc::ptr_eq(&injected, &injector.columns_for(&columns, true)));

        let again = injector.columns_for(&injected, true);
        assert!(Arc::ptr_eq(&again, &injected));
    }

    #[test]
    fn test_hit_testing() {
        let columns = vec![Column::new("a", "A").with_width(100.0), Column::new("b", "B").with_width(50.0)];
        let metrics = compute_metrics(&columns, 150.0, 20.0).unwrap();
        assert_eq!(metrics.column_at(99.0), Some(0));
        assert_eq!(metrics.column_at(100.0), Some(1));
        assert_eq!(metrics.column_at(150.0), None);
        assert_eq!(metrics.position_of("b"), Some(1));
    }
}
