//! The data grid controller.
//!
//! [`DataGrid`] is the per-instance object that owns column metrics, row
//! selection, key tracking, sort and filter state. Host events come in
//! through its `on_*` methods; results go out through the public signals
//! of [`GridSignals`] (durable state and host callbacks) or through the
//! [`EventBus`] (transient interactions for the rendering layer).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_grid::prelude::*;
//! use serde_json::json;
//!
//! let rows: Vec<Row> = (0..5).map(|i| json!({ "id": i, "name": format!("row {i}") })).collect();
//! let config = GridConfig::new().with_row_select(RowSelectMode::Multi);
//! let mut grid = DataGrid::new(config, vec![Column::new("name", "Name")], Arc::new(rows)).unwrap();
//!
//! grid.signals().row_select.connect(|selected| {
//!     println!("{} rows selected", selected.len());
//! });
//! grid.on_row_select(2).unwrap();
//! assert!(grid.is_row_selected(2));
//! ```

use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{Property, Signal};
use serde_json::Value;

use super::bus::EventBus;
use super::commit::{RangeUpdate, RowsUpdate, UpdateAction, build_range_update};
use super::events::{
    CellCommit, CellCopyPaste, CellPosition, CellsDragged, ColumnResize, DragHandleDoubleClick,
    GridSignal, RowClick, SortState,
};
use super::keyboard::{KeyCode, KeyDownSet};
use crate::config::{GridConfig, SortDirection};
use crate::error::{GridError, Result};
use crate::layout::{
    ColumnMetrics, ColumnMetricsCache, HeaderRow, SelectColumnInjector, header_rows,
    resize_column, row_offset_height,
};
use crate::model::{
    Column, ColumnEquality, Row, RowRef, RowSelection, RowSource, SelectBy, SelectionOutcome,
    default_column_equality, field_value, same_columns, validate_column_keys,
};

/// Host-facing signals of a grid.
///
/// A signal with no connections is a no-op; the commit pipeline goes further
/// and skips building updates entirely when `grid_rows_updated` has no
/// connections.
#[derive(Debug, Default)]
pub struct GridSignals {
    /// Descriptor mode: rows that became selected.
    pub rows_selected: Signal<Vec<RowRef>>,
    /// Descriptor mode: rows that became deselected.
    pub rows_deselected: Signal<Vec<RowRef>>,
    /// Legacy mode: the full selected list after a change.
    pub row_select: Signal<Vec<Row>>,
    /// A resolved row range update.
    pub grid_rows_updated: Signal<RangeUpdate>,
    /// A user column resize, with the requested width.
    pub column_resized: Signal<ColumnResize>,
    /// The raw drag-handle double click, before the column fill.
    pub drag_handle_double_clicked: Signal<DragHandleDoubleClick>,
    /// A cell click.
    pub row_click: Signal<RowClick>,
    /// A cell double click.
    pub row_double_click: Signal<RowClick>,
    /// The sort changed.
    pub grid_sort: Signal<SortState>,
    /// Filtering was toggled off; the host should clear its filters.
    pub filters_cleared: Signal<()>,
    /// A key was pressed inside the grid.
    pub grid_key_down: Signal<KeyCode>,
    /// A key was released inside the grid.
    pub grid_key_up: Signal<KeyCode>,
    /// New column metrics are in effect.
    pub metrics_changed: Signal<Arc<ColumnMetrics>>,
    /// An open context menu should close.
    pub context_menu_hidden: Signal<()>,
}

/// A data grid instance.
pub struct DataGrid {
    config: GridConfig,
    rows: Arc<dyn RowSource>,
    declared_columns: Arc<[Column]>,
    grid_columns: Arc<[Column]>,
    column_equality: ColumnEquality,
    injector: SelectColumnInjector,
    metrics_cache: ColumnMetricsCache,
    metrics: Property<Arc<ColumnMetrics>>,
    viewport_width: Option<f32>,
    selection: RowSelection,
    keys: KeyDownSet,
    bus: EventBus,
    signals: Arc<GridSignals>,
    document_click: Signal<()>,
    sort: Property<Option<SortState>>,
    can_filter: Property<bool>,
    context_menu: bool,
}

impl DataGrid {
    /// Creates a grid.
    ///
    /// Fails if the configuration is invalid or column keys are empty or
    /// duplicated.
    pub fn new(
        config: GridConfig,
        columns: impl Into<Arc<[Column]>>,
        rows: Arc<dyn RowSource>,
    ) -> Result<Self> {
        config.validate()?;
        let declared_columns = columns.into();
        validate_column_keys(&declared_columns)?;
        let selection = RowSelection::from_config(&config)?;

        let mut injector = SelectColumnInjector::new();
        let grid_columns = injector.columns_for(&declared_columns, selection.shows_checkbox());
        let total_width = initial_total_width(&config, None, grid_columns.len());
        let mut metrics_cache = ColumnMetricsCache::new();
        let metrics = metrics_cache.get_or_compute(&grid_columns, total_width, config.min_column_width)?;

        let sort = match (&config.sort_column, config.sort_direction) {
            (Some(column_key), Some(direction)) => Some(SortState {
                column_key: column_key.clone(),
                direction,
            }),
            _ => None,
        };

        tracing::debug!(
            target: targets::GRID,
            columns = grid_columns.len(),
            rows = rows.row_count(),
            descriptor = selection.is_descriptor(),
            "grid created"
        );

        Ok(Self {
            config,
            rows,
            declared_columns,
            grid_columns,
            column_equality: default_column_equality(),
            injector,
            metrics_cache,
            metrics: Property::new(metrics),
            viewport_width: None,
            selection,
            keys: KeyDownSet::new(),
            bus: EventBus::new(),
            signals: Arc::new(GridSignals::default()),
            document_click: Signal::new(),
            sort: Property::new(sort),
            can_filter: Property::new(false),
            context_menu: false,
        })
    }

    /// Sets the comparator deciding whether a new column set is a change.
    pub fn with_column_equality(mut self, equality: ColumnEquality) -> Self {
        self.column_equality = equality;
        self
    }

    /// Enables context-menu handling on cell right-clicks.
    pub fn with_context_menu(mut self, enabled: bool) -> Self {
        self.context_menu = enabled;
        self
    }

    /// The configuration the grid was created with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Host-facing signals.
    pub fn signals(&self) -> &GridSignals {
        &self.signals
    }

    /// The imperative signal bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The keys currently held.
    pub fn keys(&self) -> &KeyDownSet {
        &self.keys
    }

    /// The selection state machine.
    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    /// Number of rows.
    pub fn rows_count(&self) -> usize {
        self.rows.row_count()
    }

    /// Replaces the row source.
    pub fn set_rows(&mut self, rows: Arc<dyn RowSource>) {
        tracing::debug!(target: targets::GRID, rows = rows.row_count(), "rows replaced");
        self.rows = rows;
    }

    // =========================================================================
    // Columns and metrics
    // =========================================================================

    /// Columns in effect, including the checkbox column when shown.
    pub fn columns(&self) -> &Arc<[Column]> {
        &self.grid_columns
    }

    /// The column at layout position `index`.
    pub fn column(&self, index: usize) -> Option<Column> {
        self.metrics.with(|m| m.column(index).map(|c| c.column.clone()))
    }

    /// Current column metrics.
    pub fn column_metrics(&self) -> Arc<ColumnMetrics> {
        self.metrics.get()
    }

    /// Width the metrics are computed for: `min_width` when configured, else
    /// the viewport width once known, else one minimum width per column.
    pub fn total_width(&self) -> f32 {
        initial_total_width(&self.config, self.viewport_width, self.grid_columns.len())
    }

    /// Replaces the declared columns.
    ///
    /// Returns `false` without recomputing when the new set equals the old
    /// one under the column comparator.
    pub fn set_columns(&mut self, columns: impl Into<Arc<[Column]>>) -> Result<bool> {
        let columns = columns.into();
        if same_columns(&self.declared_columns, &columns, &self.column_equality) {
            tracing::trace!(target: targets::GRID, "column set unchanged");
            return Ok(false);
        }
        validate_column_keys(&columns)?;
        self.declared_columns = columns;
        self.grid_columns = self
            .injector
            .columns_for(&self.declared_columns, self.selection.shows_checkbox());
        self.refresh_metrics()
    }

    /// Reports the width of the grid's container.
    ///
    /// Negative widths count as zero; non-finite widths are rejected.
    pub fn set_viewport_width(&mut self, width: f32) -> Result<bool> {
        if !width.is_finite() {
            return Err(GridError::config(format!("viewport width must be finite, got {width}")));
        }
        let width = width.max(0.0);
        if self.viewport_width == Some(width) {
            return Ok(false);
        }
        self.viewport_width = Some(width);
        self.refresh_metrics()
    }

    /// Sets or clears the fixed total width.
    ///
    /// An invalid width is rejected and leaves the grid untouched.
    pub fn set_min_width(&mut self, min_width: Option<f32>) -> Result<bool> {
        if self.config.min_width == min_width {
            return Ok(false);
        }
        let mut config = self.config.clone();
        config.min_width = min_width;
        config.validate()?;
        let metrics = self.metrics_cache.get_or_compute(
            &self.grid_columns,
            initial_total_width(&config, self.viewport_width, self.grid_columns.len()),
            config.min_column_width,
        )?;
        self.config = config;
        Ok(self.install_metrics(metrics))
    }

    /// Handles a user column resize.
    ///
    /// The width is clamped to the minimum column width. `column_resized`
    /// receives the requested width.
    #[tracing::instrument(skip(self), target = "horizon_grid::grid", level = "debug")]
    pub fn on_column_resize(&mut self, column_index: usize, width: f32) -> Result<Arc<ColumnMetrics>> {
        let resized = Arc::new(resize_column(&self.metrics.get(), column_index, width)?);
        self.metrics_cache.update(resized.clone());
        self.install_metrics(resized.clone());
        self.signals.column_resized.emit(ColumnResize { column_index, width });
        Ok(resized)
    }

    fn refresh_metrics(&mut self) -> Result<bool> {
        let metrics = self.metrics_cache.get_or_compute(
            &self.grid_columns,
            self.total_width(),
            self.config.min_column_width,
        )?;
        Ok(self.install_metrics(metrics))
    }

    /// Stores `metrics` and notifies if they differ from the current ones.
    fn install_metrics(&self, metrics: Arc<ColumnMetrics>) -> bool {
        let changed = self.metrics.with(|current| **current != *metrics);
        self.metrics.set_silent(metrics.clone());
        if changed {
            tracing::debug!(target: targets::GRID, width = metrics.width, "metrics changed");
            self.signals.metrics_changed.emit(metrics);
        }
        changed
    }

    // =========================================================================
    // Header
    // =========================================================================

    /// Header rows, including the filter row while filtering is on.
    pub fn header_rows(&self) -> Vec<HeaderRow> {
        header_rows(&self.config, self.can_filter.get())
    }

    /// Vertical offset of the first data row.
    pub fn row_offset_height(&self) -> f32 {
        row_offset_height(&self.header_rows())
    }

    /// Whether the filter row is shown.
    pub fn can_filter(&self) -> bool {
        self.can_filter.get()
    }

    /// Toggles the filter row. Turning it off raises `filters_cleared`.
    pub fn on_toggle_filter(&mut self) {
        let enabled = !self.can_filter.get();
        self.can_filter.set(enabled);
        tracing::debug!(target: targets::GRID, enabled, "filter row toggled");
        if !enabled {
            self.signals.filters_cleared.emit(());
        }
    }

    /// The active sort, if any.
    pub fn sort(&self) -> Option<SortState> {
        self.sort.get()
    }

    /// Records a sort change and raises `grid_sort`.
    pub fn handle_sort(&mut self, column_key: impl Into<String>, direction: SortDirection) {
        let state = SortState {
            column_key: column_key.into(),
            direction,
        };
        self.sort.set(Some(state.clone()));
        tracing::debug!(target: targets::GRID, column = %state.column_key, ?direction, "sort changed");
        self.signals.grid_sort.emit(state);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Handles a click on a row's selection checkbox.
    pub fn on_row_select(&mut self, row_index: usize) -> Result<()> {
        let outcome = self
            .selection
            .toggle_row(row_index, self.rows.as_ref(), &self.keys)?;
        self.publish_selection(outcome);
        Ok(())
    }

    /// Handles the select-all checkbox.
    pub fn on_select_all(&mut self, checked: bool) -> Result<()> {
        let outcome = self.selection.select_all(checked, self.rows.as_ref())?;
        self.publish_selection(outcome);
        Ok(())
    }

    /// Legacy selected rows; `None` in descriptor mode.
    pub fn selected_rows(&self) -> Option<Vec<Row>> {
        self.selection.selected_rows()
    }

    /// Returns whether the row at `row_index` is selected. Out-of-range rows
    /// are not.
    pub fn is_row_selected(&self, row_index: usize) -> bool {
        self.rows
            .row(row_index)
            .is_some_and(|row| self.selection.is_row_selected(row_index, &row))
    }

    /// Replaces the host's selection descriptor.
    pub fn set_select_by(&mut self, select_by: &SelectBy) -> Result<()> {
        self.selection.set_select_by(select_by)
    }

    fn publish_selection(&self, outcome: SelectionOutcome) {
        match outcome {
            SelectionOutcome::Unchanged => {}
            SelectionOutcome::Selected(rows) => {
                self.signals.rows_selected.emit(rows);
            }
            SelectionOutcome::Deselected(rows) => {
                self.signals.rows_deselected.emit(rows);
            }
            SelectionOutcome::LegacyChanged(rows) => {
                self.signals.row_select.emit(rows);
            }
        }
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Tracks a key press and forwards it to `grid_key_down`.
    pub fn on_key_down(&mut self, code: KeyCode) {
        self.keys.key_down(code);
        self.signals.grid_key_down.emit(code);
    }

    /// Tracks a key release and forwards it to `grid_key_up`.
    pub fn on_key_up(&mut self, code: KeyCode) {
        self.keys.key_up(code);
        self.signals.grid_key_up.emit(code);
    }

    /// Forgets held keys; key-up events are not delivered after focus loss.
    pub fn on_focus_lost(&mut self) {
        self.keys.clear();
    }

    // =========================================================================
    // Commits
    // =========================================================================

    /// Resolves and delivers a row range update.
    ///
    /// Returns `Ok(None)` without touching the rows when nothing is connected
    /// to `grid_rows_updated`.
    pub fn commit(&self, request: RowsUpdate) -> Result<Option<RangeUpdate>> {
        if !self.signals.grid_rows_updated.has_connections() {
            tracing::trace!(target: targets::COMMIT, "no rows-updated handler, commit skipped");
            return Ok(None);
        }
        let update = build_range_update(&request, self.rows.as_ref(), &self.config.row_key)?;
        self.signals.grid_rows_updated.emit(update.clone());
        Ok(Some(update))
    }

    /// Commits a single-cell edit.
    pub fn on_commit(&self, commit: CellCommit) -> Result<Option<RangeUpdate>> {
        self.commit(RowsUpdate::new(
            commit.cell_key,
            commit.row_index,
            commit.row_index,
            commit.updated,
            UpdateAction::CellUpdate,
        ))
    }

    /// Forwards the double click, then fills the cell's value down to the
    /// last row.
    pub fn on_drag_handle_double_click(&self, event: DragHandleDoubleClick) -> Result<Option<RangeUpdate>> {
        self.signals.drag_handle_double_clicked.emit(event.clone());
        if !self.signals.grid_rows_updated.has_connections() {
            return Ok(None);
        }
        let column = self.column(event.column_index).ok_or(GridError::ColumnOutOfRange {
            index: event.column_index,
            len: self.grid_columns.len(),
        })?;
        let last_row = self.rows.row_count().saturating_sub(1);
        let value = field_value(&event.row, &column.key);
        let updated = cell_values(&column.key, value);
        self.commit(RowsUpdate::new(
            column.key,
            event.row_index,
            last_row,
            updated,
            UpdateAction::ColumnFill,
        ))
    }

    /// Commits a drag-fill over a row range.
    pub fn on_cells_dragged(&self, event: CellsDragged) -> Result<Option<RangeUpdate>> {
        let updated = cell_values(&event.cell_key, event.value);
        self.commit(RowsUpdate::new(
            event.cell_key,
            event.from_row,
            event.to_row,
            updated,
            UpdateAction::CellDrag,
        ))
    }

    /// Commits a paste of a copied cell.
    pub fn on_cell_copy_paste(&self, event: CellCopyPaste) -> Result<Option<RangeUpdate>> {
        let updated = cell_values(&event.cell_key, event.value);
        self.commit(
            RowsUpdate::new(
                event.cell_key,
                event.target_row,
                event.target_row,
                updated,
                UpdateAction::CopyPaste,
            )
            .with_origin_row(event.origin_row),
        )
    }

    // =========================================================================
    // Cell interaction (bus)
    // =========================================================================

    /// Selects a cell, optionally opening its editor.
    pub fn select_cell(&self, cell: CellPosition, open_editor: bool) {
        self.bus.dispatch(GridSignal::CellSelected {
            row_index: cell.row_index,
            column_index: cell.column_index,
            open_editor,
        });
    }

    /// Selects a cell and opens its editor.
    pub fn open_cell_editor(&self, row_index: usize, column_index: usize) {
        self.select_cell(CellPosition::new(row_index, column_index), true);
    }

    /// Scrolls the viewport to a column.
    pub fn scroll_to_column(&self, column_index: usize) {
        self.bus.dispatch(GridSignal::ScrollToColumn(column_index));
    }

    /// Reports that a drag-fill gesture entered a row.
    pub fn handle_drag_enter(&self, over_row_index: usize) {
        self.bus.dispatch(GridSignal::DragEnter { over_row_index });
    }

    /// Selects the clicked cell and raises `row_click`.
    pub fn on_cell_click(&self, cell: CellPosition) -> Result<()> {
        self.select_cell(cell, false);
        if self.signals.row_click.has_connections() {
            let click = self.row_click(cell)?;
            self.signals.row_click.emit(click);
        }
        Ok(())
    }

    /// Raises `row_double_click` and opens the cell editor.
    pub fn on_cell_double_click(&self, cell: CellPosition) -> Result<()> {
        if self.signals.row_double_click.has_connections() {
            let click = self.row_click(cell)?;
            self.signals.row_double_click.emit(click);
        }
        self.open_cell_editor(cell.row_index, cell.column_index);
        Ok(())
    }

    /// Selects the cell under a right-click and, when a context menu is
    /// configured, arms a one-shot dismissal on the next outside click.
    pub fn on_cell_context_menu(&self, cell: CellPosition) {
        self.select_cell(cell, false);
        // At most one armed dismissal per open menu.
        if self.context_menu && !self.document_click.has_connections() {
            let signals = Arc::downgrade(&self.signals);
            self.document_click.connect_once(move |_| {
                if let Some(signals) = signals.upgrade() {
                    signals.context_menu_hidden.emit(());
                }
            });
        }
    }

    /// Handles a click outside the grid's menus. Raises
    /// `context_menu_hidden` at most once per context menu.
    pub fn on_document_click(&self) {
        let dismissed = self.document_click.emit(());
        tracing::trace!(target: targets::GRID, dismissed, "document click");
    }

    fn row_click(&self, cell: CellPosition) -> Result<RowClick> {
        let row = self.rows.row(cell.row_index).ok_or(GridError::RowOutOfRange {
            index: cell.row_index,
            len: self.rows.row_count(),
        })?;
        Ok(RowClick {
            row_index: cell.row_index,
            row,
            column: self.column(cell.column_index),
        })
    }
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("columns", &self.grid_columns.len())
            .field("rows", &self.rows.row_count())
            .field("selection", &self.selection)
            .field("can_filter", &self.can_filter.get())
            .finish_non_exhaustive()
    }
}

/// `{cell_key: value}`, the shape of a single-column update.
fn cell_values(cell_key: &str, value: Value) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(cell_key.to_string(), value);
    Value::Object(map)
}

fn initial_total_width(config: &GridConfig, viewport_width: Option<f32>, column_count: usize) -> f32 {
    config
        .min_width
        .or(viewport_width)
        .unwrap_or(column_count as f32 * config.min_column_width)
}

static_assertions::assert_impl_all!(DataGrid: Send, Sync);
static_assertions::assert_impl_all!(GridSignals: Send, Sync);
