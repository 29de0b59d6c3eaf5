//! Integration tests for the imperative signal bus and cell interactions.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_grid::prelude::*;
use parking_lot::Mutex;
use serde_json::json;

fn grid() -> DataGrid {
    let rows: Vec<Row> = (0..3).map(|i| json!({ "id": i })).collect();
    let columns = vec![Column::new("id", "ID"), Column::new("name", "Name")];
    DataGrid::new(GridConfig::new(), columns, Arc::new(rows)).unwrap()
}

#[test]
fn test_bus_does_not_replay() {
    let grid = grid();
    grid.scroll_to_column(1);

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    let subscription = grid.bus().on_scroll_to_column(move |_| {
        hits_clone.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    grid.scroll_to_column(1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert!(subscription.unsubscribe());
    grid.scroll_to_column(1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cell_click_selects_and_reports_row() {
    let grid = grid();
    let cells = Arc::new(Mutex::new(Vec::new()));
    let cells_clone = cells.clone();
    let _sub = grid
        .bus()
        .on_cell_selected(move |cell, open| cells_clone.lock().push((cell, open)));
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let clicks_clone = clicks.clone();
    grid.signals().row_click.connect(move |click| clicks_clone.lock().push(click.clone()));

    grid.on_cell_click(CellPosition::new(2, 1)).unwrap();

    assert_eq!(*cells.lock(), vec![(CellPosition::new(2, 1), false)]);
    let clicks = clicks.lock();
    assert_eq!(clicks[0].row, json!({ "id": 2 }));
    assert_eq!(clicks[0].column.as_ref().map(|c| c.key.as_str()), Some("name"));
}

#[test]
fn test_double_click_opens_editor() {
    let grid = grid();
    let opened = Arc::new(Mutex::new(Vec::new()));
    let opened_clone = opened.clone();
    let _sub = grid
        .bus()
        .on_cell_selected(move |cell, open| opened_clone.lock().push((cell, open)));

    grid.on_cell_double_click(CellPosition::new(0, 0)).unwrap();
    assert_eq!(*opened.lock(), vec![(CellPosition::new(0, 0), true)]);
}

#[test]
fn test_drag_enter_dispatch() {
    let grid = grid();
    let over = Arc::new(Mutex::new(None));
    let over_clone = over.clone();
    let _sub = grid.bus().on_drag_enter(move |row| *over_clone.lock() = Some(row));
    grid.handle_drag_enter(2);
    assert_eq!(*over.lock(), Some(2));
}

#[test]
fn test_raw_subscription_receives_signal() {
    let grid = grid();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let _sub = grid
        .bus()
        .subscribe(SignalKind::CellSelected, move |signal| seen_clone.lock().push(*signal));

    grid.open_cell_editor(1, 0);
    assert_eq!(
        *seen.lock(),
        vec![GridSignal::CellSelected {
            row_index: 1,
            column_index: 0,
            open_editor: true
        }]
    );
}

#[test]
fn test_click_on_missing_row_fails_only_with_listener() {
    let grid = grid();
    assert!(grid.on_cell_click(CellPosition::new(9, 0)).is_ok());
    grid.signals().row_click.connect(|_| {});
    assert_eq!(
        grid.on_cell_click(CellPosition::new(9, 0)),
        Err(GridError::RowOutOfRange { index: 9, len: 3 })
    );
}
