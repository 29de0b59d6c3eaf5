//! Row selection state machine.
//!
//! [`RowSelection`] handles row toggles and the select-all checkbox in one of
//! two exclusive modes, chosen once from configuration:
//!
//! - **Legacy**: the grid owns an ordered list of row snapshots, each with an
//!   `is_selected` flag. Every change reports the full selected list.
//! - **Descriptor**: the host owns selection state and describes it with a
//!   [`SelectBy`]. The grid evaluates membership and reports only deltas; the
//!   host is expected to update the descriptor in response.
//!
//! Operations return a [`SelectionOutcome`] describing what the host should be
//! told. The grid controller turns outcomes into signal emissions.
//!
//! # Shift-range selection
//!
//! In descriptor mode with shift-select enabled, a click while Shift is the
//! only held key extends the selection from the last clicked row (the cursor)
//! to the clicked row. The cursor row itself is excluded, the clicked row is
//! included, and the cursor then moves to the clicked row.

use horizon_grid_core::logging::targets;
use serde_json::Value;

use super::descriptor::{Membership, SelectBy};
use super::row::{Row, RowRef, RowSource, field_value, key_text};
use crate::config::{GridConfig, RowSelectMode};
use crate::error::{GridError, Result};
use crate::widget::keyboard::{KeyCode, KeyDownSet};

/// A legacy-mode selection entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSnapshot {
    /// Value of the row key field when the row was first toggled.
    pub key: Value,
    /// The row data.
    pub row: Row,
    /// Current selection flag.
    pub is_selected: bool,
}

/// What a selection operation changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// Nothing to report.
    Unchanged,
    /// Descriptor mode: these rows became selected.
    Selected(Vec<RowRef>),
    /// Descriptor mode: these rows became deselected.
    Deselected(Vec<RowRef>),
    /// Legacy mode: the full list of currently selected rows.
    LegacyChanged(Vec<Row>),
}

impl SelectionOutcome {
    /// Returns `true` if there is nothing to report.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

#[derive(Debug, Clone)]
struct DescriptorState {
    membership: Membership,
    enable_shift_select: bool,
    show_checkbox: bool,
    cursor: Option<usize>,
}

#[derive(Debug, Clone)]
enum SelectionState {
    Legacy {
        mode: RowSelectMode,
        rows: Vec<RowSnapshot>,
    },
    Descriptor(DescriptorState),
}

/// Selection state for one grid instance.
#[derive(Debug, Clone)]
pub struct RowSelection {
    state: SelectionState,
    row_key: String,
    select_all_checked: bool,
}

impl RowSelection {
    /// Creates the selection model described by `config`.
    ///
    /// Descriptor mode wins when `row_selection` is set; otherwise legacy mode
    /// is used with `enable_row_select` (possibly disabled).
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        let state = match &config.row_selection {
            Some(selection) => {
                if config.enable_row_select != RowSelectMode::Disabled {
                    return Err(GridError::config(
                        "enable_row_select and row_selection cannot be combined",
                    ));
                }
                SelectionState::Descriptor(DescriptorState {
                    membership: Membership::resolve(&selection.select_by)?,
                    enable_shift_select: selection.enable_shift_select,
                    show_checkbox: selection.show_checkbox,
                    cursor: None,
                })
            }
            None => SelectionState::Legacy {
                mode: config.enable_row_select,
                rows: Vec::new(),
            },
        };
        Ok(Self {
            state,
            row_key: config.row_key.clone(),
            select_all_checked: false,
        })
    }

    /// Returns `true` in descriptor mode.
    pub fn is_descriptor(&self) -> bool {
        matches!(self.state, SelectionState::Descriptor(_))
    }

    /// Returns `true` if any kind of row selection is active.
    pub fn is_enabled(&self) -> bool {
        match &self.state {
            SelectionState::Legacy { mode, .. } => *mode != RowSelectMode::Disabled,
            SelectionState::Descriptor(_) => true,
        }
    }

    /// Returns `true` if the checkbox column should be shown.
    pub fn shows_checkbox(&self) -> bool {
        match &self.state {
            SelectionState::Legacy { mode, .. } => *mode != RowSelectMode::Disabled,
            SelectionState::Descriptor(d) => d.show_checkbox,
        }
    }

    /// The shift-range cursor; always `None` in legacy mode.
    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            SelectionState::Descriptor(d) => d.cursor,
            SelectionState::Legacy { .. } => None,
        }
    }

    /// State of the select-all checkbox. A row toggle unchecks it.
    pub fn is_select_all_checked(&self) -> bool {
        self.select_all_checked
    }

    /// Replaces the host's selection descriptor.
    ///
    /// Fails in legacy mode, or if the descriptor is missing a field.
    pub fn set_select_by(&mut self, select_by: &SelectBy) -> Result<()> {
        match &mut self.state {
            SelectionState::Descriptor(d) => {
                d.membership = Membership::resolve(select_by)?;
                Ok(())
            }
            SelectionState::Legacy { .. } => Err(GridError::config(
                "select_by can only be set when row_selection is configured",
            )),
        }
    }

    /// Legacy selected rows, in toggle order. `None` in descriptor mode.
    pub fn selected_rows(&self) -> Option<Vec<Row>> {
        match &self.state {
            SelectionState::Legacy { rows, .. } => Some(Self::selected_of(rows)),
            SelectionState::Descriptor(_) => None,
        }
    }

    /// Returns whether `row`, found at `row_index`, is currently selected.
    pub fn is_row_selected(&self, row_index: usize, row: &Row) -> bool {
        match &self.state {
            SelectionState::Descriptor(d) => d.membership.is_selected(row, row_index),
            SelectionState::Legacy { rows, .. } => {
                let key = key_text(&field_value(row, &self.row_key));
                rows.iter()
                    .any(|snapshot| snapshot.is_selected && key_text(&snapshot.key) == key)
            }
        }
    }

    /// Handles a click on a row's selection checkbox.
    pub fn toggle_row(
        &mut self,
        row_index: usize,
        rows: &dyn RowSource,
        keys: &KeyDownSet,
    ) -> Result<SelectionOutcome> {
        let row = fetch_row(rows, row_index)?;
        self.select_all_checked = false;

        match &mut self.state {
            SelectionState::Legacy { mode, rows: snapshots } => {
                let outcome = toggle_legacy(*mode, snapshots, &self.row_key, row);
                if !outcome.is_unchanged() {
                    tracing::debug!(target: targets::SELECTION, row_index, "legacy row toggled");
                }
                Ok(outcome)
            }
            SelectionState::Descriptor(d) => {
                let shift_range = d.enable_shift_select
                    && keys.is_exactly_one_key_down(KeyCode::SHIFT)
                    && d.cursor.is_some_and(|cursor| cursor != row_index)
                    && !d.membership.is_selected(&row, row_index);

                if shift_range && let Some(cursor) = d.cursor {
                    let range = if row_index > cursor {
                        cursor + 1..=row_index
                    } else {
                        row_index..=cursor - 1
                    };
                    let selected = range
                        .map(|i| fetch_row(rows, i).map(|r| RowRef::new(i, r)))
                        .collect::<Result<Vec<_>>>()?;
                    tracing::debug!(
                        target: targets::SELECTION,
                        cursor,
                        row_index,
                        count = selected.len(),
                        "shift range selected"
                    );
                    d.cursor = Some(row_index);
                    return Ok(SelectionOutcome::Selected(selected));
                }

                let was_selected = d.membership.is_selected(&row, row_index);
                d.cursor = if was_selected { None } else { Some(row_index) };
                tracing::debug!(target: targets::SELECTION, row_index, was_selected, "row toggled");
                let row_ref = vec![RowRef::new(row_index, row)];
                Ok(if was_selected {
                    SelectionOutcome::Deselected(row_ref)
                } else {
                    SelectionOutcome::Selected(row_ref)
                })
            }
        }
    }

    /// Handles the select-all checkbox.
    ///
    /// Legacy mode snapshots every row with `is_selected = checked`.
    /// Descriptor mode reports only rows whose state would change. An empty
    /// row set changes nothing.
    pub fn select_all(&mut self, checked: bool, rows: &dyn RowSource) -> Result<SelectionOutcome> {
        let count = rows.row_count();
        if count == 0 || !self.is_enabled() {
            tracing::debug!(target: targets::SELECTION, count, "select-all ignored");
            return Ok(SelectionOutcome::Unchanged);
        }
        self.select_all_checked = checked;

        match &mut self.state {
            SelectionState::Legacy { rows: snapshots, .. } => {
                let mut next = Vec::with_capacity(count);
                for i in 0..count {
                    let row = fetch_row(rows, i)?;
                    next.push(RowSnapshot {
                        key: field_value(&row, &self.row_key),
                        row,
                        is_selected: checked,
                    });
                }
                *snapshots = next;
                tracing::debug!(target: targets::SELECTION, checked, count, "legacy select-all");
                Ok(SelectionOutcome::LegacyChanged(Self::selected_of(snapshots)))
            }
            SelectionState::Descriptor(d) => {
                let mut delta = Vec::new();
                for i in 0..count {
                    let row = fetch_row(rows, i)?;
                    if d.membership.is_selected(&row, i) != checked {
                        delta.push(RowRef::new(i, row));
                    }
                }
                tracing::debug!(target: targets::SELECTION, checked, changed = delta.len(), "select-all");
                Ok(match (delta.is_empty(), checked) {
                    (true, _) => SelectionOutcome::Unchanged,
                    (false, true) => SelectionOutcome::Selected(delta),
                    (false, false) => SelectionOutcome::Deselected(delta),
                })
            }
        }
    }

    fn selected_of(rows: &[RowSnapshot]) -> Vec<Row> {
        rows.iter()
            .filter(|snapshot| snapshot.is_selected)
            .map(|snapshot| snapshot.row.clone())
            .collect()
    }
}

fn toggle_legacy(
    mode: RowSelectMode,
    rows: &mut Vec<RowSnapshot>,
    row_key: &str,
    row: Row,
) -> SelectionOutcome {
    if mode == RowSelectMode::Disabled {
        tracing::debug!(target: targets::SELECTION, "toggle ignored, row selection disabled");
        return SelectionOutcome::Unchanged;
    }
    if mode == RowSelectMode::Single {
        rows.clear();
    }

    let key = field_value(&row, row_key);
    let key_str = key_text(&key);
    match rows.iter_mut().find(|s| key_text(&s.key) == key_str) {
        Some(snapshot) => snapshot.is_selected = !snapshot.is_selected,
        None => rows.push(RowSnapshot {
            key,
            row,
            is_selected: true,
        }),
    }
    SelectionOutcome::LegacyChanged(RowSelection::selected_of(rows))
}

fn fetch_row(rows: &dyn RowSource, index: usize) -> Result<Row> {
    rows.row(index).ok_or_else(|| {
        let len = rows.row_count();
        tracing::warn!(target: targets::SELECTION, index, len, "row index out of range");
        GridError::RowOutOfRange { index, len }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowSelectionConfig;
    use crate::model::descriptor::KeySelection;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| json!({ "id": format!("r{i}"), "n": i })).collect()
    }

    fn descriptor(select_by: SelectBy, shift: bool) -> RowSelection {
        let config = GridConfig::new()
            .with_row_selection(RowSelectionConfig::new(select_by).with_shift_select(shift));
        RowSelection::from_config(&config).unwrap()
    }

    fn shift_held() -> KeyDownSet {
        let mut keys = KeyDownSet::new();
        keys.key_down(KeyCode::SHIFT);
        keys
    }

    fn indexes(outcome: &SelectionOutcome) -> Vec<usize> {
        match outcome {
            SelectionOutcome::Selected(r) | SelectionOutcome::Deselected(r) => {
                r.iter().map(|r| r.row_index).collect()
            }
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_legacy_multi_toggle() {
        let data = rows(4);
        let config = GridConfig::new().with_row_select(RowSelectMode::Multi);
        let mut selection = RowSelection::from_config(&config).unwrap();
        let keys = KeyDownSet::new();

        selection.toggle_row(1, &data, &keys).unwrap();
        let outcome = selection.toggle_row(3, &data, &keys).unwrap();
        assert_eq!(outcome, SelectionOutcome::LegacyChanged(vec![data[1].clone(), data[3].clone()]));

        let outcome = selection.toggle_row(1, &data, &keys).unwrap();
        assert_eq!(outcome, SelectionOutcome::LegacyChanged(vec![data[3].clone()]));
        assert!(selection.is_row_selected(3, &data[3]));
        assert!(!selection.is_row_selected(1, &data[1]));
        assert_eq!(selection.selected_rows(), Some(vec![data[3].clone()]));
    }

    #[test]
    fn test_legacy_single_replaces() {
        let data = rows(3);
        let config = GridConfig::new().with_row_select(RowSelectMode::Single);
        let mut selection = RowSelection::from_config(&config).unwrap();
        let keys = KeyDownSet::new();

        selection.toggle_row(0, &data, &keys).unwrap();
        let outcome = selection.toggle_row(2, &data, &keys).unwrap();
        assert_eq!(outcome, SelectionOutcome::LegacyChanged(vec![data[2].clone()]));

        // Toggling the same row in single mode keeps it selected.
        let outcome = selection.toggle_row(2, &data, &keys).unwrap();
        assert_eq!(outcome, SelectionOutcome::LegacyChanged(vec![data[2].clone()]));
    }

    #[test]
    fn test_legacy_disabled_is_noop() {
        let data = rows(2);
        let mut selection = RowSelection::from_config(&GridConfig::new()).unwrap();
        assert!(!selection.is_enabled());
        let outcome = selection.toggle_row(0, &data, &KeyDownSet::new()).unwrap();
        assert!(outcome.is_unchanged());
        assert!(selection.select_all(true, &data).unwrap().is_unchanged());
    }

    #[test]
    fn test_legacy_select_all() {
        let data = rows(3);
        let config = GridConfig::new().with_row_select(RowSelectMode::Multi);
        let mut selection = RowSelection::from_config(&config).unwrap();

        let outcome = selection.select_all(true, &data).unwrap();
        assert_eq!(outcome, SelectionOutcome::LegacyChanged(data.clone()));
        assert!(selection.is_select_all_checked());

        let outcome = selection.select_all(false, &data).unwrap();
        assert_eq!(outcome, SelectionOutcome::LegacyChanged(Vec::new()));

        selection.toggle_row(0, &data, &KeyDownSet::new()).unwrap();
        assert!(!selection.is_select_all_checked());
    }

    #[test]
    fn test_descriptor_toggle_and_cursor() {
        let data = rows(5);
        let mut selection = descriptor(SelectBy::Indexes(vec![2]), false);
        let keys = KeyDownSet::new();

        let outcome = selection.toggle_row(1, &data, &keys).unwrap();
        assert!(matches!(outcome, SelectionOutcome::Selected(_)));
        assert_eq!(selection.cursor(), Some(1));

        let outcome = selection.toggle_row(2, &data, &keys).unwrap();
        assert!(matches!(outcome, SelectionOutcome::Deselected(_)));
        assert_eq!(indexes(&outcome), vec![2]);
        assert_eq!(selection.cursor(), None);
        assert_eq!(selection.selected_rows(), None);
    }

    #[test]
    fn test_shift_range_ascending() {
        let data = rows(8);
        let mut selection = descriptor(SelectBy::Indexes(vec![]), true);
        selection.toggle_row(2, &data, &KeyDownSet::new()).unwrap();
        selection.set_select_by(&SelectBy::Indexes(vec![2])).unwrap();

        let outcome = selection.toggle_row(6, &data, &shift_held()).unwrap();
        assert!(matches!(outcome, SelectionOutcome::Selected(_)));
        assert_eq!(indexes(&outcome), vec![3, 4, 5, 6]);
        assert_eq!(selection.cursor(), Some(6));
    }

    #[test]
    fn test_shift_range_descending() {
        let data = rows(8);
        let mut selection = descriptor(SelectBy::Indexes(vec![]), true);
        selection.toggle_row(5, &data, &KeyDownSet::new()).unwrap();
        selection.set_select_by(&SelectBy::Indexes(vec![5])).unwrap();

        let outcome = selection.toggle_row(1, &data, &shift_held()).unwrap();
        assert_eq!(indexes(&outcome), vec![1, 2, 3, 4]);
        assert_eq!(selection.cursor(), Some(1));
    }

    #[test]
    fn test_shift_requires_only_shift() {
        let data = rows(8);
        let mut selection = descriptor(SelectBy::Indexes(vec![]), true);
        selection.toggle_row(2, &data, &KeyDownSet::new()).unwrap();

        let mut keys = shift_held();
        keys.key_down(KeyCode::CTRL);
        let outcome = selection.toggle_row(6, &data, &keys).unwrap();
        assert_eq!(indexes(&outcome), vec![6]);
    }

    #[test]
    fn test_shift_on_selected_row_falls_through() {
        let data = rows(8);
        let mut selection = descriptor(SelectBy::Indexes(vec![6]), true);
        selection.toggle_row(2, &data, &KeyDownSet::new()).unwrap();

        let outcome = selection.toggle_row(6, &data, &shift_held()).unwrap();
        assert!(matches!(outcome, SelectionOutcome::Deselected(_)));
        assert_eq!(selection.cursor(), None);
    }

    #[test]
    fn test_shift_without_cursor_is_plain_toggle() {
        let data = rows(4);
        let mut selection = descriptor(SelectBy::Indexes(vec![]), true);
        let outcome = selection.toggle_row(3, &data, &shift_held()).unwrap();
        assert_eq!(indexes(&outcome), vec![3]);
        assert_eq!(selection.cursor(), Some(3));
    }

    #[test]
    fn test_shift_disabled_is_plain_toggle() {
        let data = rows(8);
        let mut selection = descriptor(SelectBy::Indexes(vec![]), false);
        selection.toggle_row(2, &data, &KeyDownSet::new()).unwrap();
        let outcome = selection.toggle_row(6, &data, &shift_held()).unwrap();
        assert_eq!(indexes(&outcome), vec![6]);
    }

    #[test]
    fn test_descriptor_select_all_delta() {
        let data = rows(4);
        let select_by = SelectBy::Keys(KeySelection {
            values: vec![json!("r0"), json!("r2")],
            row_key: "id".into(),
        });
        let mut selection = descriptor(select_by, false);

        let outcome = selection.select_all(true, &data).unwrap();
        assert_eq!(indexes(&outcome), vec![1, 3]);

        let outcome = selection.select_all(false, &data).unwrap();
        assert!(matches!(outcome, SelectionOutcome::Deselected(_)));
        assert_eq!(indexes(&outcome), vec![0, 2]);

        selection.set_select_by(&SelectBy::Indexes(vec![0, 1, 2, 3])).unwrap();
        assert!(selection.select_all(true, &data).unwrap().is_unchanged());
    }

    #[test]
    fn test_select_all_empty_rows() {
        let mut selection = descriptor(SelectBy::Indexes(vec![]), false);
        let empty: Vec<Row> = Vec::new();
        assert!(selection.select_all(true, &empty).unwrap().is_unchanged());
        assert!(!selection.is_select_all_checked());
    }

    #[test]
    fn test_toggle_out_of_range() {
        let data = rows(2);
        let mut selection = descriptor(SelectBy::Indexes(vec![]), false);
        let err = selection.toggle_row(5, &data, &KeyDownSet::new()).unwrap_err();
        assert_eq!(err, GridError::RowOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn test_set_select_by_in_legacy_mode_fails() {
        let mut selection = RowSelection::from_config(&GridConfig::new()).unwrap();
        assert!(selection.set_select_by(&SelectBy::Indexes(vec![])).is_err());
    }
}
