//! Grid configuration.
//!
//! [`GridConfig`] collects the layout inputs and the selection configuration
//! a grid is created with. It can be built in code with the `with_*` methods
//! or loaded from JSON; either way [`GridConfig::validate`] runs before a
//! grid accepts it, so configuration errors surface at setup time.
//!
//! # Example
//!
//! ```
//! use horizon_grid::config::{GridConfig, RowSelectMode};
//!
//! let config = GridConfig::from_json_str(r#"{
//!     "row_key": "uuid",
//!     "min_column_width": 60,
//!     "row_selection": {
//!         "enable_shift_select": true,
//!         "select_by": { "keys": { "values": [], "row_key": "uuid" } }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(config.row_height, 35.0);
//! assert_eq!(config.enable_row_select, RowSelectMode::Disabled);
//! assert!(config.row_selection.unwrap().show_checkbox);
//! ```

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::model::SelectBy;

/// Legacy row selection mode.
///
/// JSON accepts `false`/`true` (disabled/multi) as well as the names
/// `"disabled"`, `"single"` and `"multi"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SelectModeRepr", into = "SelectModeRepr")]
pub enum RowSelectMode {
    /// No legacy row selection.
    #[default]
    Disabled,
    /// At most one row is selected; selecting a row clears the others.
    Single,
    /// Any number of rows may be selected.
    Multi,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SelectModeRepr {
    Flag(bool),
    Name(String),
}

impl TryFrom<SelectModeRepr> for RowSelectMode {
    type Error = String;

    fn try_from(repr: SelectModeRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            SelectModeRepr::Flag(false) => Ok(Self::Disabled),
            SelectModeRepr::Flag(true) => Ok(Self::Multi),
            SelectModeRepr::Name(name) => match name.as_str() {
                "disabled" => Ok(Self::Disabled),
                "single" => Ok(Self::Single),
                "multi" | "multiple" => Ok(Self::Multi),
                other => Err(format!("unknown row select mode '{other}'")),
            },
        }
    }
}

impl From<RowSelectMode> for SelectModeRepr {
    fn from(mode: RowSelectMode) -> Self {
        match mode {
            RowSelectMode::Disabled => Self::Flag(false),
            RowSelectMode::Single => Self::Name("single".to_string()),
            RowSelectMode::Multi => Self::Flag(true),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Descriptor-mode selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSelectionConfig {
    /// Extend the selection with Shift+click.
    #[serde(default, alias = "enableShiftSelect")]
    pub enable_shift_select: bool,
    /// Show the checkbox column.
    #[serde(default = "default_true", alias = "showCheckbox")]
    pub show_checkbox: bool,
    /// How the host describes the selected rows.
    #[serde(alias = "selectBy")]
    pub select_by: SelectBy,
}

impl RowSelectionConfig {
    /// Creates a configuration with a checkbox column and no shift-select.
    pub fn new(select_by: SelectBy) -> Self {
        Self {
            enable_shift_select: false,
            show_checkbox: true,
            select_by,
        }
    }

    /// Enables Shift+click range extension.
    pub fn with_shift_select(mut self, enabled: bool) -> Self {
        self.enable_shift_select = enabled;
        self
    }

    /// Shows or hides the checkbox column.
    pub fn with_checkbox(mut self, show: bool) -> Self {
        self.show_checkbox = show;
        self
    }
}

/// How keyboard navigation behaves at row ends. Passed through to the
/// rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellNavigationMode {
    /// Stop at the row edge.
    None,
    /// Wrap around within the same row.
    LoopOverRow,
    /// Continue on the next/previous row.
    #[default]
    ChangeRow,
}

/// Sort direction for the sort indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
    /// Unsorted.
    None,
}

/// Configuration for one grid instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Height of a data row.
    pub row_height: f32,
    /// Height of the header row; falls back to `row_height`.
    pub header_row_height: Option<f32>,
    /// Height of the filter row when filtering is toggled on.
    pub header_filters_height: f32,
    /// Minimum height of the grid.
    pub min_height: f32,
    /// Fixed total width; when unset the viewport width is used.
    pub min_width: Option<f32>,
    /// Lower bound for every computed column width.
    pub min_column_width: f32,
    /// Field identifying a row.
    pub row_key: String,
    /// Legacy selection mode.
    pub enable_row_select: RowSelectMode,
    /// Descriptor-mode selection; mutually exclusive with legacy mode.
    pub row_selection: Option<RowSelectionConfig>,
    /// Whether single cells can be selected.
    pub enable_cell_select: bool,
    /// Whether the selected cell takes focus automatically.
    pub enable_cell_auto_focus: bool,
    /// Keyboard navigation behaviour at row ends.
    pub cell_navigation_mode: CellNavigationMode,
    /// Initially sorted column.
    pub sort_column: Option<String>,
    /// Initial sort direction; ignored without `sort_column`.
    pub sort_direction: Option<SortDirection>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: 35.0,
            header_row_height: None,
            header_filters_height: 45.0,
            min_height: 350.0,
            min_width: None,
            min_column_width: 80.0,
            row_key: "id".to_string(),
            enable_row_select: RowSelectMode::Disabled,
            row_selection: None,
            enable_cell_select: false,
            enable_cell_auto_focus: true,
            cell_navigation_mode: CellNavigationMode::ChangeRow,
            sort_column: None,
            sort_direction: None,
        }
    }
}

impl GridConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(target: targets::CONFIG, row_key = %config.row_key, "loaded grid configuration");
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the row key field.
    pub fn with_row_key(mut self, row_key: impl Into<String>) -> Self {
        self.row_key = row_key.into();
        self
    }

    /// Sets the row height.
    pub fn with_row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self
    }

    /// Sets the header row height.
    pub fn with_header_row_height(mut self, height: f32) -> Self {
        self.header_row_height = Some(height);
        self
    }

    /// Sets a fixed total width.
    pub fn with_min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Sets the minimum column width.
    pub fn with_min_column_width(mut self, width: f32) -> Self {
        self.min_column_width = width;
        self
    }

    /// Enables legacy row selection.
    pub fn with_row_select(mut self, mode: RowSelectMode) -> Self {
        self.enable_row_select = mode;
        self
    }

    /// Enables descriptor-mode row selection.
    pub fn with_row_selection(mut self, selection: RowSelectionConfig) -> Self {
        self.row_selection = Some(selection);
        self
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_column = Some(column.into());
        self.sort_direction = Some(direction);
        self
    }

    /// Effective header row height.
    pub fn header_row_height(&self) -> f32 {
        self.header_row_height.unwrap_or(self.row_height)
    }

    /// Checks the configuration for errors that make it unusable.
    pub fn validate(&self) -> Result<()> {
        if self.row_key.is_empty() {
            return Err(GridError::config("row_key must not be empty"));
        }
        if !(self.min_column_width.is_finite() && self.min_column_width > 0.0) {
            return Err(GridError::config(format!(
                "min_column_width must be positive, got {}",
                self.min_column_width
            )));
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(GridError::config(format!(
                "row_height must be positive, got {}",
                self.row_height
            )));
        }
        if let Some(width) = self.min_width
            && !(width.is_finite() && width >= 0.0)
        {
            return Err(GridError::config(format!("min_width must not be negative, got {width}")));
        }
        if let Some(selection) = &self.row_selection {
            if self.enable_row_select != RowSelectMode::Disabled {
                return Err(GridError::config(
                    "enable_row_select and row_selection cannot be combined",
                ));
            }
            selection.select_by.validate()?;
        }
        Ok(())
    }
}
