//! Selection descriptors.
//!
//! In descriptor mode the host owns selection state. It describes membership
//! with a [`SelectBy`] value, and the grid only *evaluates* it: every
//! descriptor kind is resolved once into a [`Membership`] strategy so that
//! per-row checks never re-inspect the descriptor's shape.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::row::{Row, key_text};
use crate::error::{GridError, Result};

/// Key-value membership: a row is selected if its `row_key` field is one of
/// `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySelection {
    /// Key values of the selected rows.
    pub values: Vec<Value>,
    /// Field holding each row's key.
    #[serde(alias = "rowKey")]
    pub row_key: String,
}

/// How the host describes which rows are selected.
///
/// JSON forms: `{"indexes": [0, 3]}`, `{"is_selected_key": "checked"}`,
/// `{"keys": {"values": ["a", "b"], "row_key": "id"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectBy {
    /// Selected row indexes.
    Indexes(Vec<usize>),
    /// Name of a boolean field on each row.
    #[serde(alias = "isSelectedKey")]
    IsSelectedKey(String),
    /// Selected key values.
    Keys(KeySelection),
}

impl SelectBy {
    /// Checks that every required field is present.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Indexes(_) => Ok(()),
            Self::IsSelectedKey(field) if field.is_empty() => Err(GridError::config(
                "select_by.is_selected_key must name a row field",
            )),
            Self::IsSelectedKey(_) => Ok(()),
            Self::Keys(keys) if keys.row_key.is_empty() => Err(GridError::config(
                "select_by.keys.row_key must name a row field",
            )),
            Self::Keys(_) => Ok(()),
        }
    }
}

/// A resolved membership test for one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    /// Selected if the row index is in the set.
    Indexes(HashSet<usize>),
    /// Selected if the named field is `true`.
    Field(String),
    /// Selected if the row's key text is in the set.
    Keys {
        /// Canonical key texts, see [`key_text`].
        values: HashSet<String>,
        /// Field holding each row's key.
        row_key: String,
    },
}

impl Membership {
    /// Validates `select_by` and resolves it into a strategy.
    pub fn resolve(select_by: &SelectBy) -> Result<Self> {
        select_by.validate()?;
        Ok(match select_by {
            SelectBy::Indexes(indexes) => Self::Indexes(indexes.iter().copied().collect()),
            SelectBy::IsSelectedKey(field) => Self::Field(field.clone()),
            SelectBy::Keys(keys) => Self::Keys {
                values: keys.values.iter().map(key_text).collect(),
                row_key: keys.row_key.clone(),
            },
        })
    }

    /// Returns whether `row`, found at `row_index`, is selected.
    ///
    /// A boolean-field descriptor only counts a literal `true`; missing
    /// fields and non-boolean values read as not selected.
    pub fn is_selected(&self, row: &Row, row_index: usize) -> bool {
        match self {
            Self::Indexes(indexes) => indexes.contains(&row_index),
            Self::Field(field) => row.get(field).and_then(Value::as_bool).unwrap_or(false),
            Self::Keys { values, row_key } => row
                .get(row_key)
                .is_some_and(|key| values.contains(&key_text(key))),
        }
    }
}
