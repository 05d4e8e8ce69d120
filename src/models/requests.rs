//! Mutation request bodies and their responses

use crate::types::JsonValue;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A `(column, value)` pair in a mutation body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowCell {
    /// Column id (e.g. `c-abc123`) or column name
    pub column: String,
    pub value: JsonValue,
}

impl RowCell {
    /// Create a cell
    pub fn new(column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// The cells of one row, in caller order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub cells: Vec<RowCell>,
}

impl RowData {
    /// Create a row from cells
    pub fn new(cells: Vec<RowCell>) -> Self {
        Self { cells }
    }

    /// Append a cell
    #[must_use]
    pub fn cell(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.cells.push(RowCell::new(column, value));
        self
    }
}

/// Body for inserting rows; with key columns the server upserts instead
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRowsRequest {
    pub rows: Vec<RowData>,

    /// Columns the server matches existing rows on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_columns: Vec<String>,
}

impl InsertRowsRequest {
    /// Plain insert
    pub fn insert(rows: Vec<RowData>) -> Self {
        Self {
            rows,
            key_columns: Vec::new(),
        }
    }

    /// Insert-or-update keyed on `key_columns`
    pub fn upsert(rows: Vec<RowData>, key_columns: Vec<String>) -> Self {
        Self { rows, key_columns }
    }
}

/// Body for updating a single row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRowRequest {
    pub row: RowData,
}

impl UpdateRowRequest {
    /// Create an update from cells
    pub fn new(cells: Vec<RowCell>) -> Self {
        Self {
            row: RowData::new(cells),
        }
    }
}

/// Acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    /// Server-side id of the queued mutation
    #[serde(default)]
    pub request_id: String,

    /// Row affected by an update or delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Rows created by an insert or upsert
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_row_ids: Vec<String>,
}

/// Response type for calls whose body is irrelevant
///
/// Decodes from anything, including an empty body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoContent;

impl<'de> Deserialize<'de> for NoContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(NoContent)
    }
}
