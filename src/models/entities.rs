//! Entity records returned by the API

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Deserializer, Serialize};

/// A table (or view) in a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Resource type, usually `table`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// `table` or `view`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Parent of the table; views point at their base table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A parent reference, sent either as a bare id or as a reference object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Id(String),
    Reference(ResourceRef),
}

impl ParentRef {
    /// Identifier of the parent, whichever shape it came in
    pub fn id(&self) -> Option<&str> {
        match self {
            ParentRef::Id(id) => Some(id),
            ParentRef::Reference(r) => r.id.as_deref(),
        }
    }
}

/// Reference to another resource (page, table, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A column of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether this is the table's display column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,

    /// Calculated columns are read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<JsonValue>,

    /// Column format descriptor (text, number, date, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A row of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Cell values keyed by column id, or by column name with `useColumnNames`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<JsonObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<RowReference>,
}

impl Row {
    /// Look up a cell value by column id or name
    pub fn value(&self, column: &str) -> Option<&JsonValue> {
        self.values.as_ref().and_then(|values| values.get(column))
    }
}

/// Reference to a parent row in a hierarchical table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_link: Option<String>,
}

/// One page of a listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize")
)]
pub struct PagedResponse<T> {
    /// Items in server order; a missing or null field means no items
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub items: Vec<T>,

    /// Opaque cursor for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    /// Fully-qualified URL of the next page, to be requested verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_link: Option<String>,
}

impl<T> PagedResponse<T> {
    /// Whether the server advertised a following page
    pub fn has_more_pages(&self) -> bool {
        self.next_page_token.is_some() || self.next_page_link.is_some()
    }
}

impl<T> Default for PagedResponse<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_page_token: None,
            next_page_link: None,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
