//! Resource operations
//!
//! Each operation is a plain struct of already-resolved parameters with an
//! async `run(&Connection)` method. Operations validate their input before any
//! request is made, build the endpoint, and delegate to the [`Connection`].
//!
//! # Overview
//!
//! - [`tables`]: list and get tables of a document
//! - [`columns`]: list and get columns of a table
//! - [`rows`]: list, get, insert, upsert, update and delete rows
//! - [`automations`]: trigger webhook-invoked automations
//!
//! [`Connection`]: crate::http::Connection

pub mod automations;
pub mod columns;
pub mod rows;
pub mod tables;

pub use automations::{TriggerWebhook, TriggerWebhookOutput, WebhookTarget};
pub use columns::{GetColumn, ListColumns};
pub use rows::{
    DeleteRow, DeleteRowOutput, GetRow, InsertRows, InsertRowsOutput, ListRows, UpdateRow,
    UpdateRowOutput, UpsertRows, UpsertRowsOutput,
};
pub use tables::{GetTable, ListTables};

use crate::error::{Error, Result};
use url::form_urlencoded;

/// Page size used by listing operations when none is given
pub const DEFAULT_LIMIT: u32 = 25;

/// Reject a blank identifier
pub(crate) fn require_id<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::invalid_input(format!("{name} must not be empty")));
    }
    Ok(value)
}

/// Reject a zero page size
pub(crate) fn require_limit(limit: u32) -> Result<u32> {
    if limit == 0 {
        return Err(Error::invalid_input("limit must be greater than zero"));
    }
    Ok(limit)
}

/// Percent-encode one path segment
pub(crate) fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Join validated segments into a `/a/b/c` path
pub(crate) fn build_path(segments: &[&str]) -> String {
    segments.iter().fold(String::new(), |mut path, segment| {
        path.push('/');
        path.push_str(&encode_segment(segment));
        path
    })
}

/// Form-encoded query string builder
pub(crate) struct Query {
    inner: form_urlencoded::Serializer<'static, String>,
    empty: bool,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self {
            inner: form_urlencoded::Serializer::new(String::new()),
            empty: true,
        }
    }

    /// Append a pair
    pub(crate) fn pair(mut self, key: &str, value: impl ToString) -> Self {
        self.inner.append_pair(key, &value.to_string());
        self.empty = false;
        self
    }

    /// Append `key=true` only when `flag` is set
    pub(crate) fn flag(self, key: &str, flag: bool) -> Self {
        if flag {
            self.pair(key, true)
        } else {
            self
        }
    }

    /// Append a pair only when a non-blank value is given
    pub(crate) fn optional(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => self.pair(key, v),
            _ => self,
        }
    }

    /// Attach the query to `path`
    pub(crate) fn finish(mut self, path: String) -> String {
        if self.empty {
            return path;
        }
        format!("{path}?{}", self.inner.finish())
    }
}
