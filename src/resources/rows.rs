//! Row operations
//!
//! Reads go through the paginated listing or a single GET. Mutations are
//! queued server-side; their outputs carry the `requestId` the API returns
//! for that queued work.

use super::{build_path, require_id, require_limit, Query, DEFAULT_LIMIT};
use crate::error::{Error, Result};
use crate::http::Connection;
use crate::models::{InsertRowsRequest, MutationResponse, Row, RowCell, RowData, UpdateRowRequest};
use crate::pagination::{FetchPolicy, PageCollection};
use crate::types::ValueFormat;
use serde::Serialize;
use tracing::{debug, info};

fn rows_path(doc_id: &str, table_id: &str) -> Result<String> {
    let doc_id = require_id("doc_id", doc_id)?;
    let table_id = require_id("table_id", table_id)?;
    Ok(build_path(&["docs", doc_id, "tables", table_id, "rows"]))
}

fn row_path(doc_id: &str, table_id: &str, row_id: &str) -> Result<String> {
    let doc_id = require_id("doc_id", doc_id)?;
    let table_id = require_id("table_id", table_id)?;
    let row_id = require_id("row_id", row_id)?;
    Ok(build_path(&["docs", doc_id, "tables", table_id, "rows", row_id]))
}

fn validate_cells(cells: &[RowCell]) -> Result<()> {
    if cells.is_empty() {
        return Err(Error::invalid_input("a row needs at least one cell"));
    }
    for cell in cells {
        require_id("cell column", &cell.column)?;
    }
    Ok(())
}

fn validate_rows(rows: &[RowData]) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::invalid_input("rows must not be empty"));
    }
    rows.iter().try_for_each(|row| validate_cells(&row.cells))
}

// ============================================================================
// Reads
// ============================================================================

/// List the rows of a table
#[derive(Debug, Clone, PartialEq)]
pub struct ListRows {
    pub doc_id: String,
    pub table_id: String,
    pub limit: u32,
    pub fetch: FetchPolicy,
    /// Key `values` by column name instead of column id
    pub use_column_names: bool,
    pub value_format: ValueFormat,
    pub visible_only: bool,
    /// Column to sort by; passed through as-is
    pub sort_by: Option<String>,
    /// Server-side filter such as `c-abc:"value"`
    pub query: Option<String>,
}

impl ListRows {
    pub fn new(doc_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            limit: DEFAULT_LIMIT,
            fetch: FetchPolicy::default(),
            use_column_names: false,
            value_format: ValueFormat::default(),
            visible_only: false,
            sort_by: None,
            query: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn fetch(mut self, policy: FetchPolicy) -> Self {
        self.fetch = policy;
        self
    }

    #[must_use]
    pub fn use_column_names(mut self, use_column_names: bool) -> Self {
        self.use_column_names = use_column_names;
        self
    }

    #[must_use]
    pub fn value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    #[must_use]
    pub fn visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    #[must_use]
    pub fn sort_by(mut self, column: impl Into<String>) -> Self {
        self.sort_by = Some(column.into());
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn endpoint(&self) -> Result<String> {
        let path = rows_path(&self.doc_id, &self.table_id)?;
        let limit = require_limit(self.limit)?;

        let query = Query::new()
            .pair("limit", limit)
            .flag("useColumnNames", self.use_column_names)
            .pair("valueFormat", self.value_format)
            .flag("visibleOnly", self.visible_only)
            .optional("sortBy", self.sort_by.as_deref())
            .optional("query", self.query.as_deref());

        Ok(query.finish(path))
    }

    pub async fn run(&self, conn: &Connection) -> Result<PageCollection<Row>> {
        let endpoint = self.endpoint()?;
        info!(
            "Listing rows for table {} in document {}",
            self.table_id, self.doc_id
        );

        let rows: PageCollection<Row> = conn.fetch_pages(&endpoint, self.fetch).await?;

        info!(
            "Successfully retrieved {} row(s) across {} page(s)",
            rows.total_count(),
            rows.page_count
        );
        Ok(rows)
    }
}

/// Get one row by id or display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRow {
    pub doc_id: String,
    pub table_id: String,
    pub row_id: String,
    pub use_column_names: bool,
    pub value_format: ValueFormat,
}

impl GetRow {
    pub fn new(
        doc_id: impl Into<String>,
        table_id: impl Into<String>,
        row_id: impl Into<String>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            row_id: row_id.into(),
            use_column_names: false,
            value_format: ValueFormat::default(),
        }
    }

    #[must_use]
    pub fn use_column_names(mut self, use_column_names: bool) -> Self {
        self.use_column_names = use_column_names;
        self
    }

    #[must_use]
    pub fn value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    pub fn endpoint(&self) -> Result<String> {
        let path = row_path(&self.doc_id, &self.table_id, &self.row_id)?;
        let query = Query::new()
            .flag("useColumnNames", self.use_column_names)
            .pair("valueFormat", self.value_format);
        Ok(query.finish(path))
    }

    pub async fn run(&self, conn: &Connection) -> Result<Row> {
        let endpoint = self.endpoint()?;
        info!(
            "Getting row {} from table {} in document {}",
            self.row_id, self.table_id, self.doc_id
        );

        let row: Row = conn.get(&endpoint).await?;

        info!(
            "Successfully retrieved row: {}",
            row.id.as_deref().unwrap_or(&self.row_id)
        );
        Ok(row)
    }
}

// ============================================================================
// Mutations
// ============================================================================

/// Result of [`InsertRows`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRowsOutput {
    pub added_row_ids: Vec<String>,
    pub request_id: String,
    pub row_count: usize,
}

/// Insert rows into a table
#[derive(Debug, Clone, PartialEq)]
pub struct InsertRows {
    pub doc_id: String,
    pub table_id: String,
    pub rows: Vec<RowData>,
}

impl InsertRows {
    pub fn new(doc_id: impl Into<String>, table_id: impl Into<String>, rows: Vec<RowData>) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            rows,
        }
    }

    pub async fn run(&self, conn: &Connection) -> Result<InsertRowsOutput> {
        let endpoint = rows_path(&self.doc_id, &self.table_id)?;
        validate_rows(&self.rows)?;

        info!(
            "Inserting {} row(s) into table {} in document {}",
            self.rows.len(),
            self.table_id,
            self.doc_id
        );

        let body = InsertRowsRequest::insert(self.rows.clone());
        debug!("Sending insert request to: {}", endpoint);
        let response: MutationResponse = conn.post(&endpoint, &body).await?;

        info!(
            "Successfully inserted {} row(s). Request ID: {}",
            response.added_row_ids.len(),
            response.request_id
        );

        Ok(InsertRowsOutput {
            row_count: response.added_row_ids.len(),
            added_row_ids: response.added_row_ids,
            request_id: response.request_id,
        })
    }
}

/// Result of [`UpsertRows`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRowsOutput {
    /// Ids the server reported as added
    pub row_ids: Vec<String>,
    pub request_id: String,
    pub row_count: usize,
    pub key_columns: Vec<String>,
}

/// Insert rows, updating existing ones that match on the key columns
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRows {
    pub doc_id: String,
    pub table_id: String,
    pub key_columns: Vec<String>,
    pub rows: Vec<RowData>,
}

impl UpsertRows {
    pub fn new(
        doc_id: impl Into<String>,
        table_id: impl Into<String>,
        key_columns: Vec<String>,
        rows: Vec<RowData>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            key_columns,
            rows,
        }
    }

    pub async fn run(&self, conn: &Connection) -> Result<UpsertRowsOutput> {
        let endpoint = rows_path(&self.doc_id, &self.table_id)?;
        if self.key_columns.is_empty() {
            return Err(Error::invalid_input("key_columns must not be empty"));
        }
        for column in &self.key_columns {
            require_id("key column", column)?;
        }
        validate_rows(&self.rows)?;

        info!(
            "Upserting {} row(s) into table {} in document {}",
            self.rows.len(),
            self.table_id,
            self.doc_id
        );
        debug!("Using key columns: {:?}", self.key_columns);

        let body = InsertRowsRequest::upsert(self.rows.clone(), self.key_columns.clone());
        let response: MutationResponse = conn.post(&endpoint, &body).await?;

        info!(
            "Successfully upserted {} row(s). Request ID: {}",
            response.added_row_ids.len(),
            response.request_id
        );

        Ok(UpsertRowsOutput {
            row_count: response.added_row_ids.len(),
            row_ids: response.added_row_ids,
            request_id: response.request_id,
            key_columns: self.key_columns.clone(),
        })
    }
}

/// Result of [`UpdateRow`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRowOutput {
    pub row_id: String,
    pub request_id: String,
}

/// Update cells of a single row
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRow {
    pub doc_id: String,
    pub table_id: String,
    pub row_id: String,
    pub cells: Vec<RowCell>,
}

impl UpdateRow {
    pub fn new(
        doc_id: impl Into<String>,
        table_id: impl Into<String>,
        row_id: impl Into<String>,
        cells: Vec<RowCell>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            row_id: row_id.into(),
            cells,
        }
    }

    pub async fn run(&self, conn: &Connection) -> Result<UpdateRowOutput> {
        let endpoint = row_path(&self.doc_id, &self.table_id, &self.row_id)?;
        validate_cells(&self.cells)?;

        info!(
            "Updating row {} in table {} in document {}",
            self.row_id, self.table_id, self.doc_id
        );

        let body = UpdateRowRequest::new(self.cells.clone());
        let response: MutationResponse = conn.put(&endpoint, &body).await?;

        info!(
            "Successfully updated row {}. Request ID: {}",
            self.row_id, response.request_id
        );

        Ok(UpdateRowOutput {
            row_id: response.id.unwrap_or_else(|| self.row_id.clone()),
            request_id: response.request_id,
        })
    }
}

/// Result of [`DeleteRow`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRowOutput {
    pub row_id: String,
    pub request_id: String,
    pub deleted: bool,
}

/// Delete a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRow {
    pub doc_id: String,
    pub table_id: String,
    pub row_id: String,
}

impl DeleteRow {
    pub fn new(
        doc_id: impl Into<String>,
        table_id: impl Into<String>,
        row_id: impl Into<String>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            row_id: row_id.into(),
        }
    }

    pub async fn run(&self, conn: &Connection) -> Result<DeleteRowOutput> {
        let endpoint = row_path(&self.doc_id, &self.table_id, &self.row_id)?;
        info!(
            "Deleting row {} from table {} in document {}",
            self.row_id, self.table_id, self.doc_id
        );

        debug!("Sending delete request to: {}", endpoint);
        let response: Option<MutationResponse> = conn.delete(&endpoint).await?;
        let response = response.unwrap_or_default();

        info!(
            "Successfully deleted row {}. Request ID: {}",
            self.row_id, response.request_id
        );

        Ok(DeleteRowOutput {
            row_id: response.id.unwrap_or_else(|| self.row_id.clone()),
            request_id: response.request_id,
            deleted: true,
        })
    }
}
