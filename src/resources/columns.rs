//! Column operations

use super::{build_path, require_id, require_limit, Query, DEFAULT_LIMIT};
use crate::error::Result;
use crate::http::Connection;
use crate::models::Column;
use crate::pagination::{FetchPolicy, PageCollection};
use tracing::info;

/// List the columns of a table
#[derive(Debug, Clone, PartialEq)]
pub struct ListColumns {
    pub doc_id: String,
    pub table_id: String,
    pub limit: u32,
    pub fetch: FetchPolicy,
    /// Only columns visible in the table's UI
    pub visible_only: bool,
}

impl ListColumns {
    pub fn new(doc_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            limit: DEFAULT_LIMIT,
            fetch: FetchPolicy::default(),
            visible_only: false,
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
    pub fn visible_only(mut self, visible_only: bool) -> Self {
        self.visible_only = visible_only;
        self
    }

    pub fn endpoint(&self) -> Result<String> {
        let doc_id = require_id("doc_id", &self.doc_id)?;
        let table_id = require_id("table_id", &self.table_id)?;
        let limit = require_limit(self.limit)?;

        let query = Query::new()
            .pair("limit", limit)
            .flag("visibleOnly", self.visible_only);

        Ok(query.finish(build_path(&["docs", doc_id, "tables", table_id, "columns"])))
    }

    pub async fn run(&self, conn: &Connection) -> Result<PageCollection<Column>> {
        let endpoint = self.endpoint()?;
        info!(
            "Listing columns for table {} in document {}",
            self.table_id, self.doc_id
        );

        let columns: PageCollection<Column> = conn.fetch_pages(&endpoint, self.fetch).await?;

        info!(
            "Successfully retrieved {} column(s) across {} page(s)",
            columns.total_count(),
            columns.page_count
        );
        Ok(columns)
    }
}

/// Get one column by id or name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetColumn {
    pub doc_id: String,
    pub table_id: String,
    pub column_id: String,
}

impl GetColumn {
    pub fn new(
        doc_id: impl Into<String>,
        table_id: impl Into<String>,
        column_id: impl Into<String>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
            column_id: column_id.into(),
        }
    }

    pub fn endpoint(&self) -> Result<String> {
        let doc_id = require_id("doc_id", &self.doc_id)?;
        let table_id = require_id("table_id", &self.table_id)?;
        let column_id = require_id("column_id", &self.column_id)?;
        Ok(build_path(&[
            "docs", doc_id, "tables", table_id, "columns", column_id,
        ]))
    }

    pub async fn run(&self, conn: &Connection) -> Result<Column> {
        let endpoint = self.endpoint()?;
        info!(
            "Getting column {} from table {} in document {}",
            self.column_id, self.table_id, self.doc_id
        );

        let column: Column = conn.get(&endpoint).await?;

        info!(
            "Successfully retrieved column: {}",
            column.name.as_deref().unwrap_or_default()
        );
        Ok(column)
    }
}
