//! Table operations

use super::{build_path, require_id, require_limit, Query, DEFAULT_LIMIT};
use crate::error::Result;
use crate::http::Connection;
use crate::models::Table;
use crate::pagination::{FetchPolicy, PageCollection};
use tracing::info;

/// List the tables of a document
#[derive(Debug, Clone, PartialEq)]
pub struct ListTables {
    pub doc_id: String,
    pub limit: u32,
    pub fetch: FetchPolicy,
    /// Restrict to `table` and/or `view`
    pub table_types: Vec<String>,
}

impl ListTables {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            limit: DEFAULT_LIMIT,
            fetch: FetchPolicy::default(),
            table_types: Vec::new(),
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
    pub fn table_types(mut self, types: Vec<String>) -> Self {
        self.table_types = types;
        self
    }

    /// Endpoint of the first page
    pub fn endpoint(&self) -> Result<String> {
        let doc_id = require_id("doc_id", &self.doc_id)?;
        let limit = require_limit(self.limit)?;

        let table_types = self.table_types.join(",");
        let query = Query::new()
            .pair("limit", limit)
            .optional("tableTypes", Some(table_types.as_str()));

        Ok(query.finish(build_path(&["docs", doc_id, "tables"])))
    }

    pub async fn run(&self, conn: &Connection) -> Result<PageCollection<Table>> {
        let endpoint = self.endpoint()?;
        info!("Listing tables in document {}", self.doc_id);

        let tables: PageCollection<Table> = conn.fetch_pages(&endpoint, self.fetch).await?;

        info!(
            "Successfully retrieved {} table(s) across {} page(s)",
            tables.total_count(),
            tables.page_count
        );
        Ok(tables)
    }
}

/// Get one table by id or name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTable {
    pub doc_id: String,
    pub table_id: String,
}

impl GetTable {
    pub fn new(doc_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            table_id: table_id.into(),
        }
    }

    pub fn endpoint(&self) -> Result<String> {
        let doc_id = require_id("doc_id", &self.doc_id)?;
        let table_id = require_id("table_id", &self.table_id)?;
        Ok(build_path(&["docs", doc_id, "tables", table_id]))
    }

    pub async fn run(&self, conn: &Connection) -> Result<Table> {
        let endpoint = self.endpoint()?;
        info!("Getting table {} in document {}", self.table_id, self.doc_id);

        let table: Table = conn.get(&endpoint).await?;

        info!(
            "Successfully retrieved table: {}",
            table.name.as_deref().unwrap_or_default()
        );
        Ok(table)
    }
}
