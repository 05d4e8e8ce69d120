//! CLI runner - executes commands

use crate::cli::commands::{
    Cli, ColumnsCommand, Commands, OutputFormat, RowsCommand, TablesCommand, WebhookCommand,
};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::Connection;
use crate::models::{RowCell, RowData};
use crate::resources::{
    DeleteRow, GetColumn, GetRow, GetTable, InsertRows, ListColumns, ListRows, ListTables,
    TriggerWebhook, UpdateRow, UpsertRows, WebhookTarget,
};
use crate::retry::{retry_rate_limited, RetryPolicy};
use crate::types::JsonValue;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let conn = self.connection()?;
        let policy = RetryPolicy::default().max_retries(self.cli.retries);

        match &self.cli.command {
            Commands::Tables(cmd) => self.tables(&conn, &policy, cmd).await,
            Commands::Columns(cmd) => self.columns(&conn, &policy, cmd).await,
            Commands::Rows(cmd) => self.rows(&conn, &policy, cmd).await,
            Commands::Webhook(cmd) => self.webhook(&conn, &policy, cmd).await,
        }
    }

    /// Build the connection config from file, flags and environment
    ///
    /// Flags win over the file; the environment is only consulted for a
    /// missing token.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ConnectionConfig::from_file(path).context("--config")?,
            None => ConnectionConfig::new(""),
        };

        if let Some(token) = &self.cli.token {
            config.api_token.clone_from(token);
        }
        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }

        Ok(config.with_env_token())
    }

    fn connection(&self) -> Result<Connection> {
        let config = self.connection_config()?;
        debug!("Using config: {:?}", config);
        Connection::with_config(config)
    }

    async fn tables(&self, conn: &Connection, policy: &RetryPolicy, cmd: &TablesCommand) -> Result<()> {
        match cmd {
            TablesCommand::List {
                doc,
                pages,
                table_types,
            } => {
                let op = ListTables::new(doc)
                    .limit(pages.limit)
                    .fetch(pages.fetch_policy())
                    .table_types(table_types.clone());
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
            TablesCommand::Get { doc, table } => {
                let op = GetTable::new(doc, table);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
        }
    }

    async fn columns(
        &self,
        conn: &Connection,
        policy: &RetryPolicy,
        cmd: &ColumnsCommand,
    ) -> Result<()> {
        match cmd {
            ColumnsCommand::List {
                doc,
                table,
                pages,
                visible_only,
            } => {
                let op = ListColumns::new(doc, table)
                    .limit(pages.limit)
                    .fetch(pages.fetch_policy())
                    .visible_only(*visible_only);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
            ColumnsCommand::Get { doc, table, column } => {
                let op = GetColumn::new(doc, table, column);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
        }
    }

    async fn rows(&self, conn: &Connection, policy: &RetryPolicy, cmd: &RowsCommand) -> Result<()> {
        match cmd {
            RowsCommand::List {
                doc,
                table,
                pages,
                values,
                visible_only,
                sort_by,
                query,
            } => {
                let mut op = ListRows::new(doc, table)
                    .limit(pages.limit)
                    .fetch(pages.fetch_policy())
                    .use_column_names(values.use_column_names)
                    .value_format(values.value_format)
                    .visible_only(*visible_only);
                op.sort_by.clone_from(sort_by);
                op.query.clone_from(query);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
            RowsCommand::Get {
                doc,
                table,
                row,
                values,
            } => {
                let op = GetRow::new(doc, table, row)
                    .use_column_names(values.use_column_names)
                    .value_format(values.value_format);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
            RowsCommand::Insert { doc, table, rows } => {
                let op = InsertRows::new(doc, table, parse_rows(rows)?);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
            RowsCommand::Upsert {
                doc,
                table,
                key_columns,
                rows,
            } => {
                let op = UpsertRows::new(doc, table, key_columns.clone(), parse_rows(rows)?);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
            RowsCommand::Update {
                doc,
                table,
                row,
                cells,
            } => {
                let op = UpdateRow::new(doc, table, row, parse_cells(cells)?);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
            RowsCommand::Delete { doc, table, row } => {
                let op = DeleteRow::new(doc, table, row);
                let output = retry_rate_limited(policy, || op.run(conn)).await?;
                self.emit(&output)
            }
        }
    }

    async fn webhook(
        &self,
        conn: &Connection,
        policy: &RetryPolicy,
        cmd: &WebhookCommand,
    ) -> Result<()> {
        let WebhookCommand::Trigger {
            url,
            doc,
            rule,
            payload,
        } = cmd;

        let target = match (url, doc, rule) {
            (Some(url), _, _) => WebhookTarget::Url(url.clone()),
            (None, Some(doc_id), Some(rule_id)) => WebhookTarget::Rule {
                doc_id: doc_id.clone(),
                rule_id: rule_id.clone(),
            },
            _ => {
                return Err(Error::invalid_input(
                    "either --url or both --doc and --rule are required",
                ))
            }
        };

        let payload: JsonValue = serde_json::from_str(payload)
            .map_err(|e| Error::invalid_input(format!("payload is not valid JSON: {e}")))?;

        let op = TriggerWebhook::new(target, payload);
        let output = retry_rate_limited(policy, || op.run(conn)).await?;
        self.emit(&output)
    }

    /// Write a result to stdout in the selected format
    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        Ok(())
    }
}

/// Parse `--rows`: an array of `{"cells": [...]}` or of `{column: value}` objects
pub fn parse_rows(input: &str) -> Result<Vec<RowData>> {
    let value: JsonValue = serde_json::from_str(input)
        .map_err(|e| Error::invalid_input(format!("rows are not valid JSON: {e}")))?;

    let JsonValue::Array(items) = value else {
        return Err(Error::invalid_input("rows must be a JSON array"));
    };

    items
        .into_iter()
        .map(|item| {
            // A shorthand row may name a column `cells`; only an array is the wire shape
            if matches!(item.get("cells"), Some(JsonValue::Array(_))) {
                serde_json::from_value::<RowData>(item)
                    .map_err(|e| Error::invalid_input(format!("invalid row: {e}")))
            } else {
                parse_cell_value(item).map(RowData::new)
            }
        })
        .collect()
}

/// Parse `--cells`: a `{column: value}` object or an array of `{column, value}`
pub fn parse_cells(input: &str) -> Result<Vec<RowCell>> {
    let value: JsonValue = serde_json::from_str(input)
        .map_err(|e| Error::invalid_input(format!("cells are not valid JSON: {e}")))?;
    parse_cell_value(value)
}

fn parse_cell_value(value: JsonValue) -> Result<Vec<RowCell>> {
    match value {
        JsonValue::Object(map) => Ok(map
            .into_iter()
            .map(|(column, value)| RowCell::new(column, value))
            .collect()),
        JsonValue::Array(_) => serde_json::from_value(value)
            .map_err(|e| Error::invalid_input(format!("invalid cells: {e}"))),
        _ => Err(Error::invalid_input(
            "cells must be a JSON object or an array of {column, value}",
        )),
    }
}
