//! CLI commands and argument parsing

use crate::pagination::FetchPolicy;
use crate::resources::DEFAULT_LIMIT;
use crate::types::ValueFormat;
use clap::{Args, Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Command-line client for the Coda API
#[derive(Parser, Debug)]
#[command(name = "coda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection config file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API token (falls back to the config file, then CODA_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Retry rate-limited calls up to this many times
    #[arg(long, global = true, default_value = "0")]
    pub retries: u32,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tables of a document
    #[command(subcommand)]
    Tables(TablesCommand),

    /// Columns of a table
    #[command(subcommand)]
    Columns(ColumnsCommand),

    /// Rows of a table
    #[command(subcommand)]
    Rows(RowsCommand),

    /// Webhook-invoked automations
    #[command(subcommand)]
    Webhook(WebhookCommand),
}

#[derive(Subcommand, Debug)]
pub enum TablesCommand {
    /// List tables and views
    List {
        #[arg(long)]
        doc: String,

        #[command(flatten)]
        pages: PageArgs,

        /// Only these table types (comma-separated: table, view)
        #[arg(long, value_delimiter = ',')]
        table_types: Vec<String>,
    },

    /// Get one table
    Get {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnsCommand {
    /// List columns
    List {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        #[command(flatten)]
        pages: PageArgs,

        /// Only columns visible in the UI
        #[arg(long)]
        visible_only: bool,
    },

    /// Get one column
    Get {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        #[arg(long)]
        column: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RowsCommand {
    /// List rows
    List {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        #[command(flatten)]
        pages: PageArgs,

        #[command(flatten)]
        values: ValueArgs,

        /// Only columns visible in the UI
        #[arg(long)]
        visible_only: bool,

        /// Sort order
        #[arg(long)]
        sort_by: Option<String>,

        /// Row filter, e.g. `c-abc:"Done"`
        #[arg(long)]
        query: Option<String>,
    },

    /// Get one row
    Get {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        #[arg(long)]
        row: String,

        #[command(flatten)]
        values: ValueArgs,
    },

    /// Insert rows
    Insert {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        /// JSON array of rows: `[{"c-1": "x"}]` or `[{"cells": [...]}]`
        #[arg(long)]
        rows: String,
    },

    /// Insert rows, updating those matching on key columns
    Upsert {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        /// Key columns (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        key_columns: Vec<String>,

        /// JSON array of rows: `[{"c-1": "x"}]` or `[{"cells": [...]}]`
        #[arg(long)]
        rows: String,
    },

    /// Update one row
    Update {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        #[arg(long)]
        row: String,

        /// JSON cells: `{"c-1": "x"}` or `[{"column": "c-1", "value": "x"}]`
        #[arg(long)]
        cells: String,
    },

    /// Delete one row
    Delete {
        #[arg(long)]
        doc: String,

        #[arg(long)]
        table: String,

        #[arg(long)]
        row: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum WebhookCommand {
    /// POST a payload to an automation webhook
    Trigger {
        /// Full webhook URL
        #[arg(long, conflicts_with_all = ["doc", "rule"], required_unless_present = "rule")]
        url: Option<String>,

        #[arg(long, requires = "rule")]
        doc: Option<String>,

        /// Automation rule id
        #[arg(long, requires = "doc")]
        rule: Option<String>,

        /// JSON payload
        #[arg(long, default_value = "{}")]
        payload: String,
    },
}

/// Paging flags shared by list commands
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page size
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Follow pagination to the last page
    #[arg(long)]
    pub all: bool,

    /// Follow pagination for at most this many pages
    #[arg(long, conflicts_with = "all")]
    pub max_pages: Option<NonZeroU32>,
}

impl PageArgs {
    /// Fetch policy selected by the flags
    pub fn fetch_policy(&self) -> FetchPolicy {
        match self.max_pages {
            Some(max) => FetchPolicy::UpTo(max),
            None => FetchPolicy::from_flag(self.all),
        }
    }
}

/// Row value rendering flags
#[derive(Args, Debug, Clone)]
pub struct ValueArgs {
    /// Key values by column name instead of id
    #[arg(long)]
    pub use_column_names: bool,

    /// simple, simpleWithArrays or rich
    #[arg(long, default_value = "simple")]
    pub value_format: ValueFormat,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
