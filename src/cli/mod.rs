//! CLI module
//!
//! Command-line interface over the resource operations.
//!
//! # Commands
//!
//! - `tables list|get` - Tables of a document
//! - `columns list|get` - Columns of a table
//! - `rows list|get|insert|upsert|update|delete` - Rows of a table
//! - `webhook trigger` - Trigger a webhook-invoked automation
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;
mod runner;

pub use commands::{
    Cli, ColumnsCommand, Commands, OutputFormat, PageArgs, RowsCommand, TablesCommand, ValueArgs,
    WebhookCommand,
};
pub use runner::{parse_cells, parse_rows, Runner};

use crate::error::{Error, ErrorKind};

/// Process exit code for a failed command
///
/// Rate limiting gets its own code so scripts can back off and retry.
pub fn exit_code(err: &Error) -> i32 {
    match err.kind() {
        ErrorKind::RateLimited => 2,
        _ => 1,
    }
}
