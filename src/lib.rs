// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # coda-connect
//!
//! A typed async client for the Coda REST API: documents hold tables, tables
//! hold columns and rows.
//!
//! ## Features
//!
//! - **Typed Operations**: list/get tables and columns, list/get/insert/upsert/
//!   update/delete rows, trigger webhook automations
//! - **Transparent Pagination**: follow `nextPageLink` cursors lazily or fold
//!   every page into one collection
//! - **Typed Errors**: 401/404/429/other statuses map onto [`Error`] variants
//!   callers can branch on, with the `Retry-After` hint preserved
//! - **Optional Pacing**: client-side token bucket rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coda_connect::resources::ListRows;
//! use coda_connect::{Connection, FetchPolicy, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let conn = Connection::new(std::env::var("CODA_API_TOKEN").unwrap_or_default())?;
//!
//!     let rows = ListRows::new("AbCdEf", "grid-123")
//!         .use_column_names(true)
//!         .fetch(FetchPolicy::AllPages)
//!         .run(&conn)
//!         .await?;
//!
//!     println!("{} rows over {} pages", rows.total_count(), rows.page_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    resources / cli                       │
//! │  tables    columns    rows    automations    retry       │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//! ┌──────────────┬────────────┴──────┬───────────────────────┐
//! │  pagination  │       http        │        models         │
//! ├──────────────┼───────────────────┼───────────────────────┤
//! │ FetchPolicy  │ Connection        │ Table, Column, Row    │
//! │ page stream  │ status → Error    │ PagedResponse         │
//! │ fold         │ pacing            │ mutation bodies       │
//! └──────────────┴───────────────────┴───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection configuration
pub mod config;

/// Wire models
pub mod models;

/// Authenticated HTTP connection with optional pacing
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Typed resource operations
pub mod resources;

/// Caller-side retry for rate-limited calls
pub mod retry;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use http::{Connection, RawResponse, RateLimiterConfig};
pub use models::{Column, NoContent, PagedResponse, Row, RowCell, RowData, Table};
pub use pagination::{FetchPolicy, PageCollection};
pub use retry::{retry_rate_limited, RetryPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
