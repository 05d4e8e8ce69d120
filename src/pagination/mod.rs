//! Pagination module
//!
//! Listing endpoints return one [`PagedResponse`](crate::models::PagedResponse)
//! per request. A walk starts at the caller's first endpoint and follows
//! `nextPageLink` verbatim (or replays `nextPageToken` as `pageToken`) until the
//! server stops advertising pages or the [`FetchPolicy`] says stop.
//!
//! # Overview
//!
//! - [`Connection::pages`](crate::http::Connection::pages) yields pages lazily
//! - [`Connection::fetch_pages`](crate::http::Connection::fetch_pages) folds
//!   them into a [`PageCollection`]
//!
//! Walks are sequential by nature: each request depends on the previous page.

mod types;
mod walker;

pub use types::{with_page_token, FetchPolicy, NextPage, PageCollection, PAGE_TOKEN_PARAM};
