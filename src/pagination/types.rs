//! Pagination types
//!
//! Defines the stop/continue policy, the next-page decision and the folded
//! result of a walk.

use crate::error::Result;
use crate::models::PagedResponse;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::num::NonZeroU32;
use url::Url;

/// Query parameter the API reads the page cursor from
pub const PAGE_TOKEN_PARAM: &str = "pageToken";

/// How many pages a walk may fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Exactly one request, whatever the server advertises
    #[default]
    FirstPage,
    /// Follow the cursor chain to the end
    AllPages,
    /// Follow the chain for at most this many pages
    UpTo(NonZeroU32),
}

impl FetchPolicy {
    /// `AllPages` when `fetch_all` is set, `FirstPage` otherwise
    pub fn from_flag(fetch_all: bool) -> Self {
        if fetch_all {
            Self::AllPages
        } else {
            Self::FirstPage
        }
    }

    /// Whether another page may be fetched after `pages_fetched` pages
    pub fn allows(self, pages_fetched: u32) -> bool {
        match self {
            Self::FirstPage => pages_fetched == 0,
            Self::AllPages => true,
            Self::UpTo(max) => pages_fetched < max.get(),
        }
    }
}

/// Where the next page lives, as advertised by the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Full URL to request as-is
    Link(String),
    /// Cursor to replay against the first endpoint
    Token(String),
    /// No more pages
    Done,
}

impl NextPage {
    /// Read the continuation from a page; the link wins over the token
    pub fn from_page<T>(page: &PagedResponse<T>) -> Self {
        if let Some(link) = &page.next_page_link {
            return Self::Link(link.clone());
        }
        match &page.next_page_token {
            Some(token) => Self::Token(token.clone()),
            None => Self::Done,
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Concrete URL of the next request, given the walk's first URL
    pub fn target(&self, first_url: &str) -> Result<Option<String>> {
        match self {
            Self::Link(link) => Ok(Some(link.clone())),
            Self::Token(token) => with_page_token(first_url, token).map(Some),
            Self::Done => Ok(None),
        }
    }
}

/// Set (or replace) the `pageToken` query parameter of a URL
pub fn with_page_token(url: &str, token: &str) -> Result<String> {
    let mut url = Url::parse(url)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_TOKEN_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(PAGE_TOKEN_PARAM, token);

    Ok(url.into())
}

/// Items accumulated over a walk, in server order across pages
#[derive(Debug, Clone, PartialEq)]
pub struct PageCollection<T> {
    pub items: Vec<T>,
    /// Pages actually fetched
    pub page_count: u32,
}

impl<T> PageCollection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            page_count: 0,
        }
    }

    /// Fold one page in
    pub fn push_page(&mut self, page: PagedResponse<T>) {
        self.items.extend(page.items);
        self.page_count += 1;
    }

    /// Number of items across all pages
    pub fn total_count(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PageCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for PageCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PageCollection", 3)?;
        state.serialize_field("items", &self.items)?;
        state.serialize_field("totalCount", &self.total_count())?;
        state.serialize_field("pageCount", &self.page_count)?;
        state.end()
    }
}
