//! Page walking over a [`Connection`]

use super::types::{FetchPolicy, NextPage, PageCollection};
use crate::error::Result;
use crate::http::Connection;
use crate::models::PagedResponse;
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Position of a walk between two requests
#[derive(Debug, Clone)]
struct WalkState {
    target: Option<String>,
    pages_fetched: u32,
}

impl Connection {
    /// Lazily fetch pages starting at `endpoint`
    ///
    /// The first request always happens once the stream is polled. Each later
    /// request targets the previous page's `nextPageLink` verbatim, or the first
    /// URL with `pageToken` replaced when only a token came back. The stream ends
    /// when no continuation is advertised or `policy` forbids another page.
    /// Empty pages do not end the walk.
    pub fn pages<'a, T>(
        &'a self,
        endpoint: &str,
        policy: FetchPolicy,
    ) -> impl Stream<Item = Result<PagedResponse<T>>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        let first = self.resolve(endpoint);
        let start = WalkState {
            target: Some(first.clone()),
            pages_fetched: 0,
        };

        stream::try_unfold(start, move |state| {
            let first = first.clone();
            async move { next_page(self, &first, policy, state).await }
        })
    }

    /// Fetch pages per `policy` and fold their items in order
    pub async fn fetch_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        policy: FetchPolicy,
    ) -> Result<PageCollection<T>> {
        let collection = self
            .pages(endpoint, policy)
            .try_fold(PageCollection::new(), |mut acc, page| async move {
                acc.push_page(page);
                Ok(acc)
            })
            .await?;

        debug!(
            "Collected {} item(s) across {} page(s)",
            collection.total_count(),
            collection.page_count
        );
        Ok(collection)
    }
}

async fn next_page<T: DeserializeOwned>(
    conn: &Connection,
    first: &str,
    policy: FetchPolicy,
    state: WalkState,
) -> Result<Option<(PagedResponse<T>, WalkState)>> {
    let Some(target) = state.target else {
        return Ok(None);
    };

    let page_number = state.pages_fetched + 1;
    debug!("Fetching page {} from: {}", page_number, target);

    let page: PagedResponse<T> = conn.get(&target).await?;
    debug!("Retrieved {} item(s) from page {}", page.items.len(), page_number);

    let next = if policy.allows(page_number) {
        NextPage::from_page(&page).target(first)?
    } else {
        None
    };

    Ok(Some((
        page,
        WalkState {
            target: next,
            pages_fetched: page_number,
        },
    )))
}
