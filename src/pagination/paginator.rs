//! Cursor paginator
//!
//! Walks a cursored collection one page at a time. Page N+1 cannot be
//! requested before page N's cursor is known, so there is never more than
//! one request in flight per aggregation.

use super::types::{Aggregate, Page, PageFetcher, Termination};
use crate::error::{Error, Result};
use crate::types::Cursor;
use std::time::{Duration, Instant};
use tracing::debug;

/// Drives a [`PageFetcher`] in paged or aggregated mode
#[derive(Debug, Clone)]
pub struct CursorPaginator<F> {
    fetcher: F,
    budget: Option<Duration>,
}

impl<F: PageFetcher> CursorPaginator<F> {
    /// Create a paginator over the given fetcher
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            budget: None,
        }
    }

    /// Limit the wall-clock time an aggregation may take.
    ///
    /// The budget is checked before each page request, never while one is
    /// in flight.
    #[must_use]
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Get the underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch a single page. Cursors are returned exactly as received.
    pub async fn fetch_page(&self, params: &F::Params, cursor: Cursor) -> Result<Page<F::Item>> {
        self.fetcher.fetch_page(params, cursor).await
    }

    /// Fetch pages from the start until exhaustion or `total_count` items
    pub async fn fetch_all(
        &self,
        params: &F::Params,
        total_count: Option<usize>,
    ) -> Result<Vec<F::Item>> {
        self.fetch_all_detailed(params, total_count)
            .await
            .map(Aggregate::into_items)
    }

    /// Like [`fetch_all`](Self::fetch_all) but also reports how it ended.
    ///
    /// `total_count` is a hard cap: the last page is truncated so the result
    /// holds exactly `total_count` items when enough are available. A
    /// `total_count` of zero returns immediately without a request. Any
    /// fetch error discards everything collected so far.
    pub async fn fetch_all_detailed(
        &self,
        params: &F::Params,
        total_count: Option<usize>,
    ) -> Result<Aggregate<F::Item>> {
        if total_count == Some(0) {
            debug!("total_count is 0, nothing to fetch");
            return Ok(Aggregate {
                items: Vec::new(),
                termination: Termination::TotalReached,
                pages: 0,
            });
        }

        let started = Instant::now();
        let mut items = Vec::new();
        let mut cursor = Cursor::START;
        let mut pages: u32 = 0;

        loop {
            if let Some(budget) = self.budget {
                if started.elapsed() >= budget {
                    return Err(Error::BudgetExceeded {
                        budget_ms: budget.as_millis() as u64,
                        pages,
                    });
                }
            }

            let page = self.fetcher.fetch_page(params, cursor).await?;
            pages += 1;

            debug!(
                page = pages,
                cursor = %cursor,
                next_cursor = %page.next_cursor,
                items = page.len(),
                "Fetched page"
            );

            let next_cursor = page.next_cursor;
            items.extend(page.items);

            if let Some(total) = total_count {
                if items.len() >= total {
                    items.truncate(total);
                    debug!(pages, total, "Requested total reached");
                    return Ok(Aggregate {
                        items,
                        termination: Termination::TotalReached,
                        pages,
                    });
                }
            }

            if next_cursor.is_end() {
                debug!(pages, items = items.len(), "Collection exhausted");
                return Ok(Aggregate {
                    items,
                    termination: Termination::Exhausted,
                    pages,
                });
            }

            cursor = next_cursor;
        }
    }
}
