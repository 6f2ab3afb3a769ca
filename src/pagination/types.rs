//! Pagination types and traits
//!
//! Defines the page shape, the fetch seam and the aggregation outcome.

use crate::error::Result;
use crate::types::Cursor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One server response unit: a bounded list of items plus cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Cursor for the following page (`0` when there is none)
    pub next_cursor: Cursor,
    /// Cursor for the preceding page (`0` when there is none)
    pub previous_cursor: Cursor,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next_cursor: Cursor, previous_cursor: Cursor) -> Self {
        Self {
            items,
            next_cursor,
            previous_cursor,
        }
    }

    /// A page with no items and no neighbours
    pub fn empty() -> Self {
        Self::new(Vec::new(), Cursor::END, Cursor::END)
    }

    /// True when this is the last page of the collection
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_end()
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Split into `(next_cursor, previous_cursor, items)`
    pub fn into_parts(self) -> (Cursor, Cursor, Vec<T>) {
        (self.next_cursor, self.previous_cursor, self.items)
    }
}

/// Fetches exactly one page of a cursored collection.
///
/// Implementations own authentication, transport and decoding. The
/// paginator only threads the cursor and never inspects `Params`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Endpoint parameters (identifier, page size, flags)
    type Params: Send + Sync;
    /// Decoded item type
    type Item: Send;

    /// Perform one request for the page at `cursor`
    async fn fetch_page(&self, params: &Self::Params, cursor: Cursor)
        -> Result<Page<Self::Item>>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    type Params = F::Params;
    type Item = F::Item;

    async fn fetch_page(
        &self,
        params: &Self::Params,
        cursor: Cursor,
    ) -> Result<Page<Self::Item>> {
        (**self).fetch_page(params, cursor).await
    }
}

/// Why an aggregation stopped successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The server returned `next_cursor == 0`
    Exhausted,
    /// The requested total was collected
    TotalReached,
}

/// Result of a full aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate<T> {
    /// Concatenated items, server order
    pub items: Vec<T>,
    /// How the loop ended
    pub termination: Termination,
    /// Number of requests issued
    pub pages: u32,
}

impl<T> Aggregate<T> {
    /// Discard the bookkeeping and keep the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
