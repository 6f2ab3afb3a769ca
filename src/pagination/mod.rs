//! Pagination module
//!
//! Cursor-based pagination over collection endpoints.
//!
//! # Overview
//!
//! A [`PageFetcher`] performs one request for one cursor. The
//! [`CursorPaginator`] exposes two modes built on that single primitive:
//!
//! - paged: one request, raw page with its cursors
//! - aggregated: loop from cursor `-1` until `next_cursor == 0` or the
//!   requested total is collected

mod paginator;
mod types;

pub use paginator::CursorPaginator;
pub use types::{Aggregate, Page, PageFetcher, Termination};
