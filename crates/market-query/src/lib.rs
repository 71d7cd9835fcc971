//! Query engine and stats aggregation over order snapshots.
//!
//! Everything here is a pure function of an order slice and a set of query
//! parameters. Customer and vendor views share this crate unchanged; they only
//! differ in sort order and page-size policy.

use thiserror::Error;

pub mod pagination;
pub mod query;
pub mod state;
pub mod stats;

pub use pagination::{page_items, total_pages, PageItem};
pub use query::{
	matches_search, query_orders, QueryPage, QueryParams, SortOrder, StatusFilter,
	DEFAULT_PAGE_SIZE,
};
pub use state::{PageSizePolicy, QueryState};
pub use stats::{compute_stats, OrderStats, StatTile};

/// Errors raised while building query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
	#[error("Unknown status filter: {0}")]
	UnknownStatusFilter(String),
	#[error("Page size {0} is not allowed")]
	InvalidPageSize(usize),
	#[error("Page size cannot be changed in this view")]
	PageSizeFixed,
}
