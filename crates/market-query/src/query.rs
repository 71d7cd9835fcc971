//! Search, filter, sort and paginate over an order snapshot.

use crate::pagination::{clamp_page, total_pages};
use crate::QueryError;
use market_types::{Order, OrderStatus};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Page size used when nothing else is configured, and always for customers.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Which statuses a query keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
	#[default]
	All,
	Only(OrderStatus),
}

impl StatusFilter {
	pub fn matches(&self, status: OrderStatus) -> bool {
		match self {
			StatusFilter::All => true,
			StatusFilter::Only(wanted) => *wanted == status,
		}
	}
}

impl FromStr for StatusFilter {
	type Err = QueryError;

	/// Accepts the sentinel `all` or any status name, case-insensitively.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.trim().eq_ignore_ascii_case("all") {
			return Ok(StatusFilter::All);
		}
		s.parse::<OrderStatus>()
			.map(StatusFilter::Only)
			.map_err(|_| QueryError::UnknownStatusFilter(s.to_string()))
	}
}

impl fmt::Display for StatusFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StatusFilter::All => f.write_str("all"),
			StatusFilter::Only(status) => f.write_str(status.as_str()),
		}
	}
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	/// Keep the order the authority returned.
	#[default]
	Insertion,
	/// Most recent `order_date` first; ties keep insertion order.
	NewestFirst,
}

/// Inputs of a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
	/// Matched case-insensitively against the order label, customer name and
	/// store name.
	pub search_text: String,
	pub status_filter: StatusFilter,
	pub sort_order: SortOrder,
	/// 1-based.
	pub page_number: u32,
	pub page_size: usize,
}

impl Default for QueryParams {
	fn default() -> Self {
		Self {
			search_text: String::new(),
			status_filter: StatusFilter::All,
			sort_order: SortOrder::Insertion,
			page_number: 1,
			page_size: DEFAULT_PAGE_SIZE,
		}
	}
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
	pub orders: Vec<Order>,
	/// Matches across all pages.
	pub total_count: usize,
	pub total_pages: u32,
	/// The page actually returned, after clamping.
	pub page_number: u32,
	pub page_size: usize,
}

impl QueryPage {
	pub fn has_previous(&self) -> bool {
		self.page_number > 1
	}

	pub fn has_next(&self) -> bool {
		self.page_number < self.total_pages
	}
}

/// Returns true if `order` matches the search text.
pub fn matches_search(order: &Order, search_text: &str) -> bool {
	let needle = search_text.trim().to_lowercase();
	if needle.is_empty() {
		return true;
	}
	order.label().to_lowercase().contains(&needle)
		|| order.customer_name.to_lowercase().contains(&needle)
		|| order.store_name.to_lowercase().contains(&needle)
}

/// Runs a query: filter, then sort, then paginate.
///
/// A page number past the end is clamped to the last page; an empty match set
/// yields one empty page.
pub fn query_orders(orders: &[Order], params: &QueryParams) -> QueryPage {
	let mut matched: Vec<&Order> = orders
		.iter()
		.filter(|order| params.status_filter.matches(order.status))
		.filter(|order| matches_search(order, &params.search_text))
		.collect();

	if params.sort_order == SortOrder::NewestFirst {
		matched.sort_by(|a, b| b.order_date.cmp(&a.order_date));
	}

	let page_size = params.page_size.max(1);
	let total_count = matched.len();
	let total_pages = total_pages(total_count, page_size);
	let page_number = clamp_page(params.page_number, total_pages);
	let offset = (page_number as usize - 1) * page_size;

	QueryPage {
		orders: matched
			.into_iter()
			.skip(offset)
			.take(page_size)
			.cloned()
			.collect(),
		total_count,
		total_pages,
		page_number,
		page_size,
	}
}
