//! Ephemeral query state held by a view.
//!
//! Every change to what is being looked at (search text, status filter, page
//! size) sends the view back to page 1, so a caller can never be left on a
//! page that no longer exists for the new result set.

use crate::query::{QueryParams, SortOrder, StatusFilter, DEFAULT_PAGE_SIZE};
use crate::QueryError;

/// How a view chooses its page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSizePolicy {
	/// The page size cannot be changed.
	Fixed(usize),
	/// Starts at `default`; may be changed to any of `options`, or to any
	/// size in `1..=max` when `options` is empty.
	Configurable {
		default: usize,
		options: Vec<usize>,
		max: usize,
	},
}

impl PageSizePolicy {
	pub fn initial(&self) -> usize {
		match self {
			PageSizePolicy::Fixed(size) => *size,
			PageSizePolicy::Configurable { default, .. } => *default,
		}
	}

	fn check(&self, size: usize) -> Result<(), QueryError> {
		match self {
			PageSizePolicy::Fixed(_) => Err(QueryError::PageSizeFixed),
			PageSizePolicy::Configurable { max, .. } if size == 0 || size > *max => {
				Err(QueryError::InvalidPageSize(size))
			},
			PageSizePolicy::Configurable { options, .. }
				if !options.is_empty() && !options.contains(&size) =>
			{
				Err(QueryError::InvalidPageSize(size))
			},
			PageSizePolicy::Configurable { .. } => Ok(()),
		}
	}
}

impl Default for PageSizePolicy {
	fn default() -> Self {
		PageSizePolicy::Fixed(DEFAULT_PAGE_SIZE)
	}
}

/// Current search/filter/page selection of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
	params: QueryParams,
	policy: PageSizePolicy,
}

impl QueryState {
	pub fn new(sort_order: SortOrder, policy: PageSizePolicy) -> Self {
		Self {
			params: QueryParams {
				sort_order,
				page_size: policy.initial(),
				..QueryParams::default()
			},
			policy,
		}
	}

	pub fn params(&self) -> &QueryParams {
		&self.params
	}

	pub fn policy(&self) -> &PageSizePolicy {
		&self.policy
	}

	/// Back to the initial selection.
	pub fn reset(&mut self) {
		*self = Self::new(self.params.sort_order, self.policy.clone());
	}

	pub fn set_search_text(&mut self, text: impl Into<String>) {
		self.params.search_text = text.into();
		self.params.page_number = 1;
	}

	pub fn set_status_filter(&mut self, filter: StatusFilter) {
		self.params.status_filter = filter;
		self.params.page_number = 1;
	}

	pub fn set_page_size(&mut self, size: usize) -> Result<(), QueryError> {
		self.policy.check(size)?;
		self.params.page_size = size;
		self.params.page_number = 1;
		Ok(())
	}

	/// Selects a page; the query clamps it against the live result set.
	pub fn go_to_page(&mut self, page: u32) {
		self.params.page_number = page.max(1);
	}

	pub fn next_page(&mut self, total_pages: u32) {
		self.params.page_number = self.params.page_number.saturating_add(1).min(total_pages.max(1));
	}

	pub fn previous_page(&mut self) {
		self.params.page_number = self.params.page_number.saturating_sub(1).max(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::query_orders;
	use market_types::testing::orders;
	use market_types::OrderStatus::*;

	fn vendor_state() -> QueryState {
		QueryState::new(
			SortOrder::Insertion,
			PageSizePolicy::Configurable {
				default: 5,
				options: vec![5, 10, 20],
				max: 100,
			},
		)
	}

	#[test]
	fn test_filter_change_resets_page() {
		let mut state = vendor_state();
		state.go_to_page(3);
		state.set_status_filter(StatusFilter::Only(Pending));
		assert_eq!(state.params().page_number, 1);

		state.go_to_page(2);
		state.set_search_text("ord");
		assert_eq!(state.params().page_number, 1);

		state.go_to_page(2);
		state.set_page_size(10).unwrap();
		assert_eq!(state.params().page_number, 1);
		assert_eq!(state.params().page_size, 10);
	}

	#[test]
	fn test_filter_change_shows_first_page_of_new_set() {
		let all = orders(&[
			Pending, Shipped, Shipped, Shipped, Shipped, Shipped, Pending, Pending, Shipped, Shipped,
			Shipped, Pending,
		]);
		let mut state = vendor_state();
		state.go_to_page(3);
		state.set_status_filter(StatusFilter::Only(Pending));

		let page = query_orders(&all, state.params());
		assert_eq!(page.page_number, 1);
		assert_eq!(page.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 7, 8, 12]);
	}

	#[test]
	fn test_page_size_policy() {
		let mut state = vendor_state();
		assert!(matches!(
			state.set_page_size(7),
			Err(QueryError::InvalidPageSize(7))
		));
		assert_eq!(state.params().page_size, 5);

		let mut customer = QueryState::new(SortOrder::NewestFirst, PageSizePolicy::default());
		assert_eq!(customer.params().page_size, 5);
		assert!(matches!(
			customer.set_page_size(10),
			Err(QueryError::PageSizeFixed)
		));

		let mut open = QueryState::new(
			SortOrder::Insertion,
			PageSizePolicy::Configurable {
				default: 5,
				options: vec![],
				max: 100,
			},
		);
		assert!(open.set_page_size(13).is_ok());
		assert!(open.set_page_size(100).is_ok());
		assert!(matches!(
			open.set_page_size(101),
			Err(QueryError::InvalidPageSize(101))
		));
		assert!(open.set_page_size(0).is_err());
	}

	#[test]
	fn test_paging_and_reset() {
		let mut state = vendor_state();
		state.next_page(3);
		state.next_page(3);
		state.next_page(3);
		assert_eq!(state.params().page_number, 3);
		state.previous_page();
		assert_eq!(state.params().page_number, 2);

		state.set_search_text("x");
		state.set_page_size(20).unwrap();
		state.reset();
		assert_eq!(state, vendor_state());
	}

	#[test]
	fn test_next_page_from_last_representable_page() {
		let mut state = vendor_state();
		state.go_to_page(u32::MAX);
		state.next_page(u32::MAX);
		assert_eq!(state.params().page_number, u32::MAX);
	}
}
