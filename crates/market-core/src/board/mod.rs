//! Shared state behind both order views.
//!
//! The board owns the last snapshot fetched from the authority and the
//! current query selection. It never edits the snapshot: a confirmed change
//! is followed by a refetch that replaces it wholesale, and a failed change
//! leaves it as it was.

mod in_flight;

pub use in_flight::{InFlight, InFlightGuard};

use crate::ViewError;
use market_authority::AuthorityService;
use market_order::{Transition, TransitionOutcome, TransitionSet};
use market_query::{
	compute_stats, page_items, query_orders, OrderStats, PageItem, QueryPage, QueryParams,
	QueryState, StatusFilter,
};
use market_types::{Order, OrderId, OrderScope, StatusCommand};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

/// Snapshot, query state and in-flight guard for one scope.
pub struct OrderBoard {
	authority: Arc<AuthorityService>,
	scope: OrderScope,
	transitions: TransitionSet,
	snapshot: RwLock<Vec<Order>>,
	query: RwLock<QueryState>,
	in_flight: InFlight,
}

impl OrderBoard {
	pub fn new(
		authority: Arc<AuthorityService>,
		scope: OrderScope,
		transitions: TransitionSet,
		query: QueryState,
	) -> Self {
		Self {
			authority,
			scope,
			transitions,
			snapshot: RwLock::new(Vec::new()),
			query: RwLock::new(query),
			in_flight: InFlight::default(),
		}
	}

	pub fn scope(&self) -> OrderScope {
		self.scope
	}

	pub fn transitions(&self) -> TransitionSet {
		self.transitions
	}

	/// Replaces the snapshot with a fresh fetch. On failure the previous
	/// snapshot stays in place.
	#[instrument(skip_all, fields(scope = %self.scope))]
	pub async fn refresh(&self) -> Result<(), ViewError> {
		let orders = self.authority.fetch_orders(&self.scope).await?;
		tracing::info!(count = orders.len(), "Refreshed orders");
		*self.snapshot.write().await = orders;
		Ok(())
	}

	/// Opens the board: clears search, filter and paging, then fetches.
	pub async fn enter(&self) -> Result<(), ViewError> {
		self.query.write().await.reset();
		self.refresh().await
	}

	/// The full snapshot in authority order.
	pub async fn orders(&self) -> Vec<Order> {
		self.snapshot.read().await.clone()
	}

	pub async fn order(&self, order_id: OrderId) -> Option<Order> {
		self.snapshot
			.read()
			.await
			.iter()
			.find(|order| order.id == order_id)
			.cloned()
	}

	/// The current page under the current query.
	pub async fn page(&self) -> QueryPage {
		let params = self.query_params().await;
		query_orders(&self.snapshot.read().await, &params)
	}

	/// Page-button layout for the current page.
	pub async fn page_items(&self) -> Vec<PageItem> {
		let page = self.page().await;
		page_items(page.page_number, page.total_pages)
	}

	/// Per-status counts over the whole snapshot, ignoring search and filter.
	pub async fn stats(&self) -> OrderStats {
		compute_stats(&self.snapshot.read().await)
	}

	pub async fn query_params(&self) -> QueryParams {
		self.query.read().await.params().clone()
	}

	pub async fn set_search_text(&self, text: impl Into<String>) {
		self.query.write().await.set_search_text(text);
	}

	pub async fn set_status_filter(&self, filter: StatusFilter) {
		self.query.write().await.set_status_filter(filter);
	}

	/// Parses `all` or a status name, then applies it.
	pub async fn set_status_filter_str(&self, filter: &str) -> Result<(), ViewError> {
		self.set_status_filter(filter.parse()?).await;
		Ok(())
	}

	pub async fn set_page_size(&self, size: usize) -> Result<(), ViewError> {
		self.query.write().await.set_page_size(size)?;
		Ok(())
	}

	pub async fn go_to_page(&self, page: u32) {
		self.query.write().await.go_to_page(page);
	}

	pub async fn next_page(&self) {
		let total_pages = self.page().await.total_pages;
		self.query.write().await.next_page(total_pages);
	}

	pub async fn previous_page(&self) {
		self.query.write().await.previous_page();
	}

	/// Returns true while a request for `order_id` is outstanding.
	pub fn is_busy(&self, order_id: OrderId) -> bool {
		self.in_flight.contains(order_id)
	}

	/// Checks a transition locally, sends it to the authority and refetches.
	///
	/// A transition that would not change the status is answered locally with
	/// [`TransitionOutcome::Unchanged`] and never reaches the authority. Once
	/// the authority has accepted a change it is reported as made, even if the
	/// refetch that follows fails.
	#[instrument(skip_all, fields(order_id = order_id, transition = %transition))]
	pub(crate) async fn run_transition(
		&self,
		order_id: OrderId,
		transition: Transition,
	) -> Result<TransitionOutcome, ViewError> {
		self.transitions.authorize(&transition)?;

		let Some(_guard) = self.in_flight.acquire(order_id) else {
			tracing::warn!("Blocked: request already in flight");
			return Err(ViewError::InFlight(order_id));
		};

		let current = self
			.order(order_id)
			.await
			.ok_or(ViewError::OrderNotFound(order_id))?;

		let outcome = market_order::plan(current.status, &transition).map_err(|e| {
			tracing::warn!(from = %current.status, error = %e, "Transition rejected");
			ViewError::from(e)
		})?;
		let TransitionOutcome::Changed(next) = outcome else {
			tracing::debug!(status = %current.status, "No change requested");
			return Ok(outcome);
		};

		match &transition {
			Transition::RequestCancellation { reason } => {
				let reason = market_order::cancellation::validate_reason(reason)?;
				self.authority
					.request_order_cancellation(order_id, &reason)
					.await?
			},
			Transition::Advance(status) => {
				self.authority
					.update_order_status(order_id, StatusCommand::Advance(*status))
					.await?
			},
			Transition::ApproveCancellation => {
				self.authority
					.update_order_status(order_id, StatusCommand::ApproveCancellation)
					.await?
			},
			Transition::RejectCancellation => {
				self.authority
					.update_order_status(order_id, StatusCommand::RejectCancellation)
					.await?
			},
		}

		tracing::info!(from = %current.status, to = %next, "Transition confirmed");
		if let Err(e) = self.refresh().await {
			tracing::warn!(error = %e, "Refetch after confirmed transition failed, snapshot is stale");
		}
		Ok(outcome)
	}
}
