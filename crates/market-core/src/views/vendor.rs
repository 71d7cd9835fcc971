//! The vendor's order table.

use super::require_role;
use crate::{OrderBoard, ViewError};
use market_authority::AuthorityService;
use market_order::{advance_options, cancellation, TransitionOutcome, TransitionSet};
use market_query::{PageSizePolicy, QueryState, SortOrder};
use market_types::{Order, OrderId, OrderStatus, Role, Session, StatusCommand};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// One happy-path button in the "Update Status" menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusButton {
	pub status: OrderStatus,
	pub label: &'static str,
	pub enabled: bool,
}

/// What the vendor can do with one order right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorActions {
	/// All four happy-path statuses; the current one and any earlier one are
	/// disabled.
	pub status_buttons: Vec<StatusButton>,
	/// False once the order is delivered or cancelled.
	pub can_update_status: bool,
	pub can_adjudicate_cancellation: bool,
	pub busy: bool,
}

/// All orders of the vendor's store, in authority order.
pub struct VendorOrderView {
	session: Session,
	board: OrderBoard,
}

impl VendorOrderView {
	pub fn open(
		session: Session,
		authority: Arc<AuthorityService>,
		page_size: PageSizePolicy,
	) -> Result<Self, ViewError> {
		require_role(&session, Role::Vendor, "vendor orders")?;
		let board = OrderBoard::new(
			authority,
			session.scope(),
			TransitionSet::for_role(Role::Vendor),
			QueryState::new(SortOrder::Insertion, page_size),
		);
		Ok(Self { session, board })
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Search, filter, paging and stats for this view.
	pub fn board(&self) -> &OrderBoard {
		&self.board
	}

	pub async fn enter(&self) -> Result<(), ViewError> {
		self.board.enter().await
	}

	#[instrument(skip_all, fields(order_id = order_id, store_id = self.session.actor_id, command = %command))]
	pub async fn update_status(
		&self,
		order_id: OrderId,
		command: StatusCommand,
	) -> Result<TransitionOutcome, ViewError> {
		self.board.run_transition(order_id, command.into()).await
	}

	/// Accepts the wire spelling of a command, e.g. `shipped` or `cancell`.
	pub async fn update_status_wire(
		&self,
		order_id: OrderId,
		value: &str,
	) -> Result<TransitionOutcome, ViewError> {
		let command: StatusCommand = value
			.parse()
			.map_err(|e: market_types::ParseStatusError| ViewError::Validation(e.to_string()))?;
		self.update_status(order_id, command).await
	}

	pub async fn advance(
		&self,
		order_id: OrderId,
		status: OrderStatus,
	) -> Result<TransitionOutcome, ViewError> {
		self.update_status(order_id, StatusCommand::Advance(status))
			.await
	}

	pub async fn approve_cancellation(
		&self,
		order_id: OrderId,
	) -> Result<TransitionOutcome, ViewError> {
		self.update_status(order_id, StatusCommand::ApproveCancellation)
			.await
	}

	pub async fn reject_cancellation(
		&self,
		order_id: OrderId,
	) -> Result<TransitionOutcome, ViewError> {
		self.update_status(order_id, StatusCommand::RejectCancellation)
			.await
	}

	pub fn actions_for(&self, order: &Order) -> VendorActions {
		let busy = self.board.is_busy(order.id);
		let status_buttons = advance_options(order.status)
			.into_iter()
			.map(|option| StatusButton {
				status: option.target,
				label: option.target.label(),
				enabled: option.enabled && !busy,
			})
			.collect();
		VendorActions {
			status_buttons,
			can_update_status: !busy && !order.status.is_terminal(),
			can_adjudicate_cancellation: !busy && cancellation::can_adjudicate(order.status),
			busy,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::memory_service;
	use crate::CustomerOrderView;
	use market_types::testing::{order, orders};
	use market_types::OrderStatus::*;

	fn policy() -> PageSizePolicy {
		PageSizePolicy::Configurable {
			default: 5,
			options: vec![5, 10, 20],
			max: 100,
		}
	}

	#[tokio::test]
	async fn test_twelve_orders_three_pending() {
		let all = orders(&[
			Pending, Processing, Shipped, Delivered, Pending, Cancelled, Processing, Shipped,
			Pending, Delivered, CancellationRequested, CancellationRejected,
		]);
		let view = VendorOrderView::open(Session::vendor(1), memory_service(all), policy()).unwrap();
		view.enter().await.unwrap();

		let page = view.board().page().await;
		assert_eq!(page.orders.len(), 5);
		assert_eq!(page.total_pages, 3);

		view.board().go_to_page(2).await;
		view.board().set_status_filter_str("pending").await.unwrap();
		let page = view.board().page().await;
		assert_eq!(page.total_count, 3);
		assert_eq!(page.total_pages, 1);
		assert_eq!(page.page_number, 1);
		assert_eq!(page.orders.len(), 3);
		assert_eq!(view.board().stats().await.count(Pending), 3);
	}

	#[tokio::test]
	async fn test_cancellation_negotiation_between_views() {
		let authority = memory_service(vec![order(42, Pending)]);
		let customer = CustomerOrderView::open(Session::customer(1), authority.clone()).unwrap();
		let vendor = VendorOrderView::open(Session::vendor(1), authority, policy()).unwrap();
		customer.enter().await.unwrap();
		vendor.enter().await.unwrap();

		customer
			.request_cancellation(42, "changed my mind")
			.await
			.unwrap();
		let seen = customer.board().order(42).await.unwrap();
		assert_eq!(seen.status, CancellationRequested);
		assert_eq!(seen.cancellation_reason.as_deref(), Some("changed my mind"));

		vendor.board().refresh().await.unwrap();
		let actions = vendor.actions_for(&vendor.board().order(42).await.unwrap());
		assert!(actions.can_adjudicate_cancellation);
		vendor.reject_cancellation(42).await.unwrap();
		assert_eq!(
			vendor.board().order(42).await.unwrap().status,
			CancellationRejected
		);

		customer.enter().await.unwrap();
		customer
			.request_cancellation(42, "still want to cancel")
			.await
			.unwrap();
		let seen = customer.board().order(42).await.unwrap();
		assert_eq!(seen.status, CancellationRequested);
		assert_eq!(
			seen.cancellation_reason.as_deref(),
			Some("still want to cancel")
		);
	}

	#[tokio::test]
	async fn test_delivered_order_is_terminal() {
		let view = VendorOrderView::open(
			Session::vendor(1),
			memory_service(vec![order(7, Shipped)]),
			policy(),
		)
		.unwrap();
		view.enter().await.unwrap();

		let outcome = view.update_status_wire(7, "delivered").await.unwrap();
		assert_eq!(outcome, TransitionOutcome::Changed(Delivered));
		let delivered = view.board().order(7).await.unwrap();
		assert_eq!(delivered.status, Delivered);

		assert!(matches!(
			view.update_status_wire(7, "cancell").await,
			Err(ViewError::TerminalState(Delivered))
		));
		assert!(matches!(
			view.advance(7, Cancelled).await,
			Err(ViewError::TerminalState(Delivered))
		));
		let actions = view.actions_for(&delivered);
		assert!(!actions.can_update_status);
		assert!(actions.status_buttons.iter().all(|b| !b.enabled));
	}

	#[tokio::test]
	async fn test_adjudication_only_on_requested() {
		let view = VendorOrderView::open(
			Session::vendor(1),
			memory_service(orders(&[Processing, CancellationRejected])),
			policy(),
		)
		.unwrap();
		view.enter().await.unwrap();

		assert!(matches!(
			view.approve_cancellation(1).await,
			Err(ViewError::IllegalTransition { from: Processing, .. })
		));
		assert!(matches!(
			view.reject_cancellation(2).await,
			Err(ViewError::IllegalTransition {
				from: CancellationRejected,
				..
			})
		));

		// Happy-path buttons stay available during negotiation.
		let actions = view.actions_for(&view.board().order(2).await.unwrap());
		assert!(!actions.can_adjudicate_cancellation);
		assert!(actions.status_buttons.iter().all(|b| b.enabled));
		assert_eq!(view.advance(2, Shipped).await.unwrap(), TransitionOutcome::Changed(Shipped));
	}

	#[tokio::test]
	async fn test_status_buttons_and_no_op() {
		let view = VendorOrderView::open(
			Session::vendor(1),
			memory_service(vec![order(1, Processing)]),
			policy(),
		)
		.unwrap();
		view.enter().await.unwrap();

		let actions = view.actions_for(&view.board().order(1).await.unwrap());
		let enabled: Vec<_> = actions
			.status_buttons
			.iter()
			.map(|b| (b.label, b.enabled))
			.collect();
		assert_eq!(
			enabled,
			vec![
				("Pending", false),
				("Processing", false),
				("Shipped", true),
				("Delivered", true)
			]
		);

		assert_eq!(
			view.advance(1, Processing).await.unwrap(),
			TransitionOutcome::Unchanged
		);
		assert!(matches!(
			view.advance(1, Pending).await,
			Err(ViewError::IllegalTransition { .. })
		));
		assert!(matches!(
			view.update_status_wire(1, "teleported").await,
			Err(ViewError::Validation(_))
		));
	}

	#[tokio::test]
	async fn test_customer_session_refused() {
		let result = VendorOrderView::open(Session::customer(1), memory_service(vec![]), policy());
		assert!(matches!(result, Err(ViewError::WrongRole { .. })));
	}
}
