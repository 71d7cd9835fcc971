//! The customer's "my orders" view.

use super::require_role;
use crate::{OrderBoard, ViewError};
use market_authority::AuthorityService;
use market_order::{cancellation, Transition, TransitionOutcome, TransitionSet};
use market_query::{PageSizePolicy, QueryState, SortOrder, DEFAULT_PAGE_SIZE};
use market_types::{Order, OrderId, OrderStatus, Role, Session};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// What the customer can do with one order right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerActions {
	pub can_request_cancellation: bool,
	/// Invoice and detail pages are only offered once delivered.
	pub can_view_invoice: bool,
	pub busy: bool,
}

/// A customer's own orders, newest first, five per page.
pub struct CustomerOrderView {
	session: Session,
	board: OrderBoard,
}

impl CustomerOrderView {
	pub fn open(session: Session, authority: Arc<AuthorityService>) -> Result<Self, ViewError> {
		require_role(&session, Role::Customer, "customer orders")?;
		let board = OrderBoard::new(
			authority,
			session.scope(),
			TransitionSet::for_role(Role::Customer),
			QueryState::new(
				SortOrder::NewestFirst,
				PageSizePolicy::Fixed(DEFAULT_PAGE_SIZE),
			),
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

	/// Asks the vendor to cancel an order. The reason is trimmed and must not
	/// be blank; it replaces any earlier reason.
	#[instrument(skip_all, fields(order_id = order_id, customer_id = self.session.actor_id))]
	pub async fn request_cancellation(
		&self,
		order_id: OrderId,
		reason: &str,
	) -> Result<TransitionOutcome, ViewError> {
		self.board
			.run_transition(
				order_id,
				Transition::RequestCancellation {
					reason: reason.to_string(),
				},
			)
			.await
	}

	pub fn actions_for(&self, order: &Order) -> CustomerActions {
		let busy = self.board.is_busy(order.id);
		CustomerActions {
			can_request_cancellation: !busy && cancellation::can_request(order.status),
			can_view_invoice: order.status == OrderStatus::Delivered,
			busy,
		}
	}
}
