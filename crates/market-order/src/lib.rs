//! Order lifecycle rules for the marketplace.
//!
//! This crate decides which status transitions are legal: the vendor's
//! happy-path progression, the customer/vendor cancellation negotiation, and
//! the terminal guard on delivered and cancelled orders. The rules are pure;
//! views use them to gate controls and reject calls early, and the authority
//! applies them when it commits a change.

use market_types::{Order, OrderStatus, Role, StatusCommand};
use std::fmt;
use thiserror::Error;

pub mod cancellation;
pub mod lifecycle;

pub use lifecycle::{advance_options, AdvanceOption};

/// Errors that can occur when planning a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
	/// The request carried invalid input, such as a blank reason.
	#[error("Validation failed: {0}")]
	Validation(String),
	/// The current status does not allow the requested action.
	#[error("Cannot {action} an order that is {from}")]
	IllegalTransition { from: OrderStatus, action: String },
	/// The order is delivered or cancelled.
	#[error("Order is {0} and can no longer change")]
	TerminalState(OrderStatus),
	/// The acting role may not perform this kind of transition.
	#[error("A {role} cannot {action}")]
	NotPermitted { role: Role, action: String },
}

/// Result of planning a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
	/// The order moves to the given status.
	Changed(OrderStatus),
	/// The order already is in the requested status.
	Unchanged,
}

/// A requested change to an order's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
	/// Vendor moves the order to a happy-path status.
	Advance(OrderStatus),
	/// Customer asks to cancel.
	RequestCancellation { reason: String },
	/// Vendor approves a pending request.
	ApproveCancellation,
	/// Vendor rejects a pending request.
	RejectCancellation,
}

/// Shape of a transition, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
	Advance,
	RequestCancellation,
	ApproveCancellation,
	RejectCancellation,
}

impl Transition {
	pub fn kind(&self) -> TransitionKind {
		match self {
			Transition::Advance(_) => TransitionKind::Advance,
			Transition::RequestCancellation { .. } => TransitionKind::RequestCancellation,
			Transition::ApproveCancellation => TransitionKind::ApproveCancellation,
			Transition::RejectCancellation => TransitionKind::RejectCancellation,
		}
	}
}

impl fmt::Display for Transition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Transition::Advance(status) => write!(f, "move to {}", status.label()),
			Transition::RequestCancellation { .. } => f.write_str("request cancellation"),
			Transition::ApproveCancellation => f.write_str("approve cancellation"),
			Transition::RejectCancellation => f.write_str("reject cancellation"),
		}
	}
}

impl From<StatusCommand> for Transition {
	fn from(command: StatusCommand) -> Self {
		match command {
			StatusCommand::Advance(status) => Transition::Advance(status),
			StatusCommand::ApproveCancellation => Transition::ApproveCancellation,
			StatusCommand::RejectCancellation => Transition::RejectCancellation,
		}
	}
}

/// The transitions a role may surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSet {
	role: Role,
	kinds: &'static [TransitionKind],
}

const CUSTOMER_TRANSITIONS: &[TransitionKind] = &[TransitionKind::RequestCancellation];

const VENDOR_TRANSITIONS: &[TransitionKind] = &[
	TransitionKind::Advance,
	TransitionKind::ApproveCancellation,
	TransitionKind::RejectCancellation,
];

impl TransitionSet {
	pub fn for_role(role: Role) -> Self {
		let kinds = match role {
			Role::Customer => CUSTOMER_TRANSITIONS,
			Role::Vendor => VENDOR_TRANSITIONS,
		};
		Self { role, kinds }
	}

	pub fn role(&self) -> Role {
		self.role
	}

	pub fn permits(&self, kind: TransitionKind) -> bool {
		self.kinds.contains(&kind)
	}

	/// Rejects transitions outside this set.
	pub fn authorize(&self, transition: &Transition) -> Result<(), TransitionError> {
		if self.permits(transition.kind()) {
			Ok(())
		} else {
			Err(TransitionError::NotPermitted {
				role: self.role,
				action: transition.to_string(),
			})
		}
	}
}

/// Plans a transition from `current` without touching any order.
pub fn plan(
	current: OrderStatus,
	transition: &Transition,
) -> Result<TransitionOutcome, TransitionError> {
	match transition {
		Transition::Advance(target) => lifecycle::plan_advance(current, *target),
		Transition::RequestCancellation { reason } => cancellation::plan_request(current, reason),
		Transition::ApproveCancellation => cancellation::plan_approve(current),
		Transition::RejectCancellation => cancellation::plan_reject(current),
	}
}

/// Commits a transition to an order.
///
/// Only the order authority calls this; views never mutate their snapshot.
/// A cancellation request also stores the trimmed reason, replacing any
/// earlier one.
pub fn apply(order: &mut Order, transition: &Transition) -> Result<TransitionOutcome, TransitionError> {
	let outcome = plan(order.status, transition)?;
	if let TransitionOutcome::Changed(next) = outcome {
		if let Transition::RequestCancellation { reason } = transition {
			order.cancellation_reason = Some(cancellation::validate_reason(reason)?);
		}
		tracing::debug!(
			order_id = order.id,
			from = %order.status,
			to = %next,
			"Applied transition"
		);
		order.status = next;
	}
	Ok(outcome)
}
