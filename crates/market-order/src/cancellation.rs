//! Cancellation negotiation.
//!
//! The customer asks, the vendor approves or rejects. A rejected request can be
//! asked again; the new reason replaces the old one.

use crate::{TransitionError, TransitionOutcome};
use market_types::OrderStatus;

/// Statuses from which a customer may ask for cancellation.
pub const REQUESTABLE: [OrderStatus; 3] = [
	OrderStatus::Pending,
	OrderStatus::Processing,
	OrderStatus::CancellationRejected,
];

/// Returns true if a customer may ask to cancel an order in `status`.
pub fn can_request(status: OrderStatus) -> bool {
	REQUESTABLE.contains(&status)
}

/// Returns true if the vendor may approve or reject a request on `status`.
pub fn can_adjudicate(status: OrderStatus) -> bool {
	status == OrderStatus::CancellationRequested
}

/// Trims the reason and rejects blank input.
pub fn validate_reason(reason: &str) -> Result<String, TransitionError> {
	let trimmed = reason.trim();
	if trimmed.is_empty() {
		return Err(TransitionError::Validation(
			"Cancellation reason cannot be empty".into(),
		));
	}
	Ok(trimmed.to_string())
}

/// Plans a customer cancellation request.
///
/// The reason is checked first so a blank form is reported as such whatever
/// the order's status.
pub fn plan_request(
	current: OrderStatus,
	reason: &str,
) -> Result<TransitionOutcome, TransitionError> {
	validate_reason(reason)?;
	if current.is_terminal() {
		return Err(TransitionError::TerminalState(current));
	}
	if !can_request(current) {
		return Err(TransitionError::IllegalTransition {
			from: current,
			action: "request cancellation".into(),
		});
	}
	Ok(TransitionOutcome::Changed(OrderStatus::CancellationRequested))
}

/// Plans a vendor approval.
pub fn plan_approve(current: OrderStatus) -> Result<TransitionOutcome, TransitionError> {
	adjudicate(current, "approve cancellation", OrderStatus::Cancelled)
}

/// Plans a vendor rejection.
pub fn plan_reject(current: OrderStatus) -> Result<TransitionOutcome, TransitionError> {
	adjudicate(current, "reject cancellation", OrderStatus::CancellationRejected)
}

fn adjudicate(
	current: OrderStatus,
	action: &str,
	target: OrderStatus,
) -> Result<TransitionOutcome, TransitionError> {
	if current.is_terminal() {
		return Err(TransitionError::TerminalState(current));
	}
	if !can_adjudicate(current) {
		return Err(TransitionError::IllegalTransition {
			from: current,
			action: action.to_string(),
		});
	}
	Ok(TransitionOutcome::Changed(target))
}
