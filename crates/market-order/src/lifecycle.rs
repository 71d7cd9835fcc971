//! Happy-path progression rules.
//!
//! Vendors move orders along `Pending -> Processing -> Shipped -> Delivered`
//! and may skip ahead to any later step. Orders inside the cancellation
//! negotiation do not remember where they left the happy path, so any
//! happy-path target is accepted from there.

use crate::{TransitionError, TransitionOutcome};
use market_types::OrderStatus;

/// Plans a vendor move to a happy-path status.
pub fn plan_advance(
	current: OrderStatus,
	target: OrderStatus,
) -> Result<TransitionOutcome, TransitionError> {
	let action = || format!("move to {}", target.label());

	if current.is_terminal() {
		return Err(TransitionError::TerminalState(current));
	}

	let Some(target_rank) = target.happy_path_rank() else {
		return Err(TransitionError::IllegalTransition {
			from: current,
			action: action(),
		});
	};

	if current == target {
		return Ok(TransitionOutcome::Unchanged);
	}

	match current.happy_path_rank() {
		Some(current_rank) if target_rank > current_rank => Ok(TransitionOutcome::Changed(target)),
		Some(_) => Err(TransitionError::IllegalTransition {
			from: current,
			action: action(),
		}),
		None => Ok(TransitionOutcome::Changed(target)),
	}
}

/// One of the vendor's happy-path status buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOption {
	pub target: OrderStatus,
	pub enabled: bool,
}

/// All four happy-path buttons for an order in `current`, enabled only where
/// pressing them would change the status.
pub fn advance_options(current: OrderStatus) -> Vec<AdvanceOption> {
	OrderStatus::HAPPY_PATH
		.iter()
		.map(|target| AdvanceOption {
			target: *target,
			enabled: matches!(
				plan_advance(current, *target),
				Ok(TransitionOutcome::Changed(_))
			),
		})
		.collect()
}
