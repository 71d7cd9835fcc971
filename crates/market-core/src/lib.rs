//! Role-scoped order views for the marketplace.
//!
//! A view pairs an [`OrderBoard`] (the fetched snapshot, the query state and
//! the in-flight guard) with the transitions its role may perform. Customers
//! see their own orders and may ask to cancel; vendors see their store's
//! orders, move them along the happy path and settle cancellation requests.
//! Every change goes to the order authority first and the snapshot is only
//! replaced by a refetch once the authority has confirmed it.

use market_authority::AuthorityError;
use market_order::TransitionError;
use market_query::QueryError;
use market_types::{OrderId, OrderStatus, Role};
use thiserror::Error;

pub mod board;
pub mod builder;
pub mod views;

#[cfg(test)]
mod testing;

pub use board::OrderBoard;
pub use builder::{BuilderError, ViewBuilder, ViewFactory};
pub use views::customer::{CustomerActions, CustomerOrderView};
pub use views::vendor::{StatusButton, VendorActions, VendorOrderView};

/// Errors surfaced by the views. All of them leave the view usable.
#[derive(Debug, Error)]
pub enum ViewError {
	#[error("Validation failed: {0}")]
	Validation(String),
	#[error("Cannot {action} an order that is {from}")]
	IllegalTransition { from: OrderStatus, action: String },
	#[error("Order is {0} and can no longer change")]
	TerminalState(OrderStatus),
	#[error("Order authority failed: {0}")]
	RemoteFailure(String),
	#[error("Order {0} not found")]
	OrderNotFound(OrderId),
	#[error("Order {0} already has a request in flight")]
	InFlight(OrderId),
	#[error("A {role} cannot {action}")]
	WrongRole { role: Role, action: String },
	#[error("Configuration error: {0}")]
	Config(String),
}

impl ViewError {
	/// Short message suitable for inline display next to the control that
	/// triggered the error.
	pub fn user_message(&self) -> String {
		match self {
			ViewError::Validation(message) => message.clone(),
			ViewError::IllegalTransition { from, action } => {
				format!("You can't {} while the order is {}.", action, from.label())
			},
			ViewError::TerminalState(status) => {
				format!("This order is {} and can't be changed.", status.label())
			},
			ViewError::RemoteFailure(_) => {
				"Something went wrong while saving. Please try again.".to_string()
			},
			ViewError::OrderNotFound(_) => {
				"This order is no longer available. Refresh and try again.".to_string()
			},
			ViewError::InFlight(_) => {
				"An update for this order is already in progress.".to_string()
			},
			ViewError::WrongRole { .. } => "You don't have access to this action.".to_string(),
			ViewError::Config(_) => "Orders are unavailable right now.".to_string(),
		}
	}
}

impl From<TransitionError> for ViewError {
	fn from(err: TransitionError) -> Self {
		match err {
			TransitionError::Validation(message) => ViewError::Validation(message),
			TransitionError::IllegalTransition { from, action } => {
				ViewError::IllegalTransition { from, action }
			},
			TransitionError::TerminalState(status) => ViewError::TerminalState(status),
			TransitionError::NotPermitted { role, action } => ViewError::WrongRole { role, action },
		}
	}
}

impl From<QueryError> for ViewError {
	fn from(err: QueryError) -> Self {
		ViewError::Validation(err.to_string())
	}
}

impl From<AuthorityError> for ViewError {
	fn from(err: AuthorityError) -> Self {
		match err {
			AuthorityError::NotFound(order_id) => ViewError::OrderNotFound(order_id),
			AuthorityError::Configuration(message) => ViewError::Config(message),
			other => ViewError::RemoteFailure(other.to_string()),
		}
	}
}
