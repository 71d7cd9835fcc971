//! Order authority boundary.
//!
//! The authority is the remote source of truth for orders. Views fetch whole
//! snapshots from it and send it status changes; it decides whether a change
//! is accepted. Implementations register themselves by name and are selected
//! through configuration.

use async_trait::async_trait;
use market_types::{ImplementationRegistry, Order, OrderId, OrderScope, StatusCommand};
use thiserror::Error;
use tracing::instrument;

pub mod implementations {
	pub mod http;
	pub mod memory;
}

/// Errors that can occur while talking to an order authority.
#[derive(Debug, Error)]
pub enum AuthorityError {
	/// The authority could not be reached or did not answer in time.
	#[error("Network error: {0}")]
	Network(String),
	/// The authority refused the change.
	#[error("Rejected by authority: {0}")]
	Rejected(String),
	/// The authority has no such order.
	#[error("Order {0} not found")]
	NotFound(OrderId),
	/// A payload could not be encoded or decoded.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// The implementation's configuration table is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Operations every order authority provides.
#[async_trait]
pub trait OrderAuthority: Send + Sync {
	/// Fetches every order in `scope`, in the authority's own order.
	async fn fetch_orders(&self, scope: &OrderScope) -> Result<Vec<Order>, AuthorityError>;

	/// Asks for an order to be cancelled, on behalf of its customer.
	async fn request_order_cancellation(
		&self,
		order_id: OrderId,
		reason: &str,
	) -> Result<(), AuthorityError>;

	/// Applies a vendor status command.
	async fn update_order_status(
		&self,
		order_id: OrderId,
		command: StatusCommand,
	) -> Result<(), AuthorityError>;
}

/// Builds an authority from its configuration table.
pub type AuthorityFactory = fn(&toml::Value) -> Result<Box<dyn OrderAuthority>, AuthorityError>;

/// Registry trait for authority implementations.
pub trait AuthorityRegistry: ImplementationRegistry<Factory = AuthorityFactory> {}

/// Every built-in authority implementation as `(name, factory)` pairs.
pub fn get_all_implementations() -> Vec<(&'static str, AuthorityFactory)> {
	use implementations::{http, memory};

	vec![
		(http::Registry::NAME, http::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// The selected authority, wrapped with tracing.
pub struct AuthorityService {
	implementation: String,
	backend: Box<dyn OrderAuthority>,
}

impl AuthorityService {
	pub fn new(implementation: impl Into<String>, backend: Box<dyn OrderAuthority>) -> Self {
		Self {
			implementation: implementation.into(),
			backend,
		}
	}

	/// Name of the wrapped implementation, as configured.
	pub fn implementation(&self) -> &str {
		&self.implementation
	}

	#[instrument(skip_all, fields(scope = %scope, implementation = %self.implementation))]
	pub async fn fetch_orders(&self, scope: &OrderScope) -> Result<Vec<Order>, AuthorityError> {
		match self.backend.fetch_orders(scope).await {
			Ok(orders) => {
				tracing::debug!(count = orders.len(), "Fetched orders");
				Ok(orders)
			},
			Err(e) => {
				tracing::error!(error = %e, "Failed to fetch orders");
				Err(e)
			},
		}
	}

	#[instrument(skip_all, fields(order_id = order_id, implementation = %self.implementation))]
	pub async fn request_order_cancellation(
		&self,
		order_id: OrderId,
		reason: &str,
	) -> Result<(), AuthorityError> {
		self.backend
			.request_order_cancellation(order_id, reason)
			.await
			.inspect_err(|e| tracing::error!(error = %e, "Cancellation request failed"))
	}

	#[instrument(skip_all, fields(order_id = order_id, command = %command, implementation = %self.implementation))]
	pub async fn update_order_status(
		&self,
		order_id: OrderId,
		command: StatusCommand,
	) -> Result<(), AuthorityError> {
		self.backend
			.update_order_status(order_id, command)
			.await
			.inspect_err(|e| tracing::error!(error = %e, "Status update failed"))
	}
}
