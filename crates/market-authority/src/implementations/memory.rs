//! In-process order authority.
//!
//! Holds a snapshot in memory and enforces the lifecycle rules itself, so it
//! behaves like a strict backend. Useful for tests and local development.

use crate::{AuthorityError, OrderAuthority};
use async_trait::async_trait;
use market_order::Transition;
use market_types::{
	ConfigSchema, Field, FieldType, Order, OrderId, OrderScope, Schema, StatusCommand,
	ValidationError,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Authority backed by a `Vec<Order>` behind a read-write lock.
pub struct MemoryAuthority {
	orders: Arc<RwLock<Vec<Order>>>,
}

impl MemoryAuthority {
	pub fn new() -> Self {
		Self::with_orders(Vec::new())
	}

	/// Starts from the given snapshot; insertion order is preserved.
	pub fn with_orders(orders: Vec<Order>) -> Self {
		Self {
			orders: Arc::new(RwLock::new(orders)),
		}
	}

	/// Reads and checks a JSON array of orders.
	pub fn from_seed_file(path: &str) -> Result<Self, AuthorityError> {
		let content = std::fs::read_to_string(path).map_err(|e| {
			AuthorityError::Configuration(format!("Cannot read seed file {}: {}", path, e))
		})?;
		let orders: Vec<Order> = serde_json::from_str(&content)
			.map_err(|e| AuthorityError::Serialization(e.to_string()))?;
		for order in &orders {
			order
				.validate()
				.map_err(|e| AuthorityError::Configuration(e.to_string()))?;
		}
		Ok(Self::with_orders(orders))
	}

	async fn apply(&self, order_id: OrderId, transition: Transition) -> Result<(), AuthorityError> {
		let mut orders = self.orders.write().await;
		let order = orders
			.iter_mut()
			.find(|order| order.id == order_id)
			.ok_or(AuthorityError::NotFound(order_id))?;
		market_order::apply(order, &transition)
			.map(|_| ())
			.map_err(|e| AuthorityError::Rejected(e.to_string()))
	}
}

impl Default for MemoryAuthority {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl OrderAuthority for MemoryAuthority {
	async fn fetch_orders(&self, scope: &OrderScope) -> Result<Vec<Order>, AuthorityError> {
		let orders = self.orders.read().await;
		Ok(orders
			.iter()
			.filter(|order| match scope {
				OrderScope::Customer(id) => order.customer_id == *id,
				OrderScope::Store(id) => order.store_id == *id,
			})
			.cloned()
			.collect())
	}

	async fn request_order_cancellation(
		&self,
		order_id: OrderId,
		reason: &str,
	) -> Result<(), AuthorityError> {
		self.apply(
			order_id,
			Transition::RequestCancellation {
				reason: reason.to_string(),
			},
		)
		.await
	}

	async fn update_order_status(
		&self,
		order_id: OrderId,
		command: StatusCommand,
	) -> Result<(), AuthorityError> {
		self.apply(order_id, command.into()).await
	}
}

/// Configuration schema for [`MemoryAuthority`].
pub struct MemoryAuthoritySchema;

impl ConfigSchema for MemoryAuthoritySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![], vec![Field::new("seed_file", FieldType::String)]);
		schema.validate(config)
	}
}

/// Creates a memory authority.
///
/// Configuration parameters:
/// - `seed_file` (optional): JSON array of orders to start from
pub fn create_authority(config: &toml::Value) -> Result<Box<dyn OrderAuthority>, AuthorityError> {
	MemoryAuthoritySchema
		.validate(config)
		.map_err(|e| AuthorityError::Configuration(format!("Invalid configuration: {}", e)))?;

	let authority = match config.get("seed_file").and_then(|v| v.as_str()) {
		Some(path) => MemoryAuthority::from_seed_file(path)?,
		None => MemoryAuthority::new(),
	};
	Ok(Box::new(authority))
}

/// Registry for the memory authority.
pub struct Registry;

impl market_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::AuthorityFactory;

	fn factory() -> Self::Factory {
		create_authority
	}
}

impl crate::AuthorityRegistry for Registry {}
