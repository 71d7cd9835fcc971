//! Acting identity passed explicitly into the views.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is acting on the orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Customer,
	Vendor,
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Customer => f.write_str("customer"),
			Role::Vendor => f.write_str("vendor"),
		}
	}
}

/// The authenticated actor, resolved once by the caller.
///
/// For customers `actor_id` is the customer id; for vendors it is the id of
/// the store they operate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	pub role: Role,
	pub actor_id: u64,
}

impl Session {
	pub fn customer(customer_id: u64) -> Self {
		Self {
			role: Role::Customer,
			actor_id: customer_id,
		}
	}

	pub fn vendor(store_id: u64) -> Self {
		Self {
			role: Role::Vendor,
			actor_id: store_id,
		}
	}

	/// Snapshot scope this session is allowed to read.
	pub fn scope(&self) -> OrderScope {
		match self.role {
			Role::Customer => OrderScope::Customer(self.actor_id),
			Role::Vendor => OrderScope::Store(self.actor_id),
		}
	}
}

/// Partition of orders fetched from the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderScope {
	/// All orders placed by a customer.
	Customer(u64),
	/// All orders sold by a store.
	Store(u64),
}

impl fmt::Display for OrderScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderScope::Customer(id) => write!(f, "customer:{}", id),
			OrderScope::Store(id) => write!(f, "store:{}", id),
		}
	}
}
