//! Per-order in-flight tracking.

use market_types::OrderId;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Orders that currently have a request outstanding at the authority.
#[derive(Debug, Default)]
pub struct InFlight {
	orders: Mutex<HashSet<OrderId>>,
}

impl InFlight {
	fn lock(&self) -> MutexGuard<'_, HashSet<OrderId>> {
		self.orders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Marks `order_id` busy until the returned guard drops. Returns `None`
	/// if it already is.
	pub fn acquire(&self, order_id: OrderId) -> Option<InFlightGuard<'_>> {
		let inserted = self.lock().insert(order_id);
		inserted.then(|| InFlightGuard {
			in_flight: self,
			order_id,
		})
	}

	pub fn contains(&self, order_id: OrderId) -> bool {
		self.lock().contains(&order_id)
	}
}

/// Releases the order when dropped, whatever the request's outcome.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
	in_flight: &'a InFlight,
	order_id: OrderId,
}

impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		self.in_flight.lock().remove(&self.order_id);
	}
}
