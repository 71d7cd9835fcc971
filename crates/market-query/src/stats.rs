//! Per-status order counts for dashboard tiles.

use market_types::{Order, OrderStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts of orders by status over a full snapshot.
///
/// Derived on demand; nothing here is stored between snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStats {
	counts: BTreeMap<OrderStatus, usize>,
	total: usize,
}

/// One dashboard summary tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatTile {
	pub status: OrderStatus,
	pub label: &'static str,
	pub count: usize,
}

impl OrderStats {
	pub fn count(&self, status: OrderStatus) -> usize {
		self.counts.get(&status).copied().unwrap_or(0)
	}

	pub fn total(&self) -> usize {
		self.total
	}

	/// Orders still waiting on a vendor decision about cancellation.
	pub fn awaiting_adjudication(&self) -> usize {
		self.count(OrderStatus::CancellationRequested)
	}

	/// Orders not yet delivered or cancelled.
	pub fn open(&self) -> usize {
		OrderStatus::ALL
			.iter()
			.filter(|s| !s.is_terminal())
			.map(|s| self.count(*s))
			.sum()
	}

	/// One tile per status, in display order, zeros included.
	pub fn tiles(&self) -> Vec<StatTile> {
		OrderStatus::ALL
			.iter()
			.map(|status| StatTile {
				status: *status,
				label: tile_label(*status),
				count: self.count(*status),
			})
			.collect()
	}
}

fn tile_label(status: OrderStatus) -> &'static str {
	match status {
		OrderStatus::CancellationRequested => "Cancellation Pending",
		other => other.label(),
	}
}

/// Counts every order in the snapshot by status.
pub fn compute_stats(orders: &[Order]) -> OrderStats {
	let mut counts: BTreeMap<OrderStatus, usize> =
		OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
	for order in orders {
		*counts.entry(order.status).or_default() += 1;
	}
	OrderStats {
		counts,
		total: orders.len(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{query_orders, QueryParams, StatusFilter};
	use market_types::testing::orders;
	use market_types::OrderStatus::*;

	#[test]
	fn test_counts_sum_to_total() {
		let all = orders(&[Pending, Pending, Shipped, CancellationRequested, Delivered]);
		let stats = compute_stats(&all);
		assert_eq!(stats.total(), 5);
		assert_eq!(stats.count(Pending), 2);
		assert_eq!(stats.count(Processing), 0);
		assert_eq!(stats.awaiting_adjudication(), 1);
		assert_eq!(stats.open(), 4);
		let sum: usize = OrderStatus::ALL.iter().map(|s| stats.count(*s)).sum();
		assert_eq!(sum, stats.total());
	}

	#[test]
	fn test_counts_agree_with_single_status_queries() {
		let all = orders(&[
			Pending, Processing, Shipped, Delivered, Cancelled, CancellationRequested,
			CancellationRejected, Pending, Shipped, Shipped,
		]);
		let stats = compute_stats(&all);
		for status in OrderStatus::ALL {
			let page = query_orders(
				&all,
				&QueryParams {
					status_filter: StatusFilter::Only(status),
					..QueryParams::default()
				},
			);
			assert_eq!(page.total_count, stats.count(status), "{:?}", status);
		}
	}

	#[test]
	fn test_tiles() {
		let stats = compute_stats(&orders(&[CancellationRequested]));
		let tiles = stats.tiles();
		assert_eq!(tiles.len(), 7);
		let pending_cancel = tiles
			.iter()
			.find(|t| t.status == CancellationRequested)
			.unwrap();
		assert_eq!(pending_cancel.label, "Cancellation Pending");
		assert_eq!(pending_cancel.count, 1);
	}

	#[test]
	fn test_empty_snapshot() {
		let stats = compute_stats(&[]);
		assert_eq!(stats.total(), 0);
		assert!(stats.tiles().iter().all(|t| t.count == 0));
	}
}
