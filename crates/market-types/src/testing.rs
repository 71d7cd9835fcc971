use crate::{Order, OrderId, OrderLineItem, OrderStatus, PaymentStatus};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

/// Builds an order with sensible defaults; `id` also drives the order date so
/// that higher ids are more recent.
pub fn order(id: OrderId, status: OrderStatus) -> Order {
	let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
	Order {
		id,
		status,
		payment_status: PaymentStatus::Paid,
		payment_method: "card".to_string(),
		order_date: base + Duration::hours(id as i64),
		total_price: Decimal::new(2500, 2),
		shipping_price: Some(Decimal::new(500, 2)),
		address: "221B Baker Street".to_string(),
		customer_id: 1,
		customer_name: format!("Customer {}", id),
		store_id: 1,
		store_name: "Corner Store".to_string(),
		tracking_number: None,
		cancellation_reason: status
			.is_negotiation()
			.then(|| "fixture reason".to_string()),
		line_items: vec![OrderLineItem {
			product_id: 100 + id,
			product_name: format!("Product {}", id),
			product_image_url: format!("https://cdn.example.com/products/{}.png", 100 + id),
			quantity: 1,
			unit_final_price: Decimal::new(2500, 2),
			color: None,
			size: None,
		}],
	}
}

/// Builds one order per status in `statuses`, numbered from 1.
pub fn orders(statuses: &[OrderStatus]) -> Vec<Order> {
	statuses
		.iter()
		.enumerate()
		.map(|(i, status)| order(i as OrderId + 1, *status))
		.collect()
}
