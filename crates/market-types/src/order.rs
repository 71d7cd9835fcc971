//! Order read model.
//!
//! Orders are created at checkout, outside this workspace. What lives here is
//! the snapshot the authority hands back: it is replaced wholesale on every
//! refetch and never patched field by field.

use crate::OrderStatus;
use crate::PaymentStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric order identity.
pub type OrderId = u64;

/// Prefix of the synthesized order label shown to users and matched by search.
pub const ORDER_LABEL_PREFIX: &str = "ORD-";

/// Errors found when checking an order snapshot for consistency.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderValidationError {
	#[error("Order {0} has no line items")]
	NoLineItems(OrderId),
	#[error("Order {order_id}: line item {product_id} has quantity 0")]
	ZeroQuantity { order_id: OrderId, product_id: u64 },
	#[error("Order {0} has a negative price")]
	NegativePrice(OrderId),
	#[error("Order {0} is in cancellation negotiation without a reason")]
	MissingCancellationReason(OrderId),
}

/// A customer's purchase as reported by the order authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	pub id: OrderId,
	pub status: OrderStatus,
	pub payment_status: PaymentStatus,
	pub payment_method: String,
	pub order_date: DateTime<Utc>,
	pub total_price: Decimal,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shipping_price: Option<Decimal>,
	pub address: String,
	/// Customer the order belongs to.
	pub customer_id: u64,
	pub customer_name: String,
	/// Store that sold the order.
	pub store_id: u64,
	pub store_name: String,
	/// Only meaningful from `Shipped` on.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tracking_number: Option<String>,
	/// Set once a cancellation has been requested; kept after it is resolved.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cancellation_reason: Option<String>,
	#[serde(default)]
	pub line_items: Vec<OrderLineItem>,
}

/// One product entry within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
	pub product_id: u64,
	pub product_name: String,
	pub product_image_url: String,
	pub quantity: u32,
	pub unit_final_price: Decimal,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<String>,
}

impl OrderLineItem {
	/// Price of the line: unit price times quantity.
	pub fn line_total(&self) -> Decimal {
		self.unit_final_price * Decimal::from(self.quantity)
	}
}

impl Order {
	/// The label users see and search for, e.g. `ORD-42`.
	pub fn label(&self) -> String {
		format!("{}{}", ORDER_LABEL_PREFIX, self.id)
	}

	/// Amount the customer pays: total price plus shipping, if any.
	pub fn total_payable(&self) -> Decimal {
		self.total_price + self.shipping_price.unwrap_or(Decimal::ZERO)
	}

	/// Number of units across all line items.
	pub fn item_count(&self) -> u32 {
		self.line_items.iter().map(|item| item.quantity).sum()
	}

	/// Tracking number, hidden until the order has shipped.
	pub fn visible_tracking_number(&self) -> Option<&str> {
		match self.status {
			OrderStatus::Shipped | OrderStatus::Delivered => self.tracking_number.as_deref(),
			_ => None,
		}
	}

	/// Checks the snapshot invariants the authority is expected to uphold.
	pub fn validate(&self) -> Result<(), OrderValidationError> {
		if self.line_items.is_empty() {
			return Err(OrderValidationError::NoLineItems(self.id));
		}
		for item in &self.line_items {
			if item.quantity == 0 {
				return Err(OrderValidationError::ZeroQuantity {
					order_id: self.id,
					product_id: item.product_id,
				});
			}
			if item.unit_final_price.is_sign_negative() {
				return Err(OrderValidationError::NegativePrice(self.id));
			}
		}
		if self.total_price.is_sign_negative()
			|| self.shipping_price.is_some_and(|p| p.is_sign_negative())
		{
			return Err(OrderValidationError::NegativePrice(self.id));
		}
		let has_reason = self
			.cancellation_reason
			.as_deref()
			.is_some_and(|r| !r.trim().is_empty());
		if self.status.is_negotiation() && !has_reason {
			return Err(OrderValidationError::MissingCancellationReason(self.id));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use rust_decimal::Decimal;
	use std::str::FromStr;

	fn sample() -> Order {
		Order {
			id: 42,
			status: OrderStatus::Pending,
			payment_status: PaymentStatus::Paid,
			payment_method: "card".into(),
			order_date: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
			total_price: Decimal::from_str("59.90").unwrap(),
			shipping_price: Some(Decimal::from_str("4.50").unwrap()),
			address: "1 Main St".into(),
			customer_id: 7,
			customer_name: "Ada Lovelace".into(),
			store_id: 3,
			store_name: "Analytical Goods".into(),
			tracking_number: Some("TRK-1".into()),
			cancellation_reason: None,
			line_items: vec![OrderLineItem {
				product_id: 1,
				product_name: "Gear".into(),
				product_image_url: "https://img/gear.png".into(),
				quantity: 2,
				unit_final_price: Decimal::from_str("29.95").unwrap(),
				color: Some("brass".into()),
				size: None,
			}],
		}
	}

	#[test]
	fn test_label_and_totals() {
		let order = sample();
		assert_eq!(order.label(), "ORD-42");
		assert_eq!(order.total_payable(), Decimal::from_str("64.40").unwrap());
		assert_eq!(order.item_count(), 2);
		assert_eq!(
			order.line_items[0].line_total(),
			Decimal::from_str("59.90").unwrap()
		);

		let mut free_shipping = order.clone();
		free_shipping.shipping_price = None;
		assert_eq!(free_shipping.total_payable(), free_shipping.total_price);
	}

	#[test]
	fn test_tracking_hidden_before_shipping() {
		let mut order = sample();
		assert_eq!(order.visible_tracking_number(), None);
		order.status = OrderStatus::Shipped;
		assert_eq!(order.visible_tracking_number(), Some("TRK-1"));
	}

	#[test]
	fn test_validate() {
		assert!(sample().validate().is_ok());

		let mut order = sample();
		order.line_items[0].quantity = 0;
		assert!(matches!(
			order.validate(),
			Err(OrderValidationError::ZeroQuantity { order_id: 42, .. })
		));

		let mut order = sample();
		order.status = OrderStatus::CancellationRequested;
		assert_eq!(
			order.validate(),
			Err(OrderValidationError::MissingCancellationReason(42))
		);
		order.cancellation_reason = Some("changed my mind".into());
		assert!(order.validate().is_ok());
	}

	#[test]
	fn test_json_round_trip_uses_camel_case() {
		let json = serde_json::json!({
			"id": 9,
			"status": "Processing",
			"paymentStatus": "pending",
			"paymentMethod": "cod",
			"orderDate": "2024-06-01T08:30:00Z",
			"totalPrice": "10.00",
			"address": "2 Side St",
			"customerId": 1,
			"customerName": "Grace",
			"storeId": 2,
			"storeName": "Compilers",
			"lineItems": []
		});

		let order: Order = serde_json::from_value(json).unwrap();
		assert_eq!(order.status, OrderStatus::Processing);
		assert_eq!(order.payment_status, PaymentStatus::Pending);
		assert_eq!(order.shipping_price, None);
		assert_eq!(order.cancellation_reason, None);

		let back = serde_json::to_value(&order).unwrap();
		assert_eq!(back["status"], "processing");
		assert!(back.get("trackingNumber").is_none());
	}
}
