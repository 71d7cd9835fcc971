//! Order status model.
//!
//! Defines the closed set of order statuses, their display metadata and the
//! vendor status commands exchanged with the remote order authority.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string does not name a known status or command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStatusError {
	#[error("Unknown order status: {0}")]
	UnknownStatus(String),
	#[error("Unknown status command: {0}")]
	UnknownCommand(String),
}

/// Status of an order.
///
/// The set is closed: anything the authority sends that does not map onto one
/// of these variants is rejected at the parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
	/// Order placed, not yet picked up by the vendor.
	Pending,
	/// Vendor is preparing the order.
	Processing,
	/// Order handed to the carrier.
	Shipped,
	/// Order received by the customer.
	Delivered,
	/// Cancellation approved.
	Cancelled,
	/// Customer asked for cancellation, awaiting the vendor.
	CancellationRequested,
	/// Vendor turned the cancellation request down.
	CancellationRejected,
}

impl OrderStatus {
	/// Every status, in display order.
	pub const ALL: [OrderStatus; 7] = [
		OrderStatus::Pending,
		OrderStatus::Processing,
		OrderStatus::Shipped,
		OrderStatus::Delivered,
		OrderStatus::Cancelled,
		OrderStatus::CancellationRequested,
		OrderStatus::CancellationRejected,
	];

	/// The forward-only progression from placement to delivery.
	pub const HAPPY_PATH: [OrderStatus; 4] = [
		OrderStatus::Pending,
		OrderStatus::Processing,
		OrderStatus::Shipped,
		OrderStatus::Delivered,
	];

	/// Canonical wire name.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Processing => "processing",
			OrderStatus::Shipped => "shipped",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
			OrderStatus::CancellationRequested => "cancellation_requested",
			OrderStatus::CancellationRejected => "cancellation_rejected",
		}
	}

	/// Human readable label.
	pub fn label(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "Pending",
			OrderStatus::Processing => "Processing",
			OrderStatus::Shipped => "Shipped",
			OrderStatus::Delivered => "Delivered",
			OrderStatus::Cancelled => "Cancelled",
			OrderStatus::CancellationRequested => "Cancellation Requested",
			OrderStatus::CancellationRejected => "Cancellation Rejected",
		}
	}

	/// Icon name used by renderers.
	pub fn icon(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "clock",
			OrderStatus::Processing => "package",
			OrderStatus::Shipped => "truck",
			OrderStatus::Delivered => "check-circle",
			OrderStatus::Cancelled => "x-circle",
			OrderStatus::CancellationRequested => "alert-circle",
			OrderStatus::CancellationRejected => "slash",
		}
	}

	/// Badge colour family.
	pub fn tone(&self) -> StatusTone {
		match self {
			OrderStatus::Pending => StatusTone::Warning,
			OrderStatus::Processing | OrderStatus::Shipped => StatusTone::Info,
			OrderStatus::Delivered => StatusTone::Success,
			OrderStatus::Cancelled => StatusTone::Danger,
			OrderStatus::CancellationRequested | OrderStatus::CancellationRejected => {
				StatusTone::Attention
			},
		}
	}

	/// Complete display metadata for this status.
	pub fn badge(&self) -> StatusBadge {
		StatusBadge {
			status: *self,
			label: self.label(),
			icon: self.icon(),
			tone: self.tone(),
		}
	}

	/// Returns true once no further transition is possible.
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
	}

	/// Returns true while the cancellation negotiation is open or was turned down.
	pub fn is_negotiation(&self) -> bool {
		matches!(
			self,
			OrderStatus::CancellationRequested | OrderStatus::CancellationRejected
		)
	}

	/// Position on the happy path, `None` for statuses off the happy path.
	pub fn happy_path_rank(&self) -> Option<usize> {
		match self {
			OrderStatus::Pending => Some(0),
			OrderStatus::Processing => Some(1),
			OrderStatus::Shipped => Some(2),
			OrderStatus::Delivered => Some(3),
			OrderStatus::Cancelled
			| OrderStatus::CancellationRequested
			| OrderStatus::CancellationRejected => None,
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Lowercases and drops separators so `"Cancellation Requested"`,
/// `"cancellation_requested"` and `"CancellationRequested"` compare equal.
fn normalize(s: &str) -> String {
	s.trim()
		.chars()
		.filter(|c| !matches!(c, ' ' | '_' | '-'))
		.flat_map(char::to_lowercase)
		.collect()
}

impl FromStr for OrderStatus {
	type Err = ParseStatusError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match normalize(s).as_str() {
			"pending" => Ok(OrderStatus::Pending),
			"processing" => Ok(OrderStatus::Processing),
			"shipped" => Ok(OrderStatus::Shipped),
			"delivered" => Ok(OrderStatus::Delivered),
			"cancelled" => Ok(OrderStatus::Cancelled),
			"cancellationrequested" => Ok(OrderStatus::CancellationRequested),
			"cancellationrejected" => Ok(OrderStatus::CancellationRejected),
			_ => Err(ParseStatusError::UnknownStatus(s.to_string())),
		}
	}
}

impl TryFrom<String> for OrderStatus {
	type Error = ParseStatusError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<OrderStatus> for String {
	fn from(status: OrderStatus) -> Self {
		status.as_str().to_string()
	}
}

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTone {
	Info,
	Warning,
	Success,
	Danger,
	Attention,
}

/// Display metadata for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
	pub status: OrderStatus,
	pub label: &'static str,
	pub icon: &'static str,
	pub tone: StatusTone,
}

/// Payment state reported by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	Paid,
	Pending,
	Refunded,
}

/// Status command a vendor sends to the order authority.
///
/// Each command has a fixed legacy wire value; approving a cancellation is
/// sent as `cancell` and rejecting it as `reject cancellation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCommand {
	/// Move the order to a happy-path status.
	Advance(OrderStatus),
	/// Approve a pending cancellation request.
	ApproveCancellation,
	/// Reject a pending cancellation request.
	RejectCancellation,
}

/// Wire value for approving a cancellation.
pub const APPROVE_CANCELLATION_WIRE: &str = "cancell";
/// Wire value for rejecting a cancellation.
pub const REJECT_CANCELLATION_WIRE: &str = "reject cancellation";

impl StatusCommand {
	/// Status the order ends up in when the command succeeds.
	pub fn target(&self) -> OrderStatus {
		match self {
			StatusCommand::Advance(status) => *status,
			StatusCommand::ApproveCancellation => OrderStatus::Cancelled,
			StatusCommand::RejectCancellation => OrderStatus::CancellationRejected,
		}
	}

	/// Legacy wire value.
	pub fn wire_value(&self) -> &'static str {
		match self {
			StatusCommand::Advance(status) => status.as_str(),
			StatusCommand::ApproveCancellation => APPROVE_CANCELLATION_WIRE,
			StatusCommand::RejectCancellation => REJECT_CANCELLATION_WIRE,
		}
	}
}

impl fmt::Display for StatusCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StatusCommand::Advance(status) => write!(f, "advance to {}", status.label()),
			StatusCommand::ApproveCancellation => f.write_str("approve cancellation"),
			StatusCommand::RejectCancellation => f.write_str("reject cancellation"),
		}
	}
}

impl FromStr for StatusCommand {
	type Err = ParseStatusError;

	/// Parses a vendor wire value. Only the happy-path names and the two
	/// cancellation constants are accepted.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"pending" => Ok(StatusCommand::Advance(OrderStatus::Pending)),
			"processing" => Ok(StatusCommand::Advance(OrderStatus::Processing)),
			"shipped" => Ok(StatusCommand::Advance(OrderStatus::Shipped)),
			"delivered" => Ok(StatusCommand::Advance(OrderStatus::Delivered)),
			APPROVE_CANCELLATION_WIRE => Ok(StatusCommand::ApproveCancellation),
			REJECT_CANCELLATION_WIRE => Ok(StatusCommand::RejectCancellation),
			_ => Err(ParseStatusError::UnknownCommand(s.to_string())),
		}
	}
}
