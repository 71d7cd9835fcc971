//! REST order authority.
//!
//! Talks to the marketplace backend over HTTP:
//!
//! - `GET {base}/orders/customer/{id}` and `GET {base}/orders/store/{id}`
//!   return a JSON array of orders.
//! - `POST {base}/orders/{id}/cancellation` with `{"reason": ...}`.
//! - `PATCH {base}/orders/{id}/status` with `{"status": <wire value>}`.
//!
//! The backend spells the cancellation verdicts in its own way; both wire
//! values can be overridden in configuration.

use crate::{AuthorityError, OrderAuthority};
use async_trait::async_trait;
use market_types::{
	ConfigSchema, Field, FieldType, Order, OrderId, OrderScope, Schema, StatusCommand,
	ValidationError, APPROVE_CANCELLATION_WIRE, REJECT_CANCELLATION_WIRE,
};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct CancellationRequest<'a> {
	reason: &'a str,
}

#[derive(Serialize)]
struct StatusUpdate<'a> {
	status: &'a str,
}

/// HTTP client for the order backend.
pub struct HttpAuthority {
	client: Client,
	base_url: String,
	approve_cancellation_value: String,
	reject_cancellation_value: String,
}

impl HttpAuthority {
	pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, AuthorityError> {
		let mut builder = Client::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder
			.build()
			.map_err(|e| AuthorityError::Configuration(format!("Failed to build client: {}", e)))?;

		Ok(Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			approve_cancellation_value: APPROVE_CANCELLATION_WIRE.to_string(),
			reject_cancellation_value: REJECT_CANCELLATION_WIRE.to_string(),
		})
	}

	/// Overrides the wire values sent for cancellation verdicts.
	pub fn with_cancellation_values(
		mut self,
		approve: impl Into<String>,
		reject: impl Into<String>,
	) -> Self {
		self.approve_cancellation_value = approve.into();
		self.reject_cancellation_value = reject.into();
		self
	}

	fn wire_value(&self, command: StatusCommand) -> &str {
		match command {
			StatusCommand::ApproveCancellation => &self.approve_cancellation_value,
			StatusCommand::RejectCancellation => &self.reject_cancellation_value,
			StatusCommand::Advance(_) => command.wire_value(),
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}

	/// Turns non-2xx responses into errors.
	async fn check(response: Response, order_id: Option<OrderId>) -> Result<Response, AuthorityError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}
		let body = match response.text().await {
			Ok(body) => body,
			Err(e) => {
				tracing::warn!(%status, error = %e, "Failed to read error response body");
				format!("<unreadable body: {}>", e)
			},
		};
		match (status, order_id) {
			(StatusCode::NOT_FOUND, Some(order_id)) => Err(AuthorityError::NotFound(order_id)),
			(status, _) if status.is_client_error() => {
				Err(AuthorityError::Rejected(format!("{}: {}", status, body)))
			},
			(status, _) => Err(AuthorityError::Network(format!(
				"Unexpected response {}: {}",
				status, body
			))),
		}
	}
}

#[async_trait]
impl OrderAuthority for HttpAuthority {
	async fn fetch_orders(&self, scope: &OrderScope) -> Result<Vec<Order>, AuthorityError> {
		let path = match scope {
			OrderScope::Customer(id) => format!("orders/customer/{}", id),
			OrderScope::Store(id) => format!("orders/store/{}", id),
		};
		let response = self
			.client
			.get(self.url(&path))
			.send()
			.await
			.map_err(|e| AuthorityError::Network(e.to_string()))?;
		Self::check(response, None)
			.await?
			.json::<Vec<Order>>()
			.await
			.map_err(|e| {
				if e.is_decode() {
					AuthorityError::Serialization(e.to_string())
				} else {
					AuthorityError::Network(e.to_string())
				}
			})
	}

	async fn request_order_cancellation(
		&self,
		order_id: OrderId,
		reason: &str,
	) -> Result<(), AuthorityError> {
		let response = self
			.client
			.post(self.url(&format!("orders/{}/cancellation", order_id)))
			.json(&CancellationRequest { reason })
			.send()
			.await
			.map_err(|e| AuthorityError::Network(e.to_string()))?;
		Self::check(response, Some(order_id)).await?;
		Ok(())
	}

	async fn update_order_status(
		&self,
		order_id: OrderId,
		command: StatusCommand,
	) -> Result<(), AuthorityError> {
		let response = self
			.client
			.patch(self.url(&format!("orders/{}/status", order_id)))
			.json(&StatusUpdate {
				status: self.wire_value(command),
			})
			.send()
			.await
			.map_err(|e| AuthorityError::Network(e.to_string()))?;
		Self::check(response, Some(order_id)).await?;
		Ok(())
	}
}

/// Configuration schema for [`HttpAuthority`].
pub struct HttpAuthoritySchema;

impl ConfigSchema for HttpAuthoritySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let non_empty = |value: &toml::Value| match value.as_str() {
			Some(s) if !s.trim().is_empty() => Ok(()),
			_ => Err("must not be empty".to_string()),
		};
		let schema = Schema::new(
			vec![Field::new("base_url", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(()),
					_ => Err("must start with http:// or https://".to_string()),
				}
			})],
			vec![
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
				Field::new("approve_cancellation_value", FieldType::String)
					.with_validator(non_empty),
				Field::new("reject_cancellation_value", FieldType::String)
					.with_validator(non_empty),
			],
		);
		schema.validate(config)
	}
}

/// Creates an HTTP authority.
///
/// Configuration parameters:
/// - `base_url` (required): backend root, e.g. `https://api.example.com`
/// - `timeout_seconds` (optional): per-request timeout, 1 to 300
/// - `approve_cancellation_value` (optional): defaults to `cancell`
/// - `reject_cancellation_value` (optional): defaults to `reject cancellation`
pub fn create_authority(config: &toml::Value) -> Result<Box<dyn OrderAuthority>, AuthorityError> {
	HttpAuthoritySchema
		.validate(config)
		.map_err(|e| AuthorityError::Configuration(format!("Invalid configuration: {}", e)))?;

	let base_url = config
		.get("base_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| AuthorityError::Configuration("base_url is required".to_string()))?;
	let timeout = config
		.get("timeout_seconds")
		.and_then(|v| v.as_integer())
		.map(|secs| Duration::from_secs(secs as u64));
	let approve = config
		.get("approve_cancellation_value")
		.and_then(|v| v.as_str())
		.unwrap_or(APPROVE_CANCELLATION_WIRE);
	let reject = config
		.get("reject_cancellation_value")
		.and_then(|v| v.as_str())
		.unwrap_or(REJECT_CANCELLATION_WIRE);

	Ok(Box::new(
		HttpAuthority::new(base_url, timeout)?.with_cancellation_values(approve, reject),
	))
}

/// Registry for the HTTP authority.
pub struct Registry;

impl market_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = crate::AuthorityFactory;

	fn factory() -> Self::Factory {
		create_authority
	}
}

impl crate::AuthorityRegistry for Registry {}
