//! Authority doubles for the view tests.

use async_trait::async_trait;
use market_authority::implementations::memory::MemoryAuthority;
use market_authority::{AuthorityError, AuthorityService, OrderAuthority};
use market_types::{Order, OrderId, OrderScope, StatusCommand};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn memory_service(orders: Vec<Order>) -> Arc<AuthorityService> {
	Arc::new(AuthorityService::new(
		"memory",
		Box::new(MemoryAuthority::with_orders(orders)),
	))
}

/// Serves fetches but fails every change with a network error.
pub struct FailingAuthority {
	inner: MemoryAuthority,
}

impl FailingAuthority {
	pub fn new(orders: Vec<Order>) -> Self {
		Self {
			inner: MemoryAuthority::with_orders(orders),
		}
	}
}

#[async_trait]
impl OrderAuthority for FailingAuthority {
	async fn fetch_orders(&self, scope: &OrderScope) -> Result<Vec<Order>, AuthorityError> {
		self.inner.fetch_orders(scope).await
	}

	async fn request_order_cancellation(
		&self,
		_order_id: OrderId,
		_reason: &str,
	) -> Result<(), AuthorityError> {
		Err(AuthorityError::Network("connection reset".into()))
	}

	async fn update_order_status(
		&self,
		_order_id: OrderId,
		_command: StatusCommand,
	) -> Result<(), AuthorityError> {
		Err(AuthorityError::Network("connection reset".into()))
	}
}

/// Holds every change until `release` is notified.
pub struct GatedAuthority {
	inner: MemoryAuthority,
	release: Arc<Notify>,
}

impl GatedAuthority {
	pub fn new(orders: Vec<Order>) -> (Self, Arc<Notify>) {
		let release = Arc::new(Notify::new());
		(
			Self {
				inner: MemoryAuthority::with_orders(orders),
				release: release.clone(),
			},
			release,
		)
	}
}

#[async_trait]
impl OrderAuthority for GatedAuthority {
	async fn fetch_orders(&self, scope: &OrderScope) -> Result<Vec<Order>, AuthorityError> {
		self.inner.fetch_orders(scope).await
	}

	async fn request_order_cancellation(
		&self,
		order_id: OrderId,
		reason: &str,
	) -> Result<(), AuthorityError> {
		self.release.notified().await;
		self.inner.request_order_cancellation(order_id, reason).await
	}

	async fn update_order_status(
		&self,
		order_id: OrderId,
		command: StatusCommand,
	) -> Result<(), AuthorityError> {
		self.release.notified().await;
		self.inner.update_order_status(order_id, command).await
	}
}

/// Commits changes, then fails the next fetch with a network error.
pub struct FlakyFetchAuthority {
	inner: MemoryAuthority,
	fail_next_fetch: AtomicBool,
}

impl FlakyFetchAuthority {
	pub fn new(orders: Vec<Order>) -> Self {
		Self {
			inner: MemoryAuthority::with_orders(orders),
			fail_next_fetch: AtomicBool::new(false),
		}
	}
}

#[async_trait]
impl OrderAuthority for FlakyFetchAuthority {
	async fn fetch_orders(&self, scope: &OrderScope) -> Result<Vec<Order>, AuthorityError> {
		if self.fail_next_fetch.swap(false, Ordering::SeqCst) {
			return Err(AuthorityError::Network("blip".into()));
		}
		self.inner.fetch_orders(scope).await
	}

	async fn request_order_cancellation(
		&self,
		order_id: OrderId,
		reason: &str,
	) -> Result<(), AuthorityError> {
		self.inner.request_order_cancellation(order_id, reason).await?;
		self.fail_next_fetch.store(true, Ordering::SeqCst);
		Ok(())
	}

	async fn update_order_status(
		&self,
		order_id: OrderId,
		command: StatusCommand,
	) -> Result<(), AuthorityError> {
		self.inner.update_order_status(order_id, command).await?;
		self.fail_next_fetch.store(true, Ordering::SeqCst);
		Ok(())
	}
}
