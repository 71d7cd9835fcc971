//! Builds order views from configuration.
//!
//! The builder creates every configured authority implementation it has a
//! factory for, keeps the primary one and hands out views bound to it.

use crate::{CustomerOrderView, VendorOrderView, ViewError};
use market_authority::{AuthorityError, AuthorityService, OrderAuthority};
use market_config::{Config, MAX_PAGE_SIZE};
use market_query::PageSizePolicy;
use market_types::Session;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building views.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<BuilderError> for ViewError {
	fn from(err: BuilderError) -> Self {
		match err {
			BuilderError::Config(message) => ViewError::Config(message),
		}
	}
}

/// Name to factory map covering every built-in authority.
pub fn default_factories() -> HashMap<String, market_authority::AuthorityFactory> {
	market_authority::get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect()
}

/// Builder for a [`ViewFactory`].
pub struct ViewBuilder {
	config: Config,
}

impl ViewBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Creates the configured authorities and selects the primary one.
	pub fn build<F>(self, factories: HashMap<String, F>) -> Result<ViewFactory, BuilderError>
	where
		F: Fn(&toml::Value) -> Result<Box<dyn OrderAuthority>, AuthorityError>,
	{
		let authority = &self.config.authority;
		let mut implementations = HashMap::new();
		for (name, config) in &authority.implementations {
			let Some(factory) = factories.get(name) else {
				tracing::warn!(component = "authority", implementation = %name, "No factory registered, skipping");
				continue;
			};
			match factory(config) {
				Ok(implementation) => {
					let is_primary = &authority.primary == name;
					tracing::info!(component = "authority", implementation = %name, enabled = %is_primary, "Loaded");
					implementations.insert(name.clone(), implementation);
				},
				Err(e) => {
					tracing::error!(
						component = "authority",
						implementation = %name,
						error = %e,
						"Failed to create authority implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create authority implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let backend = implementations.remove(&authority.primary).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary authority '{}' failed to load or has invalid configuration",
				authority.primary
			))
		})?;

		let vendor = &self.config.views.vendor;
		Ok(ViewFactory {
			authority: Arc::new(AuthorityService::new(authority.primary.clone(), backend)),
			vendor_page_size: PageSizePolicy::Configurable {
				default: vendor.default_page_size,
				options: vendor.page_size_options.clone(),
				max: MAX_PAGE_SIZE,
			},
		})
	}
}

/// Opens views that share one authority.
pub struct ViewFactory {
	authority: Arc<AuthorityService>,
	vendor_page_size: PageSizePolicy,
}

impl ViewFactory {
	pub fn authority(&self) -> &Arc<AuthorityService> {
		&self.authority
	}

	pub fn customer_view(&self, session: Session) -> Result<CustomerOrderView, ViewError> {
		CustomerOrderView::open(session, self.authority.clone())
	}

	pub fn vendor_view(&self, session: Session) -> Result<VendorOrderView, ViewError> {
		VendorOrderView::open(
			session,
			self.authority.clone(),
			self.vendor_page_size.clone(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use market_config::builders::config::ConfigBuilder;
	use market_types::testing::orders;
	use market_types::OrderStatus::*;
	use std::io::Write;

	#[tokio::test]
	async fn test_build_with_memory_authority() {
		let config = ConfigBuilder::new().vendor_page_size(10).build();
		let views = ViewBuilder::new(config).build(default_factories()).unwrap();
		assert_eq!(views.authority().implementation(), "memory");

		let vendor = views.vendor_view(Session::vendor(1)).unwrap();
		vendor.enter().await.unwrap();
		assert_eq!(vendor.board().query_params().await.page_size, 10);
		assert!(vendor.board().set_page_size(20).await.is_ok());
		assert!(vendor.board().set_page_size(15).await.is_err());

		let customer = views.customer_view(Session::customer(1)).unwrap();
		assert_eq!(customer.board().query_params().await.page_size, 5);
		assert!(views.customer_view(Session::vendor(1)).is_err());
	}

	#[tokio::test]
	async fn test_open_page_sizes_stop_at_maximum() {
		let config = ConfigBuilder::new()
			.vendor_page_size_options(vec![])
			.build();
		let views = ViewBuilder::new(config).build(default_factories()).unwrap();
		let vendor = views.vendor_view(Session::vendor(1)).unwrap();

		assert!(vendor.board().set_page_size(37).await.is_ok());
		assert!(vendor.board().set_page_size(MAX_PAGE_SIZE).await.is_ok());
		assert!(matches!(
			vendor.board().set_page_size(MAX_PAGE_SIZE + 1).await,
			Err(ViewError::Validation(_))
		));
		assert!(vendor.board().set_page_size(100_000).await.is_err());
		assert_eq!(vendor.board().query_params().await.page_size, MAX_PAGE_SIZE);
	}

	#[tokio::test]
	async fn test_build_from_config_file_with_seed() {
		let dir = tempfile::TempDir::new().unwrap();
		let seed_path = dir.path().join("orders.json");
		let mut seed = std::fs::File::create(&seed_path).unwrap();
		seed.write_all(
			serde_json::to_string(&orders(&[Pending, Shipped, Pending]))
				.unwrap()
				.as_bytes(),
		)
		.unwrap();

		let config_path = dir.path().join("market.toml");
		std::fs::write(
			&config_path,
			format!(
				r#"
[views.vendor]
default_page_size = 5
page_size_options = [5, 10]

[authority]
primary = "memory"
[authority.implementations.memory]
seed_file = "{}"
"#,
				seed_path.display()
			),
		)
		.unwrap();

		let config = Config::from_file(config_path.to_str().unwrap())
			.await
			.unwrap();
		let views = ViewBuilder::new(config).build(default_factories()).unwrap();
		let vendor = views.vendor_view(Session::vendor(1)).unwrap();
		vendor.enter().await.unwrap();
		assert_eq!(vendor.board().stats().await.count(Pending), 2);
		assert_eq!(vendor.board().page().await.total_count, 3);
	}

	#[test]
	fn test_failing_factory_is_reported() {
		let config = ConfigBuilder::new()
			.authority_primary("http")
			.authority_implementation("http", toml::Value::Table(toml::map::Map::new()))
			.build();
		let err = ViewBuilder::new(config)
			.build(default_factories())
			.err()
			.unwrap();
		assert!(err.to_string().contains("'http'"));
	}

	#[test]
	fn test_missing_primary_factory() {
		let config = ConfigBuilder::new().authority_primary("grpc").build();
		let err = ViewBuilder::new(config)
			.build(default_factories())
			.err()
			.unwrap();
		assert!(err.to_string().contains("Primary authority 'grpc'"));
		let err: ViewError = err.into();
		assert!(matches!(err, ViewError::Config(_)));
	}
}
