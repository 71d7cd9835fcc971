//! Fluent construction of [`Config`] values for tests.

use crate::{AuthorityConfig, Config, VendorViewConfig, ViewsConfig};
use std::collections::HashMap;

/// Builds a [`Config`] that talks to the in-memory authority unless told
/// otherwise.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	vendor_page_size: usize,
	vendor_page_size_options: Vec<usize>,
	authority_primary: String,
	authority_implementations: HashMap<String, toml::Value>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		let mut authority_implementations = HashMap::new();
		authority_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);
		Self {
			vendor_page_size: 5,
			vendor_page_size_options: vec![5, 10, 20],
			authority_primary: "memory".to_string(),
			authority_implementations,
		}
	}

	pub fn vendor_page_size(mut self, size: usize) -> Self {
		self.vendor_page_size = size;
		self
	}

	pub fn vendor_page_size_options(mut self, options: Vec<usize>) -> Self {
		self.vendor_page_size_options = options;
		self
	}

	pub fn authority_primary(mut self, primary: impl Into<String>) -> Self {
		self.authority_primary = primary.into();
		self
	}

	/// Adds or replaces the raw table for an authority implementation.
	pub fn authority_implementation(mut self, name: impl Into<String>, table: toml::Value) -> Self {
		self.authority_implementations.insert(name.into(), table);
		self
	}

	pub fn build(self) -> Config {
		Config {
			views: ViewsConfig {
				vendor: VendorViewConfig {
					default_page_size: self.vendor_page_size,
					page_size_options: self.vendor_page_size_options,
				},
			},
			authority: AuthorityConfig {
				primary: self.authority_primary,
				implementations: self.authority_implementations,
			},
		}
	}
}
