//! Configuration for the marketplace order engine.
//!
//! Configuration is TOML. Values may reference environment variables as
//! `${VAR}` or `${VAR:-default}`, and a file may pull other files in with
//! `include = ["a.toml", "b.toml"]` as long as every top-level section is
//! defined exactly once across them.

mod loader;

#[cfg(any(test, feature = "testing"))]
pub mod builders {
	pub mod config;
}

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub use loader::ConfigLoader;

/// Largest page size a vendor may configure.
pub const MAX_PAGE_SIZE: usize = 100;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Configuration error: {0}")]
	Parse(String),
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Per-view settings.
	#[serde(default)]
	pub views: ViewsConfig,
	/// Which order authority to talk to and how.
	pub authority: AuthorityConfig,
}

/// Per-view settings. The customer view has none: its page size is fixed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ViewsConfig {
	#[serde(default)]
	pub vendor: VendorViewConfig,
}

/// Vendor order table settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VendorViewConfig {
	/// Page size when the view opens. Defaults to 5.
	#[serde(default = "default_page_size")]
	pub default_page_size: usize,
	/// Page sizes offered in the page-size picker. Empty means any size up to
	/// [`MAX_PAGE_SIZE`].
	#[serde(default)]
	pub page_size_options: Vec<usize>,
}

impl Default for VendorViewConfig {
	fn default() -> Self {
		Self {
			default_page_size: default_page_size(),
			page_size_options: Vec::new(),
		}
	}
}

fn default_page_size() -> usize {
	5
}

/// Order authority selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorityConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of implementation names to their raw TOML tables.
	pub implementations: HashMap<String, toml::Value>,
}

/// Replaces `${VAR}` and `${VAR:-default}` with environment values.
///
/// Input is capped at 1MB to keep the regex scan bounded.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let resolved = re.replace_all(input, |caps: &regex::Captures| {
		let var_name = &caps[1];
		match std::env::var(var_name) {
			Ok(value) => value,
			Err(_) => match caps.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					missing.get_or_insert_with(|| var_name.to_string());
					String::new()
				},
			},
		}
	});

	if let Some(var_name) = missing {
		return Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			var_name
		)));
	}

	Ok(resolved.into_owned())
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Page sizes the vendor view may switch between.
	pub fn vendor_page_size_options(&self) -> &[usize] {
		&self.views.vendor.page_size_options
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let vendor = &self.views.vendor;
		if vendor.default_page_size == 0 || vendor.default_page_size > MAX_PAGE_SIZE {
			return Err(ConfigError::Validation(format!(
				"views.vendor.default_page_size must be between 1 and {}",
				MAX_PAGE_SIZE
			)));
		}
		if let Some(bad) = vendor
			.page_size_options
			.iter()
			.find(|size| **size == 0 || **size > MAX_PAGE_SIZE)
		{
			return Err(ConfigError::Validation(format!(
				"views.vendor.page_size_options contains invalid size {}",
				bad
			)));
		}
		if !vendor.page_size_options.is_empty()
			&& !vendor.page_size_options.contains(&vendor.default_page_size)
		{
			return Err(ConfigError::Validation(format!(
				"views.vendor.default_page_size {} is not one of page_size_options",
				vendor.default_page_size
			)));
		}

		if self.authority.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one authority implementation must be configured".into(),
			));
		}
		if self.authority.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Authority primary implementation cannot be empty".into(),
			));
		}
		if !self
			.authority
			.implementations
			.contains_key(&self.authority.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary authority '{}' not found in implementations",
				self.authority.primary
			)));
		}

		Ok(())
	}
}

/// Parses and validates a configuration string, resolving environment
/// variables first.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
