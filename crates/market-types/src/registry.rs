//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Each pluggable implementation (for now, the order authorities) provides a
/// `Registry` struct naming the configuration key it answers to and the
/// factory that builds it from its TOML table, e.g. `"memory"` for
/// `authority.implementations.memory`.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
