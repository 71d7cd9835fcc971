//! Common types for the marketplace order engine.
//!
//! Shared data model consumed by every other crate in the workspace: the order
//! read model, the closed status set with its display metadata, vendor status
//! commands, the acting session, and the plumbing used to register and
//! validate pluggable implementations.

/// Order read model and line items.
pub mod order;
/// Implementation registry trait.
pub mod registry;
/// Acting session and fetch scope.
pub mod session;
/// Order statuses, display metadata and vendor commands.
pub mod status;
/// Configuration validation types.
pub mod validation;

pub use order::*;
pub use registry::*;
pub use session::*;
pub use status::*;
pub use validation::*;

/// Order fixtures shared by the workspace's tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
