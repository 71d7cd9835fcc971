//! Customer and vendor order views.
//!
//! Both views wrap an [`OrderBoard`](crate::OrderBoard) and differ only in the
//! scope they fetch, the transitions they surface and how they sort and page.

pub mod customer;
pub mod vendor;

use crate::ViewError;
use market_types::{Role, Session};

/// Rejects a session whose role does not match the view being opened.
fn require_role(session: &Session, expected: Role, view: &str) -> Result<(), ViewError> {
	if session.role == expected {
		return Ok(());
	}
	tracing::warn!(role = %session.role, view = view, "Refused to open view");
	Err(ViewError::WrongRole {
		role: session.role,
		action: format!("open the {} view", view),
	})
}
