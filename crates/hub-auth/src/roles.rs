//! Role names and checks.
//!
//! Roles live on user documents, not in tokens. Tokens carry identity
//! only, so revoking a role takes effect on the next request.

use hub_core::{doc_str, Document};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";

/// True when the user document carries exactly this role
pub fn has_role(user: &Document, role: &str) -> bool {
    doc_str(user, "role") == Some(role)
}
