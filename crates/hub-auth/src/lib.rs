//! # hub-auth
//!
//! Access tokens and role checks for the InventoHub backend.
//!
//! This crate provides:
//! - `TokenService` for HS256 JWT issue and verification
//! - `Claims`, the decoded token payload
//! - Role name constants and the `has_role` check

pub mod claims;
pub mod roles;
pub mod token;

// Re-exports for convenience
pub use claims::Claims;
pub use roles::{has_role, ROLE_ADMIN, ROLE_MANAGER};
pub use token::{TokenService, TOKEN_TTL_HOURS};
