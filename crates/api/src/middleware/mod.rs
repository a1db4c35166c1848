//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated employee from a JWT Bearer token.
//! - [`rbac`] -- One extractor per [`Capability`](rooster_core::roles::Capability)
//!   gate used directly in handler signatures.

pub mod auth;
pub mod rbac;
