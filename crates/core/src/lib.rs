//! `warden-core`: identifiers and the domain error model shared by every crate.
//!
//! This crate contains **pure domain** primitives (no HTTP, no storage).

pub mod error;
pub mod id;
pub mod name;

pub use error::{DomainError, DomainResult, ValidationErrors};
pub use id::{PermissionId, UserId};
pub use name::same_name;
