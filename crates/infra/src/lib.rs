//! Infrastructure layer: in-memory stores backing the API.

pub mod store;

pub use store::{InMemoryPermissionStore, InMemoryUserStore, PermissionStore, UserStore};
