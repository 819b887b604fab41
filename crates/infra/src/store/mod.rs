//! User and permission stores.
//!
//! Both stores are process-lifetime state shared by every request. The in-memory
//! implementations guard their whole state with a single lock so each
//! read-modify-write sequence (create, delete, grant, revoke) is atomic.

pub mod permissions;
pub mod users;

pub use permissions::InMemoryPermissionStore;
pub use users::InMemoryUserStore;

use warden_auth::{Permission, PermissionDefinition, User, UserPermission};
use warden_core::{DomainResult, PermissionId, UserId};

/// Identity store.
///
/// Usernames are unique case-insensitively. New ids are `max(existing) + 1`, so
/// an id freed by deleting the highest user is handed out again.
pub trait UserStore: Send + Sync {
    fn create(&self, username: &str, password: &str) -> DomainResult<UserId>;
    fn get_by_id(&self, id: UserId) -> Option<User>;
    fn get_by_username(&self, username: &str) -> Option<User>;
    /// All users in insertion order.
    fn list(&self) -> Vec<User>;
    fn delete(&self, username: &str) -> DomainResult<()>;
}

/// Permission definitions plus the user↔permission grant edges.
///
/// Names are unique case-insensitively; ids follow the same `max + 1` rule as
/// users.
pub trait PermissionStore: Send + Sync {
    fn create(&self, name: &str, description: &str) -> DomainResult<PermissionId>;
    fn get_by_id(&self, id: PermissionId) -> Option<PermissionDefinition>;
    fn get_by_name(&self, name: &str) -> Option<PermissionDefinition>;
    /// All definitions in insertion order.
    fn list(&self) -> Vec<PermissionDefinition>;
    /// Delete a deletable permission and every grant edge pointing at it.
    fn delete(&self, name: &str) -> DomainResult<()>;

    /// Grant edges of one user, in grant order.
    fn permissions_for_user(&self, user_id: UserId) -> Vec<UserPermission>;
    fn user_has_permission(&self, user_id: UserId, permission_id: PermissionId) -> bool;
    fn grant(&self, user_id: UserId, permission_name: &str) -> DomainResult<()>;
    fn revoke(&self, user_id: UserId, permission_name: &str) -> DomainResult<()>;
    /// Drop every edge of `user_id`, returning how many were removed.
    fn revoke_all_for_user(&self, user_id: UserId) -> usize;

    /// Names of the permissions currently granted to `user_id`, in grant order.
    ///
    /// Edges whose definition no longer resolves are skipped.
    fn permission_names_for_user(&self, user_id: UserId) -> Vec<Permission> {
        self.permissions_for_user(user_id)
            .into_iter()
            .filter_map(|edge| self.get_by_id(edge.permission_id))
            .map(|def| Permission::from(&def))
            .collect()
    }
}
