//! Per-route authorization policies.
//!
//! Each route is registered with one of these policies; the gate in
//! [`crate::middleware`] enforces it before the handler runs. A policy is an
//! OR-list: holding any listed permission is enough. An empty list is public.

use warden_auth::permissions::{
    GRANT_PERMISSION, PERMISSIONS_FULL, PERMISSIONS_READ, PERMISSIONS_WRITE, REVOKE_PERMISSION,
    USERS_FULL, USERS_READ, USERS_WRITE,
};
use warden_auth::{Permission, RequiredPermissions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    name: &'static str,
    required: &'static [Permission],
}

impl RoutePolicy {
    pub const fn any_of(name: &'static str, required: &'static [Permission]) -> Self {
        Self { name, required }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_public(&self) -> bool {
        self.required.is_empty()
    }
}

impl RequiredPermissions for RoutePolicy {
    fn required_permissions(&self) -> &[Permission] {
        self.required
    }
}

static NONE: [Permission; 0] = [];
static USER_READERS: [Permission; 2] = [USERS_READ, USERS_FULL];
static USER_WRITERS: [Permission; 2] = [USERS_WRITE, USERS_FULL];
static PERMISSION_READERS: [Permission; 2] = [PERMISSIONS_READ, PERMISSIONS_FULL];
static PERMISSION_WRITERS: [Permission; 2] = [PERMISSIONS_WRITE, PERMISSIONS_FULL];
static GRANTERS: [Permission; 1] = [GRANT_PERMISSION];
static REVOKERS: [Permission; 1] = [REVOKE_PERMISSION];

/// Login and signup.
pub static PUBLIC: RoutePolicy = RoutePolicy::any_of("public", &NONE);

/// List/get users, list a user's permissions.
pub static READ_USERS: RoutePolicy = RoutePolicy::any_of("read_users", &USER_READERS);

/// Delete users.
pub static WRITE_USERS: RoutePolicy = RoutePolicy::any_of("write_users", &USER_WRITERS);

/// List/get permissions.
pub static READ_PERMISSIONS: RoutePolicy =
    RoutePolicy::any_of("read_permissions", &PERMISSION_READERS);

/// Create/delete permissions.
pub static WRITE_PERMISSIONS: RoutePolicy =
    RoutePolicy::any_of("write_permissions", &PERMISSION_WRITERS);

pub static GRANT: RoutePolicy = RoutePolicy::any_of("grant_permission", &GRANTERS);

pub static REVOKE: RoutePolicy = RoutePolicy::any_of("revoke_permission", &REVOKERS);
