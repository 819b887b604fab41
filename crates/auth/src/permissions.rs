use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use warden_core::{PermissionId, UserId, same_name};

/// Permission name as carried in tokens and route policies.
///
/// Permissions are opaque strings (e.g. "users_read"); comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&PermissionDefinition> for Permission {
    fn from(value: &PermissionDefinition) -> Self {
        Self::new(value.name.clone())
    }
}

pub const USERS_FULL: Permission = Permission::from_static("users_full");
pub const USERS_READ: Permission = Permission::from_static("users_read");
pub const USERS_WRITE: Permission = Permission::from_static("users_write");
pub const PERMISSIONS_FULL: Permission = Permission::from_static("permissions_full");
pub const PERMISSIONS_READ: Permission = Permission::from_static("permissions_read");
pub const PERMISSIONS_WRITE: Permission = Permission::from_static("permissions_write");
pub const GRANT_PERMISSION: Permission = Permission::from_static("grant_permission");
pub const REVOKE_PERMISSION: Permission = Permission::from_static("revoke_permission");

/// Built-in permissions with their descriptions, in seed (= id) order.
pub static SEEDED: [(Permission, &str); 8] = [
    (USERS_FULL, "Full access to users endpoints"),
    (USERS_READ, "Only access to users GET endpoints"),
    (USERS_WRITE, "Only access to users POST, PUT and DELETE endpoints"),
    (PERMISSIONS_FULL, "Full access to permissions endpoints"),
    (PERMISSIONS_READ, "Only access to permissions GET endpoints"),
    (PERMISSIONS_WRITE, "Only access to permissions POST, PUT and DELETE endpoints"),
    (GRANT_PERMISSION, "Grant a permission to an user"),
    (REVOKE_PERMISSION, "Revoke a permission to an user"),
];

/// A permission known to the permission store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDefinition {
    pub id: PermissionId,

    #[serde(rename = "permission_name")]
    pub name: String,

    pub description: String,

    /// Seeded permissions are pinned; everything created at runtime is deletable.
    #[serde(skip)]
    pub deletable: bool,
}

impl PermissionDefinition {
    pub fn matches_name(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

/// Grant edge: `user_id` holds `permission_id`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct UserPermission {
    pub user_id: UserId,
    pub permission_id: PermissionId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_ignores_case() {
        let def = PermissionDefinition {
            id: PermissionId::new(1),
            name: "users_full".to_string(),
            description: String::new(),
            deletable: false,
        };
        assert!(def.matches_name("USERS_FULL"));
        assert!(!def.matches_name("users"));
    }

    #[test]
    fn deletable_flag_is_not_serialized() {
        let def = PermissionDefinition {
            id: PermissionId::new(9),
            name: "reports_read".to_string(),
            description: "Read reports".to_string(),
            deletable: true,
        };
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 9,
                "permission_name": "reports_read",
                "description": "Read reports",
            })
        );
    }

    #[test]
    fn seeded_names_are_unique() {
        let mut names: Vec<&str> = SEEDED.iter().map(|(p, _)| p.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SEEDED.len());
    }
}
