use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use warden_auth::permissions::SEEDED;
use warden_auth::{Permission, PermissionDefinition, UserPermission};
use warden_core::{DomainError, DomainResult, PermissionId, UserId};

use super::PermissionStore;

#[derive(Debug, Default)]
struct PermissionState {
    definitions: Vec<PermissionDefinition>,
    grants: Vec<UserPermission>,
}

impl PermissionState {
    fn find_by_name(&self, name: &str) -> Option<&PermissionDefinition> {
        self.definitions.iter().find(|p| p.matches_name(name))
    }

    fn has_grant(&self, user_id: UserId, permission_id: PermissionId) -> bool {
        self.grants
            .iter()
            .any(|g| g.user_id == user_id && g.permission_id == permission_id)
    }
}

/// In-memory permission store.
///
/// Definitions and grant edges share one lock so that deleting a permission
/// and dropping its edges happen as one step.
#[derive(Debug, Default)]
pub struct InMemoryPermissionStore {
    state: RwLock<PermissionState>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the eight built-in (non-deletable) permissions and
    /// the grants of the built-in users.
    ///
    /// User 1 holds `users_full`, `permissions_full`, `grant_permission` and
    /// `revoke_permission`; user 2 holds `users_read` and `permissions_read`.
    pub fn seeded() -> Self {
        let definitions = SEEDED
            .iter()
            .zip(1..)
            .map(|((name, description), id)| PermissionDefinition {
                id: PermissionId::new(id),
                name: name.as_str().to_string(),
                description: description.to_string(),
                deletable: false,
            })
            .collect();

        let grants = [(1, 1), (1, 4), (1, 7), (1, 8), (2, 2), (2, 5)]
            .into_iter()
            .map(|(user, permission)| UserPermission {
                user_id: UserId::new(user),
                permission_id: PermissionId::new(permission),
            })
            .collect();

        Self {
            state: RwLock::new(PermissionState { definitions, grants }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PermissionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PermissionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PermissionStore for InMemoryPermissionStore {
    fn create(&self, name: &str, description: &str) -> DomainResult<PermissionId> {
        let mut state = self.write();

        let mut last = PermissionId::new(0);
        for def in &state.definitions {
            if def.matches_name(name) {
                return Err(DomainError::PermissionAlreadyExists);
            }
            last = last.max(def.id);
        }

        let id = last.next();
        state.definitions.push(PermissionDefinition {
            id,
            name: name.to_string(),
            description: description.to_string(),
            deletable: true,
        });

        tracing::info!(permission_id = %id, permission = name, "permission created");
        Ok(id)
    }

    fn get_by_id(&self, id: PermissionId) -> Option<PermissionDefinition> {
        self.read().definitions.iter().find(|p| p.id == id).cloned()
    }

    fn get_by_name(&self, name: &str) -> Option<PermissionDefinition> {
        self.read().find_by_name(name).cloned()
    }

    fn list(&self) -> Vec<PermissionDefinition> {
        self.read().definitions.clone()
    }

    fn delete(&self, name: &str) -> DomainResult<()> {
        let mut state = self.write();

        let Some(position) = state.definitions.iter().position(|p| p.matches_name(name)) else {
            return Err(DomainError::PermissionNotFound);
        };
        if !state.definitions[position].deletable {
            return Err(DomainError::PermissionNotDeletable);
        }

        let removed = state.definitions.remove(position);
        state.grants.retain(|g| g.permission_id != removed.id);

        tracing::info!(permission_id = %removed.id, permission = %removed.name, "permission deleted");
        Ok(())
    }

    fn permissions_for_user(&self, user_id: UserId) -> Vec<UserPermission> {
        self.read()
            .grants
            .iter()
            .filter(|g| g.user_id == user_id)
            .copied()
            .collect()
    }

    fn user_has_permission(&self, user_id: UserId, permission_id: PermissionId) -> bool {
        self.read().has_grant(user_id, permission_id)
    }

    fn grant(&self, user_id: UserId, permission_name: &str) -> DomainResult<()> {
        let mut state = self.write();

        let permission_id = state
            .find_by_name(permission_name)
            .map(|p| p.id)
            .ok_or(DomainError::PermissionNotFound)?;

        if state.has_grant(user_id, permission_id) {
            return Err(DomainError::PermissionAlreadyGranted);
        }

        state.grants.push(UserPermission {
            user_id,
            permission_id,
        });

        tracing::info!(%user_id, permission = permission_name, "permission granted");
        Ok(())
    }

    fn revoke(&self, user_id: UserId, permission_name: &str) -> DomainResult<()> {
        let mut state = self.write();

        let permission_id = state
            .find_by_name(permission_name)
            .map(|p| p.id)
            .ok_or(DomainError::PermissionNotFound)?;

        let before = state.grants.len();
        state
            .grants
            .retain(|g| !(g.user_id == user_id && g.permission_id == permission_id));
        if state.grants.len() == before {
            return Err(DomainError::PermissionNotGranted);
        }

        tracing::info!(%user_id, permission = permission_name, "permission revoked");
        Ok(())
    }

    fn revoke_all_for_user(&self, user_id: UserId) -> usize {
        let mut state = self.write();

        let before = state.grants.len();
        state.grants.retain(|g| g.user_id != user_id);
        before - state.grants.len()
    }

    fn permission_names_for_user(&self, user_id: UserId) -> Vec<Permission> {
        let state = self.read();

        state
            .grants
            .iter()
            .filter(|g| g.user_id == user_id)
            .filter_map(|g| state.definitions.iter().find(|p| p.id == g.permission_id))
            .map(Permission::from)
            .collect()
    }
}
