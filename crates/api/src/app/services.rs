use std::sync::Arc;

use warden_auth::{Hs256TokenService, TokenError, TokenService, User};
use warden_core::{DomainError, DomainResult, UserId};
use warden_infra::{InMemoryPermissionStore, InMemoryUserStore, PermissionStore, UserStore};

use crate::authz;
use crate::config::ApiConfig;
use crate::middleware::GateState;

/// Shared state handed to every handler.
///
/// Built once at startup; the stores live for the whole process.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub permissions: Arc<dyn PermissionStore>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppServices {
    pub fn new(
        users: Arc<dyn UserStore>,
        permissions: Arc<dyn PermissionStore>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            permissions,
            tokens,
        }
    }

    /// Issue a token embedding the user's current permissions, in grant order.
    pub fn issue_token_for(&self, user_id: UserId) -> Result<String, TokenError> {
        let permissions = self.permissions.permission_names_for_user(user_id);
        self.tokens.issue(user_id, permissions)
    }

    /// Create an account that starts with no grants.
    ///
    /// Ids are reused once the highest one is deleted, so any edge still left on
    /// the new id from a concurrent grant to the old account is cleared.
    pub fn register_user(&self, username: &str, password: &str) -> DomainResult<UserId> {
        let user_id = self.users.create(username, password)?;

        let stale = self.permissions.revoke_all_for_user(user_id);
        if stale > 0 {
            tracing::warn!(%user_id, stale, "cleared grants left on a reused user id");
        }
        Ok(user_id)
    }

    /// Delete an account and its grants.
    ///
    /// Grants go first: once the user row is gone its id can be handed to a new
    /// account, and a later cascade would strip that account's grants.
    pub fn remove_user(&self, username: &str) -> DomainResult<User> {
        let user = self
            .users
            .get_by_username(username)
            .ok_or(DomainError::UserNotFound)?;

        let dropped = self.permissions.revoke_all_for_user(user.id);
        self.users.delete(&user.username)?;

        tracing::info!(user_id = %user.id, grants_dropped = dropped, "user removed");
        Ok(user)
    }

    /// Gate state for public routes; routes narrow it with
    /// [`GateState::with_policy`].
    pub fn gate(&self) -> GateState {
        GateState {
            tokens: Arc::clone(&self.tokens),
            users: Arc::clone(&self.users),
            policy: &authz::PUBLIC,
        }
    }
}

/// In-memory wiring with the built-in users and permissions.
pub fn build_services(config: &ApiConfig) -> AppServices {
    AppServices::new(
        Arc::new(InMemoryUserStore::seeded()),
        Arc::new(InMemoryPermissionStore::seeded()),
        Arc::new(Hs256TokenService::new(config.jwt_secret.as_bytes())),
    )
}

#[cfg(test)]
mod tests {
    use warden_auth::permissions::{PERMISSIONS_READ, USERS_READ};

    use super::*;

    #[test]
    fn issued_token_carries_current_grants() {
        let services = build_services(&ApiConfig::new("127.0.0.1:0", "test-secret"));
        let token = services.issue_token_for(UserId::new(2)).unwrap();

        let verified = services.tokens.verify(&format!("Bearer {token}"), &[]).unwrap();
        assert_eq!(verified.user_id, UserId::new(2));
        assert_eq!(verified.permissions, vec![USERS_READ, PERMISSIONS_READ]);
    }

    #[test]
    fn new_user_token_has_no_permissions() {
        let services = build_services(&ApiConfig::new("127.0.0.1:0", "test-secret"));
        let id = services.users.create("carol", "password").unwrap();

        let token = services.issue_token_for(id).unwrap();
        let verified = services.tokens.verify(&format!("Bearer {token}"), &[]).unwrap();
        assert!(verified.permissions.is_empty());
    }

    #[test]
    fn removing_a_user_drops_their_grants() {
        let services = build_services(&ApiConfig::new("127.0.0.1:0", "test-secret"));

        let removed = services.remove_user("DSOLARTE").unwrap();
        assert_eq!(removed.id, UserId::new(2));
        assert!(services.users.get_by_id(UserId::new(2)).is_none());
        assert!(services.permissions.permissions_for_user(UserId::new(2)).is_empty());

        assert!(matches!(
            services.remove_user("dsolarte"),
            Err(DomainError::UserNotFound)
        ));
    }

    // A grant can land on the old account between the cascade and the row
    // delete. The next account to get that id must not inherit it.
    #[test]
    fn registered_user_never_inherits_a_reused_ids_grants() {
        let services = build_services(&ApiConfig::new("127.0.0.1:0", "test-secret"));
        let carol = services.register_user("carol", "password").unwrap();

        services.permissions.revoke_all_for_user(carol);
        services.permissions.grant(carol, "users_full").unwrap();
        services.users.delete("carol").unwrap();

        let dave = services.register_user("dave", "password").unwrap();
        assert_eq!(dave, carol);
        assert!(services.permissions.permissions_for_user(dave).is_empty());

        let token = services.issue_token_for(dave).unwrap();
        let verified = services.tokens.verify(&format!("Bearer {token}"), &[]).unwrap();
        assert!(verified.permissions.is_empty());
    }

    #[test]
    fn register_rejects_duplicate_names() {
        let services = build_services(&ApiConfig::new("127.0.0.1:0", "test-secret"));
        assert!(matches!(
            services.register_user("Admin", "password"),
            Err(DomainError::UserAlreadyExists)
        ));
    }
}
