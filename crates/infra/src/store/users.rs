use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use warden_auth::User;
use warden_core::{DomainError, DomainResult, UserId};

use super::UserStore;

/// In-memory user store.
///
/// Not persisted; everything is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the built-in accounts (`admin` = 1, `dsolarte` = 2).
    pub fn seeded() -> Self {
        Self {
            users: RwLock::new(vec![
                User::new(UserId::new(1), "admin", "admin"),
                User::new(UserId::new(2), "dsolarte", "1234"),
            ]),
        }
    }

    // No operation panics while holding the guard, so a poisoned lock still
    // protects consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserStore for InMemoryUserStore {
    fn create(&self, username: &str, password: &str) -> DomainResult<UserId> {
        let mut users = self.write();

        let mut last = UserId::new(0);
        for user in users.iter() {
            if user.matches_username(username) {
                return Err(DomainError::UserAlreadyExists);
            }
            last = last.max(user.id);
        }

        let id = last.next();
        users.push(User::new(id, username, password));

        tracing::info!(user_id = %id, username, "user created");
        Ok(id)
    }

    fn get_by_id(&self, id: UserId) -> Option<User> {
        self.read().iter().find(|u| u.id == id).cloned()
    }

    fn get_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .iter()
            .find(|u| u.matches_username(username))
            .cloned()
    }

    fn list(&self) -> Vec<User> {
        self.read().clone()
    }

    fn delete(&self, username: &str) -> DomainResult<()> {
        let mut users = self.write();

        let before = users.len();
        users.retain(|u| !u.matches_username(username));
        if users.len() == before {
            return Err(DomainError::UserNotFound);
        }

        tracing::info!(username, "user deleted");
        Ok(())
    }
}
