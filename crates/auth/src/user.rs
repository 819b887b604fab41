//! User account record.

use serde::Serialize;

use warden_core::{UserId, same_name};

/// A registered user.
///
/// Passwords are stored and compared as plain text; they are never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip)]
    pub password: String,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches_username(&self, username: &str) -> bool {
        same_name(&self.username, username)
    }

    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }
}
