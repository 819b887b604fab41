use warden_auth::User;

/// Authenticated caller, attached to the request by the authorization gate.
///
/// Only present on routes whose policy requires at least one permission, or
/// when a public route was called with a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user: User,
}

impl CurrentUser {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}
