//! Domain error model.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Field-level validation failures, keyed by request field name.
///
/// Ordered so that error bodies are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`. The first message recorded for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise a [`DomainError::Validation`].
    pub fn into_result(self) -> DomainResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

/// Domain-level error.
///
/// Every failure the access-control core can report is classified here at the
/// point of detection. Transport layers map each variant to a fixed status code
/// and never reinterpret it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing, invalid, expired or insufficiently privileged credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// Login credentials did not match a user.
    #[error("wrong username or password")]
    WrongAuthentication,

    #[error("username already in use")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    /// The authenticated user tried to delete their own account.
    #[error("cannot delete the authenticated user")]
    CannotDeleteSelf,

    #[error("permission name already in use")]
    PermissionAlreadyExists,

    #[error("permission not found")]
    PermissionNotFound,

    /// Seeded permissions are not deletable.
    #[error("permission is not deletable")]
    PermissionNotDeletable,

    #[error("user already has this permission")]
    PermissionAlreadyGranted,

    /// No grant edge matched a revoke request.
    #[error("user does not have this permission")]
    PermissionNotGranted,

    /// The authenticated user tried to revoke one of their own permissions.
    #[error("cannot revoke a permission from the authenticated user")]
    CannotRevokeOwnPermission,
}
