use std::collections::HashSet;

use thiserror::Error;

use crate::Permission;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: requires one of {0:?}")]
    Forbidden(Vec<String>),
}

/// Anything guarded by a required-permission list (routes, commands).
///
/// The list is an OR: holding any one entry is sufficient. An empty list marks
/// the guarded thing as public.
pub trait RequiredPermissions {
    fn required_permissions(&self) -> &[Permission];
}

/// Check a granted permission set against a required list.
///
/// - No IO
/// - No panics
/// - Deny by default: a non-empty `required` with no overlap is rejected
pub fn authorize(granted: &[Permission], required: &[Permission]) -> Result<(), AuthzError> {
    if required.is_empty() {
        return Ok(());
    }

    let granted: HashSet<&str> = granted.iter().map(|p| p.as_str()).collect();

    if required.iter().any(|p| granted.contains(p.as_str())) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(
            required.iter().map(|p| p.as_str().to_string()).collect(),
        ))
    }
}
