use serde::{Deserialize, Serialize};

use warden_core::{DomainResult, UserId, ValidationErrors};

// -------------------------
// Request DTOs
// -------------------------

// Missing fields deserialize as empty strings so they surface as validation
// errors (or a failed login) rather than as body rejections.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
}

impl SignUpRequest {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "username", "username", &self.username, 4, 15);
        check_length(&mut errors, "password", "password", &self.password, 8, 40);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePermissionRequest {
    pub permission_name: String,
    pub description: String,
}

impl CreatePermissionRequest {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        check_length(
            &mut errors,
            "permission_name",
            "permission name",
            &self.permission_name,
            4,
            50,
        );
        if self.description.is_empty() {
            errors.add("description", "description cannot be empty");
        } else if self.description.len() > 100 {
            errors.add("description", "description can be at most 100 characters");
        }
        errors.into_result()
    }
}

/// Lengths are counted in UTF-8 bytes.
fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    if value.is_empty() {
        errors.add(field, format!("{label} cannot be empty"));
        return;
    }
    if value.len() < min || value.len() > max {
        errors.add(field, format!("{label} must be between {min} and {max} characters"));
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LogInResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub access_token: String,
    pub user_id: UserId,
}
