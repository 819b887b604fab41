use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use warden_core::{DomainError, ValidationErrors};

/// Error returned by handlers and the authorization gate.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Anything the domain does not classify. The cause is logged, never sent.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Internal(anyhow::anyhow!("malformed request body: {}", rejection.body_text()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Wire envelope shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub status_code: u16,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_details: Option<&'a ValidationErrors>,
}

/// Status and wire code for a domain error.
pub fn classify(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized_user"),
        DomainError::WrongAuthentication => (StatusCode::BAD_REQUEST, "wrong_authentication"),
        DomainError::UserAlreadyExists => (StatusCode::CONFLICT, "user_already_exists"),
        DomainError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
        DomainError::CannotDeleteSelf => (StatusCode::CONFLICT, "cannot_delete_user"),
        DomainError::PermissionAlreadyExists => (StatusCode::CONFLICT, "permission_already_exists"),
        DomainError::PermissionNotFound => (StatusCode::NOT_FOUND, "permission_not_found"),
        DomainError::PermissionNotDeletable => (StatusCode::CONFLICT, "permission_not_deletable"),
        DomainError::PermissionAlreadyGranted => (StatusCode::CONFLICT, "user_has_permission"),
        DomainError::PermissionNotGranted => (StatusCode::BAD_REQUEST, "user_not_has_permission"),
        DomainError::CannotRevokeOwnPermission => (StatusCode::CONFLICT, "cannot_revoke_permission"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    validation_details: Option<&ValidationErrors>,
) -> Response {
    let body = ErrorBody {
        status_code: status.as_u16(),
        code,
        message: message.into(),
        validation_details,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(err) => {
                let (status, code) = classify(&err);
                let details = match &err {
                    DomainError::Validation(details) => Some(details),
                    _ => None,
                };
                json_error(status, code, err.to_string(), details)
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_server_error",
                    "internal server error",
                    None,
                )
            }
        }
    }
}
