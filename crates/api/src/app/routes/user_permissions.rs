//! Grant edges, addressed through the user they belong to.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{delete, get, post},
};

use warden_auth::{Permission, User};
use warden_core::{DomainError, DomainResult, same_name};

use crate::app::errors::ApiResult;
use crate::app::routes::gated;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::CurrentUser;
use crate::middleware::GateState;

pub fn router(gate: &GateState) -> Router {
    Router::new()
        .route(
            "/username/:username/permissions",
            gated(get(permissions_for_user), gate, &authz::READ_USERS),
        )
        .route(
            "/username/:username/permission/:permission_name",
            gated(post(grant_permission), gate, &authz::GRANT)
                .merge(gated(delete(revoke_permission), gate, &authz::REVOKE)),
        )
}

fn find_user(services: &AppServices, username: &str) -> DomainResult<User> {
    services
        .users
        .get_by_username(username)
        .ok_or(DomainError::UserNotFound)
}

/// GET /users/username/:username/permissions
///
/// Names of the permissions currently granted, in grant order.
pub async fn permissions_for_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<Permission>>> {
    let user = find_user(&services, &username)?;
    Ok(Json(services.permissions.permission_names_for_user(user.id)))
}

/// POST /users/username/:username/permission/:permission_name
pub async fn grant_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Path((username, permission_name)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let user = find_user(&services, &username)?;
    services.permissions.grant(user.id, &permission_name)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/username/:username/permission/:permission_name
///
/// The caller cannot revoke their own permissions.
pub async fn revoke_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path((username, permission_name)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    if same_name(current.username(), &username) {
        return Err(DomainError::CannotRevokeOwnPermission.into());
    }

    let user = find_user(&services, &username)?;
    services.permissions.revoke(user.id, &permission_name)?;
    Ok(StatusCode::NO_CONTENT)
}
