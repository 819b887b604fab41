use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{MethodRouter, delete, get},
};

use warden_auth::User;
use warden_core::{DomainError, UserId, same_name};

use crate::app::errors::ApiResult;
use crate::app::routes::gated;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::CurrentUser;
use crate::middleware::GateState;

pub fn router(gate: &GateState) -> Router {
    Router::new()
        .route("/", collection(gate))
        .route("/id/:id", gated(get(get_user_by_id), gate, &authz::READ_USERS))
        .route("/username/:username", by_username(gate))
}

/// `GET /users`.
pub fn collection(gate: &GateState) -> MethodRouter {
    gated(get(list_users), gate, &authz::READ_USERS)
}

/// `GET`/`DELETE /users/username/:username`.
pub fn by_username(gate: &GateState) -> MethodRouter {
    gated(get(get_user_by_username), gate, &authz::READ_USERS)
        .merge(gated(delete(delete_user), gate, &authz::WRITE_USERS))
}

/// GET /users
pub async fn list_users(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<User>> {
    Json(services.users.list())
}

/// GET /users/id/:id
pub async fn get_user_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = id
        .parse::<UserId>()
        .with_context(|| format!("invalid user id {id:?}"))?;

    let user = services.users.get_by_id(id).ok_or(DomainError::UserNotFound)?;
    Ok(Json(user))
}

/// GET /users/username/:username
pub async fn get_user_by_username(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    let user = services
        .users
        .get_by_username(&username)
        .ok_or(DomainError::UserNotFound)?;
    Ok(Json(user))
}

/// DELETE /users/username/:username
///
/// The caller cannot delete their own account. The deleted user's grants go
/// with it.
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    if same_name(current.username(), &username) {
        return Err(DomainError::CannotDeleteSelf.into());
    }

    let removed = services.remove_user(&username)?;

    tracing::debug!(user_id = %removed.id, deleted_by = %current.user().id, "delete request served");
    Ok(StatusCode::NO_CONTENT)
}
