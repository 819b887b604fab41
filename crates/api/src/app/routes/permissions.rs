use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::{MethodRouter, delete, get, post},
};

use warden_auth::PermissionDefinition;
use warden_core::{DomainError, PermissionId};

use crate::app::dto::CreatePermissionRequest;
use crate::app::errors::ApiResult;
use crate::app::routes::gated;
use crate::app::services::AppServices;
use crate::authz;
use crate::middleware::GateState;

pub fn router(gate: &GateState) -> Router {
    Router::new()
        .route("/", collection(gate))
        .route(
            "/id/:id",
            gated(get(get_permission_by_id), gate, &authz::READ_PERMISSIONS),
        )
        .route(
            "/name/:permission_name",
            gated(get(get_permission_by_name), gate, &authz::READ_PERMISSIONS)
                .merge(gated(delete(delete_permission), gate, &authz::WRITE_PERMISSIONS)),
        )
}

/// `GET`/`POST /permissions`.
pub fn collection(gate: &GateState) -> MethodRouter {
    gated(get(list_permissions), gate, &authz::READ_PERMISSIONS)
        .merge(gated(post(create_permission), gate, &authz::WRITE_PERMISSIONS))
}

/// GET /permissions
pub async fn list_permissions(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<Vec<PermissionDefinition>> {
    Json(services.permissions.list())
}

/// POST /permissions
pub async fn create_permission(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreatePermissionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PermissionDefinition>)> {
    let Json(body) = body?;
    body.validate()?;

    let id = services
        .permissions
        .create(&body.permission_name, &body.description)?;

    Ok((
        StatusCode::CREATED,
        Json(PermissionDefinition {
            id,
            name: body.permission_name,
            description: body.description,
            deletable: true,
        }),
    ))
}

/// GET /permissions/id/:id
pub async fn get_permission_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PermissionDefinition>> {
    let id = id
        .parse::<PermissionId>()
        .with_context(|| format!("invalid permission id {id:?}"))?;

    let permission = services
        .permissions
        .get_by_id(id)
        .ok_or(DomainError::PermissionNotFound)?;
    Ok(Json(permission))
}

/// GET /permissions/name/:permission_name
pub async fn get_permission_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Path(permission_name): Path<String>,
) -> ApiResult<Json<PermissionDefinition>> {
    let permission = services
        .permissions
        .get_by_name(&permission_name)
        .ok_or(DomainError::PermissionNotFound)?;
    Ok(Json(permission))
}

/// DELETE /permissions/name/:permission_name
///
/// Built-in permissions cannot be deleted. Every grant of the permission is
/// dropped along with it.
pub async fn delete_permission(
    Extension(services): Extension<Arc<AppServices>>,
    Path(permission_name): Path<String>,
) -> ApiResult<StatusCode> {
    services.permissions.delete(&permission_name)?;
    Ok(StatusCode::NO_CONTENT)
}
