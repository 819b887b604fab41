use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};

use warden_core::DomainError;

use crate::app::dto::{LogInRequest, LogInResponse, SignUpRequest, SignUpResponse};
use crate::app::errors::ApiResult;
use crate::app::routes::gated;
use crate::app::services::AppServices;
use crate::authz;
use crate::middleware::GateState;

pub fn router(gate: &GateState) -> Router {
    Router::new()
        .route("/logIn", gated(post(log_in), gate, &authz::PUBLIC))
        .route("/signUp", gated(post(sign_up), gate, &authz::PUBLIC))
}

/// POST /auth/logIn
pub async fn log_in(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LogInRequest>, JsonRejection>,
) -> ApiResult<Json<LogInResponse>> {
    let Json(body) = body?;

    let user = services
        .users
        .get_by_username(&body.username)
        .filter(|u| u.password_matches(&body.password))
        .ok_or(DomainError::WrongAuthentication)?;

    let access_token = services
        .issue_token_for(user.id)
        .context("issuing access token")?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(LogInResponse { access_token }))
}

/// POST /auth/signUp
pub async fn sign_up(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignUpResponse>)> {
    let Json(body) = body?;
    body.validate()?;

    let user_id = services.register_user(&body.username, &body.password)?;

    let access_token = services
        .issue_token_for(user_id)
        .context("issuing access token")?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            access_token,
            user_id,
        }),
    ))
}
