//! HTTP application wiring (Axum router + shared services).
//!
//! - `services.rs`: store and token service wiring
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: request/response bodies and request validation
//! - `errors.rs`: the error envelope every failure is rendered with

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let gate = services.gate();

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(&gate))
        .layer(Extension(services))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ApiConfig;

    fn app() -> (Router, Arc<AppServices>) {
        let services = Arc::new(services::build_services(&ApiConfig::new(
            "127.0.0.1:0",
            "router-test-secret",
        )));
        (build_app(Arc::clone(&services)), services)
    }

    fn bearer(services: &AppServices, user_id: i64) -> String {
        let token = services
            .issue_token_for(warden_core::UserId::new(user_id))
            .unwrap();
        format!("Bearer {token}")
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn health_is_open() {
        let (app, _) = app();
        let req = Request::get("/health").body(Body::empty()).unwrap();
        assert_eq!(send(app, req).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn gated_route_without_header_is_unauthorized() {
        let (app, _) = app();
        let req = Request::get("/users").body(Body::empty()).unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized_user");
        assert_eq!(body["status_code"], 401);
    }

    #[tokio::test]
    async fn read_only_user_can_list_but_not_delete() {
        let (app, services) = app();
        let auth = bearer(&services, 2);

        let list = Request::get("/users")
            .header(header::AUTHORIZATION, &auth)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app.clone(), list).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": 1, "username": "admin"}, {"id": 2, "username": "dsolarte"}]));

        let delete = Request::delete("/users/username/admin")
            .header(header::AUTHORIZATION, &auth)
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(app, delete).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn collections_answer_with_and_without_trailing_slash() {
        let (app, services) = app();
        let auth = bearer(&services, 1);

        for path in ["/users", "/users/", "/permissions", "/permissions/", "/users/username/dsolarte/"] {
            let req = Request::get(path)
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap();
            assert_eq!(send(app.clone(), req).await.0, StatusCode::OK, "GET {path}");
        }

        let req = Request::get("/users/")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(app, req).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_id_is_internal_error() {
        let (app, services) = app();
        let req = Request::get("/permissions/id/abc")
            .header(header::AUTHORIZATION, bearer(&services, 1))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_server_error");
    }

    #[tokio::test]
    async fn malformed_body_is_internal_error() {
        let (app, _) = app();
        let req = Request::post("/auth/logIn")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_server_error");
    }

    #[tokio::test]
    async fn public_route_rejects_a_bad_token() {
        let (app, _) = app();
        let req = Request::post("/auth/logIn")
            .header(header::AUTHORIZATION, "Bearer garbage")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"admin","password":"admin"}"#))
            .unwrap();

        assert_eq!(send(app, req).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_route_rejects_an_empty_authorization_header() {
        let (app, _) = app();
        let req = Request::post("/auth/logIn")
            .header(header::AUTHORIZATION, "")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"admin","password":"admin"}"#))
            .unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized_user");
    }

    #[tokio::test]
    async fn token_of_deleted_user_is_rejected() {
        let (app, services) = app();
        let id = services.users.create("carol", "password").unwrap();
        services.permissions.grant(id, "users_read").unwrap();
        let auth = bearer(&services, id.get());

        services.users.delete("carol").unwrap();

        let req = Request::get("/users")
            .header(header::AUTHORIZATION, auth)
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(app, req).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn revoking_own_permission_is_forbidden() {
        let (app, services) = app();
        let req = Request::delete("/users/username/ADMIN/permission/users_full")
            .header(header::AUTHORIZATION, bearer(&services, 1))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "cannot_revoke_permission");
        assert!(services.permissions.user_has_permission(
            warden_core::UserId::new(1),
            warden_core::PermissionId::new(1)
        ));
    }
}
