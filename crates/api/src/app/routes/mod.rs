use axum::{Router, middleware::from_fn_with_state, routing::MethodRouter};

use crate::authz::RoutePolicy;
use crate::middleware::{GateState, authorization_gate};

pub mod auth;
pub mod permissions;
pub mod system;
pub mod user_permissions;
pub mod users;

/// Router for every gated endpoint. `/health` is mounted separately.
///
/// The collections and the single-user path also answer with a trailing slash.
pub fn router(gate: &GateState) -> Router {
    Router::new()
        .nest("/auth", auth::router(gate))
        .nest("/users", users::router(gate).merge(user_permissions::router(gate)))
        .nest("/permissions", permissions::router(gate))
        .route("/users/", users::collection(gate))
        .route("/users/username/:username/", users::by_username(gate))
        .route("/permissions/", permissions::collection(gate))
}

/// Put `route` behind the authorization gate with `policy`.
pub(crate) fn gated(
    route: MethodRouter,
    gate: &GateState,
    policy: &'static RoutePolicy,
) -> MethodRouter {
    route.route_layer(from_fn_with_state(
        gate.with_policy(policy),
        authorization_gate,
    ))
}
