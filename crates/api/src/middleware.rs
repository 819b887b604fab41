use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use warden_auth::{RequiredPermissions, TokenService};
use warden_core::DomainError;
use warden_infra::UserStore;

use crate::app::errors::ApiError;
use crate::authz::RoutePolicy;
use crate::context::CurrentUser;

/// State for one gated route: the shared token service and user store plus the
/// policy that route was registered with.
#[derive(Clone)]
pub struct GateState {
    pub tokens: Arc<dyn TokenService>,
    pub users: Arc<dyn UserStore>,
    pub policy: &'static RoutePolicy,
}

impl GateState {
    pub fn with_policy(&self, policy: &'static RoutePolicy) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            users: Arc::clone(&self.users),
            policy,
        }
    }

    fn authenticate(&self, raw: &str) -> Result<CurrentUser, DomainError> {
        let verified = self
            .tokens
            .verify(raw, self.policy.required_permissions())
            .map_err(|e| {
                tracing::debug!(policy = self.policy.name(), error = %e, "token rejected");
                DomainError::Unauthorized
            })?;

        let Some(user) = self.users.get_by_id(verified.user_id) else {
            tracing::debug!(
                policy = self.policy.name(),
                user_id = %verified.user_id,
                "token subject no longer exists"
            );
            return Err(DomainError::Unauthorized);
        };

        Ok(CurrentUser::new(user))
    }
}

/// Deny-by-default gate run in front of every non-health route.
///
/// With an `Authorization` header the token is verified against the route's
/// policy and the caller is attached as [`CurrentUser`]. Without one, only
/// public routes go through.
pub async fn authorization_gate(
    State(gate): State<GateState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authorization_value(req.headers()) {
        Some(raw) => {
            let current = gate.authenticate(&raw)?;
            req.extensions_mut().insert(current);
        }
        None if gate.policy.is_public() => {}
        None => {
            tracing::debug!(policy = gate.policy.name(), "missing authorization header");
            return Err(DomainError::Unauthorized.into());
        }
    }

    Ok(next.run(req).await)
}

// A non-UTF-8 value counts as absent. An empty one is present and fails
// verification.
fn authorization_value(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn header_value_is_taken_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  abc"));
        assert_eq!(authorization_value(&headers).as_deref(), Some("Bearer  abc"));
    }

    #[test]
    fn missing_header_is_absent_empty_header_is_not() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_value(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static(""));
        assert_eq!(authorization_value(&headers).as_deref(), Some(""));
    }

    #[test]
    fn opaque_bytes_are_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff").unwrap());
        assert_eq!(authorization_value(&headers), None);
    }
}
