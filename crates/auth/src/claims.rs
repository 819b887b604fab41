use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::UserId;

use crate::Permission;

/// Lifetime of every issued token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

pub fn token_ttl() -> Duration {
    Duration::seconds(TOKEN_TTL_SECS)
}

/// Signed token payload.
///
/// Wire names follow the registered JWT claims: `sub` is the user id as a
/// decimal string and `exp` is unix seconds. `permissions` is a snapshot taken at
/// issuance and is omitted from the payload when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (decimal user id).
    pub sub: String,

    /// Expiration (unix seconds).
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token has expired")]
    Expired,

    #[error("subject is not a user id: {0:?}")]
    InvalidSubject(String),
}

impl TokenClaims {
    pub fn new(user_id: UserId, permissions: Vec<Permission>, issued_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: (issued_at + token_ttl()).timestamp(),
            permissions,
        }
    }

    pub fn user_id(&self) -> Result<UserId, ClaimsError> {
        self.sub
            .parse()
            .map_err(|_| ClaimsError::InvalidSubject(self.sub.clone()))
    }
}

/// Deterministically validate the time window of decoded claims.
///
/// The token is valid up to and including its `exp` second; there is no leeway.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), ClaimsError> {
    if now.timestamp() > claims.exp {
        return Err(ClaimsError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn expires_one_hour_after_issuance() {
        let claims = TokenClaims::new(UserId::new(1), vec![], issued_at());
        assert_eq!(claims.exp, issued_at().timestamp() + 3600);
        assert_eq!(claims.sub, "1");
    }

    #[test]
    fn valid_until_exp_inclusive() {
        let claims = TokenClaims::new(UserId::new(1), vec![], issued_at());
        let exp = issued_at() + token_ttl();

        assert!(validate_claims(&claims, issued_at() + Duration::minutes(59)).is_ok());
        assert!(validate_claims(&claims, exp).is_ok());
        assert_eq!(
            validate_claims(&claims, exp + Duration::seconds(1)),
            Err(ClaimsError::Expired)
        );
        assert_eq!(
            validate_claims(&claims, issued_at() + Duration::minutes(61)),
            Err(ClaimsError::Expired)
        );
    }

    #[test]
    fn empty_permissions_are_omitted_from_payload() {
        let claims = TokenClaims::new(UserId::new(3), vec![], issued_at());
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("permissions").is_none());

        let claims = TokenClaims::new(UserId::new(3), vec![Permission::new("users_read")], issued_at());
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["permissions"], serde_json::json!(["users_read"]));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let claims = TokenClaims {
            sub: "admin".to_string(),
            exp: 0,
            permissions: vec![],
        };
        assert!(matches!(claims.user_id(), Err(ClaimsError::InvalidSubject(_))));
    }
}
