//! Bearer token issuance and verification (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use warden_core::UserId;

use crate::authorize::{AuthzError, authorize};
use crate::claims::{ClaimsError, TokenClaims, validate_claims};
use crate::Permission;

/// First-stage check on the raw `Authorization` value (no trailing space).
pub const BEARER: &str = "Bearer";

/// Stripped once, wherever it first occurs, before decoding.
pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("authorization value does not start with \"Bearer\"")]
    MissingBearer,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token has expired")]
    Expired,

    #[error("subject is not a user id: {0:?}")]
    InvalidSubject(String),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl From<ClaimsError> for TokenError {
    fn from(err: ClaimsError) -> Self {
        match err {
            ClaimsError::Expired => TokenError::Expired,
            ClaimsError::InvalidSubject(sub) => TokenError::InvalidSubject(sub),
        }
    }
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: UserId,
    /// Permission snapshot from issuance time; may be stale.
    pub permissions: Vec<Permission>,
}

/// Issues and verifies self-contained bearer tokens.
///
/// The `*_at` methods take the clock explicitly; the plain variants use the
/// current time.
pub trait TokenService: Send + Sync {
    fn issue_at(
        &self,
        user_id: UserId,
        permissions: Vec<Permission>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError>;

    /// Verify a raw `Authorization` header value against a route's required
    /// permissions (OR semantics, empty = no permission check).
    fn verify_at(
        &self,
        raw: &str,
        required: &[Permission],
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken, TokenError>;

    fn issue(&self, user_id: UserId, permissions: Vec<Permission>) -> Result<String, TokenError> {
        self.issue_at(user_id, permissions, Utc::now())
    }

    fn verify(&self, raw: &str, required: &[Permission]) -> Result<VerifiedToken, TokenError> {
        self.verify_at(raw, required, Utc::now())
    }
}

/// HMAC-SHA256 signed tokens with a shared secret.
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `validate_claims`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService").finish_non_exhaustive()
    }
}

impl TokenService for Hs256TokenService {
    fn issue_at(
        &self,
        user_id: UserId,
        permissions: Vec<Permission>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::new(user_id, permissions, now);

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        tracing::debug!(%user_id, exp = claims.exp, permissions = claims.permissions.len(), "token issued");
        Ok(token)
    }

    fn verify_at(
        &self,
        raw: &str,
        required: &[Permission],
        now: DateTime<Utc>,
    ) -> Result<VerifiedToken, TokenError> {
        if !raw.starts_with(BEARER) {
            return Err(TokenError::MissingBearer);
        }

        let token = raw.replacen(BEARER_PREFIX, "", 1);

        let claims = jsonwebtoken::decode::<TokenClaims>(&token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        validate_claims(&claims, now)?;
        let user_id = claims.user_id()?;

        authorize(&claims.permissions, required)?;

        Ok(VerifiedToken {
            user_id,
            permissions: claims.permissions,
        })
    }
}
