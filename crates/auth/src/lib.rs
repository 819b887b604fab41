//! `warden-auth`: token issuance/verification and the permission model.
//!
//! No HTTP and no storage here.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod token;
pub mod user;

pub use authorize::{AuthzError, RequiredPermissions, authorize};
pub use claims::{ClaimsError, TOKEN_TTL_SECS, TokenClaims, validate_claims};
pub use permissions::{Permission, PermissionDefinition, UserPermission};
pub use token::{Hs256TokenService, TokenError, TokenService, VerifiedToken};
pub use user::User;
