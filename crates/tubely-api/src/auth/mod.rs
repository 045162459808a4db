//! Bearer-token authentication
//!
//! Requests carry a JWT in the `Authorization: Bearer <token>` header. The
//! middleware validates the signature and expiry, then stores the caller's
//! identity in request extensions for handlers to extract.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::{issue_token, AuthContext, JwtClaims};
