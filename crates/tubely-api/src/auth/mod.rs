//! Bearer-token authentication
//!
//! Requests under `/api` carry an HS256 JWT whose subject is the caller's user
//! id. Tokens are only validated here; issuing them belongs to whatever login
//! flow fronts the service (`JwtService::issue_token` exists for tooling and tests).

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtService;
pub use middleware::{auth_middleware, AuthState};
pub use models::{AuthUser, JwtClaims};
