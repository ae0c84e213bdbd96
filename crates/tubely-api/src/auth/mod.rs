//! Bearer-token authentication

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{extract_bearer_token, AccessClaims, JwtVerifier, ACCESS_TOKEN_ISSUER};
pub use models::AuthUser;
