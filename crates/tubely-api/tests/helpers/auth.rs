use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use tubely_api::auth::{AccessClaims, ACCESS_TOKEN_ISSUER};
use uuid::Uuid;

/// Must match the JWT_SECRET in `test_config`.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// A signed access token for `user_id`, valid for an hour.
pub fn token_for(user_id: Uuid) -> String {
    sign(user_id, 3600, TEST_JWT_SECRET)
}

pub fn expired_token_for(user_id: Uuid) -> String {
    sign(user_id, -3600, TEST_JWT_SECRET)
}

pub fn foreign_token_for(user_id: Uuid) -> String {
    sign(user_id, 3600, "a-different-secret-that-is-also-32-chars")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn sign(user_id: Uuid, exp_offset_secs: i64, secret: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user_id.to_string(),
        iss: ACCESS_TOKEN_ISSUER.to_string(),
        exp: now + exp_offset_secs,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}
