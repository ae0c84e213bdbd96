//! HS256 access-token verification.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tubely_core::AppError;
use uuid::Uuid;

pub const ACCESS_TOKEN_ISSUER: &str = "tubely-access";

/// Access-token claims. `sub` is the user ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthenticated("Authorization header must be 'Bearer <token>'".to_string())
        })?;

    Ok(token)
}

/// Verifies access tokens against the configured secret.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate `token` and return the principal's user ID.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<AccessClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            AppError::Unauthenticated("Couldn't validate JWT".to_string())
        })?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthenticated("Invalid subject in JWT".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-jwt-secret-at-least-32-characters";

    fn token(sub: &str, iss: &str, exp_offset: i64, secret: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: sub.to_string(),
            iss: iss.to_string(),
            exp: now + exp_offset,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
        assert!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_bearer_token(&headers("Bearer ")).is_err());
    }

    #[test]
    fn test_verify_valid_token() {
        let user_id = Uuid::new_v4();
        let verifier = JwtVerifier::new(SECRET);
        let token = token(&user_id.to_string(), ACCESS_TOKEN_ISSUER, 3600, SECRET);
        assert_eq!(verifier.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_verify_rejects_bad_tokens() {
        let verifier = JwtVerifier::new(SECRET);
        let user = Uuid::new_v4().to_string();

        let cases = [
            token(&user, ACCESS_TOKEN_ISSUER, -3600, SECRET),
            token(&user, "someone-else", 3600, SECRET),
            token(&user, ACCESS_TOKEN_ISSUER, 3600, "another-secret-that-is-long-enough"),
            token("not-a-uuid", ACCESS_TOKEN_ISSUER, 3600, SECRET),
            "garbage".to_string(),
        ];
        for token in cases {
            let err = verifier.verify(&token).unwrap_err();
            assert!(matches!(err, AppError::Unauthenticated(_)));
        }
    }
}
