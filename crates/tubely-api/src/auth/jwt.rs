//! HS256 access tokens

use crate::auth::models::JwtClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tubely_core::AppError;
use uuid::Uuid;

pub const TOKEN_ISSUER: &str = "tubely-access";

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `user_id` that expires after `ttl`.
    pub fn issue_token(&self, user_id: Uuid, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and return the user id in its subject.
    pub fn validate(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token has expired".to_string()),
                ErrorKind::InvalidIssuer => AppError::Unauthorized("Invalid token issuer".to_string()),
                _ => AppError::Unauthorized("Couldn't validate JWT".to_string()),
            },
        )?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(SECRET);
        let user_id = Uuid::new_v4();
        let token = service.issue_token(user_id, Duration::hours(1)).unwrap();
        assert_eq!(service.validate(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(SECRET);
        let token = service
            .issue_token(Uuid::new_v4(), Duration::hours(-2))
            .unwrap();
        match service.validate(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new(SECRET)
            .issue_token(Uuid::new_v4(), Duration::hours(1))
            .unwrap();
        let other = JwtService::new("fedcba9876543210fedcba9876543210");
        assert!(matches!(other.validate(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let claims = JwtClaims {
            iss: "someone-else".to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        match JwtService::new(SECRET).validate(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token issuer"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(JwtService::new(SECRET).validate("not-a-jwt").is_err());
    }
}
