// JWT validation service
// Token issuance belongs to the identity service; this backend only
// validates access tokens and reads the principal's id, email and role.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    Expired,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Claims carried by an access token issued by the identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Principal's stable identifier (user id)
    pub sub: String,
    pub email: String,
    /// candidate | employer | sub_employer | admin
    pub role: String,
    pub aud: String,
    pub iss: String,
    pub exp: u64,
    pub iat: u64,
}

#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str, audience: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_env() -> Result<Self, JwtError> {
        let config = crate::app_config::config();
        if config.jwt_access_secret.is_empty() {
            return Err(JwtError::ConfigError(
                "JWT_ACCESS_SECRET is not set".to_string(),
            ));
        }
        Ok(Self::new(
            &config.jwt_access_secret,
            &config.jwt_audience,
            &config.jwt_issuer,
        ))
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-test-secret-test-secret!";

    fn issue(claims: &AccessTokenClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset: i64) -> AccessTokenClaims {
        let now = chrono::Utc::now().timestamp();
        AccessTokenClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "reviewer@example.com".to_string(),
            role: "employer".to_string(),
            aud: "hirepath.io".to_string(),
            iss: "hirepath.io".to_string(),
            exp: (now + exp_offset) as u64,
            iat: now as u64,
        }
    }

    #[test]
    fn test_valid_token_roundtrip() {
        let service = JwtService::new(SECRET, "hirepath.io", "hirepath.io");
        let claims = claims(3600);
        let token = issue(&claims);

        let decoded = service.validate_access_token(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, "employer");
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(SECRET, "hirepath.io", "hirepath.io");
        let token = issue(&claims(-3600));

        assert!(matches!(
            service.validate_access_token(&token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let service = JwtService::new(SECRET, "other.example", "hirepath.io");
        let token = issue(&claims(3600));

        assert!(matches!(
            service.validate_access_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
