use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, TokenClaims};

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Signs stateless session tokens. Nothing is stored server-side.
pub struct TokenService {
    encoding_key: EncodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_secs: i64::try_from(config.token_ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    pub fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user.sub.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_in: self.ttl_secs,
        })
    }

    pub(crate) fn sign(&self, claims: &TokenClaims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::features::auth::{AuthError, JwtValidator};
    use crate::shared::test_helpers::test_auth_config;

    #[test]
    fn test_issued_token_validates() {
        let config = test_auth_config();
        let tokens = TokenService::new(&config);
        let validator = JwtValidator::new(&config);

        let user = AuthenticatedUser::new("42", Role::Worker);
        let issued = tokens.issue(&user).unwrap();

        assert_eq!(issued.expires_in, 3600);
        assert_eq!(validator.validate(&issued.token).unwrap(), user);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_auth_config();
        let tokens = TokenService::new(&config);
        let validator = JwtValidator::new(&config);

        let now = Utc::now().timestamp();
        let token = tokens
            .sign(&TokenClaims {
                sub: "42".to_string(),
                role: Role::Manager,
                iss: config.issuer.clone(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert_eq!(
            validator.validate(&token),
            Err(AuthError::InvalidOrExpiredCredential)
        );
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let config = test_auth_config();
        let mut other = config.clone();
        other.jwt_secret = "another-secret-that-is-at-least-32-bytes".to_string();

        let token = TokenService::new(&other)
            .issue(&AuthenticatedUser::new("1", Role::Manager))
            .unwrap()
            .token;

        assert_eq!(
            JwtValidator::new(&config).validate(&token),
            Err(AuthError::InvalidOrExpiredCredential)
        );
    }

    #[test]
    fn test_garbage_token_rejected() {
        let validator = JwtValidator::new(&test_auth_config());
        assert_eq!(
            validator.validate("not-a-jwt"),
            Err(AuthError::InvalidOrExpiredCredential)
        );
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let config = test_auth_config();
        let mut other = config.clone();
        other.issuer = "someone-else".to_string();

        let token = TokenService::new(&other)
            .issue(&AuthenticatedUser::new("1", Role::User))
            .unwrap()
            .token;

        assert!(JwtValidator::new(&config).validate(&token).is_err());
    }
}
