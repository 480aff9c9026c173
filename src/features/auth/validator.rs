use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::error::AuthError;
use super::model::{AuthenticatedUser, TokenClaims};
use crate::core::config::AuthConfig;

/// Verifies session tokens signed with the configured HS256 key
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = config.jwt_leeway.as_secs();

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validate a bearer token and resolve the caller's identity
    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidOrExpiredCredential
            },
        )?;

        Ok(data.claims.into())
    }
}
