use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role carried by every credential
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Citizen who reports defects
    User,
    /// Repair crew member who updates repair status
    Worker,
    /// Dispatcher who assigns teams and removes reports
    Manager,
}

impl Role {
    #[cfg(test)]
    pub const ALL: [Role; 3] = [Role::User, Role::Worker, Role::Manager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Worker => "worker",
            Role::Manager => "manager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity resolved from a validated credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Subject identifier (the user's id)
    pub sub: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn new(sub: impl Into<String>, role: Role) -> Self {
        Self {
            sub: sub.into(),
            role,
        }
    }
}

/// Claims carried inside the signed session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            sub: claims.sub,
            role: claims.role,
        }
    }
}
