use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Team availability enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "team_availability", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamAvailability {
    Available,
    Working,
}

impl std::fmt::Display for TeamAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamAvailability::Available => write!(f, "available"),
            TeamAvailability::Working => write!(f, "working"),
        }
    }
}

/// Database model for a repair team
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Team {
    pub name: String,
    pub availability: TeamAvailability,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn is_working(&self) -> bool {
        self.availability == TeamAvailability::Working
    }
}
