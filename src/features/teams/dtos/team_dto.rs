use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::teams::models::{Team, TeamAvailability};

/// Response DTO for a team
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamResponseDto {
    pub name: String,
    pub availability: TeamAvailability,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponseDto {
    fn from(t: Team) -> Self {
        Self {
            name: t.name,
            availability: t.availability,
            updated_at: t.updated_at,
        }
    }
}
