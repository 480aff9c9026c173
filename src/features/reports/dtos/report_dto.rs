use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::models::{GeoJsonPoint, GeoPoint, Report, ReportStatus};
use crate::shared::validation::not_blank;

/// Request DTO for submitting a defect report
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    /// Free-form defect tag, e.g. "pothole"
    #[serde(alias = "type")]
    #[validate(
        length(min = 1, max = 100, message = "Category must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub category: String,

    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub lng: f64,
}

impl CreateReportDto {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Request DTO for dispatching a team to a report
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssignTeamDto {
    #[validate(custom(function = "not_blank"))]
    pub team: String,
}

/// Request DTO for changing a report's repair status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    pub status: ReportStatus,
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub location: GeoJsonPoint,
    pub status: ReportStatus,
    pub assigned_team: Option<String>,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            category: r.category,
            description: r.description,
            location: r.location.to_geojson(),
            status: r.status,
            assigned_team: r.assigned_team,
            reported_by: r.reported_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
