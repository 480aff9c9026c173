use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use super::report_location::GeoPoint;

/// Report status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Submitted by a citizen, no team yet
    #[serde(alias = "bildirildi")]
    Reported,
    /// A team has been dispatched
    #[serde(alias = "tamir edilecek")]
    Scheduled,
    /// Repair finished
    #[serde(alias = "tamir edildi")]
    Resolved,
}

impl ReportStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resolved)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Reported => write!(f, "reported"),
            ReportStatus::Scheduled => write!(f, "scheduled"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// A citizen-reported defect
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub location: GeoPoint,
    pub status: ReportStatus,
    pub assigned_team: Option<String>,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for a report, with the point unpacked into coordinates
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub status: ReportStatus,
    pub assigned_team: Option<String>,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            description: row.description,
            location: GeoPoint::new(row.lat, row.lng),
            status: row.status,
            assigned_team: row.assigned_team,
            reported_by: row.reported_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub category: String,
    pub description: String,
    pub location: GeoPoint,
    pub reported_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(ReportStatus::Resolved.to_string(), "resolved");
    }

    #[test]
    fn test_status_accepts_legacy_labels() {
        let parse = |s: &str| serde_json::from_str::<ReportStatus>(s).unwrap();
        assert_eq!(parse("\"bildirildi\""), ReportStatus::Reported);
        assert_eq!(parse("\"tamir edilecek\""), ReportStatus::Scheduled);
        assert_eq!(parse("\"tamir edildi\""), ReportStatus::Resolved);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(serde_json::from_str::<ReportStatus>("\"closed\"").is_err());
    }

    #[test]
    fn test_only_resolved_is_terminal() {
        assert!(ReportStatus::Resolved.is_terminal());
        assert!(!ReportStatus::Scheduled.is_terminal());
        assert!(!ReportStatus::Reported.is_terminal());
    }
}
