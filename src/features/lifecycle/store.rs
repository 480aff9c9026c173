use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::lifecycle::machine::Command;
use crate::features::reports::models::{NewReport, Report};
use crate::features::teams::models::Team;

/// Persistence for reports and teams.
///
/// `apply` and `remove_report` touch both entities and must commit all of
/// their writes or none. Calls against the same report are serialized;
/// different reports proceed independently.
#[async_trait]
pub trait LifecycleStore: Send + Sync {
    /// Insert missing teams as `available`; existing teams are left as they are
    async fn ensure_teams(&self, names: &[String]) -> Result<()>;

    async fn insert_report(&self, report: &NewReport) -> Result<Report>;

    async fn list_reports(&self) -> Result<Vec<Report>>;

    async fn list_teams(&self) -> Result<Vec<Team>>;

    /// Plan `command` against the report's current state and commit the
    /// resulting report and team writes as one unit
    async fn apply(&self, report_id: i64, command: &Command) -> Result<Report>;

    /// Remove a report, releasing a team still scheduled on it
    async fn remove_report(&self, report_id: i64) -> Result<Report>;
}
