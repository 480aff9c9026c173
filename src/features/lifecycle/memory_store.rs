use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::lifecycle::machine::{Command, Lifecycle, TeamChange};
use crate::features::lifecycle::store::LifecycleStore;
use crate::features::reports::models::{NewReport, Report};
use crate::features::teams::models::{Team, TeamAvailability};

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    reports: BTreeMap<i64, Report>,
    teams: BTreeMap<String, Team>,
}

impl MemoryState {
    fn require_teams(&self, changes: &[TeamChange]) -> Result<()> {
        match changes.iter().find(|c| !self.teams.contains_key(&c.team)) {
            Some(missing) => Err(AppError::NotFound(format!(
                "Team {} not found",
                missing.team
            ))),
            None => Ok(()),
        }
    }

    fn write_team_changes(&mut self, changes: &[TeamChange]) {
        let now = Utc::now();
        for change in changes {
            if let Some(team) = self.teams.get_mut(&change.team) {
                team.availability = change.availability;
                team.updated_at = now;
            }
        }
    }
}

/// Lifecycle store held in process memory.
///
/// One mutex guards reports and teams together, so every compound write is
/// validated in full before the first mutation and observed all at once.
#[derive(Default)]
pub struct MemoryLifecycleStore {
    state: Mutex<MemoryState>,
}

impl MemoryLifecycleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LifecycleStore for MemoryLifecycleStore {
    async fn ensure_teams(&self, names: &[String]) -> Result<()> {
        let mut state = self.state.lock().await;
        for name in names {
            state.teams.entry(name.clone()).or_insert_with(|| Team {
                name: name.clone(),
                availability: TeamAvailability::Available,
                updated_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn insert_report(&self, report: &NewReport) -> Result<Report> {
        let mut state = self.state.lock().await;
        state.next_id += 1;

        let now = Utc::now();
        let record = Report {
            id: state.next_id,
            category: report.category.clone(),
            description: report.description.clone(),
            location: report.location,
            status: Lifecycle::Reported.status(),
            assigned_team: None,
            reported_by: report.reported_by.clone(),
            created_at: now,
            updated_at: now,
        };
        state.reports.insert(record.id, record.clone());

        Ok(record)
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        Ok(self.state.lock().await.reports.values().cloned().collect())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        Ok(self.state.lock().await.teams.values().cloned().collect())
    }

    async fn apply(&self, report_id: i64, command: &Command) -> Result<Report> {
        let mut state = self.state.lock().await;

        let report = state
            .reports
            .get(&report_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;
        let current = Lifecycle::of(&report)?;

        let target = command
            .target_team()
            .and_then(|name| state.teams.get(name))
            .cloned();
        let step = current.apply(command, target.as_ref())?;
        if step.is_noop(&current) {
            return Ok(report);
        }
        state.require_teams(&step.team_changes)?;

        state.write_team_changes(&step.team_changes);
        let updated = Report {
            status: step.next.status(),
            assigned_team: step.next.team().map(str::to_string),
            updated_at: Utc::now(),
            ..report
        };
        state.reports.insert(report_id, updated.clone());

        Ok(updated)
    }

    async fn remove_report(&self, report_id: i64) -> Result<Report> {
        let mut state = self.state.lock().await;

        let report = state
            .reports
            .get(&report_id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;
        let releases = Lifecycle::of(report)?.release_on_delete();
        state.require_teams(&releases)?;

        let removed = state
            .reports
            .remove(&report_id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;
        state.write_team_changes(&releases);

        Ok(removed)
    }
}
