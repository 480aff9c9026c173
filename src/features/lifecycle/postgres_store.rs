use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::core::error::{AppError, Result};
use crate::features::lifecycle::machine::{Command, Lifecycle, TeamChange};
use crate::features::lifecycle::store::LifecycleStore;
use crate::features::reports::models::{NewReport, Report};
use crate::features::reports::store as reports;
use crate::features::teams::models::Team;
use crate::features::teams::store as teams;

/// Lifecycle store backed by Postgres.
///
/// Each compound write runs in one transaction. The report row is locked
/// first, then the involved team rows in name order, so concurrent calls on
/// the same report serialize and team locks are always taken in one order.
pub struct PgLifecycleStore {
    pool: PgPool,
}

impl PgLifecycleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn commit(tx: Transaction<'static, Postgres>) -> Result<()> {
        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Lock every named team in a stable order and return them by name
    async fn lock_teams(
        tx: &mut Transaction<'static, Postgres>,
        names: &[&str],
    ) -> Result<BTreeMap<String, Team>> {
        let mut sorted = names.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut locked = BTreeMap::new();
        for name in sorted {
            if let Some(team) = teams::lock_team(&mut **tx, name).await? {
                locked.insert(team.name.clone(), team);
            }
        }
        Ok(locked)
    }

    async fn write_team_changes(
        tx: &mut Transaction<'static, Postgres>,
        changes: &[TeamChange],
    ) -> Result<()> {
        for change in changes {
            teams::set_availability(&mut **tx, &change.team, change.availability).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LifecycleStore for PgLifecycleStore {
    async fn ensure_teams(&self, names: &[String]) -> Result<()> {
        for name in names {
            teams::ensure_team(&self.pool, name).await?;
        }
        Ok(())
    }

    async fn insert_report(&self, report: &NewReport) -> Result<Report> {
        reports::insert_report(&self.pool, report).await
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        reports::list_reports(&self.pool).await
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        teams::list_teams(&self.pool).await
    }

    async fn apply(&self, report_id: i64, command: &Command) -> Result<Report> {
        let mut tx = self.begin().await?;

        let report = reports::lock_report(&mut *tx, report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;
        let current = Lifecycle::of(&report)?;

        let mut involved: Vec<&str> = current.team().into_iter().collect();
        involved.extend(command.target_team());
        let locked = Self::lock_teams(&mut tx, &involved).await?;

        let target = command.target_team().and_then(|name| locked.get(name));
        let step = current.apply(command, target)?;
        if step.is_noop(&current) {
            // dropping the transaction rolls it back and releases the locks
            return Ok(report);
        }

        Self::write_team_changes(&mut tx, &step.team_changes).await?;
        let updated =
            reports::write_lifecycle(&mut *tx, report_id, step.next.status(), step.next.team())
                .await?;

        Self::commit(tx).await?;
        Ok(updated)
    }

    async fn remove_report(&self, report_id: i64) -> Result<Report> {
        let mut tx = self.begin().await?;

        let report = reports::lock_report(&mut *tx, report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;
        let current = Lifecycle::of(&report)?;

        let releases = current.release_on_delete();
        let names: Vec<&str> = releases.iter().map(|c| c.team.as_str()).collect();
        Self::lock_teams(&mut tx, &names).await?;

        reports::delete_report(&mut *tx, report_id).await?;
        Self::write_team_changes(&mut tx, &releases).await?;

        Self::commit(tx).await?;
        Ok(report)
    }
}
