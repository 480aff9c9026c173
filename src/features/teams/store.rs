//! Postgres queries for the `teams` table.

use sqlx::PgExecutor;

use crate::core::error::{AppError, Result};
use crate::features::teams::models::{Team, TeamAvailability};

/// Insert a team if it does not exist yet; existing availability is kept
pub async fn ensure_team<'e, E: PgExecutor<'e>>(executor: E, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO teams (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed team {}: {:?}", name, e);
            AppError::Database(e)
        })?;
    Ok(())
}

pub async fn list_teams<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Team>> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT name, availability, updated_at
        FROM teams
        ORDER BY name
        "#,
    )
    .fetch_all(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list teams: {:?}", e);
        AppError::Database(e)
    })
}

pub async fn lock_team<'e, E: PgExecutor<'e>>(executor: E, name: &str) -> Result<Option<Team>> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT name, availability, updated_at
        FROM teams
        WHERE name = $1
        FOR UPDATE
        "#,
    )
    .bind(name)
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock team {}: {:?}", name, e);
        AppError::Database(e)
    })
}

pub async fn set_availability<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    availability: TeamAvailability,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE teams
        SET availability = $2, updated_at = NOW()
        WHERE name = $1
        "#,
    )
    .bind(name)
    .bind(availability)
    .execute(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update team {}: {:?}", name, e);
        AppError::Database(e)
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Team {} not found", name)));
    }
    Ok(())
}
