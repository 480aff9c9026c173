//! Postgres queries for the `reports` table.
//!
//! Functions take any executor so the lifecycle store can run them inside a
//! transaction. Locations are stored as PostGIS points (SRID 4326) and read
//! back as separate coordinates.

use sqlx::PgExecutor;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report, ReportRow, ReportStatus};

pub async fn insert_report<'e, E: PgExecutor<'e>>(executor: E, data: &NewReport) -> Result<Report> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        INSERT INTO reports (category, description, geom, reported_by)
        VALUES ($1, $2, ST_SetSRID(ST_MakePoint($3, $4), 4326), $5)
        RETURNING
            id, category, description,
            ST_Y(geom) AS lat, ST_X(geom) AS lng,
            status, assigned_team, reported_by, created_at, updated_at
        "#,
    )
    .bind(&data.category)
    .bind(&data.description)
    .bind(data.location.lng)
    .bind(data.location.lat)
    .bind(&data.reported_by)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create report: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(row.into())
}

pub async fn list_reports<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Report>> {
    let rows = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT
            id, category, description,
            ST_Y(geom) AS lat, ST_X(geom) AS lng,
            status, assigned_team, reported_by, created_at, updated_at
        FROM reports
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list reports: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(rows.into_iter().map(Report::from).collect())
}

/// Fetch a report and hold its row lock until the surrounding transaction ends
pub async fn lock_report<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Report>> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT
            id, category, description,
            ST_Y(geom) AS lat, ST_X(geom) AS lng,
            status, assigned_team, reported_by, created_at, updated_at
        FROM reports
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to lock report {}: {:?}", id, e);
        AppError::Database(e)
    })?;

    Ok(row.map(Report::from))
}

/// Write status and team together
pub async fn write_lifecycle<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    status: ReportStatus,
    assigned_team: Option<&str>,
) -> Result<Report> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        UPDATE reports
        SET status = $2, assigned_team = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, category, description,
            ST_Y(geom) AS lat, ST_X(geom) AS lng,
            status, assigned_team, reported_by, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(assigned_team)
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update report {}: {:?}", id, e);
        AppError::Database(e)
    })?
    .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

    Ok(row.into())
}

pub async fn delete_report<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM reports WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete report {}: {:?}", id, e);
            AppError::Database(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Report {} not found", id)));
    }
    Ok(())
}
