use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::lifecycle::LifecycleService;
use crate::features::reports::dtos::{
    AssignTeamDto, CreateReportDto, ReportResponseDto, UpdateStatusDto,
};
use crate::shared::types::{ApiResponse, Meta};

/// Submit a new defect report
#[utoipa::path(
    post,
    path = "/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only users may report defects")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(service): State<Arc<LifecycleService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let report = service.create_report(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report.into()), None, None)),
    ))
}

/// List every report
#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "All reports ordered by id", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<LifecycleService>>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = service.list_reports(&user).await?;
    let total = reports.len();
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}

/// Dispatch a team to a report
#[utoipa::path(
    put,
    path = "/reports/{id}/assign",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = AssignTeamDto,
    responses(
        (status = 200, description = "Team assigned", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid id or body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only managers may assign teams"),
        (status = 404, description = "Report or team not found"),
        (status = 409, description = "Team busy or report already resolved")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn assign_team(
    user: AuthenticatedUser,
    State(service): State<Arc<LifecycleService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<AssignTeamDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.assign_team(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Update a report's repair status
#[utoipa::path(
    put,
    path = "/reports/{id}/status",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid id or status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only workers may change repair status"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Status change not allowed from the current state")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_status(
    user: AuthenticatedUser,
    State(service): State<Arc<LifecycleService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.update_status(&user, id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Delete a report
#[utoipa::path(
    delete,
    path = "/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 400, description = "Invalid id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only managers may delete reports"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    user: AuthenticatedUser,
    State(service): State<Arc<LifecycleService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_report(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Deleted".to_string()),
        None,
    )))
}
