use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::lifecycle::LifecycleService;
use crate::features::teams::dtos::TeamResponseDto;
use crate::shared::types::{ApiResponse, Meta};

/// List repair teams and their availability
#[utoipa::path(
    get,
    path = "/teams",
    responses(
        (status = 200, description = "All teams ordered by name", body = ApiResponse<Vec<TeamResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only managers may list teams")
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn list_teams(
    user: AuthenticatedUser,
    State(service): State<Arc<LifecycleService>>,
) -> Result<Json<ApiResponse<Vec<TeamResponseDto>>>> {
    let teams = service.list_teams(&user).await?;
    let total = teams.len();
    let dtos: Vec<TeamResponseDto> = teams.into_iter().map(|t| t.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta::total(total)),
    )))
}
