use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::teams::{
    dtos as teams_dtos, handlers as teams_handlers, models as teams_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::assign_team,
        reports_handlers::update_status,
        reports_handlers::delete_report,
        // Teams
        teams_handlers::list_teams,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::Role,
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::LoginResponseDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::LoginResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Reports
            reports_models::ReportStatus,
            reports_models::GeoJsonPoint,
            reports_dtos::CreateReportDto,
            reports_dtos::AssignTeamDto,
            reports_dtos::UpdateStatusDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Teams
            teams_models::TeamAvailability,
            teams_dtos::TeamResponseDto,
            ApiResponse<Vec<teams_dtos::TeamResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and current identity"),
        (name = "reports", description = "Road defect reports and their repair lifecycle"),
        (name = "teams", description = "Repair teams (managers only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Roadfix API",
        version = "0.1.0",
        description = "API documentation for Roadfix",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
