use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};

use crate::core::middleware::require_operation;
use crate::features::auth::policy::Operation;
use crate::features::lifecycle::LifecycleService;
use crate::features::reports::handlers;

type ReportRoute = MethodRouter<Arc<LifecycleService>>;

fn gated(route: ReportRoute, operation: Operation) -> ReportRoute {
    route.route_layer(from_fn_with_state(operation, require_operation))
}

/// Create routes for the reports feature
///
/// All routes require authentication (auth middleware is applied by caller).
/// Each method is role-gated before its path and body are extracted.
/// `PUT /reports/{id}` is the older spelling of the status route.
pub fn routes(service: Arc<LifecycleService>) -> Router {
    Router::new()
        .route(
            "/reports",
            gated(get(handlers::list_reports), Operation::ListReports).merge(gated(
                post(handlers::create_report),
                Operation::CreateReport,
            )),
        )
        .route(
            "/reports/{id}",
            gated(put(handlers::update_status), Operation::UpdateStatus).merge(gated(
                delete(handlers::delete_report),
                Operation::DeleteReport,
            )),
        )
        .route(
            "/reports/{id}/assign",
            gated(put(handlers::assign_team), Operation::AssignTeam),
        )
        .route(
            "/reports/{id}/status",
            gated(put(handlers::update_status), Operation::UpdateStatus),
        )
        .with_state(service)
}
