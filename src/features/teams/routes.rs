use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::core::middleware::require_operation;
use crate::features::auth::policy::Operation;
use crate::features::lifecycle::LifecycleService;
use crate::features::teams::handlers;

/// Team routes (auth middleware is applied by caller)
pub fn routes(service: Arc<LifecycleService>) -> Router {
    Router::new()
        .route(
            "/teams",
            get(handlers::list_teams).route_layer(from_fn_with_state(
                Operation::ListTeams,
                require_operation,
            )),
        )
        .with_state(service)
}
