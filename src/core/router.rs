use std::sync::Arc;

use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Router};

use crate::core::middleware;
use crate::features::auth::{routes as auth_routes, AuthService, JwtValidator};
use crate::features::lifecycle::LifecycleService;
use crate::features::reports::routes as reports_routes;
use crate::features::teams::routes as teams_routes;

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppServices {
    pub auth_service: Arc<AuthService>,
    pub lifecycle_service: Arc<LifecycleService>,
    pub jwt_validator: Arc<JwtValidator>,
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Application routes without the outer HTTP layers (CORS, tracing, swagger)
pub fn api_routes(services: AppServices) -> Router {
    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(reports_routes::routes(Arc::clone(
            &services.lifecycle_service,
        )))
        .merge(teams_routes::routes(Arc::clone(&services.lifecycle_service)))
        .route_layer(from_fn_with_state(
            services.jwt_validator,
            middleware::auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(services.auth_service))
        .route("/health", get(health_check));

    Router::new().merge(protected_routes).merge(public_routes)
}
