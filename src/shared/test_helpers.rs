use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use serde_json::{json, Value};

use crate::core::config::AuthConfig;
use crate::core::router::{api_routes, AppServices};
use crate::features::auth::model::Role;
use crate::features::auth::{AuthService, JwtValidator, MemoryUserStore, TokenService};
use crate::features::lifecycle::{LifecycleService, LifecycleStore, MemoryLifecycleStore};

static NEXT_USER: AtomicUsize = AtomicUsize::new(1);

pub fn test_auth_config() -> AuthConfig {
    AuthConfig::new(
        "test-signing-secret-that-is-long-enough".to_string(),
        "roadfix-test".to_string(),
        Duration::from_secs(3600),
        Duration::ZERO,
    )
    .expect("test auth config is valid")
}

/// The full router over in-memory stores, with teams T1 and T2 seeded
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryLifecycleStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_auth_config();
        let store = Arc::new(MemoryLifecycleStore::new());
        store
            .ensure_teams(&["T1".to_string(), "T2".to_string()])
            .await
            .expect("seed teams");

        let services = AppServices {
            auth_service: Arc::new(AuthService::new(
                Arc::new(MemoryUserStore::new()),
                Arc::new(TokenService::new(&config)),
            )),
            lifecycle_service: Arc::new(LifecycleService::new(store.clone())),
            jwt_validator: Arc::new(JwtValidator::new(&config)),
        };

        let server = TestServer::new(api_routes(services)).expect("build test server");
        Self { server, store }
    }

    /// Register a fresh account with `role` and return its bearer token
    pub async fn token_for(&self, role: Role) -> String {
        let username = format!("{}_{}", role, NEXT_USER.fetch_add(1, Ordering::Relaxed));
        let password: String = Sentence(2..4).fake();

        let response = self
            .server
            .post("/register")
            .json(&json!({ "username": username, "password": password, "role": role }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let response = self
            .server
            .post("/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        response.json::<Value>()["data"]["token"]
            .as_str()
            .expect("login returns a token")
            .to_string()
    }

    /// Submit a report as `token` and return the response
    pub async fn create_report(&self, token: &str) -> TestResponse {
        let category: String = Word().fake();
        let description: String = Sentence(3..8).fake();
        self.server
            .post("/reports")
            .authorization_bearer(token)
            .json(&json!({
                "category": category,
                "description": description,
                "lat": 39.92,
                "lng": 32.85,
            }))
            .await
    }

    /// Submit a report and return its id
    pub async fn create_report_id(&self, token: &str) -> i64 {
        let response = self.create_report(token).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("created report has an id")
    }

    /// Team availability by name, read through `GET /teams`
    pub async fn team_availability(&self, manager_token: &str, team: &str) -> String {
        let response = self
            .server
            .get("/teams")
            .authorization_bearer(manager_token)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        response.json::<Value>()["data"]
            .as_array()
            .expect("team list")
            .iter()
            .find(|t| t["name"] == team)
            .and_then(|t| t["availability"].as_str())
            .expect("team exists")
            .to_string()
    }

    /// A report as seen through `GET /reports`
    pub async fn report(&self, token: &str, id: i64) -> Option<Value> {
        let response = self
            .server
            .get("/reports")
            .authorization_bearer(token)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        response.json::<Value>()["data"]
            .as_array()
            .expect("report list")
            .iter()
            .find(|r| r["id"] == id)
            .cloned()
    }
}
