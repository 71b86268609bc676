/// Common test utilities for integration tests
///
/// Shared infrastructure for integration tests:
/// - Test database setup (migrations run on first use)
/// - Test user and session creation
/// - Request building helpers
///
/// Tests require `DATABASE_URL` to point at a PostgreSQL instance.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use tienda_api::app::{build_router, AppState};
use tienda_api::config::Config;
use tienda_shared::auth::password::hash_password;
use tienda_shared::auth::token::generate_session_token;
use tienda_shared::models::session::Session;
use tienda_shared::models::user::{CreateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Password used for every test user
pub const TEST_PASSWORD: &str = "secret1";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user and session
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let suffix = Uuid::new_v4().simple().to_string();
        let user = User::create(
            &db,
            CreateUser {
                username: format!("tester-{}", &suffix[..12]),
                email: format!("tester-{}@example.com", suffix),
                password_hash: hash_password(TEST_PASSWORD)?,
                avatar_url: None,
            },
        )
        .await?;

        let (token, token_hash) = generate_session_token();
        Session::create(&db, user.id, &token_hash, 24).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Self {
            db,
            app,
            user,
            token,
        })
    }

    /// Authorization header value for the test session
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Sends an authenticated JSON request and returns (status, body)
    pub async fn request_json(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", self.auth_header());

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Sends a JSON request authenticated with an arbitrary token
    pub async fn request_json_anon_with_token(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        token: &str,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token));

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Sends an unauthenticated JSON request and returns (status, body)
    pub async fn request_json_anon(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Removes the test user (sessions cascade)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Generates a unique marker for search isolation between test runs
pub fn unique_marker() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}
