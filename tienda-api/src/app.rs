/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tienda_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = tienda_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tienda_shared::auth::context::{AuthContext, AuthError};
use tienda_shared::auth::token::hash_session_token;
use tienda_shared::models::session::Session;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Session lifetime in hours
    pub fn session_ttl_hours(&self) -> i64 {
        self.config.session.ttl_hours
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /                      # Home (public)
/// ├── GET /about                 # About (public)
/// ├── GET /health                # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register     # Register (public)
///     │   ├── POST /login        # Login (public)
///     │   └── POST /logout       # Logout (session required)
///     ├── /account/              # Self-service profile (session required)
///     │   ├── GET    /
///     │   ├── PUT    /
///     │   ├── DELETE /
///     │   └── POST   /password
///     ├── /customers/            # Customer CRUD (session required)
///     ├── /products/             # Product creation (session required)
///     └── /search                # Text search (session required)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public pages and health check
    let public_routes = Router::new()
        .route("/", get(routes::home::home))
        .route("/about", get(routes::home::about))
        .route("/health", get(routes::health::health_check));

    // Auth routes that must be reachable anonymously
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything below requires an active session
    let protected_routes = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route(
            "/account",
            get(routes::account::get_profile)
                .put(routes::account::update_profile)
                .delete(routes::account::delete_account),
        )
        .route("/account/password", post(routes::account::change_password))
        .route(
            "/customers",
            post(routes::customers::create_customer).get(routes::customers::list_customers),
        )
        .route(
            "/customers/:id",
            get(routes::customers::get_customer)
                .put(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        .route("/products", post(routes::products::create_product))
        .route("/search", get(routes::search::search))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Extracts the bearer token from the Authorization header, resolves it to
/// an active session, and injects an [`AuthContext`] into the request
/// extensions. Missing, unknown, or expired tokens are rejected with 401 and
/// a warning message asking the client to log in.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let token_hash = hash_session_token(token);

    let session = Session::find_active(&state.db, &token_hash)
        .await
        .map_err(|e| AuthError::StoreError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    let auth_context = AuthContext {
        user_id: session.user_id,
        username: session.username,
        session_id: session.id,
    };

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
