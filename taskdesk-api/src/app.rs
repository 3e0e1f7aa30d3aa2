/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::postgres(pool, config);
/// let app = taskdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::jwt_auth_layer, security::SecurityHeadersLayer},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdesk_shared::{
    services::{AuthService, TaskService},
    store::{PgStore, TaskStore, UserStore},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Everything inside is behind an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and bearer verification
    pub auth: AuthService,

    /// Ownership-scoped task operations
    pub tasks: TaskService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state over arbitrary stores
    pub fn new(config: Config, users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            auth: AuthService::new(users.clone(), config.token_settings()),
            tasks: TaskService::new(users, tasks),
            config: Arc::new(config),
        }
    }

    /// Creates state backed by PostgreSQL
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::new(config, store.clone(), store)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health            # Health check (public)
/// ├── /auth/                    # Authentication (public)
/// │   ├── POST /register
/// │   └── POST /login
/// └── /tasks                    # Tasks (bearer token)
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (task routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    // Task routes (require JWT authentication). `route_layer` keeps unknown
    // paths at 404 instead of 401.
    let task_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Permissive CORS when the origin list contains `*`, otherwise only the
/// configured origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
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
        .max_age(std::time::Duration::from_secs(3600))
}
