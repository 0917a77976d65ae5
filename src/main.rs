use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, patch, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tasktracker_api::config;
use tasktracker_api::database::manager::DatabaseManager;
use tasktracker_api::database::stores::{
    CredentialStore, PgCredentialStore, PgTaskStore, TaskStore,
};
use tasktracker_api::handlers::{protected, public};
use tasktracker_api::middleware::jwt_auth_middleware;
use tasktracker_api::services::events::{LogPublisher, TaskEventPublisher};
use tasktracker_api::services::{AppState, AuthService, TaskService};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting task tracker API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect()
        .unwrap_or_else(|e| panic!("failed to create database pool: {}", e));

    // Stores and services are constructed once and injected; nothing below
    // reaches for a global handle.
    let users: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(pool.clone()));
    let tasks: Arc<dyn TaskStore> = Arc::new(PgTaskStore::new(pool.clone()));
    let events: Arc<dyn TaskEventPublisher> = Arc::new(LogPublisher);

    let state = AppState {
        pool,
        auth: Arc::new(AuthService::from_config(users.clone())),
        tasks: Arc::new(TaskService::new(tasks, users, events)),
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("TASKTRACKER_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected API behind the bearer-token middleware
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
}

fn api_routes() -> Router<AppState> {
    use protected::{tasks, users};

    Router::new()
        .route("/api/tasks", post(tasks::create))
        .route("/api/tasks/:id", patch(tasks::update).delete(tasks::delete))
        .route("/api/users/:id/tasks", get(users::list_tasks))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Task Tracker API",
            "version": version,
            "description": "Maintenance task tracker with manager/technician hierarchy",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/login, /auth/register (public - token acquisition)",
                "tasks": "/api/tasks[/:id] (protected)",
                "user_tasks": "/api/users/:id/tasks (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
