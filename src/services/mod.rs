pub mod auth_service;
pub mod events;
pub mod task_service;

use std::sync::Arc;

use sqlx::PgPool;

pub use auth_service::AuthService;
pub use task_service::TaskService;

/// Shared per-process state handed to the router.
///
/// Everything here is read-only or internally synchronized; requests share
/// nothing else.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: Arc<AuthService>,
    pub tasks: Arc<TaskService>,
}
