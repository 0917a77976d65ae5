use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A maintenance task, owned by the technician who created it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub summary: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new task row.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: Uuid,
    pub summary: String,
    pub date: NaiveDate,
}
