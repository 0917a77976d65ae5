use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered identity, Manager or Technician.
///
/// `manager_id` comes from the `managers` link table, not a `users` column:
/// a present value means "technician managed by that identity", absence
/// means the identity is a manager (or a technician nobody manages yet).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new identity row. The manager link is written
/// separately, as its own record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}
