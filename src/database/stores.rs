//! Store traits and their Postgres implementations.
//!
//! Components receive these as injected trait objects rather than reaching
//! for a process-global handle, so tests can substitute in-memory doubles.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::task::{NewTask, Task};
use crate::database::models::user::{NewUser, User};

/// Identity and hierarchy persistence consumed by the auth components.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an identity by normalized (lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Resolve a technician's manager link, if one exists.
    async fn manager_of(&self, technician_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    async fn insert_identity(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn insert_manager_link(
        &self,
        manager_id: Uuid,
        technician_id: Uuid,
    ) -> Result<(), StoreError>;
}

/// Task persistence consumed by the mutation guard.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn insert(&self, new_task: NewTask) -> Result<Task, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        summary: String,
        date: chrono::NaiveDate,
    ) -> Result<Task, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError>;
}

const USER_COLUMNS: &str = r#"
    u.id, u.first_name, u.last_name, u.email, u.password_hash,
    m.manager_id, u.created_at
"#;

pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            LEFT JOIN managers m ON m.technician_id = u.id
            WHERE u.email = $1
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            LEFT JOIN managers m ON m.technician_id = u.id
            WHERE u.id = $1
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn manager_of(&self, technician_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let manager_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT manager_id FROM managers WHERE technician_id = $1",
        )
        .bind(technician_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(manager_id)
    }

    async fn insert_identity(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, password_hash,
                      NULL::uuid AS manager_id, created_at
            "#,
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_manager_link(
        &self,
        manager_id: Uuid,
        technician_id: Uuid,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO managers (manager_id, technician_id) VALUES ($1, $2)")
            .bind(manager_id)
            .bind(technician_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, summary, date, created_at FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn insert(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, summary, date)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, summary, date, created_at
            "#,
        )
        .bind(new_task.user_id)
        .bind(&new_task.summary)
        .bind(new_task.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(
        &self,
        id: Uuid,
        summary: String,
        date: chrono::NaiveDate,
    ) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET summary = $2, date = $3
            WHERE id = $1
            RETURNING id, user_id, summary, date, created_at
            "#,
        )
        .bind(id)
        .bind(&summary)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, user_id, summary, date, created_at FROM tasks WHERE user_id = $1",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }
}
