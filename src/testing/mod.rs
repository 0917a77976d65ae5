//! In-memory store doubles and fixtures for service-level tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::task::{NewTask, Task};
use crate::database::models::user::{NewUser, User};
use crate::database::stores::{CredentialStore, TaskStore};
use crate::services::events::{PublishError, TaskEvent, TaskEventPublisher};

/// bcrypt work factor for fixtures; the minimum keeps test runs fast.
pub const TEST_BCRYPT_COST: u32 = 4;

#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<Vec<User>>,
    // technician id -> manager id
    links: Mutex<HashMap<Uuid, Uuid>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_link(&self, mut user: User) -> User {
        user.manager_id = self.links.lock().unwrap().get(&user.id).copied();
        user
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let found = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned();
        Ok(found.map(|u| self.with_link(u)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let found = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned();
        Ok(found.map(|u| self.with_link(u)))
    }

    async fn manager_of(&self, technician_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Ok(self.links.lock().unwrap().get(&technician_id).copied())
    }

    async fn insert_identity(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            manager_id: None,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn insert_manager_link(
        &self,
        manager_id: Uuid,
        technician_id: Uuid,
    ) -> Result<(), StoreError> {
        self.links.lock().unwrap().insert(technician_id, manager_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let task = Task {
            id: Uuid::new_v4(),
            user_id: new_task.user_id,
            summary: new_task.summary,
            date: new_task.date,
            created_at: Utc::now(),
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        id: Uuid,
        summary: String,
        date: chrono::NaiveDate,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::Sqlx(sqlx::Error::RowNotFound))?;
        task.summary = summary;
        task.date = date;
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect())
    }
}

/// Publisher double that records everything it is asked to publish.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<TaskEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<TaskEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskEventPublisher for RecordingPublisher {
    async fn publish(&self, event: &TaskEvent) -> Result<(), PublishError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Insert an identity with a bcrypt-hashed password and optional manager
/// link, returning the row as the store would report it.
pub async fn seed_identity(
    store: &InMemoryCredentialStore,
    first_name: &str,
    email: &str,
    password: &str,
    manager_id: Option<Uuid>,
) -> User {
    let password_hash = crate::auth::password::hash(password, TEST_BCRYPT_COST).unwrap();
    let user = store
        .insert_identity(NewUser {
            first_name: first_name.to_string(),
            last_name: "Example".to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await
        .unwrap();
    if let Some(manager_id) = manager_id {
        store
            .insert_manager_link(manager_id, user.id)
            .await
            .unwrap();
    }
    User { manager_id, ..user }
}
