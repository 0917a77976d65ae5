use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::auth::rules;
use crate::database::models::task::{NewTask, Task};
use crate::database::stores::{CredentialStore, TaskStore};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::events::{TaskEvent, TaskEventPublisher};

#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub summary: String,
    pub date: NaiveDate,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    pub summary: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Guard in front of the task store.
///
/// Each operation assumes the caller already passed authentication, loads
/// only the facts its access rule needs, applies the rule, and touches the
/// store only on an allow.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn CredentialStore>,
    events: Arc<dyn TaskEventPublisher>,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn CredentialStore>,
        events: Arc<dyn TaskEventPublisher>,
    ) -> Self {
        Self {
            tasks,
            users,
            events,
        }
    }

    /// Create a task owned by the calling technician.
    pub async fn create(&self, caller: &AuthUser, input: CreateTaskInput) -> Result<Task, ApiError> {
        rules::can_create_task(caller).into_result()?;

        let summary = input.summary.trim().to_string();
        if summary.is_empty() {
            return Err(ApiError::bad_request("Missing required fields: summary"));
        }

        let task = self
            .tasks
            .insert(NewTask {
                user_id: caller.user_id,
                summary,
                date: input.date,
            })
            .await?;

        // Publish-only side channel; a failed publish never fails the write.
        let event = TaskEvent::Created {
            task_id: task.id,
            user_id: task.user_id,
            summary: task.summary.clone(),
            date: task.date,
        };
        if let Err(err) = self.events.publish(&event).await {
            tracing::warn!("Failed to publish task event: {}", err);
        }

        Ok(task)
    }

    /// Patch a task's summary and/or date.
    pub async fn update(
        &self,
        caller: &AuthUser,
        task_id: Uuid,
        patch: UpdateTaskInput,
    ) -> Result<Task, ApiError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))?;

        rules::can_update_task(caller, &task).into_result()?;

        let summary = patch.summary.unwrap_or_else(|| task.summary.clone());
        let date = patch.date.unwrap_or(task.date);
        let updated = self.tasks.update(task.id, summary, date).await?;
        Ok(updated)
    }

    /// Delete a task on behalf of the owning technician's manager.
    pub async fn delete(&self, caller: &AuthUser, task_id: Uuid) -> Result<(), ApiError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))?;

        // The link lookup is a fact only the manager rule consumes; a
        // wrong-role caller is denied without it.
        let owner_link = if caller.is_manager() {
            self.users.manager_of(task.user_id).await?
        } else {
            None
        };
        rules::can_delete_task(caller, owner_link).into_result()?;

        self.tasks.delete(task.id).await?;
        Ok(())
    }

    /// List a user's tasks: their own, or a linked technician's for a
    /// manager.
    pub async fn list_for_user(
        &self,
        caller: &AuthUser,
        target_user_id: Uuid,
    ) -> Result<Vec<Task>, ApiError> {
        let target_link = if caller.user_id == target_user_id {
            None
        } else {
            self.users.manager_of(target_user_id).await?
        };
        rules::can_list_tasks_of(caller, target_user_id, target_link).into_result()?;

        let tasks = self.tasks.list_by_owner(target_user_id).await?;
        Ok(tasks)
    }
}
