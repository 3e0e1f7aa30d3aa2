/// Task Service
///
/// Every operation is scoped to the calling user. Lookups, updates and
/// deletes go to the store as a single `(id, owner_id)` match, so a task
/// owned by someone else produces the same `NotFound` as a missing one.

use std::sync::Arc;

use tracing::{debug, info};

use super::ServiceError;
use crate::models::task::{NewTask, Task, TaskPatch};
use crate::store::{StoreError, TaskStore, UserStore};

const TASK_NOT_FOUND: &str = "Task not found";
const USER_NOT_FOUND: &str = "User not found";

/// Ownership-scoped task CRUD
#[derive(Clone)]
pub struct TaskService {
    users: Arc<dyn UserStore>,
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    /// Creates the service over the credential and task stores
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { users, tasks }
    }

    /// All tasks owned by `user_id`, most recently created first
    pub async fn list(&self, user_id: i64) -> Result<Vec<Task>, ServiceError> {
        let tasks = self.tasks.list_by_owner(user_id).await?;
        debug!(user_id = %user_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// A single owned task
    pub async fn get(&self, id: i64, user_id: i64) -> Result<Task, ServiceError> {
        self.tasks
            .find_owned(id, user_id)
            .await?
            .ok_or_else(|| not_found(id, user_id))
    }

    /// Creates an incomplete task owned by `user_id`
    ///
    /// # Errors
    ///
    /// - `ServiceError::NotFound("User not found")` if `user_id` no longer
    ///   exists, e.g. a deleted user presenting a still-valid token
    pub async fn create(
        &self,
        user_id: i64,
        title: String,
        description: Option<String>,
    ) -> Result<Task, ServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::NotFound(USER_NOT_FOUND.to_string()));
        }

        let task = self
            .tasks
            .create(NewTask {
                owner_id: user_id,
                title,
                description,
            })
            .await
            .map_err(|e| match e {
                StoreError::MissingReference(_) => ServiceError::NotFound(USER_NOT_FOUND.to_string()),
                other => ServiceError::Store(other),
            })?;

        info!(user_id = %user_id, task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Merges the provided fields into an owned task
    ///
    /// An empty patch returns the stored task unchanged.
    pub async fn update(&self, id: i64, user_id: i64, patch: TaskPatch) -> Result<Task, ServiceError> {
        if patch.is_empty() {
            return self.get(id, user_id).await;
        }

        let task = self
            .tasks
            .update_owned(id, user_id, &patch)
            .await?
            .ok_or_else(|| not_found(id, user_id))?;

        info!(user_id = %user_id, task_id = %id, "Task updated");
        Ok(task)
    }

    /// Permanently deletes an owned task
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), ServiceError> {
        if !self.tasks.delete_owned(id, user_id).await? {
            return Err(not_found(id, user_id));
        }

        info!(user_id = %user_id, task_id = %id, "Task deleted");
        Ok(())
    }

    /// Checks that the task store is reachable
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.tasks.ping().await?)
    }
}

fn not_found(id: i64, user_id: i64) -> ServiceError {
    debug!(user_id = %user_id, task_id = %id, "Task not found or not owned");
    ServiceError::NotFound(TASK_NOT_FOUND.to_string())
}
