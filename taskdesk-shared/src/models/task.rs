/// Task model and database operations
///
/// Every task belongs to exactly one user through `owner_id`. All queries
/// that address a single task filter on `(id, owner_id)` in the same
/// statement, so a task owned by someone else looks exactly like a task that
/// does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     is_complete BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::task::{NewTask, Task, TaskPatch};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, NewTask {
///     owner_id: 1,
///     title: "buy milk".to_string(),
///     description: None,
/// }).await?;
///
/// let patch = TaskPatch { is_complete: Some(true), ..Default::default() };
/// let done = Task::update_owned(&pool, task.id, 1, &patch).await?;
/// assert!(done.map(|t| t.is_complete).unwrap_or(false));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A to-do item
///
/// Serialized in camelCase: `{"id", "title", "description", "isComplete", "ownerId"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned task ID
    pub id: i64,

    /// Title (required)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion flag, false on creation
    pub is_complete: bool,

    /// Owning user
    pub owner_id: i64,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Owning user
    pub owner_id: i64,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Partial update of a task
///
/// Only `Some` fields are written; `None` fields keep their stored value.
/// `description` is doubly optional: `Some(None)` (an explicit JSON `null`)
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New description, `Some(None)` to clear
    #[serde(default, deserialize_with = "present_field")]
    pub description: Option<Option<String>>,

    /// New completion flag
    pub is_complete: Option<bool>,
}

impl TaskPatch {
    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_complete.is_none()
    }

    /// Merges the provided fields into `task`
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(is_complete) = self.is_complete {
            task.is_complete = is_complete;
        }
    }
}

/// Deserializes a field that is present in the input as `Some`, so a JSON
/// `null` becomes `Some(None)`. Absent fields fall back to `None` through
/// `#[serde(default)]`.
pub fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Task {
    /// Inserts a new, incomplete task
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if `owner_id` does not exist.
    pub async fn create(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, is_complete, owner_id
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, only if owned by `owner_id`
    pub async fn find_owned(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, is_complete, owner_id
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks of an owner, newest (highest ID) first
    pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, is_complete, owner_id
            FROM tasks
            WHERE owner_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a patch to an owned task in a single statement
    ///
    /// Returns `None` if no task with `id` is owned by `owner_id`.
    pub async fn update_owned(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
        patch: &TaskPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = CASE WHEN $6 THEN $4 ELSE description END,
                is_complete = COALESCE($5, is_complete)
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, description, is_complete, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_ref().and_then(|d| d.as_deref()))
        .bind(patch.is_complete)
        .bind(patch.description.is_some())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Permanently deletes an owned task
    ///
    /// Returns false if no task with `id` is owned by `owner_id`.
    pub async fn delete_owned(pool: &PgPool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
