/// In-memory store
///
/// Keeps users and tasks in ordered maps behind a single `RwLock`. IDs are
/// handed out from per-table counters starting at 1, like `BIGSERIAL`.
/// Intended for tests and local experiments; nothing is persisted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{
    task::{NewTask, Task, TaskPatch},
    user::{NewUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// Map-backed implementation of [`UserStore`] and [`TaskStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("users_username_key".to_string()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: user.username,
            password_hash: user.password_hash,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .rev()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&task.owner_id) {
            return Err(StoreError::MissingReference("tasks_owner_id_fkey".to_string()));
        }

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            title: task.title,
            description: task.description,
            is_complete: false,
            owner_id: task.owner_id,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn update_owned(
        &self,
        id: i64,
        owner_id: i64,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .tasks
            .get_mut(&id)
            .filter(|t| t.owner_id == owner_id)
            .map(|task| {
                patch.apply_to(task);
                task.clone()
            }))
    }

    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        match tables.tasks.get(&id) {
            Some(task) if task.owner_id == owner_id => {
                tables.tasks.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
