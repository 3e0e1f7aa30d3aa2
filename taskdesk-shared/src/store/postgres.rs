use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreError, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    task::{NewTask, Task, TaskPatch},
    user::{NewUser, User},
};

/// PostgreSQL-backed store
///
/// Cloning is cheap: the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, user).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_owned(&self.pool, id, owner_id).await?)
    }

    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, task).await?)
    }

    async fn update_owned(
        &self,
        id: i64,
        owner_id: i64,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update_owned(&self.pool, id, owner_id, patch).await?)
    }

    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        Ok(Task::delete_owned(&self.pool, id, owner_id).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
