/// Storage interfaces
///
/// Services receive their storage as trait objects through their
/// constructors, so the same Auth and Task services run on PostgreSQL in
/// production and on an in-memory map in tests.
///
/// # Backends
///
/// - [`postgres::PgStore`]: sqlx over a `PgPool`
/// - [`memory::MemoryStore`]: `RwLock`-guarded maps
///
/// Both backends honor the same contract: single-task lookups, updates and
/// deletes match on `(id, owner_id)` together, and listings are ordered by
/// id descending.

use async_trait::async_trait;

use crate::models::{
    task::{NewTask, Task, TaskPatch},
    user::{NewUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Duplicate value violates {0}")]
    Duplicate(String),

    /// A foreign key pointed at a missing row
    #[error("Missing referenced row for {0}")]
    MissingReference(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Credential Store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Looks up a user by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Persists a new user
    ///
    /// Fails with `StoreError::Duplicate` if the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}

/// Task Store
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks of `owner_id`, id descending
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Task>, StoreError>;

    /// The task `id` if and only if it belongs to `owner_id`
    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<Task>, StoreError>;

    /// Persists a new, incomplete task and returns it with its assigned ID
    async fn create(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Merges `patch` into the owned task and returns the stored result
    async fn update_owned(
        &self,
        id: i64,
        owner_id: i64,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, StoreError>;

    /// Removes the owned task, returning whether a row was deleted
    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
