/// Business services
///
/// - [`auth::AuthService`]: registration, login and bearer verification
/// - [`tasks::TaskService`]: ownership-scoped task CRUD
///
/// Both take their storage as trait objects in the constructor and are cheap
/// to clone.

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::store::StoreError;

pub mod auth;
pub mod tasks;

pub use auth::{AuthService, TokenSettings};
pub use tasks::TaskService;

/// Error type shared by the services
///
/// The first three variants are caller errors and carry a message safe to
/// show to clients; the rest are server-side failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Username already registered
    #[error("{0}")]
    Conflict(String),

    /// Resource absent or not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hashing failure, or a stored hash that cannot be parsed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token signing failure
    #[error(transparent)]
    Token(#[from] JwtError),
}
