/// Database models for Taskdesk
///
/// # Models
///
/// - `user`: User accounts (username + password hash)
/// - `task`: To-do items owned by a user
///
/// SQL lives next to each model as associated functions taking a `PgPool`;
/// `store::PgStore` exposes them behind the storage traits.

pub mod task;
pub mod user;
