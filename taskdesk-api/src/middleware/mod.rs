/// Middleware modules for the API server
///
/// - `auth`: bearer token gate for the task routes
/// - `security`: security response headers

pub mod auth;
pub mod security;
