/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a token

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username, unique across all users
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Confirmation message
    pub message: String,
}

/// Login request
///
/// No field rules: an empty username or password has to fail exactly like
/// any other bad credentials.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// { "username": "alice", "password": "s3cret" }
/// ```
///
/// # Response
///
/// ```json
/// { "message": "User registered successfully" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Username already exists
/// - `422 Unprocessable Entity`: Empty username or password
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let message = state.auth.register(&req.username, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: message.to_string(),
        }),
    ))
}

/// Login with username and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "s3cret" }
/// ```
///
/// # Response
///
/// ```json
/// { "token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    let token = state.auth.login(&req.username, &req.password).await?;

    Ok((StatusCode::CREATED, Json(LoginResponse { token })))
}
