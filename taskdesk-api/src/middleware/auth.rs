/// Bearer token gate
///
/// Runs in front of every task route. On success the caller's
/// [`AuthContext`] is inserted into the request extensions, where handlers
/// pick it up with `Extension<AuthContext>`. On failure the request never
/// reaches the handler and the client gets `401`.
///
/// [`AuthContext`]: taskdesk_shared::auth::middleware::AuthContext

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{app::AppState, error::ApiError};

/// JWT authentication middleware layer
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let auth_context = state.auth.authenticate(auth_header).map_err(|err| {
        tracing::debug!(error = %err, "Rejected request");
        ApiError::from(err)
    })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
