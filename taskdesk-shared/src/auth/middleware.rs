/// Bearer token verification
///
/// This is the framework-independent half of the request gate: it turns the
/// raw `Authorization` header value into an [`AuthContext`] or an
/// [`AuthError`]. The HTTP layer calls [`verify_bearer`] and stores the
/// context in the request extensions for handlers to pick up.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use taskdesk_shared::auth::jwt::{create_token, Claims};
/// use taskdesk_shared::auth::middleware::verify_bearer;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = create_token(&Claims::new(5, "alice"), secret)?;
/// let header = format!("Bearer {}", token);
///
/// let ctx = verify_bearer(Some(&header), secret, Utc::now())?;
/// assert_eq!(ctx.user_id, 5);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token_at, JwtError};

/// Identity of the authenticated caller
///
/// Added to request extensions after successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Username carried in the token
    pub username: String,
}

/// Error type for bearer verification
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

/// Verifies an `Authorization` header value and extracts the caller identity
///
/// Pure over (header, secret, now): no I/O and no state.
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if `header` is `None`
/// - `AuthError::InvalidFormat` if it is not `Bearer <token>`
/// - `AuthError::InvalidToken` if the token is expired, not yet valid, has
///   the wrong issuer, or a bad signature
pub fn verify_bearer(
    header: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<AuthContext, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;

    let token = strip_bearer(header)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token_at(token, secret, now).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(AuthContext {
        user_id: claims.sub,
        username: claims.username,
    })
}

/// Strips the `Bearer ` scheme, matched case-insensitively
fn strip_bearer(header: &str) -> Option<&str> {
    const SCHEME: &str = "Bearer ";

    match header.get(..SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => Some(&header[SCHEME.len()..]),
        _ => None,
    }
}
