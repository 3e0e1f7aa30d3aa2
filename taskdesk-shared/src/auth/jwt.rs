/// JWT token generation and validation module
///
/// Tokens are signed with HS256 and carry the caller's identity: the user ID
/// as `sub` plus the username as a custom claim.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 1 hour by default, configurable per issuer
/// - **Validation**: Signature, issuer, `exp` and `nbf` checks with zero leeway
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// Time checks are done against an explicit `now`, so verification is a pure
/// function of (token, current time, signing key).
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes";
///
/// let token = create_token(&Claims::new(7, "alice"), secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, 7);
/// assert_eq!(validated.username, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer written into and required from every token
pub const ISSUER: &str = "taskdesk";

/// Default token lifetime in seconds (1 hour)
pub const DEFAULT_EXPIRATION_SECS: i64 = 3600;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token used before its `nbf` time
    #[error("Token is not yet valid")]
    NotYetValid,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always [`ISSUER`])
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `username`: Username of the subject at issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: i64,

    /// Username (custom claim)
    pub username: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims issued now with the default 1 hour expiration
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self::with_expiration(user_id, username, Duration::seconds(DEFAULT_EXPIRATION_SECS))
    }

    /// Creates claims issued now with a custom expiration
    ///
    /// # Example
    ///
    /// ```
    /// use taskdesk_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::with_expiration(1, "alice", Duration::minutes(5));
    /// assert_eq!(claims.exp - claims.iat, 300);
    /// ```
    pub fn with_expiration(user_id: i64, username: impl Into<String>, expires_in: Duration) -> Self {
        Self::issued_at(user_id, username, Utc::now(), expires_in)
    }

    /// Creates claims as if issued at `now`
    pub fn issued_at(
        user_id: i64,
        username: impl Into<String>,
        now: DateTime<Utc>,
        expires_in: Duration,
    ) -> Self {
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            username: username.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets time until expiration, `None` once expired
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a signed HS256 token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token against the current wall clock
///
/// See [`validate_token_at`].
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_token_at(token, secret, Utc::now())
}

/// Validates a token and extracts its claims, checking time claims against `now`
///
/// Verifies:
/// - Signature is valid for `secret`
/// - Issuer is [`ISSUER`]
/// - `now` is before `exp`
/// - `now` is not before `nbf`
///
/// # Errors
///
/// - `JwtError::Expired` if `exp` has passed
/// - `JwtError::NotYetValid` if `nbf` is in the future
/// - `JwtError::InvalidIssuer` on issuer mismatch
/// - `JwtError::ValidationError` for bad signatures or malformed tokens
pub fn validate_token_at(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    // exp/nbf are checked below against the caller's clock
    validation.validate_exp = false;
    validation.validate_nbf = false;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    let claims = token_data.claims;
    let now_ts = now.timestamp();

    if now_ts >= claims.exp {
        return Err(JwtError::Expired);
    }

    if now_ts < claims.nbf {
        return Err(JwtError::NotYetValid);
    }

    Ok(claims)
}
