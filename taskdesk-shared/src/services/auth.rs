/// Auth Service
///
/// Registration stores a salted Argon2id hash; login verifies it and issues
/// a signed token. The signing secret and token lifetime are fixed at
/// construction time.
///
/// Hashing and verification are CPU bound and run on the blocking pool.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::ServiceError;
use crate::auth::{
    jwt::{self, Claims},
    middleware::{verify_bearer, AuthContext, AuthError},
    password::{self, PasswordError},
};
use crate::models::user::NewUser;
use crate::store::{StoreError, UserStore};

/// Message returned on successful registration
pub const REGISTERED_MESSAGE: &str = "User registered successfully";

const USERNAME_TAKEN: &str = "Username already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hash checked on logins for unknown usernames, computed on first use
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// HS256 secret
    pub secret: String,

    /// Lifetime of issued tokens
    pub expires_in: Duration,
}

impl TokenSettings {
    /// Settings with the default 1 hour lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_in: Duration::seconds(jwt::DEFAULT_EXPIRATION_SECS),
        }
    }
}

/// Registration, login and token verification
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenSettings>,
}

impl AuthService {
    /// Creates the service over a credential store
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenSettings) -> Self {
        Self {
            users,
            tokens: Arc::new(tokens),
        }
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `ServiceError::Conflict` if the username is already registered,
    ///   including when a concurrent registration wins the insert
    pub async fn register(&self, username: &str, password: &str) -> Result<&'static str, ServiceError> {
        if self.users.find_by_username(username).await?.is_some() {
            debug!(username = %username, "Registration rejected: username taken");
            return Err(ServiceError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let password_hash = hash_blocking(password.to_string()).await?;

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => ServiceError::Conflict(USERNAME_TAKEN.to_string()),
                other => ServiceError::Store(other),
            })?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(REGISTERED_MESSAGE)
    }

    /// Verifies credentials and issues a signed token
    ///
    /// # Errors
    ///
    /// - `ServiceError::Unauthorized("Invalid credentials")` for an unknown
    ///   username and for a wrong password alike
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let user = self.users.find_by_username(username).await?;

        // Unknown usernames still pay for one verification
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => dummy_hash().await?.to_string(),
        };
        let verified = verify_blocking(password.to_string(), hash).await?;

        let Some(user) = user.filter(|_| verified) else {
            warn!(username = %username, "Login failed");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let claims = Claims::with_expiration(user.id, user.username.clone(), self.tokens.expires_in);
        let token = jwt::create_token(&claims, &self.tokens.secret)?;

        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    /// Verifies an `Authorization` header value against the signing secret
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthContext, AuthError> {
        verify_bearer(header, &self.tokens.secret, Utc::now())
    }
}

async fn dummy_hash() -> Result<&'static str, ServiceError> {
    DUMMY_HASH
        .get_or_try_init(|| hash_blocking("taskdesk-unknown-user".to_string()))
        .await
        .map(String::as_str)
}

async fn hash_blocking(password: String) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
        .map_err(ServiceError::from)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, ServiceError> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))?
        .map_err(ServiceError::from)
}
