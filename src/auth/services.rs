use thiserror::Error;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::auth::{
    jwt::{TokenError, TokenService},
    password::{hash_password, verify_password},
    repo::{StoreError, UserStore},
    repo_types::{NewUser, UniqueField, User},
};

/// Identity resolved at the authentication boundary and handed to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthFailure {
    /// Unknown username and wrong password are deliberately the same kind.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SignupFailure {
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already in use")]
    EmailTaken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum AccessFailure {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for SignupFailure {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(UniqueField::Username) => Self::UsernameTaken,
            StoreError::Conflict(UniqueField::Email) => Self::EmailTaken,
            other => Self::Internal(other.into()),
        }
    }
}

/// Checks a username/password pair against the store.
pub async fn authenticate(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<Principal, AuthFailure> {
    let user = users
        .find_by_username(username)
        .await
        .map_err(|e| AuthFailure::Internal(e.into()))?;

    let Some(user) = user else {
        warn!(username, "login unknown username");
        return Err(AuthFailure::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(username, user_id = user.id, "login invalid password");
        return Err(AuthFailure::InvalidCredentials);
    }

    Ok(Principal::from(user))
}

/// Creates a user after the username, then email, uniqueness checks.
pub async fn register(
    users: &dyn UserStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, SignupFailure> {
    if users.exists_by_username(username).await? {
        warn!(username, "username already registered");
        return Err(SignupFailure::UsernameTaken);
    }
    if users.exists_by_email(email).await? {
        warn!(email, "email already registered");
        return Err(SignupFailure::EmailTaken);
    }

    let password_hash = hash_password(password)?;

    // The store re-checks both columns atomically; a concurrent signup that
    // slipped past the checks above surfaces here as a Conflict.
    let user = users
        .insert(NewUser {
            username,
            email,
            password_hash: &password_hash,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Strips the exact `"Bearer "` prefix from an Authorization header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, TokenError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(TokenError::Missing)
}

/// Resolves the principal behind an Authorization header value.
pub async fn resolve_principal(
    tokens: &TokenService,
    users: &dyn UserStore,
    authorization: Option<&str>,
) -> Result<Principal, AccessFailure> {
    let token = bearer_token(authorization)?;
    let username = tokens.subject_of(token)?;

    match users.find_by_username(&username).await {
        Ok(Some(user)) => Ok(Principal::from(user)),
        Ok(None) => {
            warn!(%username, "token subject has no user");
            Err(AccessFailure::UserNotFound)
        }
        Err(e) => {
            error!(error = %e, %username, "user lookup failed");
            Err(AccessFailure::Internal(e.into()))
        }
    }
}
