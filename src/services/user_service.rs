//! Domain service for user accounts.

use thiserror::Error;

use crate::models::errors::FieldErrors;
use crate::models::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A user as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone)]
pub struct UserView {
    pub user: User,
    pub is_subscribed: bool,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] when the email is taken or the
    /// password is too short.
    async fn signup(&self, new_user: NewUser) -> Result<User, UserError>;

    /// One page of users ordered by id, plus the total count.
    async fn list(
        &self,
        viewer: Option<&User>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<UserView>, u64), UserError>;

    async fn get(&self, viewer: Option<&User>, id: i32) -> Result<UserView, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::IncorrectPassword`] if `current_password` does not match.
    async fn set_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), UserError>;
}
