//! Domain service for token authentication.
//!
//! Handles email/password login, token resolution and logout.

use thiserror::Error;

use crate::models::user::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the user's token, issuing one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the email is unknown or
    /// the password does not match.
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Deletes the user's token.
    async fn logout(&self, user_id: i32) -> Result<(), AuthError>;

    /// Resolves a token to its user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if no user holds the token.
    async fn authenticate(&self, token: &str) -> Result<User, AuthError>;
}
