//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::models::user::User;
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = self.store.verify_user_password(user.id, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.store.get_or_create_token(user.id).await?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(token)
    }

    async fn logout(&self, user_id: i32) -> Result<(), AuthError> {
        self.store.delete_token(user_id).await?;
        tracing::info!(user_id, "User logged out");
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        self.store
            .get_user_by_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}
