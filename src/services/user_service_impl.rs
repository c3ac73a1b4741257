//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::{Store, is_unique_violation};
use crate::models::errors::FieldErrors;
use crate::models::user::{NewUser, User};
use crate::services::user_service::{UserError, UserService, UserView};

const EMAIL_TAKEN: &str = "A user with that email already exists.";

pub struct SeaOrmUserService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    async fn check_password_length(&self, field: &str, password: &str) -> Result<(), UserError> {
        let min = self.config.read().await.security.min_password_length;
        if password.chars().count() < min {
            return Err(UserError::Validation(FieldErrors::single(
                field,
                format!("Ensure this field has at least {min} characters."),
            )));
        }
        Ok(())
    }

    async fn views(&self, viewer: Option<&User>, users: Vec<User>) -> Result<Vec<UserView>, UserError> {
        let subscribed = match viewer {
            Some(viewer) => {
                let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
                self.store.subscribed_among(viewer.id, &ids).await?
            }
            None => Default::default(),
        };

        Ok(users
            .into_iter()
            .map(|user| UserView {
                is_subscribed: subscribed.contains(&user.id),
                user,
            })
            .collect())
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn signup(&self, new_user: NewUser) -> Result<User, UserError> {
        self.check_password_length("password", &new_user.password)
            .await?;

        if self.store.email_exists(&new_user.email).await? {
            return Err(UserError::Validation(FieldErrors::single(
                "email",
                EMAIL_TAKEN,
            )));
        }

        let security = self.config.read().await.security.clone();
        match self.store.create_user(new_user, &security).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "User registered");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => Err(UserError::Validation(
                FieldErrors::single("email", EMAIL_TAKEN),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(
        &self,
        viewer: Option<&User>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<UserView>, u64), UserError> {
        let (users, total) = self.store.list_users(page, page_size).await?;
        Ok((self.views(viewer, users).await?, total))
    }

    async fn get(&self, viewer: Option<&User>, id: i32) -> Result<UserView, UserError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        self.views(viewer, vec![user])
            .await?
            .pop()
            .ok_or(UserError::NotFound(id))
    }

    async fn set_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), UserError> {
        if !self
            .store
            .verify_user_password(user.id, current_password)
            .await?
        {
            return Err(UserError::IncorrectPassword);
        }

        self.check_password_length("new_password", new_password)
            .await?;

        let security = self.config.read().await.security.clone();
        self.store
            .update_user_password(user.id, new_password, &security)
            .await?;

        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }
}
