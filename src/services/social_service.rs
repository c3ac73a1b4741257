//! Domain service for favorites, the shopping cart and author subscriptions.

use thiserror::Error;

use crate::db::RecipeSet;
use crate::models::recipe::RecipeSummary;
use crate::models::user::User;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(i32),

    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("Recipe is already in {}.", .0.label())]
    AlreadyInSet(RecipeSet),

    #[error("Recipe is not in {}.", .0.label())]
    NotInSet(RecipeSet),

    #[error("You are already subscribed to this author.")]
    AlreadySubscribed,

    #[error("You are not subscribed to this author.")]
    NotSubscribed,

    #[error("You cannot subscribe to yourself.")]
    SelfSubscription,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SocialError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SocialError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A followed author with their newest recipes.
#[derive(Debug, Clone)]
pub struct AuthorView {
    pub user: User,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}

#[async_trait::async_trait]
pub trait SocialService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SocialError::AlreadyInSet`] if the recipe is already a member.
    async fn add_recipe(
        &self,
        user: &User,
        set: RecipeSet,
        recipe_id: i32,
    ) -> Result<RecipeSummary, SocialError>;

    /// # Errors
    ///
    /// Returns [`SocialError::NotInSet`] if there was nothing to remove.
    async fn remove_recipe(
        &self,
        user: &User,
        set: RecipeSet,
        recipe_id: i32,
    ) -> Result<(), SocialError>;

    /// # Errors
    ///
    /// Returns [`SocialError::SelfSubscription`] or [`SocialError::AlreadySubscribed`].
    async fn subscribe(
        &self,
        user: &User,
        author_id: i32,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorView, SocialError>;

    async fn unsubscribe(&self, user: &User, author_id: i32) -> Result<(), SocialError>;

    /// One page of followed authors, plus the total count.
    async fn subscriptions(
        &self,
        user: &User,
        recipes_limit: Option<u64>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<AuthorView>, u64), SocialError>;
}
