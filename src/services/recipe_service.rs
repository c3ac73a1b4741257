//! Domain service for recipes and the shopping list download.
//!
//! Payload shape is checked by the API layer; this service checks that
//! referenced tags and ingredients exist and that only the author mutates
//! a recipe.

use thiserror::Error;

use crate::models::errors::FieldErrors;
use crate::models::recipe::{Recipe, RecipeDraft, RecipePatch};
use crate::models::shopping::ShoppingListItem;
use crate::models::user::User;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Recipe not found: {0}")]
    NotFound(i32),

    #[error("Only the author may modify recipe {0}")]
    Forbidden(i32),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RecipeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A recipe with the viewer-relative flags filled in.
#[derive(Debug, Clone)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author_is_subscribed: bool,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Recipe list query as understood by the service.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub author_id: Option<i32>,
    pub tag_slugs: Vec<String>,
    pub only_favorited: bool,
    pub only_in_shopping_cart: bool,
}

#[async_trait::async_trait]
pub trait RecipeService: Send + Sync {
    /// One page of recipes, newest first, plus the total count.
    ///
    /// Anonymous viewers asking for favorites or cart contents get an empty page.
    async fn list(
        &self,
        viewer: Option<&User>,
        query: RecipeQuery,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<RecipeView>, u64), RecipeError>;

    async fn get(&self, viewer: Option<&User>, id: i32) -> Result<RecipeView, RecipeError>;

    /// # Errors
    ///
    /// Returns [`RecipeError::Validation`] if a tag or ingredient id does not exist.
    async fn create(&self, author: &User, draft: RecipeDraft) -> Result<RecipeView, RecipeError>;

    /// Checks that the recipe exists and that `user` wrote it.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::NotFound`] or [`RecipeError::Forbidden`].
    async fn ensure_author(&self, user: &User, id: i32) -> Result<(), RecipeError>;

    /// # Errors
    ///
    /// Returns [`RecipeError::Forbidden`] when `user` is not the author.
    async fn update(
        &self,
        user: &User,
        id: i32,
        patch: RecipePatch,
    ) -> Result<RecipeView, RecipeError>;

    async fn delete(&self, user: &User, id: i32) -> Result<(), RecipeError>;

    /// Ingredient totals over every recipe in the user's cart.
    async fn shopping_list(&self, user: &User) -> Result<Vec<ShoppingListItem>, RecipeError>;
}
