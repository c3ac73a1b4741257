//! `SeaORM` implementation of the `RecipeService` trait.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::db::{RecipeSet, Store};
use crate::models::errors::FieldErrors;
use crate::models::recipe::{IngredientAmount, Recipe, RecipeDraft, RecipeFilter, RecipePatch};
use crate::models::shopping::ShoppingListItem;
use crate::models::user::User;
use crate::services::recipe_service::{RecipeError, RecipeQuery, RecipeService, RecipeView};

pub struct SeaOrmRecipeService {
    store: Store,
}

impl SeaOrmRecipeService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Every referenced tag and ingredient must exist.
    async fn check_references(
        &self,
        tag_ids: Option<&[i32]>,
        ingredients: Option<&[IngredientAmount]>,
    ) -> Result<(), RecipeError> {
        let mut errors = FieldErrors::new();

        if let Some(tag_ids) = tag_ids {
            let found = self.store.count_tags(tag_ids).await?;
            if found < tag_ids.len() as u64 {
                errors.add("tags", "One or more tags do not exist.");
            }
        }

        if let Some(ingredients) = ingredients {
            let ids: Vec<i32> = ingredients.iter().map(|i| i.ingredient_id).collect();
            let found = self.store.count_ingredients(&ids).await?;
            if found < ids.len() as u64 {
                errors.add("ingredients", "One or more ingredients do not exist.");
            }
        }

        errors.into_result(()).map_err(RecipeError::Validation)
    }

    /// Loads the recipe and checks that `user` wrote it.
    async fn authored(&self, user: &User, id: i32) -> Result<(), RecipeError> {
        let author_id = self
            .store
            .recipe_author(id)
            .await?
            .ok_or(RecipeError::NotFound(id))?;

        if author_id != user.id {
            return Err(RecipeError::Forbidden(id));
        }
        Ok(())
    }

    async fn views(
        &self,
        viewer: Option<&User>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, RecipeError> {
        let (subscribed, favorited, in_cart) = match viewer {
            Some(viewer) => {
                let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
                let author_ids: Vec<i32> = recipes.iter().map(|r| r.author.id).collect();
                (
                    self.store.subscribed_among(viewer.id, &author_ids).await?,
                    self.store
                        .set_members_among(RecipeSet::Favorites, viewer.id, &recipe_ids)
                        .await?,
                    self.store
                        .set_members_among(RecipeSet::ShoppingCart, viewer.id, &recipe_ids)
                        .await?,
                )
            }
            None => (HashSet::new(), HashSet::new(), HashSet::new()),
        };

        Ok(recipes
            .into_iter()
            .map(|recipe| RecipeView {
                author_is_subscribed: subscribed.contains(&recipe.author.id),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                recipe,
            })
            .collect())
    }

    async fn view(&self, viewer: Option<&User>, id: i32) -> Result<RecipeView, RecipeError> {
        let recipe = self
            .store
            .get_recipe(id)
            .await?
            .ok_or(RecipeError::NotFound(id))?;

        self.views(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or(RecipeError::NotFound(id))
    }
}

#[async_trait]
impl RecipeService for SeaOrmRecipeService {
    async fn list(
        &self,
        viewer: Option<&User>,
        query: RecipeQuery,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<RecipeView>, u64), RecipeError> {
        let wants_own_sets = query.only_favorited || query.only_in_shopping_cart;
        if viewer.is_none() && wants_own_sets {
            return Ok((Vec::new(), 0));
        }

        let viewer_id = viewer.map(|v| v.id);
        let filter = RecipeFilter {
            author_id: query.author_id,
            tag_slugs: query.tag_slugs,
            favorited_by: viewer_id.filter(|_| query.only_favorited),
            in_cart_of: viewer_id.filter(|_| query.only_in_shopping_cart),
        };

        let (recipes, total) = self.store.list_recipes(&filter, page, page_size).await?;
        Ok((self.views(viewer, recipes).await?, total))
    }

    async fn get(&self, viewer: Option<&User>, id: i32) -> Result<RecipeView, RecipeError> {
        self.view(viewer, id).await
    }

    async fn create(&self, author: &User, draft: RecipeDraft) -> Result<RecipeView, RecipeError> {
        self.check_references(Some(&draft.tag_ids), Some(&draft.ingredients))
            .await?;

        let id = self.store.create_recipe(author.id, draft).await?;
        tracing::info!(recipe_id = id, author_id = author.id, "Recipe created");

        self.view(Some(author), id).await
    }

    async fn ensure_author(&self, user: &User, id: i32) -> Result<(), RecipeError> {
        self.authored(user, id).await
    }

    async fn update(
        &self,
        user: &User,
        id: i32,
        patch: RecipePatch,
    ) -> Result<RecipeView, RecipeError> {
        self.authored(user, id).await?;
        self.check_references(patch.tag_ids.as_deref(), patch.ingredients.as_deref())
            .await?;

        if !self.store.update_recipe(id, patch).await? {
            return Err(RecipeError::NotFound(id));
        }
        tracing::info!(recipe_id = id, "Recipe updated");

        self.view(Some(user), id).await
    }

    async fn delete(&self, user: &User, id: i32) -> Result<(), RecipeError> {
        self.authored(user, id).await?;

        if !self.store.delete_recipe(id).await? {
            return Err(RecipeError::NotFound(id));
        }
        tracing::info!(recipe_id = id, "Recipe deleted");
        Ok(())
    }

    async fn shopping_list(&self, user: &User) -> Result<Vec<ShoppingListItem>, RecipeError> {
        Ok(self.store.aggregate_shopping_cart(user.id).await?)
    }
}
