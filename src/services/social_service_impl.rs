//! `SeaORM` implementation of the `SocialService` trait.

use async_trait::async_trait;

use crate::db::{RecipeSet, Store};
use crate::models::recipe::RecipeSummary;
use crate::models::user::User;
use crate::services::social_service::{AuthorView, SocialError, SocialService};

pub struct SeaOrmSocialService {
    store: Store,
}

impl SeaOrmSocialService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn author_view(
        &self,
        author: User,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorView, SocialError> {
        let recipes = self
            .store
            .recipe_summaries_for_author(author.id, recipes_limit)
            .await?;
        let recipes_count = self.store.count_recipes_for_author(author.id).await?;

        Ok(AuthorView {
            user: author,
            is_subscribed: true,
            recipes,
            recipes_count,
        })
    }
}

#[async_trait]
impl SocialService for SeaOrmSocialService {
    async fn add_recipe(
        &self,
        user: &User,
        set: RecipeSet,
        recipe_id: i32,
    ) -> Result<RecipeSummary, SocialError> {
        let recipe = self
            .store
            .get_recipe_summary(recipe_id)
            .await?
            .ok_or(SocialError::RecipeNotFound(recipe_id))?;

        if self.store.set_contains(set, user.id, recipe_id).await? {
            return Err(SocialError::AlreadyInSet(set));
        }

        // A concurrent insert can still win; the store reports that as `false`
        if !self.store.add_to_set(set, user.id, recipe_id).await? {
            return Err(SocialError::AlreadyInSet(set));
        }

        tracing::debug!(user_id = user.id, recipe_id, set = set.label(), "Recipe added");
        Ok(recipe)
    }

    async fn remove_recipe(
        &self,
        user: &User,
        set: RecipeSet,
        recipe_id: i32,
    ) -> Result<(), SocialError> {
        if !self.store.recipe_exists(recipe_id).await? {
            return Err(SocialError::RecipeNotFound(recipe_id));
        }

        if !self.store.remove_from_set(set, user.id, recipe_id).await? {
            return Err(SocialError::NotInSet(set));
        }

        tracing::debug!(user_id = user.id, recipe_id, set = set.label(), "Recipe removed");
        Ok(())
    }

    async fn subscribe(
        &self,
        user: &User,
        author_id: i32,
        recipes_limit: Option<u64>,
    ) -> Result<AuthorView, SocialError> {
        let author = self
            .store
            .get_user(author_id)
            .await?
            .ok_or(SocialError::UserNotFound(author_id))?;

        if author.id == user.id {
            return Err(SocialError::SelfSubscription);
        }

        if self.store.is_subscribed(user.id, author_id).await? {
            return Err(SocialError::AlreadySubscribed);
        }

        if !self.store.subscribe(user.id, author_id).await? {
            return Err(SocialError::AlreadySubscribed);
        }

        tracing::info!(user_id = user.id, author_id, "Subscribed");
        self.author_view(author, recipes_limit).await
    }

    async fn unsubscribe(&self, user: &User, author_id: i32) -> Result<(), SocialError> {
        if self.store.get_user(author_id).await?.is_none() {
            return Err(SocialError::UserNotFound(author_id));
        }

        if !self.store.unsubscribe(user.id, author_id).await? {
            return Err(SocialError::NotSubscribed);
        }

        tracing::info!(user_id = user.id, author_id, "Unsubscribed");
        Ok(())
    }

    async fn subscriptions(
        &self,
        user: &User,
        recipes_limit: Option<u64>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<AuthorView>, u64), SocialError> {
        let (authors, total) = self
            .store
            .followed_authors(user.id, page, page_size)
            .await?;

        let mut views = Vec::with_capacity(authors.len());
        for author in authors {
            views.push(self.author_view(author, recipes_limit).await?);
        }

        Ok((views, total))
    }
}
