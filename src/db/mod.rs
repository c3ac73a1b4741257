use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{ingredients, tags};
use crate::models::recipe::{Recipe, RecipeDraft, RecipeFilter, RecipePatch, RecipeSummary};
use crate::models::shopping::ShoppingListItem;
use crate::models::user::{NewUser, User};

pub mod migrator;
pub mod repositories;

pub use repositories::social::RecipeSet;

/// True when the root cause is a unique constraint violation.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DbErr>()
        .is_some_and(|e| matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn catalog_repo(&self) -> repositories::catalog::CatalogRepository {
        repositories::catalog::CatalogRepository::new(self.conn.clone())
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    fn social_repo(&self) -> repositories::social::SocialRepository {
        repositories::social::SocialRepository::new(self.conn.clone())
    }

    fn shopping_repo(&self) -> repositories::shopping::ShoppingRepository {
        repositories::shopping::ShoppingRepository::new(self.conn.clone())
    }

    // ========== Users & Tokens ==========

    pub async fn create_user(&self, new_user: NewUser, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn list_users(&self, page: u64, page_size: u64) -> Result<(Vec<User>, u64)> {
        self.user_repo().list_page(page, page_size).await
    }

    pub async fn verify_user_password(&self, user_id: i32, password: &str) -> Result<bool> {
        self.user_repo().verify_password(user_id, password).await
    }

    pub async fn update_user_password(
        &self,
        user_id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(user_id, new_password, config)
            .await
    }

    pub async fn get_or_create_token(&self, user_id: i32) -> Result<String> {
        self.user_repo().get_or_create_token(user_id).await
    }

    pub async fn get_user_by_token(&self, key: &str) -> Result<Option<User>> {
        self.user_repo().get_by_token(key).await
    }

    pub async fn delete_token(&self, user_id: i32) -> Result<()> {
        self.user_repo().delete_token(user_id).await
    }

    // ========== Catalog ==========

    pub async fn list_tags(&self) -> Result<Vec<tags::Model>> {
        self.catalog_repo().list_tags().await
    }

    pub async fn get_tag(&self, id: i32) -> Result<Option<tags::Model>> {
        self.catalog_repo().get_tag(id).await
    }

    pub async fn count_tags(&self, ids: &[i32]) -> Result<u64> {
        self.catalog_repo().count_tags(ids).await
    }

    pub async fn list_ingredients(&self, search: Option<&str>) -> Result<Vec<ingredients::Model>> {
        self.catalog_repo().list_ingredients(search).await
    }

    pub async fn get_ingredient(&self, id: i32) -> Result<Option<ingredients::Model>> {
        self.catalog_repo().get_ingredient(id).await
    }

    pub async fn count_ingredients(&self, ids: &[i32]) -> Result<u64> {
        self.catalog_repo().count_ingredients(ids).await
    }

    pub async fn upsert_ingredient(&self, id: i32, name: &str, unit: &str) -> Result<()> {
        self.catalog_repo().upsert_ingredient(id, name, unit).await
    }

    pub async fn upsert_tag(&self, name: &str, color: &str, slug: &str) -> Result<()> {
        self.catalog_repo().upsert_tag(name, color, slug).await
    }

    // ========== Recipes ==========

    pub async fn create_recipe(&self, author_id: i32, draft: RecipeDraft) -> Result<i32> {
        self.recipe_repo().create(author_id, draft).await
    }

    pub async fn update_recipe(&self, id: i32, patch: RecipePatch) -> Result<bool> {
        self.recipe_repo().update(id, patch).await
    }

    pub async fn delete_recipe(&self, id: i32) -> Result<bool> {
        self.recipe_repo().delete(id).await
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<Recipe>> {
        self.recipe_repo().get(id).await
    }

    pub async fn get_recipe_summary(&self, id: i32) -> Result<Option<RecipeSummary>> {
        self.recipe_repo().get_summary(id).await
    }

    pub async fn recipe_author(&self, id: i32) -> Result<Option<i32>> {
        self.recipe_repo().author_of(id).await
    }

    pub async fn recipe_exists(&self, id: i32) -> Result<bool> {
        self.recipe_repo().exists(id).await
    }

    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Recipe>, u64)> {
        self.recipe_repo().list(filter, page, page_size).await
    }

    pub async fn recipe_summaries_for_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>> {
        self.recipe_repo()
            .summaries_for_author(author_id, limit)
            .await
    }

    pub async fn count_recipes_for_author(&self, author_id: i32) -> Result<u64> {
        self.recipe_repo().count_for_author(author_id).await
    }

    // ========== Favorites, Cart & Subscriptions ==========

    pub async fn set_contains(&self, set: RecipeSet, user_id: i32, recipe_id: i32) -> Result<bool> {
        self.social_repo().contains(set, user_id, recipe_id).await
    }

    pub async fn add_to_set(&self, set: RecipeSet, user_id: i32, recipe_id: i32) -> Result<bool> {
        self.social_repo().insert(set, user_id, recipe_id).await
    }

    pub async fn remove_from_set(
        &self,
        set: RecipeSet,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool> {
        self.social_repo().remove(set, user_id, recipe_id).await
    }

    pub async fn set_members_among(
        &self,
        set: RecipeSet,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>> {
        self.social_repo()
            .members_among(set, user_id, recipe_ids)
            .await
    }

    pub async fn is_subscribed(&self, user_id: i32, author_id: i32) -> Result<bool> {
        self.social_repo().is_subscribed(user_id, author_id).await
    }

    pub async fn subscribe(&self, user_id: i32, author_id: i32) -> Result<bool> {
        self.social_repo().subscribe(user_id, author_id).await
    }

    pub async fn unsubscribe(&self, user_id: i32, author_id: i32) -> Result<bool> {
        self.social_repo().unsubscribe(user_id, author_id).await
    }

    pub async fn subscribed_among(&self, user_id: i32, author_ids: &[i32]) -> Result<HashSet<i32>> {
        self.social_repo()
            .subscribed_among(user_id, author_ids)
            .await
    }

    pub async fn followed_authors(
        &self,
        user_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<User>, u64)> {
        self.social_repo()
            .followed_authors(user_id, page, page_size)
            .await
    }

    // ========== Shopping List ==========

    pub async fn aggregate_shopping_cart(&self, user_id: i32) -> Result<Vec<ShoppingListItem>> {
        self.shopping_repo().aggregate_cart(user_id).await
    }
}
