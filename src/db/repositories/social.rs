use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use std::collections::HashSet;

use crate::entities::{favorites, prelude::*, shopping_cart, subscriptions, users};
use crate::models::user::User;

/// The two per-user recipe sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeSet {
    Favorites,
    ShoppingCart,
}

impl RecipeSet {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

pub struct SocialRepository {
    conn: DatabaseConnection,
}

impl SocialRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn contains(&self, set: RecipeSet, user_id: i32, recipe_id: i32) -> Result<bool> {
        let count = match set {
            RecipeSet::Favorites => {
                Favorites::find_by_id((user_id, recipe_id))
                    .count(&self.conn)
                    .await?
            }
            RecipeSet::ShoppingCart => {
                ShoppingCart::find_by_id((user_id, recipe_id))
                    .count(&self.conn)
                    .await?
            }
        };

        Ok(count > 0)
    }

    /// Returns `false` when the edge already exists.
    pub async fn insert(&self, set: RecipeSet, user_id: i32, recipe_id: i32) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = match set {
            RecipeSet::Favorites => {
                Favorites::insert(favorites::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                })
                .exec_without_returning(&self.conn)
                .await
            }
            RecipeSet::ShoppingCart => {
                ShoppingCart::insert(shopping_cart::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                })
                .exec_without_returning(&self.conn)
                .await
            }
        };

        inserted_unless_duplicate(result)
            .with_context(|| format!("Failed to add recipe {recipe_id} to {}", set.label()))
    }

    /// Returns `false` when there was no edge to remove.
    pub async fn remove(&self, set: RecipeSet, user_id: i32, recipe_id: i32) -> Result<bool> {
        let result = match set {
            RecipeSet::Favorites => {
                Favorites::delete_by_id((user_id, recipe_id))
                    .exec(&self.conn)
                    .await?
            }
            RecipeSet::ShoppingCart => {
                ShoppingCart::delete_by_id((user_id, recipe_id))
                    .exec(&self.conn)
                    .await?
            }
        };

        Ok(result.rows_affected > 0)
    }

    /// Which of `recipe_ids` are in the user's set.
    pub async fn members_among(
        &self,
        set: RecipeSet,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i32> = match set {
            RecipeSet::Favorites => {
                Favorites::find()
                    .select_only()
                    .column(favorites::Column::RecipeId)
                    .filter(favorites::Column::UserId.eq(user_id))
                    .filter(favorites::Column::RecipeId.is_in(recipe_ids.to_vec()))
                    .into_tuple()
                    .all(&self.conn)
                    .await?
            }
            RecipeSet::ShoppingCart => {
                ShoppingCart::find()
                    .select_only()
                    .column(shopping_cart::Column::RecipeId)
                    .filter(shopping_cart::Column::UserId.eq(user_id))
                    .filter(shopping_cart::Column::RecipeId.is_in(recipe_ids.to_vec()))
                    .into_tuple()
                    .all(&self.conn)
                    .await?
            }
        };

        Ok(ids.into_iter().collect())
    }

    pub async fn is_subscribed(&self, user_id: i32, author_id: i32) -> Result<bool> {
        let count = Subscriptions::find_by_id((user_id, author_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Returns `false` when the subscription already exists.
    pub async fn subscribe(&self, user_id: i32, author_id: i32) -> Result<bool> {
        let result = Subscriptions::insert(subscriptions::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        })
        .exec_without_returning(&self.conn)
        .await;

        inserted_unless_duplicate(result)
            .with_context(|| format!("Failed to subscribe user {user_id} to {author_id}"))
    }

    pub async fn unsubscribe(&self, user_id: i32, author_id: i32) -> Result<bool> {
        let result = Subscriptions::delete_by_id((user_id, author_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Which of `author_ids` the user follows.
    pub async fn subscribed_among(&self, user_id: i32, author_ids: &[i32]) -> Result<HashSet<i32>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i32> = Subscriptions::find()
            .select_only()
            .column(subscriptions::Column::AuthorId)
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::AuthorId.is_in(author_ids.to_vec()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// One page of the authors a user follows, ordered by id, plus the total.
    pub async fn followed_authors(
        &self,
        user_id: i32,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<User>, u64)> {
        let followed = sea_orm::sea_query::Query::select()
            .column(subscriptions::Column::AuthorId)
            .from(Subscriptions)
            .and_where(subscriptions::Column::UserId.eq(user_id))
            .to_owned();

        let paginator = Users::find()
            .filter(users::Column::Id.in_subquery(followed))
            .order_by_asc(users::Column::Id)
            .paginate(&self.conn, page_size);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((rows.into_iter().map(User::from).collect(), total))
    }
}

/// Map a unique violation to `Ok(false)` so a racing duplicate insert
/// reports the same condition as the existence check.
fn inserted_unless_duplicate<T>(result: Result<T, DbErr>) -> Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}
