use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use std::collections::HashMap;

use crate::entities::{
    favorites, prelude::*, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags, users,
};
use crate::models::recipe::{
    IngredientAmount, Recipe, RecipeDraft, RecipeFilter, RecipeIngredientLine, RecipePatch,
    RecipeSummary,
};
use crate::models::user::User;

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, author_id: i32, draft: RecipeDraft) -> Result<i32> {
        let txn = self.conn.begin().await?;

        let recipe = recipes::ActiveModel {
            author_id: Set(author_id),
            name: Set(draft.name),
            image: Set(draft.image),
            text: Set(draft.text),
            cooking_time: Set(draft.cooking_time),
            pub_date: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert recipe")?;

        replace_tags(&txn, recipe.id, &draft.tag_ids).await?;
        replace_ingredients(&txn, recipe.id, &draft.ingredients).await?;

        txn.commit().await?;
        Ok(recipe.id)
    }

    /// Apply a partial update. Composition is deleted and reinserted, never diffed.
    pub async fn update(&self, id: i32, patch: RecipePatch) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Recipes::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        let mut active: recipes::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(image) = patch.image {
            active.image = Set(image);
        }
        if let Some(text) = patch.text {
            active.text = Set(text);
        }
        if let Some(cooking_time) = patch.cooking_time {
            active.cooking_time = Set(cooking_time);
        }
        if active.is_changed() {
            active.update(&txn).await.context("Failed to update recipe")?;
        }

        if let Some(tag_ids) = patch.tag_ids {
            replace_tags(&txn, id, &tag_ids).await?;
        }
        if let Some(ingredients) = patch.ingredients {
            replace_ingredients(&txn, id, &ingredients).await?;
        }

        txn.commit().await?;
        Ok(true)
    }

    /// Composition, tag and membership rows go with it via cascading keys.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Recipes::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn author_of(&self, id: i32) -> Result<Option<i32>> {
        let author: Option<i32> = Recipes::find_by_id(id)
            .select_only()
            .column(recipes::Column::AuthorId)
            .into_tuple()
            .one(&self.conn)
            .await?;

        Ok(author)
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.author_of(id).await?.is_some())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Recipe>> {
        let Some(model) = Recipes::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.pop())
    }

    pub async fn get_summary(&self, id: i32) -> Result<Option<RecipeSummary>> {
        let model = Recipes::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(summary_from_model))
    }

    /// One page of recipes matching `filter`, newest first, plus the total count.
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Recipe>, u64)> {
        let paginator = filtered(filter)
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .paginate(&self.conn, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((self.hydrate(models).await?, total))
    }

    /// Newest recipes of one author, truncated to `limit` when given.
    pub async fn summaries_for_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>> {
        let mut query = Recipes::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(summary_from_model).collect())
    }

    pub async fn count_for_author(&self, author_id: i32) -> Result<u64> {
        let count = Recipes::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Load authors, tags and ingredient lines for a batch of recipe rows,
    /// keeping the input order.
    async fn hydrate(&self, models: Vec<recipes::Model>) -> Result<Vec<Recipe>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let recipe_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut author_ids: Vec<i32> = models.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i32, User> = Users::find()
            .filter(users::Column::Id.is_in(author_ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|u| (u.id, User::from(u)))
            .collect();

        let tag_rows = RecipeTags::find()
            .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.clone()))
            .order_by_asc(recipe_tags::Column::TagId)
            .find_also_related(Tags)
            .all(&self.conn)
            .await?;

        let mut tags_by_recipe: HashMap<i32, Vec<tags::Model>> = HashMap::new();
        for (link, tag) in tag_rows {
            if let Some(tag) = tag {
                tags_by_recipe.entry(link.recipe_id).or_default().push(tag);
            }
        }

        let ingredient_rows = RecipeIngredients::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids))
            .order_by_asc(recipe_ingredients::Column::Id)
            .find_also_related(Ingredients)
            .all(&self.conn)
            .await?;

        let mut lines_by_recipe: HashMap<i32, Vec<RecipeIngredientLine>> = HashMap::new();
        for (row, ingredient) in ingredient_rows {
            if let Some(ingredient) = ingredient {
                lines_by_recipe
                    .entry(row.recipe_id)
                    .or_default()
                    .push(RecipeIngredientLine {
                        ingredient_id: ingredient.id,
                        name: ingredient.name,
                        measurement_unit: ingredient.measurement_unit,
                        amount: row.amount,
                    });
            }
        }

        models
            .into_iter()
            .map(|m| {
                let author = authors
                    .get(&m.author_id)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("Recipe {} has no author row", m.id))?;

                Ok(Recipe {
                    id: m.id,
                    author,
                    tags: tags_by_recipe.remove(&m.id).unwrap_or_default(),
                    ingredients: lines_by_recipe.remove(&m.id).unwrap_or_default(),
                    name: m.name,
                    image: m.image,
                    text: m.text,
                    cooking_time: m.cooking_time,
                    pub_date: m.pub_date,
                })
            })
            .collect()
    }
}

fn filtered(filter: &RecipeFilter) -> Select<Recipes> {
    let mut query = Recipes::find();

    if let Some(author_id) = filter.author_id {
        query = query.filter(recipes::Column::AuthorId.eq(author_id));
    }

    if !filter.tag_slugs.is_empty() {
        // Subquery keeps one row per recipe even when several slugs match
        let tagged = Query::select()
            .column((RecipeTags, recipe_tags::Column::RecipeId))
            .from(RecipeTags)
            .inner_join(
                Tags,
                Expr::col((Tags, tags::Column::Id))
                    .equals((RecipeTags, recipe_tags::Column::TagId)),
            )
            .and_where(Expr::col((Tags, tags::Column::Slug)).is_in(filter.tag_slugs.clone()))
            .to_owned();
        query = query.filter(recipes::Column::Id.in_subquery(tagged));
    }

    if let Some(user_id) = filter.favorited_by {
        let favorited = Query::select()
            .column(favorites::Column::RecipeId)
            .from(Favorites)
            .and_where(favorites::Column::UserId.eq(user_id))
            .to_owned();
        query = query.filter(recipes::Column::Id.in_subquery(favorited));
    }

    if let Some(user_id) = filter.in_cart_of {
        let in_cart = Query::select()
            .column(shopping_cart::Column::RecipeId)
            .from(ShoppingCart)
            .and_where(shopping_cart::Column::UserId.eq(user_id))
            .to_owned();
        query = query.filter(recipes::Column::Id.in_subquery(in_cart));
    }

    query
}

async fn replace_tags<C: ConnectionTrait>(conn: &C, recipe_id: i32, tag_ids: &[i32]) -> Result<()> {
    RecipeTags::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<recipe_tags::ActiveModel> = tag_ids
        .iter()
        .map(|tag_id| recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        })
        .collect();

    RecipeTags::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .context("Failed to insert recipe tags")?;

    Ok(())
}

async fn replace_ingredients<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    ingredients: &[IngredientAmount],
) -> Result<()> {
    RecipeIngredients::delete_many()
        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;

    if ingredients.is_empty() {
        return Ok(());
    }

    let rows: Vec<recipe_ingredients::ActiveModel> = ingredients
        .iter()
        .map(|item| recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(item.ingredient_id),
            amount: Set(item.amount),
            ..Default::default()
        })
        .collect();

    RecipeIngredients::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .context("Failed to insert recipe ingredients")?;

    Ok(())
}

fn summary_from_model(model: recipes::Model) -> RecipeSummary {
    RecipeSummary {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}
