use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use crate::entities::{ingredients, prelude::*, recipe_ingredients, shopping_cart};
use crate::models::shopping::ShoppingListItem;

pub struct ShoppingRepository {
    conn: DatabaseConnection,
}

impl ShoppingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Sum composition amounts over every recipe in the user's cart,
    /// one row per ingredient.
    pub async fn aggregate_cart(&self, user_id: i32) -> Result<Vec<ShoppingListItem>> {
        let cart_recipes = Query::select()
            .column(shopping_cart::Column::RecipeId)
            .from(ShoppingCart)
            .and_where(shopping_cart::Column::UserId.eq(user_id))
            .to_owned();

        let rows = RecipeIngredients::find()
            .select_only()
            .column_as(ingredients::Column::Id, "ingredient_id")
            .column_as(ingredients::Column::Name, "name")
            .column_as(ingredients::Column::MeasurementUnit, "measurement_unit")
            .column_as(
                Expr::col((RecipeIngredients, recipe_ingredients::Column::Amount)).sum(),
                "total_amount",
            )
            .join(
                JoinType::InnerJoin,
                recipe_ingredients::Relation::Ingredient.def(),
            )
            .filter(recipe_ingredients::Column::RecipeId.in_subquery(cart_recipes))
            .group_by(ingredients::Column::Id)
            .group_by(ingredients::Column::Name)
            .group_by(ingredients::Column::MeasurementUnit)
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::Id)
            .into_model::<ShoppingListItem>()
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to aggregate shopping cart for user {user_id}"))?;

        Ok(rows)
    }
}
