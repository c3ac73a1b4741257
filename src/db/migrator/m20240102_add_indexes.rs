use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ingredient search is a prefix match on the lowercased name
        manager
            .create_index(
                Index::create()
                    .name("idx_ingredients_name_lower")
                    .table(Ingredients::Table)
                    .col(Ingredients::NameLower)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_pub_date")
                    .table(Recipes::Table)
                    .col(Recipes::PubDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_author_id")
                    .table(Recipes::Table)
                    .col(Recipes::AuthorId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One composition row per ingredient within a recipe
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_ingredients_unique")
                    .table(RecipeIngredients::Table)
                    .col(RecipeIngredients::RecipeId)
                    .col(RecipeIngredients::IngredientId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_author_id")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::AuthorId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_subscriptions_author_id")
                    .table(Subscriptions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipe_ingredients_unique")
                    .table(RecipeIngredients::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipes_author_id")
                    .table(Recipes::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_recipes_pub_date")
                    .table(Recipes::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_ingredients_name_lower")
                    .table(Ingredients::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Ingredients {
    Table,
    NameLower,
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    PubDate,
    AuthorId,
}

#[derive(DeriveIden)]
enum RecipeIngredients {
    Table,
    RecipeId,
    IngredientId,
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    AuthorId,
}
