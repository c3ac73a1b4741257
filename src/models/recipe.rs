use crate::entities::tags;
use crate::models::user::User;

/// A recipe with its tags, composition and author loaded.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub author: User,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: String,
    pub tags: Vec<tags::Model>,
    pub ingredients: Vec<RecipeIngredientLine>,
}

/// One composition row joined with its ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientLine {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

/// Validated input for creating a recipe.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Validated input for a partial update. `tag_ids` and `ingredients`
/// replace the whole composition when present.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// Recipe list filters. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<i32>,
    /// Matches recipes carrying any of these slugs
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<i32>,
    pub in_cart_of: Option<i32>,
}

/// Short recipe form used by membership responses and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}
