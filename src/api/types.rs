use serde::{Deserialize, Serialize};

use crate::entities::{ingredients, tags};
use crate::models::recipe::{RecipeIngredientLine, RecipeSummary};
use crate::models::user::User;
use crate::services::{AuthorView, RecipeView, UserView};

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserDto {
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

impl From<UserView> for UserDto {
    fn from(view: UserView) -> Self {
        Self::new(view.user, view.is_subscribed)
    }
}

/// Signup response, without `is_subscribed`.
#[derive(Debug, Serialize)]
pub struct UserCreatedDto {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserCreatedDto {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenDto {
    pub auth_token: String,
}

#[derive(Debug, Serialize)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<tags::Model> for TagDto {
    fn from(tag: tags::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<ingredients::Model> for IngredientDto {
    fn from(ingredient: ingredients::Model) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeIngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredientLine> for RecipeIngredientDto {
    fn from(line: RecipeIngredientLine) -> Self {
        Self {
            id: line.ingredient_id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDto {
    pub id: i32,
    pub tags: Vec<TagDto>,
    pub author: UserDto,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<RecipeView> for RecipeDto {
    fn from(view: RecipeView) -> Self {
        let recipe = view.recipe;
        Self {
            id: recipe.id,
            tags: recipe.tags.into_iter().map(TagDto::from).collect(),
            author: UserDto::new(recipe.author, view.author_is_subscribed),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientDto::from)
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeShortDto {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<RecipeSummary> for RecipeShortDto {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionDto {
    #[serde(flatten)]
    pub author: UserDto,
    pub recipes: Vec<RecipeShortDto>,
    pub recipes_count: u64,
}

impl From<AuthorView> for SubscriptionDto {
    fn from(view: AuthorView) -> Self {
        Self {
            author: UserDto::new(view.user, view.is_subscribed),
            recipes: view.recipes.into_iter().map(RecipeShortDto::from).collect(),
            recipes_count: view.recipes_count,
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

// Fields are optional so that a missing one is reported per field
// instead of failing deserialization as a whole.

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SetPasswordRequest {
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: i64,
}

/// Body of both recipe create and recipe update.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}
