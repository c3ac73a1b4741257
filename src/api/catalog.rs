//! Read-only tag and ingredient endpoints. Lists are not paginated.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::extract::IdPath;
use super::validation::validate_id;
use super::{ApiError, AppState, IngredientDto, TagDto};

#[derive(Debug, Deserialize)]
pub struct IngredientSearchQuery {
    pub search: Option<String>,
}

/// GET /tags
pub async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TagDto>>, ApiError> {
    let tags = state.catalog_service().list_tags().await?;
    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

/// GET /tags/{id}
pub async fn get_tag(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<Json<TagDto>, ApiError> {
    let id = validate_id("Tag", id)?;
    let tag = state.catalog_service().get_tag(id).await?;
    Ok(Json(TagDto::from(tag)))
}

/// GET /ingredients?search=
pub async fn list_ingredients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IngredientSearchQuery>,
) -> Result<Json<Vec<IngredientDto>>, ApiError> {
    let ingredients = state
        .catalog_service()
        .list_ingredients(query.search.as_deref())
        .await?;

    Ok(Json(
        ingredients.into_iter().map(IngredientDto::from).collect(),
    ))
}

/// GET /ingredients/{id}
pub async fn get_ingredient(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<Json<IngredientDto>, ApiError> {
    let id = validate_id("Ingredient", id)?;
    let ingredient = state.catalog_service().get_ingredient(id).await?;
    Ok(Json(IngredientDto::from(ingredient)))
}
