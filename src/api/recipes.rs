use axum::{
    Json,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::extract::{AuthUser, IdPath, JsonBody, Viewer};
use super::pagination::{Page, Pagination, QueryParams};
use super::validation::{validate_id, validate_recipe_draft, validate_recipe_patch};
use super::{ApiError, AppState, RecipeDto, RecipeRequest, RecipeShortDto};
use crate::db::RecipeSet;
use crate::models::user::User;
use crate::services::RecipeQuery;
use crate::services::shopping_list::{SHOPPING_LIST_FILENAME, render_shopping_list};

fn recipe_query(params: &QueryParams) -> RecipeQuery {
    RecipeQuery {
        author_id: params
            .first("author")
            .and_then(|v| v.trim().parse::<i32>().ok()),
        tag_slugs: params
            .all("tags")
            .into_iter()
            .filter(|slug| !slug.is_empty())
            .collect(),
        only_favorited: params.flag("is_favorited"),
        only_in_shopping_cart: params.flag("is_in_shopping_cart"),
    }
}

/// GET /recipes
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Viewer(viewer): Viewer,
    pagination: Pagination,
) -> Result<Json<Page<RecipeDto>>, ApiError> {
    let query = recipe_query(&pagination.params);
    let (recipes, total) = state
        .recipe_service()
        .list(viewer.as_ref(), query, pagination.page, pagination.limit)
        .await?;

    Ok(Json(pagination.page(recipes, total)?))
}

/// GET /recipes/{id}
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Viewer(viewer): Viewer,
    IdPath(id): IdPath,
) -> Result<Json<RecipeDto>, ApiError> {
    let id = validate_id("Recipe", id)?;
    let view = state.recipe_service().get(viewer.as_ref(), id).await?;
    Ok(Json(RecipeDto::from(view)))
}

/// POST /recipes
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<RecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validate_recipe_draft(payload)?;
    let view = state.recipe_service().create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(RecipeDto::from(view))))
}

/// PATCH /recipes/{id}
pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<RecipeRequest>,
) -> Result<Json<RecipeDto>, ApiError> {
    let id = validate_id("Recipe", id)?;
    state.recipe_service().ensure_author(&user, id).await?;
    let patch = validate_recipe_patch(payload)?;
    let view = state.recipe_service().update(&user, id, patch).await?;
    Ok(Json(RecipeDto::from(view)))
}

/// DELETE /recipes/{id}
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate_id("Recipe", id)?;
    state.recipe_service().delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /recipes/download_shopping_cart
pub async fn download_shopping_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Response, ApiError> {
    let items = state.recipe_service().shopping_list(&user).await?;
    let body = render_shopping_list(&items);

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{SHOPPING_LIST_FILENAME}\""
    ))
    .map_err(|e| ApiError::internal(format!("Invalid header value: {e}")))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

async fn add_to_set(
    state: &AppState,
    user: &User,
    set: RecipeSet,
    id: i32,
) -> Result<Response, ApiError> {
    let id = validate_id("Recipe", id)?;
    let recipe = state.social_service().add_recipe(user, set, id).await?;
    Ok((StatusCode::CREATED, Json(RecipeShortDto::from(recipe))).into_response())
}

async fn remove_from_set(
    state: &AppState,
    user: &User,
    set: RecipeSet,
    id: i32,
) -> Result<Response, ApiError> {
    let id = validate_id("Recipe", id)?;
    state.social_service().remove_recipe(user, set, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// POST /recipes/{id}/favorite
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<Response, ApiError> {
    add_to_set(&state, &user, RecipeSet::Favorites, id).await
}

/// DELETE /recipes/{id}/favorite
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<Response, ApiError> {
    remove_from_set(&state, &user, RecipeSet::Favorites, id).await
}

/// POST /recipes/{id}/shopping_cart
pub async fn add_to_shopping_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<Response, ApiError> {
    add_to_set(&state, &user, RecipeSet::ShoppingCart, id).await
}

/// DELETE /recipes/{id}/shopping_cart
pub async fn remove_from_shopping_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<Response, ApiError> {
    remove_from_set(&state, &user, RecipeSet::ShoppingCart, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_query_from_params() {
        let params = QueryParams::parse(Some(
            "author=3&tags=breakfast&tags=lunch&is_favorited=1&is_in_shopping_cart=0",
        ));
        let query = recipe_query(&params);

        assert_eq!(query.author_id, Some(3));
        assert_eq!(query.tag_slugs, vec!["breakfast", "lunch"]);
        assert!(query.only_favorited);
        assert!(!query.only_in_shopping_cart);
    }

    #[test]
    fn test_recipe_query_ignores_garbage_author() {
        let query = recipe_query(&QueryParams::parse(Some("author=me")));
        assert!(query.author_id.is_none());
    }
}
