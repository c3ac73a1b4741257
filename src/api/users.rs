use axum::{
    Json,
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::extract::{AuthUser, IdPath, JsonBody, Viewer};
use super::pagination::{Page, Pagination, QueryParams};
use super::validation::{validate_id, validate_set_password, validate_signup};
use super::{
    ApiError, AppState, SetPasswordRequest, SignupRequest, SubscriptionDto, UserCreatedDto,
    UserDto,
};

fn recipes_limit(params: &QueryParams) -> Option<u64> {
    params
        .first("recipes_limit")
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Viewer(viewer): Viewer,
    pagination: Pagination,
) -> Result<Json<Page<UserDto>>, ApiError> {
    let (users, total) = state
        .user_service()
        .list(viewer.as_ref(), pagination.page, pagination.limit)
        .await?;

    Ok(Json(pagination.page(users, total)?))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_user = validate_signup(payload)?;
    let user = state.user_service().signup(new_user).await?;

    Ok((StatusCode::CREATED, Json(UserCreatedDto::from(user))))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<UserDto>, ApiError> {
    let id = validate_id("User", id)?;
    let view = state.user_service().get(Some(&viewer), id).await?;
    Ok(Json(UserDto::from(view)))
}

/// GET /users/me
pub async fn me(AuthUser(user): AuthUser) -> Json<UserDto> {
    Json(UserDto::new(user, false))
}

/// POST /users/set_password
pub async fn set_password(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<SetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (current, new) = validate_set_password(payload)?;
    state
        .user_service()
        .set_password(&user, &current, &new)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/subscriptions
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    pagination: Pagination,
) -> Result<Json<Page<SubscriptionDto>>, ApiError> {
    let (authors, total) = state
        .social_service()
        .subscriptions(
            &user,
            recipes_limit(&pagination.params),
            pagination.page,
            pagination.limit,
        )
        .await?;

    Ok(Json(pagination.page(authors, total)?))
}

/// POST /users/{id}/subscribe
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate_id("User", id)?;
    let params = QueryParams::parse(query.as_deref());

    let author = state
        .social_service()
        .subscribe(&user, id, recipes_limit(&params))
        .await?;

    Ok((StatusCode::CREATED, Json(SubscriptionDto::from(author))))
}

/// DELETE /users/{id}/subscribe
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let id = validate_id("User", id)?;
    state.social_service().unsubscribe(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
