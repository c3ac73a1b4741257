use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::extract::{AuthUser, JsonBody};
use super::validation::validate_login;
use super::{ApiError, AppState, LoginRequest, TokenDto};

// ============================================================================
// Middleware
// ============================================================================

/// Resolves `Authorization: Token <key>` (or `Bearer <key>`) to a user and
/// stores it in the request extensions.
///
/// Requests without a token pass through as anonymous; handlers decide
/// whether that is enough. An unknown token is rejected outright.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_token(request.headers()) {
        let user = state.auth_service().authenticate(&token).await?;
        tracing::Span::current().record("user_id", user.id);
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

/// Extract the token from the `Authorization` header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !(scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer")) {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/token/login
/// Exchange email and password for the user's token
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenDto>, ApiError> {
    let (email, password) = validate_login(payload)?;
    let auth_token = state.auth_service().login(&email, &password).await?;
    Ok(Json(TokenDto { auth_token }))
}

/// POST /auth/token/logout
/// Delete the caller's token
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state.auth_service().logout(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
