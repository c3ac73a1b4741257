use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::models::errors::FieldErrors;
use crate::services::{AuthError, CatalogError, RecipeError, SocialError, UserError};

#[derive(Debug)]
pub enum ApiError {
    /// Field-level payload errors, `400 {"field": [..]}`
    Validation(FieldErrors),

    /// Rejected membership or subscription change, `400 {"errors": ..}`
    BadRequest(String),

    Unauthorized(String),

    Forbidden(String),

    NotFound(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "Validation error: {}", errors),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => detail(StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => detail(StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => detail(StatusCode::NOT_FOUND, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

fn detail(status: StatusCode, msg: String) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::validation(
                "non_field_errors",
                "Unable to log in with provided credentials.",
            ),
            AuthError::InvalidToken => ApiError::Unauthorized("Invalid token.".to_string()),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => ApiError::not_found("User", id),
            UserError::Validation(errors) => ApiError::Validation(errors),
            UserError::IncorrectPassword => {
                ApiError::Unauthorized("Current password is incorrect.".to_string())
            }
            UserError::Database(msg) => ApiError::DatabaseError(msg),
            UserError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { kind, id } => ApiError::not_found(kind, id),
            CatalogError::Database(msg) => ApiError::DatabaseError(msg),
            CatalogError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::NotFound(id) => ApiError::not_found("Recipe", id),
            RecipeError::Forbidden(_) => ApiError::forbidden(),
            RecipeError::Validation(errors) => ApiError::Validation(errors),
            RecipeError::Database(msg) => ApiError::DatabaseError(msg),
            RecipeError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<SocialError> for ApiError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::RecipeNotFound(id) => ApiError::not_found("Recipe", id),
            SocialError::UserNotFound(id) => ApiError::not_found("User", id),
            SocialError::Database(msg) => ApiError::DatabaseError(msg),
            SocialError::Internal(msg) => ApiError::InternalError(msg),
            e @ (SocialError::AlreadyInSet(_)
            | SocialError::NotInSet(_)
            | SocialError::AlreadySubscribed
            | SocialError::NotSubscribed
            | SocialError::SelfSubscription) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn not_authenticated() -> Self {
        ApiError::Unauthorized("Authentication credentials were not provided.".to_string())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("You do not have permission to perform this action.".to_string())
    }

    pub fn invalid_page() -> Self {
        ApiError::NotFound("Invalid page.".to_string())
    }

    pub fn validation(field: &str, msg: impl Into<String>) -> Self {
        ApiError::Validation(FieldErrors::single(field, msg))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
