//! Domain service for the read-only tag and ingredient catalog.

use thiserror::Error;

use crate::entities::{ingredients, tags};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i32 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<tags::Model>, CatalogError>;

    async fn get_tag(&self, id: i32) -> Result<tags::Model, CatalogError>;

    /// Ingredients whose name starts with `search`, case-insensitively.
    async fn list_ingredients(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ingredients::Model>, CatalogError>;

    async fn get_ingredient(&self, id: i32) -> Result<ingredients::Model, CatalogError>;
}
