//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::entities::{ingredients, tags};
use crate::services::catalog_service::{CatalogError, CatalogService};

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_tags(&self) -> Result<Vec<tags::Model>, CatalogError> {
        Ok(self.store.list_tags().await?)
    }

    async fn get_tag(&self, id: i32) -> Result<tags::Model, CatalogError> {
        self.store
            .get_tag(id)
            .await?
            .ok_or(CatalogError::NotFound { kind: "Tag", id })
    }

    async fn list_ingredients(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ingredients::Model>, CatalogError> {
        Ok(self.store.list_ingredients(search).await?)
    }

    async fn get_ingredient(&self, id: i32) -> Result<ingredients::Model, CatalogError> {
        self.store
            .get_ingredient(id)
            .await?
            .ok_or(CatalogError::NotFound {
                kind: "Ingredient",
                id,
            })
    }
}
