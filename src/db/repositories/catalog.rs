use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{ingredients, prelude::*, tags};

pub struct CatalogRepository {
    conn: DatabaseConnection,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_tags(&self) -> Result<Vec<tags::Model>> {
        let rows = Tags::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list tags")?;

        Ok(rows)
    }

    pub async fn get_tag(&self, id: i32) -> Result<Option<tags::Model>> {
        Ok(Tags::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn count_tags(&self, ids: &[i32]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let count = Tags::find()
            .filter(tags::Column::Id.is_in(ids.to_vec()))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Case-insensitive prefix search on the ingredient name.
    pub async fn list_ingredients(&self, search: Option<&str>) -> Result<Vec<ingredients::Model>> {
        let mut query = Ingredients::find();

        if let Some(prefix) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
            query = query.filter(
                Expr::col((Ingredients, ingredients::Column::NameLower))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        let rows = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list ingredients")?;

        Ok(rows)
    }

    pub async fn get_ingredient(&self, id: i32) -> Result<Option<ingredients::Model>> {
        Ok(Ingredients::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn count_ingredients(&self, ids: &[i32]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let count = Ingredients::find()
            .filter(ingredients::Column::Id.is_in(ids.to_vec()))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Insert or overwrite an ingredient at a fixed id.
    pub async fn upsert_ingredient(&self, id: i32, name: &str, unit: &str) -> Result<()> {
        Ingredients::insert(ingredients::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            name_lower: Set(name.to_lowercase()),
            measurement_unit: Set(unit.to_string()),
        })
        .on_conflict(
            OnConflict::column(ingredients::Column::Id)
                .update_columns([
                    ingredients::Column::Name,
                    ingredients::Column::NameLower,
                    ingredients::Column::MeasurementUnit,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await
        .with_context(|| format!("Failed to upsert ingredient {id}"))?;

        Ok(())
    }

    /// Insert or overwrite a tag keyed by slug.
    pub async fn upsert_tag(&self, name: &str, color: &str, slug: &str) -> Result<()> {
        Tags::insert(tags::ActiveModel {
            name: Set(name.to_string()),
            color: Set(color.to_string()),
            slug: Set(slug.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(tags::Column::Slug)
                .update_columns([tags::Column::Name, tags::Column::Color])
                .to_owned(),
        )
        .exec_without_returning(&self.conn)
        .await
        .with_context(|| format!("Failed to upsert tag {slug}"))?;

        Ok(())
    }
}

fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("sugar"), "sugar");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
