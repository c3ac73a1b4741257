//! Catalog import command handlers

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::db::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IngredientRow {
    id: i32,
    name: String,
    unit: String,
}

#[derive(Debug, Deserialize)]
struct TagRow {
    name: String,
    color: String,
    slug: String,
}

/// Parses `name,unit` lines. The id of a row is its 1-based line number, so
/// re-importing the same file overwrites rather than duplicates.
fn parse_ingredients(content: &str) -> Result<Vec<IngredientRow>> {
    let mut rows = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((name, unit)) = line.split_once(',') else {
            bail!("Line {line_no}: expected `name,unit`");
        };

        let (name, unit) = (name.trim(), unit.trim());
        if name.is_empty() {
            bail!("Line {line_no}: ingredient name is empty");
        }
        if name.chars().count() > 100 || unit.chars().count() > 100 {
            bail!("Line {line_no}: name and unit must be at most 100 characters");
        }

        rows.push(IngredientRow {
            id: i32::try_from(line_no).context("Too many lines in ingredient file")?,
            name: name.to_string(),
            unit: unit.to_string(),
        });
    }

    Ok(rows)
}

fn parse_tags(content: &str) -> Result<Vec<TagRow>> {
    let rows: Vec<TagRow> = serde_json::from_str(content).context("Invalid tag JSON")?;

    for row in &rows {
        if row.slug.trim().is_empty() {
            bail!("Tag {:?} has an empty slug", row.name);
        }
        if !is_hex_color(&row.color) {
            bail!("Tag {:?} has an invalid color {:?}", row.slug, row.color);
        }
    }

    Ok(rows)
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

async fn read_input(path: &str) -> Result<Option<String>> {
    let input = Path::new(path);
    if !input.exists() {
        println!("Path does not exist: {path}");
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {path}"))?;
    Ok(Some(content))
}

pub async fn cmd_import_ingredients(config: &Config, path: &str) -> Result<()> {
    let Some(content) = read_input(path).await? else {
        return Ok(());
    };
    let rows = parse_ingredients(&content)?;

    let store = Store::new(&config.general.database_path).await?;
    for row in &rows {
        store.upsert_ingredient(row.id, &row.name, &row.unit).await?;
    }

    info!(count = rows.len(), path, "Ingredients imported");
    println!("Imported {} ingredients from {path}", rows.len());
    Ok(())
}

pub async fn cmd_import_tags(config: &Config, path: &str) -> Result<()> {
    let Some(content) = read_input(path).await? else {
        return Ok(());
    };
    let rows = parse_tags(&content)?;

    let store = Store::new(&config.general.database_path).await?;
    for row in &rows {
        store.upsert_tag(&row.name, &row.color, &row.slug).await?;
    }

    info!(count = rows.len(), path, "Tags imported");
    println!("Imported {} tags from {path}", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredients_numbers_by_line() {
        let rows = parse_ingredients("sugar,g\nmilk, ml\n\nsalt,pinch\n").unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            IngredientRow {
                id: 1,
                name: "sugar".into(),
                unit: "g".into()
            }
        );
        assert_eq!(rows[1].unit, "ml");
        // The blank line still consumes an id
        assert_eq!(rows[2].id, 4);
    }

    #[test]
    fn test_parse_ingredients_keeps_commas_in_unit() {
        let rows = parse_ingredients("eggs,pcs, large").unwrap();
        assert_eq!(rows[0].unit, "pcs, large");
    }

    #[test]
    fn test_parse_ingredients_rejects_missing_unit() {
        let err = parse_ingredients("sugar,g\nflour").unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_parse_tags() {
        let rows = parse_tags(
            r##"[{"name": "Breakfast", "color": "#E26C2D", "slug": "breakfast"}]"##,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].slug, "breakfast");
    }

    #[test]
    fn test_parse_tags_rejects_bad_color() {
        assert!(parse_tags(r#"[{"name": "Lunch", "color": "red", "slug": "lunch"}]"#).is_err());
        assert!(parse_tags("not json").is_err());
    }
}
