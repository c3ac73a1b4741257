use std::fmt::Write;

use crate::models::shopping::ShoppingListItem;

pub const SHOPPING_LIST_HEADER: &str = "--- Shopping list ---";

pub const SHOPPING_LIST_FILENAME: &str = "shopping_cart.txt";

/// Render aggregated cart lines as a plain-text report, one ingredient per line.
#[must_use]
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    let mut out = String::with_capacity(SHOPPING_LIST_HEADER.len() + 1 + items.len() * 32);
    out.push_str(SHOPPING_LIST_HEADER);
    out.push('\n');

    for item in items {
        let _ = writeln!(
            out,
            "{} {} {}",
            item.name, item.total_amount, item.measurement_unit
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i32, name: &str, total: i64, unit: &str) -> ShoppingListItem {
        ShoppingListItem {
            ingredient_id: id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn test_empty_cart_renders_header_only() {
        assert_eq!(render_shopping_list(&[]), "--- Shopping list ---\n");
    }

    #[test]
    fn test_renders_one_line_per_ingredient() {
        let report = render_shopping_list(&[item(1, "flour", 500, "g"), item(7, "sugar", 250, "g")]);

        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines, vec!["--- Shopping list ---", "flour 500 g", "sugar 250 g"]);
    }

    #[test]
    fn test_large_totals_are_not_truncated() {
        let report = render_shopping_list(&[item(1, "water", 5_000_000_000, "ml")]);
        assert!(report.contains("water 5000000000 ml"));
    }
}
