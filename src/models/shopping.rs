use sea_orm::FromQueryResult;

/// One aggregated shopping list line: the summed amount of a single
/// ingredient across every recipe in a cart.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ShoppingListItem {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}
