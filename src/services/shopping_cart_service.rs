use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entity::ShoppingCarts,
    error::AppResult,
    middleware::auth::AuthUser,
    models::RecipeShort,
    response::{ApiResponse, Meta},
    services::recipe_marker::{mark, unmark},
    state::AppState,
};

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";
const SHOPPING_LIST_HEADER: &str = "Shopping list:";

/// One aggregated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

pub async fn add_to_shopping_cart(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
) -> AppResult<ApiResponse<RecipeShort>> {
    let recipe = mark::<ShoppingCarts>(state, user, recipe_id).await?;

    tracing::info!(user_id = %user.user_id, %recipe_id, "recipe added to shopping cart");

    Ok(ApiResponse::success(
        "Added to shopping cart",
        recipe,
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_shopping_cart(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
) -> AppResult<()> {
    unmark::<ShoppingCarts>(state, user, recipe_id).await?;

    tracing::info!(user_id = %user.user_id, %recipe_id, "recipe removed from shopping cart");
    Ok(())
}

/// Ingredient totals across every recipe in the user's cart, summed by the database.
pub async fn shopping_list(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<ShoppingListLine>> {
    let lines = sqlx::query_as::<_, ShoppingListLine>(
        r#"
        SELECT i.name, i.measurement_unit, SUM(ir.amount)::BIGINT AS amount
        FROM shopping_carts sc
        JOIN ingredient_recipes ir ON ir.recipe_id = sc.recipe_id
        JOIN ingredients i ON i.id = ir.ingredient_id
        WHERE sc.user_id = $1
        GROUP BY i.name, i.measurement_unit
        ORDER BY i.name ASC, i.measurement_unit ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

pub fn render_shopping_list(lines: &[ShoppingListLine]) -> String {
    let mut text = String::from(SHOPPING_LIST_HEADER);
    for line in lines {
        text.push('\n');
        text.push_str(&format!(
            "{} ({}) - {}",
            line.name, line.measurement_unit, line.amount
        ));
    }
    text
}

pub async fn download_shopping_cart(state: &AppState, user: &AuthUser) -> AppResult<String> {
    let lines = shopping_list(&state.pool, user.user_id).await?;
    tracing::debug!(user_id = %user.user_id, lines = lines.len(), "shopping list exported");
    Ok(render_shopping_list(&lines))
}
