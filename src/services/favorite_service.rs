use uuid::Uuid;

use crate::{
    entity::Favorites,
    error::AppResult,
    middleware::auth::AuthUser,
    models::RecipeShort,
    response::{ApiResponse, Meta},
    services::recipe_marker::{mark, unmark},
    state::AppState,
};

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
) -> AppResult<ApiResponse<RecipeShort>> {
    let recipe = mark::<Favorites>(state, user, recipe_id).await?;

    tracing::info!(user_id = %user.user_id, %recipe_id, "favorite added");

    Ok(ApiResponse::success(
        "Added to favorites",
        recipe,
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(state: &AppState, user: &AuthUser, recipe_id: Uuid) -> AppResult<()> {
    unmark::<Favorites>(state, user, recipe_id).await?;

    tracing::info!(user_id = %user.user_id, %recipe_id, "favorite removed");
    Ok(())
}
