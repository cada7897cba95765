//! Add/remove logic shared by per-user recipe markers: favorites and the shopping cart.

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    entity::{favorites, shopping_carts},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::RecipeShort,
    services::recipe_service::{find_recipe, recipe_short_from_entity},
    state::AppState,
};

/// A table holding at most one row per (user, recipe) pair.
pub(crate) trait RecipeMarker: EntityTrait {
    type Active: ActiveModelTrait<Entity = Self> + Send;

    /// Message returned when the pair already exists.
    const DUPLICATE: &'static str;

    fn user_column() -> Self::Column;
    fn recipe_column() -> Self::Column;
    fn new_row(user_id: Uuid, recipe_id: Uuid) -> Self::Active;
}

impl RecipeMarker for favorites::Entity {
    type Active = favorites::ActiveModel;

    const DUPLICATE: &'static str = "Recipe is already in favorites";

    fn user_column() -> Self::Column {
        favorites::Column::UserId
    }

    fn recipe_column() -> Self::Column {
        favorites::Column::RecipeId
    }

    fn new_row(user_id: Uuid, recipe_id: Uuid) -> Self::Active {
        favorites::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: NotSet,
        }
    }
}

impl RecipeMarker for shopping_carts::Entity {
    type Active = shopping_carts::ActiveModel;

    const DUPLICATE: &'static str = "Recipe is already in the shopping cart";

    fn user_column() -> Self::Column {
        shopping_carts::Column::UserId
    }

    fn recipe_column() -> Self::Column {
        shopping_carts::Column::RecipeId
    }

    fn new_row(user_id: Uuid, recipe_id: Uuid) -> Self::Active {
        shopping_carts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            created_at: NotSet,
        }
    }
}

fn pair<E: RecipeMarker>(user_id: Uuid, recipe_id: Uuid) -> Condition {
    Condition::all()
        .add(E::user_column().eq(user_id))
        .add(E::recipe_column().eq(recipe_id))
}

/// Record the pair, returning the recipe summary.
pub(crate) async fn mark<E>(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
) -> AppResult<RecipeShort>
where
    E: RecipeMarker,
    E::Model: IntoActiveModel<E::Active>,
{
    let recipe = find_recipe(&state.orm, recipe_id).await?;

    let existing = E::find()
        .filter(pair::<E>(user.user_id, recipe_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(E::DUPLICATE.into()));
    }

    // A concurrent add can still slip past the check above; the unique
    // constraint decides and the loser gets a client error.
    E::insert(E::new_row(user.user_id, recipe_id))
        .exec_without_returning(&state.orm)
        .await
        .map_err(|err| AppError::from_unique_violation(err, E::DUPLICATE))?;

    Ok(recipe_short_from_entity(recipe))
}

/// Delete the pair; a missing recipe or a missing pair is `NotFound`.
pub(crate) async fn unmark<E: RecipeMarker>(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
) -> AppResult<()> {
    find_recipe(&state.orm, recipe_id).await?;

    let result = E::delete_many()
        .filter(pair::<E>(user.user_id, recipe_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
