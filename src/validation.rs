//! Business-rule checks for nested recipe writes.
//!
//! Rules run in a fixed order and the first failure is reported:
//! cooking time, then tags, then ingredients, then field shape.
//! Nothing here mutates the store.

use std::collections::HashSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::recipes::{IngredientAmount, RecipeWriteRequest},
    entity::{Ingredients, Tags, ingredients, tags},
    error::{AppError, AppResult},
};

pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 180;
pub const MIN_AMOUNT: i32 = 1;

pub fn check_cooking_time(cooking_time: i32) -> AppResult<()> {
    if cooking_time < MIN_COOKING_TIME {
        return Err(AppError::BadRequest(
            "Cooking time must be at least 1 minute".into(),
        ));
    }
    if cooking_time > MAX_COOKING_TIME {
        return Err(AppError::BadRequest(
            "Cooking time must not exceed 180 minutes".into(),
        ));
    }
    Ok(())
}

pub fn check_tag_ids(tag_ids: &[Uuid]) -> AppResult<()> {
    if tag_ids.is_empty() {
        return Err(AppError::BadRequest("At least one tag is required".into()));
    }
    if has_duplicates(tag_ids.iter()) {
        return Err(AppError::BadRequest("Tags must not repeat".into()));
    }
    Ok(())
}

pub fn check_ingredient_amounts(items: &[IngredientAmount]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::BadRequest(
            "At least one ingredient is required".into(),
        ));
    }
    if has_duplicates(items.iter().map(|item| &item.id)) {
        return Err(AppError::BadRequest("Ingredients must not repeat".into()));
    }
    if items.iter().any(|item| item.amount < MIN_AMOUNT) {
        return Err(AppError::BadRequest(
            "Ingredient amount must be at least 1".into(),
        ));
    }
    Ok(())
}

fn has_duplicates<'a>(ids: impl Iterator<Item = &'a Uuid>) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().any(|id| !seen.insert(*id))
}

/// Full ordered validation of a recipe payload, including existence of referenced rows.
pub async fn validate_recipe_write<C>(conn: &C, payload: &RecipeWriteRequest) -> AppResult<()>
where
    C: ConnectionTrait,
{
    check_cooking_time(payload.cooking_time)?;

    check_tag_ids(&payload.tags)?;
    let known_tags = Tags::find()
        .filter(tags::Column::Id.is_in(payload.tags.iter().copied()))
        .count(conn)
        .await?;
    if known_tags as usize != payload.tags.len() {
        return Err(AppError::BadRequest("Tag does not exist".into()));
    }

    check_ingredient_amounts(&payload.ingredients)?;
    let known_ingredients = Ingredients::find()
        .filter(ingredients::Column::Id.is_in(payload.ingredients.iter().map(|i| i.id)))
        .count(conn)
        .await?;
    if known_ingredients as usize != payload.ingredients.len() {
        return Err(AppError::BadRequest("Ingredient does not exist".into()));
    }

    payload.validate()?;
    Ok(())
}
