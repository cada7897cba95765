use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::catalog::{CreateIngredientRequest, CreateTagRequest, IngredientList, TagList},
    entity::{
        ingredients::{self, Entity as Ingredients, Model as IngredientModel},
        tags::{self, Entity as Tags, Model as TagModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Ingredient, Tag},
    response::{ApiResponse, Meta},
    routes::params::IngredientQuery,
    state::AppState,
};

pub async fn list_tags(state: &AppState) -> AppResult<ApiResponse<TagList>> {
    let items = Tags::find()
        .order_by_asc(tags::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(tag_from_entity)
        .collect();
    Ok(ApiResponse::success("Tags", TagList { items }, None))
}

pub async fn get_tag(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Tag>> {
    let tag = Tags::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(tag_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Tag", tag, None))
}

pub async fn create_tag(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTagRequest,
) -> AppResult<ApiResponse<Tag>> {
    ensure_admin(user)?;
    payload.validate()?;

    let tag = tags::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        color: Set(payload.color),
        slug: Set(payload.slug),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| {
        AppError::from_unique_violation(err, "Tag with this name, color or slug already exists")
    })?;

    tracing::info!(tag_id = %tag.id, slug = %tag.slug, "tag created");
    Ok(ApiResponse::success(
        "Tag created",
        tag_from_entity(tag),
        Some(Meta::empty()),
    ))
}

/// Escape LIKE wildcards so the user's text is matched literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub async fn list_ingredients(
    state: &AppState,
    query: IngredientQuery,
) -> AppResult<ApiResponse<IngredientList>> {
    let mut finder = Ingredients::find();
    if let Some(prefix) = query.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        finder = finder.filter(Expr::col(ingredients::Column::Name).ilike(like_prefix(prefix)));
    }

    let items = finder
        .order_by_asc(ingredients::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ingredient_from_entity)
        .collect();
    Ok(ApiResponse::success(
        "Ingredients",
        IngredientList { items },
        None,
    ))
}

pub async fn get_ingredient(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Ingredient>> {
    let ingredient = Ingredients::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(ingredient_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ingredient", ingredient, None))
}

pub async fn create_ingredient(
    state: &AppState,
    user: &AuthUser,
    payload: CreateIngredientRequest,
) -> AppResult<ApiResponse<Ingredient>> {
    ensure_admin(user)?;
    payload.validate()?;

    let ingredient = ingredients::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        measurement_unit: Set(payload.measurement_unit),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| {
        AppError::from_unique_violation(err, "Ingredient with this unit already exists")
    })?;

    tracing::info!(ingredient_id = %ingredient.id, "ingredient created");
    Ok(ApiResponse::success(
        "Ingredient created",
        ingredient_from_entity(ingredient),
        Some(Meta::empty()),
    ))
}

fn tag_from_entity(model: TagModel) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

fn ingredient_from_entity(model: IngredientModel) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

#[cfg(test)]
mod tests {
    use super::like_prefix;

    #[test]
    fn prefix_pattern_escapes_wildcards() {
        assert_eq!(like_prefix("tom"), "tom%");
        assert_eq!(like_prefix("50%_off"), "50\\%\\_off%");
    }
}
