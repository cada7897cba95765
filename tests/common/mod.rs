#![allow(dead_code)]

use foodgram_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::recipes::{IngredientAmount, RecipeWriteRequest},
    entity::{
        ingredients::ActiveModel as IngredientActive, tags::ActiveModel as TagActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

/// Returns `None` when no database is configured so flow tests can skip.
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            None
        }
    }
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        page_size: 6,
        body_limit_bytes: 5 * 1024 * 1024,
        max_connections: 5,
    };
    let pool = create_pool(database_url, config.max_connections).await?;
    let state = AppState::new(pool, config);
    run_migrations(&state.orm).await?;

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE favorites, shopping_carts, ingredient_recipes, recipe_tags, \
             recipes, follows, ingredients, tags, users CASCADE",
        ))
        .await?;

    Ok(state)
}

pub async fn create_user(state: &AppState, username: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{username}@example.com")),
        username: Set(username.to_string()),
        first_name: Set("Test".into()),
        last_name: Set("User".into()),
        password_hash: Set("dummy".into()),
        role: Set("user".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn create_tag(state: &AppState, slug: &str, color: &str) -> anyhow::Result<Uuid> {
    let tag = TagActive {
        id: Set(Uuid::new_v4()),
        name: Set(slug.to_uppercase()),
        color: Set(color.to_string()),
        slug: Set(slug.to_string()),
    }
    .insert(&state.orm)
    .await?;
    Ok(tag.id)
}

pub async fn create_ingredient(state: &AppState, name: &str, unit: &str) -> anyhow::Result<Uuid> {
    let ingredient = IngredientActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        measurement_unit: Set(unit.to_string()),
    }
    .insert(&state.orm)
    .await?;
    Ok(ingredient.id)
}

pub fn recipe_payload(
    name: &str,
    tags: Vec<Uuid>,
    ingredients: Vec<(Uuid, i32)>,
) -> RecipeWriteRequest {
    RecipeWriteRequest {
        name: name.to_string(),
        text: format!("How to cook {name}"),
        cooking_time: 30,
        image: "data:image/png;base64,iVBORw0KGgo=".into(),
        tags,
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}
