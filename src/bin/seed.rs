use foodgram_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        Ingredients, Tags, Users, ingredients, tags,
        users::{self, ActiveModel as UserActive},
    },
    services::auth_service::hash_password,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::Deserialize;
use uuid::Uuid;

const SEED_FILE: &str = "data/ingredients.json";

#[derive(Deserialize)]
struct SeedData {
    #[serde(default)]
    tags: Vec<SeedTag>,
    ingredients: Vec<SeedIngredient>,
}

#[derive(Deserialize)]
struct SeedTag {
    name: String,
    color: String,
    slug: String,
}

#[derive(Deserialize)]
struct SeedIngredient {
    name: String,
    measurement_unit: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 1).await?;
    let orm = create_orm_conn(&pool);
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@example.com", "admin", "admin123", "admin").await?;
    let user_id = ensure_user(&orm, "user@example.com", "user", "user123", "user").await?;

    let raw = tokio::fs::read_to_string(SEED_FILE).await?;
    let data: SeedData = serde_json::from_str(&raw)?;
    let tags_added = seed_tags(&orm, &data.tags).await?;
    let ingredients_added = seed_ingredients(&orm, &data.ingredients).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, User ID: {user_id}, \
         tags added: {tags_added}, ingredients added: {ingredients_added}"
    );
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let password_hash = hash_password(password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        username: Set(username.to_string()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

async fn seed_tags(orm: &DatabaseConnection, items: &[SeedTag]) -> anyhow::Result<usize> {
    let mut added = 0;
    for item in items {
        let exists = Tags::find()
            .filter(tags::Column::Slug.eq(item.slug.as_str()))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        tags::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(item.name.clone()),
            color: Set(item.color.clone()),
            slug: Set(item.slug.clone()),
        }
        .insert(orm)
        .await?;
        added += 1;
    }
    Ok(added)
}

async fn seed_ingredients(
    orm: &DatabaseConnection,
    items: &[SeedIngredient],
) -> anyhow::Result<usize> {
    let mut added = 0;
    for item in items {
        let exists = Ingredients::find()
            .filter(
                Condition::all()
                    .add(ingredients::Column::Name.eq(item.name.as_str()))
                    .add(ingredients::Column::MeasurementUnit.eq(item.measurement_unit.as_str())),
            )
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        ingredients::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(item.name.clone()),
            measurement_unit: Set(item.measurement_unit.clone()),
        }
        .insert(orm)
        .await?;
        added += 1;
    }
    Ok(added)
}
