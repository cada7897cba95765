use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::{DbPool, OrmConn},
    dto::recipes::{RecipeList, RecipeWriteRequest},
    entity::{
        IngredientRecipes, RecipeTags, Recipes, ingredient_recipes, recipe_tags,
        recipes::{ActiveModel as RecipeActive, Model as RecipeModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Recipe, RecipeIngredient, RecipeShort, Tag, UserProfile},
    response::{ApiResponse, Meta},
    routes::params::RecipeQuery,
    services::annotations::ViewerFlag,
    state::AppState,
    validation::validate_recipe_write,
};

/// Restrictions applied to the annotated recipe query.
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub recipe_id: Option<Uuid>,
    pub author: Option<Uuid>,
    pub tag_slugs: Vec<String>,
    pub favorited_only: bool,
    pub in_shopping_cart_only: bool,
}

impl From<&RecipeQuery> for RecipeFilter {
    fn from(query: &RecipeQuery) -> Self {
        Self {
            recipe_id: None,
            author: query.author,
            tag_slugs: query.tag_slugs(),
            favorited_only: query.favorited_only(),
            in_shopping_cart_only: query.in_shopping_cart_only(),
        }
    }
}

#[derive(FromRow)]
struct RecipeRow {
    id: Uuid,
    name: String,
    image: String,
    text: String,
    cooking_time: i32,
    pub_date: DateTime<Utc>,
    author_id: Uuid,
    author_email: String,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    author_is_subscribed: bool,
    is_favorited: bool,
    is_in_shopping_cart: bool,
}

#[derive(FromRow)]
struct RecipeTagRow {
    recipe_id: Uuid,
    #[sqlx(flatten)]
    tag: Tag,
}

#[derive(FromRow)]
struct RecipeIngredientRow {
    recipe_id: Uuid,
    id: Uuid,
    name: String,
    measurement_unit: String,
    amount: i32,
}

const RECIPE_FROM: &str = " FROM recipes r JOIN users u ON u.id = r.author_id WHERE TRUE";

fn push_recipe_select(builder: &mut QueryBuilder<'_, Postgres>, viewer: Option<Uuid>) {
    builder.push(
        "SELECT r.id, r.name, r.image, r.text, r.cooking_time, r.pub_date, \
         u.id AS author_id, u.email AS author_email, u.username AS author_username, \
         u.first_name AS author_first_name, u.last_name AS author_last_name, ",
    );
    ViewerFlag::Subscribed.push_select(builder, viewer, "author_is_subscribed");
    builder.push(", ");
    ViewerFlag::Favorited.push_select(builder, viewer, "is_favorited");
    builder.push(", ");
    ViewerFlag::InShoppingCart.push_select(builder, viewer, "is_in_shopping_cart");
    builder.push(RECIPE_FROM);
}

fn push_recipe_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    viewer: Option<Uuid>,
    filter: &RecipeFilter,
) {
    if let Some(recipe_id) = filter.recipe_id {
        builder.push(" AND r.id = ").push_bind(recipe_id);
    }
    if let Some(author) = filter.author {
        builder.push(" AND r.author_id = ").push_bind(author);
    }
    if !filter.tag_slugs.is_empty() {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug = ANY(",
            )
            .push_bind(filter.tag_slugs.clone())
            .push("))");
    }
    if filter.favorited_only {
        ViewerFlag::Favorited.push_filter(builder, viewer);
    }
    if filter.in_shopping_cart_only {
        ViewerFlag::InShoppingCart.push_filter(builder, viewer);
    }
}

pub async fn count_recipes(
    pool: &DbPool,
    viewer: Option<Uuid>,
    filter: &RecipeFilter,
) -> AppResult<i64> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
    builder.push(RECIPE_FROM);
    push_recipe_filters(&mut builder, viewer, filter);
    let total = builder.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(total)
}

/// Load one page of annotated recipes with their tags and ingredients.
///
/// Issues a fixed number of queries: the page itself, then one batched
/// query each for tags and ingredients of every recipe on the page.
pub async fn fetch_recipes(
    pool: &DbPool,
    viewer: Option<Uuid>,
    filter: &RecipeFilter,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Recipe>> {
    let mut builder = QueryBuilder::<Postgres>::new("");
    push_recipe_select(&mut builder, viewer);
    push_recipe_filters(&mut builder, viewer, filter);
    builder
        .push(" ORDER BY r.pub_date DESC, r.id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = builder
        .build_query_as::<RecipeRow>()
        .fetch_all(pool)
        .await?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    let tag_rows = sqlx::query_as::<_, RecipeTagRow>(
        r#"
        SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
        FROM recipe_tags rt
        JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = ANY($1)
        ORDER BY t.name
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await?;
    for row in tag_rows {
        tags_by_recipe.entry(row.recipe_id).or_default().push(row.tag);
    }

    let mut ingredients_by_recipe: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    let ingredient_rows = sqlx::query_as::<_, RecipeIngredientRow>(
        r#"
        SELECT ir.recipe_id, i.id, i.name, i.measurement_unit, ir.amount
        FROM ingredient_recipes ir
        JOIN ingredients i ON i.id = ir.ingredient_id
        WHERE ir.recipe_id = ANY($1)
        ORDER BY i.name
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await?;
    for row in ingredient_rows {
        ingredients_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(RecipeIngredient {
                id: row.id,
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            });
    }

    let recipes = rows
        .into_iter()
        .map(|row| Recipe {
            id: row.id,
            tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
            author: UserProfile {
                id: row.author_id,
                email: row.author_email,
                username: row.author_username,
                first_name: row.author_first_name,
                last_name: row.author_last_name,
                is_subscribed: row.author_is_subscribed,
            },
            ingredients: ingredients_by_recipe.remove(&row.id).unwrap_or_default(),
            is_favorited: row.is_favorited,
            is_in_shopping_cart: row.is_in_shopping_cart,
            name: row.name,
            image: row.image,
            text: row.text,
            cooking_time: row.cooking_time,
            pub_date: row.pub_date,
        })
        .collect();

    Ok(recipes)
}

async fn load_recipe(pool: &DbPool, viewer: Option<Uuid>, id: Uuid) -> AppResult<Recipe> {
    let filter = RecipeFilter {
        recipe_id: Some(id),
        ..Default::default()
    };
    fetch_recipes(pool, viewer, &filter, 1, 0)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)
}

pub async fn list_recipes(
    state: &AppState,
    viewer: Option<Uuid>,
    query: RecipeQuery,
) -> AppResult<ApiResponse<RecipeList>> {
    let (page, limit, offset) = query.pagination().normalize(state.config.page_size);
    let filter = RecipeFilter::from(&query);

    let total = count_recipes(&state.pool, viewer, &filter).await?;
    let items = fetch_recipes(&state.pool, viewer, &filter, limit, offset).await?;

    Ok(ApiResponse::paginated(
        "Recipes",
        RecipeList { items },
        page,
        limit,
        total,
    ))
}

pub async fn get_recipe(
    state: &AppState,
    viewer: Option<Uuid>,
    id: Uuid,
) -> AppResult<ApiResponse<Recipe>> {
    let recipe = load_recipe(&state.pool, viewer, id).await?;
    Ok(ApiResponse::success("Recipe", recipe, None))
}

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<Recipe>> {
    // Existence checks share the transaction with the writes they guard.
    let txn = state.orm.begin().await?;
    validate_recipe_write(&txn, &payload).await?;

    let recipe = RecipeActive {
        id: Set(Uuid::new_v4()),
        author_id: Set(user.user_id),
        name: Set(payload.name.clone()),
        image: Set(payload.image.clone()),
        text: Set(payload.text.clone()),
        cooking_time: Set(payload.cooking_time),
        pub_date: NotSet,
    }
    .insert(&txn)
    .await?;

    replace_relations(&txn, recipe.id, &payload).await?;

    txn.commit().await?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.user_id, "recipe created");

    let recipe = load_recipe(&state.pool, Some(user.user_id), recipe.id).await?;
    Ok(ApiResponse::success(
        "Recipe created",
        recipe,
        Some(Meta::empty()),
    ))
}

pub async fn update_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<Recipe>> {
    let existing = find_recipe(&state.orm, id).await?;
    ensure_author(user, &existing)?;

    let txn = state.orm.begin().await?;
    validate_recipe_write(&txn, &payload).await?;

    let mut active: RecipeActive = existing.into();
    active.name = Set(payload.name.clone());
    active.image = Set(payload.image.clone());
    active.text = Set(payload.text.clone());
    active.cooking_time = Set(payload.cooking_time);
    let recipe = active.update(&txn).await?;

    replace_relations(&txn, recipe.id, &payload).await?;

    txn.commit().await?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.user_id, "recipe updated");

    let recipe = load_recipe(&state.pool, Some(user.user_id), recipe.id).await?;
    Ok(ApiResponse::success("Updated", recipe, Some(Meta::empty())))
}

pub async fn delete_recipe(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    let existing = find_recipe(&state.orm, id).await?;
    ensure_author(user, &existing)?;

    let result = Recipes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(recipe_id = %id, author_id = %user.user_id, "recipe deleted");
    Ok(())
}

const MISSING_REFERENCE: &str = "Tag or ingredient no longer exists";

/// Swap the tag and ingredient sets of a recipe for the ones in `payload`.
///
/// A tag or ingredient deleted after validation surfaces as a foreign-key
/// violation and is reported as a client error; the caller's transaction
/// then rolls back on drop.
async fn replace_relations<C>(conn: &C, recipe_id: Uuid, payload: &RecipeWriteRequest) -> AppResult<()>
where
    C: ConnectionTrait,
{
    RecipeTags::delete_many()
        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    RecipeTags::insert_many(payload.tags.iter().map(|tag_id| recipe_tags::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
    }))
    .exec_without_returning(conn)
    .await
    .map_err(|err| AppError::from_reference_violation(err, MISSING_REFERENCE))?;

    IngredientRecipes::delete_many()
        .filter(ingredient_recipes::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    IngredientRecipes::insert_many(payload.ingredients.iter().map(|item| {
        ingredient_recipes::ActiveModel {
            id: Set(Uuid::new_v4()),
            ingredient_id: Set(item.id),
            recipe_id: Set(recipe_id),
            amount: Set(item.amount),
        }
    }))
    .exec_without_returning(conn)
    .await
    .map_err(|err| AppError::from_reference_violation(err, MISSING_REFERENCE))?;

    Ok(())
}

pub(crate) async fn find_recipe(orm: &OrmConn, id: Uuid) -> AppResult<RecipeModel> {
    Recipes::find_by_id(id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound)
}

fn ensure_author(user: &AuthUser, recipe: &RecipeModel) -> AppResult<()> {
    if recipe.author_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub(crate) fn recipe_short_from_entity(model: RecipeModel) -> RecipeShort {
    RecipeShort {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}
