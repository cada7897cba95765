use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::users::{SubscriptionList, UserList},
    entity::{
        Users,
        follows::{ActiveModel as FollowActive, Column as FollowCol, Entity as Follows},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{RecipeShort, Subscription, UserProfile},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, SubscriptionQuery},
    services::annotations::ViewerFlag,
    state::AppState,
};

const ALREADY_SUBSCRIBED: &str = "You are already subscribed to this author";

#[derive(FromRow)]
struct SubscriptionRow {
    id: Uuid,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    recipes_count: i64,
}

#[derive(FromRow)]
struct AuthorRecipeRow {
    author_id: Uuid,
    #[sqlx(flatten)]
    recipe: RecipeShort,
}

fn push_profile_select(builder: &mut QueryBuilder<'_, Postgres>, viewer: Option<Uuid>) {
    builder.push("SELECT u.id, u.email, u.username, u.first_name, u.last_name, ");
    ViewerFlag::Subscribed.push_select(builder, viewer, "is_subscribed");
    builder.push(" FROM users u");
}

pub async fn list_users(
    state: &AppState,
    viewer: Option<Uuid>,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize(state.config.page_size);

    let mut builder = QueryBuilder::<Postgres>::new("");
    push_profile_select(&mut builder, viewer);
    builder
        .push(" ORDER BY u.username LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let items = builder
        .build_query_as::<UserProfile>()
        .fetch_all(&state.pool)
        .await?;

    let total = Users::find().count(&state.orm).await? as i64;

    Ok(ApiResponse::paginated(
        "Users",
        UserList { items },
        page,
        limit,
        total,
    ))
}

pub async fn get_user(
    state: &AppState,
    viewer: Option<Uuid>,
    id: Uuid,
) -> AppResult<ApiResponse<UserProfile>> {
    let mut builder = QueryBuilder::<Postgres>::new("");
    push_profile_select(&mut builder, viewer);
    builder.push(" WHERE u.id = ").push_bind(id);
    let user = builder
        .build_query_as::<UserProfile>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("User", user, None))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    get_user(state, Some(user.user_id), user.user_id).await
}

pub async fn subscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: Uuid,
    recipes_limit: Option<i64>,
) -> AppResult<ApiResponse<Subscription>> {
    Users::find_by_id(author_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if user.user_id == author_id {
        return Err(AppError::BadRequest(
            "You cannot subscribe to yourself".into(),
        ));
    }

    let existing = Follows::find()
        .filter(
            Condition::all()
                .add(FollowCol::UserId.eq(user.user_id))
                .add(FollowCol::AuthorId.eq(author_id)),
        )
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(ALREADY_SUBSCRIBED.into()));
    }

    FollowActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        author_id: Set(author_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| AppError::from_unique_violation(err, ALREADY_SUBSCRIBED))?;

    tracing::info!(user_id = %user.user_id, %author_id, "subscribed");

    let row = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        SELECT u.id, u.email, u.username, u.first_name, u.last_name,
               (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count
        FROM users u
        WHERE u.id = $1
        "#,
    )
    .bind(author_id)
    .fetch_one(&state.pool)
    .await?;

    let subscription = with_recipes(&state.pool, vec![row], recipes_limit)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Subscribed",
        subscription,
        Some(Meta::empty()),
    ))
}

pub async fn unsubscribe(state: &AppState, user: &AuthUser, author_id: Uuid) -> AppResult<()> {
    Users::find_by_id(author_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let result = Follows::delete_many()
        .filter(
            Condition::all()
                .add(FollowCol::UserId.eq(user.user_id))
                .add(FollowCol::AuthorId.eq(author_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = %user.user_id, %author_id, "unsubscribed");
    Ok(())
}

pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    query: SubscriptionQuery,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let recipes_limit = query.recipes_limit().checked()?;
    let (page, limit, offset) = query.pagination().normalize(state.config.page_size);

    let rows = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        SELECT u.id, u.email, u.username, u.first_name, u.last_name,
               (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count
        FROM follows f
        JOIN users u ON u.id = f.author_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC, u.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total = Follows::find()
        .filter(FollowCol::UserId.eq(user.user_id))
        .count(&state.orm)
        .await? as i64;

    let items = with_recipes(&state.pool, rows, recipes_limit).await?;

    Ok(ApiResponse::paginated(
        "Subscriptions",
        SubscriptionList { items },
        page,
        limit,
        total,
    ))
}

/// Attach up to `recipes_limit` newest recipes to each followed author in one query.
async fn with_recipes(
    pool: &DbPool,
    rows: Vec<SubscriptionRow>,
    recipes_limit: Option<i64>,
) -> AppResult<Vec<Subscription>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let author_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let recipe_rows = sqlx::query_as::<_, AuthorRecipeRow>(
        r#"
        SELECT author_id, id, name, image, cooking_time
        FROM (
            SELECT r.author_id, r.id, r.name, r.image, r.cooking_time,
                   ROW_NUMBER() OVER (PARTITION BY r.author_id ORDER BY r.pub_date DESC, r.id) AS rn
            FROM recipes r
            WHERE r.author_id = ANY($1)
        ) ranked
        WHERE $2::BIGINT IS NULL OR rn <= $2
        ORDER BY author_id, rn
        "#,
    )
    .bind(&author_ids[..])
    .bind(recipes_limit)
    .fetch_all(pool)
    .await?;

    let mut recipes_by_author: HashMap<Uuid, Vec<RecipeShort>> = HashMap::new();
    for row in recipe_rows {
        recipes_by_author
            .entry(row.author_id)
            .or_default()
            .push(row.recipe);
    }

    Ok(rows
        .into_iter()
        .map(|row| Subscription {
            recipes: recipes_by_author.remove(&row.id).unwrap_or_default(),
            id: row.id,
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            is_subscribed: true,
            recipes_count: row.recipes_count,
        })
        .collect())
}
