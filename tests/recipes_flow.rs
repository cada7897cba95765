mod common;

use common::{create_ingredient, create_tag, create_user, database_url, recipe_payload, setup_state};
use foodgram_api::{
    entity::{IngredientRecipes, RecipeTags, ingredient_recipes, recipe_tags},
    error::AppError,
    routes::params::RecipeQuery,
    services::{favorite_service, recipe_service},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

// Integration flow: author publishes recipes, another user favorites one,
// listings annotate per viewer and a non-author cannot touch the recipe.
#[tokio::test]
async fn publish_favorite_and_filter_recipes_flow() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;

    let author = create_user(&state, "author").await?;
    let reader = create_user(&state, "reader").await?;

    let breakfast = create_tag(&state, "breakfast", "#E26C2D").await?;
    let dinner = create_tag(&state, "dinner", "#8775D2").await?;
    let egg = create_ingredient(&state, "egg", "pcs").await?;
    let milk = create_ingredient(&state, "milk", "ml").await?;

    let omelette = recipe_service::create_recipe(
        &state,
        &author,
        recipe_payload("Omelette", vec![breakfast], vec![(egg, 3), (milk, 50)]),
    )
    .await?
    .data
    .expect("created recipe");
    assert_eq!(omelette.author.id, author.user_id);
    assert_eq!(omelette.tags.len(), 1);
    assert_eq!(omelette.ingredients.len(), 2);
    assert!(!omelette.is_favorited);

    let stew = recipe_service::create_recipe(
        &state,
        &author,
        recipe_payload("Stew", vec![dinner], vec![(milk, 200)]),
    )
    .await?
    .data
    .expect("created recipe");

    // Anonymous listing: newest first, every flag false.
    let anonymous = recipe_service::list_recipes(&state, None, RecipeQuery::default()).await?;
    assert_eq!(anonymous.meta.as_ref().and_then(|m| m.total), Some(2));
    let items = anonymous.data.expect("recipes").items;
    assert_eq!(items[0].id, stew.id);
    assert!(items.iter().all(|r| !r.is_favorited && !r.is_in_shopping_cart));
    assert!(items.iter().all(|r| !r.author.is_subscribed));

    // Favorite once, then the duplicate is rejected.
    favorite_service::add_favorite(&state, &reader, omelette.id).await?;
    let duplicate = favorite_service::add_favorite(&state, &reader, omelette.id)
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    let seen = recipe_service::get_recipe(&state, Some(reader.user_id), omelette.id)
        .await?
        .data
        .expect("recipe");
    assert!(seen.is_favorited);
    let seen_by_author = recipe_service::get_recipe(&state, Some(author.user_id), omelette.id)
        .await?
        .data
        .expect("recipe");
    assert!(!seen_by_author.is_favorited);

    // Favorited filter for the reader; ignored for anonymous callers.
    let favorited = recipe_service::list_recipes(
        &state,
        Some(reader.user_id),
        RecipeQuery {
            is_favorited: Some("1".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("recipes")
    .items;
    assert_eq!(favorited.len(), 1);
    assert_eq!(favorited[0].id, omelette.id);

    let anonymous_favorited = recipe_service::list_recipes(
        &state,
        None,
        RecipeQuery {
            is_favorited: Some("1".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("recipes")
    .items;
    assert_eq!(anonymous_favorited.len(), 2);

    // Tag filter matches any of the listed slugs.
    let by_tag = recipe_service::list_recipes(
        &state,
        None,
        RecipeQuery {
            tags: Some("dinner".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("recipes")
    .items;
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id, stew.id);

    let by_any_tag = recipe_service::list_recipes(
        &state,
        None,
        RecipeQuery {
            tags: Some("dinner,breakfast".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("recipes")
    .items;
    assert_eq!(by_any_tag.len(), 2);

    // Removing a favorite twice reports the missing relation.
    favorite_service::remove_favorite(&state, &reader, omelette.id).await?;
    let missing = favorite_service::remove_favorite(&state, &reader, omelette.id)
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound));

    let unknown = favorite_service::add_favorite(&state, &reader, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(unknown, AppError::NotFound));

    // Only the author may change or delete the recipe.
    let forbidden = recipe_service::update_recipe(
        &state,
        &reader,
        omelette.id,
        recipe_payload("Hijacked", vec![breakfast], vec![(egg, 1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(forbidden, AppError::Forbidden));
    let forbidden = recipe_service::delete_recipe(&state, &reader, omelette.id)
        .await
        .unwrap_err();
    assert!(matches!(forbidden, AppError::Forbidden));

    // An update rejected inside its transaction leaves the recipe untouched.
    let rejected = recipe_service::update_recipe(
        &state,
        &author,
        omelette.id,
        recipe_payload("Renamed omelette", vec![dinner], vec![(Uuid::new_v4(), 1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(rejected, AppError::BadRequest(_)));
    let unchanged = recipe_service::get_recipe(&state, None, omelette.id)
        .await?
        .data
        .expect("recipe");
    assert_eq!(unchanged.name, "Omelette");
    assert_eq!(unchanged.tags, omelette.tags);
    assert_eq!(unchanged.ingredients, omelette.ingredients);

    // A reference that vanished mid-write is a client error, and the partial
    // relation rewrite rolls back with the transaction.
    {
        let txn = state.orm.begin().await?;
        RecipeTags::delete_many()
            .filter(recipe_tags::Column::RecipeId.eq(omelette.id))
            .exec(&txn)
            .await?;
        let dangling = IngredientRecipes::insert(ingredient_recipes::ActiveModel {
            id: Set(Uuid::new_v4()),
            ingredient_id: Set(Uuid::new_v4()),
            recipe_id: Set(omelette.id),
            amount: Set(1),
        })
        .exec_without_returning(&txn)
        .await
        .map_err(|err| AppError::from_reference_violation(err, "gone"))
        .unwrap_err();
        assert!(matches!(dangling, AppError::BadRequest(_)));
        txn.rollback().await?;
    }
    let still_tagged = recipe_service::get_recipe(&state, None, omelette.id)
        .await?
        .data
        .expect("recipe");
    assert_eq!(still_tagged.tags, omelette.tags);

    // A valid update replaces the whole tag and ingredient sets.
    let updated = recipe_service::update_recipe(
        &state,
        &author,
        omelette.id,
        recipe_payload("Big omelette", vec![breakfast, dinner], vec![(egg, 6)]),
    )
    .await?
    .data
    .expect("updated recipe");
    assert_eq!(updated.name, "Big omelette");
    assert_eq!(updated.tags.len(), 2);
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].amount, 6);

    recipe_service::delete_recipe(&state, &author, omelette.id).await?;
    let gone = recipe_service::get_recipe(&state, None, omelette.id)
        .await
        .unwrap_err();
    assert!(matches!(gone, AppError::NotFound));

    Ok(())
}
