mod common;

use common::{create_ingredient, create_tag, create_user, database_url, recipe_payload, setup_state};
use foodgram_api::{
    error::{AppError, AppResult},
    services::{favorite_service, recipe_service, shopping_cart_service, user_service},
};

fn one_winner<A, B>(first: AppResult<A>, second: AppResult<B>, what: &str) {
    let outcomes = [first.map(|_| ()), second.map(|_| ())];
    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|o| matches!(o, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(
        (successes, conflicts),
        (1, 1),
        "{what}: expected one success and one conflict, got {outcomes:?}"
    );
}

// Integration flow: the same pair is added twice at once; the unique
// constraints let exactly one write through and the other is a client error.
#[tokio::test]
async fn concurrent_duplicate_adds_yield_one_conflict_flow() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;

    let author = create_user(&state, "racer_author").await?;
    let fan = create_user(&state, "racer_fan").await?;

    let lunch = create_tag(&state, "lunch", "#49B64E").await?;
    let egg = create_ingredient(&state, "egg", "pcs").await?;
    let recipe = recipe_service::create_recipe(
        &state,
        &author,
        recipe_payload("Boiled egg", vec![lunch], vec![(egg, 2)]),
    )
    .await?
    .data
    .expect("recipe");

    for _ in 0..5 {
        let (first, second) = tokio::join!(
            favorite_service::add_favorite(&state, &fan, recipe.id),
            favorite_service::add_favorite(&state, &fan, recipe.id),
        );
        one_winner(first, second, "favorite");
        favorite_service::remove_favorite(&state, &fan, recipe.id).await?;

        let (first, second) = tokio::join!(
            shopping_cart_service::add_to_shopping_cart(&state, &fan, recipe.id),
            shopping_cart_service::add_to_shopping_cart(&state, &fan, recipe.id),
        );
        one_winner(first, second, "shopping cart");
        shopping_cart_service::remove_from_shopping_cart(&state, &fan, recipe.id).await?;

        let (first, second) = tokio::join!(
            user_service::subscribe(&state, &fan, author.user_id, None),
            user_service::subscribe(&state, &fan, author.user_id, None),
        );
        one_winner(first, second, "subscription");
        user_service::unsubscribe(&state, &fan, author.user_id).await?;
    }

    Ok(())
}
