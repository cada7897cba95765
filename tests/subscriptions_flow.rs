mod common;

use common::{create_ingredient, create_tag, create_user, database_url, recipe_payload, setup_state};
use foodgram_api::{
    error::AppError,
    routes::params::SubscriptionQuery,
    services::{recipe_service, user_service},
};

// Integration flow: follow an author, preview their newest recipes and unfollow.
#[tokio::test]
async fn subscribe_preview_and_unsubscribe_flow() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;

    let author = create_user(&state, "chef").await?;
    let follower = create_user(&state, "fan").await?;

    let dinner = create_tag(&state, "dinner", "#8775D2").await?;
    let rice = create_ingredient(&state, "rice", "g").await?;
    for name in ["Risotto", "Pilaf", "Paella"] {
        recipe_service::create_recipe(
            &state,
            &author,
            recipe_payload(name, vec![dinner], vec![(rice, 150)]),
        )
        .await?;
    }

    let own = user_service::subscribe(&state, &author, author.user_id, None)
        .await
        .unwrap_err();
    assert!(matches!(own, AppError::BadRequest(_)));

    let subscription = user_service::subscribe(&state, &follower, author.user_id, Some(2))
        .await?
        .data
        .expect("subscription");
    assert!(subscription.is_subscribed);
    assert_eq!(subscription.recipes_count, 3);
    assert_eq!(subscription.recipes.len(), 2);
    assert_eq!(subscription.recipes[0].name, "Paella");

    let duplicate = user_service::subscribe(&state, &follower, author.user_id, None)
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    let profile = user_service::get_user(&state, Some(follower.user_id), author.user_id)
        .await?
        .data
        .expect("profile");
    assert!(profile.is_subscribed);
    let anonymous = user_service::get_user(&state, None, author.user_id)
        .await?
        .data
        .expect("profile");
    assert!(!anonymous.is_subscribed);

    let listed = user_service::list_subscriptions(
        &state,
        &follower,
        SubscriptionQuery {
            recipes_limit: Some(1),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.meta.as_ref().and_then(|m| m.total), Some(1));
    let items = listed.data.expect("subscriptions").items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, author.user_id);
    assert_eq!(items[0].recipes.len(), 1);
    assert_eq!(items[0].recipes_count, 3);

    let negative = user_service::list_subscriptions(
        &state,
        &follower,
        SubscriptionQuery {
            recipes_limit: Some(-1),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(negative, AppError::BadRequest(_)));

    user_service::unsubscribe(&state, &follower, author.user_id).await?;
    let missing = user_service::unsubscribe(&state, &follower, author.user_id)
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound));

    let empty = user_service::list_subscriptions(&state, &follower, SubscriptionQuery::default())
        .await?
        .data
        .expect("subscriptions")
        .items;
    assert!(empty.is_empty());

    Ok(())
}
