mod common;

use common::{database_url, setup_state};
use foodgram_api::{
    dto::auth::{LoginRequest, RegisterRequest, SetPasswordRequest},
    error::AppError,
    middleware::auth::{AuthUser, decode_token},
    services::{auth_service, user_service},
};

fn register_request(email: &str, username: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        username: username.into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        password: "correct-horse".into(),
    }
}

// Integration flow: register, log in, change the password and log in again.
#[tokio::test]
async fn register_login_and_change_password_flow() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;

    let profile = auth_service::register_user(&state, register_request("ada@example.com", "ada"))
        .await?
        .data
        .expect("profile");
    assert_eq!(profile.username, "ada");
    assert!(!profile.is_subscribed);

    let taken = auth_service::register_user(&state, register_request("ada@example.com", "other"))
        .await
        .unwrap_err();
    assert!(matches!(taken, AppError::Conflict(_)));

    let invalid = auth_service::register_user(&state, register_request("not-an-email", "bob"))
        .await
        .unwrap_err();
    assert!(matches!(invalid, AppError::BadRequest(_)));

    let token = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "correct-horse".into(),
        },
    )
    .await?
    .data
    .expect("token")
    .auth_token;
    let user: AuthUser = decode_token(&token, &state.config.jwt_secret)?;
    assert_eq!(user.user_id, profile.id);
    assert_eq!(user.role, "user");

    let me = user_service::me(&state, &user).await?.data.expect("me");
    assert_eq!(me.email, "ada@example.com");

    let wrong = auth_service::set_password(
        &state,
        &user,
        SetPasswordRequest {
            current_password: "wrong-password".into(),
            new_password: "battery-staple".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(wrong, AppError::BadRequest(_)));

    auth_service::set_password(
        &state,
        &user,
        SetPasswordRequest {
            current_password: "correct-horse".into(),
            new_password: "battery-staple".into(),
        },
    )
    .await?;

    let stale = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "correct-horse".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(stale, AppError::BadRequest(_)));

    auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "battery-staple".into(),
        },
    )
    .await?;

    Ok(())
}
