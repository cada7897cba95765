use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, SetPasswordRequest},
        catalog::{CreateIngredientRequest, CreateTagRequest, IngredientList, TagList},
        recipes::{IngredientAmount, RecipeList, RecipeWriteRequest},
        users::{SubscriptionList, UserList},
    },
    models::{Ingredient, Recipe, RecipeIngredient, RecipeShort, Subscription, Tag, UserProfile},
    response::{ApiResponse, Meta},
    routes::{
        auth, favorites, health, ingredients, params, recipes, shopping_cart, tags, users,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness_check,
        auth::login,
        users::register,
        users::list_users,
        users::me,
        users::get_user,
        users::set_password,
        users::list_subscriptions,
        users::subscribe,
        users::unsubscribe,
        tags::list_tags,
        tags::get_tag,
        tags::create_tag,
        ingredients::list_ingredients,
        ingredients::get_ingredient,
        ingredients::create_ingredient,
        recipes::list_recipes,
        recipes::get_recipe,
        recipes::create_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        favorites::add_favorite,
        favorites::remove_favorite,
        shopping_cart::add_to_shopping_cart,
        shopping_cart::remove_from_shopping_cart,
        shopping_cart::download_shopping_cart
    ),
    components(
        schemas(
            UserProfile,
            Tag,
            Ingredient,
            Recipe,
            RecipeIngredient,
            RecipeShort,
            Subscription,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            SetPasswordRequest,
            CreateTagRequest,
            CreateIngredientRequest,
            IngredientAmount,
            RecipeWriteRequest,
            RecipeList,
            TagList,
            IngredientList,
            UserList,
            SubscriptionList,
            params::Pagination,
            params::RecipeQuery,
            params::IngredientQuery,
            params::SubscriptionQuery,
            Meta,
            ApiResponse<Recipe>,
            ApiResponse<RecipeList>,
            ApiResponse<RecipeShort>,
            ApiResponse<UserProfile>,
            ApiResponse<UserList>,
            ApiResponse<Subscription>,
            ApiResponse<SubscriptionList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Token endpoints"),
        (name = "Users", description = "Accounts and subscriptions"),
        (name = "Tags", description = "Recipe tags"),
        (name = "Ingredients", description = "Ingredient catalog"),
        (name = "Recipes", description = "Recipe endpoints"),
        (name = "Favorites", description = "Favorite recipes"),
        (name = "Shopping cart", description = "Shopping cart and shopping list export"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
