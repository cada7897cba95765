pub mod annotations;
pub mod auth_service;
pub mod catalog_service;
pub mod favorite_service;
pub(crate) mod recipe_marker;
pub mod recipe_service;
pub mod shopping_cart_service;
pub mod user_service;
