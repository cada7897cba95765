use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Highest page number honoured; larger values are clamped so the offset stays in range.
pub const MAX_PAGE: i64 = i32::MAX as i64;

/// Page-number pagination; `limit` is the page size.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.limit.unwrap_or(default_per_page).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RecipeQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub author: Option<Uuid>,
    /// Comma separated tag slugs; a recipe matches when it carries any of them.
    pub tags: Option<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

impl RecipeQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn tag_slugs(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn favorited_only(&self) -> bool {
        parse_flag(self.is_favorited.as_deref())
    }

    pub fn in_shopping_cart_only(&self) -> bool {
        parse_flag(self.is_in_shopping_cart.as_deref())
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true")
    )
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<i64>,
}

impl RecipesLimitQuery {
    pub fn checked(&self) -> AppResult<Option<i64>> {
        match self.recipes_limit {
            Some(limit) if limit < 0 => Err(AppError::BadRequest(
                "recipes_limit must not be negative".into(),
            )),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubscriptionQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub recipes_limit: Option<i64>,
}

impl SubscriptionQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn recipes_limit(&self) -> RecipesLimitQuery {
        RecipesLimitQuery {
            recipes_limit: self.recipes_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_configured_page_size() {
        let (page, per_page, offset) = Pagination::default().normalize(6);
        assert_eq!((page, per_page, offset), (1, 6, 0));
    }

    #[test]
    fn pagination_clamps_and_offsets() {
        let p = Pagination {
            page: Some(3),
            limit: Some(500),
        };
        assert_eq!(p.normalize(6), (3, 100, 200));

        let p = Pagination {
            page: Some(-4),
            limit: Some(0),
        };
        assert_eq!(p.normalize(6), (1, 1, 0));
    }

    #[test]
    fn huge_page_is_clamped_instead_of_overflowing() {
        let p = Pagination {
            page: Some(i64::MAX),
            limit: Some(6),
        };
        let (page, per_page, offset) = p.normalize(6);
        assert_eq!(page, MAX_PAGE);
        assert_eq!(per_page, 6);
        assert_eq!(offset, (MAX_PAGE - 1) * 6);

        let p = Pagination {
            page: Some(i64::MAX),
            limit: Some(i64::MAX),
        };
        assert_eq!(p.normalize(6).2, (MAX_PAGE - 1) * 100);
    }

    #[test]
    fn tag_slugs_split_and_trim() {
        let q = RecipeQuery {
            tags: Some("breakfast, lunch,,dinner ".into()),
            ..Default::default()
        };
        assert_eq!(q.tag_slugs(), vec!["breakfast", "lunch", "dinner"]);
        assert!(RecipeQuery::default().tag_slugs().is_empty());
    }

    #[test]
    fn flags_accept_one_and_true() {
        let q = RecipeQuery {
            is_favorited: Some("1".into()),
            is_in_shopping_cart: Some("TRUE".into()),
            ..Default::default()
        };
        assert!(q.favorited_only());
        assert!(q.in_shopping_cart_only());

        let q = RecipeQuery {
            is_favorited: Some("0".into()),
            ..Default::default()
        };
        assert!(!q.favorited_only());
        assert!(!q.in_shopping_cart_only());
    }

    #[test]
    fn negative_recipes_limit_is_rejected() {
        let q = RecipesLimitQuery {
            recipes_limit: Some(-1),
        };
        assert!(matches!(q.checked(), Err(AppError::BadRequest(_))));
        assert_eq!(RecipesLimitQuery::default().checked().ok(), Some(None));
    }
}
