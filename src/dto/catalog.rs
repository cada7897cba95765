use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Ingredient, Tag};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("hex color pattern compiles")
});

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern compiles"));

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(regex(path = *HEX_COLOR, message = "Color must be a hex code like #E26C2D"))]
    pub color: String,
    #[validate(
        length(min = 1, max = 200),
        regex(path = *SLUG, message = "Slug may contain letters, digits, hyphens and underscores")
    )]
    pub slug: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateIngredientRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TagList {
    #[schema(value_type = Vec<Tag>)]
    pub items: Vec<Tag>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct IngredientList {
    #[schema(value_type = Vec<Ingredient>)]
    pub items: Vec<Ingredient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(color: &str, slug: &str) -> CreateTagRequest {
        CreateTagRequest {
            name: "Breakfast".into(),
            color: color.into(),
            slug: slug.into(),
        }
    }

    #[test]
    fn accepts_short_and_long_hex_colors() {
        assert!(tag("#E26C2D", "breakfast").validate().is_ok());
        assert!(tag("#fff", "breakfast").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_colors() {
        for color in ["E26C2D", "#E26C2", "#GGGGGG", "#E26C2DFF", ""] {
            assert!(tag(color, "breakfast").validate().is_err(), "{color} accepted");
        }
    }

    #[test]
    fn rejects_slug_with_spaces() {
        assert!(tag("#49B64E", "early breakfast").validate().is_err());
    }
}
