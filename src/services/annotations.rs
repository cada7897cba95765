//! Per-viewer derived columns, computed inside the listing query.
//!
//! Each flag is a correlated `EXISTS` subquery keyed on the viewer, so a page
//! costs one query no matter how many rows it holds. Anonymous viewers get a
//! constant `FALSE` and the subquery is never emitted.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerFlag {
    /// `favorites` row for the viewer and recipe `r`.
    Favorited,
    /// `shopping_carts` row for the viewer and recipe `r`.
    InShoppingCart,
    /// `follows` row from the viewer to user `u`.
    Subscribed,
}

impl ViewerFlag {
    fn subquery(self) -> (&'static str, &'static str) {
        match self {
            ViewerFlag::Favorited => ("favorites", "recipe_id = r.id"),
            ViewerFlag::InShoppingCart => ("shopping_carts", "recipe_id = r.id"),
            ViewerFlag::Subscribed => ("follows", "author_id = u.id"),
        }
    }

    fn push_exists(self, builder: &mut QueryBuilder<'_, Postgres>, viewer: Uuid) {
        let (table, correlation) = self.subquery();
        builder.push(format!("EXISTS (SELECT 1 FROM {table} x WHERE x.user_id = "));
        builder.push_bind(viewer);
        builder.push(format!(" AND x.{correlation})"));
    }

    /// Select-list item `<flag> AS alias`.
    pub fn push_select(
        self,
        builder: &mut QueryBuilder<'_, Postgres>,
        viewer: Option<Uuid>,
        alias: &str,
    ) {
        match viewer {
            Some(viewer) => self.push_exists(builder, viewer),
            None => {
                builder.push("FALSE");
            }
        }
        builder.push(format!(" AS {alias}"));
    }

    /// `AND <flag>` restriction; anonymous viewers are left unfiltered.
    pub fn push_filter(self, builder: &mut QueryBuilder<'_, Postgres>, viewer: Option<Uuid>) {
        if let Some(viewer) = viewer {
            builder.push(" AND ");
            self.push_exists(builder, viewer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_select_is_constant_false() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        ViewerFlag::Favorited.push_select(&mut builder, None, "is_favorited");
        assert_eq!(builder.sql(), "SELECT FALSE AS is_favorited");
    }

    #[test]
    fn viewer_select_uses_correlated_exists() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        ViewerFlag::InShoppingCart.push_select(&mut builder, Some(Uuid::new_v4()), "is_in_shopping_cart");
        assert_eq!(
            builder.sql(),
            "SELECT EXISTS (SELECT 1 FROM shopping_carts x WHERE x.user_id = $1 AND x.recipe_id = r.id) AS is_in_shopping_cart"
        );
    }

    #[test]
    fn anonymous_filter_adds_nothing() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 WHERE TRUE");
        ViewerFlag::Subscribed.push_filter(&mut builder, None);
        assert_eq!(builder.sql(), "SELECT 1 WHERE TRUE");
    }
}
