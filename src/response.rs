use serde::Serialize;
use utoipa::ToSchema;

/// Pagination metadata attached to paged listings (users, recipes, subscriptions).
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
    pub total_pages: Option<i64>,
    pub has_next: Option<bool>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
            total_pages: Some(total_pages),
            has_next: Some(page < total_pages),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
            total_pages: None,
            has_next: None,
        }
    }
}

/// Envelope for every JSON body the API returns.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn paginated(
        message: impl Into<String>,
        data: T,
        page: i64,
        per_page: i64,
        total: i64,
    ) -> Self {
        Self::success(message, data, Some(Meta::new(page, per_page, total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_counts_partial_last_page() {
        let meta = Meta::new(1, 6, 13);
        assert_eq!(meta.total_pages, Some(3));
        assert_eq!(meta.has_next, Some(true));
    }

    #[test]
    fn meta_on_last_page_has_no_next() {
        let meta = Meta::new(3, 6, 13);
        assert_eq!(meta.has_next, Some(false));
    }

    #[test]
    fn meta_for_empty_listing() {
        let meta = Meta::new(1, 6, 0);
        assert_eq!(meta.total_pages, Some(0));
        assert_eq!(meta.has_next, Some(false));
    }
}
