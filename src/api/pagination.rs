//! Page-number pagination with a client supplied `limit`.
//!
//! Responses look like `{count, next, previous, results}` where the links are
//! the request path with `page` rewritten.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use serde::Serialize;
use std::sync::Arc;

use super::validation::clamp_page_size;
use super::{ApiError, AppState};

/// Decoded query string pairs, keeping repeats and order.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self(pairs)
    }

    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value given for `key`, in request order.
    #[must_use]
    pub fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// `"1"` and `"true"` count as set.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.first(key), Some("1" | "true" | "True"))
    }

    fn with_page(&self, page: Option<u64>) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let mut placed = false;

        for (k, v) in &self.0 {
            if k == "page" {
                if let Some(page) = page
                    && !placed
                {
                    serializer.append_pair("page", &page.to_string());
                    placed = true;
                }
                continue;
            }
            serializer.append_pair(k, v);
        }

        if let Some(page) = page
            && !placed
        {
            serializer.append_pair("page", &page.to_string());
        }

        serializer.finish()
    }
}

/// Requested page plus what is needed to build neighbour links.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub path: String,
    pub params: QueryParams,
}

impl Pagination {
    /// Parse `page` (1-based) and `limit` from the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for a page that is not a positive integer.
    pub fn from_query(
        path: &str,
        query: Option<&str>,
        default_size: u64,
        max_size: u64,
    ) -> Result<Self, ApiError> {
        let params = QueryParams::parse(query);

        let limit = clamp_page_size(params.first("limit"), default_size, max_size);

        // The offset must stay representable as an SQL integer
        let max_page = i64::MAX.unsigned_abs() / limit;
        let page = match params.first("page") {
            None => 1,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) if (1..=max_page).contains(&n) => n,
                _ => return Err(ApiError::invalid_page()),
            },
        };

        Ok(Self {
            page,
            limit,
            path: path.to_string(),
            params,
        })
    }

    fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.limit).max(1)
    }

    fn link(&self, page: Option<u64>) -> String {
        let query = self.params.with_page(page);
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    /// Wrap one page of results.
    ///
    /// # Errors
    ///
    /// Returns 404 `Invalid page.` when the page lies past the last one.
    pub fn page<T, U: From<T>>(&self, items: Vec<T>, total: u64) -> Result<Page<U>, ApiError> {
        let last = self.last_page(total);
        if self.page > last {
            return Err(ApiError::invalid_page());
        }

        let next = (self.page < last).then(|| self.link(Some(self.page + 1)));
        let previous = match self.page {
            1 => None,
            2 => Some(self.link(None)),
            n => Some(self.link(Some(n - 1))),
        };

        Ok(Page {
            count: total,
            next,
            previous,
            results: items.into_iter().map(U::from).collect(),
        })
    }
}

impl FromRequestParts<Arc<AppState>> for Pagination {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.clone(), |original| original.0.clone());

        let (default_size, max_size) = {
            let config = state.config().read().await;
            (config.api.default_page_size, config.api.max_page_size)
        };

        Self::from_query(uri.path(), uri.query(), default_size, max_size)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(query: &str) -> Pagination {
        Pagination::from_query("/api/recipes", Some(query), 6, 100).unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = Pagination::from_query("/api/recipes", None, 6, 100).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 6);
    }

    #[test]
    fn test_invalid_page_is_rejected() {
        assert!(Pagination::from_query("/api/recipes", Some("page=0"), 6, 100).is_err());
        assert!(Pagination::from_query("/api/recipes", Some("page=abc"), 6, 100).is_err());
        assert!(
            Pagination::from_query("/api/recipes", Some("page=18446744073709551615"), 6, 100)
                .is_err()
        );
    }

    #[test]
    fn test_links_on_middle_page() {
        let page: Page<i32> = pagination("limit=2&page=2&tags=lunch")
            .page(vec![3, 4], 5)
            .unwrap();

        assert_eq!(page.count, 5);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/recipes?limit=2&page=3&tags=lunch")
        );
        assert_eq!(page.previous.as_deref(), Some("/api/recipes?limit=2&tags=lunch"));
    }

    #[test]
    fn test_links_on_first_and_last_page() {
        let first: Page<i32> = pagination("limit=2").page(vec![1, 2], 3).unwrap();
        assert_eq!(first.next.as_deref(), Some("/api/recipes?limit=2&page=2"));
        assert!(first.previous.is_none());

        let last: Page<i32> = pagination("limit=2&page=2").page(vec![3], 3).unwrap();
        assert!(last.next.is_none());
        assert_eq!(last.previous.as_deref(), Some("/api/recipes?limit=2"));
    }

    #[test]
    fn test_empty_first_page_is_allowed() {
        let page: Page<i32> = pagination("").page(Vec::<i32>::new(), 0).unwrap();
        assert_eq!(page.count, 0);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_page_past_the_end() {
        assert!(pagination("page=3&limit=2").page::<i32, i32>(vec![], 3).is_err());
    }

    #[test]
    fn test_repeated_params_survive() {
        let params = QueryParams::parse(Some("tags=lunch&tags=dinner&is_favorited=1"));
        assert_eq!(params.all("tags"), vec!["lunch", "dinner"]);
        assert!(params.flag("is_favorited"));
        assert!(!params.flag("is_in_shopping_cart"));
    }
}
