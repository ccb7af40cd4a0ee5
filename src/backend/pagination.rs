//! Paginated list fetching.
//!
//! Single-page mode issues exactly one request for the requested page;
//! auto-paginate mode walks `next` links until exhausted and returns the
//! whole collection or an error, never a partial list.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::backend::BackendApi;
use crate::backend::errors::{BackendError, BackendResult};

/// Upper bound on pages walked by [`fetch_all`].
const MAX_PAGES: usize = 1000;

/// Standard list envelope returned by the backend.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PaginatedResult<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// List endpoints answer either with the envelope or with a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated(PaginatedResult<T>),
    Plain(Vec<T>),
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Total matching items across all pages.
    pub count: usize,
    pub items: Vec<T>,
    pub has_next: bool,
}

/// Query against a list endpoint.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub path: String,
    pub filters: Vec<(String, String)>,
    pub page: Option<usize>,
}

impl ListQuery {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filters: Vec::new(),
            page: None,
        }
    }

    /// Adds a filter; blank values are skipped.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.filters.push((key.into(), value));
        }
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = (String, String)>) -> Self {
        for (key, value) in filters {
            self = self.filter(key, value);
        }
        self
    }

    pub fn paginate(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

fn with_page(filters: &[(String, String)], page: usize) -> Vec<(String, String)> {
    let mut params = Vec::with_capacity(filters.len() + 1);
    params.push(("page".to_string(), page.to_string()));
    params.extend(filters.iter().filter(|(k, _)| k != "page").cloned());
    params
}

/// Fetches one page. Non-paginated responses are returned whole as a single
/// page.
pub async fn fetch_page<B, T>(
    api: &B,
    path: &str,
    page: usize,
    filters: &[(String, String)],
) -> BackendResult<Page<T>>
where
    B: BackendApi + ?Sized,
    T: DeserializeOwned,
{
    let value = api.get_json(path, &with_page(filters, page)).await?;
    let page = match serde_json::from_value::<ListResponse<T>>(value)? {
        ListResponse::Paginated(result) => Page {
            count: result.count,
            has_next: result.next.is_some(),
            items: result.results,
        },
        ListResponse::Plain(items) => Page {
            count: items.len(),
            items,
            has_next: false,
        },
    };
    Ok(page)
}

/// Fetches every page sequentially, following `next` until it is null.
pub async fn fetch_all<B, T>(
    api: &B,
    path: &str,
    filters: &[(String, String)],
) -> BackendResult<Vec<T>>
where
    B: BackendApi + ?Sized,
    T: DeserializeOwned,
{
    let mut items = Vec::new();
    for page in 1..=MAX_PAGES {
        let Page {
            items: batch,
            has_next,
            ..
        } = fetch_page(api, path, page, filters).await.map_err(|err| {
            log::error!("Failed to fetch page {page} of {path}: {err}");
            err
        })?;
        items.extend(batch);
        if !has_next {
            return Ok(items);
        }
    }
    Err(BackendError::TooManyPages {
        path: path.to_string(),
        pages: MAX_PAGES,
    })
}

/// Runs `query` in single-page mode when it carries a page, otherwise in
/// auto-paginate mode.
pub async fn fetch_list<B, T>(api: &B, query: &ListQuery) -> BackendResult<Vec<T>>
where
    B: BackendApi + ?Sized,
    T: DeserializeOwned,
{
    match query.page {
        Some(page) => Ok(fetch_page(api, &query.path, page, &query.filters)
            .await?
            .items),
        None => fetch_all(api, &query.path, &query.filters).await,
    }
}
