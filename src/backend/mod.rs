//! Access to the Prophy REST backend.

use std::future::Future;

use serde_json::Value;

use crate::backend::errors::BackendResult;

pub mod cache;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod fake;
pub mod http;
pub mod pagination;

/// Raw JSON verbs against the backend. Paths are relative to the API root,
/// e.g. `/clients/` or `/units/4/`.
pub trait BackendApi {
    fn get_json(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> impl Future<Output = BackendResult<Value>>;

    fn post_json(&self, path: &str, body: &Value) -> impl Future<Output = BackendResult<Value>>;

    fn patch_json(&self, path: &str, body: &Value) -> impl Future<Output = BackendResult<Value>>;

    fn delete(&self, path: &str) -> impl Future<Output = BackendResult<()>>;
}

/// First path segment of `path` as a resource root, e.g. `/clients/` for
/// `/clients/4/`.
pub fn resource_root(path: &str) -> String {
    let segment = path
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();
    format!("/{segment}/")
}

/// Path of a single resource under `collection`.
pub fn detail_path(collection: &str, id: impl std::fmt::Display) -> String {
    format!("{}/{id}/", collection.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_root_takes_first_segment() {
        assert_eq!(resource_root("/clients/4/"), "/clients/");
        assert_eq!(resource_root("clients/operations/"), "/clients/");
        assert_eq!(resource_root("/units/"), "/units/");
    }

    #[test]
    fn detail_path_joins_id() {
        assert_eq!(detail_path("/clients/", 4), "/clients/4/");
        assert_eq!(detail_path("/units", 9), "/units/9/");
    }
}
