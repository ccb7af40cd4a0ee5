//! Short-lived cache of list responses.
//!
//! Entries are keyed by user scope, endpoint and sorted parameters. Any
//! mutation drops every entry under the mutated resource root, so the next
//! read refetches from the backend.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;

use crate::backend::errors::BackendResult;
use crate::backend::{BackendApi, resource_root};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    scope: String,
    path: String,
    params: Vec<(String, String)>,
}

pub struct QueryCache {
    entries: Mutex<LruCache<CacheKey, (Instant, Value)>>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    fn key(scope: &str, path: &str, params: &[(String, String)]) -> CacheKey {
        let mut params = params.to_vec();
        params.sort();
        CacheKey {
            scope: scope.to_string(),
            path: path.to_string(),
            params,
        }
    }

    pub fn get(&self, scope: &str, path: &str, params: &[(String, String)]) -> Option<Value> {
        let key = Self::key(scope, path, params);
        let mut entries = self.entries.lock().ok()?;
        let fresh = entries
            .get(&key)
            .map(|(stored_at, value)| (stored_at.elapsed() < self.ttl).then(|| value.clone()))?;
        if fresh.is_none() {
            entries.pop(&key);
        }
        fresh
    }

    pub fn put(&self, scope: &str, path: &str, params: &[(String, String)], value: Value) {
        if self.ttl.is_zero() {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(Self::key(scope, path, params), (Instant::now(), value));
        }
    }

    /// Drops every entry whose endpoint lives under the resource root of
    /// `path`, for all scopes.
    pub fn invalidate(&self, path: &str) {
        let root = resource_root(path);
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let stale: Vec<CacheKey> = entries
            .iter()
            .filter(|(key, _)| key.path.starts_with(&root))
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            entries.pop(&key);
        }
        log::debug!("Invalidated cached queries under {root}");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Backend wrapper serving repeated GETs from a [`QueryCache`].
pub struct CachedBackend<'a, B> {
    inner: B,
    cache: &'a QueryCache,
    scope: String,
}

impl<'a, B> CachedBackend<'a, B> {
    /// `scope` isolates entries per user, since the backend filters by caller.
    pub fn new(inner: B, cache: &'a QueryCache, scope: impl Into<String>) -> Self {
        Self {
            inner,
            cache,
            scope: scope.into(),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: BackendApi> BackendApi for CachedBackend<'_, B> {
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> BackendResult<Value> {
        if let Some(value) = self.cache.get(&self.scope, path, params) {
            log::debug!("Cache hit for {path}");
            return Ok(value);
        }
        let value = self.inner.get_json(path, params).await?;
        self.cache.put(&self.scope, path, params, value.clone());
        Ok(value)
    }

    async fn post_json(&self, path: &str, body: &Value) -> BackendResult<Value> {
        let result = self.inner.post_json(path, body).await;
        self.cache.invalidate(path);
        result
    }

    async fn patch_json(&self, path: &str, body: &Value) -> BackendResult<Value> {
        let result = self.inner.patch_json(path, body).await;
        self.cache.invalidate(path);
        result
    }

    async fn delete(&self, path: &str) -> BackendResult<()> {
        let result = self.inner.delete(path).await;
        self.cache.invalidate(path);
        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::fake::FakeBackend;

    fn params(page: &str) -> Vec<(String, String)> {
        vec![("page".to_string(), page.to_string())]
    }

    #[actix_web::test]
    async fn repeated_reads_hit_the_cache() {
        let cache = QueryCache::new(16, Duration::from_secs(60));
        let backend = FakeBackend::default();
        backend.respond("/clients/", json!([]));
        let cached = CachedBackend::new(backend, &cache, "user-1");

        cached.get_json("/clients/", &params("1")).await.unwrap();
        cached.get_json("/clients/", &params("1")).await.unwrap();
        cached.get_json("/clients/", &params("2")).await.unwrap();

        assert_eq!(cached.inner().get_count("/clients/"), 2);
    }

    #[actix_web::test]
    async fn mutations_invalidate_the_resource() {
        let cache = QueryCache::new(16, Duration::from_secs(60));
        let backend = FakeBackend::default();
        backend.respond("/clients/", json!([]));
        backend.respond("/clients/operations/", json!([]));
        backend.respond("/units/", json!([]));
        let cached = CachedBackend::new(backend, &cache, "user-1");

        cached.get_json("/clients/", &[]).await.unwrap();
        cached.get_json("/clients/operations/", &[]).await.unwrap();
        cached.get_json("/units/", &[]).await.unwrap();
        assert_eq!(cache.len(), 3);

        cached.delete("/clients/4/").await.unwrap();

        assert_eq!(cache.len(), 1);
        cached.get_json("/clients/", &[]).await.unwrap();
        assert_eq!(cached.inner().get_count("/clients/"), 2);
    }

    #[actix_web::test]
    async fn failed_mutations_still_invalidate() {
        let cache = QueryCache::new(16, Duration::from_secs(60));
        let backend = FakeBackend::default();
        backend.respond("/units/", json!([]));
        backend.fail("/units/2/", 500);
        let cached = CachedBackend::new(backend, &cache, "user-1");

        cached.get_json("/units/", &[]).await.unwrap();
        assert!(cached.patch_json("/units/2/", &json!({})).await.is_err());

        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = QueryCache::new(16, Duration::from_millis(0));
        cache.put("u", "/clients/", &[], json!([1]));
        assert_eq!(cache.get("u", "/clients/", &[]), None);
    }

    #[test]
    fn scopes_are_isolated_and_params_order_insensitive() {
        let cache = QueryCache::new(16, Duration::from_secs(60));
        let a = vec![
            ("status".to_string(), "A".to_string()),
            ("page".to_string(), "1".to_string()),
        ];
        let b: Vec<_> = a.iter().rev().cloned().collect();
        cache.put("u1", "/clients/", &a, json!(["x"]));

        assert_eq!(cache.get("u1", "/clients/", &b), Some(json!(["x"])));
        assert_eq!(cache.get("u2", "/clients/", &a), None);
    }
}
