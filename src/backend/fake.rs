//! In-memory backend for isolating services in tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::backend::BackendApi;
use crate::backend::errors::{BackendError, BackendResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Post(String, Value),
    Patch(String, Value),
    Delete(String),
}

#[derive(Default)]
pub struct FakeBackend {
    pages: RefCell<HashMap<String, Vec<Value>>>,
    responses: RefCell<HashMap<String, Value>>,
    page_failures: RefCell<HashMap<(String, usize), u16>>,
    failures: RefCell<HashMap<String, u16>>,
    requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    mutations: RefCell<Vec<Mutation>>,
    next_id: Cell<i32>,
}

impl FakeBackend {
    /// Serves `pages` as the paginated collection at `path`.
    pub fn paginate<T: Serialize>(&self, path: &str, pages: Vec<Vec<T>>) {
        let pages = pages
            .into_iter()
            .map(|page| serde_json::to_value(page).unwrap_or(Value::Null))
            .collect();
        self.pages.borrow_mut().insert(path.to_string(), pages);
    }

    /// Serves `value` verbatim for every GET and POST/PATCH of `path`.
    pub fn respond(&self, path: &str, value: Value) {
        self.responses.borrow_mut().insert(path.to_string(), value);
    }

    pub fn fail_page(&self, path: &str, page: usize, status: u16) {
        self.page_failures
            .borrow_mut()
            .insert((path.to_string(), page), status);
    }

    /// Fails every request to `path`.
    pub fn fail(&self, path: &str, status: u16) {
        self.failures.borrow_mut().insert(path.to_string(), status);
    }

    /// GET requests issued so far, as `(path, params)`.
    pub fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests.borrow().clone()
    }

    pub fn get_count(&self, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|(requested, _)| requested == path)
            .count()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.borrow().clone()
    }

    fn check_failure(&self, path: &str) -> BackendResult<()> {
        match self.failures.borrow().get(path) {
            Some(status) => Err(BackendError::from_status(*status, "fake failure")),
            None => Ok(()),
        }
    }

    fn page_of(&self, path: &str, page: usize) -> Option<Value> {
        let pages = self.pages.borrow();
        let pages = pages.get(path)?;
        let count: usize = pages
            .iter()
            .map(|p| p.as_array().map_or(0, Vec::len))
            .sum();
        let results = pages
            .get(page.saturating_sub(1))
            .cloned()
            .unwrap_or_else(|| json!([]));
        let next = (page < pages.len()).then(|| format!("http://fake{path}?page={}", page + 1));
        let previous = (page > 1).then(|| format!("http://fake{path}?page={}", page - 1));
        Some(json!({
            "count": count,
            "next": next,
            "previous": previous,
            "results": results,
        }))
    }

    fn echo(&self, path: &str, body: &Value) -> Value {
        if let Some(value) = self.responses.borrow().get(path) {
            return value.clone();
        }
        let mut body = body.clone();
        if let Some(object) = body.as_object_mut() {
            if !object.contains_key("id") {
                let id = self.next_id.get() + 1;
                self.next_id.set(id);
                object.insert("id".to_string(), json!(id));
            }
        }
        body
    }
}

impl BackendApi for FakeBackend {
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> BackendResult<Value> {
        self.requests
            .borrow_mut()
            .push((path.to_string(), params.to_vec()));
        self.check_failure(path)?;

        let page = params
            .iter()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(1);

        if let Some(status) = self.page_failures.borrow().get(&(path.to_string(), page)) {
            return Err(BackendError::from_status(*status, "fake failure"));
        }
        if let Some(value) = self.page_of(path, page) {
            return Ok(value);
        }
        self.responses
            .borrow()
            .get(path)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn post_json(&self, path: &str, body: &Value) -> BackendResult<Value> {
        self.mutations
            .borrow_mut()
            .push(Mutation::Post(path.to_string(), body.clone()));
        self.check_failure(path)?;
        Ok(self.echo(path, body))
    }

    async fn patch_json(&self, path: &str, body: &Value) -> BackendResult<Value> {
        self.mutations
            .borrow_mut()
            .push(Mutation::Patch(path.to_string(), body.clone()));
        self.check_failure(path)?;
        Ok(self.echo(path, body))
    }

    async fn delete(&self, path: &str) -> BackendResult<()> {
        self.mutations
            .borrow_mut()
            .push(Mutation::Delete(path.to_string()));
        self.check_failure(path)
    }
}
