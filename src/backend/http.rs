//! `reqwest` implementation of [`BackendApi`].

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::backend::BackendApi;
use crate::backend::errors::{BackendError, BackendResult};

#[derive(Clone, Debug)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// A copy of the client sending `token` as bearer credentials.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> BackendResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Option<Value>> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Backend request failed with {status}: {body}");
            return Err(BackendError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

impl BackendApi for HttpBackend {
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> BackendResult<Value> {
        let url = self.url(path)?;
        log::debug!("GET {url} {params:?}");
        let body = self.send(self.http.get(url).query(params)).await?;
        Ok(body.unwrap_or(Value::Null))
    }

    async fn post_json(&self, path: &str, body: &Value) -> BackendResult<Value> {
        let url = self.url(path)?;
        log::debug!("POST {url}");
        let body = self.send(self.http.post(url).json(body)).await?;
        Ok(body.unwrap_or(Value::Null))
    }

    async fn patch_json(&self, path: &str, body: &Value) -> BackendResult<Value> {
        let url = self.url(path)?;
        log::debug!("PATCH {url}");
        let body = self.send(self.http.patch(url).json(body)).await?;
        Ok(body.unwrap_or(Value::Null))
    }

    async fn delete(&self, path: &str) -> BackendResult<()> {
        let url = self.url(path)?;
        log::debug!("DELETE {url}");
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_joined_under_the_api_root() {
        let backend = HttpBackend::new("https://api.prophy.test/api", Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.url("/clients/4/").unwrap().as_str(),
            "https://api.prophy.test/api/clients/4/"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpBackend::new("not a url", Duration::from_secs(5)),
            Err(BackendError::InvalidUrl(_))
        ));
    }

    #[test]
    fn with_token_keeps_base_url() {
        let backend = HttpBackend::new("http://localhost:8000/api/", Duration::from_secs(5)).unwrap();
        let authorized = backend.with_token("abc");
        assert_eq!(authorized.base_url(), backend.base_url());
        assert_eq!(authorized.token.as_deref(), Some("abc"));
    }
}
