//! Authenticated request preparation
//!
//! Every request carries the session ticket as a cookie. Mutating requests
//! also carry the CSRF prevention token; `GET` never does.

use std::collections::BTreeMap;
use std::sync::Arc;

use pvekit_common::auth::CSRF_HEADER;
use pvekit_common::TicketCache;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Method, RequestBuilder, Response};
use tracing::debug;
use url::Url;

use super::errors::ApiError;
use crate::http::HttpClient;

/// Method, API-relative path and parameters of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Relative to the API base, without a leading slash (`nodes/pve1/qemu`).
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), params: BTreeMap::new() }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn params(mut self, params: &BTreeMap<String, String>) -> Self {
        self.params.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Whether parameters travel in the query string rather than a form body.
    #[must_use]
    pub fn uses_query(&self) -> bool {
        self.method == Method::GET || self.method == Method::DELETE
    }
}

/// Decorates requests with the current session ticket.
///
/// Holds no state besides the shared cache; ticket refresh happens inside
/// [`TicketCache::current`].
#[derive(Debug)]
pub struct AuthenticatedTransport {
    http: HttpClient,
    base_url: Url,
    cache: Arc<TicketCache>,
}

impl AuthenticatedTransport {
    pub fn new(http: HttpClient, base_url: Url, cache: Arc<TicketCache>) -> Self {
        Self { http, base_url, cache }
    }

    pub fn cache(&self) -> &Arc<TicketCache> {
        &self.cache
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API-relative path against the base URL.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the path does not form a valid URL
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("invalid API path {path:?}: {e}")))
    }

    /// Build the request with authentication headers attached
    ///
    /// # Errors
    /// Fails closed with [`ApiError::Auth`] when no valid ticket can be
    /// obtained; nothing is sent in that case.
    pub async fn prepare(&self, request: &RequestDescriptor) -> Result<RequestBuilder, ApiError> {
        let ticket = self.cache.current().await?;
        let url = self.url(&request.path)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(COOKIE, ticket.cookie());

        if request.method != Method::GET {
            builder = builder.header(CSRF_HEADER, ticket.csrf_prevention_token.as_str());
        }

        if request.params.is_empty() {
            return Ok(builder);
        }
        Ok(if request.uses_query() {
            builder.query(&request.params)
        } else {
            builder.form(&request.params)
        })
    }

    /// Prepare and send a request
    ///
    /// # Errors
    /// Returns [`ApiError::Auth`] if authentication fails, or a network error
    /// if no response arrives. Non-2xx responses are returned as-is.
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Response, ApiError> {
        let builder = self.prepare(request).await?;
        debug!(method = %request.method, path = %request.path, "sending API request");
        self.http.send(builder).await.map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pvekit_common::{AuthError, Ticket, TicketSource};

    use super::*;

    #[derive(Debug)]
    struct StaticSource(Option<Ticket>);

    #[async_trait]
    impl TicketSource for StaticSource {
        async fn ticket(&self) -> Result<Ticket, AuthError> {
            self.0.clone().ok_or(AuthError::RefreshUnavailable)
        }
    }

    fn transport(ticket: Option<Ticket>) -> AuthenticatedTransport {
        let cache = TicketCache::new(Arc::new(StaticSource(ticket)));
        AuthenticatedTransport::new(
            HttpClient::new().unwrap(),
            Url::parse("https://pve.example:8006/api2/json/").unwrap(),
            Arc::new(cache),
        )
    }

    fn ticket() -> Ticket {
        Ticket::new("PVE:root@pam:ABC", "csrf-token", "root@pam", chrono::Utc::now())
    }

    #[tokio::test]
    async fn get_carries_cookie_and_query_but_no_csrf() {
        let request = RequestDescriptor::get("nodes/pve1/storage").param("content", "images");

        let built = transport(Some(ticket())).prepare(&request).await.unwrap().build().unwrap();

        assert_eq!(
            built.url().as_str(),
            "https://pve.example:8006/api2/json/nodes/pve1/storage?content=images"
        );
        assert_eq!(built.headers()[COOKIE], "PVEAuthCookie=PVE:root@pam:ABC");
        assert!(built.headers().get(CSRF_HEADER).is_none());
        assert!(built.body().is_none());
    }

    #[tokio::test]
    async fn post_carries_csrf_and_form_body() {
        let request = RequestDescriptor::post("nodes/pve1/qemu/100/config").param("cores", "4");

        let built = transport(Some(ticket())).prepare(&request).await.unwrap().build().unwrap();

        assert_eq!(built.headers()[CSRF_HEADER], "csrf-token");
        assert_eq!(
            built.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(built.body().and_then(|b| b.as_bytes()), Some(&b"cores=4"[..]));
        assert!(built.url().query().is_none());
    }

    #[tokio::test]
    async fn delete_uses_query_and_csrf() {
        let request = RequestDescriptor::delete("nodes/pve1/qemu/100").param("purge", "1");

        let built = transport(Some(ticket())).prepare(&request).await.unwrap().build().unwrap();

        assert_eq!(built.url().query(), Some("purge=1"));
        assert_eq!(built.headers()[CSRF_HEADER], "csrf-token");
    }

    #[tokio::test]
    async fn fails_closed_without_ticket() {
        let err = transport(None).prepare(&RequestDescriptor::get("nodes")).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::RefreshUnavailable)));
    }
}
