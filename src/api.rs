// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog API client
//!
//! `CatalogApi` is the boundary between the search layer and the catalog
//! server. `HttpCatalogApi` talks to the JSON API; tests substitute an
//! in-memory implementation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::CatalogError;
use crate::model::{
    HistoryRecord, ListingRequest, SavedFilter, SavedFilterCreate, SavedFilterUpdate,
    SearchRequest, SearchResult, SuggestionResponse, Tag,
};

/// Remote operations the search layer depends on
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Plain paginated listing, no relevance scores
    async fn list_entries(&self, request: &ListingRequest) -> Result<SearchResult, CatalogError>;

    /// Unified search; the server records a history entry as a side effect
    async fn search_entries(&self, request: &SearchRequest) -> Result<SearchResult, CatalogError>;

    async fn suggestions(&self, query: &str, limit: usize) -> Result<Vec<String>, CatalogError>;

    /// Most-recent-first search history
    async fn search_history(&self, limit: u32) -> Result<Vec<HistoryRecord>, CatalogError>;

    async fn clear_search_history(&self) -> Result<(), CatalogError>;

    async fn list_saved_filters(&self) -> Result<Vec<SavedFilter>, CatalogError>;

    async fn get_saved_filter(&self, id: &str) -> Result<SavedFilter, CatalogError>;

    async fn create_saved_filter(
        &self,
        body: &SavedFilterCreate,
    ) -> Result<SavedFilter, CatalogError>;

    async fn update_saved_filter(
        &self,
        id: &str,
        body: &SavedFilterUpdate,
    ) -> Result<SavedFilter, CatalogError>;

    async fn delete_saved_filter(&self, id: &str) -> Result<(), CatalogError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError>;
}

/// HTTP connection settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL including the API prefix, e.g. `http://localhost:8000/api/v1`
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

/// `CatalogApi` over the catalog's JSON HTTP API
pub struct HttpCatalogApi {
    config: HttpConfig,
    client: Client,
}

impl HttpCatalogApi {
    pub fn new(config: HttpConfig) -> Result<Self, CatalogError> {
        // No client timeout: a hung request stays pending until it resolves.
        let client = Client::builder()
            .user_agent(concat!("catsearch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<Response, CatalogError> {
        let response = self.authorize(request).send().await?;
        check_status(response, resource, id).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<T, CatalogError> {
        let response = self.send(request, resource, id).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_status(
    response: Response,
    resource: &'static str,
    id: &str,
) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(CatalogError::not_found(resource, id));
    }

    let detail = response.text().await.unwrap_or_default();
    tracing::debug!(%status, %detail, resource, "catalog API returned an error status");
    Err(CatalogError::status(
        status.as_u16(),
        format!(
            "{} {} ({})",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error"),
            resource
        ),
    ))
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_entries(&self, request: &ListingRequest) -> Result<SearchResult, CatalogError> {
        let builder = self.client.get(self.url("/entries")).query(request);
        self.send_json(builder, "entries", "").await
    }

    async fn search_entries(&self, request: &SearchRequest) -> Result<SearchResult, CatalogError> {
        let builder = self.client.post(self.url("/entries/search")).json(request);
        self.send_json(builder, "search", "").await
    }

    async fn suggestions(&self, query: &str, limit: usize) -> Result<Vec<String>, CatalogError> {
        let builder = self
            .client
            .get(self.url("/search/suggestions"))
            .query(&[("q", query.to_string()), ("limit", limit.to_string())]);
        let body: SuggestionResponse = self.send_json(builder, "suggestions", query).await?;
        Ok(body.suggestions)
    }

    async fn search_history(&self, limit: u32) -> Result<Vec<HistoryRecord>, CatalogError> {
        let builder = self
            .client
            .get(self.url("/search/history"))
            .query(&[("limit", limit)]);
        self.send_json(builder, "search history", "").await
    }

    async fn clear_search_history(&self) -> Result<(), CatalogError> {
        let builder = self.client.delete(self.url("/search/history"));
        self.send(builder, "search history", "").await?;
        Ok(())
    }

    async fn list_saved_filters(&self) -> Result<Vec<SavedFilter>, CatalogError> {
        let builder = self.client.get(self.url("/filters"));
        self.send_json(builder, "saved filters", "").await
    }

    async fn get_saved_filter(&self, id: &str) -> Result<SavedFilter, CatalogError> {
        let builder = self.client.get(self.url(&format!("/filters/{}", id)));
        self.send_json(builder, "saved filter", id).await
    }

    async fn create_saved_filter(
        &self,
        body: &SavedFilterCreate,
    ) -> Result<SavedFilter, CatalogError> {
        let builder = self.client.post(self.url("/filters")).json(body);
        self.send_json(builder, "saved filter", &body.name).await
    }

    async fn update_saved_filter(
        &self,
        id: &str,
        body: &SavedFilterUpdate,
    ) -> Result<SavedFilter, CatalogError> {
        let builder = self.client.put(self.url(&format!("/filters/{}", id))).json(body);
        self.send_json(builder, "saved filter", id).await
    }

    async fn delete_saved_filter(&self, id: &str) -> Result<(), CatalogError> {
        let builder = self.client.delete(self.url(&format!("/filters/{}", id)));
        self.send(builder, "saved filter", id).await?;
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError> {
        let builder = self.client.get(self.url("/tags"));
        self.send_json(builder, "tags", "").await
    }
}
