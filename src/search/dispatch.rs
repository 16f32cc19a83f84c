// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search dispatch: turns session state into exactly one backend request.
//!
//! Search mode (non-blank query or any active filter) goes to the unified
//! search endpoint. Otherwise the plain listing endpoint is used, which
//! knows no relevance ranking, so a relevance sort is sent as newest.

use std::sync::Arc;

use crate::api::CatalogApi;
use crate::errors::CatalogError;
use crate::model::{ListingRequest, ListingSort, SearchRequest, SearchResult};
use crate::search::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Listing,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchRequest {
    Listing(ListingRequest),
    Search(SearchRequest),
}

impl DispatchRequest {
    pub fn mode(&self) -> DispatchMode {
        match self {
            DispatchRequest::Listing(_) => DispatchMode::Listing,
            DispatchRequest::Search(_) => DispatchMode::Search,
        }
    }
}

/// Build the request for `state` with `limit` entries per page
pub fn plan(state: &SessionState, limit: u32) -> DispatchRequest {
    if state.is_search_mode() {
        let filters = state.filters();
        DispatchRequest::Search(SearchRequest {
            q: state.query().trim().to_string(),
            filters: (!filters.is_empty()).then(|| filters.clone()),
            sort: state.sort(),
            page: state.page(),
            limit,
        })
    } else {
        DispatchRequest::Listing(ListingRequest {
            page: state.page(),
            limit,
            content_type: state.filters().content_type,
            sort: ListingSort::from(state.sort()),
        })
    }
}

pub struct SearchDispatcher {
    api: Arc<dyn CatalogApi>,
    page_size: u32,
}

impl SearchDispatcher {
    pub fn new(api: Arc<dyn CatalogApi>, page_size: u32) -> Self {
        Self { api, page_size }
    }

    pub fn plan(&self, state: &SessionState) -> DispatchRequest {
        plan(state, self.page_size)
    }

    /// Issue the request for `state`. No timeout and no retry.
    pub async fn dispatch(&self, state: &SessionState) -> Result<SearchResult, CatalogError> {
        match self.plan(state) {
            DispatchRequest::Search(request) => {
                tracing::debug!(q = %request.q, sort = request.sort.as_str(), page = request.page, "dispatching search");
                self.api.search_entries(&request).await
            }
            DispatchRequest::Listing(request) => {
                tracing::debug!(page = request.page, sort = ?request.sort, "dispatching listing");
                self.api.list_entries(&request).await
            }
        }
    }
}
