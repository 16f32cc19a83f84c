// SPDX-License-Identifier: MIT OR Apache-2.0

//! Autocomplete suggestions for the settled query.
//!
//! Each fetch takes the next generation number before it suspends. When the
//! response arrives it is applied to the visible list only if no newer fetch
//! (or invalidation) has happened since, so the last issued fetch always
//! wins regardless of network completion order. Failures collapse to an
//! empty list; suggestions are advisory and never raise.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::CatalogApi;

/// Queries shorter than this (in chars) never reach the network
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result became the visible suggestion list
    Applied(Vec<String>),
    /// A newer fetch or an invalidation happened first; result discarded
    Superseded,
}

#[derive(Debug, Default)]
struct Visible {
    suggestions: Vec<String>,
    loading: bool,
}

pub struct SuggestionFetcher {
    api: Arc<dyn CatalogApi>,
    generation: AtomicU64,
    visible: Mutex<Visible>,
}

impl SuggestionFetcher {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            generation: AtomicU64::new(0),
            visible: Mutex::new(Visible::default()),
        }
    }

    /// Fetch up to `limit` suggestions for a settled query.
    pub async fn fetch(&self, settled: &str, limit: usize) -> FetchOutcome {
        let generation = self.next_generation();

        if settled.chars().count() < MIN_QUERY_CHARS {
            self.apply(generation, Vec::new());
            return FetchOutcome::Applied(Vec::new());
        }

        self.lock().loading = true;
        let suggestions = match self.api.suggestions(settled, limit).await {
            Ok(mut suggestions) => {
                suggestions.truncate(limit);
                suggestions
            }
            Err(err) => {
                tracing::debug!(query = settled, error = %err, "suggestion fetch failed");
                Vec::new()
            }
        };

        if self.apply(generation, suggestions.clone()) {
            FetchOutcome::Applied(suggestions)
        } else {
            tracing::debug!(query = settled, generation, "discarding superseded suggestions");
            FetchOutcome::Superseded
        }
    }

    /// Drop interest in any outstanding fetch (settled query changed, or the
    /// search surface went away). The visible list is left as is.
    pub fn invalidate(&self) {
        let mut visible = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        visible.loading = false;
    }

    /// Invalidate outstanding fetches and empty the visible list
    pub fn clear(&self) {
        let mut visible = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        visible.suggestions.clear();
        visible.loading = false;
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.lock().suggestions.clone()
    }

    /// True while the latest fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn next_generation(&self) -> u64 {
        let _visible = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply `suggestions` if `generation` is still the latest issued
    fn apply(&self, generation: u64, suggestions: Vec<String>) -> bool {
        let mut visible = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        visible.suggestions = suggestions;
        visible.loading = false;
        true
    }

    fn lock(&self) -> MutexGuard<'_, Visible> {
        self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
