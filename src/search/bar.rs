// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search bar: raw/settled query, autocomplete list and keyboard navigation.

use std::sync::Arc;
use std::time::Instant;

use crate::api::CatalogApi;
use crate::config::SearchSettings;
use crate::search::keyboard::{KeyboardNavController, NavAction, NavKey};
use crate::search::suggest::{FetchOutcome, SuggestionFetcher};

/// Query text as typed (`raw`) and after debouncing (`settled`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub raw: String,
    pub settled: String,
}

pub struct SearchBar {
    query: Query,
    fetcher: Arc<SuggestionFetcher>,
    nav: KeyboardNavController,
    suggestion_limit: usize,
}

impl SearchBar {
    pub fn new(api: Arc<dyn CatalogApi>, settings: &SearchSettings) -> Self {
        Self {
            query: Query::default(),
            fetcher: Arc::new(SuggestionFetcher::new(api)),
            nav: KeyboardNavController::new(settings.blur_grace),
            suggestion_limit: settings.suggestion_limit,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn nav(&self) -> &KeyboardNavController {
        &self.nav
    }

    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }

    /// Shared handle for issuing fetches from spawned tasks
    pub fn fetcher(&self) -> Arc<SuggestionFetcher> {
        Arc::clone(&self.fetcher)
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    /// Keystroke-level update of the raw text
    pub fn input(&mut self, raw: impl Into<String>) {
        self.query.raw = raw.into();
    }

    /// Record a newly settled query. Outstanding fetches for the previous
    /// settled value lose interest immediately.
    pub fn settle(&mut self, settled: impl Into<String>) {
        let settled = settled.into();
        if settled != self.query.settled {
            self.fetcher.invalidate();
        }
        self.query.settled = settled;
    }

    /// Settle and fetch in one step, then show whatever is current.
    pub async fn settle_and_fetch(&mut self, settled: impl Into<String>) -> FetchOutcome {
        self.settle(settled);
        let outcome = self
            .fetcher
            .fetch(&self.query.settled, self.suggestion_limit)
            .await;
        self.show_outcome(&outcome);
        outcome
    }

    /// Every applied fetch replaces the list, reopens it and drops the
    /// selection, even when the entries are unchanged.
    pub fn show_outcome(&mut self, outcome: &FetchOutcome) {
        if let FetchOutcome::Applied(suggestions) = outcome {
            self.nav.set_suggestions(suggestions.clone());
        }
    }

    /// Returns the query to commit, if the key commits one
    pub fn key(&mut self, key: NavKey) -> Option<String> {
        let action = self.nav.handle_key(key, &self.query.raw);
        self.take_commit(action)
    }

    pub fn click(&mut self, index: usize) -> Option<String> {
        let action = self.nav.click(index);
        self.take_commit(action)
    }

    pub fn blur(&mut self, now: Instant) {
        self.nav.blur(now);
    }

    pub fn focus(&mut self) {
        self.nav.focus();
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.nav.poll(now)
    }

    /// Clear button: empty the input, drop suggestions, commit "".
    pub fn clear(&mut self) -> String {
        self.query = Query::default();
        self.fetcher.clear();
        self.nav.reset();
        String::new()
    }

    /// Set the input from outside (history replay); no suggestion fetch.
    pub fn replace_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.query.raw = text.clone();
        self.query.settled = text;
        self.fetcher.invalidate();
    }

    /// The search surface is going away
    pub fn unmount(&mut self) {
        self.fetcher.invalidate();
        self.nav.reset();
    }

    fn take_commit(&mut self, action: NavAction) -> Option<String> {
        match action {
            NavAction::Commit(text) => {
                self.query.raw = text.clone();
                Some(text)
            }
            NavAction::None | NavAction::Moved | NavAction::Closed => None,
        }
    }
}
