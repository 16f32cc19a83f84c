// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search page orchestration.
//!
//! `SearchPage` owns one page session: the search bar, the filter store,
//! saved presets, history and the current result view. Every user action
//! advances the immutable `SessionState`; a changed state is dispatched as
//! exactly one listing or search request.

pub mod bar;
pub mod debounce;
pub mod dispatch;
pub mod filters;
pub mod history;
pub mod keyboard;
pub mod saved;
pub mod session;
pub mod suggest;

use std::sync::Arc;

use crate::api::CatalogApi;
use crate::config::SearchSettings;
use crate::errors::CatalogError;
use crate::model::{ContentType, SavedFilter, SearchResult, SortMode};

use bar::SearchBar;
use dispatch::SearchDispatcher;
use filters::{FilterField, FilterStore};
use history::SearchHistoryLog;
use keyboard::NavKey;
use saved::SavedFilterRegistry;
use session::{can_go_next, can_go_previous, SessionEvent, SessionState};

/// What the results area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// Nothing dispatched yet
    Idle,
    /// A request is in flight
    Loading,
    Ready(SearchResult),
    /// Dispatch failed; distinct from an empty result
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient notification for preset and history actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct SearchPage {
    settings: SearchSettings,
    session: SessionState,
    filters: FilterStore,
    bar: SearchBar,
    saved: SavedFilterRegistry,
    history: SearchHistoryLog,
    dispatcher: SearchDispatcher,
    view: ResultView,
    notices: Vec<Notice>,
}

impl SearchPage {
    pub fn new(api: Arc<dyn CatalogApi>, settings: SearchSettings) -> Self {
        Self {
            session: SessionState::default(),
            filters: FilterStore::new(),
            bar: SearchBar::new(Arc::clone(&api), &settings),
            saved: SavedFilterRegistry::new(Arc::clone(&api)),
            history: SearchHistoryLog::new(Arc::clone(&api)),
            dispatcher: SearchDispatcher::new(api, settings.page_size),
            settings,
            view: ResultView::Idle,
            notices: Vec::new(),
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    pub fn bar(&self) -> &SearchBar {
        &self.bar
    }

    pub fn bar_mut(&mut self) -> &mut SearchBar {
        &mut self.bar
    }

    pub fn saved(&self) -> &SavedFilterRegistry {
        &self.saved
    }

    pub fn history(&self) -> &SearchHistoryLog {
        &self.history
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// (previous enabled, next enabled) for the current result page
    pub fn pagination_controls(&self) -> (bool, bool) {
        let pages = match &self.view {
            ResultView::Ready(result) => result.pagination.pages,
            _ => 0,
        };
        (
            can_go_previous(self.session.page()),
            can_go_next(self.session.page(), pages),
        )
    }

    /// Dispatch the current session unconditionally
    pub async fn refresh(&mut self) -> &ResultView {
        self.view = ResultView::Loading;
        self.view = match self.dispatcher.dispatch(&self.session).await {
            Ok(result) => ResultView::Ready(result),
            Err(err) => {
                tracing::debug!(error = %err, "dispatch failed");
                ResultView::Failed(err.to_string())
            }
        };
        &self.view
    }

    /// Advance the session; an unchanged state is dispatched again only when
    /// nothing has been shown yet or the last dispatch failed
    pub async fn apply(&mut self, event: SessionEvent) -> &ResultView {
        let next = self.session.advance(event);
        if next == self.session && matches!(self.view, ResultView::Ready(_)) {
            return &self.view;
        }
        self.session = next;
        self.refresh().await
    }

    pub async fn commit_query(&mut self, query: impl Into<String>) -> &ResultView {
        self.apply(SessionEvent::QueryCommitted(query.into())).await
    }

    /// Route a key press through the search bar; commits dispatch
    pub async fn key(&mut self, key: NavKey) -> Option<String> {
        let committed = self.bar.key(key)?;
        self.commit_query(committed.clone()).await;
        Some(committed)
    }

    pub async fn click_suggestion(&mut self, index: usize) -> Option<String> {
        let committed = self.bar.click(index)?;
        self.commit_query(committed.clone()).await;
        Some(committed)
    }

    /// Clear button in the search bar
    pub async fn clear_query(&mut self) -> &ResultView {
        let cleared = self.bar.clear();
        self.commit_query(cleared).await
    }

    pub async fn set_filter(&mut self, field: FilterField) -> &ResultView {
        self.filters.set(field);
        self.filters_changed().await
    }

    pub async fn toggle_tag(&mut self, tag_id: &str) -> &ResultView {
        self.filters.toggle_tag(tag_id);
        self.filters_changed().await
    }

    pub async fn toggle_content_type(&mut self, content_type: ContentType) -> &ResultView {
        self.filters.toggle_content_type(content_type);
        self.filters_changed().await
    }

    pub async fn toggle_has_summary(&mut self) -> &ResultView {
        self.filters.toggle_has_summary();
        self.filters_changed().await
    }

    pub async fn toggle_has_url(&mut self) -> &ResultView {
        self.filters.toggle_has_url();
        self.filters_changed().await
    }

    pub async fn clear_filters(&mut self) -> &ResultView {
        self.filters.clear();
        self.filters_changed().await
    }

    pub async fn set_sort(&mut self, sort: SortMode) -> &ResultView {
        self.apply(SessionEvent::SortChanged(sort)).await
    }

    pub async fn goto_page(&mut self, page: u32) -> &ResultView {
        self.apply(SessionEvent::PageChanged(page)).await
    }

    pub async fn next_page(&mut self) -> &ResultView {
        let pages = match &self.view {
            ResultView::Ready(result) => result.pagination.pages,
            _ => 0,
        };
        self.apply(SessionEvent::NextPage { pages }).await
    }

    pub async fn previous_page(&mut self) -> &ResultView {
        self.apply(SessionEvent::PreviousPage).await
    }

    /// Reset query, filters, sort and page to defaults
    pub async fn clear_all(&mut self) -> &ResultView {
        self.bar.clear();
        self.filters.clear();
        self.apply(SessionEvent::Reset).await
    }

    /// Leaving the page: drop interest in outstanding work and reset state
    pub fn unmount(&mut self) {
        self.bar.unmount();
        self.filters.clear();
        self.session = SessionState::default();
        self.view = ResultView::Idle;
    }

    pub async fn load_saved_filters(&mut self) -> Result<&[SavedFilter], CatalogError> {
        if let Err(err) = self.saved.list().await {
            self.notices.push(Notice::error(format!("Failed to load saved filters: {}", err)));
            return Err(err);
        }
        Ok(self.saved.filters())
    }

    /// Save the active criteria as a named preset
    pub async fn save_filters(&mut self, name: &str) -> Result<SavedFilter, CatalogError> {
        let snapshot = self.filters.criteria().clone();
        match self.saved.create(name, &snapshot).await {
            Ok(created) => {
                self.notices.push(Notice::success("Filter saved successfully"));
                Ok(created)
            }
            Err(err) => {
                let message = match &err {
                    CatalogError::Validation(_) => "Please enter a filter name".to_string(),
                    other => format!("Failed to save filter: {}", other),
                };
                self.notices.push(Notice::error(message));
                Err(err)
            }
        }
    }

    /// Replace the active criteria with a preset and dispatch
    pub async fn load_saved_filter(&mut self, id: &str) -> Result<(), CatalogError> {
        let criteria = match self.saved.criteria_for(id).await {
            Ok(criteria) => criteria,
            Err(err) => {
                self.notices.push(Notice::error(format!("Failed to load filter: {}", err)));
                return Err(err);
            }
        };
        let name = self
            .saved
            .find(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string());

        self.filters.replace(criteria);
        self.filters_changed().await;
        self.notices.push(Notice::success(format!("Loaded filter: {}", name)));
        Ok(())
    }

    pub async fn delete_saved_filter(&mut self, id: &str) -> Result<(), CatalogError> {
        match self.saved.delete(id).await {
            Ok(()) => {
                self.notices.push(Notice::success("Filter deleted"));
                Ok(())
            }
            Err(err) => {
                self.notices.push(Notice::error(format!("Failed to delete filter: {}", err)));
                Err(err)
            }
        }
    }

    pub async fn load_history(&mut self) -> Result<(), CatalogError> {
        let limit = self.settings.history_limit;
        if let Err(err) = self.history.list(limit).await {
            self.notices.push(Notice::error(format!("Failed to load history: {}", err)));
            return Err(err);
        }
        Ok(())
    }

    pub async fn clear_history(&mut self) -> Result<(), CatalogError> {
        match self.history.clear().await {
            Ok(()) => {
                self.notices.push(Notice::success("Search history cleared"));
                Ok(())
            }
            Err(err) => {
                self.notices.push(Notice::error(format!("Failed to clear history: {}", err)));
                Err(err)
            }
        }
    }

    /// Replay the query text of a history record; filters and sort stay as they are
    pub async fn replay_history(&mut self, index: usize) -> Option<String> {
        let query = self.history.replay(index)?.to_string();
        self.bar.replace_query(query.clone());
        self.commit_query(query.clone()).await;
        Some(query)
    }

    async fn filters_changed(&mut self) -> &ResultView {
        let criteria = self.filters.criteria().clone();
        self.apply(SessionEvent::FiltersChanged(criteria)).await
    }
}
