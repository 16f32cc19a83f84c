// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search page session state.
//!
//! Query, filters, sort and page form one immutable value. Every user
//! action becomes a `SessionEvent`, and `SessionState::advance` computes
//! the next state without side effects. The page-reset rule lives here:
//! any change to query, filters or sort lands on page 1, while page
//! navigation leaves everything else untouched.

use crate::model::{FilterCriteria, SortMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    query: String,
    filters: FilterCriteria,
    sort: SortMode,
    page: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: FilterCriteria::default(),
            sort: SortMode::default(),
            page: 1,
        }
    }
}

/// A single user-initiated change to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A query was committed (Enter, suggestion pick, history replay, clear)
    QueryCommitted(String),
    /// The active filter criteria were replaced wholesale
    FiltersChanged(FilterCriteria),
    SortChanged(SortMode),
    /// Jump to a page; values below 1 land on page 1
    PageChanged(u32),
    /// "Next"; ignored when `page >= pages`
    NextPage { pages: u32 },
    /// "Previous"; ignored on page 1
    PreviousPage,
    /// Back to defaults (explicit clear or leaving the page)
    Reset,
}

impl SessionState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// True when the unified search endpoint must be used
    pub fn is_search_mode(&self) -> bool {
        is_search_mode(&self.query, &self.filters)
    }

    /// Compute the state that follows `event`
    pub fn advance(&self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::QueryCommitted(query) => {
                if query == self.query {
                    return self.clone();
                }
                SessionState {
                    query,
                    page: 1,
                    ..self.clone()
                }
            }
            SessionEvent::FiltersChanged(filters) => {
                if filters == self.filters {
                    return self.clone();
                }
                SessionState {
                    filters,
                    page: 1,
                    ..self.clone()
                }
            }
            SessionEvent::SortChanged(sort) => {
                if sort == self.sort {
                    return self.clone();
                }
                SessionState {
                    sort,
                    page: 1,
                    ..self.clone()
                }
            }
            SessionEvent::PageChanged(page) => SessionState {
                page: page.max(1),
                ..self.clone()
            },
            SessionEvent::NextPage { pages } => {
                if !can_go_next(self.page, pages) {
                    return self.clone();
                }
                SessionState {
                    page: self.page + 1,
                    ..self.clone()
                }
            }
            SessionEvent::PreviousPage => {
                if !can_go_previous(self.page) {
                    return self.clone();
                }
                SessionState {
                    page: self.page - 1,
                    ..self.clone()
                }
            }
            SessionEvent::Reset => SessionState::default(),
        }
    }
}

/// Search mode iff the trimmed query is non-empty or any filter is active
pub fn is_search_mode(query: &str, filters: &FilterCriteria) -> bool {
    !query.trim().is_empty() || !filters.is_empty()
}

/// "Previous" is disabled on the first page
pub fn can_go_previous(page: u32) -> bool {
    page > 1
}

/// "Next" is disabled once `page >= pages`
pub fn can_go_next(page: u32, pages: u32) -> bool {
    page < pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentType;

    fn on_page(state: SessionState, page: u32) -> SessionState {
        state.advance(SessionEvent::PageChanged(page))
    }

    #[test]
    fn default_state_is_listing_mode_on_first_page() {
        let state = SessionState::default();
        assert_eq!(state.page(), 1);
        assert_eq!(state.sort(), SortMode::Relevance);
        assert!(!state.is_search_mode());
    }

    #[test]
    fn search_mode_iff_query_or_filter_present() {
        let empty = FilterCriteria::default();
        assert!(!is_search_mode("", &empty));
        assert!(!is_search_mode("   \t", &empty));
        assert!(is_search_mode(" rust ", &empty));

        let tagged = FilterCriteria {
            has_url: true,
            ..Default::default()
        };
        assert!(is_search_mode("", &tagged));
    }

    #[test]
    fn filter_change_on_page_three_resets_to_first_page() {
        let state = on_page(SessionState::default(), 3);
        assert_eq!(state.page(), 3);

        let filters = FilterCriteria {
            content_type: Some(ContentType::Repo),
            ..Default::default()
        };
        let next = state.advance(SessionEvent::FiltersChanged(filters.clone()));
        assert_eq!(next.page(), 1);
        assert_eq!(next.filters(), &filters);
    }

    #[test]
    fn query_and_sort_changes_reset_page() {
        let state = on_page(SessionState::default(), 4);
        assert_eq!(
            state
                .advance(SessionEvent::QueryCommitted("rust".into()))
                .page(),
            1
        );
        assert_eq!(state.advance(SessionEvent::SortChanged(SortMode::Oldest)).page(), 1);
    }

    #[test]
    fn unchanged_values_keep_current_page() {
        let state = on_page(SessionState::default(), 2);
        assert_eq!(state.advance(SessionEvent::SortChanged(SortMode::Relevance)).page(), 2);
        assert_eq!(state.advance(SessionEvent::QueryCommitted(String::new())).page(), 2);
    }

    #[test]
    fn page_navigation_leaves_filters_untouched() {
        let filters = FilterCriteria {
            has_summary: true,
            ..Default::default()
        };
        let state = SessionState::default()
            .advance(SessionEvent::QueryCommitted("async".into()))
            .advance(SessionEvent::FiltersChanged(filters.clone()));

        let moved = state.advance(SessionEvent::NextPage { pages: 5 });
        assert_eq!(moved.page(), 2);
        assert_eq!(moved.filters(), &filters);
        assert_eq!(moved.query(), "async");
    }

    #[test]
    fn next_and_previous_respect_bounds() {
        let first = SessionState::default();
        assert_eq!(first.advance(SessionEvent::PreviousPage).page(), 1);
        assert_eq!(first.advance(SessionEvent::NextPage { pages: 1 }).page(), 1);
        assert_eq!(first.advance(SessionEvent::NextPage { pages: 0 }).page(), 1);

        let last = on_page(first, 3);
        assert_eq!(last.advance(SessionEvent::NextPage { pages: 3 }).page(), 3);
        assert_eq!(last.advance(SessionEvent::PreviousPage).page(), 2);
        assert_eq!(last.advance(SessionEvent::PageChanged(0)).page(), 1);
    }

    #[test]
    fn reset_returns_defaults() {
        let state = SessionState::default()
            .advance(SessionEvent::QueryCommitted("x".into()))
            .advance(SessionEvent::SortChanged(SortMode::Newest))
            .advance(SessionEvent::PageChanged(7));
        assert_eq!(state.advance(SessionEvent::Reset), SessionState::default());
    }
}
