// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `CatalogApi` for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use catsearch::api::CatalogApi;
use catsearch::errors::CatalogError;
use catsearch::model::{
    ContentType, Entry, HistoryRecord, ListingRequest, ListingSort, Pagination, SavedFilter,
    SavedFilterCreate, SavedFilterUpdate, SearchRequest, SearchResult, SortMode, SummaryStatus,
    Tag,
};

/// One recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ListingRequest),
    Search(SearchRequest),
    Suggest(String),
    History(u32),
    ClearHistory,
    ListSaved,
    GetSaved(String),
    CreateSaved(SavedFilterCreate),
    UpdateSaved(String, SavedFilterUpdate),
    DeleteSaved(String),
    Tags,
}

#[derive(Default)]
struct State {
    entries: Vec<Entry>,
    tags: Vec<Tag>,
    history: Vec<HistoryRecord>,
    saved: Vec<SavedFilter>,
    suggestions: HashMap<String, (Duration, Vec<String>)>,
    failing: HashSet<&'static str>,
    calls: Vec<Call>,
    next_id: u64,
}

#[derive(Default)]
pub struct FakeCatalog {
    state: Mutex<State>,
}

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap()
}

pub fn entry(id: &str, title: &str, content_type: ContentType, day: u32) -> Entry {
    Entry {
        id: id.to_string(),
        title: title.to_string(),
        content_type,
        url: None,
        content: None,
        ai_summary: None,
        summary_status: SummaryStatus::Completed,
        tags: None,
        created_at: at(day),
    }
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A small catalog with mixed content types and creation days
    pub fn seeded() -> Arc<Self> {
        let fake = Self::new();
        fake.add_entries(vec![
            entry("e1", "Rust Async Runtime", ContentType::Link, 1),
            entry("e2", "Go Concurrency", ContentType::Link, 2),
            entry("e3", "rust-lang/rust", ContentType::Repo, 3),
            entry("e4", "Notes on async rust", ContentType::Note, 4),
            entry("e5", "Tokio internals", ContentType::Link, 5),
        ]);
        fake
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_entries(&self, entries: Vec<Entry>) {
        self.lock().entries.extend(entries);
    }

    pub fn add_tags(&self, tags: Vec<Tag>) {
        self.lock().tags.extend(tags);
    }

    /// Answer `query` with `suggestions` after `delay`
    pub fn script_suggestions(&self, query: &str, delay: Duration, suggestions: &[&str]) {
        self.lock().suggestions.insert(
            query.to_string(),
            (delay, suggestions.iter().map(|s| s.to_string()).collect()),
        );
    }

    /// Make every call to `operation` fail with a network error
    pub fn fail(&self, operation: &'static str) {
        self.lock().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.lock().failing.remove(operation);
    }

    /// Insert a preset directly, bypassing validation
    pub fn insert_saved(&self, name: &str, criteria: catsearch::model::FilterCriteria) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let id = format!("f{}", state.next_id);
        state.saved.push(SavedFilter {
            id: id.clone(),
            name: name.to_string(),
            criteria,
            created_at: at(10),
            updated_at: at(10),
        });
        id
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn suggestion_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Suggest(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn last_dispatch(&self) -> Option<Call> {
        self.calls()
            .into_iter()
            .rev()
            .find(|call| matches!(call, Call::List(_) | Call::Search(_)))
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn saved_len(&self) -> usize {
        self.lock().saved.len()
    }

    fn record(&self, call: Call, operation: &'static str) -> Result<(), CatalogError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(operation) {
            return Err(CatalogError::status(
                500,
                format!("500 Internal Server Error ({})", operation),
            ));
        }
        Ok(())
    }
}

fn paginate(mut entries: Vec<Entry>, page: u32, limit: u32) -> (Vec<Entry>, Pagination) {
    let total = entries.len() as u64;
    let limit = limit.max(1);
    let pages = ((total + u64::from(limit) - 1) / u64::from(limit)) as u32;
    let start = ((page.max(1) - 1) * limit) as usize;
    let window = if start < entries.len() {
        entries.drain(start..).take(limit as usize).collect()
    } else {
        Vec::new()
    };
    (
        window,
        Pagination {
            page,
            limit,
            total,
            pages,
        },
    )
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_entries(&self, request: &ListingRequest) -> Result<SearchResult, CatalogError> {
        self.record(Call::List(request.clone()), "list_entries")?;
        let mut entries: Vec<Entry> = self
            .lock()
            .entries
            .iter()
            .filter(|e| request.content_type.map_or(true, |t| e.content_type == t))
            .cloned()
            .collect();
        match request.sort {
            ListingSort::Newest => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ListingSort::Oldest => entries.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        let (entries, pagination) = paginate(entries, request.page, request.limit);
        Ok(SearchResult {
            entries,
            pagination,
            relevance_scores: None,
        })
    }

    async fn search_entries(&self, request: &SearchRequest) -> Result<SearchResult, CatalogError> {
        self.record(Call::Search(request.clone()), "search_entries")?;
        let needle = request.q.to_lowercase();
        let filters = request.filters.clone().unwrap_or_default();

        let mut state = self.lock();
        let mut entries: Vec<Entry> = state
            .entries
            .iter()
            .filter(|e| needle.is_empty() || e.title.to_lowercase().contains(&needle))
            .filter(|e| filters.content_type.map_or(true, |t| e.content_type == t))
            .filter(|e| !filters.has_url || e.url.is_some())
            .filter(|e| !filters.has_summary || e.ai_summary.is_some())
            .filter(|e| {
                filters.tags.is_empty()
                    || e.tags
                        .as_ref()
                        .is_some_and(|tags| tags.iter().any(|t| filters.tags.contains(&t.id)))
            })
            .cloned()
            .collect();

        let scores = (request.sort == SortMode::Relevance && !needle.is_empty()).then(|| {
            entries
                .iter()
                .map(|e| {
                    let score = needle.len() as f64 / e.title.len().max(1) as f64;
                    (e.id.clone(), score)
                })
                .collect::<HashMap<_, _>>()
        });
        match request.sort {
            SortMode::Oldest => entries.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            _ => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        let total = entries.len() as u64;
        state.next_id += 1;
        let record = HistoryRecord {
            id: format!("h{}", state.next_id),
            query: request.q.clone(),
            result_count: total,
            created_at: at(20),
        };
        state.history.insert(0, record);
        drop(state);

        let (entries, pagination) = paginate(entries, request.page, request.limit);
        Ok(SearchResult {
            entries,
            pagination,
            relevance_scores: scores,
        })
    }

    async fn suggestions(&self, query: &str, limit: usize) -> Result<Vec<String>, CatalogError> {
        self.record(Call::Suggest(query.to_string()), "suggestions")?;
        let scripted = self.lock().suggestions.get(query).cloned();
        let (delay, mut suggestions) = scripted.unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        suggestions.truncate(limit);
        Ok(suggestions)
    }

    async fn search_history(&self, limit: u32) -> Result<Vec<HistoryRecord>, CatalogError> {
        self.record(Call::History(limit), "search_history")?;
        Ok(self
            .lock()
            .history
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn clear_search_history(&self) -> Result<(), CatalogError> {
        self.record(Call::ClearHistory, "clear_search_history")?;
        self.lock().history.clear();
        Ok(())
    }

    async fn list_saved_filters(&self) -> Result<Vec<SavedFilter>, CatalogError> {
        self.record(Call::ListSaved, "list_saved_filters")?;
        let mut saved = self.lock().saved.clone();
        saved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(saved)
    }

    async fn get_saved_filter(&self, id: &str) -> Result<SavedFilter, CatalogError> {
        self.record(Call::GetSaved(id.to_string()), "get_saved_filter")?;
        self.lock()
            .saved
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("saved filter", id))
    }

    async fn create_saved_filter(
        &self,
        body: &SavedFilterCreate,
    ) -> Result<SavedFilter, CatalogError> {
        self.record(Call::CreateSaved(body.clone()), "create_saved_filter")?;
        let mut state = self.lock();
        state.next_id += 1;
        let created = SavedFilter {
            id: format!("f{}", state.next_id),
            name: body.name.clone(),
            criteria: body.criteria.clone(),
            created_at: at(15),
            updated_at: at(15),
        };
        state.saved.push(created.clone());
        Ok(created)
    }

    async fn update_saved_filter(
        &self,
        id: &str,
        body: &SavedFilterUpdate,
    ) -> Result<SavedFilter, CatalogError> {
        self.record(
            Call::UpdateSaved(id.to_string(), body.clone()),
            "update_saved_filter",
        )?;
        let mut state = self.lock();
        let filter = state
            .saved
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| CatalogError::not_found("saved filter", id))?;
        if let Some(name) = &body.name {
            filter.name = name.clone();
        }
        if let Some(criteria) = &body.criteria {
            filter.criteria = criteria.clone();
        }
        filter.updated_at = at(16);
        Ok(filter.clone())
    }

    async fn delete_saved_filter(&self, id: &str) -> Result<(), CatalogError> {
        self.record(Call::DeleteSaved(id.to_string()), "delete_saved_filter")?;
        let mut state = self.lock();
        let before = state.saved.len();
        state.saved.retain(|f| f.id != id);
        if state.saved.len() == before {
            return Err(CatalogError::not_found("saved filter", id));
        }
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError> {
        self.record(Call::Tags, "list_tags")?;
        Ok(self.lock().tags.clone())
    }
}
