// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog data model and wire types
//!
//! Field names follow the catalog HTTP API. Filter criteria are
//! presence-only: an inactive field is absent from the serialized form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Link,
    Repo,
    Note,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Link => "link",
            ContentType::Repo => "repo",
            ContentType::Note => "note",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "link" => Ok(ContentType::Link),
            "repo" => Ok(ContentType::Repo),
            "note" => Ok(ContentType::Note),
            other => Err(format!("unknown content type '{}' (expected link, repo or note)", other)),
        }
    }
}

/// Result ordering preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Relevance,
    Newest,
    Oldest,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            other => Err(format!("unknown sort '{}' (expected relevance, newest or oldest)", other)),
        }
    }
}

/// Ordering accepted by the plain listing endpoint (no relevance concept)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSort {
    Newest,
    Oldest,
}

impl From<SortMode> for ListingSort {
    /// Listing mode has no relevance ranking; relevance falls back to newest.
    fn from(sort: SortMode) -> Self {
        match sort {
            SortMode::Oldest => ListingSort::Oldest,
            SortMode::Relevance | SortMode::Newest => ListingSort::Newest,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Composable structured filter criteria.
///
/// Quick filters (`has_summary`, `has_url`) are plain flags that are only
/// serialized when set, so "off" and "unset" share one representation.
/// An empty tag set is likewise absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", deserialize_with = "nullable_tags")]
    pub tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "is_false", deserialize_with = "nullable_flag")]
    pub has_summary: bool,
    #[serde(skip_serializing_if = "is_false", deserialize_with = "nullable_flag")]
    pub has_url: bool,
}

impl FilterCriteria {
    /// Number of active fields
    pub fn active_count(&self) -> usize {
        [
            self.content_type.is_some(),
            !self.tags.is_empty(),
            self.date_from.is_some(),
            self.date_to.is_some(),
            self.has_summary,
            self.has_url,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

fn nullable_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A catalog tag as returned by the tag catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Progress of the AI summary for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

/// A catalog entry (owned by the server; consumed read-only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub summary_status: SummaryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Page window of a listing or search response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// One page of entries, with relevance scores in search mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "data")]
    pub entries: Vec<Entry>,
    pub pagination: Pagination,
    #[serde(
        rename = "relevanceScores",
        alias = "relevance_scores",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relevance_scores: Option<HashMap<String, f64>>,
}

impl SearchResult {
    pub fn relevance_for(&self, entry_id: &str) -> Option<f64> {
        self.relevance_scores
            .as_ref()
            .and_then(|scores| scores.get(entry_id).copied())
    }
}

/// A server-recorded past search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub query: String,
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub result_count: u64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// A named, persisted snapshot of filter criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: String,
    pub name: String,
    #[serde(rename = "filters")]
    pub criteria: FilterCriteria,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /filters`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedFilterCreate {
    pub name: String,
    #[serde(rename = "filters")]
    pub criteria: FilterCriteria,
}

/// Request body for `PUT /filters/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SavedFilterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "filters", skip_serializing_if = "Option::is_none")]
    pub criteria: Option<FilterCriteria>,
}

/// Query parameters for the plain listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRequest {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    pub sort: ListingSort,
}

/// Body of the unified search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterCriteria>,
    pub sort: SortMode,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SuggestionResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
}

fn count_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Timestamps arrive either as RFC 3339 or as naive UTC date-times.
pub(crate) mod timestamp {
    use super::*;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
