// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter store: the single owner of the active filter criteria.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::model::{ContentType, FilterCriteria};

/// A generic update to one filter field.
///
/// `None`, an empty tag set, or `false` deactivate the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterField {
    ContentType(Option<ContentType>),
    Tags(BTreeSet<String>),
    DateFrom(Option<NaiveDate>),
    DateTo(Option<NaiveDate>),
    HasSummary(bool),
    HasUrl(bool),
}

#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    criteria: FilterCriteria,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn has_active(&self) -> bool {
        !self.criteria.is_empty()
    }

    /// Update one field, leaving the rest untouched. Returns whether anything changed.
    pub fn set(&mut self, field: FilterField) -> bool {
        let before = self.criteria.clone();
        match field {
            FilterField::ContentType(value) => self.criteria.content_type = value,
            FilterField::Tags(tags) => self.criteria.tags = tags,
            FilterField::DateFrom(value) => self.criteria.date_from = value,
            FilterField::DateTo(value) => self.criteria.date_to = value,
            FilterField::HasSummary(on) => self.criteria.has_summary = on,
            FilterField::HasUrl(on) => self.criteria.has_url = on,
        }
        before != self.criteria
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag_id: &str) {
        if !self.criteria.tags.remove(tag_id) {
            self.criteria.tags.insert(tag_id.to_string());
        }
    }

    /// Select a content type; selecting the active one clears it.
    pub fn toggle_content_type(&mut self, content_type: ContentType) {
        let next = match self.criteria.content_type {
            Some(current) if current == content_type => None,
            _ => Some(content_type),
        };
        self.criteria.content_type = next;
    }

    pub fn toggle_has_summary(&mut self) {
        self.criteria.has_summary = !self.criteria.has_summary;
    }

    pub fn toggle_has_url(&mut self) {
        self.criteria.has_url = !self.criteria.has_url;
    }

    /// Replace the whole criteria, e.g. when a saved filter is loaded.
    pub fn replace(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn clear(&mut self) {
        self.criteria = FilterCriteria::default();
    }
}
