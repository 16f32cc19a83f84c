// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saved filter presets.
//!
//! The local list mirrors the server in server-assigned order and changes
//! only after a write succeeds; a failed write leaves it untouched.

use std::sync::Arc;

use crate::api::CatalogApi;
use crate::errors::CatalogError;
use crate::model::{FilterCriteria, SavedFilter, SavedFilterCreate, SavedFilterUpdate};

pub struct SavedFilterRegistry {
    api: Arc<dyn CatalogApi>,
    filters: Vec<SavedFilter>,
}

impl SavedFilterRegistry {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            filters: Vec::new(),
        }
    }

    /// Presets as last loaded
    pub fn filters(&self) -> &[SavedFilter] {
        &self.filters
    }

    pub fn find(&self, id: &str) -> Option<&SavedFilter> {
        self.filters.iter().find(|f| f.id == id)
    }

    /// Reload all presets for the current user
    pub async fn list(&mut self) -> Result<&[SavedFilter], CatalogError> {
        self.filters = self.api.list_saved_filters().await?;
        Ok(&self.filters)
    }

    pub async fn get(&self, id: &str) -> Result<SavedFilter, CatalogError> {
        self.api.get_saved_filter(id).await
    }

    /// Save a snapshot of `criteria` under `name`
    pub async fn create(
        &mut self,
        name: &str,
        criteria: &FilterCriteria,
    ) -> Result<SavedFilter, CatalogError> {
        let name = validate_name(name)?;
        let body = SavedFilterCreate {
            name,
            criteria: criteria.clone(),
        };
        let created = self.api.create_saved_filter(&body).await?;
        tracing::debug!(id = %created.id, name = %created.name, "saved filter created");

        if let Err(err) = self.list().await {
            tracing::debug!(error = %err, "reload after create failed; appending locally");
            self.filters.push(created.clone());
        }
        Ok(created)
    }

    /// Rename and/or replace the criteria of an existing preset
    pub async fn update(
        &mut self,
        id: &str,
        name: Option<&str>,
        criteria: Option<&FilterCriteria>,
    ) -> Result<SavedFilter, CatalogError> {
        let body = SavedFilterUpdate {
            name: name.map(validate_name).transpose()?,
            criteria: criteria.cloned(),
        };
        let updated = self.api.update_saved_filter(id, &body).await?;
        if let Some(slot) = self.filters.iter_mut().find(|f| f.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete unconditionally; confirmation belongs to the caller
    pub async fn delete(&mut self, id: &str) -> Result<(), CatalogError> {
        self.api.delete_saved_filter(id).await?;
        self.filters.retain(|f| f.id != id);
        Ok(())
    }

    /// Criteria to load for `id`, fetching the preset if it is not cached
    pub async fn criteria_for(&self, id: &str) -> Result<FilterCriteria, CatalogError> {
        if let Some(found) = self.find(id) {
            return Ok(found.criteria.clone());
        }
        Ok(self.get(id).await?.criteria)
    }
}

fn validate_name(name: &str) -> Result<String, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::validation("saved filter name must not be empty"));
    }
    Ok(trimmed.to_string())
}
