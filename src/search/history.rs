// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-recorded search history.
//!
//! Records are read-only apart from bulk deletion. Replaying a record
//! restores its query text only; filters and sort are not part of the
//! persisted shape.

use std::sync::Arc;

use crate::api::CatalogApi;
use crate::errors::CatalogError;
use crate::model::HistoryRecord;

pub struct SearchHistoryLog {
    api: Arc<dyn CatalogApi>,
    records: Vec<HistoryRecord>,
}

impl SearchHistoryLog {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Fetch the `limit` most recent records, most recent first
    pub async fn list(&mut self, limit: u32) -> Result<&[HistoryRecord], CatalogError> {
        self.records = self.api.search_history(limit).await?;
        Ok(&self.records)
    }

    /// Delete every record; the visible list empties once the server agrees
    pub async fn clear(&mut self) -> Result<(), CatalogError> {
        self.api.clear_search_history().await?;
        self.records.clear();
        Ok(())
    }

    /// Query text to replay for the record at `index`
    pub fn replay(&self, index: usize) -> Option<&str> {
        self.records.get(index).map(|r| r.query.as_str())
    }
}
