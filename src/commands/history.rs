// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search history listing and clearing

use std::sync::Arc;

use anyhow::Result;

use catsearch::output::{print_json, render_history};
use catsearch::search::history::SearchHistoryLog;

use super::{print_block, Context};
use crate::cli::OutputFormat;

pub async fn list(ctx: &Context, limit: u32) -> Result<()> {
    let mut log = SearchHistoryLog::new(Arc::clone(&ctx.api));
    let records = log.list(limit).await.map_err(|e| ctx.explain(e))?;

    match ctx.format {
        OutputFormat::Json => print_json(&records, ctx.compact)?,
        OutputFormat::Text => print_block(&render_history(records)),
    }
    Ok(())
}

pub async fn clear(ctx: &Context) -> Result<()> {
    let mut log = SearchHistoryLog::new(Arc::clone(&ctx.api));
    log.clear().await.map_err(|e| ctx.explain(e))?;

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "cleared": true }), ctx.compact)?,
        OutputFormat::Text => ctx.success("Search history cleared"),
    }
    Ok(())
}
