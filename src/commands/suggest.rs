// SPDX-License-Identifier: MIT OR Apache-2.0

//! Autocomplete suggestions for a partial query

use std::sync::Arc;

use anyhow::Result;

use catsearch::output::print_json;
use catsearch::search::suggest::{FetchOutcome, SuggestionFetcher};

use super::Context;
use crate::cli::OutputFormat;

/// Run the suggest command. Failures print nothing; suggestions are advisory.
pub async fn run(ctx: &Context, query: &str, limit: usize) -> Result<()> {
    let fetcher = SuggestionFetcher::new(Arc::clone(&ctx.api));
    let suggestions = match fetcher.fetch(query, limit).await {
        FetchOutcome::Applied(suggestions) => suggestions,
        FetchOutcome::Superseded => Vec::new(),
    };

    match ctx.format {
        OutputFormat::Json => print_json(&suggestions, ctx.compact)?,
        OutputFormat::Text => {
            for suggestion in &suggestions {
                println!("{}", suggestion);
            }
        }
    }
    Ok(())
}
