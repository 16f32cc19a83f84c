// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot search or listing

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use catsearch::model::{SearchResult, SortMode};
use catsearch::output::{print_json, ResultPresenter};
use catsearch::search::dispatch::{DispatchMode, SearchDispatcher};
use catsearch::search::saved::SavedFilterRegistry;
use catsearch::search::session::{SessionEvent, SessionState};

use super::{criteria_from_args, Context};
use crate::cli::{FilterArgs, OutputFormat};

pub struct SearchOptions {
    pub query: String,
    pub filters: FilterArgs,
    /// Saved filter id whose criteria replace the filter flags
    pub saved: Option<String>,
    pub sort: Option<SortMode>,
    pub page: u32,
    pub limit: u32,
}

/// JSON output: the dispatch mode next to the raw result
#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    mode: &'static str,
    query: &'a str,
    sort: &'static str,
    #[serde(flatten)]
    result: &'a SearchResult,
}

/// Run the search command
pub async fn run(ctx: &Context, options: SearchOptions) -> Result<()> {
    let criteria = match options.saved.as_deref() {
        Some(id) => SavedFilterRegistry::new(Arc::clone(&ctx.api))
            .criteria_for(id)
            .await
            .map_err(|e| ctx.explain(e))?,
        None => criteria_from_args(&options.filters),
    };

    let mut state = SessionState::default()
        .advance(SessionEvent::QueryCommitted(options.query))
        .advance(SessionEvent::FiltersChanged(criteria));
    if let Some(sort) = options.sort {
        state = state.advance(SessionEvent::SortChanged(sort));
    }
    let state = state.advance(SessionEvent::PageChanged(options.page));

    let dispatcher = SearchDispatcher::new(Arc::clone(&ctx.api), options.limit);
    let mode = dispatcher.plan(&state).mode();
    let result = dispatcher
        .dispatch(&state)
        .await
        .map_err(|e| ctx.explain(e))?;

    match ctx.format {
        OutputFormat::Json => {
            let output = SearchOutput {
                mode: match mode {
                    DispatchMode::Listing => "listing",
                    DispatchMode::Search => "search",
                },
                query: state.query(),
                sort: state.sort().as_str(),
                result: &result,
            };
            print_json(&output, ctx.compact)?;
        }
        OutputFormat::Text => {
            let presenter = ResultPresenter::new(state.query(), ctx.use_color)
                .with_summary_chars(ctx.settings.summary_preview_chars);
            println!("{}", presenter.render_result(&result));
        }
    }

    Ok(())
}
