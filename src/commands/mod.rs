// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command runners for the catsearch binary

pub mod filters;
pub mod history;
pub mod search;
pub mod shell;
pub mod suggest;
pub mod tags;

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use catsearch::api::{CatalogApi, HttpCatalogApi};
use catsearch::config::{Config, SearchSettings};
use catsearch::errors::{suggestions, CatalogError};
use catsearch::model::FilterCriteria;
use catsearch::output::use_colors;
use catsearch::search::filters::{FilterField, FilterStore};

use crate::cli::{FilterArgs, OutputFormat};

/// Everything a command needs: the API handle and resolved settings
pub struct Context {
    pub api: Arc<dyn CatalogApi>,
    pub api_url: String,
    pub settings: SearchSettings,
    pub format: OutputFormat,
    pub compact: bool,
    pub use_color: bool,
}

impl Context {
    pub fn new(
        config: &Config,
        cli_api_url: Option<&str>,
        cli_token: Option<&str>,
        format: OutputFormat,
        compact: bool,
    ) -> Result<Self> {
        let http = config.merge_http(cli_api_url, cli_token);
        let api_url = http.base_url.clone();
        let api = HttpCatalogApi::new(http)?;
        Ok(Self {
            api: Arc::new(api),
            api_url,
            settings: config.search_settings(),
            format,
            compact,
            use_color: format == OutputFormat::Text && use_colors(),
        })
    }

    /// Attach an actionable hint to a catalog error
    pub fn explain(&self, err: CatalogError) -> anyhow::Error {
        if err.is_unreachable() {
            return anyhow::anyhow!(
                "{}\n\n{}",
                err,
                suggestions::unreachable_api_suggestion(&self.api_url)
            );
        }
        if err.is_unauthorized() {
            return anyhow::anyhow!("{}\n\n{}", err, suggestions::missing_token_suggestion());
        }
        anyhow::Error::new(err)
    }

    /// Confirmation line for a completed write
    pub fn success(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "✓".green(), message);
        } else {
            println!("✓ {}", message);
        }
    }
}

/// Print a rendered block, ending with exactly one newline
pub fn print_block(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Build criteria from CLI filter flags through the filter store, so
/// inactive flags never appear in the result
pub fn criteria_from_args(args: &FilterArgs) -> FilterCriteria {
    let mut store = FilterStore::new();
    store.set(FilterField::ContentType(args.content_type.map(Into::into)));
    store.set(FilterField::Tags(args.tags.iter().cloned().collect()));
    store.set(FilterField::DateFrom(args.date_from));
    store.set(FilterField::DateTo(args.date_to));
    store.set(FilterField::HasSummary(args.has_summary));
    store.set(FilterField::HasUrl(args.has_url));
    store.criteria().clone()
}
