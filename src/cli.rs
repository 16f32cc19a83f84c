// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use catsearch::model::{ContentType, SortMode};

/// catsearch - search your catalog of links, repos and notes
///
/// Runs searches and listings against the catalog API, with filters,
/// saved filter presets, search history and autocomplete suggestions.
#[derive(Parser, Debug)]
#[command(name = "catsearch")]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Quickstart:\n  catsearch s \"rust async\" --type link\n  catsearch filters save \"Rust links\" --type link --tag rust\n  catsearch shell"
)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Compact JSON output (no pretty formatting)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Catalog API base URL (overrides config and CATSEARCH_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token (overrides config and CATSEARCH_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Content type filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliContentType {
    Link,
    Repo,
    Note,
}

impl From<CliContentType> for ContentType {
    fn from(value: CliContentType) -> Self {
        match value {
            CliContentType::Link => ContentType::Link,
            CliContentType::Repo => ContentType::Repo,
            CliContentType::Note => ContentType::Note,
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliSort {
    /// Best match first (listing mode falls back to newest)
    #[default]
    Relevance,
    Newest,
    Oldest,
}

impl From<CliSort> for SortMode {
    fn from(value: CliSort) -> Self {
        match value {
            CliSort::Relevance => SortMode::Relevance,
            CliSort::Newest => SortMode::Newest,
            CliSort::Oldest => SortMode::Oldest,
        }
    }
}

/// Filter flags shared by `search` and `filters save`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only entries of this content type
    #[arg(short = 't', long = "type", value_enum, help_heading = "Filters")]
    pub content_type: Option<CliContentType>,

    /// Only entries carrying this tag id (repeatable)
    #[arg(long = "tag", value_name = "TAG_ID", help_heading = "Filters")]
    pub tags: Vec<String>,

    /// Created on or after this date (YYYY-MM-DD)
    #[arg(long = "from", value_name = "DATE", help_heading = "Filters")]
    pub date_from: Option<NaiveDate>,

    /// Created on or before this date (YYYY-MM-DD)
    #[arg(long = "to", value_name = "DATE", help_heading = "Filters")]
    pub date_to: Option<NaiveDate>,

    /// Only entries with an AI summary
    #[arg(long, help_heading = "Filters")]
    pub has_summary: bool,

    /// Only entries with a URL
    #[arg(long, help_heading = "Filters")]
    pub has_url: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// Delete all search history
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// List saved filters
    #[command(visible_aliases = ["ls"])]
    List,

    /// Show one saved filter
    Show {
        /// Saved filter id
        id: String,
    },

    /// Save the given filter flags under a name
    #[command(visible_aliases = ["add"])]
    Save {
        /// Preset name
        name: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Rename a saved filter
    Rename {
        /// Saved filter id
        id: String,
        /// New name
        name: String,
    },

    /// Delete a saved filter
    #[command(visible_aliases = ["rm"])]
    Delete {
        /// Saved filter id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search entries (lists entries when no query or filter is given)
    #[command(
        visible_aliases = ["s", "find"],
        after_help = "Examples:\n  catsearch s \"rust async\"\n  catsearch search --type repo --tag t1 --sort newest\n  catsearch search --saved f1 -P 2"
    )]
    Search {
        /// Search query
        query: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Start from a saved filter (replaces the filter flags)
        #[arg(long, value_name = "ID", conflicts_with_all = ["content_type", "tags", "date_from", "date_to", "has_summary", "has_url"])]
        saved: Option<String>,

        /// Result ordering
        #[arg(short, long, value_enum)]
        sort: Option<CliSort>,

        /// Result page (1-based)
        #[arg(short = 'P', long, default_value = "1")]
        page: u32,

        /// Entries per page
        #[arg(short = 'm', long = "limit")]
        limit: Option<u32>,
    },

    /// Autocomplete suggestions for a partial query
    Suggest {
        /// Partial query (at least 2 characters)
        query: String,

        /// Maximum suggestions
        #[arg(short = 'm', long = "limit")]
        limit: Option<usize>,
    },

    /// Show recent searches
    #[command(visible_aliases = ["h"])]
    History {
        /// Number of records to show
        #[arg(short = 'm', long = "limit")]
        limit: Option<u32>,

        #[command(subcommand)]
        action: Option<HistoryCommands>,
    },

    /// Manage saved filter presets
    #[command(visible_aliases = ["f"])]
    Filters {
        #[command(subcommand)]
        action: FilterCommands,
    },

    /// List the tag catalog
    Tags,

    /// Interactive search session on stdin
    #[command(visible_aliases = ["i"])]
    Shell {
        /// Initial query
        query: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
