// SPDX-License-Identifier: MIT OR Apache-2.0

//! catsearch - search and filter a personal catalog from the terminal
//!
//! Drives the catsearch search layer against the catalog HTTP API.

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, FilterCommands, HistoryCommands, OutputFormat};
use tracing_subscriber::EnvFilter;

use catsearch::config::{Config, ConfigOutputFormat};

const LOG_ENV: &str = "CATSEARCH_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config and merge with CLI options (CLI wins)
    let config = Config::load();
    let format = cli.format.unwrap_or(match config.output_format() {
        Some(ConfigOutputFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Text,
    });

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "catsearch", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = commands::Context::new(
        &config,
        cli.api_url.as_deref(),
        cli.token.as_deref(),
        format,
        cli.compact,
    )?;

    match cli.command {
        Commands::Search {
            query,
            filters,
            saved,
            sort,
            page,
            limit,
        } => {
            let options = commands::search::SearchOptions {
                query: query.unwrap_or_default(),
                filters,
                saved,
                sort: sort.map(Into::into),
                page,
                limit: config.merge_page_size(limit),
            };
            commands::search::run(&ctx, options).await?;
        }
        Commands::Suggest { query, limit } => {
            let limit = limit.unwrap_or(ctx.settings.suggestion_limit);
            commands::suggest::run(&ctx, &query, limit).await?;
        }
        Commands::History { limit, action } => match action {
            Some(HistoryCommands::Clear) => commands::history::clear(&ctx).await?,
            None => commands::history::list(&ctx, config.merge_history_limit(limit)).await?,
        },
        Commands::Filters { action } => match action {
            FilterCommands::List => commands::filters::list(&ctx).await?,
            FilterCommands::Show { id } => commands::filters::show(&ctx, &id).await?,
            FilterCommands::Save { name, filters } => {
                commands::filters::save(&ctx, &name, &filters).await?
            }
            FilterCommands::Rename { id, name } => {
                commands::filters::rename(&ctx, &id, &name).await?
            }
            FilterCommands::Delete { id } => commands::filters::delete(&ctx, &id).await?,
        },
        Commands::Tags => commands::tags::run(&ctx).await?,
        Commands::Shell { query } => {
            commands::shell::run(&ctx, query.unwrap_or_default()).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let directives = log_directives(verbose, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--verbose` forces debug; otherwise `CATSEARCH_LOG`, falling back to warn.
fn log_directives(verbose: bool, env: Option<String>) -> String {
    if verbose {
        return "catsearch=debug".to_string();
    }
    env.filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| "warn".to_string())
}
