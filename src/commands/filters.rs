// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saved filter management

use std::sync::Arc;

use anyhow::Result;

use catsearch::errors::{suggestions, CatalogError};
use catsearch::output::{describe_criteria, format_date, print_json, render_saved_filters};
use catsearch::search::saved::SavedFilterRegistry;

use super::{criteria_from_args, print_block, Context};
use crate::cli::{FilterArgs, OutputFormat};

fn registry(ctx: &Context) -> SavedFilterRegistry {
    SavedFilterRegistry::new(Arc::clone(&ctx.api))
}

/// Validation errors get the naming hint; everything else goes through `explain`
fn explain(ctx: &Context, err: CatalogError) -> anyhow::Error {
    match err {
        CatalogError::Validation(message) => anyhow::anyhow!(
            "{}\n\n{}",
            message,
            suggestions::empty_filter_name_suggestion()
        ),
        other => ctx.explain(other),
    }
}

pub async fn list(ctx: &Context) -> Result<()> {
    let mut registry = registry(ctx);
    let filters = registry.list().await.map_err(|e| ctx.explain(e))?;

    match ctx.format {
        OutputFormat::Json => print_json(&filters, ctx.compact)?,
        OutputFormat::Text => print_block(&render_saved_filters(filters)),
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: &str) -> Result<()> {
    let filter = registry(ctx).get(id).await.map_err(|e| ctx.explain(e))?;

    match ctx.format {
        OutputFormat::Json => print_json(&filter, ctx.compact)?,
        OutputFormat::Text => {
            println!("{}  {}", filter.id, filter.name);
            println!("  {}", describe_criteria(&filter.criteria));
            println!(
                "  created {}, updated {}",
                format_date(&filter.created_at),
                format_date(&filter.updated_at)
            );
        }
    }
    Ok(())
}

pub async fn save(ctx: &Context, name: &str, args: &FilterArgs) -> Result<()> {
    let criteria = criteria_from_args(args);
    let created = registry(ctx)
        .create(name, &criteria)
        .await
        .map_err(|e| explain(ctx, e))?;

    match ctx.format {
        OutputFormat::Json => print_json(&created, ctx.compact)?,
        OutputFormat::Text => {
            ctx.success(&format!("Saved filter '{}' ({})", created.name, created.id))
        }
    }
    Ok(())
}

pub async fn rename(ctx: &Context, id: &str, name: &str) -> Result<()> {
    let updated = registry(ctx)
        .update(id, Some(name), None)
        .await
        .map_err(|e| explain(ctx, e))?;

    match ctx.format {
        OutputFormat::Json => print_json(&updated, ctx.compact)?,
        OutputFormat::Text => ctx.success(&format!("Renamed {} to '{}'", updated.id, updated.name)),
    }
    Ok(())
}

pub async fn delete(ctx: &Context, id: &str) -> Result<()> {
    registry(ctx).delete(id).await.map_err(|e| ctx.explain(e))?;

    match ctx.format {
        OutputFormat::Json => {
            print_json(&serde_json::json!({ "deleted": id }), ctx.compact)?
        }
        OutputFormat::Text => ctx.success(&format!("Deleted saved filter {}", id)),
    }
    Ok(())
}
