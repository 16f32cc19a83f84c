// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag catalog listing

use anyhow::Result;

use catsearch::output::{print_json, render_tags};

use super::{print_block, Context};
use crate::cli::OutputFormat;

pub async fn run(ctx: &Context) -> Result<()> {
    let tags = ctx.api.list_tags().await.map_err(|e| ctx.explain(e))?;

    match ctx.format {
        OutputFormat::Json => print_json(&tags, ctx.compact)?,
        OutputFormat::Text => print_block(&render_tags(&tags)),
    }
    Ok(())
}
