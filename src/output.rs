// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result presentation
//!
//! Query-term highlighting, score/summary/date formatting and the text and
//! JSON renderings used by the CLI.

use std::fmt::Write as _;
use std::io::IsTerminal;

use chrono::{DateTime, Utc};
use colored::Colorize;
use regex::RegexBuilder;
use serde::Serialize;

use crate::model::{
    Entry, FilterCriteria, HistoryRecord, Pagination, SavedFilter, SearchResult, Tag,
};
use crate::search::ResultView;

/// Default summary preview length (chars) in result lists
pub const SUMMARY_PREVIEW_CHARS: usize = 150;

/// A run of text, emphasized when it matched the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: false,
        }
    }

    fn emphasized(text: &str) -> Self {
        Self {
            text: text.to_string(),
            emphasized: true,
        }
    }
}

/// Split `text` on every case-insensitive, non-overlapping occurrence of
/// `query` taken as a literal. Original casing is preserved.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    if query.is_empty() || text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let re = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return vec![Segment::plain(text)],
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::plain(&text[last..m.start()]));
        }
        segments.push(Segment::emphasized(m.as_str()));
        last = m.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[last..]));
    }
    segments
}

/// Join segments back into a line, coloring emphasized runs
pub fn render_segments(segments: &[Segment], use_color: bool) -> String {
    segments
        .iter()
        .map(|s| {
            if s.emphasized && use_color {
                colorize_match(&s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

/// Relevance score with exactly two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Keep the first `max_chars` chars and mark the cut with "..."
pub fn truncate_with_ellipsis(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// "Mar 5, 2024"
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

pub fn tag_count_label(count: usize) -> String {
    if count == 1 {
        "1 tag".to_string()
    } else {
        format!("{} tags", count)
    }
}

pub fn page_footer(pagination: &Pagination) -> String {
    format!("Page {} of {}", pagination.page, pagination.pages.max(1))
}

/// Whether stdout should carry ANSI colors
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

pub fn colorize_match(text: &str) -> String {
    text.yellow().bold().to_string()
}

/// Print a serializable value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", rendered);
    Ok(())
}

/// Renders result views as text for a given query
#[derive(Debug, Clone)]
pub struct ResultPresenter {
    query: String,
    use_color: bool,
    summary_chars: usize,
}

impl ResultPresenter {
    pub fn new(query: impl Into<String>, use_color: bool) -> Self {
        Self {
            query: query.into(),
            use_color,
            summary_chars: SUMMARY_PREVIEW_CHARS,
        }
    }

    pub fn with_summary_chars(mut self, chars: usize) -> Self {
        self.summary_chars = chars;
        self
    }

    /// Loading, error, empty and results are all rendered differently
    pub fn render_view(&self, view: &ResultView) -> String {
        match view {
            ResultView::Idle => String::new(),
            ResultView::Loading => self.dim("Loading..."),
            ResultView::Failed(message) => self.render_error(message),
            ResultView::Ready(result) => self.render_result(result),
        }
    }

    pub fn render_error(&self, message: &str) -> String {
        let mark = if self.use_color {
            "✗".red().to_string()
        } else {
            "✗".to_string()
        };
        format!("{} Failed to load entries: {}", mark, message)
    }

    pub fn render_result(&self, result: &SearchResult) -> String {
        if result.entries.is_empty() {
            return self.render_empty();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {}",
            result.pagination.total,
            if result.pagination.total == 1 { "entry" } else { "entries" }
        );
        for entry in &result.entries {
            out.push('\n');
            out.push_str(&self.render_entry(entry, result.relevance_for(&entry.id)));
        }
        out.push('\n');
        out.push_str(&self.render_footer(&result.pagination));
        out
    }

    pub fn render_entry(&self, entry: &Entry, score: Option<f64>) -> String {
        let mut out = String::new();
        let label = format!("[{}]", entry.content_type);
        let title = render_segments(&highlight(&entry.title, self.query.trim()), self.use_color);
        let _ = write!(out, "{} {}", self.dim(&label), title);
        if let Some(score) = score {
            let _ = write!(out, "  {}", self.dim(&format!("({})", format_score(score))));
        }
        out.push('\n');

        if let Some(url) = entry.url.as_deref().filter(|u| !u.is_empty()) {
            let url = if self.use_color {
                url.cyan().to_string()
            } else {
                url.to_string()
            };
            let _ = writeln!(out, "  {}", url);
        }

        if let Some(summary) = entry.ai_summary.as_deref().filter(|s| !s.is_empty()) {
            let preview = truncate_with_ellipsis(summary, self.summary_chars);
            let preview = render_segments(&highlight(&preview, self.query.trim()), self.use_color);
            let _ = writeln!(out, "  {}", preview);
        }

        let tag_count = entry.tags.as_ref().map_or(0, Vec::len);
        let mut meta = format_date(&entry.created_at);
        if tag_count > 0 {
            meta.push_str(" · ");
            meta.push_str(&tag_count_label(tag_count));
        }
        let _ = writeln!(out, "  {}", self.dim(&meta));
        out
    }

    pub fn render_footer(&self, pagination: &Pagination) -> String {
        let mut footer = page_footer(pagination);
        let mut nav = Vec::new();
        if pagination.has_previous() {
            nav.push("previous");
        }
        if pagination.has_next() {
            nav.push("next");
        }
        if !nav.is_empty() {
            let _ = write!(footer, " ({} available)", nav.join(", "));
        }
        self.dim(&footer)
    }

    fn render_empty(&self) -> String {
        if self.query.trim().is_empty() {
            "No entries found".to_string()
        } else {
            format!("No results for \"{}\"", self.query.trim())
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn render_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "No search history".to_string();
    }
    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}  ({} results, {})",
            index + 1,
            record.query,
            record.result_count,
            format_date(&record.created_at)
        );
    }
    out
}

/// One-line summary of active criteria, e.g. `type=link tags=a,b has-url`
pub fn describe_criteria(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if let Some(content_type) = criteria.content_type {
        parts.push(format!("type={}", content_type));
    }
    if !criteria.tags.is_empty() {
        let tags: Vec<&str> = criteria.tags.iter().map(String::as_str).collect();
        parts.push(format!("tags={}", tags.join(",")));
    }
    if let Some(from) = criteria.date_from {
        parts.push(format!("from={}", from));
    }
    if let Some(to) = criteria.date_to {
        parts.push(format!("to={}", to));
    }
    if criteria.has_summary {
        parts.push("has-summary".to_string());
    }
    if criteria.has_url {
        parts.push("has-url".to_string());
    }
    if parts.is_empty() {
        "no filters".to_string()
    } else {
        parts.join(" ")
    }
}

pub fn render_saved_filters(filters: &[SavedFilter]) -> String {
    if filters.is_empty() {
        return "No saved filters".to_string();
    }
    let mut out = String::new();
    for filter in filters {
        let _ = writeln!(
            out,
            "{}  {}  [{}]  saved {}",
            filter.id,
            filter.name,
            describe_criteria(&filter.criteria),
            format_date(&filter.created_at)
        );
    }
    out
}

pub fn render_tags(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "No tags".to_string();
    }
    let mut out = String::new();
    for tag in tags {
        match tag.color.as_deref() {
            Some(color) => {
                let _ = writeln!(out, "{}  {}  {}", tag.id, tag.name, color);
            }
            None => {
                let _ = writeln!(out, "{}  {}", tag.id, tag.name);
            }
        }
    }
    out
}
