// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive search session over stdin
//!
//! Plain lines are keystrokes: each replaces the raw query and goes through
//! the debouncer, which feeds suggestion fetches. Lines starting with `/`
//! drive navigation, filters, presets, history and pagination.

use std::io::BufRead;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use tokio::sync::mpsc;

use catsearch::model::{ContentType, SortMode};
use catsearch::output::{
    describe_criteria, print_json, render_history, render_saved_filters, ResultPresenter,
};
use catsearch::search::debounce::QueryDebouncer;
use catsearch::search::filters::FilterField;
use catsearch::search::keyboard::NavKey;
use catsearch::search::suggest::FetchOutcome;
use catsearch::search::{Notice, NoticeLevel, ResultView, SearchPage};

use super::{print_block, Context};
use crate::cli::OutputFormat;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

const HELP: &str = "\
Type text to edit the query. Commands:
  /down /up /enter /esc      navigate suggestions
  /pick N                    choose suggestion N
  /blur /focus               move focus away from or back to the input
  /clear                     clear the query
  /type link|repo|note       toggle content type
  /tag ID                    toggle a tag
  /summary /url              toggle quick filters
  /from DATE /to DATE        set date bounds (YYYY-MM-DD, '-' clears)
  /nofilters                 clear all filters
  /sort relevance|newest|oldest
  /next /prev /page N        paginate
  /saved                     list saved filters
  /save NAME                 save current filters
  /load ID /delete ID        load or delete a saved filter
  /history /history clear    show or clear search history
  /replay N                  rerun the query of history record N
  /refresh                   run the current search again
  /reset                     clear query, filters, sort and page
  /quit";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Input(String),
    Key(NavKey),
    Pick(usize),
    Blur,
    Focus,
    ClearQuery,
    ToggleType(ContentType),
    ToggleTag(String),
    ToggleSummary,
    ToggleUrl,
    DateFrom(Option<NaiveDate>),
    DateTo(Option<NaiveDate>),
    ClearFilters,
    Sort(SortMode),
    NextPage,
    PreviousPage,
    Page(u32),
    ListSaved,
    Save(String),
    Load(String),
    Delete(String),
    History,
    ClearHistory,
    Replay(usize),
    Refresh,
    Reset,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.strip_prefix('/') else {
            return Ok(Self::Input(line.to_string()));
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command.trim(), ""),
        };

        let parsed = match name {
            "down" => Self::Key(NavKey::ArrowDown),
            "up" => Self::Key(NavKey::ArrowUp),
            "enter" => Self::Key(NavKey::Enter),
            "esc" => Self::Key(NavKey::Escape),
            "pick" => Self::Pick(ordinal(arg)?),
            "blur" => Self::Blur,
            "focus" => Self::Focus,
            "clear" => Self::ClearQuery,
            "type" => Self::ToggleType(arg.parse()?),
            "tag" => Self::ToggleTag(required(arg, "tag id")?),
            "summary" => Self::ToggleSummary,
            "url" => Self::ToggleUrl,
            "from" => Self::DateFrom(date(arg)?),
            "to" => Self::DateTo(date(arg)?),
            "nofilters" => Self::ClearFilters,
            "sort" => Self::Sort(arg.parse()?),
            "next" => Self::NextPage,
            "prev" => Self::PreviousPage,
            "page" => Self::Page(
                arg.parse()
                    .map_err(|_| format!("invalid page '{}'", arg))?,
            ),
            "saved" => Self::ListSaved,
            "save" => Self::Save(arg.to_string()),
            "load" => Self::Load(required(arg, "saved filter id")?),
            "delete" => Self::Delete(required(arg, "saved filter id")?),
            "history" if arg == "clear" => Self::ClearHistory,
            "history" => Self::History,
            "replay" => Self::Replay(ordinal(arg)?),
            "refresh" | "retry" => Self::Refresh,
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '/{}' (try /help)", other)),
        };
        Ok(parsed)
    }
}

fn required(arg: &str, what: &str) -> Result<String, String> {
    if arg.is_empty() {
        return Err(format!("missing {}", what));
    }
    Ok(arg.to_string())
}

/// 1-based position to 0-based index
fn ordinal(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("expected a position starting at 1, got '{}'", arg)),
    }
}

fn date(arg: &str) -> Result<Option<NaiveDate>, String> {
    if arg.is_empty() || arg == "-" {
        return Ok(None);
    }
    NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", arg))
}

struct Shell<'a> {
    ctx: &'a Context,
    page: SearchPage,
    debouncer: QueryDebouncer,
    fetch_tx: mpsc::UnboundedSender<FetchOutcome>,
}

/// Run the interactive session until EOF or /quit
pub async fn run(ctx: &Context, initial: String) -> Result<()> {
    let (debouncer, mut settled_rx) = QueryDebouncer::spawn(initial.clone(), ctx.settings.debounce);
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel();

    let mut shell = Shell {
        ctx,
        page: SearchPage::new(Arc::clone(&ctx.api), ctx.settings.clone()),
        debouncer,
        fetch_tx,
    };
    shell.page.bar_mut().input(initial.clone());
    shell.page.commit_query(initial).await;
    shell.show_view();

    let mut lines = spawn_line_reader();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match ShellCommand::parse(&line) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => shell.handle(command).await,
                    Err(message) => eprintln!("{}", message),
                }
                shell.show_notices();
            }
            Some(settled) = settled_rx.recv() => shell.on_settled(settled),
            Some(outcome) = fetch_rx.recv() => {
                if let FetchOutcome::Applied(_) = outcome {
                    shell.page.bar_mut().show_outcome(&outcome);
                    shell.show_suggestions();
                }
            }
            _ = ticker.tick() => {
                if shell.page.bar_mut().poll(Instant::now()) {
                    println!("{}", shell.dim("(suggestions closed)"));
                }
            }
        }
    }

    shell.page.unmount();
    shell.debouncer.shutdown().await;
    Ok(())
}

/// Read stdin on a plain thread so a pending read never holds up exit
fn spawn_line_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

impl Shell<'_> {
    /// A new settled query: record it and fetch suggestions in the background
    fn on_settled(&mut self, settled: String) {
        let bar = self.page.bar_mut();
        bar.settle(settled.clone());
        let fetcher = bar.fetcher();
        let limit = bar.suggestion_limit();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcome = fetcher.fetch(&settled, limit).await;
            let _ = tx.send(outcome);
        });
    }

    async fn handle(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::Input(text) => {
                self.page.bar_mut().input(text.clone());
                self.debouncer.push(text);
            }
            ShellCommand::Key(key) => {
                if self.page.key(key).await.is_some() {
                    self.sync_debouncer();
                    self.show_view();
                } else {
                    self.show_suggestions();
                }
            }
            ShellCommand::Pick(index) => {
                if self.page.click_suggestion(index).await.is_some() {
                    self.sync_debouncer();
                    self.show_view();
                } else {
                    eprintln!("no suggestion at position {}", index + 1);
                }
            }
            ShellCommand::Blur => self.page.bar_mut().blur(Instant::now()),
            ShellCommand::Focus => {
                self.page.bar_mut().focus();
                self.show_suggestions();
            }
            ShellCommand::ClearQuery => {
                self.page.clear_query().await;
                self.sync_debouncer();
                self.show_view();
            }
            ShellCommand::ToggleType(content_type) => {
                self.page.toggle_content_type(content_type).await;
                self.show_filters_and_view();
            }
            ShellCommand::ToggleTag(tag) => {
                self.page.toggle_tag(&tag).await;
                self.show_filters_and_view();
            }
            ShellCommand::ToggleSummary => {
                self.page.toggle_has_summary().await;
                self.show_filters_and_view();
            }
            ShellCommand::ToggleUrl => {
                self.page.toggle_has_url().await;
                self.show_filters_and_view();
            }
            ShellCommand::DateFrom(date) => {
                self.page.set_filter(FilterField::DateFrom(date)).await;
                self.show_filters_and_view();
            }
            ShellCommand::DateTo(date) => {
                self.page.set_filter(FilterField::DateTo(date)).await;
                self.show_filters_and_view();
            }
            ShellCommand::ClearFilters => {
                self.page.clear_filters().await;
                self.show_filters_and_view();
            }
            ShellCommand::Sort(sort) => {
                self.page.set_sort(sort).await;
                self.show_view();
            }
            ShellCommand::NextPage => {
                self.page.next_page().await;
                self.show_view();
            }
            ShellCommand::PreviousPage => {
                self.page.previous_page().await;
                self.show_view();
            }
            ShellCommand::Page(page) => {
                self.page.goto_page(page).await;
                self.show_view();
            }
            ShellCommand::ListSaved => {
                if let Ok(filters) = self.page.load_saved_filters().await {
                    print_block(&render_saved_filters(filters));
                }
            }
            ShellCommand::Save(name) => {
                let _ = self.page.save_filters(&name).await;
            }
            ShellCommand::Load(id) => {
                if self.page.load_saved_filter(&id).await.is_ok() {
                    self.show_filters_and_view();
                }
            }
            ShellCommand::Delete(id) => {
                let _ = self.page.delete_saved_filter(&id).await;
            }
            ShellCommand::History => {
                if self.page.load_history().await.is_ok() {
                    print_block(&render_history(self.page.history().records()));
                }
            }
            ShellCommand::ClearHistory => {
                let _ = self.page.clear_history().await;
            }
            ShellCommand::Replay(index) => {
                if self.page.replay_history(index).await.is_some() {
                    self.sync_debouncer();
                    self.show_view();
                } else {
                    eprintln!("no history record at position {} (run /history first)", index + 1);
                }
            }
            ShellCommand::Refresh => {
                self.page.refresh().await;
                self.show_view();
            }
            ShellCommand::Reset => {
                self.page.clear_all().await;
                self.sync_debouncer();
                self.show_view();
            }
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => {}
        }
    }

    /// Keep the debouncer's raw value in step with text set by commits
    fn sync_debouncer(&self) {
        let raw = self.page.bar().query().raw.clone();
        if self.debouncer.raw() != raw {
            self.debouncer.push(raw);
        }
    }

    fn show_view(&self) {
        let view = self.page.view();
        if self.ctx.format == OutputFormat::Json {
            if let ResultView::Ready(result) = view {
                let _ = print_json(result, true);
                return;
            }
        }
        let presenter = ResultPresenter::new(self.page.session().query(), self.ctx.use_color)
            .with_summary_chars(self.ctx.settings.summary_preview_chars);
        print_block(&presenter.render_view(view));
    }

    fn show_filters_and_view(&self) {
        println!(
            "{}",
            self.dim(&format!("filters: {}", describe_criteria(self.page.filters().criteria())))
        );
        self.show_view();
    }

    fn show_suggestions(&self) {
        let nav = self.page.bar().nav();
        if !nav.is_open() {
            return;
        }
        for (index, suggestion) in nav.suggestions().iter().enumerate() {
            let marker = if nav.selected() == Some(index) { ">" } else { " " };
            let line = format!("{} {}. {}", marker, index + 1, suggestion);
            if nav.selected() == Some(index) && self.ctx.use_color {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }

    fn show_notices(&mut self) {
        for Notice { level, message } in self.page.take_notices() {
            match level {
                NoticeLevel::Success => self.ctx.success(&message),
                NoticeLevel::Error if self.ctx.use_color => {
                    eprintln!("{} {}", "✗".red(), message)
                }
                NoticeLevel::Error => eprintln!("✗ {}", message),
            }
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.ctx.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
