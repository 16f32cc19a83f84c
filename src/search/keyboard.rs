// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyboard navigation over the suggestion list.
//!
//! `selected_index` is -1 when nothing is selected and otherwise a valid
//! index into the current suggestions. Arrow keys saturate at both ends.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Nothing to do for the caller
    None,
    /// Selection moved
    Moved,
    /// Commit this text as the query and dispatch
    Commit(String),
    /// List closed; query untouched
    Closed,
}

#[derive(Debug, Clone)]
pub struct KeyboardNavController {
    suggestions: Vec<String>,
    selected: Option<usize>,
    open: bool,
    blur_grace: Duration,
    close_at: Option<Instant>,
}

impl KeyboardNavController {
    pub fn new(blur_grace: Duration) -> Self {
        Self {
            suggestions: Vec::new(),
            selected: None,
            open: false,
            blur_grace,
            close_at: None,
        }
    }

    /// Replace the suggestion list. Selection resets; the list opens when
    /// there is something to show.
    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.open = !suggestions.is_empty();
        self.suggestions = suggestions;
        self.selected = None;
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selection as -1 (none) or an index
    pub fn selected_index(&self) -> isize {
        self.selected.map_or(-1, |i| i as isize)
    }

    pub fn is_open(&self) -> bool {
        self.open && !self.suggestions.is_empty()
    }

    pub fn handle_key(&mut self, key: NavKey, raw_query: &str) -> NavAction {
        match key {
            NavKey::ArrowDown => {
                let Some(last) = self.suggestions.len().checked_sub(1) else {
                    return NavAction::None;
                };
                self.selected = Some(match self.selected {
                    None => 0,
                    Some(i) => (i + 1).min(last),
                });
                NavAction::Moved
            }
            NavKey::ArrowUp => {
                if self.suggestions.is_empty() {
                    return NavAction::None;
                }
                self.selected = match self.selected {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
                NavAction::Moved
            }
            NavKey::Enter => match self.selected {
                Some(index) => self.commit_at(index),
                None => {
                    let trimmed = raw_query.trim();
                    if trimmed.is_empty() {
                        return NavAction::None;
                    }
                    self.open = false;
                    NavAction::Commit(trimmed.to_string())
                }
            },
            NavKey::Escape => {
                self.open = false;
                self.selected = None;
                NavAction::Closed
            }
        }
    }

    /// Pointer click on a suggestion; same as Enter at that index
    pub fn click(&mut self, index: usize) -> NavAction {
        self.close_at = None;
        self.commit_at(index)
    }

    /// Input lost focus: close after the grace delay so a click can land first
    pub fn blur(&mut self, now: Instant) {
        self.close_at = Some(now + self.blur_grace);
    }

    /// Input gained focus: cancel a pending close and reopen if non-empty
    pub fn focus(&mut self) {
        self.close_at = None;
        if !self.suggestions.is_empty() {
            self.open = true;
        }
    }

    /// Apply a pending blur close once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.close_at {
            Some(deadline) if now >= deadline => {
                self.close_at = None;
                self.open = false;
                true
            }
            _ => false,
        }
    }

    /// Drop suggestions and selection (search bar cleared)
    pub fn reset(&mut self) {
        self.suggestions.clear();
        self.selected = None;
        self.open = false;
        self.close_at = None;
    }

    fn commit_at(&mut self, index: usize) -> NavAction {
        match self.suggestions.get(index) {
            Some(text) => {
                let text = text.clone();
                self.open = false;
                NavAction::Commit(text)
            }
            None => NavAction::None,
        }
    }
}
