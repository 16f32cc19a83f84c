// SPDX-License-Identifier: MIT OR Apache-2.0

//! catsearch - search and filter orchestration for a personal catalog
//!
//! Shared modules for the catsearch CLI: the catalog API client, the
//! search page session (debounced suggestions, keyboard navigation, filters,
//! saved presets, history and dispatch) and result presentation.

pub mod api;
pub mod config;
pub mod errors;
pub mod model;
pub mod output;
pub mod search;
