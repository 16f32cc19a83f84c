// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types with helpful suggestions
//!
//! Every fallible catalog operation reports one of three failures: a
//! request rejected before it left the client, a transport or server
//! failure, or a resource that no longer exists.

use thiserror::Error;

/// Why a request failed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// No connection to the server could be made
    Connect,
    /// The server answered with this non-success status
    Status(u16),
    /// The response body could not be decoded
    Body,
    Transport,
}

/// Errors raised by catalog operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Input rejected locally; no request was sent
    #[error("{0}")]
    Validation(String),

    /// Unreachable server, non-success status, or an undecodable body
    #[error("request failed: {message}")]
    Network {
        failure: NetworkFailure,
        message: String,
    },

    /// The server answered 404 for a specific resource
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            failure: NetworkFailure::Transport,
            message: message.into(),
        }
    }

    /// The server answered with a non-success, non-404 status
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Network {
            failure: NetworkFailure::Status(code),
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// The request never reached the server
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Network {
                failure: NetworkFailure::Connect,
                ..
            }
        )
    }

    /// The server answered 401 or 403
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Network {
                failure: NetworkFailure::Status(401 | 403),
                ..
            }
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        let (failure, message) = if err.is_decode() {
            (NetworkFailure::Body, format!("invalid response body: {}", err))
        } else if err.is_connect() {
            (NetworkFailure::Connect, format!("cannot connect: {}", err))
        } else if let Some(status) = err.status() {
            (NetworkFailure::Status(status.as_u16()), err.to_string())
        } else {
            (NetworkFailure::Transport, err.to_string())
        };
        Self::Network { failure, message }
    }
}

/// Helper functions for creating helpful error messages
pub mod suggestions {
    /// Hint shown when the catalog API cannot be reached
    pub fn unreachable_api_suggestion(api_url: &str) -> String {
        format!(
            "Could not reach the catalog API at '{}'\n\n\
             Check that the server is running, or point catsearch at it:\n\
             $ catsearch --api-url http://host:8000/api/v1 search \"query\"\n\n\
             Or set it once in .catsearchrc.toml:\n\
             api_url = \"http://host:8000/api/v1\"",
            api_url
        )
    }

    /// Hint shown when the server rejects the request as unauthenticated
    pub fn missing_token_suggestion() -> String {
        "The catalog API rejected the request as unauthenticated.\n\n\
         Provide an access token:\n\
         $ export CATSEARCH_TOKEN=<token>\n\n\
         Or add it to ~/.config/catsearch/config.toml:\n\
         token = \"<token>\""
            .to_string()
    }

    /// Hint shown for an empty saved-filter name
    pub fn empty_filter_name_suggestion() -> String {
        "Saved filters need a name.\n\n\
         Example: catsearch filters save \"Rust links\" --type link --tag <tag-id>"
            .to_string()
    }
}
