//! Error reporting for navigation.
//!
//! Failure here is ordinary control flow, not an exception: the `go_*`
//! methods on [`Router`](crate::Router) return `bool` and the `try_*`
//! variants return a [`NavigationError`] describing *why* a navigation was
//! refused. Nothing panics, and a middleware that halts its chain is not an
//! error at all — that halt is the supported veto mechanism.
//!
//! # Examples
//!
//! ```
//! use endpoint_router::{NavigationError, Router};
//!
//! let router = Router::new();
//! let err = router.try_go_to("nowhere").unwrap_err();
//! assert!(matches!(err, NavigationError::UnknownEndpoint { .. }));
//! assert_eq!(err.to_string(), "No endpoint registered under 'nowhere'");
//! ```

use std::fmt;

/// Why a navigation call was refused.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No endpoint is registered under the requested name.
    UnknownEndpoint {
        /// The name that failed to resolve.
        name: String,
    },

    /// The requested endpoint is already on top of the history —
    /// self-transitions are rejected.
    AlreadyCurrent {
        /// The name of the current top endpoint.
        name: String,
    },

    /// Back-navigation needs at least two history entries.
    HistoryTooShallow {
        /// The history depth at the time of the call.
        depth: usize,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::UnknownEndpoint { name } => {
                write!(f, "No endpoint registered under '{}'", name)
            }
            NavigationError::AlreadyCurrent { name } => {
                write!(f, "'{}' is already the current endpoint", name)
            }
            NavigationError::HistoryTooShallow { depth } => {
                write!(f, "History holds {} entries; back-navigation needs 2", depth)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl NavigationError {
    /// Check if the name failed to resolve.
    pub fn is_unknown_endpoint(&self) -> bool {
        matches!(self, NavigationError::UnknownEndpoint { .. })
    }

    /// Check if the target was already current.
    pub fn is_already_current(&self) -> bool {
        matches!(self, NavigationError::AlreadyCurrent { .. })
    }

    /// Check if the history was too shallow to go back.
    pub fn is_history_too_shallow(&self) -> bool {
        matches!(self, NavigationError::HistoryTooShallow { .. })
    }
}
