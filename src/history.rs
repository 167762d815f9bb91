//! Navigation history.
//!
//! A stack of endpoint handles, most recent on top, representing the path the
//! application has taken so far. The same endpoint may appear more than once
//! (revisits). Membership and truncation are **identity**-based — two entries
//! are the same endpoint only when they are the same object, never because
//! their names match.
//!
//! Only the router's navigation operations mutate a history; everything else
//! reads it.

use crate::endpoint::{same_endpoint, EndpointRef};
use std::rc::Rc;

/// Stack of endpoint handles, most recent on top.
#[derive(Default)]
pub struct History {
    entries: Vec<EndpointRef>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no navigation has happened yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push a new top entry.
    pub fn push(&mut self, endpoint: EndpointRef) {
        self.entries.push(endpoint);
    }

    /// Pop the top entry.
    pub fn pop(&mut self) -> Option<EndpointRef> {
        self.entries.pop()
    }

    /// The current top entry.
    pub fn top(&self) -> Option<&EndpointRef> {
        self.entries.last()
    }

    /// Whether `endpoint` (by identity) appears anywhere in the stack.
    pub fn contains(&self, endpoint: &EndpointRef) -> bool {
        self.entries
            .iter()
            .any(|entry| same_endpoint(entry, endpoint))
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entry names oldest-first — the order the application visited them.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.name().to_string())
            .collect()
    }

    /// All entries, top of the stack first.
    pub fn snapshot_top_down(&self) -> Vec<EndpointRef> {
        self.entries.iter().rev().map(Rc::clone).collect()
    }

    /// The entries strictly above the topmost occurrence of `target`,
    /// top-first, optionally leaving out the current top itself.
    ///
    /// When `target` does not appear at all this returns everything the
    /// traversal saw, which callers are expected to have ruled out via
    /// [`contains`](Self::contains).
    pub fn path_above(&self, target: &EndpointRef, exclude_top: bool) -> Vec<EndpointRef> {
        let skip = usize::from(exclude_top);
        self.entries
            .iter()
            .rev()
            .skip(skip)
            .take_while(|entry| !same_endpoint(entry, target))
            .map(Rc::clone)
            .collect()
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.name()))
            .finish()
    }
}
