//! Test utilities for router and middleware tests.
//!
//! Provides an endpoint fixture, a router factory, and a call recorder shared
//! by the integration suites.

#![allow(dead_code)]

use endpoint_router::{EndpointRef, Router, Transition};
use std::cell::RefCell;
use std::rc::Rc;

/// Minimal endpoint fixture: a named screen.
pub struct Screen {
    name: String,
}

impl Screen {
    pub fn new(name: &str) -> EndpointRef {
        Rc::new(Self {
            name: name.to_string(),
        })
    }
}

impl endpoint_router::Endpoint for Screen {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared record of middleware invocations, in execution order.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// A router with one `Screen` registered per name.
pub fn router_with(names: &[&str]) -> Router {
    let router = Router::new();
    for name in names {
        router.add_endpoint(Screen::new(name));
    }
    router
}

/// Render a transition as `from->to`, with `*` standing in for a missing
/// source.
pub fn describe(transition: &Transition) -> String {
    format!("{}->{}", transition.from_label(), transition.to_name())
}

/// Names of the endpoints in a path result, in order.
pub fn names_of(path: &[EndpointRef]) -> Vec<String> {
    path.iter().map(|entry| entry.name().to_string()).collect()
}
