//! The router: endpoint registry, history, and middleware dispatch.
//!
//! [`Router`] is the central object. It owns three pieces of state:
//!
//! - the **endpoint registry** — name → handle, last registration wins;
//! - the **history** — the stack of endpoints visited so far;
//! - the **registration table** — scope key (`"from->to"`, either side
//!   possibly the wildcard `*`) → [`PhaseHost`] holding three chains.
//!
//! # Dispatch resolution
//!
//! Every successful navigation dispatches one [`Transition`] through a single
//! composed chain. Assembly is phase-major, key-minor: for each phase in
//! `From`, `Middle`, `To`, the four candidate keys are probed in the fixed
//! order `*->*`, `from->*`, `*->to`, `from->to` (skipping the concrete-side
//! forms when that side is itself the wildcard), and every non-empty chain
//! found is spliced onto the tail of the run. The first chain found becomes
//! the head; the last chain's successor link is cleared so a previous
//! dispatch's wiring can never leak into this one.
//!
//! # Re-entrancy
//!
//! All methods take `&self`; internal state sits behind `RefCell`s and no
//! borrow is ever held across a middleware invocation. Middleware is
//! therefore free to register, deregister, and navigate from inside a
//! dispatch. When a nested navigation starts while a chain is mid-flight,
//! the router aborts the outer run: its remaining items never fire and a
//! late `proceed` from it is ignored.
//!
//! # Example
//!
//! ```
//! use endpoint_router::{hook_fn, Endpoint, Phase, Router};
//! use std::rc::Rc;
//!
//! struct Screen(&'static str);
//!
//! impl Endpoint for Screen {
//!     fn name(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let router = Router::new();
//! router.add_endpoint(Rc::new(Screen("home")));
//! router.add_endpoint(Rc::new(Screen("settings")));
//!
//! let _log = router.use_hook(
//!     |transition| println!("{} -> {}", transition.from_label(), transition.to_name()),
//!     None,
//!     None,
//!     Phase::Middle,
//! );
//!
//! assert!(router.go_to("home"));
//! assert!(router.go_to("settings"));
//! assert_eq!(router.history(), vec!["home", "settings"]);
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ResolveCache};
use crate::chain::{Chain, Next, Registration, Run};
use crate::endpoint::{same_endpoint, EndpointRef};
use crate::error::NavigationError;
use crate::history::History;
use crate::middleware::{hook_fn, Middleware};
use crate::phase::{Phase, PhaseHost};
use crate::transition::Transition;
use crate::{debug_log, info_log, trace_log};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The scope symbol matching any endpoint name on either side of a
/// registration key.
pub const WILDCARD: &str = "*";

/// Compose the registration-table key for a `(from, to)` scope pair.
fn scope_key(from: &str, to: &str) -> String {
    format!("{from}->{to}")
}

/// Missing or empty scope names mean "any".
fn normalize(name: Option<&str>) -> &str {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => WILDCARD,
    }
}

// ============================================================================
// Router
// ============================================================================

/// Navigation router over named endpoints with phased, wildcard-scoped
/// middleware.
///
/// Single-threaded and re-entrant: methods take `&self`, and middleware may
/// call back into the router mid-dispatch. The type is deliberately neither
/// `Send` nor `Sync`.
pub struct Router {
    endpoints: RefCell<HashMap<String, EndpointRef>>,
    history: RefCell<History>,
    hosts: RefCell<HashMap<String, Rc<PhaseHost<Transition>>>>,
    active_run: RefCell<Option<Run>>,
    #[cfg(feature = "cache")]
    resolve_cache: RefCell<ResolveCache>,
}

impl Router {
    /// Create a router with no endpoints, no history, and no middleware.
    pub fn new() -> Self {
        Self {
            endpoints: RefCell::new(HashMap::new()),
            history: RefCell::new(History::new()),
            hosts: RefCell::new(HashMap::new()),
            active_run: RefCell::new(None),
            #[cfg(feature = "cache")]
            resolve_cache: RefCell::new(ResolveCache::new()),
        }
    }

    // ========================================================================
    // Endpoint registry
    // ========================================================================

    /// Register an endpoint under its own name. Re-registering a name
    /// replaces the previous handle (last registration wins); entries already
    /// in the history keep their original identity.
    pub fn add_endpoint(&self, endpoint: EndpointRef) {
        let name = endpoint.name().to_string();
        info_log!("Registered endpoint '{}'", name);
        self.endpoints.borrow_mut().insert(name, endpoint);
    }

    /// Whether a name is currently registered.
    pub fn contains_endpoint(&self, name: &str) -> bool {
        self.endpoints.borrow().contains_key(name)
    }

    /// The handle registered under `name`, if any.
    pub fn get_endpoint(&self, name: &str) -> Option<EndpointRef> {
        self.endpoints.borrow().get(name).cloned()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate forward to `name`. Returns `false` when the name is
    /// unregistered or already on top of the history.
    pub fn go_to(&self, name: &str) -> bool {
        self.try_go_to(name).is_ok()
    }

    /// Navigate forward to `name`, reporting why a refused call failed.
    ///
    /// On success the endpoint is pushed onto the history and one transition
    /// is dispatched through the middleware pipeline.
    pub fn try_go_to(&self, name: &str) -> Result<(), NavigationError> {
        let to = self
            .get_endpoint(name)
            .ok_or_else(|| NavigationError::UnknownEndpoint {
                name: name.to_string(),
            })?;

        let from = self.history.borrow().top().cloned();
        if let Some(current) = &from {
            if same_endpoint(current, &to) {
                debug_log!("Navigation to '{}' refused: already current", name);
                return Err(NavigationError::AlreadyCurrent {
                    name: name.to_string(),
                });
            }
        }

        self.history.borrow_mut().push(Rc::clone(&to));
        info_log!(
            "Navigation push: '{}' -> '{}'",
            from.as_ref().map_or(WILDCARD, |from| from.name()),
            name
        );
        self.dispatch(from, to);
        Ok(())
    }

    /// Navigate back one step. Returns `false` when the history holds fewer
    /// than two entries.
    pub fn go_back(&self) -> bool {
        self.try_go_back().is_ok()
    }

    /// Navigate back one step, reporting why a refused call failed.
    ///
    /// Pops the current top (it becomes the transition source) and dispatches
    /// toward the entry underneath; the history shrinks by exactly one.
    pub fn try_go_back(&self) -> Result<(), NavigationError> {
        let (from, to) = {
            let mut history = self.history.borrow_mut();
            if history.len() < 2 {
                return Err(NavigationError::HistoryTooShallow {
                    depth: history.len(),
                });
            }
            let Some(from) = history.pop() else {
                return Err(NavigationError::HistoryTooShallow { depth: 0 });
            };
            let Some(to) = history.top().cloned() else {
                return Err(NavigationError::HistoryTooShallow { depth: 1 });
            };
            (from, to)
        };

        info_log!("Navigation back: '{}' -> '{}'", from.name(), to.name());
        self.dispatch(Some(from), to);
        Ok(())
    }

    /// Navigate back to the topmost occurrence of `name`. Returns `false`
    /// under the same preconditions as [`try_go_back_to`](Self::try_go_back_to).
    pub fn go_back_to(&self, name: &str) -> bool {
        self.try_go_back_to(name).is_ok()
    }

    /// Navigate back to the topmost occurrence of `name`, reporting why a
    /// refused call failed.
    ///
    /// When the target is present in the history, everything above it is
    /// discarded and one transition `{from: prior top, to: target}` is
    /// dispatched. When the target is **absent**, the history is reset to
    /// just the target and **no middleware runs** — that asymmetry is part of
    /// the contract, and the reset still counts as success.
    pub fn try_go_back_to(&self, name: &str) -> Result<(), NavigationError> {
        let to = self
            .get_endpoint(name)
            .ok_or_else(|| NavigationError::UnknownEndpoint {
                name: name.to_string(),
            })?;

        let (from, to) = {
            let mut history = self.history.borrow_mut();
            if history.len() < 2 {
                return Err(NavigationError::HistoryTooShallow {
                    depth: history.len(),
                });
            }
            if let Some(top) = history.top() {
                if same_endpoint(top, &to) {
                    debug_log!("Navigation back to '{}' refused: already current", name);
                    return Err(NavigationError::AlreadyCurrent {
                        name: name.to_string(),
                    });
                }
            }

            if !history.contains(&to) {
                history.clear();
                history.push(Rc::clone(&to));
                info_log!("History reset to '{}': target was not in history", name);
                return Ok(());
            }

            let Some(from) = history.pop() else {
                return Err(NavigationError::HistoryTooShallow { depth: 0 });
            };
            while let Some(popped) = history.pop() {
                if same_endpoint(&popped, &to) {
                    history.push(popped);
                    break;
                }
            }
            (from, to)
        };

        info_log!("Navigation back-to: '{}' -> '{}'", from.name(), name);
        self.dispatch(Some(from), to);
        Ok(())
    }

    /// The entries that `go_back_to(name)` would discard, top-first, without
    /// touching the history or running any middleware.
    ///
    /// Empty under the same preconditions that make `go_back_to` fail. When
    /// the target is absent from the history the entire history is returned
    /// top-to-bottom. `exclude_from` leaves the current top itself out of the
    /// result.
    pub fn path_to_previous(&self, name: &str, exclude_from: bool) -> Vec<EndpointRef> {
        let Some(to) = self.get_endpoint(name) else {
            return Vec::new();
        };

        let history = self.history.borrow();
        if history.len() < 2 {
            return Vec::new();
        }
        if let Some(top) = history.top() {
            if same_endpoint(top, &to) {
                return Vec::new();
            }
        }
        if !history.contains(&to) {
            return history.snapshot_top_down();
        }
        history.path_above(&to, exclude_from)
    }

    /// Names of the visited endpoints, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().names()
    }

    /// The current endpoint, if any navigation has happened.
    pub fn last(&self) -> Option<EndpointRef> {
        self.history.borrow().top().cloned()
    }

    // ========================================================================
    // Middleware registration
    // ========================================================================

    /// Register chain-controlled middleware.
    ///
    /// `from`/`to` scope the registration to transitions whose source or
    /// destination carries that name; `None` (or an empty string) means any.
    /// The returned [`Registration`] removes exactly this entry and is
    /// idempotent.
    pub fn use_middleware<M>(
        &self,
        middleware: M,
        from: Option<&str>,
        to: Option<&str>,
        phase: Phase,
    ) -> Registration
    where
        M: Middleware,
    {
        let key = scope_key(normalize(from), normalize(to));
        let host = Rc::clone(
            self.hosts
                .borrow_mut()
                .entry(key.clone())
                .or_insert_with(|| Rc::new(PhaseHost::new())),
        );

        #[cfg(feature = "cache")]
        self.resolve_cache.borrow_mut().clear();

        debug_log!(
            "Registered {} under '{}' in phase '{}'",
            middleware.name(),
            key,
            phase
        );

        let middleware = Rc::new(middleware);
        host.add_item(
            phase,
            Rc::new(move |transition: Transition, next: &Next<'_, Transition>| {
                middleware.handle(transition, next);
            }),
        )
    }

    /// Register an observer hook that always lets the run proceed.
    ///
    /// Sugar for [`use_middleware`](Self::use_middleware) over
    /// [`hook_fn`](crate::hook_fn).
    pub fn use_hook<F>(
        &self,
        hook: F,
        from: Option<&str>,
        to: Option<&str>,
        phase: Phase,
    ) -> Registration
    where
        F: Fn(&Transition) + 'static,
    {
        self.use_middleware(hook_fn(hook), from, to, phase)
    }

    /// Counters for the dispatch-resolution cache.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.resolve_cache.borrow().stats().clone()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Resolve and run the composed middleware chain for one transition.
    fn dispatch(&self, from: Option<EndpointRef>, to: EndpointRef) {
        let chains = self.resolve_chains(from.as_ref(), &to);
        if chains.is_empty() {
            trace_log!(
                "No middleware matched '{}' -> '{}'",
                from.as_ref().map_or(WILDCARD, |from| from.name()),
                to.name()
            );
            return;
        }

        // Per-dispatch wiring: splice head-to-tail and terminate the run.
        for pair in chains.windows(2) {
            pair[0].connect_next(Some(&pair[1]));
        }
        if let Some(tail) = chains.last() {
            tail.connect_next(None);
        }

        let run = Run::new();
        let previous = self.active_run.borrow_mut().replace(run.clone());
        if let Some(previous) = previous {
            previous.abort();
        }

        debug_log!(
            "Dispatching {} chain(s) for '{}' -> '{}'",
            chains.len(),
            from.as_ref().map_or(WILDCARD, |from| from.name()),
            to.name()
        );

        let transition = Transition { from, to };
        chains[0].call(transition, &run);
    }

    /// Collect the non-empty chains matching a transition, phase-major and
    /// key-minor.
    fn resolve_chains(
        &self,
        from: Option<&EndpointRef>,
        to: &EndpointRef,
    ) -> Vec<Chain<Transition>> {
        let from_name = from.map_or(WILDCARD, |from| from.name());
        let to_name = to.name();

        #[cfg(feature = "cache")]
        let composite = scope_key(from_name, to_name);
        #[cfg(feature = "cache")]
        if let Some(cached) = self.resolve_cache.borrow_mut().get(&composite) {
            return cached;
        }

        let mut keys = Vec::with_capacity(4);
        keys.push(scope_key(WILDCARD, WILDCARD));
        if from_name != WILDCARD {
            keys.push(scope_key(from_name, WILDCARD));
        }
        if to_name != WILDCARD {
            keys.push(scope_key(WILDCARD, to_name));
        }
        if from_name != WILDCARD && to_name != WILDCARD {
            keys.push(scope_key(from_name, to_name));
        }

        let mut chains = Vec::new();
        {
            let hosts = self.hosts.borrow();
            for phase in Phase::ORDER {
                for key in &keys {
                    if let Some(host) = hosts.get(key) {
                        if let Some(chain) = host.chain(phase) {
                            chains.push(chain);
                        }
                    }
                }
            }
        }

        #[cfg(feature = "cache")]
        self.resolve_cache
            .borrow_mut()
            .insert(composite, chains.clone());

        chains
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("endpoints", &self.endpoints.borrow().len())
            .field("history", &self.history.borrow())
            .field("scopes", &self.hosts.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_key_format() {
        assert_eq!(scope_key("a", "b"), "a->b");
        assert_eq!(scope_key(WILDCARD, "b"), "*->b");
    }

    #[test]
    fn test_normalize_treats_missing_and_empty_as_wildcard() {
        assert_eq!(normalize(None), WILDCARD);
        assert_eq!(normalize(Some("")), WILDCARD);
        assert_eq!(normalize(Some("home")), "home");
    }
}
