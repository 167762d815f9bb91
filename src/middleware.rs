//! Middleware for cross-cutting transition concerns.
//!
//! Middleware runs around every matching transition. Each item receives the
//! [`Transition`] and a [`Next`] continuation; calling
//! [`proceed`](Next::proceed) hands the transition to the next item in the
//! composed run. An item that returns without proceeding halts everything
//! behind it — later registrations **and** later phases — which is the
//! supported way to veto a transition. That halt is silent and deliberate,
//! not an error.
//!
//! All execution is **synchronous** — the router is a single-threaded,
//! re-entrant component and a dispatch is one call stack.
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`Middleware`] | Full control, named for log output |
//! | [`middleware_fn`] | Quick chain-controlled step from a closure |
//! | [`hook_fn`] | Observer that never vetoes; proceeds automatically |
//!
//! # Example
//!
//! ```
//! use endpoint_router::{middleware_fn, Middleware, Next, Transition};
//!
//! struct BlockSettings;
//!
//! impl Middleware for BlockSettings {
//!     fn handle(&self, transition: Transition, next: &Next<'_, Transition>) {
//!         if transition.to_name() == "settings" {
//!             return; // veto: the rest of the run never fires
//!         }
//!         next.proceed(transition);
//!     }
//! }
//!
//! let logging = middleware_fn(|transition: Transition, next: &Next<'_, Transition>| {
//!     println!("{} -> {}", transition.from_label(), transition.to_name());
//!     next.proceed(transition);
//! });
//! ```

use crate::chain::Next;
use crate::transition::Transition;

// ============================================================================
// Middleware trait
// ============================================================================

/// A callback invoked around matching transitions.
///
/// Implementors decide whether the composed run continues: call
/// [`Next::proceed`] to keep going, or return without it to halt.
pub trait Middleware: 'static {
    /// Handle one transition. The remainder of the run only executes if this
    /// method calls `next.proceed(transition)`.
    fn handle(&self, transition: Transition, next: &Next<'_, Transition>);

    /// Middleware name for log output.
    fn name(&self) -> &'static str {
        "Middleware"
    }
}

// ============================================================================
// middleware_fn helper
// ============================================================================

/// Create chain-controlled middleware from a closure.
///
/// The closure receives the transition and the continuation and is fully in
/// charge of whether the run proceeds.
///
/// # Example
///
/// ```
/// use endpoint_router::{middleware_fn, Next, Transition};
///
/// let mw = middleware_fn(|transition: Transition, next: &Next<'_, Transition>| {
///     // inspect, redirect, or veto here
///     next.proceed(transition);
/// });
/// ```
pub const fn middleware_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(Transition, &Next<'_, Transition>) + 'static,
{
    FnMiddleware { f }
}

/// Middleware created from a closure via [`middleware_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(Transition, &Next<'_, Transition>) + 'static,
{
    fn handle(&self, transition: Transition, next: &Next<'_, Transition>) {
        (self.f)(transition, next);
    }

    fn name(&self) -> &'static str {
        "FnMiddleware"
    }
}

// ============================================================================
// hook_fn helper
// ============================================================================

/// Create observer middleware that always proceeds.
///
/// The hook sees the transition but holds no continuation, so it cannot halt
/// the run — handy for logging, metrics, and other fire-and-forget concerns.
///
/// # Example
///
/// ```
/// use endpoint_router::hook_fn;
///
/// let hook = hook_fn(|transition| {
///     println!("saw {} -> {}", transition.from_label(), transition.to_name());
/// });
/// ```
pub const fn hook_fn<F>(f: F) -> FnHook<F>
where
    F: Fn(&Transition) + 'static,
{
    FnHook { f }
}

/// Observer middleware created via [`hook_fn`].
pub struct FnHook<F> {
    f: F,
}

impl<F> Middleware for FnHook<F>
where
    F: Fn(&Transition) + 'static,
{
    fn handle(&self, transition: Transition, next: &Next<'_, Transition>) {
        (self.f)(&transition);
        next.proceed(transition);
    }

    fn name(&self) -> &'static str {
        "FnHook"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Chain, Run};
    use crate::endpoint::{Endpoint, EndpointRef};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Screen(&'static str);

    impl Endpoint for Screen {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn transition(from: &'static str, to: &'static str) -> Transition {
        let from: EndpointRef = Rc::new(Screen(from));
        let to: EndpointRef = Rc::new(Screen(to));
        Transition::with_from(from, to)
    }

    fn chain_with<M: Middleware>(middleware: M) -> (Chain<Transition>, Rc<RefCell<Vec<String>>>) {
        let chain = Chain::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let shared = Rc::new(middleware);
        let _first = chain.add_item(Rc::new(
            move |transition: Transition, next: &Next<'_, Transition>| {
                shared.handle(transition, next);
            },
        ));

        let log_tail = Rc::clone(&log);
        let _tail = chain.add(move |transition: Transition, next: &Next<'_, Transition>| {
            log_tail.borrow_mut().push(format!("tail:{}", transition.to_name()));
            next.proceed(transition);
        });

        (chain, log)
    }

    #[test]
    fn test_middleware_fn_controls_continuation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_mw = Rc::clone(&seen);
        let (chain, log) = chain_with(middleware_fn(
            move |transition: Transition, next: &Next<'_, Transition>| {
                seen_in_mw.borrow_mut().push(transition.to_name().to_string());
                next.proceed(transition);
            },
        ));

        chain.call(transition("a", "b"), &Run::new());

        assert_eq!(*seen.borrow(), vec!["b"]);
        assert_eq!(*log.borrow(), vec!["tail:b"]);
    }

    #[test]
    fn test_middleware_can_veto_by_not_proceeding() {
        let (chain, log) = chain_with(middleware_fn(
            |_transition: Transition, _next: &Next<'_, Transition>| {},
        ));

        chain.call(transition("a", "b"), &Run::new());

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_hook_always_proceeds() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_hook = Rc::clone(&seen);
        let (chain, log) = chain_with(hook_fn(move |transition: &Transition| {
            seen_in_hook
                .borrow_mut()
                .push(format!("{}->{}", transition.from_label(), transition.to_name()));
        }));

        chain.call(transition("a", "b"), &Run::new());

        assert_eq!(*seen.borrow(), vec!["a->b"]);
        assert_eq!(*log.borrow(), vec!["tail:b"]);
    }

    #[test]
    fn test_middleware_names() {
        assert_eq!(middleware_fn(|_, _| {}).name(), "FnMiddleware");
        assert_eq!(hook_fn(|_| {}).name(), "FnHook");
    }
}
