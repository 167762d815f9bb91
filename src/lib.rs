//! Navigation router for named endpoints with history, wildcard-scoped
//! middleware, and phased continuation chains.
//!
//! Applications are modeled as a set of named **endpoints** (screens, states,
//! panels). The [`Router`] tracks the path taken so far on a history stack
//! and, around every transition, runs a composed pipeline of **middleware**
//! selected by `(from, to)` scope — exact names or the `*` wildcard on either
//! side — and ordered by a three-phase priority (`From`, `Middle`, `To`).
//! Middleware drives the pipeline itself: each item receives a continuation
//! and the run only advances when the item proceeds, so any item can veto the
//! rest of the run by simply returning.
//!
//! Everything is synchronous and single-threaded; middleware may freely call
//! back into the router mid-dispatch (navigation included — the superseded
//! run goes inert).
//!
//! # Features
//!
//! | Feature | Default | Effect |
//! |---------|---------|--------|
//! | `log` | yes | Route log output through the [`log`](https://docs.rs/log) crate |
//! | `tracing` | no | Route log output through [`tracing`](https://docs.rs/tracing) instead |
//! | `cache` | yes | LRU memo of dispatch resolution via [`lru`](https://docs.rs/lru) |
//!
//! # Quick start
//!
//! ```
//! use endpoint_router::{middleware_fn, Endpoint, Next, Phase, Router, Transition};
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
//! // Runs before endpoint-specific middleware, on every transition.
//! let banner = router.use_middleware(
//!     middleware_fn(|transition: Transition, next: &Next<'_, Transition>| {
//!         println!("leaving {}", transition.from_label());
//!         next.proceed(transition);
//!     }),
//!     None,
//!     None,
//!     Phase::From,
//! );
//!
//! // Scoped to transitions arriving at "settings".
//! let _guard = router.use_hook(
//!     |transition| println!("entered settings from {}", transition.from_label()),
//!     None,
//!     Some("settings"),
//!     Phase::Middle,
//! );
//!
//! assert!(router.go_to("home"));
//! assert!(router.go_to("settings"));
//! assert!(router.go_back());
//! assert_eq!(router.history(), vec!["home"]);
//!
//! banner.remove(); // deregistration is explicit and idempotent
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "cache")]
pub mod cache;
pub mod chain;
pub mod endpoint;
pub mod error;
pub mod history;
pub mod logging;
pub mod middleware;
pub mod phase;
pub mod router;
pub mod transition;

#[cfg(feature = "cache")]
pub use cache::CacheStats;
pub use chain::{Chain, ChainItem, Next, Registration, Run};
pub use endpoint::{same_endpoint, Endpoint, EndpointRef};
pub use error::NavigationError;
pub use history::History;
pub use middleware::{hook_fn, middleware_fn, FnHook, FnMiddleware, Middleware};
pub use phase::{Phase, PhaseHost};
pub use router::{Router, WILDCARD};
pub use transition::Transition;
