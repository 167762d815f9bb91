//! The endpoint seam between the router and the application.
//!
//! An endpoint is whatever the application navigates between — a screen, a
//! panel, a state. The router never constructs or destroys endpoints; it only
//! indexes them by name and compares them by identity. Implement [`Endpoint`]
//! on your own type and hand the router an [`EndpointRef`].
//!
//! # Identity
//!
//! Two handles denote the same endpoint iff they point at the same object
//! ([`Rc::ptr_eq`]), **never** when their names merely coincide. Re-registering
//! a name with a fresh object therefore yields a distinct endpoint that happens
//! to share the old name; entries already in the history keep their original
//! identity.
//!
//! # Example
//!
//! ```
//! use endpoint_router::{Endpoint, EndpointRef, same_endpoint};
//! use std::rc::Rc;
//!
//! struct Screen {
//!     name: String,
//! }
//!
//! impl Endpoint for Screen {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//! }
//!
//! let home: EndpointRef = Rc::new(Screen { name: "home".into() });
//! let alias = Rc::clone(&home);
//! let twin: EndpointRef = Rc::new(Screen { name: "home".into() });
//!
//! assert!(same_endpoint(&home, &alias));
//! assert!(!same_endpoint(&home, &twin));
//! ```

use std::rc::Rc;

/// A navigable unit with a stable name.
///
/// The only thing the router ever asks of an endpoint is its name; everything
/// else (rendering, state, lifetime) belongs to the application.
pub trait Endpoint: 'static {
    /// The unique name this endpoint is registered under.
    ///
    /// Must be stable for the lifetime of the handle — the router uses it as
    /// the registry key and for middleware scope matching.
    fn name(&self) -> &str;
}

/// Shared handle to a caller-owned endpoint.
///
/// `Rc` rather than `Arc`: the router is single-threaded and re-entrant by
/// design, and handles are cloned freely into the history and transitions.
pub type EndpointRef = Rc<dyn Endpoint>;

/// Identity comparison for endpoint handles.
///
/// Compares the underlying allocations, not the names.
pub fn same_endpoint(a: &EndpointRef, b: &EndpointRef) -> bool {
    Rc::ptr_eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Screen {
        name: String,
    }

    impl Endpoint for Screen {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn screen(name: &str) -> EndpointRef {
        Rc::new(Screen {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_same_endpoint_is_identity_based() {
        let a = screen("home");
        let clone = Rc::clone(&a);
        let same_name = screen("home");

        assert!(same_endpoint(&a, &clone));
        assert!(!same_endpoint(&a, &same_name));
    }

    #[test]
    fn test_name_accessor() {
        let a = screen("settings");
        assert_eq!(a.name(), "settings");
    }
}
