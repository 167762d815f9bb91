//! The transition payload.
//!
//! A [`Transition`] describes one navigation step — where the router is coming
//! from and where it is going — and is the value threaded through every
//! middleware chain for the duration of a single dispatch. Middleware receives
//! it by value and passes it onward through the continuation.

use crate::endpoint::EndpointRef;
use crate::router::WILDCARD;

/// One navigation step, passed through the middleware pipeline.
///
/// `from` is `None` on the very first navigation, when there is nothing on the
/// history stack yet.
///
/// # Example
///
/// ```
/// use endpoint_router::{Endpoint, Transition};
/// use std::rc::Rc;
///
/// struct Screen(&'static str);
///
/// impl Endpoint for Screen {
///     fn name(&self) -> &str {
///         self.0
///     }
/// }
///
/// let transition = Transition::new(Rc::new(Screen("home")));
/// assert_eq!(transition.to_name(), "home");
/// assert!(transition.from.is_none());
/// ```
#[derive(Clone)]
pub struct Transition {
    /// The endpoint we're navigating from (if any).
    pub from: Option<EndpointRef>,

    /// The endpoint we're navigating to.
    pub to: EndpointRef,
}

impl Transition {
    /// Create a transition with no source — the first navigation.
    pub fn new(to: EndpointRef) -> Self {
        Self { from: None, to }
    }

    /// Create a transition between two endpoints.
    pub fn with_from(from: EndpointRef, to: EndpointRef) -> Self {
        Self {
            from: Some(from),
            to,
        }
    }

    /// Name of the source endpoint, if there is one.
    pub fn from_name(&self) -> Option<&str> {
        self.from.as_ref().map(|from| from.name())
    }

    /// Name of the destination endpoint.
    pub fn to_name(&self) -> &str {
        self.to.name()
    }

    /// Source name with the wildcard symbol standing in for "none".
    ///
    /// This is the form used for scope-key matching and log output.
    pub fn from_label(&self) -> &str {
        self.from.as_ref().map_or(WILDCARD, |from| from.name())
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from.as_ref().map(|from| from.name()))
            .field("to", &self.to.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use std::rc::Rc;

    struct Screen(&'static str);

    impl Endpoint for Screen {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn screen(name: &'static str) -> EndpointRef {
        Rc::new(Screen(name))
    }

    #[test]
    fn test_first_transition_has_no_source() {
        let transition = Transition::new(screen("home"));
        assert!(transition.from.is_none());
        assert_eq!(transition.from_label(), "*");
        assert_eq!(transition.to_name(), "home");
    }

    #[test]
    fn test_transition_names() {
        let transition = Transition::with_from(screen("home"), screen("settings"));
        assert_eq!(transition.from_name(), Some("home"));
        assert_eq!(transition.from_label(), "home");
        assert_eq!(transition.to_name(), "settings");
    }

    #[test]
    fn test_debug_shows_names() {
        let transition = Transition::with_from(screen("a"), screen("b"));
        let rendered = format!("{:?}", transition);
        assert!(rendered.contains("\"a\""));
        assert!(rendered.contains("\"b\""));
    }
}
