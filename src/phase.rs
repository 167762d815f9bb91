//! Dispatch phases and the per-scope chain host.
//!
//! Every middleware registration belongs to exactly one [`Phase`]. Phases are
//! priority buckets, not filters: during dispatch all matching `From`-phase
//! chains run before all matching `Middle`-phase chains, which run before all
//! matching `To`-phase chains, regardless of which scope key each
//! registration sits under. This is what lets a caller say "run before
//! anything endpoint-specific" or "run last, cleanup-style" without knowing
//! what else is registered.
//!
//! A [`PhaseHost`] owns the three chains for one scope key. Hosts are created
//! lazily on first registration for a key and never removed afterwards; an
//! empty chain is simply never reported by [`PhaseHost::chain`].

use crate::chain::{Chain, ChainItem, Registration};
use std::rc::Rc;

// ============================================================================
// Phase
// ============================================================================

/// Priority bucket determining relative execution order across all matching
/// registrations for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Runs before everything else — setup, teardown of the source.
    From,
    /// The default bucket for ordinary middleware.
    #[default]
    Middle,
    /// Runs after everything else — cleanup, finalization of the target.
    To,
}

impl Phase {
    /// Fixed dispatch order.
    pub const ORDER: [Phase; 3] = [Phase::From, Phase::Middle, Phase::To];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::From => "from",
            Phase::Middle => "middle",
            Phase::To => "to",
        };
        f.write_str(label)
    }
}

// ============================================================================
// PhaseHost
// ============================================================================

/// Three continuation chains behind the [`Phase`] enum, one host per scope
/// key.
pub struct PhaseHost<T> {
    from: Chain<T>,
    middle: Chain<T>,
    to: Chain<T>,
}

impl<T: 'static> PhaseHost<T> {
    /// Create a host with three empty chains.
    pub fn new() -> Self {
        Self {
            from: Chain::new(),
            middle: Chain::new(),
            to: Chain::new(),
        }
    }

    /// Append an item to the chain for `phase`.
    pub fn add_item(&self, phase: Phase, item: Rc<ChainItem<T>>) -> Registration {
        self.chain_for(phase).add_item(item)
    }

    /// The chain for `phase`, or `None` when it has no items.
    ///
    /// Callers receiving `Some` are guaranteed at least one item at call
    /// time, so a returned chain is always a valid splice head.
    pub fn chain(&self, phase: Phase) -> Option<Chain<T>> {
        let chain = self.chain_for(phase);
        if chain.is_empty() {
            None
        } else {
            Some(chain.clone())
        }
    }

    fn chain_for(&self, phase: Phase) -> &Chain<T> {
        match phase {
            Phase::From => &self.from,
            Phase::Middle => &self.middle,
            Phase::To => &self.to,
        }
    }
}

impl<T: 'static> Default for PhaseHost<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for PhaseHost<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseHost")
            .field("from", &self.from.len())
            .field("middle", &self.middle.len())
            .field("to", &self.to.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Next, Run};
    use std::cell::RefCell;

    #[test]
    fn test_default_phase_is_middle() {
        assert_eq!(Phase::default(), Phase::Middle);
    }

    #[test]
    fn test_order_is_from_middle_to() {
        assert_eq!(Phase::ORDER, [Phase::From, Phase::Middle, Phase::To]);
    }

    #[test]
    fn test_empty_chain_is_not_reported() {
        let host: PhaseHost<u32> = PhaseHost::new();
        assert!(host.chain(Phase::From).is_none());
        assert!(host.chain(Phase::Middle).is_none());
        assert!(host.chain(Phase::To).is_none());
    }

    #[test]
    fn test_add_targets_the_requested_phase() {
        let host: PhaseHost<u32> = PhaseHost::new();
        let _keep = host.add_item(Phase::To, Rc::new(|_: u32, _: &Next<'_, u32>| {}));

        assert!(host.chain(Phase::From).is_none());
        assert!(host.chain(Phase::Middle).is_none());
        assert!(host.chain(Phase::To).is_some());
    }

    #[test]
    fn test_removal_makes_chain_unavailable_again() {
        let host: PhaseHost<u32> = PhaseHost::new();
        let registration = host.add_item(Phase::Middle, Rc::new(|_: u32, _: &Next<'_, u32>| {}));
        assert!(host.chain(Phase::Middle).is_some());

        registration.remove();
        assert!(host.chain(Phase::Middle).is_none());
    }

    #[test]
    fn test_reported_chain_is_runnable() {
        let host: PhaseHost<u32> = PhaseHost::new();
        let hits = Rc::new(RefCell::new(0));
        let hits_in_item = Rc::clone(&hits);
        let _keep = host.add_item(
            Phase::Middle,
            Rc::new(move |value: u32, next: &Next<'_, u32>| {
                *hits_in_item.borrow_mut() += 1;
                next.proceed(value);
            }),
        );

        let chain = host.chain(Phase::Middle).expect("chain should be reported");
        chain.call(1, &Run::new());

        assert_eq!(*hits.borrow(), 1);
    }
}
