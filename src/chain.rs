//! Continuation chains — the execution unit behind middleware dispatch.
//!
//! A [`Chain`] is an ordered, mutable sequence of callback items that run one
//! at a time. Each item receives an argument and a [`Next`] continuation it
//! must invoke to hand the argument to the following item; an item that never
//! proceeds silently halts the rest of the run. Chains are long-lived, shared
//! objects: handles issued by [`Chain::add`] keep working for as long as the
//! chain exists, and several chains can be spliced end-to-end into one logical
//! run via [`Chain::connect_next`].
//!
//! | Type | Role |
//! |------|------|
//! | [`Chain`] | Ordered items + cursor + successor link |
//! | [`Next`] | Continuation passed to every item |
//! | [`Run`] | Abort token scoping one traversal of a splice |
//! | [`Registration`] | Removes exactly one item, idempotently |
//!
//! # Splicing
//!
//! `connect_next` wires one chain's tail to another chain's head. When a chain
//! finishes its last item (or is empty to begin with), it forwards the
//! argument to its successor, so an empty link never breaks a splice. The
//! links are per-run wiring: whoever assembles a splice is expected to clear
//! the final chain's successor so the run has a definite end.
//!
//! # Runs and staleness
//!
//! Every traversal is scoped by a [`Run`] token. Aborting the token makes any
//! outstanding continuation from that traversal inert: a late
//! [`proceed`](Next::proceed) is simply ignored. The router uses this to
//! retire the previous dispatch's chain when a nested navigation starts
//! mid-flight.
//!
//! # Removal during execution
//!
//! [`Registration::remove`] takes effect immediately, even while the chain is
//! executing. The cursor is deliberately **not** renormalized: removing an
//! item at or before the cursor shifts the indices of everything behind it,
//! which can skip (or repeat) the next item. Callers that remove entries from
//! inside a running chain get exactly that behavior.

use crate::trace_log;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

// ============================================================================
// Run
// ============================================================================

/// Abort token scoping a single traversal of a chain splice.
///
/// Cloning shares the token. Once [`abort`](Self::abort) is called, every
/// chain step guarded by this token becomes a no-op.
#[derive(Clone)]
pub struct Run {
    active: Rc<Cell<bool>>,
}

impl Run {
    /// Create a fresh, active token.
    pub fn new() -> Self {
        Self {
            active: Rc::new(Cell::new(true)),
        }
    }

    /// Mark the traversal as superseded; outstanding continuations go inert.
    pub fn abort(&self) {
        self.active.set(false);
    }

    /// Whether this traversal is still the live one.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Scoped deregistration handle returned by [`Chain::add`].
///
/// Removes exactly the one item it was issued for. Calling
/// [`remove`](Self::remove) a second time (or after the chain is gone) is a
/// no-op. Dropping the handle does **not** remove the item — removal is always
/// explicit.
#[must_use = "dropping a Registration does not deregister; call remove() when the item should go"]
pub struct Registration {
    remove: Box<dyn Fn()>,
}

impl Registration {
    pub(crate) fn new(remove: impl Fn() + 'static) -> Self {
        Self {
            remove: Box::new(remove),
        }
    }

    /// Remove the registered item from its chain. Idempotent.
    pub fn remove(&self) {
        (self.remove)();
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").finish_non_exhaustive()
    }
}

// ============================================================================
// Chain
// ============================================================================

/// Item stored in a chain: takes the argument and the continuation.
pub type ChainItem<T> = dyn Fn(T, &Next<'_, T>);

/// Continuation handed to every chain item.
///
/// An item calls [`proceed`](Self::proceed) to pass the argument to the next
/// item (or, past the end, to the successor chain). Not calling it halts the
/// remainder of the run — that is the supported way for an item to veto
/// whatever the run represents.
pub struct Next<'a, T> {
    chain: &'a Chain<T>,
    run: &'a Run,
}

impl<T: 'static> Next<'_, T> {
    /// Continue the run with `value`.
    pub fn proceed(&self, value: T) {
        self.chain.advance(value, self.run);
    }

    /// Whether the surrounding traversal is still live.
    ///
    /// False once a newer dispatch has superseded this one; `proceed` would
    /// be ignored.
    pub fn is_live(&self) -> bool {
        self.run.is_active()
    }
}

struct Entry<T> {
    id: u64,
    item: Rc<ChainItem<T>>,
}

struct ChainInner<T> {
    entries: Vec<Entry<T>>,
    cursor: usize,
    next: Option<Chain<T>>,
    next_id: u64,
}

enum Step<T> {
    Item(Rc<ChainItem<T>>),
    Forward(Option<Chain<T>>),
}

/// Ordered, resumable sequence of continuation-passing items.
///
/// Cloning is shallow: clones share the same backing sequence, cursor, and
/// successor link, so a clone handed out during dispatch assembly observes
/// later additions and removals.
pub struct Chain<T> {
    inner: Rc<RefCell<ChainInner<T>>>,
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Chain<T> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChainInner {
                entries: Vec::new(),
                cursor: 0,
                next: None,
                next_id: 0,
            })),
        }
    }

    /// Number of items currently in the chain.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether the chain has no items.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Append a closure item. Insertion order is execution order.
    pub fn add<F>(&self, item: F) -> Registration
    where
        F: Fn(T, &Next<'_, T>) + 'static,
    {
        self.add_item(Rc::new(item))
    }

    /// Append an already-shared item.
    ///
    /// The returned [`Registration`] removes this entry and only this entry,
    /// matched by an internal id rather than by comparing callbacks, so the
    /// same callback object can be registered more than once.
    pub fn add_item(&self, item: Rc<ChainItem<T>>) -> Registration {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push(Entry { id, item });
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Registration::new(move || remove_entry(&weak, id))
    }

    /// Set or clear the successor chain invoked when this chain finishes.
    pub fn connect_next(&self, next: Option<&Chain<T>>) {
        self.inner.borrow_mut().next = next.cloned();
    }

    /// Start (or restart) execution from item 0 under the given run token.
    ///
    /// The cursor is reset first, so a chain abandoned mid-run by an item
    /// that never proceeded starts cleanly. An empty chain forwards the
    /// argument straight to its successor. Does nothing if `run` has been
    /// aborted.
    pub fn call(&self, value: T, run: &Run) {
        if !run.is_active() {
            return;
        }

        let step = {
            let mut inner = self.inner.borrow_mut();
            inner.cursor = 0;
            match inner.entries.first() {
                Some(entry) => Step::Item(Rc::clone(&entry.item)),
                None => Step::Forward(inner.next.clone()),
            }
        };

        self.step(step, value, run);
    }

    /// Move the cursor forward and invoke the item now under it, or forward
    /// to the successor when the end is reached. Invoked by [`Next::proceed`].
    fn advance(&self, value: T, run: &Run) {
        if !run.is_active() {
            trace_log!("Chain advance ignored: run was superseded");
            return;
        }

        let step = {
            let mut inner = self.inner.borrow_mut();
            inner.cursor += 1;
            if inner.cursor >= inner.entries.len() {
                inner.cursor = 0;
                Step::Forward(inner.next.clone())
            } else {
                Step::Item(Rc::clone(&inner.entries[inner.cursor].item))
            }
        };

        self.step(step, value, run);
    }

    fn step(&self, step: Step<T>, value: T, run: &Run) {
        match step {
            Step::Item(item) => {
                let next = Next { chain: self, run };
                item(value, &next);
            }
            Step::Forward(Some(successor)) => successor.call(value, run),
            Step::Forward(None) => {}
        }
    }
}

impl<T: 'static> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Chain")
            .field("len", &inner.entries.len())
            .field("cursor", &inner.cursor)
            .field("linked", &inner.next.is_some())
            .finish()
    }
}

fn remove_entry<T>(inner: &Weak<RefCell<ChainInner<T>>>, id: u64) {
    if let Some(cell) = inner.upgrade() {
        let mut inner = cell.borrow_mut();
        if let Some(position) = inner.entries.iter().position(|entry| entry.id == id) {
            // Cursor is intentionally left alone; see the module docs on
            // removal during execution.
            inner.entries.remove(position);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) -> RecorderItem) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = Rc::clone(&log);
            move |tag: u32| {
                let log = Rc::clone(&log);
                RecorderItem { tag, log }
            }
        };
        (log, make)
    }

    struct RecorderItem {
        tag: u32,
        log: Rc<RefCell<Vec<u32>>>,
    }

    impl RecorderItem {
        fn proceeding(self) -> impl Fn(u32, &Next<'_, u32>) + 'static {
            move |value: u32, next: &Next<'_, u32>| {
                self.log.borrow_mut().push(self.tag);
                next.proceed(value);
            }
        }

        fn halting(self) -> impl Fn(u32, &Next<'_, u32>) + 'static {
            move |_value: u32, _next: &Next<'_, u32>| {
                self.log.borrow_mut().push(self.tag);
            }
        }
    }

    #[test]
    fn test_runs_items_in_insertion_order() {
        let chain = Chain::new();
        let (log, make) = recorder();
        let _a = chain.add(make(1).proceeding());
        let _b = chain.add(make(2).proceeding());
        let _c = chain.add(make(3).proceeding());

        chain.call(0, &Run::new());

        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_item_that_never_proceeds_halts_the_run() {
        let chain = Chain::new();
        let (log, make) = recorder();
        let _a = chain.add(make(1).proceeding());
        let _b = chain.add(make(2).halting());
        let _c = chain.add(make(3).proceeding());

        chain.call(0, &Run::new());

        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_empty_chain_forwards_to_successor() {
        let head: Chain<u32> = Chain::new();
        let tail = Chain::new();
        let (log, make) = recorder();
        let _a = tail.add(make(7).proceeding());

        head.connect_next(Some(&tail));
        head.call(0, &Run::new());

        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn test_splice_runs_head_then_successor() {
        let head = Chain::new();
        let tail = Chain::new();
        let (log, make) = recorder();
        let _a = head.add(make(1).proceeding());
        let _b = tail.add(make(2).proceeding());

        head.connect_next(Some(&tail));
        head.call(0, &Run::new());

        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_removal_is_idempotent() {
        let chain = Chain::new();
        let (log, make) = recorder();
        let a = chain.add(make(1).proceeding());
        let _b = chain.add(make(2).proceeding());

        a.remove();
        a.remove();

        chain.call(0, &Run::new());
        assert_eq!(chain.len(), 1);
        assert_eq!(*log.borrow(), vec![2]);
    }

    #[test]
    fn test_removal_before_cursor_skips_next_item() {
        // Removing the item under the cursor shifts everything behind it
        // down one slot, so the item immediately after the remover is
        // skipped. Pinned behavior: the cursor is not renormalized.
        let chain = Chain::new();
        let (log, make) = recorder();
        let log_first = Rc::clone(&log);

        let slot: Rc<RefCell<Option<Registration>>> = Rc::new(RefCell::new(None));
        let slot_in_item = Rc::clone(&slot);
        let first = chain.add(move |value, next: &Next<'_, u32>| {
            log_first.borrow_mut().push(1);
            if let Some(own) = slot_in_item.borrow().as_ref() {
                own.remove();
            }
            next.proceed(value);
        });
        *slot.borrow_mut() = Some(first);

        let _b = chain.add(make(2).proceeding());
        let _c = chain.add(make(3).proceeding());

        chain.call(0, &Run::new());

        assert_eq!(*log.borrow(), vec![1, 3]);
    }

    #[test]
    fn test_aborted_run_ignores_proceed() {
        let chain = Chain::new();
        let (log, make) = recorder();
        let run = Run::new();

        let abort_handle = run.clone();
        let log_first = Rc::clone(&log);
        let _a = chain.add(move |value, next: &Next<'_, u32>| {
            log_first.borrow_mut().push(1);
            abort_handle.abort();
            next.proceed(value);
        });
        let _b = chain.add(make(2).proceeding());

        chain.call(0, &run);

        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn test_call_restarts_from_item_zero_after_abandoned_run() {
        let chain = Chain::new();
        let (log, make) = recorder();
        let _a = chain.add(make(1).proceeding());
        let _b = chain.add(make(2).halting());

        chain.call(0, &Run::new());
        chain.call(0, &Run::new());

        assert_eq!(*log.borrow(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_removal_after_chain_drop_is_a_no_op() {
        let chain = Chain::new();
        let (log, make) = recorder();
        let a = chain.add(make(1).proceeding());
        drop(chain);

        // Chain is gone; removal must be a quiet no-op.
        a.remove();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_argument_flows_through_proceed() {
        let chain = Chain::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_a = Rc::clone(&seen);
        let _a = chain.add(move |value: u32, next: &Next<'_, u32>| {
            seen_a.borrow_mut().push(value);
            next.proceed(value + 1);
        });
        let seen_b = Rc::clone(&seen);
        let _b = chain.add(move |value: u32, next: &Next<'_, u32>| {
            seen_b.borrow_mut().push(value);
            next.proceed(value);
        });

        chain.call(10, &Run::new());

        assert_eq!(*seen.borrow(), vec![10, 11]);
    }
}
