//! The client-side navigation store.
//!
//! Owns the single current [`MatchTree`] for a compiled route table,
//! re-matches whenever the location changes, and pushes the result to
//! subscribers. Everything here is confined to one execution context (a
//! UI main thread): interior mutability instead of locks, `Rc` instead of
//! atomics.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, trace};
use trellis_router::{MatchTree, Method, RouteError, Routing, RoutingTree};

use crate::source::NavigationSource;

type Listener<F> = Box<dyn FnMut(Option<&MatchTree<F>>)>;

/// Handle returned by [`NavigationStore::subscribe`].
///
/// `unsubscribe` is idempotent: calling it twice (or after the store is
/// gone) is a no-op, and the store's live-subscriber count never goes
/// negative. Dropping the handle without unsubscribing leaves the listener
/// registered for the lifetime of the store.
pub struct Subscription {
    cancel: Box<dyn Fn() -> bool>,
}

impl Subscription {
    /// Removes the listener. Returns whether it was still registered.
    pub fn unsubscribe(&self) -> bool {
        (self.cancel)()
    }
}

/// The navigation store.
///
/// Compiles the route table once at construction and computes the initial
/// current match from the injected [`NavigationSource`]'s location. The
/// system-level back/forward listener is attached lazily on the 0→1
/// subscriber transition and detached on 1→0; the environment's listener is
/// expected to call [`on_route_change`](NavigationStore::on_route_change)
/// when it fires.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use trellis::{MemorySource, NavigationStore, Routing};
///
/// let routing = Routing::new()
///     .with_get("/", "home")
///     .with_get("/users/:id", "users#show");
/// let source = MemorySource::new("/");
/// let store = NavigationStore::new(&routing, source.clone()).unwrap();
///
/// let seen = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&seen);
/// let subscription = store.subscribe(move |_| counter.set(counter.get() + 1));
/// assert!(source.is_attached());
///
/// source.set_location("/users/42", None);
/// store.on_route_change();
/// assert_eq!(seen.get(), 1);
/// assert_eq!(
///     store.current().unwrap().matches["/users/:id"].params["id"],
///     "42"
/// );
///
/// subscription.unsubscribe();
/// assert!(!source.is_attached());
/// ```
pub struct NavigationStore<F, S: NavigationSource> {
    inner: Rc<StoreInner<F, S>>,
}

struct StoreInner<F, S> {
    tree: RoutingTree<F>,
    source: RefCell<S>,
    current: RefCell<Option<MatchTree<F>>>,
    listeners: RefCell<BTreeMap<u64, Rc<RefCell<Listener<F>>>>>,
    next_id: Cell<u64>,
    live: Cell<usize>,
}

impl<F, S> NavigationStore<F, S>
where
    F: Clone + 'static,
    S: NavigationSource + 'static,
{
    /// Compiles the table and computes the initial match from the source's
    /// current location.
    pub fn new(routing: &Routing<F>, source: S) -> Result<Self, RouteError> {
        let tree = RoutingTree::compile(routing)?;
        let location = source.location();

        let mut current = tree.match_path(&location.pathname, Method::Get);
        if let Some(matched) = current.as_mut() {
            matched.location = location.clone();
        }
        debug!(
            routes = routing.len(),
            pathname = %location.pathname,
            matched = current.is_some(),
            "navigation store ready"
        );

        Ok(NavigationStore {
            inner: Rc::new(StoreInner {
                tree,
                source: RefCell::new(source),
                current: RefCell::new(current),
                listeners: RefCell::new(BTreeMap::new()),
                next_id: Cell::new(0),
                live: Cell::new(0),
            }),
        })
    }

    /// Registers a listener for navigation changes.
    ///
    /// Listeners are invoked synchronously, in registration order, on every
    /// [`on_route_change`](NavigationStore::on_route_change). The first live
    /// subscriber attaches the system-level back/forward listener; removing
    /// the last detaches it.
    pub fn subscribe(
        &self,
        listener: impl FnMut(Option<&MatchTree<F>>) + 'static,
    ) -> Subscription {
        let inner = &self.inner;
        let id = inner.next_id.get();
        inner.next_id.set(id + 1);

        inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(RefCell::new(Box::new(listener))));

        if inner.live.get() == 0 {
            inner.source.borrow_mut().attach();
            trace!("back/forward listener attached");
        }
        inner.live.set(inner.live.get() + 1);

        let weak = Rc::downgrade(inner);
        Subscription {
            cancel: Box::new(move || match weak.upgrade() {
                Some(inner) => inner.remove_listener(id),
                None => false,
            }),
        }
    }

    /// Synchronous read of the last computed match.
    pub fn current(&self) -> Option<MatchTree<F>> {
        self.inner.current.borrow().clone()
    }

    /// Number of live subscriptions.
    pub fn subscribers(&self) -> usize {
        self.inner.live.get()
    }

    /// Re-matches the source's current location, stores the result, and
    /// notifies every listener.
    ///
    /// Dispatch runs over a snapshot of the listener set taken at its
    /// start: listeners registered mid-dispatch wait for the next change,
    /// and a listener unsubscribed mid-dispatch is skipped for the rest of
    /// this one.
    pub fn on_route_change(&self) {
        let location = self.inner.source.borrow().location();
        let mut next = self.inner.tree.match_path(&location.pathname, Method::Get);
        if let Some(matched) = next.as_mut() {
            matched.location = location.clone();
        }
        debug!(
            pathname = %location.pathname,
            matched = next.is_some(),
            "route change"
        );

        *self.inner.current.borrow_mut() = next;
        self.notify();
    }

    /// Stateless one-off match against an arbitrary path/method pair. Does
    /// not touch the stored current match.
    pub fn match_path(&self, path: &str, method: Method) -> Option<MatchTree<F>> {
        self.inner.tree.match_path(path, method)
    }

    fn notify(&self) {
        let current = self.inner.current.borrow().clone();
        let snapshot: Vec<(u64, Rc<RefCell<Listener<F>>>)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if !self.inner.listeners.borrow().contains_key(&id) {
                continue;
            }
            (*listener.borrow_mut())(current.as_ref());
        }
    }
}

impl<F, S> StoreInner<F, S>
where
    S: NavigationSource,
{
    fn remove_listener(&self, id: u64) -> bool {
        let removed = self.listeners.borrow_mut().remove(&id).is_some();
        if removed {
            let live = self.live.get().saturating_sub(1);
            self.live.set(live);
            if live == 0 {
                self.source.borrow_mut().detach();
                trace!("back/forward listener detached");
            }
        }
        removed
    }
}

impl<F, S: NavigationSource> Clone for NavigationStore<F, S> {
    fn clone(&self) -> Self {
        NavigationStore {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<F, S: NavigationSource> std::fmt::Debug for NavigationStore<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationStore").finish_non_exhaustive()
    }
}
