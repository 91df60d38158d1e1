//! The injected navigation event source.
//!
//! The store never talks to a browser directly; the embedding environment
//! hands it an implementation of [`NavigationSource`] that reads the active
//! location and installs/removes the single system-level back/forward
//! listener. That listener is expected to call
//! [`NavigationStore::on_route_change`](crate::NavigationStore::on_route_change)
//! when it fires.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_router::Location;

pub trait NavigationSource {
    /// Current location of the embedding environment.
    fn location(&self) -> Location;

    /// Installs the system-level back/forward listener. Called exactly once
    /// per 0→1 transition of the store's live subscriber count.
    fn attach(&mut self);

    /// Removes the listener installed by [`attach`](Self::attach). Called
    /// exactly once per 1→0 transition.
    fn detach(&mut self);
}

/// An in-memory [`NavigationSource`].
///
/// Used by tests and by embeddings that drive navigation themselves.
/// Clones share state, so a test can keep one handle while the store owns
/// another.
///
/// # Examples
///
/// ```
/// use trellis::{MemorySource, NavigationSource};
///
/// let source = MemorySource::new("/users/42");
/// assert_eq!(source.location().pathname, "/users/42");
/// assert!(!source.is_attached());
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    state: Rc<RefCell<MemoryState>>,
}

#[derive(Debug)]
struct MemoryState {
    location: Location,
    attached: bool,
    attach_count: usize,
    detach_count: usize,
}

impl MemorySource {
    pub fn new(pathname: impl Into<String>) -> Self {
        MemorySource {
            state: Rc::new(RefCell::new(MemoryState {
                location: Location::new(pathname),
                attached: false,
                attach_count: 0,
                detach_count: 0,
            })),
        }
    }

    /// Moves the in-memory location. Does not notify anything; the caller
    /// drives the store's `on_route_change` explicitly, the way a history
    /// listener would.
    pub fn set_location(&self, pathname: impl Into<String>, search: Option<&str>) {
        let mut state = self.state.borrow_mut();
        state.location.pathname = pathname.into();
        state.location.search = search.map(str::to_string);
    }

    /// Whether the back/forward listener is currently installed.
    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    /// How many times the listener has been installed.
    pub fn attach_count(&self) -> usize {
        self.state.borrow().attach_count
    }

    /// How many times the listener has been removed.
    pub fn detach_count(&self) -> usize {
        self.state.borrow().detach_count
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        MemorySource::new("/")
    }
}

impl NavigationSource for MemorySource {
    fn location(&self) -> Location {
        self.state.borrow().location.clone()
    }

    fn attach(&mut self) {
        let mut state = self.state.borrow_mut();
        state.attached = true;
        state.attach_count += 1;
    }

    fn detach(&mut self) {
        let mut state = self.state.borrow_mut();
        state.attached = false;
        state.detach_count += 1;
    }
}
