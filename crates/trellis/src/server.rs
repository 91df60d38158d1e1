//! Server-side entry point.
//!
//! Each request gets its own isolated router: the flat table is compiled
//! fresh per request, so concurrent requests share nothing mutable. The
//! per-request router offers the same match contract as the client store
//! but none of its subscription surface; there is no navigation to listen
//! to on a server.

use tracing::debug;
use trellis_router::{Location, MatchTree, Method, RouteError, Routing, RoutingTree};

/// The slice of an incoming request the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Request { url: url.into() }
    }
}

/// Per-request router factory for server-side rendering.
///
/// # Examples
///
/// ```
/// use trellis::{Request, Routing, StaticRouter};
///
/// let routing = Routing::new().with_get("/users/:id", "users#show");
/// let router = StaticRouter::new(routing);
///
/// let request = router
///     .for_request(&Request::new("/users/42?tab=posts"))
///     .unwrap();
/// let matched = request.current().unwrap();
/// assert_eq!(matched.location.pathname, "/users/42");
/// assert_eq!(matched.location.search.as_deref(), Some("?tab=posts"));
/// assert_eq!(matched.matches["/users/:id"].params["id"], "42");
/// ```
#[derive(Debug, Clone)]
pub struct StaticRouter<F> {
    routing: Routing<F>,
}

impl<F: Clone> StaticRouter<F> {
    pub fn new(routing: Routing<F>) -> Self {
        StaticRouter { routing }
    }

    /// Builds an isolated router for one request.
    ///
    /// Splits the request URL at the first `?` into pathname and search,
    /// compiles a request-private tree, and computes the request's current
    /// match with the location patched in. Malformed route paths surface
    /// here as a [`RouteError`].
    pub fn for_request(&self, request: &Request) -> Result<PerRequestRouter<F>, RouteError> {
        let location = Location::parse(&request.url);
        let tree = RoutingTree::compile(&self.routing)?;

        let mut current = tree.match_path(&location.pathname, Method::Get);
        if let Some(matched) = current.as_mut() {
            matched.location = location.clone();
        }
        debug!(
            pathname = %location.pathname,
            matched = current.is_some(),
            "per-request router built"
        );

        Ok(PerRequestRouter { tree, current })
    }
}

/// One request's isolated router.
#[derive(Debug)]
pub struct PerRequestRouter<F> {
    tree: RoutingTree<F>,
    current: Option<MatchTree<F>>,
}

impl<F> PerRequestRouter<F> {
    /// The match computed for the request's own URL.
    pub fn current(&self) -> Option<&MatchTree<F>> {
        self.current.as_ref()
    }

    /// One-off match against an arbitrary path/method pair, same contract
    /// as the client matcher.
    pub fn match_path(&self, path: &str, method: Method) -> Option<MatchTree<F>> {
        self.tree.match_path(path, method)
    }
}
