//! The flat route table: HTTP methods, locations, and route definitions in
//! declaration order.
//!
//! Declaration order is part of the routing contract: when two dynamic
//! siblings compete for a segment, the first declared wins, so the table is
//! an ordered list, never a map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RouteError;

// ============================================================================
// Method
// ============================================================================

/// HTTP methods the route table distinguishes.
///
/// Each method gets its own independent route tree; methods never interact.
///
/// # Examples
///
/// ```
/// use trellis_router::Method;
///
/// let method: Method = "get".parse().unwrap();
/// assert_eq!(method, Method::Get);
/// assert_eq!(method.as_str(), "Get");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Options,
    Delete,
}

impl Method {
    /// All methods, in a stable order.
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Options,
        Method::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "Get",
            Method::Post => "Post",
            Method::Put => "Put",
            Method::Patch => "Patch",
            Method::Options => "Options",
            Method::Delete => "Delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RouteError;

    /// Case-insensitive parse: `"GET"`, `"get"`, and `"Get"` all work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "options" => Ok(Method::Options),
            "delete" => Ok(Method::Delete),
            _ => Err(RouteError::UnknownMethod(s.to_string())),
        }
    }
}

// ============================================================================
// Location
// ============================================================================

/// A parsed browser/request location.
///
/// `search` keeps its leading `?` when present, mirroring what browser
/// location objects report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    pub search: Option<String>,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Location {
            pathname: pathname.into(),
            search: None,
        }
    }

    /// Splits a request URL at the first `?` into pathname and search.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_router::Location;
    ///
    /// let location = Location::parse("/users/42?tab=posts");
    /// assert_eq!(location.pathname, "/users/42");
    /// assert_eq!(location.search.as_deref(), Some("?tab=posts"));
    ///
    /// let location = Location::parse("/users/42");
    /// assert_eq!(location.search, None);
    /// ```
    pub fn parse(url: &str) -> Self {
        match url.find('?') {
            Some(index) => Location {
                pathname: url[..index].to_string(),
                search: Some(url[index..].to_string()),
            },
            None => Location {
                pathname: url.to_string(),
                search: None,
            },
        }
    }
}

// ============================================================================
// Route definitions
// ============================================================================

/// One `(method, path, fragment)` triple of the flat route table.
///
/// The fragment is an opaque, already-resolved render target; the router
/// stores and returns it but never looks inside.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDefinition<F> {
    pub method: Method,
    pub path: String,
    pub fragment: F,
}

/// The ordered flat route table, produced by an external build step that
/// extracts `(method, path)` pairs from annotated source.
///
/// Built through chainable `with_*` methods; declaration order is preserved
/// and meaningful (dynamic-sibling tie-breaks, last-wins overwrites).
///
/// # Examples
///
/// ```
/// use trellis_router::{Method, Routing};
///
/// let routing = Routing::new()
///     .with_get("/", "home")
///     .with_get("/users/:id", "users#show")
///     .with_post("/users", "users#create");
///
/// assert_eq!(routing.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Routing<F> {
    routes: Vec<RouteDefinition<F>>,
}

impl<F> Routing<F> {
    pub fn new() -> Self {
        Routing { routes: Vec::new() }
    }

    /// Appends a route (builder form).
    pub fn with_route(mut self, method: Method, path: impl Into<String>, fragment: F) -> Self {
        self.routes.push(RouteDefinition {
            method,
            path: path.into(),
            fragment,
        });
        self
    }

    pub fn with_get(self, path: impl Into<String>, fragment: F) -> Self {
        self.with_route(Method::Get, path, fragment)
    }

    pub fn with_post(self, path: impl Into<String>, fragment: F) -> Self {
        self.with_route(Method::Post, path, fragment)
    }

    pub fn with_put(self, path: impl Into<String>, fragment: F) -> Self {
        self.with_route(Method::Put, path, fragment)
    }

    pub fn with_patch(self, path: impl Into<String>, fragment: F) -> Self {
        self.with_route(Method::Patch, path, fragment)
    }

    pub fn with_options(self, path: impl Into<String>, fragment: F) -> Self {
        self.with_route(Method::Options, path, fragment)
    }

    pub fn with_delete(self, path: impl Into<String>, fragment: F) -> Self {
        self.with_route(Method::Delete, path, fragment)
    }

    /// All definitions in declaration order.
    pub fn routes(&self) -> &[RouteDefinition<F>] {
        &self.routes
    }

    /// Definitions for one method, in declaration order.
    pub fn for_method(&self, method: Method) -> impl Iterator<Item = &RouteDefinition<F>> {
        self.routes.iter().filter(move |r| r.method == method)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<F> Default for Routing<F> {
    fn default() -> Self {
        Self::new()
    }
}
