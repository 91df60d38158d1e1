//! # Trellis Router
//!
//! Route tree compiler and matcher for the Trellis rendering framework.
//!
//! The router takes a flat table of `(method, path, fragment)` triples and:
//!
//! - compiles it into one path-segment tree per HTTP method, with static
//!   and dynamic (`:name` capture) segments,
//! - matches URL paths against a tree, producing an ordered chain of
//!   nested matches with bound parameters,
//! - composes a matched tree into nested render steps an external render
//!   engine can mount.
//!
//! A fragment is an opaque, already-resolved render target (the generic
//! `F`); the router stores and returns fragments but never inspects them.
//!
//! ## Matching model
//!
//! Matching is greedy and single-pass: at each tree level an exact literal
//! segment wins over a capture, and among capture siblings the first
//! declared wins. There is no backtracking, so matching is linear in path
//! depth. Methods never interact; each gets its own independent tree.
//!
//! ## Example
//!
//! ```
//! use trellis_router::{compose, Method, Routing, RoutingTree};
//!
//! let routing = Routing::new()
//!     .with_get("/", "home")
//!     .with_get("/users", "users#layout")
//!     .with_get("/users/:id", "users#show");
//!
//! let tree = RoutingTree::compile(&routing).unwrap();
//!
//! let matched = tree.match_path("/users/42", Method::Get).unwrap();
//! assert_eq!(matched.matches["/users/:id"].params["id"], "42");
//!
//! let plan = compose(&matched).unwrap();
//! assert_eq!(plan.fragments(), vec![&"users#layout", &"users#show"]);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
mod matcher;
mod outlet;
pub mod path;
mod table;
mod tree;

// ============================================================================
// Public surface
// ============================================================================

pub use error::RouteError;
pub use matcher::{match_path, MatchEntry, MatchTree};
pub use outlet::{compose, OutletContext, RenderStep};
pub use table::{Location, Method, RouteDefinition, Routing};
pub use tree::{Children, DynamicChild, RouteConfig, RouteTreeNode, RoutingTree};
