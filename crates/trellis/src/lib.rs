// Trellis - rendering framework runtime
// Navigation store, per-request server routing, and the routing core re-exported

mod server;
mod source;
mod store;

pub use server::{PerRequestRouter, Request, StaticRouter};
pub use source::{MemorySource, NavigationSource};
pub use store::{NavigationStore, Subscription};

// Re-export the routing core so embedders depend on one crate
pub use trellis_router::{
    compose, match_path, Children, DynamicChild, Location, MatchEntry, MatchTree, Method,
    OutletContext, RenderStep, RouteConfig, RouteDefinition, RouteError, RouteTreeNode, Routing,
    RoutingTree,
};
pub use trellis_router::path;
