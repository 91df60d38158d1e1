//! Route tree compiler.
//!
//! Turns the ordered flat route table into one immutable path-segment tree
//! per HTTP method. Compilation walks every path once, so it is linear in
//! the total number of segments across the table; matching never needs to
//! backtrack because each tree level separates literal children from
//! dynamic ones up front.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RouteError;
use crate::matcher::{self, MatchTree};
use crate::path::{normalize, split_segments, validate_route_path};
use crate::table::{Method, Routing};

// ============================================================================
// Tree nodes
// ============================================================================

/// The leaf config stored at a renderable node.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig<F> {
    /// Full declared path of the route, in canonical form.
    pub path: String,
    /// Opaque render target; never inspected by the router.
    pub fragment: F,
}

/// One node of a compiled route tree.
///
/// A node may carry a `config` (it is itself renderable), children (it has
/// descendants), or both: an outer layout route with nested routes under it
/// has both.
#[derive(Debug, PartialEq)]
pub struct RouteTreeNode<F> {
    /// Full declared pattern path of this node (`/users/:id`, not the
    /// concrete URL that matched it).
    pub path: String,
    pub config: Option<RouteConfig<F>>,
    pub children: Children<F>,
}

/// One tree level, keyed by path segment.
///
/// Literal segments and capture segments live in separate collections so the
/// collision policy is explicit: an exact literal key always wins over a
/// capture, and capture siblings keep their declaration order; the first
/// declared is the one a segment binds to.
#[derive(Debug, PartialEq)]
pub struct Children<F> {
    statics: HashMap<String, Arc<RouteTreeNode<F>>>,
    dynamics: Vec<DynamicChild<F>>,
}

/// A capture child (`:name`) at one tree level.
#[derive(Debug, PartialEq)]
pub struct DynamicChild<F> {
    /// Capture name, without the `:` prefix.
    pub capture: String,
    pub node: Arc<RouteTreeNode<F>>,
}

impl<F> Children<F> {
    pub fn is_empty(&self) -> bool {
        self.statics.is_empty() && self.dynamics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statics.len() + self.dynamics.len()
    }

    /// Looks up a literal child by segment.
    pub fn get_static(&self, segment: &str) -> Option<&Arc<RouteTreeNode<F>>> {
        self.statics.get(segment)
    }

    /// The first-declared capture child, if any.
    pub fn first_dynamic(&self) -> Option<&DynamicChild<F>> {
        self.dynamics.first()
    }

    /// Capture children in declaration order.
    pub fn dynamics(&self) -> &[DynamicChild<F>] {
        &self.dynamics
    }

    /// All child nodes: literal children first, then capture children in
    /// declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteTreeNode<F>> {
        self.statics
            .values()
            .map(|node| node.as_ref())
            .chain(self.dynamics.iter().map(|child| child.node.as_ref()))
    }
}

// ============================================================================
// Compiled routing tree
// ============================================================================

/// The compiled route trees, one per method that has routes.
///
/// Built once per route-table definition and immutable thereafter; match
/// results share its nodes by `Arc`, read-only.
///
/// # Examples
///
/// ```
/// use trellis_router::{Method, Routing, RoutingTree};
///
/// let routing = Routing::new()
///     .with_get("/users", "users#index")
///     .with_get("/users/:id", "users#show");
///
/// let tree = RoutingTree::compile(&routing).unwrap();
///
/// let matched = tree.match_path("/users/42", Method::Get).unwrap();
/// assert_eq!(matched.matches["/users/:id"].params["id"], "42");
/// assert!(tree.match_path("/users/42", Method::Post).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTree<F> {
    trees: HashMap<Method, Arc<RouteTreeNode<F>>>,
}

impl<F: Clone> RoutingTree<F> {
    /// Compiles the flat table into per-method trees.
    ///
    /// Re-registering the same exact path overwrites the earlier config
    /// (last compiled wins). Two capture siblings at one level are allowed;
    /// their declaration order decides matching and is never an error.
    /// Malformed paths fail fast with a descriptive [`RouteError`].
    pub fn compile(routing: &Routing<F>) -> Result<Self, RouteError> {
        let mut trees = HashMap::new();

        for method in Method::ALL {
            let mut root: Option<NodeBuilder<F>> = None;

            for definition in routing.for_method(method) {
                validate_route_path(&definition.path)?;
                let canonical = normalize(&definition.path).into_owned();

                let root = root.get_or_insert_with(|| NodeBuilder::new("/"));
                let config = RouteConfig {
                    path: canonical.clone(),
                    fragment: definition.fragment.clone(),
                };

                if canonical == "/" {
                    root.config = Some(config);
                    continue;
                }

                let mut node = root;
                let mut declared = String::new();
                for segment in split_segments(&canonical) {
                    declared.push('/');
                    declared.push_str(segment);
                    node = node.child(segment, &declared);
                }
                node.config = Some(config);
            }

            if let Some(root) = root {
                trees.insert(method, root.freeze());
            }
        }

        Ok(RoutingTree { trees })
    }
}

impl<F> RoutingTree<F> {
    /// Root node of one method's tree, if that method has routes.
    pub fn root(&self, method: Method) -> Option<&Arc<RouteTreeNode<F>>> {
        self.trees.get(&method)
    }

    /// Matches a path against one method's tree.
    ///
    /// Returns `None` both when the method has no routes and when the walk
    /// never recorded a match.
    pub fn match_path(&self, path: &str, method: Method) -> Option<MatchTree<F>> {
        matcher::match_path(path, self.root(method)?)
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Mutable node used only during compilation; frozen into `Arc`-shared
/// immutable nodes once the whole table is inserted.
struct NodeBuilder<F> {
    path: String,
    config: Option<RouteConfig<F>>,
    statics: HashMap<String, NodeBuilder<F>>,
    dynamics: Vec<(String, NodeBuilder<F>)>,
}

impl<F> NodeBuilder<F> {
    fn new(path: &str) -> Self {
        NodeBuilder {
            path: path.to_string(),
            config: None,
            statics: HashMap::new(),
            dynamics: Vec::new(),
        }
    }

    /// Walks to (or creates) the child for one segment. Capture segments are
    /// keyed by capture name; appending keeps declaration order.
    fn child(&mut self, segment: &str, declared: &str) -> &mut NodeBuilder<F> {
        match segment.strip_prefix(':') {
            Some(capture) => {
                if let Some(index) = self
                    .dynamics
                    .iter()
                    .position(|(name, _)| name == capture)
                {
                    &mut self.dynamics[index].1
                } else {
                    self.dynamics
                        .push((capture.to_string(), NodeBuilder::new(declared)));
                    let last = self.dynamics.len() - 1;
                    &mut self.dynamics[last].1
                }
            }
            None => self
                .statics
                .entry(segment.to_string())
                .or_insert_with(|| NodeBuilder::new(declared)),
        }
    }

    fn freeze(self) -> Arc<RouteTreeNode<F>> {
        Arc::new(RouteTreeNode {
            path: self.path,
            config: self.config,
            children: Children {
                statics: self
                    .statics
                    .into_iter()
                    .map(|(segment, builder)| (segment, builder.freeze()))
                    .collect(),
                dynamics: self
                    .dynamics
                    .into_iter()
                    .map(|(capture, builder)| DynamicChild {
                        capture,
                        node: builder.freeze(),
                    })
                    .collect(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_builds_segment_tree() {
        let routing = Routing::new()
            .with_get("/users", "index")
            .with_get("/users/:id", "show");

        let tree = RoutingTree::compile(&routing).unwrap();
        let root = tree.root(Method::Get).unwrap();

        let users = root.children.get_static("users").unwrap();
        assert_eq!(users.path, "/users");
        assert_eq!(users.config.as_ref().unwrap().fragment, "index");

        let id = users.children.first_dynamic().unwrap();
        assert_eq!(id.capture, "id");
        assert_eq!(id.node.path, "/users/:id");
        assert!(id.node.children.is_empty());
    }

    #[test]
    fn test_compile_root_path_sits_on_root_node() {
        let routing = Routing::new().with_get("/", "home");
        let tree = RoutingTree::compile(&routing).unwrap();
        let root = tree.root(Method::Get).unwrap();

        assert_eq!(root.config.as_ref().unwrap().fragment, "home");
        assert!(root.children.is_empty());
        assert!(root.children.get_static("/").is_none());
    }

    #[test]
    fn test_compile_last_registration_wins() {
        let routing = Routing::new()
            .with_get("/about", "old")
            .with_get("/about", "new");

        let tree = RoutingTree::compile(&routing).unwrap();
        let root = tree.root(Method::Get).unwrap();
        let about = root.children.get_static("about").unwrap();
        assert_eq!(about.config.as_ref().unwrap().fragment, "new");
    }

    #[test]
    fn test_compile_normalizes_declared_paths() {
        let routing = Routing::new().with_get("/users//:id/", "show");
        let tree = RoutingTree::compile(&routing).unwrap();
        let root = tree.root(Method::Get).unwrap();

        let users = root.children.get_static("users").unwrap();
        let id = users.children.first_dynamic().unwrap();
        assert_eq!(id.node.path, "/users/:id");
        assert_eq!(id.node.config.as_ref().unwrap().path, "/users/:id");
    }

    #[test]
    fn test_compile_keeps_dynamic_declaration_order() {
        let routing = Routing::new()
            .with_get("/users/:id", "by-id")
            .with_get("/users/:name", "by-name");

        let tree = RoutingTree::compile(&routing).unwrap();
        let users = tree
            .root(Method::Get)
            .unwrap()
            .children
            .get_static("users")
            .unwrap();

        let captures: Vec<&str> = users
            .children
            .dynamics()
            .iter()
            .map(|child| child.capture.as_str())
            .collect();
        assert_eq!(captures, vec!["id", "name"]);
    }

    #[test]
    fn test_compile_methods_stay_separate() {
        let routing = Routing::new()
            .with_get("/users", "list")
            .with_post("/users", "create");

        let tree = RoutingTree::compile(&routing).unwrap();
        assert!(tree.root(Method::Get).is_some());
        assert!(tree.root(Method::Post).is_some());
        assert!(tree.root(Method::Delete).is_none());
    }

    #[test]
    fn test_compile_rejects_malformed_paths() {
        let routing = Routing::new().with_get("users", "broken");
        assert_eq!(
            RoutingTree::compile(&routing).unwrap_err(),
            RouteError::NotAbsolute("users".to_string())
        );

        let routing = Routing::new().with_get("/users/:", "broken");
        assert_eq!(
            RoutingTree::compile(&routing).unwrap_err(),
            RouteError::EmptyCapture("/users/:".to_string())
        );
    }
}
