//! The matcher: walks a compiled route tree against a URL path.
//!
//! The walk is greedy and single-pass, with no backtracking. At each level
//! an exact literal child wins; otherwise the first-declared capture child
//! binds the segment. Greedy matching keeps the walk linear in path depth
//! at the cost of not ranking capture siblings by specificity beyond
//! declaration order; that trade-off is part of the routing contract.

use std::collections::HashMap;
use std::sync::Arc;

use crate::path::split_segments;
use crate::table::Location;
use crate::tree::RouteTreeNode;

/// One recorded level of a match walk, keyed in [`MatchTree::matches`] by
/// the cumulative pattern path at which it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEntry<F> {
    /// Captures bound at this level (one per capture segment).
    pub params: HashMap<String, String>,
    /// The matched node, when it carries a renderable config.
    pub config: Option<Arc<RouteTreeNode<F>>>,
    /// Concrete URL prefix consumed up to and including this level.
    pub current_path: String,
}

/// The result of walking a compiled route tree against a path.
///
/// Created fresh on every match operation. `config` is the outermost node
/// along the walk that carries a renderable config: the entry point of the
/// nested render. A tree is only ever returned with at least one entry in
/// `matches`; "no route found" is `None` from [`match_path`], never an
/// empty tree.
///
/// `config` staying `None` while `matches` is populated means the path was
/// structurally recognized but nothing renders there; callers must treat
/// that differently from not-found.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTree<F> {
    pub location: Location,
    pub config: Option<Arc<RouteTreeNode<F>>>,
    pub matches: HashMap<String, MatchEntry<F>>,
}

/// Matches a URL path against one method's compiled tree.
///
/// The path must already be percent-decoded. Doubled, leading, and trailing
/// slashes are ignored segment-wise, but only the exact path `"/"` takes
/// the root fast path.
///
/// # Examples
///
/// ```
/// use trellis_router::{match_path, Method, Routing, RoutingTree};
///
/// let routing = Routing::new()
///     .with_get("/posts", "posts#index")
///     .with_get("/posts/:id", "posts#show");
/// let tree = RoutingTree::compile(&routing).unwrap();
/// let root = tree.root(Method::Get).unwrap();
///
/// let matched = match_path("/posts/7", root).unwrap();
/// assert_eq!(matched.matches["/posts/:id"].params["id"], "7");
/// assert_eq!(matched.matches["/posts/:id"].current_path, "/posts/7");
///
/// assert!(match_path("/nonexistent", root).is_none());
/// ```
pub fn match_path<F>(path: &str, root: &Arc<RouteTreeNode<F>>) -> Option<MatchTree<F>> {
    if path == "/" {
        return root.config.as_ref().map(|_| {
            let mut matches = HashMap::new();
            matches.insert(
                "/".to_string(),
                MatchEntry {
                    params: HashMap::new(),
                    config: Some(Arc::clone(root)),
                    current_path: "/".to_string(),
                },
            );
            MatchTree {
                location: Location::new("/"),
                config: Some(Arc::clone(root)),
                matches,
            }
        });
    }

    let mut tree = MatchTree {
        location: Location::new(path),
        config: None,
        matches: HashMap::new(),
    };

    let mut current = Arc::clone(root);
    // Cumulative declared pattern path ("/users/:id") and the concrete URL
    // prefix consumed so far ("/users/42"). Entries are keyed by the former
    // and carry the latter.
    let mut declared = String::new();
    let mut consumed = String::new();

    for segment in split_segments(path) {
        let next = if let Some(child) = current.children.get_static(segment) {
            declared.push('/');
            declared.push_str(segment);
            consumed.push('/');
            consumed.push_str(segment);

            if child.config.is_some() {
                tree.matches.insert(
                    declared.clone(),
                    MatchEntry {
                        params: HashMap::new(),
                        config: Some(Arc::clone(child)),
                        current_path: consumed.clone(),
                    },
                );
                if tree.config.is_none() {
                    tree.config = Some(Arc::clone(child));
                }
            }
            Arc::clone(child)
        } else if let Some(dynamic) = current.children.first_dynamic() {
            declared.push_str("/:");
            declared.push_str(&dynamic.capture);
            consumed.push('/');
            consumed.push_str(segment);

            let mut params = HashMap::new();
            params.insert(dynamic.capture.clone(), segment.to_string());

            // Capture levels always record an entry, configured or not, so
            // nested outlets can read the bound params.
            tree.matches.insert(
                declared.clone(),
                MatchEntry {
                    params,
                    config: dynamic
                        .node
                        .config
                        .is_some()
                        .then(|| Arc::clone(&dynamic.node)),
                    current_path: consumed.clone(),
                },
            );
            if dynamic.node.config.is_some() && tree.config.is_none() {
                tree.config = Some(Arc::clone(&dynamic.node));
            }
            Arc::clone(&dynamic.node)
        } else {
            // Matching stops at this depth; levels already consumed stay
            // recorded.
            break;
        };

        current = next;
    }

    if tree.matches.is_empty() {
        None
    } else {
        Some(tree)
    }
}
