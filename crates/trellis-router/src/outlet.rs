//! Outlet composition: turns a match result into nested render steps.
//!
//! The walk is an explicit recursive function over [`RouteTreeNode`] and
//! [`MatchTree::matches`], both plain data, so it is testable without any
//! render engine present. The engine consumes the resulting plan: render a
//! step's fragment, then render its outlet steps wherever the fragment
//! places its outlet.

use std::collections::HashMap;

use crate::matcher::{MatchEntry, MatchTree};
use crate::tree::RouteTreeNode;

/// What a matched level exposes to the fragment rendered for it: the bound
/// captures and the concrete URL prefix consumed at that level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutletContext<'a> {
    pub params: &'a HashMap<String, String>,
    pub current_path: &'a str,
}

/// One nested render step.
#[derive(Debug, PartialEq)]
pub enum RenderStep<'a, F> {
    /// A route with no descendants: render the fragment, nothing nests
    /// under it.
    Leaf {
        fragment: &'a F,
        context: Option<OutletContext<'a>>,
    },
    /// A route with descendants: render the fragment and place `outlet`
    /// wherever it nests its children. The outlet holds every child on the
    /// current match path. Usually that is one child, but outlets are scoped
    /// over a map, not a single pointer.
    Nested {
        fragment: &'a F,
        context: Option<OutletContext<'a>>,
        outlet: Vec<RenderStep<'a, F>>,
    },
    /// A grouping level with no fragment of its own: all children render
    /// independently.
    Group(Vec<RenderStep<'a, F>>),
}

impl<'a, F> RenderStep<'a, F> {
    /// Every fragment in the plan, outermost first.
    pub fn fragments(&self) -> Vec<&'a F> {
        let mut out = Vec::new();
        self.collect_fragments(&mut out);
        out
    }

    fn collect_fragments(&self, out: &mut Vec<&'a F>) {
        match self {
            RenderStep::Leaf { fragment, .. } => out.push(fragment),
            RenderStep::Nested {
                fragment, outlet, ..
            } => {
                out.push(fragment);
                for step in outlet {
                    step.collect_fragments(out);
                }
            }
            RenderStep::Group(steps) => {
                for step in steps {
                    step.collect_fragments(out);
                }
            }
        }
    }
}

/// Composes the render plan for a match result, starting at the outermost
/// configured node.
///
/// Returns `None` when the match has no renderable entry point (the
/// structurally-matched-but-nothing-renders case).
///
/// # Examples
///
/// ```
/// use trellis_router::{compose, Method, Routing, RoutingTree};
///
/// let routing = Routing::new()
///     .with_get("/posts", "posts#layout")
///     .with_get("/posts/:id", "posts#show");
/// let tree = RoutingTree::compile(&routing).unwrap();
///
/// let matched = tree.match_path("/posts/7", Method::Get).unwrap();
/// let plan = compose(&matched).unwrap();
/// assert_eq!(plan.fragments(), vec![&"posts#layout", &"posts#show"]);
/// ```
pub fn compose<F>(tree: &MatchTree<F>) -> Option<RenderStep<'_, F>> {
    let root = tree.config.as_deref()?;
    Some(compose_node(root, &tree.matches))
}

fn compose_node<'a, F>(
    node: &'a RouteTreeNode<F>,
    matches: &'a HashMap<String, MatchEntry<F>>,
) -> RenderStep<'a, F> {
    let context = matches.get(&node.path).map(|entry| OutletContext {
        params: &entry.params,
        current_path: &entry.current_path,
    });

    match (&node.config, node.children.is_empty()) {
        (Some(config), true) => RenderStep::Leaf {
            fragment: &config.fragment,
            context,
        },
        (Some(config), false) => {
            // Only children on the current match path appear at the outlet;
            // sibling routes that were not walked render nothing.
            let outlet = node
                .children
                .iter()
                .filter(|child| matches.contains_key(&child.path))
                .map(|child| compose_node(child, matches))
                .collect();
            RenderStep::Nested {
                fragment: &config.fragment,
                context,
                outlet,
            }
        }
        (None, false) => RenderStep::Group(
            node.children
                .iter()
                .map(|child| compose_node(child, matches))
                .collect(),
        ),
        // Nodes with neither config nor children exist only transiently
        // during construction; an empty group renders nothing.
        (None, true) => RenderStep::Group(Vec::new()),
    }
}
