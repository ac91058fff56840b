//! Multi-child matching - one predicate over a selected list of children
//!
//! [`match_children`] applies a node predicate to each child a selector picks
//! out (arguments of a call, annotations of a declaration, statements of a
//! block) and reduces the results under a [`MatchQuantifier`].
//!
//! # INV: children see their own position
//!
//! Each child is evaluated with `state.child_state(child)`, so ancestor-based
//! predicates inside the child predicate resolve through the child's real
//! ancestry and share the compilation's cache.

use crate::{MatchState, NodePredicate, SyntaxTree};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// How per-child results combine into one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MatchQuantifier {
    /// Every child matches. Vacuously true for no children.
    All,
    /// At least one child matches. False for no children.
    AtLeastOne,
    /// The last child matches. False for no children.
    Last,
}

impl fmt::Display for MatchQuantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "ALL",
            Self::AtLeastOne => "AT_LEAST_ONE",
            Self::Last => "LAST",
        })
    }
}

/// Outcome of a multi-child match.
///
/// # INV: no nodes without a match
///
/// `matching_nodes` is empty whenever `matched` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiMatchResult<N> {
    matched: bool,
    matching_nodes: Vec<N>,
}

impl<N> MultiMatchResult<N> {
    fn no_match() -> Self {
        Self {
            matched: false,
            matching_nodes: Vec::new(),
        }
    }

    fn matched_with(matching_nodes: Vec<N>) -> Self {
        Self {
            matched: true,
            matching_nodes,
        }
    }

    /// Whether the quantifier was satisfied.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// The children that satisfied the predicate, in selection order.
    #[must_use]
    pub fn matching_nodes(&self) -> &[N] {
        &self.matching_nodes
    }

    /// Consume the result, keeping the matching children.
    #[must_use]
    pub fn into_matching_nodes(self) -> Vec<N> {
        self.matching_nodes
    }
}

/// Children picked out of a node by a selector: borrowed from the tree when
/// they are stored contiguously, owned when the selector filters.
pub type Selected<'t, N> = Cow<'t, [N]>;

/// Selector returning every child of a node.
pub fn all_children<M: SyntaxTree>(tree: &M, node: M::Node) -> Selected<'_, M::Node> {
    Cow::Borrowed(tree.children(node))
}

/// Panics unless `child` is a direct child of `parent`.
pub(crate) fn assert_child<M: SyntaxTree>(tree: &M, parent: M::Node, child: M::Node) {
    assert!(
        tree.children(parent).contains(&child),
        "selector returned {child:?}, which is not a child of {parent:?}"
    );
}

/// Apply `predicate` to the children of `node` chosen by `selector`.
///
/// `state` must point at `node`. Children are evaluated in selector order:
///
/// | quantifier   | evaluates            | result on empty     |
/// |--------------|----------------------|---------------------|
/// | `All`        | until the first miss | `{ true, [] }`      |
/// | `AtLeastOne` | every child          | `{ false, [] }`     |
/// | `Last`       | the last child only  | `{ false, [] }`     |
///
/// # Panics
///
/// If `state` does not point at `node`, or if the selector returns a node that
/// is not a direct child of `node`.
pub fn match_children<'a, M, F>(
    node: M::Node,
    state: &MatchState<'a, M>,
    selector: F,
    predicate: &NodePredicate<M>,
    quantifier: MatchQuantifier,
) -> MultiMatchResult<M::Node>
where
    M: SyntaxTree,
    F: FnOnce(&'a M, M::Node) -> Selected<'a, M::Node>,
{
    assert_eq!(state.leaf(), node, "state must point at the node whose children are matched");

    let tree = state.tree();
    let children = selector(tree, node);
    for &child in children.iter() {
        assert_child(tree, node, child);
    }

    let matches = |child: M::Node| predicate.matches(&child, &state.child_state(child));

    let result = match quantifier {
        MatchQuantifier::All => {
            if children.iter().all(|&child| matches(child)) {
                MultiMatchResult::matched_with(children.to_vec())
            } else {
                MultiMatchResult::no_match()
            }
        }
        MatchQuantifier::AtLeastOne => {
            let hits: Vec<M::Node> = children.iter().copied().filter(|&c| matches(c)).collect();
            if hits.is_empty() {
                MultiMatchResult::no_match()
            } else {
                MultiMatchResult::matched_with(hits)
            }
        }
        MatchQuantifier::Last => match children.last() {
            Some(&last) if matches(last) => MultiMatchResult::matched_with(vec![last]),
            _ => MultiMatchResult::no_match(),
        },
    };

    tracing::trace!(
        %quantifier,
        parent = ?node,
        children = children.len(),
        matched = result.matched,
        hits = result.matching_nodes.len(),
        "matched children"
    );
    result
}

type Selector<M> =
    dyn for<'t> Fn(&'t M, <M as SyntaxTree>::Node) -> Selected<'t, <M as SyntaxTree>::Node>
        + Send
        + Sync;

/// A reusable multi-child matcher: selector, child predicate and quantifier.
///
/// # Example
///
/// ```ignore
/// // @Deprecated among a declaration's annotations
/// let deprecated = MultiMatcher::new(
///     "annotations",
///     MatchQuantifier::AtLeastOne,
///     |tree: &JavaTree, node| Cow::Borrowed(tree.annotations(node)),
///     is_type("java.lang.Deprecated"),
/// );
/// let result = deprecated.multi_match(class, &state);
/// ```
pub struct MultiMatcher<M: SyntaxTree> {
    name: Arc<str>,
    quantifier: MatchQuantifier,
    selector: Arc<Selector<M>>,
    predicate: NodePredicate<M>,
}

impl<M: SyntaxTree> MultiMatcher<M> {
    /// Build a matcher; `name` describes what the selector picks.
    pub fn new<F>(
        name: impl Into<Arc<str>>,
        quantifier: MatchQuantifier,
        selector: F,
        predicate: NodePredicate<M>,
    ) -> Self
    where
        F: for<'t> Fn(&'t M, M::Node) -> Selected<'t, M::Node> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            quantifier,
            selector: Arc::new(selector),
            predicate,
        }
    }

    /// Matcher over every child of the node.
    #[must_use]
    pub fn over_children(quantifier: MatchQuantifier, predicate: NodePredicate<M>) -> Self {
        Self::new("children", quantifier, all_children::<M>, predicate)
    }

    /// The quantifier.
    #[must_use]
    pub fn quantifier(&self) -> MatchQuantifier {
        self.quantifier
    }

    /// The per-child predicate.
    #[must_use]
    pub fn predicate(&self) -> &NodePredicate<M> {
        &self.predicate
    }

    /// Full result, including which children matched.
    ///
    /// # Panics
    ///
    /// See [`match_children`].
    pub fn multi_match(
        &self,
        node: M::Node,
        state: &MatchState<'_, M>,
    ) -> MultiMatchResult<M::Node> {
        match_children(
            node,
            state,
            |tree, n| (self.selector)(tree, n),
            &self.predicate,
            self.quantifier,
        )
    }

    /// Boolean result only.
    ///
    /// `AtLeastOne` stops at the first matching child here, since the list of
    /// matching children is not needed.
    pub fn matches(&self, node: M::Node, state: &MatchState<'_, M>) -> bool {
        match self.quantifier {
            MatchQuantifier::AtLeastOne => {
                assert_eq!(
                    state.leaf(),
                    node,
                    "state must point at the node whose children are matched"
                );
                let tree = state.tree();
                (self.selector)(tree, node).iter().any(|&child| {
                    assert_child(tree, node, child);
                    self.predicate.matches(&child, &state.child_state(child))
                })
            }
            MatchQuantifier::All | MatchQuantifier::Last => self.multi_match(node, state).matched(),
        }
    }

    /// Use this matcher as a node predicate.
    #[must_use]
    pub fn into_predicate(self) -> NodePredicate<M> {
        let label = format!("{}({})", self.quantifier, self.name);
        crate::from_fn(label, move |node: &M::Node, state: &MatchState<'_, M>| {
            self.matches(*node, state)
        })
    }
}

impl<M: SyntaxTree> Clone for MultiMatcher<M> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            quantifier: self.quantifier,
            selector: Arc::clone(&self.selector),
            predicate: self.predicate.clone(),
        }
    }
}

impl<M: SyntaxTree> fmt::Debug for MultiMatcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiMatcher")
            .field("name", &self.name)
            .field("quantifier", &self.quantifier)
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}
