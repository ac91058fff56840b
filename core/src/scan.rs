//! Whole-tree drivers
//!
//! A host scanner normally walks the tree itself and evaluates predicates as
//! it goes. These helpers do that walk for hosts (and tests) that just want
//! every matching position.

use crate::{MatchState, NodePredicate, Path, SemanticContext, SyntaxTree};

/// Visit every node of the tree in pre-order, each with its own state.
///
/// Traversal is iterative, so deep trees cannot overflow the stack.
pub fn for_each_state<'a, M, F>(semantics: &'a SemanticContext<M>, mut visit: F)
where
    M: SyntaxTree,
    F: FnMut(&MatchState<'a, M>),
{
    let tree = semantics.tree();
    let mut stack = vec![semantics.root_state()];
    while let Some(state) = stack.pop() {
        visit(&state);
        for &child in tree.children(state.leaf()).iter().rev() {
            stack.push(state.child_state(child));
        }
    }
}

/// Paths of every node matching `predicate`, in pre-order.
pub fn matching_paths<M: SyntaxTree>(
    semantics: &SemanticContext<M>,
    predicate: &NodePredicate<M>,
) -> Vec<Path<M::Node>> {
    let mut found = Vec::new();
    let mut visited = 0_usize;
    for_each_state(semantics, |state| {
        visited += 1;
        if predicate.matches_at(state) {
            found.push(state.path().clone());
        }
    });
    tracing::debug!(
        compilation = %semantics.id(),
        visited,
        matches = found.len(),
        "scanned tree"
    );
    found
}
