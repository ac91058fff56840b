//! Navigation adapters - predicates that evaluate another predicate elsewhere
//!
//! Each adapter moves the evaluation point (to an ancestor, a descendant, a
//! sibling or a selected child) and evaluates its inner predicate there with a
//! state re-anchored at the new position. None of them carries state between
//! invocations.

use crate::multi::assert_child;
use crate::tree::shape_name;
use crate::{from_fn, type_gate, MatchState, Narrow, NodePredicate, Predicate, SyntaxTree};
use std::sync::Arc;

/// Matches when the nearest strict ancestor of shape `S` satisfies `p`.
///
/// Only the nearest such ancestor is considered. False at the root or when
/// no ancestor has shape `S`.
pub fn enclosing<S, M>(p: Predicate<S, M>) -> NodePredicate<M>
where
    S: Narrow<M>,
    M: SyntaxTree,
{
    from_fn(
        format!("enclosing<{}>", shape_name::<S>()),
        move |_: &M::Node, state: &MatchState<'_, M>| {
            state
                .find_enclosing::<S>()
                .is_some_and(|(at, shape)| p.matches(shape, &at))
        },
    )
}

/// Matches when any strict ancestor satisfies `p`.
pub fn enclosing_node<M: SyntaxTree>(p: NodePredicate<M>) -> NodePredicate<M> {
    from_fn("enclosing_node", move |_: &M::Node, state: &MatchState<'_, M>| {
        state
            .path()
            .ancestors()
            .any(|ancestor| p.matches_at(&state.with_path(ancestor.clone())))
    })
}

/// Matches when the immediate parent satisfies `p`. False at the root.
pub fn parent_node<M: SyntaxTree>(p: NodePredicate<M>) -> NodePredicate<M> {
    from_fn("parent_node", move |_: &M::Node, state: &MatchState<'_, M>| {
        state.parent_state().is_some_and(|parent| p.matches_at(&parent))
    })
}

/// Matches when the node itself or any descendant satisfies `p`.
///
/// Pre-order, stopping at the first match. Each visited node is evaluated with
/// its own path. Cost is O(subtree size).
pub fn contains<M: SyntaxTree>(p: NodePredicate<M>) -> NodePredicate<M> {
    from_fn("contains", move |_: &M::Node, state: &MatchState<'_, M>| {
        let tree = state.tree();
        let mut stack = vec![state.clone()];
        let mut visited = 0_usize;
        while let Some(at) = stack.pop() {
            visited += 1;
            if p.matches_at(&at) {
                tracing::trace!(visited, "descendant match");
                return true;
            }
            for &child in tree.children(at.leaf()).iter().rev() {
                stack.push(at.child_state(child));
            }
        }
        tracing::trace!(visited, "no descendant match");
        false
    })
}

/// [`contains`] restricted to descendants of shape `S`.
pub fn contains_shape<S, M>(p: Predicate<S, M>) -> NodePredicate<M>
where
    S: Narrow<M>,
    M: SyntaxTree,
{
    contains(type_gate(p))
}

/// Matches when the member `offset` positions away from the current node,
/// inside the nearest enclosing sequential parent of shape `S`, satisfies `p`.
///
/// `members` lists the parent's ordered members; each must be a direct child
/// of the parent. The sibling is evaluated with the path `parent_path.child(sibling)`.
///
/// False when there is no enclosing `S`, when the current node is not itself
/// one of its members, or when `index + offset` is out of range.
///
/// ```ignore
/// let next_is_return = sibling(1, Block::statements, kind_is(Kind::Return));
/// ```
pub fn sibling<S, M, F>(offset: isize, members: F, p: NodePredicate<M>) -> NodePredicate<M>
where
    S: Narrow<M>,
    M: SyntaxTree,
    F: Fn(&S) -> &[M::Node] + Send + Sync + 'static,
{
    from_fn(
        format!("sibling<{}>({offset:+})", shape_name::<S>()),
        move |_: &M::Node, state: &MatchState<'_, M>| {
            let Some((parent, shape)) = state.find_enclosing::<S>() else {
                return false;
            };
            let list = members(shape);
            let Some(index) = list.iter().position(|&m| m == state.leaf()) else {
                return false;
            };
            let Some(&target) = index.checked_add_signed(offset).and_then(|i| list.get(i)) else {
                return false;
            };
            assert_child(state.tree(), parent.leaf(), target);
            p.matches_at(&parent.child_state(target))
        },
    )
}

/// Matches when `select` picks a direct child that satisfies `p`.
///
/// False when `select` returns `None`.
///
/// # Panics
///
/// At evaluation, if `select` returns a node that is not a direct child.
pub fn at_child<M, F>(
    label: impl Into<Arc<str>>,
    select: F,
    p: NodePredicate<M>,
) -> NodePredicate<M>
where
    M: SyntaxTree,
    F: Fn(&M, M::Node) -> Option<M::Node> + Send + Sync + 'static,
{
    from_fn(label, move |node: &M::Node, state: &MatchState<'_, M>| {
        let tree = state.tree();
        select(tree, *node).is_some_and(|child| {
            assert_child(tree, *node, child);
            p.matches_at(&state.child_state(child))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_context, Block, Ident, Method, TestKind, TestTree};
    use crate::{is_same, kind_is, Path};

    fn method_named(name: &'static str) -> Predicate<Method, TestTree> {
        from_fn(format!("named({name})"), move |m: &Method, _: &MatchState<'_, TestTree>| {
            m.name == name
        })
    }

    #[test]
    fn enclosing_finds_nearest_shape() {
        let (semantics, ids) = sample_context();
        let in_foo = enclosing(method_named("foo"));

        assert!(in_foo.matches_at(&semantics.state_at(ids.arg_x).unwrap()));
        assert!(in_foo.matches_at(&semantics.state_at(ids.s3).unwrap()));
        assert!(!in_foo.matches_at(&semantics.state_at(ids.empty_body).unwrap()));
    }

    #[test]
    fn enclosing_is_strict() {
        let (semantics, ids) = sample_context();
        let in_foo = enclosing(method_named("foo"));
        assert!(!in_foo.matches_at(&semantics.state_at(ids.foo).unwrap()));
        assert!(!in_foo.matches_at(&semantics.root_state()));
    }

    #[test]
    fn enclosing_reanchors_state_at_ancestor() {
        let (semantics, ids) = sample_context();
        let anchored = enclosing::<Method, TestTree>(from_fn(
            "at_method",
            move |_: &Method, s: &MatchState<'_, TestTree>| {
                s.leaf() == ids.foo && s.path().depth() == 1
            },
        ));
        assert!(anchored.matches_at(&semantics.state_at(ids.arg_y).unwrap()));
    }

    #[test]
    fn enclosing_node_checks_every_ancestor() {
        let (semantics, ids) = sample_context();
        let under_unit = enclosing_node(kind_is::<TestTree>(TestKind::Unit));
        let under_block = enclosing_node(kind_is::<TestTree>(TestKind::Block));

        assert!(under_unit.matches_at(&semantics.state_at(ids.arg_x).unwrap()));
        assert!(under_block.matches_at(&semantics.state_at(ids.arg_x).unwrap()));
        assert!(!under_block.matches_at(&semantics.state_at(ids.foo).unwrap()));
        assert!(!under_unit.matches_at(&semantics.root_state()));
    }

    #[test]
    fn parent_node_is_false_at_root() {
        let (semantics, ids) = sample_context();
        let parent_is_call = parent_node(kind_is::<TestTree>(TestKind::Call));
        assert!(parent_is_call.matches_at(&semantics.state_at(ids.arg_x).unwrap()));
        assert!(!parent_is_call.matches_at(&semantics.state_at(ids.call).unwrap()));
        assert!(!parent_is_call.matches_at(&semantics.root_state()));
    }

    #[test]
    fn contains_includes_self_and_descendants() {
        let (semantics, ids) = sample_context();
        let has_y = contains_shape(from_fn("y", |i: &Ident, _: &MatchState<'_, TestTree>| {
            i.name == "y"
        }));

        assert!(has_y.matches_at(&semantics.root_state()));
        assert!(has_y.matches_at(&semantics.state_at(ids.s1).unwrap()));
        assert!(has_y.matches_at(&semantics.state_at(ids.arg_y).unwrap()));
        assert!(!has_y.matches_at(&semantics.state_at(ids.s2).unwrap()));
        assert!(!has_y.matches_at(&semantics.state_at(ids.baz).unwrap()));
    }

    #[test]
    fn contains_visits_with_correct_paths() {
        let (semantics, _) = sample_context();
        // Never matches, but asserts every visited path is the real one.
        let checks_path = from_fn("checks_path", move |n: &u32, s: &MatchState<'_, TestTree>| {
            let expected = Path::locate(s.tree(), *n).unwrap();
            assert_eq!(s.path(), &expected);
            false
        });
        assert!(!contains(checks_path).matches_at(&semantics.root_state()));
    }

    fn next_is(target: u32) -> NodePredicate<TestTree> {
        sibling(1, Block::statements, is_same(target))
    }

    #[test]
    fn next_sibling_within_block() {
        let (semantics, ids) = sample_context();
        let next_is_s3 = next_is(ids.s3);

        assert!(next_is_s3.matches_at(&semantics.state_at(ids.s2).unwrap()));
        assert!(!next_is_s3.matches_at(&semantics.state_at(ids.s3).unwrap()));
        assert!(!next_is_s3.matches_at(&semantics.state_at(ids.s1).unwrap()));
    }

    #[test]
    fn previous_sibling_out_of_range_is_false() {
        let (semantics, ids) = sample_context();
        let prev_is_s1 = sibling(-1, Block::statements, is_same::<TestTree>(ids.s1));
        assert!(prev_is_s1.matches_at(&semantics.state_at(ids.s2).unwrap()));
        assert!(!prev_is_s1.matches_at(&semantics.state_at(ids.s1).unwrap()));
    }

    #[test]
    fn sibling_of_nested_node_is_false() {
        let (semantics, ids) = sample_context();
        // `call` sits inside s1, so it is not itself a statement of the block.
        assert!(!next_is(ids.s2).matches_at(&semantics.state_at(ids.call).unwrap()));
        // No enclosing block at all.
        assert!(!next_is(ids.s2).matches_at(&semantics.state_at(ids.foo).unwrap()));
    }

    #[test]
    fn sibling_evaluates_with_block_child_path() {
        let (semantics, ids) = sample_context();
        let body = ids.body;
        let sees_block_parent = sibling(
            1,
            Block::statements,
            from_fn("parent_is_block", move |_: &u32, s: &MatchState<'_, TestTree>| {
                s.path().parent().map(Path::leaf) == Some(body)
            }),
        );
        assert!(sees_block_parent.matches_at(&semantics.state_at(ids.s1).unwrap()));
    }

    #[test]
    fn at_child_selects_and_reanchors() {
        let (semantics, ids) = sample_context();
        let first_arg_is_x = at_child(
            "first_child",
            |tree: &TestTree, node| tree.children(node).first().copied(),
            is_same::<TestTree>(ids.arg_x),
        );
        assert!(first_arg_is_x.matches_at(&semantics.state_at(ids.call).unwrap()));
        assert!(!first_arg_is_x.matches_at(&semantics.state_at(ids.s2).unwrap()));
    }
}
