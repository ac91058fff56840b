//! Structural matchers: enclosing declarations, neighbouring statements and
//! surrounding control flow.

use crate::{Block, ClassDecl, JavaPredicate, JavaTree, Kind, MethodDecl, Modifier, NodeId};
use arbor::{enclosing, from_fn, sibling, MatchState, Predicate, SyntaxTree};

/// Matches when the nearest enclosing block satisfies `p`.
pub fn enclosing_block(p: Predicate<Block, JavaTree>) -> JavaPredicate {
    enclosing(p)
}

/// Matches when the nearest enclosing class-like declaration satisfies `p`.
pub fn enclosing_class(p: Predicate<ClassDecl, JavaTree>) -> JavaPredicate {
    enclosing(p)
}

/// Matches when the nearest enclosing method or constructor satisfies `p`.
pub fn enclosing_method(p: Predicate<MethodDecl, JavaTree>) -> JavaPredicate {
    enclosing(p)
}

/// Matches a statement whose following statement in the enclosing block
/// satisfies `p`. False for the last statement and outside blocks.
pub fn next_statement(p: JavaPredicate) -> JavaPredicate {
    sibling(1, Block::statements, p)
}

/// Matches a statement whose preceding statement in the enclosing block
/// satisfies `p`. False for the first statement and outside blocks.
pub fn previous_statement(p: JavaPredicate) -> JavaPredicate {
    sibling(-1, Block::statements, p)
}

/// Matches the last statement of its enclosing block.
pub fn is_last_statement_in_block() -> JavaPredicate {
    from_fn(
        "is_last_statement_in_block",
        |node: &NodeId, state: &MatchState<'_, JavaTree>| {
            state
                .find_enclosing::<Block>()
                .is_some_and(|(_, block)| block.statements.last() == Some(node))
        },
    )
}

/// Matches nodes inside a loop body or condition, without crossing a method
/// or class boundary.
pub fn in_loop() -> JavaPredicate {
    from_fn("in_loop", |_: &NodeId, state: &MatchState<'_, JavaTree>| {
        let tree = state.tree();
        for ancestor in state.path().ancestors() {
            match tree.kind(ancestor.leaf()) {
                Kind::Method | Kind::Class => return false,
                kind if Kind::LOOPS.contains(&kind) => return true,
                _ => {}
            }
        }
        false
    })
}

/// Matches nodes inside a `synchronized` block, or inside a method declared
/// `synchronized`.
pub fn in_synchronized() -> JavaPredicate {
    from_fn("in_synchronized", |_: &NodeId, state: &MatchState<'_, JavaTree>| {
        let tree = state.tree();
        let in_block = state
            .path()
            .ancestors()
            .any(|ancestor| tree.kind(ancestor.leaf()) == Kind::Synchronized);
        in_block
            || state
                .find_enclosing::<MethodDecl>()
                .is_some_and(|(_, method)| method.modifiers.contains(Modifier::Synchronized))
    })
}
