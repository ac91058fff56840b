//! Expression matchers: invocations and their arguments, literals, operators
//! and the statements that wrap expressions.

use crate::{
    Binary, BinaryOp, CompoundAssignment, CompoundOp, ExpressionStatement, JavaPredicate, JavaTree,
    Kind, LiteralValue, MethodInvocation, Node, NodeId, Return,
};
use arbor::{
    and, from_fn, kind_any_of, type_gate, MatchQuantifier, MatchState, MultiMatcher, Predicate,
    Selected,
};
use std::borrow::Cow;

// ═══════════════════════════════════════════════════════════════════════════════
// Invocations
// ═══════════════════════════════════════════════════════════════════════════════

fn arguments_of(tree: &JavaTree, node: NodeId) -> Selected<'_, NodeId> {
    match tree.node(node) {
        Node::MethodInvocation(call) => Cow::Borrowed(call.arguments()),
        Node::NewClass(new) => Cow::Borrowed(new.arguments.as_slice()),
        _ => Cow::Borrowed(&[]),
    }
}

/// Quantified match over the arguments of a method call or `new` expression.
pub fn arguments_matcher(quantifier: MatchQuantifier, p: JavaPredicate) -> MultiMatcher<JavaTree> {
    MultiMatcher::new("arguments", quantifier, arguments_of, p)
}

/// Matches calls whose arguments satisfy `p` under `quantifier`.
/// False for anything that is not a call.
pub fn has_arguments(quantifier: MatchQuantifier, p: JavaPredicate) -> JavaPredicate {
    and([
        kind_any_of([Kind::MethodInvocation, Kind::NewClass]),
        arguments_matcher(quantifier, p).into_predicate(),
    ])
}

/// Matches invocations whose `index`-th argument satisfies `p`.
pub fn argument(index: usize, p: JavaPredicate) -> Predicate<MethodInvocation, JavaTree> {
    from_fn(
        format!("argument({index})"),
        move |call: &MethodInvocation, state: &MatchState<'_, JavaTree>| {
            call.arguments
                .get(index)
                .is_some_and(|&arg| p.matches_at(&state.child_state(arg)))
        },
    )
}

/// Matches invocations with exactly `count` arguments.
pub fn argument_count(count: usize) -> Predicate<MethodInvocation, JavaTree> {
    from_fn(
        format!("argument_count({count})"),
        move |call: &MethodInvocation, _: &MatchState<'_, JavaTree>| call.arguments.len() == count,
    )
}

/// The receiver expression of `invocation`: `a` in `a.m()`.
///
/// `None` for unqualified calls (`m()`) and for non-invocations.
#[must_use]
pub fn receiver_of(tree: &JavaTree, invocation: NodeId) -> Option<NodeId> {
    let Node::MethodInvocation(call) = tree.node(invocation) else {
        return None;
    };
    match tree.node(call.select) {
        Node::MemberSelect(select) => Some(select.expression),
        _ => None,
    }
}

/// Matches invocations whose receiver satisfies `p`. False for unqualified calls.
pub fn receiver(p: JavaPredicate) -> JavaPredicate {
    from_fn("receiver", move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
        let tree = state.tree();
        let Node::MethodInvocation(call) = tree.node(*node) else {
            return false;
        };
        receiver_of(tree, *node)
            .is_some_and(|expr| p.matches_at(&state.child_state(call.select).child_state(expr)))
    })
}

/// Matches invocations whose method select (`a.m` in `a.m()`) satisfies `p`.
pub fn method_invocation(p: JavaPredicate) -> JavaPredicate {
    type_gate(from_fn(
        "method_invocation",
        move |call: &MethodInvocation, state: &MatchState<'_, JavaTree>| {
            p.matches_at(&state.child_state(call.select))
        },
    ))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Literals
// ═══════════════════════════════════════════════════════════════════════════════

fn literal_is<F>(label: String, test: F) -> JavaPredicate
where
    F: Fn(&LiteralValue) -> bool + Send + Sync + 'static,
{
    from_fn(label, move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
        matches!(state.tree().node(*node), Node::Literal(lit) if test(&lit.value))
    })
}

/// Matches `int` literals equal to `value`.
pub fn int_literal(value: i64) -> JavaPredicate {
    literal_is(format!("int_literal({value})"), move |v| *v == LiteralValue::Int(value))
}

/// Matches the boolean literal `value`.
pub fn boolean_literal(value: bool) -> JavaPredicate {
    literal_is(format!("boolean_literal({value})"), move |v| *v == LiteralValue::Bool(value))
}

/// Matches string literals equal to `value`.
pub fn string_literal(value: &str) -> JavaPredicate {
    let owned = value.to_owned();
    literal_is(format!("string_literal({value:?})"), move |v| {
        matches!(v, LiteralValue::Str(s) if *s == owned)
    })
}

/// Matches expressions that can never be null: any non-null literal and
/// class literals (`Foo.class`).
pub fn non_null_literal() -> JavaPredicate {
    from_fn("non_null_literal", |node: &NodeId, state: &MatchState<'_, JavaTree>| {
        match state.tree().node(*node) {
            Node::Literal(lit) => lit.value != LiteralValue::Null,
            Node::MemberSelect(select) => select.identifier == "class",
            _ => false,
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════════════

/// Evaluates `p` at the expression inside any number of parentheses.
///
/// The state follows the path down through each `Parenthesized` node.
pub fn ignore_parens(p: JavaPredicate) -> JavaPredicate {
    from_fn("ignore_parens", move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
        let tree = state.tree();
        let mut current = state.clone();
        let mut leaf = *node;
        while let Node::Parenthesized(paren) = tree.node(leaf) {
            leaf = paren.expression;
            current = current.child_state(leaf);
        }
        p.matches_at(&current)
    })
}

/// Matches `left op right` where both operands satisfy their predicates.
pub fn binary(op: BinaryOp, left: JavaPredicate, right: JavaPredicate) -> JavaPredicate {
    type_gate(from_fn(
        format!("binary({op:?})"),
        move |expr: &Binary, state: &MatchState<'_, JavaTree>| {
            expr.op == op
                && left.matches_at(&state.child_state(expr.left))
                && right.matches_at(&state.child_state(expr.right))
        },
    ))
}

/// Matches compound assignments using one of `ops` whose variable and value
/// satisfy their predicates.
pub fn compound_assignment(
    ops: impl IntoIterator<Item = CompoundOp>,
    variable: JavaPredicate,
    expression: JavaPredicate,
) -> JavaPredicate {
    let ops: Vec<CompoundOp> = ops.into_iter().collect();
    type_gate(from_fn(
        format!("compound_assignment({ops:?})"),
        move |assign: &CompoundAssignment, state: &MatchState<'_, JavaTree>| {
            ops.contains(&assign.op)
                && variable.matches_at(&state.child_state(assign.variable))
                && expression.matches_at(&state.child_state(assign.expression))
        },
    ))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Expression-carrying statements
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches expression statements whose expression satisfies `p`.
pub fn expression_statement(p: JavaPredicate) -> JavaPredicate {
    type_gate(from_fn(
        "expression_statement",
        move |stmt: &ExpressionStatement, state: &MatchState<'_, JavaTree>| {
            p.matches_at(&state.child_state(stmt.expression))
        },
    ))
}

/// Matches `return` statements whose expression satisfies `p`.
/// False for a bare `return;`.
pub fn return_statement(p: JavaPredicate) -> JavaPredicate {
    type_gate(from_fn(
        "return_statement",
        move |stmt: &Return, state: &MatchState<'_, JavaTree>| {
            stmt.expression
                .is_some_and(|expr| p.matches_at(&state.child_state(expr)))
        },
    ))
}
