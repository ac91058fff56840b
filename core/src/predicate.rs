//! Predicate - Boolean expressions over tree nodes in context
//!
//! A predicate answers "does this node, at this position, satisfy X". It sees
//! the node (`&T`, either a general node handle or a narrowed shape) and the
//! [`MatchState`] locating it in the tree.
//!
//! Predicates are values: build them once from the combinators in this module
//! and evaluate them any number of times, from any thread.

use crate::tree::shape_name;
use crate::{MatchState, MatcherError, Narrow, PredicateTrace, SyntaxTree};
use crate::{MAX_DEPTH, MAX_PREDICATES_PER_COMPOUND};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// A predicate over general nodes of tree model `M`.
pub type NodePredicate<M> = Predicate<<M as SyntaxTree>::Node, M>;

/// A named leaf predicate backed by a shared closure.
///
/// Leaves are where domain logic lives: kind checks, name checks, type
/// queries, navigation adapters. The label shows up in traces and `Debug`.
pub struct Leaf<T, M: SyntaxTree> {
    label: Arc<str>,
    eval: Arc<dyn Fn(&T, &MatchState<'_, M>) -> bool + Send + Sync>,
}

impl<T, M: SyntaxTree> Leaf<T, M> {
    /// Label used in traces.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluate the leaf.
    pub fn evaluate(&self, node: &T, state: &MatchState<'_, M>) -> bool {
        (self.eval)(node, state)
    }
}

impl<T, M: SyntaxTree> Clone for Leaf<T, M> {
    fn clone(&self) -> Self {
        Self {
            label: Arc::clone(&self.label),
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T, M: SyntaxTree> Debug for Leaf<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Leaf").field(&self.label).finish()
    }
}

/// Composite predicate with boolean logic.
///
/// Evaluation uses short-circuit semantics, left to right. Children are never
/// reordered, so a cheap check placed first guards an expensive one.
///
/// # Variants
///
/// - `Always` / `Never` - constants
/// - `Leaf` - a named closure
/// - `And` - all children must match (empty is `true`)
/// - `Or` - any child must match (empty is `false`)
/// - `Not` - inverts the inner result
///
/// # Example
///
/// ```ignore
/// // A method invocation whose name starts with "assert", inside a loop
/// let p = and([method_name_starts_with("assert"), in_loop()]);
/// assert!(p.matches(&state.leaf(), &state));
/// ```
pub enum Predicate<T, M: SyntaxTree> {
    /// Matches everything.
    Always,

    /// Matches nothing.
    Never,

    /// A single named predicate.
    Leaf(Leaf<T, M>),

    /// Inverts the result of the inner predicate (logical NOT).
    Not(Box<Predicate<T, M>>),

    /// All predicates must match (logical AND).
    /// Short-circuits on the first `false`.
    And(Vec<Predicate<T, M>>),

    /// Any predicate must match (logical OR).
    /// Short-circuits on the first `true`.
    Or(Vec<Predicate<T, M>>),
}

impl<T, M: SyntaxTree> Predicate<T, M> {
    /// Evaluate this predicate against `node` at `state`.
    ///
    /// Recursion depth is bounded by [`validate()`](Self::validate), which
    /// config loading enforces.
    pub fn matches(&self, node: &T, state: &MatchState<'_, M>) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Leaf(leaf) => leaf.evaluate(node, state),
            Self::Not(p) => !p.matches(node, state),
            Self::And(predicates) => predicates.iter().all(|p| p.matches(node, state)),
            Self::Or(predicates) => predicates.iter().any(|p| p.matches(node, state)),
        }
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Unlike [`matches()`](Self::matches), this does NOT short-circuit
    /// And/Or - all children are evaluated for maximum debugging visibility.
    /// The `matched` result is still correct.
    #[must_use]
    pub fn evaluate_with_trace(&self, node: &T, state: &MatchState<'_, M>) -> PredicateTrace {
        match self {
            Self::Always => PredicateTrace::Const { matched: true },
            Self::Never => PredicateTrace::Const { matched: false },
            Self::Leaf(leaf) => PredicateTrace::Leaf {
                matched: leaf.evaluate(node, state),
                label: leaf.label().to_owned(),
            },
            Self::Not(p) => {
                let inner = p.evaluate_with_trace(node, state);
                PredicateTrace::Not {
                    matched: !inner.matched(),
                    inner: Box::new(inner),
                }
            }
            Self::And(predicates) => {
                let children: Vec<PredicateTrace> = predicates
                    .iter()
                    .map(|p| p.evaluate_with_trace(node, state))
                    .collect();
                let matched = children.iter().all(PredicateTrace::matched);
                PredicateTrace::And { matched, children }
            }
            Self::Or(predicates) => {
                let children: Vec<PredicateTrace> = predicates
                    .iter()
                    .map(|p| p.evaluate_with_trace(node, state))
                    .collect();
                let matched = children.iter().any(PredicateTrace::matched);
                PredicateTrace::Or { matched, children }
            }
        }
    }

    /// Compose predicates with AND semantics, optimizing for common cases.
    ///
    /// - Empty → `catch_all`
    /// - Single → unwrapped (no wrapping overhead)
    /// - Multiple → `And(predicates)`
    #[must_use]
    pub fn from_all(mut predicates: Vec<Self>, catch_all: Self) -> Self {
        match predicates.len() {
            0 => catch_all,
            1 => predicates.pop().unwrap_or(catch_all),
            _ => Self::And(predicates),
        }
    }

    /// Compose predicates with OR semantics, optimizing for common cases.
    ///
    /// Symmetric with [`from_all`](Self::from_all).
    #[must_use]
    pub fn from_any(mut predicates: Vec<Self>, catch_all: Self) -> Self {
        match predicates.len() {
            0 => catch_all,
            1 => predicates.pop().unwrap_or(catch_all),
            _ => Self::Or(predicates),
        }
    }

    /// Returns `true` if this is a `Leaf` predicate.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns `true` if this is an `And` predicate.
    #[must_use]
    pub fn is_and(&self) -> bool {
        matches!(self, Self::And(_))
    }

    /// Returns `true` if this is an `Or` predicate.
    #[must_use]
    pub fn is_or(&self) -> bool {
        matches!(self, Self::Or(_))
    }

    /// Returns `true` if this is a `Not` predicate.
    #[must_use]
    pub fn is_not(&self) -> bool {
        matches!(self, Self::Not(_))
    }

    /// Calculate the depth of this predicate tree.
    ///
    /// Leaves count as depth 1 regardless of what their closures wrap.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Always | Self::Never | Self::Leaf(_) => 1,
            Self::And(ps) | Self::Or(ps) => 1 + ps.iter().map(Self::depth).max().unwrap_or(0),
            Self::Not(p) => 1 + p.depth(),
        }
    }

    /// Validate depth and compound width limits.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::DepthExceeded`] if deeper than [`MAX_DEPTH`], or
    /// [`MatcherError::TooManyPredicates`] if any `And`/`Or` has more than
    /// [`MAX_PREDICATES_PER_COMPOUND`] children.
    pub fn validate(&self) -> Result<(), MatcherError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(MatcherError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        self.validate_width()
    }

    fn validate_width(&self) -> Result<(), MatcherError> {
        match self {
            Self::Always | Self::Never | Self::Leaf(_) => Ok(()),
            Self::Not(p) => p.validate_width(),
            Self::And(ps) | Self::Or(ps) => {
                if ps.len() > MAX_PREDICATES_PER_COMPOUND {
                    return Err(MatcherError::TooManyPredicates {
                        count: ps.len(),
                        max: MAX_PREDICATES_PER_COMPOUND,
                    });
                }
                ps.iter().try_for_each(Self::validate_width)
            }
        }
    }
}

impl<M: SyntaxTree> Predicate<M::Node, M> {
    /// Evaluate a node predicate at the node the state points to.
    pub fn matches_at(&self, state: &MatchState<'_, M>) -> bool {
        self.matches(&state.leaf(), state)
    }

    /// Traced counterpart of [`matches_at`](Self::matches_at).
    #[must_use]
    pub fn trace_at(&self, state: &MatchState<'_, M>) -> PredicateTrace {
        self.evaluate_with_trace(&state.leaf(), state)
    }
}

impl<T, M: SyntaxTree> Clone for Predicate<T, M> {
    fn clone(&self) -> Self {
        match self {
            Self::Always => Self::Always,
            Self::Never => Self::Never,
            Self::Leaf(leaf) => Self::Leaf(leaf.clone()),
            Self::Not(p) => Self::Not(p.clone()),
            Self::And(ps) => Self::And(ps.clone()),
            Self::Or(ps) => Self::Or(ps.clone()),
        }
    }
}

impl<T, M: SyntaxTree> Debug for Predicate<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Never => f.write_str("Never"),
            Self::Leaf(leaf) => Debug::fmt(leaf, f),
            Self::Not(p) => f.debug_tuple("Not").field(p).finish(),
            Self::And(ps) => f.debug_tuple("And").field(&ps.len()).finish(),
            Self::Or(ps) => f.debug_tuple("Or").field(&ps.len()).finish(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Combinators
// ═══════════════════════════════════════════════════════════════════════════════

/// A predicate that matches every node.
#[must_use]
pub fn always<T, M: SyntaxTree>() -> Predicate<T, M> {
    Predicate::Always
}

/// A predicate that matches no node.
#[must_use]
pub fn never<T, M: SyntaxTree>() -> Predicate<T, M> {
    Predicate::Never
}

/// Logical NOT.
#[must_use]
pub fn negate<T, M: SyntaxTree>(p: Predicate<T, M>) -> Predicate<T, M> {
    Predicate::Not(Box::new(p))
}

/// Logical AND, evaluated left to right. `and([])` matches everything.
#[must_use]
pub fn and<T, M: SyntaxTree>(
    predicates: impl IntoIterator<Item = Predicate<T, M>>,
) -> Predicate<T, M> {
    Predicate::And(predicates.into_iter().collect())
}

/// Logical OR, evaluated left to right. `or([])` matches nothing.
#[must_use]
pub fn or<T, M: SyntaxTree>(
    predicates: impl IntoIterator<Item = Predicate<T, M>>,
) -> Predicate<T, M> {
    Predicate::Or(predicates.into_iter().collect())
}

/// A leaf predicate from a closure.
///
/// The closure must be pure: its answer may depend only on the node, the
/// state and values it captured at construction.
pub fn from_fn<T, M, F>(label: impl Into<Arc<str>>, f: F) -> Predicate<T, M>
where
    M: SyntaxTree,
    F: Fn(&T, &MatchState<'_, M>) -> bool + Send + Sync + 'static,
{
    Predicate::Leaf(Leaf {
        label: label.into(),
        eval: Arc::new(f),
    })
}

/// Lift a predicate over shape `S` to general nodes.
///
/// Nodes that do not narrow to `S` do not match; otherwise `p` decides.
pub fn type_gate<S, M>(p: Predicate<S, M>) -> NodePredicate<M>
where
    S: Narrow<M>,
    M: SyntaxTree,
{
    from_fn(
        format!("type_gate<{}>", shape_name::<S>()),
        move |node: &M::Node, state: &MatchState<'_, M>| {
            S::narrow(state.tree(), *node).is_some_and(|shape| p.matches(shape, state))
        },
    )
}

/// Matches nodes whose kind is `kind`.
pub fn kind_is<M: SyntaxTree>(kind: M::Kind) -> NodePredicate<M> {
    from_fn(format!("kind_is({kind:?})"), move |node: &M::Node, state: &MatchState<'_, M>| {
        state.tree().kind(*node) == kind
    })
}

/// Matches nodes whose kind is one of `kinds`.
pub fn kind_any_of<M: SyntaxTree>(kinds: impl IntoIterator<Item = M::Kind>) -> NodePredicate<M> {
    let kinds: Vec<M::Kind> = kinds.into_iter().collect();
    from_fn(format!("kind_any_of({kinds:?})"), move |node: &M::Node, state: &MatchState<'_, M>| {
        kinds.contains(&state.tree().kind(*node))
    })
}

/// Matches exactly `target`.
pub fn is_same<M: SyntaxTree>(target: M::Node) -> NodePredicate<M> {
    from_fn(format!("is_same({target:?})"), move |node: &M::Node, _: &MatchState<'_, M>| {
        *node == target
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_context, Call, Method, TestKind, TestTree};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(label: &str, result: bool, calls: &Arc<AtomicUsize>) -> NodePredicate<TestTree> {
        let calls = Arc::clone(calls);
        from_fn(label, move |_: &u32, _: &MatchState<'_, TestTree>| {
            calls.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    #[test]
    fn test_empty_and_returns_true() {
        let (semantics, _) = sample_context();
        let pred = and::<u32, TestTree>([]);
        assert!(pred.matches_at(&semantics.root_state()));
    }

    #[test]
    fn test_empty_or_returns_false() {
        let (semantics, _) = sample_context();
        let pred = or::<u32, TestTree>([]);
        assert!(!pred.matches_at(&semantics.root_state()));
    }

    #[test]
    fn test_constants() {
        let (semantics, _) = sample_context();
        let root = semantics.root_state();
        assert!(always::<u32, TestTree>().matches_at(&root));
        assert!(!never::<u32, TestTree>().matches_at(&root));
        assert!(negate(never::<u32, TestTree>()).matches_at(&root));
    }

    #[test]
    fn test_and_short_circuits_left_to_right() {
        let (semantics, _) = sample_context();
        let calls = Arc::new(AtomicUsize::new(0));
        let pred = and([
            counting("first", false, &calls),
            counting("second", true, &calls),
        ]);

        assert!(!pred.matches_at(&semantics.root_state()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_or_short_circuits_left_to_right() {
        let (semantics, _) = sample_context();
        let calls = Arc::new(AtomicUsize::new(0));
        let pred = or([
            counting("first", true, &calls),
            counting("second", false, &calls),
        ]);

        assert!(pred.matches_at(&semantics.root_state()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_kind_is() {
        let (semantics, ids) = sample_context();
        let method = kind_is::<TestTree>(TestKind::Method);
        assert!(method.matches_at(&semantics.state_at(ids.foo).unwrap()));
        assert!(!method.matches_at(&semantics.state_at(ids.call).unwrap()));
    }

    #[test]
    fn test_kind_any_of() {
        let (semantics, ids) = sample_context();
        let pred = kind_any_of::<TestTree>([TestKind::Call, TestKind::Ident]);
        assert!(pred.matches_at(&semantics.state_at(ids.call).unwrap()));
        assert!(pred.matches_at(&semantics.state_at(ids.arg_x).unwrap()));
        assert!(!pred.matches_at(&semantics.state_at(ids.s1).unwrap()));
    }

    #[test]
    fn test_is_same() {
        let (semantics, ids) = sample_context();
        let pred = is_same::<TestTree>(ids.s2);
        assert!(pred.matches_at(&semantics.state_at(ids.s2).unwrap()));
        assert!(!pred.matches_at(&semantics.state_at(ids.s3).unwrap()));
    }

    #[test]
    fn test_type_gate_mismatch_is_false() {
        let (semantics, ids) = sample_context();
        let named_foo = type_gate(from_fn("named(foo)", |m: &Method, _: &MatchState<'_, TestTree>| {
            m.name == "foo"
        }));

        assert!(named_foo.matches_at(&semantics.state_at(ids.foo).unwrap()));
        assert!(!named_foo.matches_at(&semantics.state_at(ids.baz).unwrap()));
        // Not a method at all: false, never a panic.
        assert!(!named_foo.matches_at(&semantics.state_at(ids.call).unwrap()));
    }

    #[test]
    fn test_type_gate_label_names_shape() {
        let gate = type_gate::<Call, TestTree>(always());
        match gate {
            Predicate::Leaf(leaf) => assert_eq!(leaf.label(), "type_gate<Call>"),
            other => panic!("expected Leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_predicate_depth() {
        let leaf = kind_is::<TestTree>(TestKind::Stmt);
        assert_eq!(leaf.depth(), 1);

        let and_pred = and([leaf.clone()]);
        assert_eq!(and_pred.depth(), 2);

        let nested = negate(and([leaf]));
        assert_eq!(nested.depth(), 3);
    }

    #[test]
    fn test_validate_depth_exceeded() {
        let mut pred = always::<u32, TestTree>();
        for _ in 0..MAX_DEPTH {
            pred = negate(pred);
        }
        let err = pred.validate().unwrap_err();
        assert_eq!(
            err,
            MatcherError::DepthExceeded {
                depth: MAX_DEPTH + 1,
                max: MAX_DEPTH
            }
        );
    }

    #[test]
    fn test_validate_width_exceeded() {
        let wide = or((0..=MAX_PREDICATES_PER_COMPOUND).map(|_| never::<u32, TestTree>()));
        let err = negate(wide).validate().unwrap_err();
        assert!(matches!(err, MatcherError::TooManyPredicates { .. }));
    }

    #[test]
    fn test_predicates_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NodePredicate<TestTree>>();
        assert_send_sync::<Predicate<Method, TestTree>>();
    }

    // ========== Smart Constructor Tests ==========

    #[test]
    fn from_all_empty_returns_catch_all() {
        let pred = Predicate::<u32, TestTree>::from_all(vec![], Predicate::Always);
        assert!(matches!(pred, Predicate::Always));
    }

    #[test]
    fn from_all_single_unwraps() {
        let pred = Predicate::from_all(vec![kind_is::<TestTree>(TestKind::Call)], always());
        assert!(pred.is_leaf());
    }

    #[test]
    fn from_all_multiple_wraps_and() {
        let pred = Predicate::from_all(vec![never::<u32, TestTree>(), always()], always());
        assert!(pred.is_and());
    }

    #[test]
    fn from_any_empty_returns_catch_all() {
        let pred = Predicate::<u32, TestTree>::from_any(vec![], Predicate::Never);
        assert!(matches!(pred, Predicate::Never));
    }

    #[test]
    fn from_any_multiple_wraps_or() {
        let pred = Predicate::from_any(vec![never::<u32, TestTree>(), always()], never());
        assert!(pred.is_or());
    }

    // ========== Trace Tests ==========

    #[test]
    fn trace_and_partial_failure_evaluates_all() {
        let (semantics, ids) = sample_context();
        let state = semantics.state_at(ids.call).unwrap();
        let pred = and([
            kind_is::<TestTree>(TestKind::Method),
            kind_is::<TestTree>(TestKind::Call),
        ]);
        let trace = pred.trace_at(&state);

        assert!(!trace.matched());
        if let PredicateTrace::And { children, .. } = &trace {
            assert_eq!(children.len(), 2);
            assert!(!children[0].matched());
            assert!(children[1].matched()); // would have been skipped by matches()
        } else {
            panic!("expected And trace");
        }
    }

    #[test]
    fn trace_not() {
        let (semantics, _) = sample_context();
        let pred = negate(kind_is::<TestTree>(TestKind::Call));
        let trace = pred.trace_at(&semantics.root_state());

        assert!(trace.matched());
        if let PredicateTrace::Not { inner, .. } = &trace {
            assert!(!inner.matched());
        } else {
            panic!("expected Not trace");
        }
    }

    #[test]
    fn trace_result_matches_evaluate() {
        let (semantics, ids) = sample_context();
        let pred = and([
            or([kind_is::<TestTree>(TestKind::Unit), kind_is(TestKind::Ident)]),
            negate(is_same(ids.arg_y)),
        ]);

        for node in [ids.unit, ids.arg_x, ids.arg_y, ids.call] {
            let state = semantics.state_at(node).unwrap();
            assert_eq!(pred.matches_at(&state), pred.trace_at(&state).matched());
        }
    }
}
