//! Evaluation trace types for debugging predicate behavior.
//!
//! Trace types mirror [`Predicate`](crate::Predicate) but capture evaluation
//! results instead of closures. Use `evaluate_with_trace()` to see which
//! sub-expressions decided a match.
//!
//! # Example
//!
//! ```ignore
//! let trace = predicate.evaluate_with_trace(&node, &state);
//! println!("{trace:#?}");
//! assert_eq!(trace.matched(), predicate.matches(&node, &state));
//! ```

use std::fmt;

/// Trace of a predicate evaluation.
///
/// In And/Or, ALL children are evaluated (no short-circuit) for maximum
/// debugging value. The `matched` result is still correct.
pub enum PredicateTrace {
    /// `always()` or `never()`.
    Const {
        /// The constant result.
        matched: bool,
    },
    /// A leaf predicate evaluation.
    Leaf {
        /// Whether this predicate matched.
        matched: bool,
        /// The leaf's label (e.g., `"kind_is(Method)"`).
        label: String,
    },
    /// AND: all children must match.
    And {
        /// Whether all children matched.
        matched: bool,
        /// Trace of each child (all evaluated, no short-circuit).
        children: Vec<PredicateTrace>,
    },
    /// OR: any child must match.
    Or {
        /// Whether any child matched.
        matched: bool,
        /// Trace of each child (all evaluated, no short-circuit).
        children: Vec<PredicateTrace>,
    },
    /// NOT: inverts inner result.
    Not {
        /// Whether the NOT predicate matched (i.e., inner did NOT match).
        matched: bool,
        /// Trace of the inner predicate.
        inner: Box<PredicateTrace>,
    },
}

impl PredicateTrace {
    /// Get the overall match result of this predicate.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Const { matched }
            | Self::Leaf { matched, .. }
            | Self::And { matched, .. }
            | Self::Or { matched, .. }
            | Self::Not { matched, .. } => *matched,
        }
    }

    /// Labels of the leaves that matched, in evaluation order.
    #[must_use]
    pub fn matched_leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_matched(&mut out);
        out
    }

    fn collect_matched<'t>(&'t self, out: &mut Vec<&'t str>) {
        match self {
            Self::Const { .. } => {}
            Self::Leaf { matched, label } => {
                if *matched {
                    out.push(label);
                }
            }
            Self::And { children, .. } | Self::Or { children, .. } => {
                for child in children {
                    child.collect_matched(out);
                }
            }
            Self::Not { inner, .. } => inner.collect_matched(out),
        }
    }
}

impl fmt::Debug for PredicateTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const { matched } => f.debug_struct("Const").field("matched", matched).finish(),
            Self::Leaf { matched, label } => f
                .debug_struct("Leaf")
                .field("matched", matched)
                .field("label", label)
                .finish(),
            Self::And { matched, children } => f
                .debug_struct("And")
                .field("matched", matched)
                .field("children", children)
                .finish(),
            Self::Or { matched, children } => f
                .debug_struct("Or")
                .field("matched", matched)
                .field("children", children)
                .finish(),
            Self::Not { matched, inner } => f
                .debug_struct("Not")
                .field("matched", matched)
                .field("inner", inner)
                .finish(),
        }
    }
}
