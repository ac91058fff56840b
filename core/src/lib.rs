//! arbor - composable predicates over immutable syntax trees
//!
//! A query engine for static-analysis checks. Checks are built by composing
//! small predicates over tree nodes; every predicate receives the node plus a
//! [`MatchState`] (where the node sits and what the compilation knows).
//!
//! # Architecture
//!
//! - [`SyntaxTree`] / [`Narrow`] - the seam to the host's tree model
//! - [`Path`] - persistent root-to-node chain, shared by all derived states
//! - [`SemanticContext`] - per-compilation type oracle, name table and memo cache
//! - [`MatchState`] - the position context handed to every predicate
//! - [`Predicate<T, M>`] - boolean algebra (Always, Never, Leaf, Not, And, Or)
//! - [`MultiMatcher`] - quantified (All / AtLeastOne / Last) matching over selected children
//! - Navigation adapters - [`enclosing`], [`contains`], [`sibling`], [`parent_node`], ...
//!
//! # Key Design Insights
//!
//! 1. **Predicates are immutable values.** They hold no mutable state, so one
//!    composed predicate can be shared across threads and compilations.
//!
//! 2. **Type gates, not casts.** A predicate over a narrow shape is lifted to
//!    general nodes with [`type_gate`]; a kind mismatch is `false`, never a panic.
//!
//! 3. **Context follows the evaluation point.** Every adapter that moves
//!    evaluation elsewhere re-anchors the path so the inner predicate sees
//!    its own position.
//!
//! # Example
//!
//! ```
//! use arbor::prelude::*;
//! use std::sync::Arc;
//!
//! struct Tree {
//!     kinds: Vec<&'static str>,
//!     children: Vec<Vec<u32>>,
//! }
//!
//! impl SyntaxTree for Tree {
//!     type Node = u32;
//!     type Kind = &'static str;
//!
//!     fn root(&self) -> u32 { 0 }
//!     fn kind(&self, node: u32) -> &'static str { self.kinds[node as usize] }
//!     fn children(&self, node: u32) -> &[u32] { &self.children[node as usize] }
//! }
//!
//! // class
//! //  └─ method
//! //      └─ return
//! let tree = Tree {
//!     kinds: vec!["class", "method", "return"],
//!     children: vec![vec![1], vec![2], vec![]],
//! };
//! let semantics = SemanticContext::untyped(Arc::new(tree));
//!
//! let returns = contains(kind_is::<Tree>("return"));
//! let inside_class = enclosing_node(kind_is::<Tree>("class"));
//! let check = and([returns, inside_class]);
//!
//! let method = semantics.state_at(1).unwrap();
//! assert!(check.matches_at(&method));
//! assert!(!check.matches_at(&semantics.root_state()));
//! ```
//!
//! # Extensions
//!
//! Tree models live in their own crates:
//!
//! - [`arbor-java`](https://docs.rs/arbor-java) - Java syntax tree and Java-specific adapters

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod cache;
mod multi;
mod navigate;
mod path;
mod predicate;
mod scan;
mod semantics;
mod settings;
mod state;
mod string_match;
mod trace;
mod tree;

#[cfg(test)]
mod testing;

#[cfg(feature = "registry")]
mod config;
#[cfg(feature = "registry")]
mod registry;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Tree seam
pub use path::Path;
pub use tree::{Narrow, SyntaxTree};

// Compilation context
pub use cache::CompilationCache;
pub use semantics::{
    type_from_name, CompilationId, ConstValue, MethodKind, MethodSymbol, Name, NameTable,
    NoTypes, SemanticContext, Supplier, TypeHandle, TypeOracle,
};
pub use settings::{EngineConfig, DEFAULT_CACHE_CAPACITY};
pub use state::MatchState;

// Predicate algebra
pub use predicate::{
    always, and, from_fn, is_same, kind_any_of, kind_is, negate, never, or, type_gate, Leaf,
    NodePredicate, Predicate,
};
pub use trace::PredicateTrace;

// Multi-child matching
pub use multi::{
    all_children, match_children, MatchQuantifier, MultiMatchResult, MultiMatcher, Selected,
};

// Navigation adapters
pub use navigate::{
    at_child, contains, contains_shape, enclosing, enclosing_node, parent_node, sibling,
};

// Drivers
pub use scan::{for_each_state, matching_paths};

// Name matching
pub use string_match::{StringMatchSpec, StringMatcher};

// Registry (feature-gated)
#[cfg(feature = "registry")]
pub use config::{ChildrenConfig, NestedConfig, PredicateConfig, TypedConfig, UnitConfig};
#[cfg(feature = "registry")]
pub use registry::{
    register_core_predicates, IntoPredicate, PredicateLoader, Registry, RegistryBuilder,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    // Tree and position
    pub use crate::{MatchState, Narrow, Path, SemanticContext, SyntaxTree, TypeOracle};

    // Predicates and combinators
    pub use crate::{
        always, and, from_fn, is_same, kind_any_of, kind_is, negate, never, or, type_gate,
        NodePredicate, Predicate, PredicateTrace,
    };

    // Multi-child matching
    pub use crate::{MatchQuantifier, MultiMatcher};

    // Adapters
    pub use crate::{contains, contains_shape, enclosing, enclosing_node, parent_node, sibling};

    // Name matching and errors
    pub use crate::{MatcherError, StringMatchSpec, StringMatcher};
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth for nested predicates.
///
/// This limit protects against stack overflow from deeply nested predicates.
/// Validate at load time via [`Predicate::validate`].
pub const MAX_DEPTH: usize = 32;

/// Maximum number of predicates in a single `And` or `Or` compound predicate.
///
/// Prevents width-based denial-of-service: a compound with millions of
/// children at depth 1 bypasses [`MAX_DEPTH`] but still costs a full scan per node.
pub const MAX_PREDICATES_PER_COMPOUND: usize = 256;

/// Maximum length for non-regex name patterns (exact, prefix, suffix, contains).
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for regex name patterns.
///
/// Shorter limit than [`MAX_PATTERN_LENGTH`] because regex compilation cost
/// scales faster than literal matching.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from predicate construction and validation.
///
/// These errors are raised at load time, never at evaluation time.
/// Fix the configuration and rebuild the predicate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    /// Predicate nesting exceeds [`MAX_DEPTH`].
    #[error("predicate nesting depth is {depth}, but maximum allowed is {max}")]
    DepthExceeded {
        /// Actual depth of the predicate tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// Too many predicates in a compound `And` or `Or`.
    #[error("compound predicate has {count} children, but maximum allowed is {max}")]
    TooManyPredicates {
        /// Actual count of predicates.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A regex or string pattern is invalid.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// A name pattern exceeds the maximum allowed length.
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Configuration deserialization or construction failed.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// The underlying error message.
        reason: String,
    },

    /// A type URL was not found in the registry.
    #[error("unknown {registry} type URL \"{type_url}\"{}", registered_hint(.registry, .available))]
    UnknownTypeUrl {
        /// The unregistered type URL.
        type_url: String,
        /// Which registry was searched.
        registry: &'static str,
        /// Type URLs that ARE registered (for self-correcting error messages).
        available: Vec<String>,
    },
}

fn registered_hint(registry: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!("; no {registry} types are registered")
    } else {
        format!("; registered: {}", available.join(", "))
    }
}
