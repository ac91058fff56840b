//! `MatchState` - where a predicate is being evaluated
//!
//! A state pairs the [`Path`] to the node under evaluation with the
//! compilation's [`SemanticContext`]. States are cheap to derive and never
//! mutated: moving to a child, a parent or an arbitrary ancestor produces a
//! new state that borrows the same semantic context.

use crate::{Narrow, Path, SemanticContext, SyntaxTree, TypeOracle};
use std::fmt;

/// The position context of one predicate evaluation.
///
/// # INV: derived states share semantics
///
/// Every state derived from `s` (via [`with_path`](Self::with_path),
/// [`child_state`](Self::child_state), [`parent_state`](Self::parent_state) or
/// [`find_enclosing`](Self::find_enclosing)) borrows the same
/// `SemanticContext`, and therefore the same per-compilation cache.
pub struct MatchState<'a, M: SyntaxTree> {
    path: Path<M::Node>,
    semantics: &'a SemanticContext<M>,
}

impl<'a, M: SyntaxTree> MatchState<'a, M> {
    /// Anchor a state at `path`.
    #[must_use]
    pub fn new(path: Path<M::Node>, semantics: &'a SemanticContext<M>) -> Self {
        Self { path, semantics }
    }

    /// Path from the current node to the root.
    #[must_use]
    pub fn path(&self) -> &Path<M::Node> {
        &self.path
    }

    /// The node under evaluation.
    #[must_use]
    pub fn leaf(&self) -> M::Node {
        self.path.leaf()
    }

    /// Kind of the node under evaluation.
    #[must_use]
    pub fn kind(&self) -> M::Kind {
        self.semantics.tree().kind(self.leaf())
    }

    /// The tree under analysis.
    #[must_use]
    pub fn tree(&self) -> &'a M {
        self.semantics.tree()
    }

    /// The compilation's semantic context.
    #[must_use]
    pub fn semantics(&self) -> &'a SemanticContext<M> {
        self.semantics
    }

    /// The compilation's type oracle.
    #[must_use]
    pub fn types(&self) -> &'a dyn TypeOracle<M::Node> {
        self.semantics.types()
    }

    /// Same semantics, anchored at `path`.
    #[must_use]
    pub fn with_path(&self, path: Path<M::Node>) -> Self {
        Self {
            path,
            semantics: self.semantics,
        }
    }

    /// A state one level down, at `child`.
    #[must_use]
    pub fn child_state(&self, child: M::Node) -> Self {
        self.with_path(self.path.child(child))
    }

    /// A state at the parent node, or `None` at the root.
    #[must_use]
    pub fn parent_state(&self) -> Option<Self> {
        self.path.parent().map(|parent| self.with_path(parent.clone()))
    }

    /// The current node narrowed to shape `S`.
    #[must_use]
    pub fn narrow<S: Narrow<M>>(&self) -> Option<&'a S> {
        S::narrow(self.tree(), self.leaf())
    }

    /// The path to the nearest strict ancestor of shape `S`.
    #[must_use]
    pub fn find_path_to_enclosing<S: Narrow<M>>(&self) -> Option<&Path<M::Node>> {
        let tree = self.tree();
        self.path
            .ancestors()
            .find(|ancestor| S::narrow(tree, ancestor.leaf()).is_some())
    }

    /// The nearest strict ancestor of shape `S`, with a state re-anchored there.
    #[must_use]
    pub fn find_enclosing<S: Narrow<M>>(&self) -> Option<(Self, &'a S)> {
        let tree = self.tree();
        self.path.ancestors().find_map(|ancestor| {
            S::narrow(tree, ancestor.leaf()).map(|shape| (self.with_path(ancestor.clone()), shape))
        })
    }
}

impl<M: SyntaxTree> Clone for MatchState<'_, M> {
    fn clone(&self) -> Self {
        self.with_path(self.path.clone())
    }
}

impl<M: SyntaxTree> fmt::Debug for MatchState<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchState")
            .field("path", &self.path)
            .field("compilation", &self.semantics.id())
            .finish()
    }
}
