//! `Path` - the current node plus its ancestor chain, innermost first
//!
//! Paths are persistent linked lists: [`child`](Path::child) and
//! [`parent`](Path::parent) never mutate, they share the tail with the
//! path they were derived from.

use crate::SyntaxTree;
use std::fmt;
use std::sync::Arc;

struct Segment<N> {
    leaf: N,
    parent: Option<Path<N>>,
    depth: usize,
}

/// An immutable, innermost-first sequence of nodes from a leaf to the root.
///
/// # INV: head is the node under evaluation
///
/// [`leaf()`](Self::leaf) is always the node currently being evaluated.
/// Deriving a child or parent path produces a new value; the original is
/// untouched and remains valid.
///
/// # Example
///
/// ```
/// use arbor::Path;
///
/// let root = Path::root(0_u32);
/// let method = root.child(1);
/// let stmt = method.child(2);
///
/// assert_eq!(stmt.leaf(), 2);
/// assert_eq!(stmt.depth(), 2);
/// assert_eq!(stmt.nodes().collect::<Vec<_>>(), vec![2, 1, 0]);
/// assert_eq!(method.leaf(), 1); // unchanged by deriving `stmt`
/// ```
pub struct Path<N> {
    inner: Arc<Segment<N>>,
}

impl<N: Copy + Eq> Path<N> {
    /// A single-element path anchored at the tree root.
    #[must_use]
    pub fn root(node: N) -> Self {
        Self {
            inner: Arc::new(Segment {
                leaf: node,
                parent: None,
                depth: 0,
            }),
        }
    }

    /// A new path one level deeper, with `node` as its leaf.
    #[must_use]
    pub fn child(&self, node: N) -> Self {
        Self {
            inner: Arc::new(Segment {
                leaf: node,
                parent: Some(self.clone()),
                depth: self.inner.depth + 1,
            }),
        }
    }

    /// The node currently being evaluated.
    #[must_use]
    pub fn leaf(&self) -> N {
        self.inner.leaf
    }

    /// The path to the parent node, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<&Path<N>> {
        self.inner.parent.as_ref()
    }

    /// Number of ancestors (0 for the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    /// Returns `true` if this path has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    /// This path followed by each ancestor path, innermost first.
    pub fn iter(&self) -> impl Iterator<Item = &Path<N>> {
        std::iter::successors(Some(self), |p| p.parent())
    }

    /// Strict ancestor paths (excluding this one), innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Path<N>> {
        std::iter::successors(self.parent(), |p| p.parent())
    }

    /// The nodes of this path, innermost first.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.iter().map(Path::leaf)
    }

    /// Find the path from the root of `tree` down to `target`.
    ///
    /// Performs a pre-order search, so this is O(tree size); drivers that walk
    /// the tree should extend paths with [`child`](Self::child) instead.
    pub fn locate<M>(tree: &M, target: N) -> Option<Self>
    where
        M: SyntaxTree<Node = N>,
    {
        let mut stack = vec![Self::root(tree.root())];
        while let Some(path) = stack.pop() {
            let node = path.leaf();
            if node == target {
                return Some(path);
            }
            for &child in tree.children(node).iter().rev() {
                stack.push(path.child(child));
            }
        }
        None
    }
}

impl<N> Clone for Path<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N: Copy + Eq> PartialEq for Path<N> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.depth() == other.depth() && self.nodes().eq(other.nodes()))
    }
}

impl<N: Copy + Eq> Eq for Path<N> {}

impl<N: Copy + Eq + fmt::Debug> fmt::Debug for Path<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes()).finish()
    }
}
