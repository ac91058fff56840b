//! `SyntaxTree` - the seam to the host's tree model
//!
//! The engine never owns or builds trees. A host tree model implements
//! [`SyntaxTree`] (kind discrimination + ordered children) and one [`Narrow`]
//! impl per kind-specific node shape. Everything else in this crate is generic
//! over those two traits.

use std::fmt::Debug;
use std::hash::Hash;

/// An immutable, strongly-discriminated syntax tree.
///
/// # Thread Safety
///
/// Trees are shared across threads behind an `Arc` by
/// [`SemanticContext`](crate::SemanticContext), so implementations must be
/// `Send + Sync`. A tree must not change once it has been handed to the engine.
///
/// # Example
///
/// ```ignore
/// impl SyntaxTree for JavaTree {
///     type Node = NodeId;
///     type Kind = Kind;
///
///     fn root(&self) -> NodeId { self.root }
///     fn kind(&self, node: NodeId) -> Kind { self.node(node).kind() }
///     fn children(&self, node: NodeId) -> &[NodeId] { &self.slot(node).children }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `SyntaxTree`",
    note = "implement `root`, `kind` and `children` for your tree model"
)]
pub trait SyntaxTree: Send + Sync + 'static {
    /// Cheap handle identifying one node of this tree.
    type Node: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Closed tag set discriminating node kinds.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The root node (usually the compilation unit).
    fn root(&self) -> Self::Node;

    /// The kind tag of `node`.
    fn kind(&self, node: Self::Node) -> Self::Kind;

    /// The ordered children of `node`.
    fn children(&self, node: Self::Node) -> &[Self::Node];
}

/// A kind-specific node shape that can be recovered from a general node.
///
/// `narrow` returns `None` when `node` is not of this shape. This is what
/// [`type_gate`](crate::type_gate) uses to lift a predicate declared over a
/// narrow shape to the general node type.
///
/// Implement it by pattern matching over the tree model's closed node enum:
///
/// ```ignore
/// impl Narrow<JavaTree> for ClassDecl {
///     fn narrow(tree: &JavaTree, node: NodeId) -> Option<&Self> {
///         match tree.node(node) {
///             Node::Class(class) => Some(class),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Narrow<M: SyntaxTree>: 'static {
    /// Recover the shape of `node`, or `None` on a kind mismatch.
    fn narrow(tree: &M, node: M::Node) -> Option<&Self>;
}

/// Short, human-readable name of a shape type, used in predicate labels.
pub(crate) fn shape_name<S: ?Sized>() -> &'static str {
    let full = std::any::type_name::<S>();
    full.rsplit("::").next().unwrap_or(full)
}
