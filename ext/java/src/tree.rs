//! `JavaTree` - an arena-backed, immutable Java syntax tree
//!
//! Trees are assembled bottom-up with a [`TreeBuilder`]: children are added
//! before the node that owns them, and the last node added becomes the root.
//! The builder enforces the tree shape (every referenced node exists, every
//! node but the root has exactly one parent) so the engine can rely on it.

use crate::Node;
use arbor::SyntaxTree;
use std::fmt;

/// Handle to one node of a [`JavaTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the arena, in insertion order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind tags of the Java tree model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum Kind {
    CompilationUnit,
    Class,
    Method,
    Variable,
    Block,
    ExpressionStatement,
    Return,
    If,
    WhileLoop,
    DoWhileLoop,
    ForLoop,
    EnhancedForLoop,
    Synchronized,
    Throw,
    MethodInvocation,
    NewClass,
    MemberSelect,
    Identifier,
    Parenthesized,
    Binary,
    CompoundAssignment,
    Assignment,
    Annotation,
    IntLiteral,
    LongLiteral,
    BooleanLiteral,
    CharLiteral,
    StringLiteral,
    NullLiteral,
}

impl Kind {
    /// Loop statements.
    pub const LOOPS: [Kind; 4] = [
        Kind::WhileLoop,
        Kind::DoWhileLoop,
        Kind::ForLoop,
        Kind::EnhancedForLoop,
    ];
}

/// Errors from tree construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A node referenced a child that was never added.
    #[error("node references {child:?}, which has not been added")]
    UnknownNode {
        /// The missing child.
        child: NodeId,
    },

    /// A node was referenced as a child twice.
    #[error("{child:?} already has a parent; trees cannot share children")]
    SharedChild {
        /// The child referenced twice.
        child: NodeId,
    },

    /// `finish` was called before any node was added.
    #[error("tree has no root: no nodes were added")]
    MissingRoot,

    /// A node other than the root was never attached to a parent.
    #[error("{node:?} has no parent and is not the root")]
    Detached {
        /// The unreachable node.
        node: NodeId,
    },

    /// The arena is full.
    #[error("tree exceeds {max} nodes")]
    TooManyNodes {
        /// Maximum node count.
        max: usize,
    },

    /// A fixture label does not name any node.
    #[error("no node is labelled \"{label}\"")]
    UnknownLabel {
        /// The label that was looked up.
        label: String,
    },

    /// Two fixture nodes share a label.
    #[error("label \"{label}\" is used more than once")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    children: Vec<NodeId>,
}

/// An immutable Java syntax tree.
#[derive(Debug, Clone)]
pub struct JavaTree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl JavaTree {
    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// If `id` belongs to a different tree and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.slots[id.index()].node
    }

    /// The node behind `id`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).map(|slot| &slot.node)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: a built tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every node id, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.slots.len()).map(NodeId::from_index)
    }

    /// Ids of every node of `kind`, in insertion order.
    pub fn ids_of_kind(&self, kind: Kind) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(move |&id| self.node(id).kind() == kind)
    }
}

impl SyntaxTree for JavaTree {
    type Node = NodeId;
    type Kind = Kind;

    fn root(&self) -> NodeId {
        self.root
    }

    fn kind(&self, node: NodeId) -> Kind {
        self.node(node).kind()
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.slots[node.index()].children
    }
}

/// Bottom-up builder for a [`JavaTree`].
///
/// ```
/// use arbor_java::{Block, Identifier, ExpressionStatement, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// let x = builder.add(Identifier { name: "x".into() })?;
/// let stmt = builder.add(ExpressionStatement { expression: x })?;
/// builder.add(Block { statements: vec![stmt] })?;
/// let tree = builder.finish()?;
/// assert_eq!(tree.len(), 3);
/// # Ok::<(), arbor_java::TreeError>(())
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    slots: Vec<Slot>,
    has_parent: Vec<bool>,
}

impl TreeBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node whose children have already been added.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownNode`] if a child was never added
    /// - [`TreeError::SharedChild`] if a child already has a parent
    /// - [`TreeError::TooManyNodes`] if the arena is full
    pub fn add(&mut self, node: impl Into<Node>) -> Result<NodeId, TreeError> {
        let node = node.into();
        let index = self.slots.len();
        if index >= u32::MAX as usize {
            return Err(TreeError::TooManyNodes {
                max: u32::MAX as usize,
            });
        }

        let children = node.children();
        for (i, &child) in children.iter().enumerate() {
            match self.has_parent.get(child.index()) {
                None => return Err(TreeError::UnknownNode { child }),
                Some(true) => return Err(TreeError::SharedChild { child }),
                Some(false) if children[..i].contains(&child) => {
                    return Err(TreeError::SharedChild { child })
                }
                Some(false) => {}
            }
        }
        for &child in &children {
            self.has_parent[child.index()] = true;
        }

        self.slots.push(Slot { node, children });
        self.has_parent.push(false);
        Ok(NodeId::from_index(index))
    }

    /// Freeze the tree; the last node added is the root.
    ///
    /// # Errors
    ///
    /// - [`TreeError::MissingRoot`] if no node was added
    /// - [`TreeError::Detached`] for the first node that is neither the root
    ///   nor anyone's child
    pub fn finish(self) -> Result<JavaTree, TreeError> {
        let root = self
            .slots
            .len()
            .checked_sub(1)
            .map(NodeId::from_index)
            .ok_or(TreeError::MissingRoot)?;
        if let Some(index) = self.has_parent[..root.index()].iter().position(|&p| !p) {
            return Err(TreeError::Detached {
                node: NodeId::from_index(index),
            });
        }
        tracing::debug!(nodes = self.slots.len(), ?root, "built java tree");
        Ok(JavaTree {
            slots: self.slots,
            root,
        })
    }
}
