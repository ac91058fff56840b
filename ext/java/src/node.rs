//! Java node shapes
//!
//! [`Node`] is the closed sum of every shape the tree model knows. Each shape
//! is its own struct so predicates can be declared over exactly the shape they
//! inspect and lifted with [`type_gate`](arbor::type_gate).

use crate::{JavaTree, Kind, NodeId};
use arbor::Narrow;

// ═══════════════════════════════════════════════════════════════════════════════
// Modifiers and operators
// ═══════════════════════════════════════════════════════════════════════════════

/// A declaration modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Synchronized,
    Transient,
    Volatile,
    Native,
}

impl Modifier {
    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A set of [`Modifier`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    /// No modifiers.
    #[must_use]
    pub fn none() -> Self {
        Self(0)
    }

    /// This set plus `modifier`.
    #[must_use]
    pub fn with(self, modifier: Modifier) -> Self {
        Self(self.0 | modifier.bit())
    }

    /// Whether `modifier` is present.
    #[must_use]
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }
}

/// Access level implied by a declaration's modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum Visibility {
    Public,
    Protected,
    /// No access modifier.
    Package,
    Private,
}

impl Modifiers {
    /// The access level these modifiers declare.
    #[must_use]
    pub fn visibility(self) -> Visibility {
        if self.contains(Modifier::Public) {
            Visibility::Public
        } else if self.contains(Modifier::Protected) {
            Visibility::Protected
        } else if self.contains(Modifier::Private) {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// What sort of type a class declaration declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// Loop flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum LoopKind {
    While,
    DoWhile,
    For,
    EnhancedFor,
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ConditionalAnd,
    ConditionalOr,
    BitAnd,
    BitOr,
    Xor,
}

/// Compound assignment operator (`+=`, `<<=`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum CompoundOp {
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    RemainderAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
}

/// Value of a literal expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Int(i64),
    Long(i64),
    Bool(bool),
    Char(char),
    Str(String),
    Null,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Shapes
// ═══════════════════════════════════════════════════════════════════════════════

/// `package p; class A {} class B {}`
#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub types: Vec<NodeId>,
}

/// A class, interface, enum or annotation type declaration.
#[derive(Debug, Clone, Default)]
pub struct ClassDecl {
    /// Simple name.
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub annotations: Vec<NodeId>,
    /// Fields, methods, constructors and nested types, in source order.
    pub members: Vec<NodeId>,
}

impl ClassDecl {
    /// Members in source order.
    #[must_use]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }
}

/// A method or constructor declaration.
#[derive(Debug, Clone, Default)]
pub struct MethodDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<NodeId>,
    /// Parameter declarations ([`VariableDecl`]s).
    pub parameters: Vec<NodeId>,
    /// `None` for abstract and native methods.
    pub body: Option<NodeId>,
    pub constructor: bool,
}

impl MethodDecl {
    /// Parameter declarations in order.
    #[must_use]
    pub fn parameters(&self) -> &[NodeId] {
        &self.parameters
    }
}

/// A field, local variable or parameter declaration.
#[derive(Debug, Clone, Default)]
pub struct VariableDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<NodeId>,
    pub initializer: Option<NodeId>,
}

/// `{ s1; s2; }`
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<NodeId>,
}

impl Block {
    /// Statements in order.
    #[must_use]
    pub fn statements(&self) -> &[NodeId] {
        &self.statements
    }
}

/// `expr;`
#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expression: NodeId,
}

/// `return;` or `return expr;`
#[derive(Debug, Clone, Default)]
pub struct Return {
    pub expression: Option<NodeId>,
}

/// `if (c) a else b`
#[derive(Debug, Clone)]
pub struct If {
    pub condition: NodeId,
    pub then_branch: NodeId,
    pub else_branch: Option<NodeId>,
}

/// `while`, `do`, `for` and enhanced `for` loops.
#[derive(Debug, Clone)]
pub struct Loop {
    pub kind: LoopKind,
    /// The loop condition, or the iterated expression of an enhanced `for`.
    pub condition: Option<NodeId>,
    pub body: NodeId,
}

/// `synchronized (lock) { ... }`
#[derive(Debug, Clone)]
pub struct Synchronized {
    pub lock: NodeId,
    pub body: NodeId,
}

/// `throw expr;`
#[derive(Debug, Clone)]
pub struct Throw {
    pub expression: NodeId,
}

/// `select(arguments)`, where `select` is an [`Identifier`] or a [`MemberSelect`].
#[derive(Debug, Clone)]
pub struct MethodInvocation {
    pub select: NodeId,
    pub arguments: Vec<NodeId>,
}

impl MethodInvocation {
    /// Arguments in order.
    #[must_use]
    pub fn arguments(&self) -> &[NodeId] {
        &self.arguments
    }
}

/// `new T(arguments)`
#[derive(Debug, Clone, Default)]
pub struct NewClass {
    pub class_name: String,
    pub arguments: Vec<NodeId>,
}

/// `expression.identifier`
#[derive(Debug, Clone)]
pub struct MemberSelect {
    pub expression: NodeId,
    pub identifier: String,
}

/// A bare name.
#[derive(Debug, Clone, Default)]
pub struct Identifier {
    pub name: String,
}

/// `(expression)`
#[derive(Debug, Clone)]
pub struct Parenthesized {
    pub expression: NodeId,
}

/// `left op right`
#[derive(Debug, Clone)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: NodeId,
    pub right: NodeId,
}

/// `variable op= expression`
#[derive(Debug, Clone)]
pub struct CompoundAssignment {
    pub op: CompoundOp,
    pub variable: NodeId,
    pub expression: NodeId,
}

/// `variable = expression`
#[derive(Debug, Clone)]
pub struct Assignment {
    pub variable: NodeId,
    pub expression: NodeId,
}

/// `@Name(arguments)`; `name` is the type name as written.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<NodeId>,
}

/// A literal expression.
#[derive(Debug, Clone)]
pub struct Literal {
    pub value: LiteralValue,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Node
// ═══════════════════════════════════════════════════════════════════════════════

/// Every node shape of the Java tree model.
#[derive(Debug, Clone)]
pub enum Node {
    CompilationUnit(CompilationUnit),
    Class(ClassDecl),
    Method(MethodDecl),
    Variable(VariableDecl),
    Block(Block),
    ExpressionStatement(ExpressionStatement),
    Return(Return),
    If(If),
    Loop(Loop),
    Synchronized(Synchronized),
    Throw(Throw),
    MethodInvocation(MethodInvocation),
    NewClass(NewClass),
    MemberSelect(MemberSelect),
    Identifier(Identifier),
    Parenthesized(Parenthesized),
    Binary(Binary),
    CompoundAssignment(CompoundAssignment),
    Assignment(Assignment),
    Annotation(Annotation),
    Literal(Literal),
}

impl Node {
    /// The kind tag of this node.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::CompilationUnit(_) => Kind::CompilationUnit,
            Self::Class(_) => Kind::Class,
            Self::Method(_) => Kind::Method,
            Self::Variable(_) => Kind::Variable,
            Self::Block(_) => Kind::Block,
            Self::ExpressionStatement(_) => Kind::ExpressionStatement,
            Self::Return(_) => Kind::Return,
            Self::If(_) => Kind::If,
            Self::Loop(l) => match l.kind {
                LoopKind::While => Kind::WhileLoop,
                LoopKind::DoWhile => Kind::DoWhileLoop,
                LoopKind::For => Kind::ForLoop,
                LoopKind::EnhancedFor => Kind::EnhancedForLoop,
            },
            Self::Synchronized(_) => Kind::Synchronized,
            Self::Throw(_) => Kind::Throw,
            Self::MethodInvocation(_) => Kind::MethodInvocation,
            Self::NewClass(_) => Kind::NewClass,
            Self::MemberSelect(_) => Kind::MemberSelect,
            Self::Identifier(_) => Kind::Identifier,
            Self::Parenthesized(_) => Kind::Parenthesized,
            Self::Binary(_) => Kind::Binary,
            Self::CompoundAssignment(_) => Kind::CompoundAssignment,
            Self::Assignment(_) => Kind::Assignment,
            Self::Annotation(_) => Kind::Annotation,
            Self::Literal(l) => match l.value {
                LiteralValue::Int(_) => Kind::IntLiteral,
                LiteralValue::Long(_) => Kind::LongLiteral,
                LiteralValue::Bool(_) => Kind::BooleanLiteral,
                LiteralValue::Char(_) => Kind::CharLiteral,
                LiteralValue::Str(_) => Kind::StringLiteral,
                LiteralValue::Null => Kind::NullLiteral,
            },
        }
    }

    /// Children in source order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            Self::CompilationUnit(n) => out.extend(&n.types),
            Self::Class(n) => {
                out.extend(&n.annotations);
                out.extend(&n.members);
            }
            Self::Method(n) => {
                out.extend(&n.annotations);
                out.extend(&n.parameters);
                out.extend(n.body);
            }
            Self::Variable(n) => {
                out.extend(&n.annotations);
                out.extend(n.initializer);
            }
            Self::Block(n) => out.extend(&n.statements),
            Self::ExpressionStatement(n) => out.push(n.expression),
            Self::Return(n) => out.extend(n.expression),
            Self::If(n) => {
                out.push(n.condition);
                out.push(n.then_branch);
                out.extend(n.else_branch);
            }
            Self::Loop(n) => {
                // Source order: a do-while body precedes its condition.
                if n.kind == LoopKind::DoWhile {
                    out.push(n.body);
                    out.extend(n.condition);
                } else {
                    out.extend(n.condition);
                    out.push(n.body);
                }
            }
            Self::Synchronized(n) => out.extend([n.lock, n.body]),
            Self::Throw(n) => out.push(n.expression),
            Self::MethodInvocation(n) => {
                out.push(n.select);
                out.extend(&n.arguments);
            }
            Self::NewClass(n) => out.extend(&n.arguments),
            Self::MemberSelect(n) => out.push(n.expression),
            Self::Parenthesized(n) => out.push(n.expression),
            Self::Binary(n) => out.extend([n.left, n.right]),
            Self::CompoundAssignment(n) => out.extend([n.variable, n.expression]),
            Self::Assignment(n) => out.extend([n.variable, n.expression]),
            Self::Annotation(n) => out.extend(&n.arguments),
            Self::Identifier(_) | Self::Literal(_) => {}
        }
        out
    }

    /// Declaration modifiers, for nodes that carry them.
    #[must_use]
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::Class(n) => Some(n.modifiers),
            Self::Method(n) => Some(n.modifiers),
            Self::Variable(n) => Some(n.modifiers),
            _ => None,
        }
    }

    /// Annotations, for nodes that can carry them.
    #[must_use]
    pub fn annotations(&self) -> Option<&[NodeId]> {
        match self {
            Self::Class(n) => Some(&n.annotations),
            Self::Method(n) => Some(&n.annotations),
            Self::Variable(n) => Some(&n.annotations),
            _ => None,
        }
    }
}

macro_rules! shapes {
    ($($shape:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$shape> for Node {
                fn from(shape: $shape) -> Self {
                    Node::$variant(shape)
                }
            }

            impl Narrow<JavaTree> for $shape {
                fn narrow(tree: &JavaTree, node: NodeId) -> Option<&Self> {
                    match tree.node(node) {
                        Node::$variant(shape) => Some(shape),
                        _ => None,
                    }
                }
            }
        )*
    };
}

shapes! {
    CompilationUnit => CompilationUnit,
    ClassDecl => Class,
    MethodDecl => Method,
    VariableDecl => Variable,
    Block => Block,
    ExpressionStatement => ExpressionStatement,
    Return => Return,
    If => If,
    Loop => Loop,
    Synchronized => Synchronized,
    Throw => Throw,
    MethodInvocation => MethodInvocation,
    NewClass => NewClass,
    MemberSelect => MemberSelect,
    Identifier => Identifier,
    Parenthesized => Parenthesized,
    Binary => Binary,
    CompoundAssignment => CompoundAssignment,
    Assignment => Assignment,
    Annotation => Annotation,
    Literal => Literal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_set_operations() {
        let mods: Modifiers = [Modifier::Public, Modifier::Static].into_iter().collect();
        assert!(mods.contains(Modifier::Static));
        assert!(!mods.contains(Modifier::Final));
        assert!(mods.with(Modifier::Final).contains(Modifier::Final));
        assert_eq!(Modifiers::none(), Modifiers::default());
    }

    #[test]
    fn visibility_defaults_to_package() {
        assert_eq!(Modifiers::none().visibility(), Visibility::Package);
        let private: Modifiers = [Modifier::Static, Modifier::Private].into_iter().collect();
        assert_eq!(private.visibility(), Visibility::Private);
        assert_eq!(Modifiers::none().with(Modifier::Public).visibility(), Visibility::Public);
    }

    #[test]
    fn literal_kinds_follow_value() {
        let lit = |value| Node::Literal(Literal { value });
        assert_eq!(lit(LiteralValue::Int(1)).kind(), Kind::IntLiteral);
        assert_eq!(lit(LiteralValue::Str("a".into())).kind(), Kind::StringLiteral);
        assert_eq!(lit(LiteralValue::Null).kind(), Kind::NullLiteral);
    }

    #[test]
    fn do_while_body_precedes_condition() {
        let node = Node::Loop(Loop {
            kind: LoopKind::DoWhile,
            condition: Some(NodeId::from_index(3)),
            body: NodeId::from_index(2),
        });
        assert_eq!(node.children(), vec![NodeId::from_index(2), NodeId::from_index(3)]);
        assert_eq!(node.kind(), Kind::DoWhileLoop);
    }

    #[test]
    fn method_children_in_source_order() {
        let node = Node::Method(MethodDecl {
            name: "run".into(),
            annotations: vec![NodeId::from_index(0)],
            parameters: vec![NodeId::from_index(1)],
            body: Some(NodeId::from_index(2)),
            ..MethodDecl::default()
        });
        let ids: Vec<usize> = node.children().iter().map(|id| id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(node.annotations().map(<[NodeId]>::len), Some(1));
    }
}
