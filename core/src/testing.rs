//! Minimal tree model for unit tests.
//!
//! ```text
//! unit
//! ├── method foo
//! │   └── block
//! │       ├── stmt s1 ── call bar(x, y)
//! │       ├── stmt s2
//! │       └── stmt s3
//! └── method baz
//!     └── block (empty)
//! ```

use crate::{Narrow, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TestKind {
    Unit,
    Method,
    Block,
    Stmt,
    Call,
    Ident,
}

#[derive(Debug)]
pub(crate) struct Method {
    pub name: &'static str,
}

#[derive(Debug)]
pub(crate) struct Block {
    pub statements: Vec<u32>,
}

impl Block {
    pub fn statements(&self) -> &[u32] {
        &self.statements
    }
}

#[derive(Debug)]
pub(crate) struct Call {
    pub name: &'static str,
}

#[derive(Debug)]
pub(crate) struct Ident {
    pub name: &'static str,
}

#[derive(Debug)]
pub(crate) enum Shape {
    Unit,
    Method(Method),
    Block(Block),
    Stmt(&'static str),
    Call(Call),
    Ident(Ident),
}

#[derive(Debug)]
struct Slot {
    shape: Shape,
    children: Vec<u32>,
}

#[derive(Debug, Default)]
pub(crate) struct TestTree {
    slots: Vec<Slot>,
    root: u32,
}

impl TestTree {
    /// Append a node whose children were already added; returns its id.
    pub fn add(&mut self, shape: Shape, children: &[u32]) -> u32 {
        let id = u32::try_from(self.slots.len()).unwrap();
        self.slots.push(Slot {
            shape,
            children: children.to_vec(),
        });
        self.root = id;
        id
    }

    pub fn shape(&self, node: u32) -> &Shape {
        &self.slots[node as usize].shape
    }

    /// Label of a named node, for assertions.
    pub fn name(&self, node: u32) -> &'static str {
        match self.shape(node) {
            Shape::Unit => "unit",
            Shape::Block(_) => "block",
            Shape::Method(m) => m.name,
            Shape::Stmt(s) => s,
            Shape::Call(c) => c.name,
            Shape::Ident(i) => i.name,
        }
    }
}

impl SyntaxTree for TestTree {
    type Node = u32;
    type Kind = TestKind;

    fn root(&self) -> u32 {
        self.root
    }

    fn kind(&self, node: u32) -> TestKind {
        match self.shape(node) {
            Shape::Unit => TestKind::Unit,
            Shape::Method(_) => TestKind::Method,
            Shape::Block(_) => TestKind::Block,
            Shape::Stmt(_) => TestKind::Stmt,
            Shape::Call(_) => TestKind::Call,
            Shape::Ident(_) => TestKind::Ident,
        }
    }

    fn children(&self, node: u32) -> &[u32] {
        &self.slots[node as usize].children
    }
}

impl Narrow<TestTree> for Method {
    fn narrow(tree: &TestTree, node: u32) -> Option<&Self> {
        match tree.shape(node) {
            Shape::Method(m) => Some(m),
            _ => None,
        }
    }
}

impl Narrow<TestTree> for Block {
    fn narrow(tree: &TestTree, node: u32) -> Option<&Self> {
        match tree.shape(node) {
            Shape::Block(b) => Some(b),
            _ => None,
        }
    }
}

impl Narrow<TestTree> for Call {
    fn narrow(tree: &TestTree, node: u32) -> Option<&Self> {
        match tree.shape(node) {
            Shape::Call(c) => Some(c),
            _ => None,
        }
    }
}

impl Narrow<TestTree> for Ident {
    fn narrow(tree: &TestTree, node: u32) -> Option<&Self> {
        match tree.shape(node) {
            Shape::Ident(i) => Some(i),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Ids {
    pub unit: u32,
    pub foo: u32,
    pub body: u32,
    pub s1: u32,
    pub call: u32,
    pub arg_x: u32,
    pub arg_y: u32,
    pub s2: u32,
    pub s3: u32,
    pub baz: u32,
    pub empty_body: u32,
}

pub(crate) fn sample_tree() -> (TestTree, Ids) {
    let mut t = TestTree::default();

    let arg_x = t.add(Shape::Ident(Ident { name: "x" }), &[]);
    let arg_y = t.add(Shape::Ident(Ident { name: "y" }), &[]);
    let call = t.add(Shape::Call(Call { name: "bar" }), &[arg_x, arg_y]);
    let s1 = t.add(Shape::Stmt("s1"), &[call]);
    let s2 = t.add(Shape::Stmt("s2"), &[]);
    let s3 = t.add(Shape::Stmt("s3"), &[]);
    let body = t.add(
        Shape::Block(Block {
            statements: vec![s1, s2, s3],
        }),
        &[s1, s2, s3],
    );
    let foo = t.add(Shape::Method(Method { name: "foo" }), &[body]);
    let empty_body = t.add(Shape::Block(Block { statements: vec![] }), &[]);
    let baz = t.add(Shape::Method(Method { name: "baz" }), &[empty_body]);
    let unit = t.add(Shape::Unit, &[foo, baz]);

    let ids = Ids {
        unit,
        foo,
        body,
        s1,
        call,
        arg_x,
        arg_y,
        s2,
        s3,
        baz,
        empty_body,
    };
    (t, ids)
}

/// A semantic context over [`sample_tree`] with no type information.
pub(crate) fn sample_context() -> (crate::SemanticContext<TestTree>, Ids) {
    let (tree, ids) = sample_tree();
    (crate::SemanticContext::untyped(std::sync::Arc::new(tree)), ids)
}
