//! Shared sample program for unit tests.
//!
//! ```java
//! package com.example;
//!
//! @Foo @Deprecated @Bar
//! class Sample {
//!     int count = 0;
//!     Sample() {}
//!     void run(String name) {
//!         log(x, y);          // s1, static com.example.Logger.log(List, String)
//!         count += 1;         // s2
//!         return (true);      // s3
//!     }
//!     static synchronized void other() {
//!         while (flag) { this.list.add("a"); }   // list: ArrayList
//!         synchronized (lock) { x = null; }
//!     }
//! }
//! ```

use crate::*;
use arbor::{MethodKind, SemanticContext};
use std::sync::Arc;

pub(crate) struct Ids {
    pub unit: NodeId,
    pub class: NodeId,
    pub ann_foo: NodeId,
    pub ann_deprecated: NodeId,
    pub ann_bar: NodeId,
    pub field: NodeId,
    pub field_init: NodeId,
    pub ctor: NodeId,
    pub run: NodeId,
    pub param: NodeId,
    pub body: NodeId,
    pub s1: NodeId,
    pub call: NodeId,
    pub arg_x: NodeId,
    pub arg_y: NodeId,
    pub s2: NodeId,
    pub compound: NodeId,
    pub s3: NodeId,
    pub paren: NodeId,
    pub bool_lit: NodeId,
    pub other: NodeId,
    pub sync_method_body: NodeId,
    pub while_loop: NodeId,
    pub loop_call: NodeId,
    pub this_list: NodeId,
    pub arg_a: NodeId,
    pub synced_stmt: NodeId,
    pub null_lit: NodeId,
}

pub(crate) struct Sample {
    pub semantics: SemanticContext<JavaTree>,
    pub ids: Ids,
}

fn ident(b: &mut TreeBuilder, name: &str) -> NodeId {
    b.add(Identifier { name: name.into() }).unwrap()
}

fn lit(b: &mut TreeBuilder, value: LiteralValue) -> NodeId {
    b.add(Literal { value }).unwrap()
}

fn annotation(b: &mut TreeBuilder, name: &str) -> NodeId {
    b.add(Annotation {
        name: name.into(),
        arguments: vec![],
    })
    .unwrap()
}

pub(crate) fn sample() -> Sample {
    let mut b = TreeBuilder::new();
    let mut types = SimpleTypes::new();
    types.declare_subtype("java.util.ArrayList", &["java.util.List"]);

    let ann_foo = annotation(&mut b, "Foo");
    let ann_deprecated = annotation(&mut b, "Deprecated");
    let ann_bar = annotation(&mut b, "Bar");
    types.set_type(ann_foo, "com.example.Foo");
    types.set_type(ann_deprecated, "java.lang.Deprecated");
    types.set_type(ann_bar, "com.example.Bar");

    // int count = 0;
    let field_init = lit(&mut b, LiteralValue::Int(0));
    let field = b
        .add(VariableDecl {
            name: "count".into(),
            initializer: Some(field_init),
            ..VariableDecl::default()
        })
        .unwrap();
    types.set_type(field, "int");

    // Sample() {}
    let ctor_body = b.add(Block::default()).unwrap();
    let ctor = b
        .add(MethodDecl {
            name: "<init>".into(),
            body: Some(ctor_body),
            constructor: true,
            ..MethodDecl::default()
        })
        .unwrap();

    // void run(String name) { ... }
    let param = b
        .add(VariableDecl {
            name: "name".into(),
            ..VariableDecl::default()
        })
        .unwrap();
    types.set_type(param, "java.lang.String");

    let log = ident(&mut b, "log");
    let arg_x = ident(&mut b, "x");
    let arg_y = ident(&mut b, "y");
    types.set_type(arg_x, "java.util.ArrayList");
    types.set_type(arg_y, "java.lang.String");
    let call = b
        .add(MethodInvocation {
            select: log,
            arguments: vec![arg_x, arg_y],
        })
        .unwrap();
    let list_and_string = ["java.util.List", "java.lang.String"];
    types.set_method(call, "com.example.Logger", "log", MethodKind::Static, &list_and_string);
    let s1 = b.add(ExpressionStatement { expression: call }).unwrap();

    let count = ident(&mut b, "count");
    let one = lit(&mut b, LiteralValue::Int(1));
    let compound = b
        .add(CompoundAssignment {
            op: CompoundOp::PlusAssign,
            variable: count,
            expression: one,
        })
        .unwrap();
    let s2 = b.add(ExpressionStatement { expression: compound }).unwrap();

    let bool_lit = lit(&mut b, LiteralValue::Bool(true));
    let paren = b.add(Parenthesized { expression: bool_lit }).unwrap();
    let s3 = b.add(Return { expression: Some(paren) }).unwrap();

    let body = b
        .add(Block {
            statements: vec![s1, s2, s3],
        })
        .unwrap();
    let run = b
        .add(MethodDecl {
            name: "run".into(),
            parameters: vec![param],
            body: Some(body),
            ..MethodDecl::default()
        })
        .unwrap();
    types.set_type(run, "void");

    // static synchronized void other() { ... }
    let flag = ident(&mut b, "flag");
    let this = ident(&mut b, "this");
    let this_list = b
        .add(MemberSelect {
            expression: this,
            identifier: "list".into(),
        })
        .unwrap();
    types.set_type(this_list, "java.util.ArrayList");
    let add = b
        .add(MemberSelect {
            expression: this_list,
            identifier: "add".into(),
        })
        .unwrap();
    let arg_a = lit(&mut b, LiteralValue::Str("a".into()));
    let loop_call = b
        .add(MethodInvocation {
            select: add,
            arguments: vec![arg_a],
        })
        .unwrap();
    let object = ["java.lang.Object"];
    types.set_method(loop_call, "java.util.ArrayList", "add", MethodKind::Instance, &object);
    let loop_stmt = b.add(ExpressionStatement { expression: loop_call }).unwrap();
    let loop_body = b
        .add(Block {
            statements: vec![loop_stmt],
        })
        .unwrap();
    let while_loop = b
        .add(Loop {
            kind: LoopKind::While,
            condition: Some(flag),
            body: loop_body,
        })
        .unwrap();

    let lock = ident(&mut b, "lock");
    let x = ident(&mut b, "x");
    let null_lit = lit(&mut b, LiteralValue::Null);
    let assignment = b
        .add(Assignment {
            variable: x,
            expression: null_lit,
        })
        .unwrap();
    let synced_stmt = b.add(ExpressionStatement { expression: assignment }).unwrap();
    let sync_body = b
        .add(Block {
            statements: vec![synced_stmt],
        })
        .unwrap();
    let sync = b.add(Synchronized { lock, body: sync_body }).unwrap();

    let sync_method_body = b
        .add(Block {
            statements: vec![while_loop, sync],
        })
        .unwrap();
    let other = b
        .add(MethodDecl {
            name: "other".into(),
            modifiers: [Modifier::Static, Modifier::Synchronized].into_iter().collect(),
            body: Some(sync_method_body),
            ..MethodDecl::default()
        })
        .unwrap();
    types.set_type(other, "void");

    let class = b
        .add(ClassDecl {
            name: "Sample".into(),
            annotations: vec![ann_foo, ann_deprecated, ann_bar],
            members: vec![field, ctor, run, other],
            ..ClassDecl::default()
        })
        .unwrap();
    types.set_type(class, "com.example.Sample");
    let unit = b
        .add(CompilationUnit {
            package: Some("com.example".into()),
            types: vec![class],
        })
        .unwrap();

    let tree = b.finish().unwrap();
    Sample {
        semantics: SemanticContext::new(Arc::new(tree), Arc::new(types)),
        ids: Ids {
            unit,
            class,
            ann_foo,
            ann_deprecated,
            ann_bar,
            field,
            field_init,
            ctor,
            run,
            param,
            body,
            s1,
            call,
            arg_x,
            arg_y,
            s2,
            compound,
            s3,
            paren,
            bool_lit,
            other,
            sync_method_body,
            while_loop,
            loop_call,
            this_list,
            arg_a,
            synced_stmt,
            null_lit,
        },
    }
}
