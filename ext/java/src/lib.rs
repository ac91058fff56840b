//! arbor-java - Java tree model and Java-specific matchers for arbor
//!
//! Provides [`JavaTree`], an arena-backed Java syntax tree, and the adapters
//! static-analysis checks need on top of the core predicate algebra:
//! declaration names and modifiers, annotations resolved through the type
//! oracle, resolved method calls ([`MethodMatcher`]), call arguments and
//! receivers, literals, operators and the statement structure around a node.
//!
//! # Example
//!
//! ```
//! use arbor::{MatchQuantifier, SemanticContext};
//! use arbor_java::prelude::*;
//! use std::sync::Arc;
//!
//! // @Deprecated class Legacy {}
//! let mut builder = TreeBuilder::new();
//! let deprecated = builder.add(Annotation { name: "Deprecated".into(), arguments: vec![] })?;
//! let class = builder.add(ClassDecl {
//!     name: "Legacy".into(),
//!     annotations: vec![deprecated],
//!     ..ClassDecl::default()
//! })?;
//! let tree = Arc::new(builder.finish()?);
//!
//! let mut types = SimpleTypes::new();
//! types.set_type(deprecated, "java.lang.Deprecated");
//! let semantics = SemanticContext::new(tree, Arc::new(types));
//!
//! let check = annotations(MatchQuantifier::AtLeastOne, is_type("java.lang.Deprecated"));
//! assert!(check.matches_at(&semantics.state_at(class).unwrap()));
//! # Ok::<(), arbor_java::TreeError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Deserialize` for the enums of the tree model
//! - `registry`: [`register`], making every adapter loadable from config
//!   under `arbor.java.v1.*` type URLs
//! - `fixtures`: YAML conformance fixtures (`fixture` module)

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod declarations;
mod expressions;
mod methods;
mod node;
mod statements;
mod tree;
mod types;

#[cfg(test)]
mod testing;

#[cfg(feature = "registry")]
mod config;

#[cfg(feature = "fixtures")]
pub mod fixture;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Tree model
pub use node::{
    Annotation, Assignment, Binary, BinaryOp, Block, ClassDecl, ClassKind, CompilationUnit,
    CompoundAssignment, CompoundOp, ExpressionStatement, Identifier, If, Literal, LiteralValue,
    Loop, LoopKind, MemberSelect, MethodDecl, MethodInvocation, Modifier, Modifiers, NewClass,
    Node, Parenthesized, Return, Synchronized, Throw, VariableDecl, Visibility,
};
pub use tree::{JavaTree, Kind, NodeId, TreeBuilder, TreeError};
pub use types::SimpleTypes;

// Declarations
pub use declarations::{
    annotation_matcher, annotations, class_is_named, constructor_matcher, constructors,
    has_annotation, has_method, has_modifier, is_array_type, is_enum, is_field, is_interface,
    is_primitive_type, is_same_type, is_static, is_subtype_of, is_type, is_void_type,
    method_has_arity, method_has_parameters, method_has_visibility, method_is_named,
    method_name_matches, method_name_starts_with, method_returns, method_with_class_and_name,
    parameters_matcher, variable_initializer,
};

// Method calls
pub use methods::{any_method, constructor, instance_method, static_method, MethodMatcher};

// Expressions
pub use expressions::{
    argument, argument_count, arguments_matcher, binary, boolean_literal, compound_assignment,
    expression_statement, has_arguments, ignore_parens, int_literal, method_invocation,
    non_null_literal, receiver, receiver_of, return_statement, string_literal,
};

// Statements
pub use statements::{
    enclosing_block, enclosing_class, enclosing_method, in_loop, in_synchronized,
    is_last_statement_in_block, next_statement, previous_statement,
};

#[cfg(feature = "registry")]
pub use config::register;

/// A predicate over any node of a [`JavaTree`].
pub type JavaPredicate = arbor::NodePredicate<JavaTree>;

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// Re-exports the core prelude together with the Java tree model and adapters.
pub mod prelude {
    pub use arbor::prelude::*;

    // Tree model
    pub use crate::{
        Annotation, Block, ClassDecl, JavaPredicate, JavaTree, Kind, MethodDecl, MethodInvocation,
        Modifier, NodeId, SimpleTypes, TreeBuilder, VariableDecl,
    };

    // Declarations
    pub use crate::{
        annotations, has_annotation, has_method, is_static, is_subtype_of, is_type,
        method_is_named,
    };

    // Method calls
    pub use crate::{any_method, instance_method, static_method, MethodMatcher};

    // Expressions
    pub use crate::{
        argument, expression_statement, has_arguments, ignore_parens, method_invocation, receiver,
        return_statement,
    };

    // Statements
    pub use crate::{
        enclosing_class, enclosing_method, in_loop, in_synchronized, next_statement,
        previous_statement,
    };
}
