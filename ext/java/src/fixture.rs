//! Conformance fixture runner
//!
//! A fixture is a small Java tree written as nested YAML, a predicate config,
//! and the expected answer at labelled nodes:
//!
//! ```yaml
//! name: next statement
//! description: the statement after s2 is s3
//! tree:
//!   kind: block
//!   statements:
//!     - { kind: return, label: s1 }
//!     - { kind: return, label: s2 }
//! predicate:
//!   type: matcher
//!   type_url: arbor.java.v1.NextStatement
//!   config: { predicate: { type: always } }
//! cases:
//!   - { at: s1, expect: true }
//!   - { at: s2, expect: false }
//! ```
//!
//! Fixtures that set `expect_error` instead check that the predicate fails to
//! load with a message containing that text.

use crate::{
    Annotation, Assignment, Binary, BinaryOp, Block, ClassDecl, ClassKind, CompilationUnit,
    CompoundAssignment, CompoundOp, ExpressionStatement, Identifier, If, JavaTree, Literal,
    LiteralValue, Loop, LoopKind, MemberSelect, MethodDecl, MethodInvocation, Modifier, NewClass,
    Node, NodeId, Parenthesized, Return, SimpleTypes, Synchronized, Throw, TreeBuilder, TreeError,
    VariableDecl,
};
use arbor::{MatcherError, MethodKind, PredicateConfig, Registry, SemanticContext};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Errors from loading or running a fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The YAML is malformed or does not match the fixture schema.
    #[error("invalid fixture YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The tree could not be built, or a case names an unknown label.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The predicate failed to load.
    #[error("predicate failed to load: {0}")]
    Load(#[from] MatcherError),

    /// `expect_error` was set but the predicate loaded.
    #[error("expected a load error containing \"{expected}\", but the predicate loaded")]
    UnexpectedSuccess {
        /// The expected message fragment.
        expected: String,
    },

    /// The predicate failed to load with a different message.
    #[error("expected a load error containing \"{expected}\", got \"{actual}\"")]
    WrongError {
        /// The expected message fragment.
        expected: String,
        /// The actual error message.
        actual: String,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Schema
// ═══════════════════════════════════════════════════════════════════════════════

/// A complete test fixture.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tree: NodeSpec,
    /// Type declarations beyond the ones implied by node `type` tags.
    #[serde(default)]
    pub types: Vec<TypeSpec>,
    pub predicate: PredicateConfig,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub expect_error: Option<String>,
}

/// A declared type and its direct supertypes.
#[derive(Debug, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

/// The method a call site resolves to.
#[derive(Debug, Deserialize)]
pub struct MethodSpec {
    /// Fully-qualified declaring class.
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub kind: MethodKind,
    /// Fully-qualified erased parameter types.
    #[serde(default)]
    pub parameters: Vec<String>,
}

/// Expected outcome at one labelled node.
#[derive(Debug, Deserialize)]
pub struct Case {
    pub at: String,
    pub expect: bool,
}

/// One node of a fixture tree, children inline.
#[derive(Debug, Deserialize)]
pub struct NodeSpec {
    /// Name cases refer to this node by.
    #[serde(default)]
    pub label: Option<String>,
    /// Fully-qualified static type of the node.
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Resolved method, for calls and `new` expressions.
    #[serde(default)]
    pub method: Option<MethodSpec>,
    #[serde(flatten)]
    pub shape: ShapeSpec,
}

type Child = Box<NodeSpec>;

/// Shape of a fixture node; mirrors [`Node`].
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    CompilationUnit {
        #[serde(default)]
        package: Option<String>,
        #[serde(default)]
        types: Vec<NodeSpec>,
    },
    Class {
        name: String,
        #[serde(default)]
        class_kind: ClassKind,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        annotations: Vec<NodeSpec>,
        #[serde(default)]
        members: Vec<NodeSpec>,
    },
    Method {
        name: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        annotations: Vec<NodeSpec>,
        #[serde(default)]
        parameters: Vec<NodeSpec>,
        #[serde(default)]
        body: Option<Child>,
        #[serde(default)]
        constructor: bool,
    },
    Variable {
        name: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        annotations: Vec<NodeSpec>,
        #[serde(default)]
        initializer: Option<Child>,
    },
    Block {
        #[serde(default)]
        statements: Vec<NodeSpec>,
    },
    ExpressionStatement {
        expression: Child,
    },
    Return {
        #[serde(default)]
        expression: Option<Child>,
    },
    If {
        condition: Child,
        then_branch: Child,
        #[serde(default)]
        else_branch: Option<Child>,
    },
    Loop {
        loop_kind: LoopKind,
        #[serde(default)]
        condition: Option<Child>,
        body: Child,
    },
    Synchronized {
        lock: Child,
        body: Child,
    },
    Throw {
        expression: Child,
    },
    MethodInvocation {
        select: Child,
        #[serde(default)]
        arguments: Vec<NodeSpec>,
    },
    NewClass {
        class_name: String,
        #[serde(default)]
        arguments: Vec<NodeSpec>,
    },
    MemberSelect {
        expression: Child,
        identifier: String,
    },
    Identifier {
        name: String,
    },
    Parenthesized {
        expression: Child,
    },
    Binary {
        op: BinaryOp,
        left: Child,
        right: Child,
    },
    CompoundAssignment {
        op: CompoundOp,
        variable: Child,
        expression: Child,
    },
    Assignment {
        variable: Child,
        expression: Child,
    },
    Annotation {
        name: String,
        #[serde(default)]
        arguments: Vec<NodeSpec>,
    },
    IntLiteral {
        value: i64,
    },
    LongLiteral {
        value: i64,
    },
    BooleanLiteral {
        value: bool,
    },
    CharLiteral {
        value: char,
    },
    StringLiteral {
        value: String,
    },
    NullLiteral,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Building
// ═══════════════════════════════════════════════════════════════════════════════

/// A fixture tree ready for evaluation.
#[derive(Debug)]
pub struct BuiltTree {
    pub semantics: SemanticContext<JavaTree>,
    pub labels: HashMap<String, NodeId>,
}

impl BuiltTree {
    /// The node labelled `label`.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownLabel`] if no node carries `label`.
    pub fn node(&self, label: &str) -> Result<NodeId, TreeError> {
        self.labels.get(label).copied().ok_or_else(|| TreeError::UnknownLabel {
            label: label.to_owned(),
        })
    }
}

struct Assembler {
    builder: TreeBuilder,
    types: SimpleTypes,
    labels: HashMap<String, NodeId>,
}

impl Assembler {
    fn many(&mut self, specs: &[NodeSpec]) -> Result<Vec<NodeId>, TreeError> {
        specs.iter().map(|spec| self.add(spec)).collect()
    }

    fn opt(&mut self, spec: Option<&NodeSpec>) -> Result<Option<NodeId>, TreeError> {
        spec.map(|spec| self.add(spec)).transpose()
    }

    // Children first: the builder only accepts nodes whose children exist.
    fn add(&mut self, spec: &NodeSpec) -> Result<NodeId, TreeError> {
        let node: Node = match &spec.shape {
            ShapeSpec::CompilationUnit { package, types } => CompilationUnit {
                package: package.clone(),
                types: self.many(types)?,
            }
            .into(),
            ShapeSpec::Class {
                name,
                class_kind,
                modifiers,
                annotations,
                members,
            } => ClassDecl {
                name: name.clone(),
                kind: *class_kind,
                modifiers: modifiers.iter().copied().collect(),
                annotations: self.many(annotations)?,
                members: self.many(members)?,
            }
            .into(),
            ShapeSpec::Method {
                name,
                modifiers,
                annotations,
                parameters,
                body,
                constructor,
            } => MethodDecl {
                name: name.clone(),
                modifiers: modifiers.iter().copied().collect(),
                annotations: self.many(annotations)?,
                parameters: self.many(parameters)?,
                body: self.opt(body.as_deref())?,
                constructor: *constructor,
            }
            .into(),
            ShapeSpec::Variable {
                name,
                modifiers,
                annotations,
                initializer,
            } => VariableDecl {
                name: name.clone(),
                modifiers: modifiers.iter().copied().collect(),
                annotations: self.many(annotations)?,
                initializer: self.opt(initializer.as_deref())?,
            }
            .into(),
            ShapeSpec::Block { statements } => Block {
                statements: self.many(statements)?,
            }
            .into(),
            ShapeSpec::ExpressionStatement { expression } => ExpressionStatement {
                expression: self.add(expression)?,
            }
            .into(),
            ShapeSpec::Return { expression } => Return {
                expression: self.opt(expression.as_deref())?,
            }
            .into(),
            ShapeSpec::If {
                condition,
                then_branch,
                else_branch,
            } => If {
                condition: self.add(condition)?,
                then_branch: self.add(then_branch)?,
                else_branch: self.opt(else_branch.as_deref())?,
            }
            .into(),
            ShapeSpec::Loop {
                loop_kind,
                condition,
                body,
            } => Loop {
                kind: *loop_kind,
                condition: self.opt(condition.as_deref())?,
                body: self.add(body)?,
            }
            .into(),
            ShapeSpec::Synchronized { lock, body } => Synchronized {
                lock: self.add(lock)?,
                body: self.add(body)?,
            }
            .into(),
            ShapeSpec::Throw { expression } => Throw {
                expression: self.add(expression)?,
            }
            .into(),
            ShapeSpec::MethodInvocation { select, arguments } => MethodInvocation {
                select: self.add(select)?,
                arguments: self.many(arguments)?,
            }
            .into(),
            ShapeSpec::NewClass { class_name, arguments } => NewClass {
                class_name: class_name.clone(),
                arguments: self.many(arguments)?,
            }
            .into(),
            ShapeSpec::MemberSelect { expression, identifier } => MemberSelect {
                expression: self.add(expression)?,
                identifier: identifier.clone(),
            }
            .into(),
            ShapeSpec::Identifier { name } => Identifier { name: name.clone() }.into(),
            ShapeSpec::Parenthesized { expression } => Parenthesized {
                expression: self.add(expression)?,
            }
            .into(),
            ShapeSpec::Binary { op, left, right } => Binary {
                op: *op,
                left: self.add(left)?,
                right: self.add(right)?,
            }
            .into(),
            ShapeSpec::CompoundAssignment {
                op,
                variable,
                expression,
            } => CompoundAssignment {
                op: *op,
                variable: self.add(variable)?,
                expression: self.add(expression)?,
            }
            .into(),
            ShapeSpec::Assignment { variable, expression } => Assignment {
                variable: self.add(variable)?,
                expression: self.add(expression)?,
            }
            .into(),
            ShapeSpec::Annotation { name, arguments } => Annotation {
                name: name.clone(),
                arguments: self.many(arguments)?,
            }
            .into(),
            ShapeSpec::IntLiteral { value } => literal(LiteralValue::Int(*value)),
            ShapeSpec::LongLiteral { value } => literal(LiteralValue::Long(*value)),
            ShapeSpec::BooleanLiteral { value } => literal(LiteralValue::Bool(*value)),
            ShapeSpec::CharLiteral { value } => literal(LiteralValue::Char(*value)),
            ShapeSpec::StringLiteral { value } => literal(LiteralValue::Str(value.clone())),
            ShapeSpec::NullLiteral => literal(LiteralValue::Null),
        };

        let id = self.builder.add(node)?;
        if let Some(ty) = &spec.type_name {
            self.types.set_type(id, ty);
        }
        if let Some(method) = &spec.method {
            let parameters: Vec<&str> = method.parameters.iter().map(String::as_str).collect();
            let MethodSpec { owner, name, kind, .. } = method;
            self.types.set_method(id, owner, name, *kind, &parameters);
        }
        if let Some(label) = &spec.label {
            if self.labels.insert(label.clone(), id).is_some() {
                return Err(TreeError::DuplicateLabel { label: label.clone() });
            }
        }
        Ok(id)
    }
}

fn literal(value: LiteralValue) -> Node {
    Literal { value }.into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case.
#[derive(Debug)]
pub struct CaseResult {
    pub at: String,
    pub passed: bool,
    pub expected: bool,
    pub actual: bool,
}

impl Fixture {
    /// Parse a fixture from YAML.
    ///
    /// # Errors
    ///
    /// [`FixtureError::Yaml`] on malformed input.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    ///
    /// # Errors
    ///
    /// [`FixtureError::Yaml`] on the first malformed document.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, FixtureError> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Build the fixture's tree and type table.
    ///
    /// # Errors
    ///
    /// Any [`TreeError`] from assembly, including [`TreeError::DuplicateLabel`].
    pub fn build_tree(&self) -> Result<BuiltTree, TreeError> {
        let mut assembler = Assembler {
            builder: TreeBuilder::new(),
            types: SimpleTypes::new(),
            labels: HashMap::new(),
        };
        for ty in &self.types {
            let supertypes: Vec<&str> = ty.supertypes.iter().map(String::as_str).collect();
            assembler.types.declare_subtype(&ty.name, &supertypes);
        }
        assembler.add(&self.tree)?;

        let Assembler { builder, types, labels } = assembler;
        let tree = builder.finish()?;
        Ok(BuiltTree {
            semantics: SemanticContext::new(Arc::new(tree), Arc::new(types)),
            labels,
        })
    }

    /// Run all test cases and return results.
    ///
    /// With `expect_error` set the predicate must fail to load and no cases
    /// are run.
    ///
    /// # Errors
    ///
    /// Any failure to build the tree, load the predicate, or find a case label,
    /// and the mismatch errors for `expect_error`.
    pub fn run(&self, registry: &Registry<JavaTree>) -> Result<Vec<CaseResult>, FixtureError> {
        let loaded = registry.load_predicate(self.predicate.clone());
        let predicate = match (&self.expect_error, loaded) {
            (None, loaded) => loaded?,
            (Some(expected), Ok(_)) => {
                return Err(FixtureError::UnexpectedSuccess {
                    expected: expected.clone(),
                })
            }
            (Some(expected), Err(err)) => {
                let actual = err.to_string();
                if actual.contains(expected.as_str()) {
                    return Ok(Vec::new());
                }
                return Err(FixtureError::WrongError {
                    expected: expected.clone(),
                    actual,
                });
            }
        };

        let built = self.build_tree()?;
        self.cases
            .iter()
            .map(|case| {
                let node = built.node(&case.at)?;
                let state = built
                    .semantics
                    .state_at(node)
                    .ok_or_else(|| TreeError::UnknownLabel { label: case.at.clone() })?;
                let actual = predicate.matches_at(&state);
                tracing::trace!(fixture = %self.name, at = %case.at, actual, "ran fixture case");
                Ok(CaseResult {
                    at: case.at.clone(),
                    passed: actual == case.expect,
                    expected: case.expect,
                    actual,
                })
            })
            .collect()
    }

    /// Run all test cases and panic on first failure.
    ///
    /// # Panics
    ///
    /// If the fixture fails to run or any case disagrees with its expectation.
    pub fn run_and_assert(&self, registry: &Registry<JavaTree>) {
        let results = self
            .run(registry)
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to run: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.at, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor::{RegistryBuilder, SyntaxTree};

    const NEXT: &str = r"
name: next statement
tree:
  kind: block
  label: body
  statements:
    - { kind: return, label: s1 }
    - kind: expression_statement
      label: s2
      expression: { kind: identifier, name: x, type: java.lang.String }
predicate:
  type: matcher
  type_url: arbor.java.v1.NextStatement
  config:
    predicate: { type: always }
cases:
  - { at: s1, expect: true }
  - { at: s2, expect: false }
";

    fn registry() -> Registry<JavaTree> {
        crate::register(RegistryBuilder::new()).build()
    }

    #[test]
    fn parses_and_builds_nested_tree() {
        let fixture = Fixture::from_yaml(NEXT).unwrap();
        let built = fixture.build_tree().unwrap();
        let tree = built.semantics.tree();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root(), built.node("body").unwrap());
        assert_eq!(tree.children(built.node("body").unwrap()).len(), 2);
    }

    #[test]
    fn runs_cases() {
        let fixture = Fixture::from_yaml(NEXT).unwrap();
        let results = fixture.run(&registry()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
    }

    #[test]
    fn unknown_case_label() {
        let yaml = NEXT.replace("at: s2", "at: s9");
        let err = Fixture::from_yaml(&yaml).unwrap().run(&registry()).unwrap_err();
        assert!(matches!(err, FixtureError::Tree(TreeError::UnknownLabel { .. })));
    }

    #[test]
    fn duplicate_label() {
        let yaml = NEXT.replace("label: s2", "label: s1");
        let err = Fixture::from_yaml(&yaml).unwrap().build_tree().unwrap_err();
        assert_eq!(err, TreeError::DuplicateLabel { label: "s1".into() });
    }

    #[test]
    fn expected_load_error() {
        let yaml = r"
name: unknown url
tree: { kind: null_literal }
predicate: { type: matcher, type_url: arbor.java.v1.Missing }
expect_error: unknown predicate type URL
";
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert!(fixture.run(&registry()).unwrap().is_empty());

        let wrong = yaml.replace("unknown predicate type URL", "depth");
        let err = Fixture::from_yaml(&wrong).unwrap().run(&registry()).unwrap_err();
        assert!(matches!(err, FixtureError::WrongError { .. }));
    }

    #[test]
    fn multi_document() {
        let both = format!("{NEXT}\n---\n{NEXT}");
        assert_eq!(Fixture::from_yaml_multi(&both).unwrap().len(), 2);
    }
}
