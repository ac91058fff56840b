//! Declaration matchers: names, annotations, members, modifiers and types.

use crate::{
    ClassDecl, ClassKind, JavaPredicate, JavaTree, Kind, MethodDecl, Modifier, Node, NodeId,
    VariableDecl, Visibility,
};
use arbor::{
    and, from_fn, kind_any_of, kind_is, type_from_name, MatchQuantifier, MatchState, MatcherError,
    MultiMatcher, Predicate, Selected, StringMatchSpec, SyntaxTree,
};
use std::borrow::Cow;

const ANNOTATABLE: [Kind; 3] = [Kind::Class, Kind::Method, Kind::Variable];

// ═══════════════════════════════════════════════════════════════════════════════
// Names
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches methods whose simple name is exactly `name`.
pub fn method_is_named(name: &str) -> Predicate<MethodDecl, JavaTree> {
    let owned = name.to_owned();
    from_fn(
        format!("method_is_named({name})"),
        move |m: &MethodDecl, _: &MatchState<'_, JavaTree>| m.name == owned,
    )
}

/// Matches methods whose simple name starts with `prefix`.
pub fn method_name_starts_with(prefix: &str) -> Predicate<MethodDecl, JavaTree> {
    let owned = prefix.to_owned();
    from_fn(
        format!("method_name_starts_with({prefix})"),
        move |m: &MethodDecl, _: &MatchState<'_, JavaTree>| m.name.starts_with(owned.as_str()),
    )
}

/// Matches methods whose simple name satisfies `spec`.
///
/// # Errors
///
/// Returns the compile error of `spec` (bad regex, pattern too long).
pub fn method_name_matches(
    spec: &StringMatchSpec,
) -> Result<Predicate<MethodDecl, JavaTree>, MatcherError> {
    let matcher = spec.compile()?;
    Ok(from_fn(
        format!("method_name_matches({spec})"),
        move |m: &MethodDecl, _: &MatchState<'_, JavaTree>| matcher.matches(&m.name),
    ))
}

/// Matches class-like declarations whose simple name is exactly `name`.
pub fn class_is_named(name: &str) -> Predicate<ClassDecl, JavaTree> {
    let owned = name.to_owned();
    from_fn(
        format!("class_is_named({name})"),
        move |c: &ClassDecl, _: &MatchState<'_, JavaTree>| c.name == owned,
    )
}

/// Matches interface declarations.
pub fn is_interface() -> Predicate<ClassDecl, JavaTree> {
    from_fn("is_interface", |c: &ClassDecl, _: &MatchState<'_, JavaTree>| {
        c.kind == ClassKind::Interface
    })
}

/// Matches enum declarations.
pub fn is_enum() -> Predicate<ClassDecl, JavaTree> {
    from_fn("is_enum", |c: &ClassDecl, _: &MatchState<'_, JavaTree>| c.kind == ClassKind::Enum)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Signatures
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches methods declaring exactly `arity` parameters.
pub fn method_has_arity(arity: usize) -> Predicate<MethodDecl, JavaTree> {
    from_fn(
        format!("method_has_arity({arity})"),
        move |m: &MethodDecl, _: &MatchState<'_, JavaTree>| m.parameters.len() == arity,
    )
}

/// Matches methods whose modifiers declare `visibility`.
pub fn method_has_visibility(visibility: Visibility) -> Predicate<MethodDecl, JavaTree> {
    from_fn(
        format!("method_has_visibility({visibility:?})"),
        move |m: &MethodDecl, _: &MatchState<'_, JavaTree>| m.modifiers.visibility() == visibility,
    )
}

/// Matches methods whose return type is exactly `name`.
///
/// The return type is the oracle's type of the declaration; false when the
/// declaration is untyped or `name` does not resolve.
pub fn method_returns(name: &str) -> Predicate<MethodDecl, JavaTree> {
    let expected = type_from_name::<JavaTree>(name);
    from_fn(
        format!("method_returns({name})"),
        move |_: &MethodDecl, state: &MatchState<'_, JavaTree>| {
            let types = state.types();
            match (types.type_of(state.leaf()), expected.get(state.semantics())) {
                (Some(actual), Some(expected)) => types.is_same_type(actual, expected),
                _ => false,
            }
        },
    )
}

/// Matches methods named `method` declared directly in the class typed `class`.
pub fn method_with_class_and_name(class: &str, method: &str) -> Predicate<MethodDecl, JavaTree> {
    let (class, method) = (class.to_owned(), method.to_owned());
    from_fn(
        format!("method_with_class_and_name({class}, {method})"),
        move |m: &MethodDecl, state: &MatchState<'_, JavaTree>| {
            let types = state.types();
            m.name == method
                && state
                    .path()
                    .parent()
                    .map(|parent| parent.leaf())
                    .filter(|&owner| state.tree().kind(owner) == Kind::Class)
                    .and_then(|owner| types.type_of(owner))
                    .and_then(|ty| types.type_name(ty))
                    .is_some_and(|owner| owner == class)
        },
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Members
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches classes declaring at least one method that satisfies `p`.
///
/// Each method is evaluated with a state anchored at that method.
pub fn has_method(p: Predicate<MethodDecl, JavaTree>) -> Predicate<ClassDecl, JavaTree> {
    from_fn("has_method", move |class: &ClassDecl, state: &MatchState<'_, JavaTree>| {
        let tree = state.tree();
        class.members.iter().any(|&member| match tree.node(member) {
            Node::Method(method) => p.matches(method, &state.child_state(member)),
            _ => false,
        })
    })
}

fn constructors_of(tree: &JavaTree, node: NodeId) -> Selected<'_, NodeId> {
    match tree.node(node) {
        Node::Class(class) => Cow::Owned(
            class
                .members
                .iter()
                .copied()
                .filter(|&m| matches!(tree.node(m), Node::Method(method) if method.constructor))
                .collect(),
        ),
        _ => Cow::Borrowed(&[]),
    }
}

/// Quantified match over a class's constructors.
pub fn constructor_matcher(
    quantifier: MatchQuantifier,
    p: JavaPredicate,
) -> MultiMatcher<JavaTree> {
    MultiMatcher::new("constructors", quantifier, constructors_of, p)
}

/// Matches classes whose constructors satisfy `p` under `quantifier`.
/// False for non-class nodes.
pub fn constructors(quantifier: MatchQuantifier, p: JavaPredicate) -> JavaPredicate {
    and([kind_is(Kind::Class), constructor_matcher(quantifier, p).into_predicate()])
}

fn parameters_of(tree: &JavaTree, node: NodeId) -> Selected<'_, NodeId> {
    match tree.node(node) {
        Node::Method(method) => Cow::Borrowed(method.parameters()),
        _ => Cow::Borrowed(&[]),
    }
}

/// Quantified match over a method's parameters.
pub fn parameters_matcher(
    quantifier: MatchQuantifier,
    p: JavaPredicate,
) -> MultiMatcher<JavaTree> {
    MultiMatcher::new("parameters", quantifier, parameters_of, p)
}

/// Matches methods whose parameters satisfy `p` under `quantifier`.
/// False for non-method nodes.
pub fn method_has_parameters(quantifier: MatchQuantifier, p: JavaPredicate) -> JavaPredicate {
    and([kind_is(Kind::Method), parameters_matcher(quantifier, p).into_predicate()])
}

// ═══════════════════════════════════════════════════════════════════════════════
// Annotations
// ═══════════════════════════════════════════════════════════════════════════════

fn annotations_of(tree: &JavaTree, node: NodeId) -> Selected<'_, NodeId> {
    Cow::Borrowed(tree.node(node).annotations().unwrap_or(&[]))
}

/// Quantified match over the annotations of a declaration.
///
/// ```ignore
/// let result = annotation_matcher(MatchQuantifier::AtLeastOne, is_type("java.lang.Deprecated"))
///     .multi_match(class, &state);
/// ```
pub fn annotation_matcher(
    quantifier: MatchQuantifier,
    p: JavaPredicate,
) -> MultiMatcher<JavaTree> {
    MultiMatcher::new("annotations", quantifier, annotations_of, p)
}

/// Matches declarations whose annotations satisfy `p` under `quantifier`.
/// False for nodes that cannot carry annotations.
pub fn annotations(quantifier: MatchQuantifier, p: JavaPredicate) -> JavaPredicate {
    and([
        kind_any_of(ANNOTATABLE),
        annotation_matcher(quantifier, p).into_predicate(),
    ])
}

/// Matches annotation nodes whose type is `name` (fully qualified).
///
/// The written name is never consulted: an annotation the type oracle does
/// not type, or a `name` it cannot resolve, does not match.
pub fn is_type(name: &str) -> JavaPredicate {
    let expected = type_from_name::<JavaTree>(name);
    from_fn(
        format!("is_type({name})"),
        move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
            if state.tree().kind(*node) != Kind::Annotation {
                return false;
            }
            let types = state.types();
            match (types.type_of(*node), expected.get(state.semantics())) {
                (Some(actual), Some(expected)) => types.is_same_type(actual, expected),
                _ => false,
            }
        },
    )
}

/// Matches declarations carrying an annotation of type `name`.
pub fn has_annotation(name: &str) -> JavaPredicate {
    annotations(MatchQuantifier::AtLeastOne, is_type(name))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Modifiers and variables
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches declarations carrying `modifier`.
pub fn has_modifier(modifier: Modifier) -> JavaPredicate {
    from_fn(
        format!("has_modifier({modifier:?})"),
        move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
            state
                .tree()
                .node(*node)
                .modifiers()
                .is_some_and(|mods| mods.contains(modifier))
        },
    )
}

/// Matches `static` declarations.
pub fn is_static() -> JavaPredicate {
    has_modifier(Modifier::Static)
}

/// Matches variable declarations that are fields (members of a class).
pub fn is_field() -> Predicate<VariableDecl, JavaTree> {
    from_fn("is_field", |_: &VariableDecl, state: &MatchState<'_, JavaTree>| {
        state
            .path()
            .parent()
            .is_some_and(|parent| state.tree().kind(parent.leaf()) == Kind::Class)
    })
}

/// Matches variables with an initializer satisfying `p`.
pub fn variable_initializer(p: JavaPredicate) -> Predicate<VariableDecl, JavaTree> {
    from_fn(
        "variable_initializer",
        move |variable: &VariableDecl, state: &MatchState<'_, JavaTree>| {
            variable
                .initializer
                .is_some_and(|init| p.matches_at(&state.child_state(init)))
        },
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches nodes whose static type is a subtype of `name`.
///
/// False when the node is untyped or `name` does not resolve.
pub fn is_subtype_of(name: &str) -> JavaPredicate {
    let sup = type_from_name::<JavaTree>(name);
    from_fn(
        format!("is_subtype_of({name})"),
        move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
            let types = state.types();
            match (types.type_of(*node), sup.get(state.semantics())) {
                (Some(actual), Some(sup)) => types.is_subtype(actual, sup),
                _ => false,
            }
        },
    )
}

/// Matches nodes whose static type is exactly `name`.
///
/// False when the node is untyped or `name` does not resolve.
pub fn is_same_type(name: &str) -> JavaPredicate {
    let expected = type_from_name::<JavaTree>(name);
    from_fn(
        format!("is_same_type({name})"),
        move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
            let types = state.types();
            match (types.type_of(*node), expected.get(state.semantics())) {
                (Some(actual), Some(expected)) => types.is_same_type(actual, expected),
                _ => false,
            }
        },
    )
}

const PRIMITIVES: [&str; 8] =
    ["boolean", "byte", "short", "int", "long", "char", "float", "double"];

fn type_name_is<F>(label: &'static str, test: F) -> JavaPredicate
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    from_fn(label, move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
        let types = state.types();
        types
            .type_of(*node)
            .and_then(|ty| types.type_name(ty))
            .is_some_and(&test)
    })
}

/// Matches nodes of a primitive type (`int`, `boolean`, ...). `void` is not primitive.
pub fn is_primitive_type() -> JavaPredicate {
    type_name_is("is_primitive_type", |name| PRIMITIVES.contains(&name))
}

/// Matches nodes typed `void`, such as declarations of methods returning nothing.
pub fn is_void_type() -> JavaPredicate {
    type_name_is("is_void_type", |name| name == "void")
}

/// Matches nodes of an array type.
pub fn is_array_type() -> JavaPredicate {
    type_name_is("is_array_type", |name| name.ends_with("[]"))
}
