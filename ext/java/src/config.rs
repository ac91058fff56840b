//! Registry bindings for the Java adapters.
//!
//! [`register`] adds every adapter under an `arbor.java.v1.*` type URL on top
//! of the core registrations, so whole checks can be written in JSON or YAML:
//!
//! ```yaml
//! type: matcher
//! type_url: arbor.java.v1.HasArguments
//! config:
//!   quantifier: ALL
//!   predicate:
//!     type: matcher
//!     type_url: arbor.java.v1.EnclosingMethod
//!     config:
//!       predicate:
//!         type: matcher
//!         type_url: arbor.java.v1.MethodIsNamed
//!         config: { name: foo }
//! ```
//!
//! Adapters declared over a narrow shape (methods, classes, blocks) take a
//! node predicate in config and see it evaluated at that declaration.

use crate::{BinaryOp, CompoundOp, JavaPredicate, JavaTree, Modifier, Visibility};
use arbor::{
    register_core_predicates, type_gate, ChildrenConfig, IntoPredicate, MatchState, MatcherError,
    Narrow, NestedConfig, Predicate, PredicateConfig, PredicateLoader, RegistryBuilder,
    StringMatchSpec, UnitConfig,
};
use serde::Deserialize;

/// Register the core adapters plus every Java adapter.
///
/// | Type URL | Adapter | Config |
/// |----------|---------|--------|
/// | `arbor.java.v1.MethodIsNamed` | [`method_is_named`](crate::method_is_named) | `{ name }` |
/// | `arbor.java.v1.MethodNameStartsWith` | [`method_name_starts_with`](crate::method_name_starts_with) | `{ prefix }` |
/// | `arbor.java.v1.MethodNameMatches` | [`method_name_matches`](crate::method_name_matches) | `{ pattern }` |
/// | `arbor.java.v1.ClassIsNamed` | [`class_is_named`](crate::class_is_named) | `{ name }` |
/// | `arbor.java.v1.IsInterface` / `IsEnum` | shape checks | none |
/// | `arbor.java.v1.HasMethod` | [`has_method`](crate::has_method) | [`NestedConfig`] |
/// | `arbor.java.v1.Annotations` | [`annotations`](crate::annotations) | [`ChildrenConfig`] |
/// | `arbor.java.v1.Constructors` | [`constructors`](crate::constructors) | [`ChildrenConfig`] |
/// | `arbor.java.v1.MethodHasParameters` | [`method_has_parameters`](crate::method_has_parameters) | [`ChildrenConfig`] |
/// | `arbor.java.v1.HasArguments` | [`has_arguments`](crate::has_arguments) | [`ChildrenConfig`] |
/// | `arbor.java.v1.IsType` / `HasAnnotation` / `IsSubtypeOf` / `IsSameType` | type checks | `{ name }` |
/// | `arbor.java.v1.HasModifier` | [`has_modifier`](crate::has_modifier) | `{ modifier }` |
/// | `arbor.java.v1.IsStatic` / `IsField` | modifier and placement checks | none |
/// | `arbor.java.v1.MethodHasArity` | [`method_has_arity`](crate::method_has_arity) | `{ count }` |
/// | `arbor.java.v1.MethodHasVisibility` | [`method_has_visibility`](crate::method_has_visibility) | `{ visibility }` |
/// | `arbor.java.v1.MethodReturns` | [`method_returns`](crate::method_returns) | `{ name }` |
/// | `arbor.java.v1.MethodWithClassAndName` | [`method_with_class_and_name`](crate::method_with_class_and_name) | `{ class, method }` |
/// | `arbor.java.v1.IsPrimitiveType` / `IsVoidType` / `IsArrayType` | type family checks | none |
/// | `arbor.java.v1.MethodMatcher` | [`MethodMatcher`](crate::MethodMatcher) | `{ kind, on_class, on_descendant_of, named, name_matching, parameters }` |
/// | `arbor.java.v1.VariableInitializer` | [`variable_initializer`](crate::variable_initializer) | [`NestedConfig`] |
/// | `arbor.java.v1.EnclosingClass` / `EnclosingMethod` / `EnclosingBlock` | enclosing declarations | [`NestedConfig`] |
/// | `arbor.java.v1.NextStatement` / `PreviousStatement` | statement neighbours | [`NestedConfig`] |
/// | `arbor.java.v1.IsLastStatementInBlock` / `InLoop` / `InSynchronized` | control flow | none |
/// | `arbor.java.v1.Argument` | [`argument`](crate::argument) | `{ index, predicate }` |
/// | `arbor.java.v1.ArgumentCount` | [`argument_count`](crate::argument_count) | `{ count }` |
/// | `arbor.java.v1.Receiver` / `MethodInvocation` | call parts | [`NestedConfig`] |
/// | `arbor.java.v1.IntLiteral` / `BooleanLiteral` / `StringLiteral` | literal values | `{ value }` |
/// | `arbor.java.v1.NonNullLiteral` | [`non_null_literal`](crate::non_null_literal) | none |
/// | `arbor.java.v1.IgnoreParens` | [`ignore_parens`](crate::ignore_parens) | [`NestedConfig`] |
/// | `arbor.java.v1.Binary` | [`binary`](crate::binary) | `{ op, left, right }` |
/// | `arbor.java.v1.CompoundAssignment` | [`compound_assignment`](crate::compound_assignment) | `{ ops, variable, expression }` |
/// | `arbor.java.v1.ExpressionStatement` / `ReturnStatement` | statement contents | [`NestedConfig`] |
#[must_use]
pub fn register(builder: RegistryBuilder<JavaTree>) -> RegistryBuilder<JavaTree> {
    register_core_predicates(builder)
        // Declarations
        .predicate::<MethodIsNamed>("arbor.java.v1.MethodIsNamed")
        .predicate::<MethodNameStartsWith>("arbor.java.v1.MethodNameStartsWith")
        .predicate::<MethodNameMatches>("arbor.java.v1.MethodNameMatches")
        .predicate::<ClassIsNamed>("arbor.java.v1.ClassIsNamed")
        .predicate::<IsInterface>("arbor.java.v1.IsInterface")
        .predicate::<IsEnum>("arbor.java.v1.IsEnum")
        .predicate::<HasMethod>("arbor.java.v1.HasMethod")
        .predicate::<Annotations>("arbor.java.v1.Annotations")
        .predicate::<Constructors>("arbor.java.v1.Constructors")
        .predicate::<MethodHasParameters>("arbor.java.v1.MethodHasParameters")
        .predicate::<IsType>("arbor.java.v1.IsType")
        .predicate::<HasAnnotation>("arbor.java.v1.HasAnnotation")
        .predicate::<IsSubtypeOf>("arbor.java.v1.IsSubtypeOf")
        .predicate::<IsSameType>("arbor.java.v1.IsSameType")
        .predicate::<HasModifier>("arbor.java.v1.HasModifier")
        .predicate::<IsStatic>("arbor.java.v1.IsStatic")
        .predicate::<IsField>("arbor.java.v1.IsField")
        .predicate::<VariableInitializer>("arbor.java.v1.VariableInitializer")
        .predicate::<MethodHasArity>("arbor.java.v1.MethodHasArity")
        .predicate::<MethodHasVisibility>("arbor.java.v1.MethodHasVisibility")
        .predicate::<MethodReturns>("arbor.java.v1.MethodReturns")
        .predicate::<MethodWithClassAndName>("arbor.java.v1.MethodWithClassAndName")
        .predicate::<IsPrimitiveType>("arbor.java.v1.IsPrimitiveType")
        .predicate::<IsVoidType>("arbor.java.v1.IsVoidType")
        .predicate::<IsArrayType>("arbor.java.v1.IsArrayType")
        // Method calls
        .predicate::<MethodMatcherFactory>("arbor.java.v1.MethodMatcher")
        // Statements
        .predicate::<EnclosingClass>("arbor.java.v1.EnclosingClass")
        .predicate::<EnclosingMethod>("arbor.java.v1.EnclosingMethod")
        .predicate::<EnclosingBlock>("arbor.java.v1.EnclosingBlock")
        .predicate::<NextStatement>("arbor.java.v1.NextStatement")
        .predicate::<PreviousStatement>("arbor.java.v1.PreviousStatement")
        .predicate::<IsLastStatementInBlock>("arbor.java.v1.IsLastStatementInBlock")
        .predicate::<InLoop>("arbor.java.v1.InLoop")
        .predicate::<InSynchronized>("arbor.java.v1.InSynchronized")
        // Expressions
        .predicate::<HasArguments>("arbor.java.v1.HasArguments")
        .predicate::<Argument>("arbor.java.v1.Argument")
        .predicate::<ArgumentCount>("arbor.java.v1.ArgumentCount")
        .predicate::<Receiver>("arbor.java.v1.Receiver")
        .predicate::<MethodInvocation>("arbor.java.v1.MethodInvocation")
        .predicate::<IntLiteral>("arbor.java.v1.IntLiteral")
        .predicate::<BooleanLiteral>("arbor.java.v1.BooleanLiteral")
        .predicate::<StringLiteral>("arbor.java.v1.StringLiteral")
        .predicate::<NonNullLiteral>("arbor.java.v1.NonNullLiteral")
        .predicate::<IgnoreParens>("arbor.java.v1.IgnoreParens")
        .predicate::<Binary>("arbor.java.v1.Binary")
        .predicate::<CompoundAssignment>("arbor.java.v1.CompoundAssignment")
        .predicate::<ExpressionStatement>("arbor.java.v1.ExpressionStatement")
        .predicate::<ReturnStatement>("arbor.java.v1.ReturnStatement")
}

/// Node predicate evaluated at a declaration of shape `S`.
fn lift<S: Narrow<JavaTree>>(p: JavaPredicate) -> Predicate<S, JavaTree> {
    arbor::from_fn("lift", move |_: &S, state: &MatchState<'_, JavaTree>| p.matches_at(state))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config payloads
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NameConfig {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PrefixConfig {
    prefix: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternConfig {
    pattern: StringMatchSpec,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModifierConfig {
    modifier: Modifier,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ValueConfig<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CountConfig {
    count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VisibilityConfig {
    visibility: Visibility,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassAndNameConfig {
    class: String,
    method: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CallKind {
    #[default]
    Any,
    Instance,
    Static,
    Constructor,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MethodMatcherConfig {
    #[serde(default)]
    kind: CallKind,
    #[serde(default)]
    on_class: Vec<String>,
    #[serde(default)]
    on_descendant_of: Vec<String>,
    #[serde(default)]
    named: Vec<String>,
    #[serde(default)]
    name_matching: Option<StringMatchSpec>,
    /// Absent means any parameter list; `[]` means none.
    #[serde(default)]
    parameters: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArgumentConfig {
    index: usize,
    predicate: PredicateConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BinaryConfig {
    op: BinaryOp,
    left: PredicateConfig,
    right: PredicateConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompoundAssignmentConfig {
    ops: Vec<CompoundOp>,
    variable: PredicateConfig,
    expression: PredicateConfig,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Factories
// ═══════════════════════════════════════════════════════════════════════════════

type Loaded = Result<JavaPredicate, MatcherError>;

/// Factory registered under `arbor.java.v1.<$ty>`.
///
/// `$body` receives the deserialized config and the loader.
macro_rules! factory {
    ($ty:ident, $config:ty, |$cfg:ident, $loader:ident| $body:expr) => {
        struct $ty;

        impl IntoPredicate<JavaTree> for $ty {
            type Config = $config;

            #[allow(unused_variables)]
            fn from_config($cfg: $config, $loader: &PredicateLoader<'_, JavaTree>) -> Loaded {
                $body
            }
        }
    };
}

// Declarations
factory!(MethodIsNamed, NameConfig, |c, l| Ok(type_gate(crate::method_is_named(&c.name))));
factory!(MethodNameStartsWith, PrefixConfig, |c, l| Ok(type_gate(
    crate::method_name_starts_with(&c.prefix)
)));
factory!(MethodNameMatches, PatternConfig, |c, l| Ok(type_gate(
    crate::method_name_matches(&c.pattern)?
)));
factory!(ClassIsNamed, NameConfig, |c, l| Ok(type_gate(crate::class_is_named(&c.name))));
factory!(IsInterface, UnitConfig, |c, l| Ok(type_gate(crate::is_interface())));
factory!(IsEnum, UnitConfig, |c, l| Ok(type_gate(crate::is_enum())));
factory!(HasMethod, NestedConfig, |c, l| Ok(type_gate(crate::has_method(lift(
    l.load(c.predicate)?
)))));
factory!(Annotations, ChildrenConfig, |c, l| Ok(crate::annotations(
    c.quantifier,
    l.load(c.predicate)?
)));
factory!(Constructors, ChildrenConfig, |c, l| Ok(crate::constructors(
    c.quantifier,
    l.load(c.predicate)?
)));
factory!(MethodHasParameters, ChildrenConfig, |c, l| Ok(crate::method_has_parameters(
    c.quantifier,
    l.load(c.predicate)?
)));
factory!(IsType, NameConfig, |c, l| Ok(crate::is_type(&c.name)));
factory!(HasAnnotation, NameConfig, |c, l| Ok(crate::has_annotation(&c.name)));
factory!(IsSubtypeOf, NameConfig, |c, l| Ok(crate::is_subtype_of(&c.name)));
factory!(IsSameType, NameConfig, |c, l| Ok(crate::is_same_type(&c.name)));
factory!(HasModifier, ModifierConfig, |c, l| Ok(crate::has_modifier(c.modifier)));
factory!(IsStatic, UnitConfig, |c, l| Ok(crate::is_static()));
factory!(IsField, UnitConfig, |c, l| Ok(type_gate(crate::is_field())));
factory!(VariableInitializer, NestedConfig, |c, l| Ok(type_gate(
    crate::variable_initializer(l.load(c.predicate)?)
)));

factory!(MethodHasArity, CountConfig, |c, l| Ok(type_gate(crate::method_has_arity(c.count))));
factory!(MethodHasVisibility, VisibilityConfig, |c, l| Ok(type_gate(
    crate::method_has_visibility(c.visibility)
)));
factory!(MethodReturns, NameConfig, |c, l| Ok(type_gate(crate::method_returns(&c.name))));
factory!(MethodWithClassAndName, ClassAndNameConfig, |c, l| Ok(type_gate(
    crate::method_with_class_and_name(&c.class, &c.method)
)));
factory!(IsPrimitiveType, UnitConfig, |c, l| Ok(crate::is_primitive_type()));
factory!(IsVoidType, UnitConfig, |c, l| Ok(crate::is_void_type()));
factory!(IsArrayType, UnitConfig, |c, l| Ok(crate::is_array_type()));

// Method calls
factory!(MethodMatcherFactory, MethodMatcherConfig, |c, l| method_matcher(c));

fn method_matcher(c: MethodMatcherConfig) -> Loaded {
    if let Some(name) = c.named.iter().find(|n| n.contains(['(', ')'])) {
        return Err(MatcherError::InvalidConfig {
            reason: format!("method name ({name}) cannot contain parentheses"),
        });
    }
    let mut m = match c.kind {
        CallKind::Any => crate::any_method(),
        CallKind::Instance => crate::instance_method(),
        CallKind::Static => crate::static_method(),
        CallKind::Constructor => crate::constructor(),
    };
    if !c.on_class.is_empty() {
        m = m.on_class_any(&c.on_class);
    }
    if !c.on_descendant_of.is_empty() {
        m = m.on_descendant_of_any(&c.on_descendant_of);
    }
    if !c.named.is_empty() {
        m = m.named_any_of(&c.named);
    }
    if let Some(spec) = c.name_matching {
        m = m.with_name_matching(spec.compile()?);
    }
    if let Some(parameters) = c.parameters {
        m = m.with_parameters(&parameters);
    }
    Ok(m.into_predicate())
}

// Statements
factory!(EnclosingClass, NestedConfig, |c, l| Ok(crate::enclosing_class(lift(
    l.load(c.predicate)?
))));
factory!(EnclosingMethod, NestedConfig, |c, l| Ok(crate::enclosing_method(lift(
    l.load(c.predicate)?
))));
factory!(EnclosingBlock, NestedConfig, |c, l| Ok(crate::enclosing_block(lift(
    l.load(c.predicate)?
))));
factory!(NextStatement, NestedConfig, |c, l| Ok(crate::next_statement(l.load(c.predicate)?)));
factory!(PreviousStatement, NestedConfig, |c, l| Ok(crate::previous_statement(
    l.load(c.predicate)?
)));
factory!(IsLastStatementInBlock, UnitConfig, |c, l| Ok(crate::is_last_statement_in_block()));
factory!(InLoop, UnitConfig, |c, l| Ok(crate::in_loop()));
factory!(InSynchronized, UnitConfig, |c, l| Ok(crate::in_synchronized()));

// Expressions
factory!(HasArguments, ChildrenConfig, |c, l| Ok(crate::has_arguments(
    c.quantifier,
    l.load(c.predicate)?
)));
factory!(Argument, ArgumentConfig, |c, l| Ok(type_gate(crate::argument(
    c.index,
    l.load(c.predicate)?
))));
factory!(ArgumentCount, CountConfig, |c, l| Ok(type_gate(crate::argument_count(c.count))));
factory!(Receiver, NestedConfig, |c, l| Ok(crate::receiver(l.load(c.predicate)?)));
factory!(MethodInvocation, NestedConfig, |c, l| Ok(crate::method_invocation(
    l.load(c.predicate)?
)));
factory!(IntLiteral, ValueConfig<i64>, |c, l| Ok(crate::int_literal(c.value)));
factory!(BooleanLiteral, ValueConfig<bool>, |c, l| Ok(crate::boolean_literal(c.value)));
factory!(StringLiteral, ValueConfig<String>, |c, l| Ok(crate::string_literal(&c.value)));
factory!(NonNullLiteral, UnitConfig, |c, l| Ok(crate::non_null_literal()));
factory!(IgnoreParens, NestedConfig, |c, l| Ok(crate::ignore_parens(l.load(c.predicate)?)));
factory!(Binary, BinaryConfig, |c, l| Ok(crate::binary(
    c.op,
    l.load(c.left)?,
    l.load(c.right)?
)));
factory!(CompoundAssignment, CompoundAssignmentConfig, |c, l| Ok(
    crate::compound_assignment(c.ops, l.load(c.variable)?, l.load(c.expression)?)
));
factory!(ExpressionStatement, NestedConfig, |c, l| Ok(crate::expression_statement(
    l.load(c.predicate)?
)));
factory!(ReturnStatement, NestedConfig, |c, l| Ok(crate::return_statement(
    l.load(c.predicate)?
)));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample, Sample};
    use crate::NodeId;
    use arbor::Registry;

    fn registry() -> Registry<JavaTree> {
        register(RegistryBuilder::new()).build()
    }

    fn load(registry: &Registry<JavaTree>, json: serde_json::Value) -> Loaded {
        let config: PredicateConfig = serde_json::from_value(json).expect("valid config shape");
        registry.load_predicate(config)
    }

    fn at(sample: &Sample, node: NodeId) -> MatchState<'_, JavaTree> {
        sample.semantics.state_at(node).expect("node is reachable")
    }

    #[test]
    fn every_adapter_is_registered() {
        let registry = registry();
        let urls = registry.type_urls();
        assert!(urls.contains(&"arbor.core.v1.Contains"));
        assert!(urls.contains(&"arbor.java.v1.HasArguments"));
        assert!(urls.contains(&"arbor.java.v1.InSynchronized"));
        assert!(urls.contains(&"arbor.java.v1.MethodMatcher"));
        assert_eq!(urls.iter().filter(|u| u.starts_with("arbor.java.v1.")).count(), 48);
    }

    #[test]
    fn nested_declaration_predicates_see_the_declaration() {
        let registry = registry();
        let sample = sample();
        let p = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.HasArguments",
                "config": {
                    "quantifier": "ALL",
                    "predicate": {
                        "type": "matcher",
                        "type_url": "arbor.java.v1.EnclosingMethod",
                        "config": { "predicate": {
                            "type": "matcher",
                            "type_url": "arbor.java.v1.MethodIsNamed",
                            "config": { "name": "run" }
                        }}
                    }
                }
            }),
        )
        .unwrap();
        assert!(p.matches_at(&at(&sample, sample.ids.call)));
        assert!(!p.matches_at(&at(&sample, sample.ids.loop_call)));
    }

    #[test]
    fn operator_configs() {
        let registry = registry();
        let sample = sample();
        let p = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.CompoundAssignment",
                "config": {
                    "ops": ["plus_assign", "minus_assign"],
                    "variable": { "type": "always" },
                    "expression": {
                        "type": "matcher",
                        "type_url": "arbor.java.v1.IntLiteral",
                        "config": { "value": 1 }
                    }
                }
            }),
        )
        .unwrap();
        assert!(p.matches_at(&at(&sample, sample.ids.compound)));
    }

    #[test]
    fn modifiers_and_patterns() {
        let registry = registry();
        let sample = sample();
        let synchronized = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.HasModifier",
                "config": { "modifier": "synchronized" }
            }),
        )
        .unwrap();
        assert!(synchronized.matches_at(&at(&sample, sample.ids.other)));

        let pattern = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.MethodNameMatches",
                "config": { "pattern": { "Prefix": "ot" } }
            }),
        )
        .unwrap();
        assert!(pattern.matches_at(&at(&sample, sample.ids.other)));
        assert!(!pattern.matches_at(&at(&sample, sample.ids.run)));
    }

    #[test]
    fn bad_payloads_are_config_errors() {
        let registry = registry();
        let missing = load(
            &registry,
            serde_json::json!({ "type": "matcher", "type_url": "arbor.java.v1.MethodIsNamed" }),
        );
        assert!(matches!(missing, Err(MatcherError::InvalidConfig { .. })));

        let unknown_field = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.IsType",
                "config": { "name": "A", "extra": true }
            }),
        );
        assert!(matches!(unknown_field, Err(MatcherError::InvalidConfig { .. })));

        let bad_regex = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.MethodNameMatches",
                "config": { "pattern": { "Regex": "(" } }
            }),
        );
        assert!(matches!(bad_regex, Err(MatcherError::InvalidPattern { .. })));
    }

    #[test]
    fn method_matcher_config() {
        let registry = registry();
        let sample = sample();
        let list_add = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.MethodMatcher",
                "config": {
                    "kind": "instance",
                    "on_descendant_of": ["java.util.List"],
                    "named": ["add"]
                }
            }),
        )
        .unwrap();
        assert!(list_add.matches_at(&at(&sample, sample.ids.loop_call)));
        assert!(!list_add.matches_at(&at(&sample, sample.ids.call)));

        let logger = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.MethodMatcher",
                "config": {
                    "kind": "static",
                    "on_class": ["com.example.Logger"],
                    "parameters": ["java.util.List", "java.lang.String"]
                }
            }),
        )
        .unwrap();
        assert!(logger.matches_at(&at(&sample, sample.ids.call)));

        let no_parameters = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.MethodMatcher",
                "config": { "parameters": [] }
            }),
        )
        .unwrap();
        assert!(!no_parameters.matches_at(&at(&sample, sample.ids.call)));
    }

    #[test]
    fn method_matcher_rejects_bad_names() {
        let registry = registry();
        let parens = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.MethodMatcher",
                "config": { "named": ["add()"] }
            }),
        );
        assert!(matches!(parens, Err(MatcherError::InvalidConfig { .. })));

        let kind = load(
            &registry,
            serde_json::json!({
                "type": "matcher",
                "type_url": "arbor.java.v1.MethodMatcher",
                "config": { "kind": "lambda" }
            }),
        );
        assert!(matches!(kind, Err(MatcherError::InvalidConfig { .. })));
    }

    #[test]
    fn declaration_signature_configs() {
        let registry = registry();
        let sample = sample();
        let unary_void = load(
            &registry,
            serde_json::json!({
                "type": "and",
                "predicates": [
                    {
                        "type": "matcher",
                        "type_url": "arbor.java.v1.MethodHasArity",
                        "config": { "count": 1 }
                    },
                    {
                        "type": "matcher",
                        "type_url": "arbor.java.v1.MethodReturns",
                        "config": { "name": "void" }
                    },
                    {
                        "type": "matcher",
                        "type_url": "arbor.java.v1.MethodHasVisibility",
                        "config": { "visibility": "package" }
                    }
                ]
            }),
        )
        .unwrap();
        assert!(unary_void.matches_at(&at(&sample, sample.ids.run)));
        assert!(!unary_void.matches_at(&at(&sample, sample.ids.other)));

        let void = load(
            &registry,
            serde_json::json!({ "type": "matcher", "type_url": "arbor.java.v1.IsVoidType" }),
        )
        .unwrap();
        assert!(void.matches_at(&at(&sample, sample.ids.other)));
        assert!(!void.matches_at(&at(&sample, sample.ids.field)));
    }

    #[test]
    fn unknown_url_lists_java_types() {
        let err = load(
            &registry(),
            serde_json::json!({ "type": "matcher", "type_url": "arbor.java.v1.Nope" }),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("arbor.java.v1.Nope"));
        assert!(message.contains("arbor.java.v1.MethodIsNamed"));
    }
}
