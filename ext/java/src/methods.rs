//! Method invocation matchers
//!
//! A [`MethodMatcher`] describes the method a call site resolves to: whether
//! it is an instance method, a static method or a constructor, the class it is
//! invoked on, its name and its parameter types. Every question is answered
//! from the oracle's [`MethodSymbol`] for the call, so calls the oracle cannot
//! resolve never match.
//!
//! ```
//! use arbor_java::{instance_method, static_method, JavaPredicate};
//!
//! // list.add(x) for any List
//! let list_add: JavaPredicate = instance_method()
//!     .on_descendant_of("java.util.List")
//!     .named("add")
//!     .into_predicate();
//!
//! // Math.max(int, int)
//! let int_max = static_method()
//!     .on_class("java.lang.Math")
//!     .named("max")
//!     .with_parameters(["int", "int"]);
//! # let _ = (list_add, int_max);
//! ```
//!
//! The class a call is "on" is the receiver's static type for instance calls
//! with an explicit, typed receiver, and the declaring class otherwise.

use crate::{receiver_of, JavaPredicate, JavaTree, Kind, NodeId};
use arbor::{
    from_fn, type_from_name, MatchState, MethodKind, MethodSymbol, StringMatcher, Supplier,
    SyntaxTree, TypeHandle, TypeOracle,
};
use std::fmt::Write as _;
use std::sync::Arc;

type TypeSupplier = Supplier<JavaTree, Option<TypeHandle>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    AnyMethod,
    Instance,
    Static,
    Constructor,
}

impl Base {
    fn admits(self, kind: MethodKind) -> bool {
        match self {
            Self::AnyMethod => kind != MethodKind::Constructor,
            Self::Instance => kind == MethodKind::Instance,
            Self::Static => kind == MethodKind::Static,
            Self::Constructor => kind == MethodKind::Constructor,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::AnyMethod => "any_method()",
            Self::Instance => "instance_method()",
            Self::Static => "static_method()",
            Self::Constructor => "constructor()",
        }
    }
}

#[derive(Debug, Clone)]
enum Constraint {
    /// The class the call is on is exactly one of these.
    OnClass(Vec<TypeSupplier>),
    /// The class the call is on is a subtype of one of these.
    OnDescendantOf(Vec<TypeSupplier>),
    Named(Vec<Arc<str>>),
    NameMatches(StringMatcher),
    Parameters(Vec<TypeSupplier>),
}

/// Builder-style description of a resolved method call.
///
/// Start from [`instance_method`], [`static_method`], [`any_method`] or
/// [`constructor`]; each refinement adds a constraint that must hold.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    base: Base,
    constraints: Vec<Constraint>,
    label: String,
}

/// Calls resolving to a non-static method.
#[must_use]
pub fn instance_method() -> MethodMatcher {
    MethodMatcher::new(Base::Instance)
}

/// Calls resolving to a static method.
#[must_use]
pub fn static_method() -> MethodMatcher {
    MethodMatcher::new(Base::Static)
}

/// Calls resolving to any method that is not a constructor.
#[must_use]
pub fn any_method() -> MethodMatcher {
    MethodMatcher::new(Base::AnyMethod)
}

/// `new` expressions.
#[must_use]
pub fn constructor() -> MethodMatcher {
    MethodMatcher::new(Base::Constructor)
}

fn suppliers<I>(names: I) -> (Vec<TypeSupplier>, Vec<String>)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            (type_from_name::<JavaTree>(name), name.to_owned())
        })
        .unzip()
}

impl MethodMatcher {
    fn new(base: Base) -> Self {
        Self {
            base,
            constraints: Vec::new(),
            label: base.label().to_owned(),
        }
    }

    fn with(mut self, constraint: Constraint, step: &str, args: &[String]) -> Self {
        let _ = write!(self.label, ".{step}({})", args.join(", "));
        self.constraints.push(constraint);
        self
    }

    /// The call is on exactly `class`.
    #[must_use]
    pub fn on_class(self, class: &str) -> Self {
        self.on_class_any([class])
    }

    /// The call is on exactly one of `classes`.
    #[must_use]
    pub fn on_class_any<I>(self, classes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (types, names) = suppliers(classes);
        self.with(Constraint::OnClass(types), "on_class", &names)
    }

    /// The call is on `class` or one of its subtypes.
    #[must_use]
    pub fn on_descendant_of(self, class: &str) -> Self {
        self.on_descendant_of_any([class])
    }

    /// The call is on a subtype of one of `classes`.
    #[must_use]
    pub fn on_descendant_of_any<I>(self, classes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (types, names) = suppliers(classes);
        self.with(Constraint::OnDescendantOf(types), "on_descendant_of", &names)
    }

    /// The method's simple name is `name`.
    ///
    /// # Panics
    ///
    /// If `name` contains parentheses: write `"foo"`, not `"foo()"`.
    #[must_use]
    pub fn named(self, name: &str) -> Self {
        self.named_any_of([name])
    }

    /// The method's simple name is one of `names`.
    ///
    /// # Panics
    ///
    /// If any name contains parentheses.
    #[must_use]
    pub fn named_any_of<I>(self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_owned()).collect();
        for name in &names {
            assert!(
                !name.contains(['(', ')']),
                "method name ({name}) cannot contain parentheses; use \"foo\" instead of \"foo()\"",
            );
        }
        let constraint = Constraint::Named(names.iter().map(|n| Arc::from(n.as_str())).collect());
        self.with(constraint, "named", &names)
    }

    /// The method's simple name satisfies `matcher`.
    #[must_use]
    pub fn with_name_matching(self, matcher: StringMatcher) -> Self {
        let shown = format!("{matcher:?}");
        self.with(Constraint::NameMatches(matcher), "with_name_matching", &[shown])
    }

    /// The method's erased parameter types are exactly `parameters`, in order.
    #[must_use]
    pub fn with_parameters<I>(self, parameters: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (types, names) = suppliers(parameters);
        self.with(Constraint::Parameters(types), "with_parameters", &names)
    }

    /// The method takes no parameters.
    #[must_use]
    pub fn with_no_parameters(self) -> Self {
        self.with_parameters(std::iter::empty::<&str>())
    }

    /// Whether the call at `node` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, node: NodeId, state: &MatchState<'_, JavaTree>) -> bool {
        let tree = state.tree();
        if !matches!(tree.kind(node), Kind::MethodInvocation | Kind::NewClass) {
            return false;
        }
        let types = state.types();
        let Some(symbol) = types.method_symbol(node) else {
            return false;
        };
        if !self.base.admits(symbol.kind) {
            return false;
        }
        let on = class_called_on(tree, types, node, symbol);
        self.constraints
            .iter()
            .all(|constraint| satisfies(constraint, symbol, on, state))
    }

    /// A node predicate; false for anything that is not a resolved call.
    #[must_use]
    pub fn into_predicate(self) -> JavaPredicate {
        let label = self.label.clone();
        from_fn(label, move |node: &NodeId, state: &MatchState<'_, JavaTree>| {
            self.matches(*node, state)
        })
    }
}

fn class_called_on(
    tree: &JavaTree,
    types: &dyn TypeOracle<NodeId>,
    call: NodeId,
    symbol: &MethodSymbol,
) -> TypeHandle {
    if symbol.kind == MethodKind::Instance {
        if let Some(receiver) = receiver_of(tree, call).and_then(|r| types.type_of(r)) {
            return receiver;
        }
    }
    symbol.owner
}

fn satisfies(
    constraint: &Constraint,
    symbol: &MethodSymbol,
    on: TypeHandle,
    state: &MatchState<'_, JavaTree>,
) -> bool {
    let types = state.types();
    let semantics = state.semantics();
    match constraint {
        Constraint::OnClass(classes) => classes
            .iter()
            .any(|class| class.get(semantics).is_some_and(|c| types.is_same_type(on, c))),
        Constraint::OnDescendantOf(classes) => classes
            .iter()
            .any(|class| class.get(semantics).is_some_and(|c| types.is_subtype(on, c))),
        Constraint::Named(names) => names.iter().any(|name| **name == *symbol.name),
        Constraint::NameMatches(matcher) => matcher.matches(&symbol.name),
        Constraint::Parameters(expected) => {
            symbol.parameters.len() == expected.len()
                && symbol.parameters.iter().zip(expected).all(|(&actual, want)| {
                    want.get(semantics)
                        .is_some_and(|want| types.is_same_type(actual, want))
                })
        }
    }
}
