//! `SemanticContext` - per-compilation services shared by every match attempt
//!
//! One context exists per compilation unit being analysed. It bundles:
//!
//! - the immutable tree,
//! - a [`TypeOracle`] answering type questions (an external collaborator),
//! - a [`NameTable`] for pointer-stable name interning,
//! - a bounded [`CompilationCache`] for memoized lookups such as
//!   [`resolve_type`](SemanticContext::resolve_type) and [`Supplier`] values.
//!
//! Nothing here is process-global: two compilations never observe each
//! other's cached values.

use crate::{CompilationCache, EngineConfig, MatchState, MatcherError, Path, SyntaxTree};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// Names
// ═══════════════════════════════════════════════════════════════════════════════

/// An interned identifier.
///
/// Two names produced by the same [`NameTable`] for equal text share one
/// allocation, so [`ptr_eq`](Self::ptr_eq) is a valid fast-path equality.
/// `==` still compares by content so names from different tables interoperate.
#[derive(Clone)]
pub struct Name(Arc<str>);

impl Name {
    /// The text of this name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if both names share one interned allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for Name {}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Interning table for [`Name`]s.
#[derive(Default)]
pub struct NameTable {
    names: Mutex<HashSet<Arc<str>>>,
}

impl NameTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical [`Name`] for `text`, interning it on first use.
    pub fn intern(&self, text: &str) -> Name {
        let mut names = self.names.lock();
        if let Some(existing) = names.get(text) {
            return Name(Arc::clone(existing));
        }
        let name: Arc<str> = Arc::from(text);
        names.insert(Arc::clone(&name));
        Name(name)
    }

    /// Look up `text` without interning it.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Name> {
        self.names
            .lock()
            .get(text)
            .map(|existing| Name(Arc::clone(existing)))
    }

    /// Number of distinct names interned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.lock().len()
    }

    /// Returns `true` if no names have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.lock().is_empty()
    }
}

impl fmt::Debug for NameTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameTable").field("len", &self.len()).finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Opaque handle to a type known to a [`TypeOracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub u32);

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstValue {
    /// Integral constant (`int`, `long`, `short`, `byte`).
    Int(i64),
    /// Boolean constant.
    Bool(bool),
    /// Character constant.
    Char(char),
    /// String constant.
    Str(Arc<str>),
}

/// What a [`MethodSymbol`] declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum MethodKind {
    #[default]
    Instance,
    Static,
    Constructor,
}

/// A resolved method: declaring type, simple name and erased parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSymbol {
    pub owner: TypeHandle,
    pub name: Arc<str>,
    pub kind: MethodKind,
    pub parameters: Vec<TypeHandle>,
}

impl MethodSymbol {
    /// Whether the method is `static`.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.kind == MethodKind::Static
    }
}

/// Type and symbol capability supplied by the host compiler.
///
/// The engine never infers types; every type question is routed here.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot answer type questions for nodes of type `{N}`",
    note = "use `NoTypes` when the host has no type information"
)]
pub trait TypeOracle<N>: Send + Sync {
    /// The static type of `node`, if it has one. For a method declaration
    /// this is its return type.
    fn type_of(&self, node: N) -> Option<TypeHandle>;

    /// Resolve a fully-qualified type name.
    fn resolve(&self, name: &str) -> Option<TypeHandle>;

    /// Whether `sub` is assignable to `sup`.
    fn is_subtype(&self, sub: TypeHandle, sup: TypeHandle) -> bool;

    /// Whether `a` and `b` denote the same type (after erasure).
    fn is_same_type(&self, a: TypeHandle, b: TypeHandle) -> bool {
        a == b
    }

    /// Constant value of `node`, when it is a compile-time constant.
    fn constant_value(&self, _node: N) -> Option<ConstValue> {
        None
    }

    /// Fully-qualified name of `ty` (`int`, `void` and `T[]` included).
    fn type_name(&self, _ty: TypeHandle) -> Option<&str> {
        None
    }

    /// The method a call site (or declaration) resolves to.
    fn method_symbol(&self, _node: N) -> Option<&MethodSymbol> {
        None
    }
}

/// A [`TypeOracle`] that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypes;

impl<N> TypeOracle<N> for NoTypes {
    fn type_of(&self, _node: N) -> Option<TypeHandle> {
        None
    }

    fn resolve(&self, _name: &str) -> Option<TypeHandle> {
        None
    }

    fn is_subtype(&self, _sub: TypeHandle, _sup: TypeHandle) -> bool {
        false
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SemanticContext
// ═══════════════════════════════════════════════════════════════════════════════

static NEXT_COMPILATION: AtomicU64 = AtomicU64::new(1);

/// Unique identity of one [`SemanticContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilationId(u64);

impl CompilationId {
    fn next() -> Self {
        Self(NEXT_COMPILATION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CompilationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compilation#{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ResolveType(String);

/// Per-compilation services: the tree, types, names and the memo cache.
///
/// # Example
///
/// ```ignore
/// let semantics = SemanticContext::new(Arc::new(tree), Arc::new(types));
/// let root = semantics.root_state();
/// assert!(predicate.matches(&root.leaf(), &root));
/// ```
pub struct SemanticContext<M: SyntaxTree> {
    id: CompilationId,
    tree: Arc<M>,
    types: Arc<dyn TypeOracle<M::Node>>,
    names: NameTable,
    cache: CompilationCache,
}

impl<M: SyntaxTree> SemanticContext<M> {
    /// Create a context with the default [`EngineConfig`].
    pub fn new(tree: Arc<M>, types: Arc<dyn TypeOracle<M::Node>>) -> Self {
        Self::build(tree, types, crate::settings::DEFAULT_CAPACITY)
    }

    /// Create a context for a tree without type information.
    pub fn untyped(tree: Arc<M>) -> Self {
        Self::new(tree, Arc::new(NoTypes))
    }

    /// Create a context with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(
        tree: Arc<M>,
        types: Arc<dyn TypeOracle<M::Node>>,
        config: &EngineConfig,
    ) -> Result<Self, MatcherError> {
        let capacity = config.validate()?;
        Ok(Self::build(tree, types, capacity))
    }

    fn build(
        tree: Arc<M>,
        types: Arc<dyn TypeOracle<M::Node>>,
        capacity: std::num::NonZeroUsize,
    ) -> Self {
        let id = CompilationId::next();
        tracing::debug!(%id, capacity = capacity.get(), "created semantic context");
        Self {
            id,
            tree,
            types,
            names: NameTable::new(),
            cache: CompilationCache::new(capacity),
        }
    }

    /// Identity of this compilation.
    #[must_use]
    pub fn id(&self) -> CompilationId {
        self.id
    }

    /// The tree under analysis.
    #[must_use]
    pub fn tree(&self) -> &M {
        &self.tree
    }

    /// Shared handle to the tree, for building another context over it.
    #[must_use]
    pub fn tree_arc(&self) -> &Arc<M> {
        &self.tree
    }

    /// The type oracle.
    #[must_use]
    pub fn types(&self) -> &dyn TypeOracle<M::Node> {
        &*self.types
    }

    /// The name table.
    #[must_use]
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Shorthand for `self.names().intern(text)`.
    pub fn intern(&self, text: &str) -> Name {
        self.names.intern(text)
    }

    /// The per-compilation cache.
    #[must_use]
    pub fn cache(&self) -> &CompilationCache {
        &self.cache
    }

    /// Memoize a pure computation for the lifetime of this compilation.
    pub fn memoize<K, V, F>(&self, key: K, compute: F) -> V
    where
        K: Hash + Eq + Send + Sync + fmt::Debug + 'static,
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> V,
    {
        self.cache.get_or_insert_with(key, compute)
    }

    /// Resolve a fully-qualified type name through the oracle, memoized.
    pub fn resolve_type(&self, name: &str) -> Option<TypeHandle> {
        self.memoize(ResolveType(name.to_owned()), || self.types.resolve(name))
    }

    /// A state anchored at the tree root.
    #[must_use]
    pub fn root_state(&self) -> MatchState<'_, M> {
        MatchState::new(Path::root(self.tree.root()), self)
    }

    /// A state anchored at `node`, or `None` if `node` is not in this tree.
    ///
    /// Finding the path is O(tree size).
    #[must_use]
    pub fn state_at(&self, node: M::Node) -> Option<MatchState<'_, M>> {
        Path::locate(&*self.tree, node).map(|path| MatchState::new(path, self))
    }
}

impl<M: SyntaxTree> fmt::Debug for SemanticContext<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticContext")
            .field("id", &self.id)
            .field("names", &self.names)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Suppliers
// ═══════════════════════════════════════════════════════════════════════════════

static NEXT_SUPPLIER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, PartialEq, Eq, Hash)]
struct SupplierKey(u64);

/// A value computed lazily from a [`SemanticContext`] and memoized in its cache.
///
/// Each supplier is computed at most once per compilation (modulo cache
/// eviction) and never shared across compilations.
pub struct Supplier<M: SyntaxTree, V> {
    id: u64,
    label: Arc<str>,
    compute: Arc<dyn Fn(&SemanticContext<M>) -> V + Send + Sync>,
}

impl<M: SyntaxTree, V: Clone + Send + Sync + 'static> Supplier<M, V> {
    /// Wrap a pure computation.
    pub fn new<F>(label: impl Into<Arc<str>>, compute: F) -> Self
    where
        F: Fn(&SemanticContext<M>) -> V + Send + Sync + 'static,
    {
        Self {
            id: NEXT_SUPPLIER.fetch_add(1, Ordering::Relaxed),
            label: label.into(),
            compute: Arc::new(compute),
        }
    }

    /// The value for this compilation.
    pub fn get(&self, semantics: &SemanticContext<M>) -> V {
        semantics.memoize(SupplierKey(self.id), || (self.compute)(semantics))
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<M: SyntaxTree, V> Clone for Supplier<M, V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: Arc::clone(&self.label),
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<M: SyntaxTree, V> fmt::Debug for Supplier<M, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Supplier").field(&self.label).finish()
    }
}

/// A supplier resolving a fully-qualified type name.
pub fn type_from_name<M: SyntaxTree>(name: &str) -> Supplier<M, Option<TypeHandle>> {
    let owned = name.to_owned();
    Supplier::new(format!("type_from_name({name})"), move |semantics| {
        semantics.resolve_type(&owned)
    })
}
