//! Type registry for config-driven predicate construction.
//!
//! The registry turns a [`PredicateConfig`] (JSON/YAML) into a runtime
//! [`NodePredicate`] without domain-specific loading code.
//!
//! # Architecture (axum `BoxedIntoRoute` pattern)
//!
//! Each predicate type registers itself via [`IntoPredicate`]. At registration
//! time the concrete type `T` is monomorphized into a closure and erased
//! behind `Box<dyn Fn>`: early type erasure at registration, late invocation
//! at load time.
//!
//! Factories receive a [`PredicateLoader`] so that adapters (`Contains`,
//! `EnclosingNode`, quantified child matchers) can load the predicates nested
//! in their own config. The loader carries the current nesting level, so
//! [`MAX_DEPTH`] bounds the whole tree and not just one layer.
//!
//! # Example
//!
//! ```ignore
//! let registry = arbor_java::register(RegistryBuilder::new()).build();
//!
//! let config: PredicateConfig = serde_yaml::from_str(yaml)?;
//! let predicate = registry.load_predicate(config)?;
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::{
    config::{ChildrenConfig, NestedConfig, PredicateConfig, TypedConfig},
    MatcherError, MultiMatcher, NodePredicate, Predicate, SyntaxTree, MAX_DEPTH,
    MAX_PREDICATES_PER_COMPOUND,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Traits
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait for predicate types that can be constructed from configuration.
///
/// Each type knows its own config shape via the associated `Config` type.
///
/// # Example
///
/// ```ignore
/// impl IntoPredicate<JavaTree> for MethodIsNamed {
///     type Config = NameConfig;
///     fn from_config(
///         config: NameConfig,
///         _: &PredicateLoader<'_, JavaTree>,
///     ) -> Result<NodePredicate<JavaTree>, MatcherError> {
///         Ok(method_is_named(&config.name))
///     }
/// }
/// ```
pub trait IntoPredicate<M: SyntaxTree>: Send + Sync + 'static {
    /// The configuration type deserialized from JSON/YAML.
    type Config: DeserializeOwned + Send + Sync;

    /// Construct a predicate from deserialized configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidConfig`] if the config is semantically
    /// invalid, or any error from loading nested predicates.
    fn from_config(
        config: Self::Config,
        loader: &PredicateLoader<'_, M>,
    ) -> Result<NodePredicate<M>, MatcherError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Type-erased factories
// ═══════════════════════════════════════════════════════════════════════════════

/// Type-erased predicate factory closure.
type BoxedPredicateFactory<M> = Box<
    dyn Fn(&serde_json::Value, &PredicateLoader<'_, M>) -> Result<NodePredicate<M>, MatcherError>
        + Send
        + Sync,
>;

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for constructing a [`Registry`].
///
/// Register predicate types with their type URLs, then call
/// [`build()`](Self::build) to produce an immutable `Registry`.
pub struct RegistryBuilder<M: SyntaxTree> {
    factories: HashMap<String, BoxedPredicateFactory<M>>,
}

impl<M: SyntaxTree> RegistryBuilder<M> {
    /// Create a new empty registry builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a predicate type with a type URL.
    ///
    /// At load time, the registry deserializes config as `T::Config` and calls
    /// `T::from_config()`. Registering the same URL twice keeps the later one.
    #[must_use]
    pub fn predicate<T: IntoPredicate<M>>(mut self, type_url: &str) -> Self {
        self.factories.insert(
            type_url.to_owned(),
            Box::new(|value: &serde_json::Value, loader: &PredicateLoader<'_, M>| {
                let config: T::Config = serde_json::from_value(value.clone()).map_err(|e| {
                    MatcherError::InvalidConfig {
                        reason: e.to_string(),
                    }
                })?;
                T::from_config(config, loader)
            }),
        );
        self
    }

    /// Freeze the registry. No further registration is possible.
    #[must_use]
    pub fn build(self) -> Registry<M> {
        tracing::debug!(predicates = self.factories.len(), "built predicate registry");
        Registry {
            factories: self.factories,
        }
    }
}

impl<M: SyntaxTree> Default for RegistryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the tree-model-independent adapters.
///
/// | Type URL | Adapter | Config |
/// |----------|---------|--------|
/// | `arbor.core.v1.Contains` | [`contains`](crate::contains) | [`NestedConfig`] |
/// | `arbor.core.v1.ParentNode` | [`parent_node`](crate::parent_node) | [`NestedConfig`] |
/// | `arbor.core.v1.EnclosingNode` | [`enclosing_node`](crate::enclosing_node) | [`NestedConfig`] |
/// | `arbor.core.v1.Children` | [`MultiMatcher::over_children`] | [`ChildrenConfig`] |
#[must_use]
pub fn register_core_predicates<M: SyntaxTree>(builder: RegistryBuilder<M>) -> RegistryBuilder<M> {
    builder
        .predicate::<ContainsFactory>("arbor.core.v1.Contains")
        .predicate::<ParentNodeFactory>("arbor.core.v1.ParentNode")
        .predicate::<EnclosingNodeFactory>("arbor.core.v1.EnclosingNode")
        .predicate::<ChildrenFactory>("arbor.core.v1.Children")
}

struct ContainsFactory;

impl<M: SyntaxTree> IntoPredicate<M> for ContainsFactory {
    type Config = NestedConfig;

    fn from_config(
        config: NestedConfig,
        loader: &PredicateLoader<'_, M>,
    ) -> Result<NodePredicate<M>, MatcherError> {
        Ok(crate::contains(loader.load(config.predicate)?))
    }
}

struct ParentNodeFactory;

impl<M: SyntaxTree> IntoPredicate<M> for ParentNodeFactory {
    type Config = NestedConfig;

    fn from_config(
        config: NestedConfig,
        loader: &PredicateLoader<'_, M>,
    ) -> Result<NodePredicate<M>, MatcherError> {
        Ok(crate::parent_node(loader.load(config.predicate)?))
    }
}

struct EnclosingNodeFactory;

impl<M: SyntaxTree> IntoPredicate<M> for EnclosingNodeFactory {
    type Config = NestedConfig;

    fn from_config(
        config: NestedConfig,
        loader: &PredicateLoader<'_, M>,
    ) -> Result<NodePredicate<M>, MatcherError> {
        Ok(crate::enclosing_node(loader.load(config.predicate)?))
    }
}

struct ChildrenFactory;

impl<M: SyntaxTree> IntoPredicate<M> for ChildrenFactory {
    type Config = ChildrenConfig;

    fn from_config(
        config: ChildrenConfig,
        loader: &PredicateLoader<'_, M>,
    ) -> Result<NodePredicate<M>, MatcherError> {
        let child = loader.load(config.predicate)?;
        Ok(MultiMatcher::over_children(config.quantifier, child).into_predicate())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable registry of predicate factories.
///
/// Constructed via [`RegistryBuilder`].
pub struct Registry<M: SyntaxTree> {
    factories: HashMap<String, BoxedPredicateFactory<M>>,
}

impl<M: SyntaxTree> Registry<M> {
    /// Load a predicate from configuration.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::UnknownTypeUrl`] - a `type_url` is not registered
    /// - [`MatcherError::InvalidConfig`] - a factory config failed to deserialize or validate
    /// - [`MatcherError::InvalidPattern`] / [`MatcherError::PatternTooLong`] - bad name pattern
    /// - [`MatcherError::DepthExceeded`] - nesting, counting nested factory configs, exceeds
    ///   [`MAX_DEPTH`]
    /// - [`MatcherError::TooManyPredicates`] - an `and`/`or` exceeds
    ///   [`MAX_PREDICATES_PER_COMPOUND`]
    pub fn load_predicate(
        &self,
        config: PredicateConfig,
    ) -> Result<NodePredicate<M>, MatcherError> {
        let predicate = PredicateLoader {
            registry: self,
            level: 0,
        }
        .load(config)?;
        predicate.validate()?;
        Ok(predicate)
    }

    /// Returns the number of registered predicate types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no predicate types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns `true` if the given type URL is registered.
    #[must_use]
    pub fn contains(&self, type_url: &str) -> bool {
        self.factories.contains_key(type_url)
    }

    /// Returns all registered type URLs (sorted).
    #[must_use]
    pub fn type_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    fn factory(&self, type_url: &str) -> Result<&BoxedPredicateFactory<M>, MatcherError> {
        self.factories
            .get(type_url)
            .ok_or_else(|| MatcherError::UnknownTypeUrl {
                type_url: type_url.to_owned(),
                registry: "predicate",
                available: self.type_urls().into_iter().map(str::to_owned).collect(),
            })
    }
}

/// Loads predicate configs against a [`Registry`], tracking nesting level.
///
/// Handed to [`IntoPredicate::from_config`] so factories can load the
/// predicates nested in their own configuration.
pub struct PredicateLoader<'r, M: SyntaxTree> {
    registry: &'r Registry<M>,
    level: usize,
}

impl<M: SyntaxTree> PredicateLoader<'_, M> {
    /// The registry being loaded against.
    #[must_use]
    pub fn registry(&self) -> &Registry<M> {
        self.registry
    }

    /// Load a nested predicate config.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::load_predicate`].
    pub fn load(&self, config: PredicateConfig) -> Result<NodePredicate<M>, MatcherError> {
        let depth = self.level + config.depth();
        if depth > MAX_DEPTH {
            return Err(MatcherError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        self.build(config, self.level + 1)
    }

    fn build(
        &self,
        config: PredicateConfig,
        level: usize,
    ) -> Result<NodePredicate<M>, MatcherError> {
        match config {
            PredicateConfig::Always => Ok(Predicate::Always),
            PredicateConfig::Never => Ok(Predicate::Never),
            PredicateConfig::Matcher(TypedConfig { type_url, config }) => {
                let factory = self.registry.factory(&type_url)?;
                tracing::debug!(%type_url, level, "loading registered predicate");
                factory(
                    &config,
                    &PredicateLoader {
                        registry: self.registry,
                        level,
                    },
                )
            }
            PredicateConfig::And { predicates } => {
                Ok(Predicate::And(self.build_all(predicates, level)?))
            }
            PredicateConfig::Or { predicates } => {
                Ok(Predicate::Or(self.build_all(predicates, level)?))
            }
            PredicateConfig::Not { predicate } => {
                let inner = self.build(*predicate, level + 1)?;
                Ok(Predicate::Not(Box::new(inner)))
            }
        }
    }

    fn build_all(
        &self,
        predicates: Vec<PredicateConfig>,
        level: usize,
    ) -> Result<Vec<NodePredicate<M>>, MatcherError> {
        if predicates.len() > MAX_PREDICATES_PER_COMPOUND {
            return Err(MatcherError::TooManyPredicates {
                count: predicates.len(),
                max: MAX_PREDICATES_PER_COMPOUND,
            });
        }
        predicates
            .into_iter()
            .map(|p| self.build(p, level + 1))
            .collect()
    }
}
