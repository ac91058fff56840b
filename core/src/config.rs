//! Config types for registry-driven predicate construction.
//!
//! These types mirror [`Predicate`](crate::Predicate) but are
//! serde-deserializable, so rule sets can live in JSON or YAML and be loaded
//! through [`Registry::load_predicate()`](crate::Registry::load_predicate).
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader |
//! |-------------|--------------|--------|
//! | [`PredicateConfig`] | [`NodePredicate`](crate::NodePredicate) | `Registry::load_predicate()` |
//! | [`TypedConfig`] | a registered leaf predicate | via registry factory |
//! | [`NestedConfig`] | an adapter around one predicate | via registry factory |
//! | [`ChildrenConfig`] | a [`MultiMatcher`](crate::MultiMatcher) | via registry factory |

use crate::MatchQuantifier;
use serde::Deserialize;

/// Configuration for a predicate.
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization:
///
/// ```json
/// { "type": "matcher", "type_url": "arbor.java.v1.MethodIsNamed", "config": { "name": "run" } }
/// { "type": "and", "predicates": [...] }
/// { "type": "or", "predicates": [...] }
/// { "type": "not", "predicate": { ... } }
/// { "type": "always" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum PredicateConfig {
    /// Matches every node.
    #[serde(rename = "always")]
    Always,

    /// Matches no node.
    #[serde(rename = "never")]
    Never,

    /// A registered predicate, resolved by `type_url`.
    #[serde(rename = "matcher")]
    Matcher(TypedConfig),

    /// All predicates must match (logical AND).
    #[serde(rename = "and")]
    And {
        /// Child predicates (all must match).
        predicates: Vec<PredicateConfig>,
    },

    /// Any predicate must match (logical OR).
    #[serde(rename = "or")]
    Or {
        /// Child predicates (any must match).
        predicates: Vec<PredicateConfig>,
    },

    /// Inverts the inner predicate (logical NOT).
    #[serde(rename = "not")]
    Not {
        /// The predicate to negate.
        predicate: Box<PredicateConfig>,
    },
}

impl PredicateConfig {
    /// Nesting depth of the combinator structure.
    ///
    /// Predicates nested inside a `matcher`'s own config are counted when that
    /// factory loads them.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Always | Self::Never | Self::Matcher(_) => 1,
            Self::And { predicates } | Self::Or { predicates } => {
                1 + predicates.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not { predicate } => 1 + predicate.depth(),
        }
    }
}

/// Reference to a registered predicate with its configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TypedConfig {
    /// The type URL identifying the registered predicate.
    /// Must match a `type_url` registered in the [`Registry`](crate::Registry).
    pub type_url: String,

    /// Type-specific configuration payload.
    /// Deserialized as the `Config` associated type of the registered
    /// [`IntoPredicate`](crate::IntoPredicate).
    #[serde(default = "default_config")]
    pub config: serde_json::Value,
}

fn default_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Empty configuration for predicates that need no parameters.
///
/// Accepts any JSON value (`{}`, `null`, etc.) and ignores it.
#[derive(Debug, Clone, Copy)]
pub struct UnitConfig;

impl<'de> Deserialize<'de> for UnitConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(UnitConfig)
    }
}

/// Configuration for adapters that wrap exactly one predicate.
#[derive(Debug, Clone, Deserialize)]
pub struct NestedConfig {
    /// The wrapped predicate.
    pub predicate: PredicateConfig,
}

/// Configuration for a quantified match over selected children.
#[derive(Debug, Clone, Deserialize)]
pub struct ChildrenConfig {
    /// How per-child results combine.
    pub quantifier: MatchQuantifier,

    /// Predicate applied to each selected child.
    pub predicate: PredicateConfig,
}
