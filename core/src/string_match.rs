//! `StringMatchSpec` - config-level string match pattern
//!
//! [`StringMatchSpec`] is what a rule author wrote ("name starts with
//! `assert`"). It compiles to a [`StringMatcher`], the runtime value that name
//! predicates hold and evaluate.

use crate::{MatcherError, MAX_PATTERN_LENGTH, MAX_REGEX_PATTERN_LENGTH};
use std::fmt;

/// A string match pattern from user configuration.
///
/// # Example
///
/// ```
/// use arbor::StringMatchSpec;
///
/// let spec = StringMatchSpec::Prefix("assert".into());
/// let matcher = spec.compile().unwrap();
/// assert!(matcher.matches("assertEquals"));
/// assert!(!matcher.matches("verify"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringMatchSpec {
    /// Exact string equality.
    Exact(String),
    /// String starts with prefix.
    Prefix(String),
    /// String ends with suffix.
    Suffix(String),
    /// String contains substring.
    Contains(String),
    /// Regular expression match (Rust `regex` crate syntax, linear time).
    Regex(String),
}

impl StringMatchSpec {
    /// Compile this spec into a runtime [`StringMatcher`].
    ///
    /// # Errors
    ///
    /// - [`MatcherError::PatternTooLong`] if the pattern exceeds
    ///   [`MAX_PATTERN_LENGTH`] (or [`MAX_REGEX_PATTERN_LENGTH`] for regexes)
    /// - [`MatcherError::InvalidPattern`] if the regex is invalid
    pub fn compile(&self) -> Result<StringMatcher, MatcherError> {
        self.check_length()?;
        match self {
            Self::Exact(v) => Ok(StringMatcher::exact(v.as_str(), false)),
            Self::Prefix(v) => Ok(StringMatcher::prefix(v.as_str(), false)),
            Self::Suffix(v) => Ok(StringMatcher::suffix(v.as_str(), false)),
            Self::Contains(v) => Ok(StringMatcher::contains(v.as_str(), false)),
            Self::Regex(v) => StringMatcher::regex(v).map_err(|e| MatcherError::InvalidPattern {
                pattern: v.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn check_length(&self) -> Result<(), MatcherError> {
        let (len, max) = match self {
            Self::Regex(pattern) => (pattern.len(), MAX_REGEX_PATTERN_LENGTH),
            Self::Exact(v) | Self::Prefix(v) | Self::Suffix(v) | Self::Contains(v) => {
                (v.len(), MAX_PATTERN_LENGTH)
            }
        };
        if len > max {
            return Err(MatcherError::PatternTooLong { len, max });
        }
        Ok(())
    }
}

impl fmt::Display for StringMatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "Exact(\"{v}\")"),
            Self::Prefix(v) => write!(f, "Prefix(\"{v}\")"),
            Self::Suffix(v) => write!(f, "Suffix(\"{v}\")"),
            Self::Contains(v) => write!(f, "Contains(\"{v}\")"),
            Self::Regex(v) => write!(f, "Regex(\"{v}\")"),
        }
    }
}

/// Runtime string matcher with optional ASCII case-insensitivity.
///
/// ```
/// use arbor::StringMatcher;
///
/// let matcher = StringMatcher::suffix("TEST", true);
/// assert!(matcher.matches("FooTest"));
///
/// let matcher = StringMatcher::regex(r"^get[A-Z]").unwrap();
/// assert!(matcher.matches("getName"));
/// assert!(!matcher.matches("getter"));
/// ```
#[derive(Debug, Clone)]
pub enum StringMatcher {
    /// Exact string equality.
    Exact { value: String, ignore_case: bool },
    /// String prefix match.
    Prefix { value: String, ignore_case: bool },
    /// String suffix match.
    Suffix { value: String, ignore_case: bool },
    /// Substring contains match.
    Contains { value: String, ignore_case: bool },
    /// Regular expression match (RE2 semantics, linear time).
    Regex(regex::Regex),
}

impl StringMatcher {
    /// Create an exact match.
    #[must_use]
    pub fn exact(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Exact {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a prefix match.
    #[must_use]
    pub fn prefix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Prefix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a suffix match.
    #[must_use]
    pub fn suffix(value: impl Into<String>, ignore_case: bool) -> Self {
        Self::Suffix {
            value: value.into(),
            ignore_case,
        }
    }

    /// Create a contains match.
    ///
    /// When `ignore_case` is true, the pattern is lowercased once here.
    #[must_use]
    pub fn contains(value: impl Into<String>, ignore_case: bool) -> Self {
        let value = value.into();
        Self::Contains {
            value: if ignore_case {
                value.to_ascii_lowercase()
            } else {
                value
            },
            ignore_case,
        }
    }

    /// Create a regex match.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the regex pattern is invalid.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(Self::Regex)
    }

    /// Check `input` against this matcher.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Self::Exact { value, ignore_case } => {
                if *ignore_case {
                    input.eq_ignore_ascii_case(value)
                } else {
                    input == value
                }
            }
            Self::Prefix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .get(..value.len())
                        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(value))
                } else {
                    input.starts_with(value.as_str())
                }
            }
            Self::Suffix { value, ignore_case } => {
                if *ignore_case {
                    input
                        .len()
                        .checked_sub(value.len())
                        .and_then(|start| input.get(start..))
                        .is_some_and(|suffix| suffix.eq_ignore_ascii_case(value))
                } else {
                    input.ends_with(value.as_str())
                }
            }
            Self::Contains { value, ignore_case } => {
                if *ignore_case {
                    input.to_ascii_lowercase().contains(value.as_str())
                } else {
                    input.contains(value.as_str())
                }
            }
            Self::Regex(re) => re.is_match(input),
        }
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, value, ignore_case) = match self {
            Self::Exact { value, ignore_case } => ("exact", value.as_str(), *ignore_case),
            Self::Prefix { value, ignore_case } => ("prefix", value.as_str(), *ignore_case),
            Self::Suffix { value, ignore_case } => ("suffix", value.as_str(), *ignore_case),
            Self::Contains { value, ignore_case } => ("contains", value.as_str(), *ignore_case),
            Self::Regex(re) => ("regex", re.as_str(), false),
        };
        if ignore_case {
            write!(f, "{kind}(\"{value}\", ignore_case)")
        } else {
            write!(f, "{kind}(\"{value}\")")
        }
    }
}
