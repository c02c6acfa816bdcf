//! Compiled patterns and rule construction back-ends
//!
//! A rule's pattern text is compiled exactly once, when the rule file is
//! loaded. The [`RuleFactory`] trait decides how the text is turned into a
//! matcher, so the parser and the engine stay independent of the regex
//! flavor in use.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::types::{Rule, RuleAction};

/// Error type for pattern compilation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// A precompiled pattern together with the text it was compiled from.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` so that it matches anywhere in the URL.
    pub fn unanchored(source: &str) -> Result<Self, PatternError> {
        Self::compile(source, source)
    }

    /// Compile `source` so that it must match the whole URL.
    pub fn anchored(source: &str) -> Result<Self, PatternError> {
        // The wrapping group can balance stray parentheses; validate the bare text first
        Self::compile(source, source)?;
        Self::compile(source, &format!("^(?:{})$", source))
    }

    fn compile(source: &str, expr: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(expr).map_err(|source_err| PatternError {
            pattern: source.to_string(),
            source: source_err,
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern text as written in the rule file.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// =============================================================================
// Rule Factories
// =============================================================================

/// Builds a [`Rule`] from the parts of a rule line.
pub trait RuleFactory {
    fn create_rule(
        &self,
        action: RuleAction,
        pattern: &str,
        scope: Option<String>,
    ) -> Result<Rule, PatternError>;
}

/// Straight regex search: a match anywhere in the URL counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRuleFactory;

impl RuleFactory for BasicRuleFactory {
    fn create_rule(
        &self,
        action: RuleAction,
        pattern: &str,
        scope: Option<String>,
    ) -> Result<Rule, PatternError> {
        Ok(Rule::new(action, Pattern::unanchored(pattern)?, scope))
    }
}

/// Patterns are anchored at both ends and must describe the whole URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchoredRuleFactory;

impl RuleFactory for AnchoredRuleFactory {
    fn create_rule(
        &self,
        action: RuleAction,
        pattern: &str,
        scope: Option<String>,
    ) -> Result<Rule, PatternError> {
        Ok(Rule::new(action, Pattern::anchored(pattern)?, scope))
    }
}

/// Runtime selection between the built-in factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleFlavor {
    #[default]
    Basic,
    Anchored,
}

impl RuleFactory for RuleFlavor {
    fn create_rule(
        &self,
        action: RuleAction,
        pattern: &str,
        scope: Option<String>,
    ) -> Result<Rule, PatternError> {
        match self {
            Self::Basic => BasicRuleFactory.create_rule(action, pattern, scope),
            Self::Anchored => AnchoredRuleFactory.create_rule(action, pattern, scope),
        }
    }
}

impl<F: RuleFactory + ?Sized> RuleFactory for &F {
    fn create_rule(
        &self,
        action: RuleAction,
        pattern: &str,
        scope: Option<String>,
    ) -> Result<Rule, PatternError> {
        (**self).create_rule(action, pattern, scope)
    }
}

impl FromStr for RuleFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "anchored" => Ok(Self::Anchored),
            other => Err(format!("unknown rule flavor '{}' (expected basic or anchored)", other)),
        }
    }
}

impl fmt::Display for RuleFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Anchored => f.write_str("anchored"),
        }
    }
}
