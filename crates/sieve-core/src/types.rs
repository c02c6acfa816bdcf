//! Core type definitions for Sieve
//!
//! These types map directly to the lines of a rule file and are shared by
//! the compiler and the decision engine.

use crate::pattern::Pattern;

// =============================================================================
// Rule Actions (the leading sigil of a rule line)
// =============================================================================

/// Action to take for a matched rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleAction {
    /// `+` rule - the URL is accepted
    Accept,
    /// `-` rule - the URL is rejected
    Reject,
}

impl RuleAction {
    /// The decision this action produces: `true` accepts the URL.
    #[inline]
    pub fn sign(self) -> bool {
        matches!(self, Self::Accept)
    }

    /// The sigil that introduces this action in a rule file.
    pub fn sigil(self) -> char {
        match self {
            Self::Accept => '+',
            Self::Reject => '-',
        }
    }

    /// Map a leading sigil back to an action.
    pub fn from_sigil(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Accept),
            '-' => Some(Self::Reject),
            _ => None,
        }
    }
}

impl From<bool> for RuleAction {
    fn from(sign: bool) -> Self {
        if sign {
            Self::Accept
        } else {
            Self::Reject
        }
    }
}

// =============================================================================
// Rules
// =============================================================================

/// One compiled line of a rule file.
#[derive(Debug, Clone)]
pub struct Rule {
    pub action: RuleAction,
    pub pattern: Pattern,
    /// Host or domain the rule is restricted to. `None` applies everywhere.
    pub scope: Option<String>,
}

impl Rule {
    pub fn new(action: RuleAction, pattern: Pattern, scope: Option<String>) -> Self {
        Self {
            action,
            pattern,
            scope,
        }
    }

    #[inline]
    pub fn sign(&self) -> bool {
        self.action.sign()
    }

    /// Check whether this rule is considered for a URL with the given host and
    /// registrable domain.
    #[inline]
    pub fn applies_to(&self, host: Option<&str>, domain: Option<&str>) -> bool {
        match self.scope.as_deref() {
            None => true,
            Some(scope) => Some(scope) == host || Some(scope) == domain,
        }
    }

    /// Test the pattern against the full URL.
    #[inline]
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }

    /// The uncompiled form of this rule.
    pub fn to_spec(&self) -> RuleSpec {
        RuleSpec {
            action: self.action,
            pattern: self.pattern.as_str().to_string(),
            scope: self.scope.clone(),
        }
    }
}

/// A rule line before its pattern is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub action: RuleAction,
    pub pattern: String,
    pub scope: Option<String>,
}

// =============================================================================
// Match Result
// =============================================================================

/// Result of evaluating a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    /// The final decision for this URL
    pub accepted: bool,
    /// Index of the rule that decided, `None` when the default reject applied
    pub rule_index: Option<usize>,
}

impl MatchResult {
    /// Decision made by the rule at `index`.
    pub fn from_rule(index: usize, rule: &Rule) -> Self {
        Self {
            accepted: rule.sign(),
            rule_index: Some(index),
        }
    }

    /// No rule matched.
    pub fn default_reject() -> Self {
        Self::default()
    }
}
