//! Sieve Core Library
//!
//! This crate provides the decision engine for the Sieve crawler URL filter.
//!
//! # Architecture
//!
//! A rule file is compiled (by `sieve-compiler`) into an ordered list of
//! [`Rule`]s. The [`FilterEngine`] owns that list and answers one accept/reject
//! query per URL: rules are tried in file order, rules scoped to another host
//! or domain are skipped, and the first matching rule decides. If nothing
//! matches, the URL is rejected.
//!
//! # Modules
//!
//! - `types`: Rule, action and match result definitions
//! - `pattern`: Compiled patterns and the `RuleFactory` back-ends
//! - `url`: Fast host extraction without allocations
//! - `psl`: Public Suffix List handling for registrable-domain extraction
//! - `resolver`: The host/domain capability used by the engine
//! - `engine`: First-match-wins decision engine

pub mod engine;
pub mod pattern;
pub mod psl;
pub mod resolver;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use engine::FilterEngine;
pub use pattern::{AnchoredRuleFactory, BasicRuleFactory, Pattern, PatternError, RuleFactory, RuleFlavor};
pub use psl::{SuffixList, SuffixListError};
pub use resolver::{HostResolver, MalformedUrl, UrlResolver};
pub use types::{MatchResult, Rule, RuleAction, RuleSpec};
