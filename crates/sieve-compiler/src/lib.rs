//! Sieve Rule Compiler
//!
//! This crate turns rule file text into the ordered rule list consumed by
//! [`sieve_core::FilterEngine`], and writes rule lists back out.

pub mod parser;
pub mod writer;

use std::io::BufRead;

use sieve_core::{FilterEngine, RuleFactory};

pub use parser::{classify_line, parse_rule_specs, parse_rules, read_rules, Line, ParseError};
pub use writer::{write_rule_specs, write_rules};

/// Parse rule text and build an engine with the default resolver.
/// A malformed rule file never yields an engine.
pub fn build_engine<F: RuleFactory>(text: &str, factory: F) -> Result<FilterEngine, ParseError> {
    Ok(FilterEngine::new(parse_rules(text, factory)?))
}

/// Read rules from a buffered reader and build an engine.
pub fn load_engine<R: BufRead, F: RuleFactory>(reader: R, factory: F) -> Result<FilterEngine, ParseError> {
    Ok(FilterEngine::new(read_rules(reader, factory)?))
}
