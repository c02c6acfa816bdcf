//! Rule file writer
//!
//! Serializes rules back into the line format. Scope directives are emitted
//! only where the scope changes, so a parsed file comes back in canonical form
//! with comments and blank lines dropped.

use sieve_core::{Rule, RuleAction, RuleSpec};

/// Serialize compiled rules.
pub fn write_rules(rules: &[Rule]) -> String {
    write_lines(
        rules
            .iter()
            .map(|r| (r.action, r.pattern.as_str(), r.scope.as_deref())),
    )
}

/// Serialize uncompiled rules.
pub fn write_rule_specs(specs: &[RuleSpec]) -> String {
    write_lines(
        specs
            .iter()
            .map(|s| (s.action, s.pattern.as_str(), s.scope.as_deref())),
    )
}

fn write_lines<'a, I>(rules: I) -> String
where
    I: Iterator<Item = (RuleAction, &'a str, Option<&'a str>)>,
{
    let mut out = String::new();
    let mut current: Option<&str> = None;

    for (action, pattern, scope) in rules {
        if scope != current {
            match scope {
                Some(scope) => {
                    out.push('>');
                    out.push_str(scope);
                    out.push('\n');
                }
                None => out.push_str("<\n"),
            }
            current = scope;
        }
        out.push(action.sigil());
        out.push_str(pattern);
        out.push('\n');
    }

    out
}
