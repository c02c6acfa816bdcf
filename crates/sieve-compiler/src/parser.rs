use std::io::{self, BufRead};

use sieve_core::url::normalize_host;
use sieve_core::{PatternError, Rule, RuleAction, RuleFactory, RuleSpec};

/// Error type for rule file parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid first character '{first}' at line {line_number}: {line}")]
    InvalidFirstCharacter {
        line_number: usize,
        line: String,
        first: char,
    },
    #[error("Invalid pattern at line {line_number}: {source}")]
    InvalidPattern {
        line_number: usize,
        line: String,
        #[source]
        source: PatternError,
    },
    #[error("Failed to read rules: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// The literal text of the offending line.
    pub fn line(&self) -> Option<&str> {
        match self {
            Self::InvalidFirstCharacter { line, .. } | Self::InvalidPattern { line, .. } => Some(line),
            Self::Io(_) => None,
        }
    }

    /// 1-based number of the offending line.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::InvalidFirstCharacter { line_number, .. }
            | Self::InvalidPattern { line_number, .. } => Some(*line_number),
            Self::Io(_) => None,
        }
    }
}

/// A classified rule file line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `+` or `-` followed by the pattern text
    Rule { action: RuleAction, pattern: &'a str },
    /// Comment or blank line
    Skip,
    /// `>` followed by a host or domain
    ScopeOpen(&'a str),
    /// `<`
    ScopeClose,
}

/// Classify one physical line. Returns None for an unknown leading character.
pub fn classify_line(line: &str) -> Option<Line<'_>> {
    let first = match line.chars().next() {
        Some(c) => c,
        None => return Some(Line::Skip),
    };
    let rest = &line[first.len_utf8()..];

    match first {
        '+' | '-' => Some(Line::Rule {
            action: RuleAction::from_sigil(first)?,
            pattern: rest,
        }),
        ' ' | '#' => Some(Line::Skip),
        '>' => Some(Line::ScopeOpen(rest.trim())),
        '<' => Some(Line::ScopeClose),
        _ => None,
    }
}

/// Parser state threaded through the line fold.
struct ParseState<T> {
    scope: Option<String>,
    rules: Vec<T>,
}

impl<T> ParseState<T> {
    fn new() -> Self {
        Self {
            scope: None,
            rules: Vec::new(),
        }
    }

    fn apply<F>(mut self, line_number: usize, line: &str, emit: &F) -> Result<Self, ParseError>
    where
        F: Fn(RuleAction, &str, Option<String>) -> Result<T, PatternError>,
    {
        match classify_line(line) {
            Some(Line::Skip) => {}
            Some(Line::ScopeOpen(scope)) => self.scope = Some(normalize_host(scope)),
            Some(Line::ScopeClose) => self.scope = None,
            Some(Line::Rule { action, pattern }) => {
                log::trace!("Adding rule [{}] for {:?}", pattern, self.scope);
                let rule = emit(action, pattern, self.scope.clone()).map_err(|source| {
                    ParseError::InvalidPattern {
                        line_number,
                        line: line.to_string(),
                        source,
                    }
                })?;
                self.rules.push(rule);
            }
            None => {
                return Err(ParseError::InvalidFirstCharacter {
                    line_number,
                    line: line.to_string(),
                    first: line.chars().next().unwrap_or_default(),
                })
            }
        }
        Ok(self)
    }
}

fn fold_lines<T, I, S, F>(lines: I, emit: F) -> Result<Vec<T>, ParseError>
where
    I: IntoIterator<Item = io::Result<S>>,
    S: AsRef<str>,
    F: Fn(RuleAction, &str, Option<String>) -> Result<T, PatternError>,
{
    let state = lines
        .into_iter()
        .enumerate()
        .try_fold(ParseState::new(), |state, (idx, line)| -> Result<_, ParseError> {
            let line = line?;
            let line = line.as_ref();
            // A final line may end in a bare carriage return
            let line = line.strip_suffix('\r').unwrap_or(line);
            state.apply(idx + 1, line, &emit)
        })?;
    log::debug!("Parsed {} rules", state.rules.len());
    Ok(state.rules)
}

/// Parse rule file text into compiled rules, in file order.
pub fn parse_rules<F: RuleFactory>(text: &str, factory: F) -> Result<Vec<Rule>, ParseError> {
    fold_lines(text.lines().map(Ok::<_, io::Error>), |action, pattern, scope| {
        factory.create_rule(action, pattern, scope)
    })
}

/// Read and parse rules from a buffered reader.
pub fn read_rules<R: BufRead, F: RuleFactory>(reader: R, factory: F) -> Result<Vec<Rule>, ParseError> {
    fold_lines(reader.lines(), |action, pattern, scope| {
        factory.create_rule(action, pattern, scope)
    })
}

/// Parse rule file text without compiling patterns.
pub fn parse_rule_specs(text: &str) -> Result<Vec<RuleSpec>, ParseError> {
    fold_lines(text.lines().map(Ok::<_, io::Error>), |action, pattern, scope| {
        Ok(RuleSpec {
            action,
            pattern: pattern.to_string(),
            scope,
        })
    })
}
