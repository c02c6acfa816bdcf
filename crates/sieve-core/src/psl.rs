//! Public Suffix List (PSL) utilities for registrable-domain extraction
//!
//! A [`SuffixList`] is parsed from the standard PSL text format. Without one,
//! a small built-in heuristic is used.
//!
//! # Examples
//!
//! ```
//! use sieve_core::psl::registrable_domain;
//!
//! assert_eq!(registrable_domain("sub.example.com", None), "example.com");
//! assert_eq!(registrable_domain("sub.example.co.uk", None), "example.co.uk");
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Error type for suffix list loading.
#[derive(Debug, thiserror::Error)]
pub enum SuffixListError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid suffix rule at line {line_number}: {line}")]
    InvalidRule { line_number: usize, line: String },
}

// =============================================================================
// Suffix List
// =============================================================================

/// PSL rule sets for suffix lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixList {
    /// Exact rules (e.g., "com", "co.uk")
    exact: HashSet<String>,
    /// Wildcard rules (e.g., "*.ck" stored as "ck")
    wildcard: HashSet<String>,
    /// Exception rules (e.g., "!www.ck" stored as "www.ck")
    exception: HashSet<String>,
}

impl SuffixList {
    /// Create an empty suffix list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse PSL text. Comments start with `//`; only the first
    /// whitespace-delimited token of a line is significant.
    pub fn parse(text: &str) -> Result<Self, SuffixListError> {
        Self::from_reader(text.as_bytes())
    }

    /// Parse PSL text from a reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SuffixListError> {
        let mut list = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            list.add_line(idx + 1, &line?)?;
        }
        Ok(list)
    }

    /// Load a PSL file from disk.
    pub fn load(path: &Path) -> Result<Self, SuffixListError> {
        let list = Self::from_reader(BufReader::new(File::open(path)?))?;
        log::debug!("Loaded {} suffix rules from {}", list.len(), path.display());
        Ok(list)
    }

    fn add_line(&mut self, line_number: usize, line: &str) -> Result<(), SuffixListError> {
        let token = match line.split_whitespace().next() {
            Some(token) if !token.starts_with("//") => token,
            _ => return Ok(()),
        };

        let invalid = || SuffixListError::InvalidRule {
            line_number,
            line: line.to_string(),
        };

        if let Some(rest) = token.strip_prefix('!') {
            if rest.is_empty() || rest.contains('*') {
                return Err(invalid());
            }
            self.exception.insert(normalize_suffix(rest));
        } else if let Some(rest) = token.strip_prefix("*.") {
            if rest.is_empty() || rest.contains('*') {
                return Err(invalid());
            }
            self.wildcard.insert(normalize_suffix(rest));
        } else {
            if token.contains('*') || token.contains('!') {
                return Err(invalid());
            }
            self.exact.insert(normalize_suffix(token));
        }
        Ok(())
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcard.len() + self.exception.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a suffix is an exact rule.
    #[inline]
    pub fn is_exact(&self, suffix: &str) -> bool {
        self.exact.contains(suffix)
    }

    /// Check if a suffix matches a wildcard rule.
    #[inline]
    pub fn is_wildcard(&self, suffix: &str) -> bool {
        self.wildcard.contains(suffix)
    }

    /// Check if a suffix is an exception rule.
    #[inline]
    pub fn is_exception(&self, suffix: &str) -> bool {
        self.exception.contains(suffix)
    }

    /// Registrable domain of an already normalized host, or None if the
    /// host is itself a public suffix. Hosts matching no rule fall back to
    /// the implicit `*` rule.
    pub fn registrable_domain<'a>(&self, host: &'a str) -> Option<&'a str> {
        let starts = label_starts(host);
        let n = starts.len();

        for i in 0..n {
            let suffix = &host[starts[i]..];

            // Exception rules override wildcards
            if self.is_exception(suffix) {
                return Some(suffix);
            }

            let wildcard_hit = i + 1 < n && self.is_wildcard(&host[starts[i + 1]..]);
            if self.is_exact(suffix) || wildcard_hit {
                return if i > 0 { Some(&host[starts[i - 1]..]) } else { None };
            }
        }

        if n >= 2 {
            Some(&host[starts[n - 2]..])
        } else {
            None
        }
    }
}

fn normalize_suffix(s: &str) -> String {
    s.trim_matches('.').to_ascii_lowercase()
}

/// Byte offsets at which each label of `host` starts.
fn label_starts(host: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(host.match_indices('.').map(|(i, _)| i + 1));
    starts
}

// =============================================================================
// Registrable Domain Extraction
// =============================================================================

/// Common two-part TLDs for fallback.
const COMMON_TWO_PART_TLDS: &[&str] = &[
    "co.uk", "co.jp", "co.nz", "co.za", "co.in", "co.kr",
    "com.au", "com.br", "com.cn", "com.mx", "com.tw", "com.hk",
    "net.au", "net.nz",
    "org.uk", "org.au",
    "gov.uk", "gov.au",
    "ac.uk", "ac.jp",
    "ne.jp", "or.jp",
];

/// Get the registrable domain (eTLD+1) for a normalized hostname.
///
/// Uses `suffixes` when given, otherwise a simple heuristic. A host that is
/// itself a public suffix is returned unchanged.
pub fn registrable_domain(host: &str, suffixes: Option<&SuffixList>) -> String {
    match suffixes {
        Some(list) => list.registrable_domain(host).unwrap_or(host).to_string(),
        None => {
            let labels: Vec<&str> = host.split('.').collect();
            fallback_etld1(&labels)
        }
    }
}

/// Fallback eTLD+1 heuristic.
fn fallback_etld1(labels: &[&str]) -> String {
    let n = labels.len();
    if n <= 2 {
        return labels.join(".");
    }

    // Check for common two-part TLDs
    let last_two = format!("{}.{}", labels[n - 2], labels[n - 1]);
    if COMMON_TWO_PART_TLDS.contains(&last_two.as_str()) {
        return labels[n - 3..].join(".");
    }

    // Default: last 2 labels
    labels[n - 2..].join(".")
}
