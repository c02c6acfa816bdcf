use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use sieve_compiler::{parse_rules, read_rules};
use sieve_core::{Rule, RuleFlavor, SuffixList, UrlResolver};

/// Rule set compiled into the binary, used when no rule file is given.
pub const DEFAULT_RULES: &str = include_str!("../rules/default-urlfilter.txt");

/// Where the rule text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    File(PathBuf),
    Builtin,
}

impl RuleSource {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Builtin,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Builtin => "<builtin>".to_string(),
        }
    }

    /// The raw rule text.
    pub fn read_text(&self) -> Result<String, String> {
        match self {
            Self::File(path) => std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {}", path.display(), e)),
            Self::Builtin => Ok(DEFAULT_RULES.to_string()),
        }
    }

    /// Parse and compile the rules.
    pub fn load(&self, flavor: RuleFlavor) -> Result<Vec<Rule>, String> {
        let rules = match self {
            Self::File(path) => {
                let file = File::open(path)
                    .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
                read_rules(BufReader::new(file), flavor)
                    .map_err(|e| format!("Invalid rules in '{}': {}", self.name(), e))?
            }
            Self::Builtin => self.compile(DEFAULT_RULES, flavor)?,
        };

        log::debug!("Loaded {} rules from {} ({} flavor)", rules.len(), self.name(), flavor);
        Ok(rules)
    }

    /// Compile rule text already read from this source.
    pub fn compile(&self, text: &str, flavor: RuleFlavor) -> Result<Vec<Rule>, String> {
        parse_rules(text, flavor).map_err(|e| format!("Invalid rules in '{}': {}", self.name(), e))
    }
}

/// Build the host/domain resolver, optionally backed by a suffix list file.
pub fn load_resolver(suffix_list: Option<&Path>) -> Result<UrlResolver, String> {
    match suffix_list {
        Some(path) => {
            let list = SuffixList::load(path)
                .map_err(|e| format!("Failed to load suffix list '{}': {}", path.display(), e))?;
            Ok(UrlResolver::with_suffix_list(list))
        }
        None => Ok(UrlResolver::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use sieve_core::FilterEngine;

    #[test]
    fn test_builtin_rules_compile() {
        let rules = RuleSource::Builtin.load(RuleFlavor::Basic).unwrap();
        let engine = FilterEngine::new(rules);
        assert!(engine.decide("http://example.com/index.html", None));
        assert!(!engine.decide("http://example.com/logo.PNG", None));
        assert!(!engine.decide("http://example.com/search?q=x", None));
        assert!(!engine.decide("mailto:someone@example.com", None));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">shop.example.com\n+/cart\n<\n-.*").unwrap();

        let source = RuleSource::from_arg(Some(file.path().to_path_buf()));
        let rules = source.load(RuleFlavor::Basic).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(source.read_text().unwrap().lines().count(), 4);
    }

    #[test]
    fn test_compile_text_read_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "+a\n-b").unwrap();

        let source = RuleSource::File(file.path().to_path_buf());
        let text = source.read_text().unwrap();
        let rules = source.compile(&text, RuleFlavor::Basic).unwrap();
        assert_eq!(rules.len(), 2);

        let err = source.compile("?bad\n", RuleFlavor::Basic).unwrap_err();
        assert!(err.contains("?bad"));
    }

    #[test]
    fn test_load_reports_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "+ok\n*foo").unwrap();

        let err = RuleSource::File(file.path().to_path_buf())
            .load(RuleFlavor::Basic)
            .unwrap_err();
        assert!(err.contains("*foo"));
        assert!(err.starts_with("Invalid rules in"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleSource::File(dir.path().join("missing.txt"))
            .load(RuleFlavor::Basic)
            .unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }

    #[test]
    fn test_load_resolver_with_suffix_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "com\nblogspot.com").unwrap();

        let resolver = load_resolver(Some(file.path())).unwrap();
        assert_eq!(resolver.suffix_list().map(SuffixList::len), Some(2));
        assert!(load_resolver(None).unwrap().suffix_list().is_none());
    }
}
