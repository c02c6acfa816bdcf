//! Core Decision Engine
//!
//! Every candidate URL goes through here. Rules are tried in file order and
//! the first in-scope rule whose pattern matches decides; a URL no rule
//! matches is rejected.

use crate::resolver::{HostResolver, UrlResolver};
use crate::types::{MatchResult, Rule};

// =============================================================================
// FilterEngine
// =============================================================================

/// The URL decision engine. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct FilterEngine<R = UrlResolver> {
    rules: Vec<Rule>,
    resolver: R,
}

impl FilterEngine<UrlResolver> {
    /// Create a new engine with the default URL resolver.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self::with_resolver(rules, UrlResolver::new())
    }
}

impl<R: HostResolver> FilterEngine<R> {
    /// Create a new engine with a custom host/domain resolver.
    pub fn with_resolver(rules: Vec<Rule>, resolver: R) -> Self {
        log::debug!("Filter engine initialized with {} rules", rules.len());
        Self { rules, resolver }
    }

    /// Should this URL be accepted?
    ///
    /// `parent_url` is the page the URL was discovered on. It does not take
    /// part in the decision.
    #[inline]
    pub fn decide(&self, url: &str, _parent_url: Option<&str>) -> bool {
        self.evaluate(url).accepted
    }

    /// Evaluate a URL and report which rule decided it.
    pub fn evaluate(&self, url: &str) -> MatchResult {
        let host = self.resolver.host(url);
        let domain = match self.resolver.domain_name(url) {
            Ok(domain) => Some(domain),
            Err(e) => {
                log::debug!("{}; scoping by host only", e);
                None
            }
        };

        log::debug!("URL belongs to host {:?} and domain {:?}", host, domain);

        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.applies_to(host.as_deref(), domain.as_deref()) {
                log::trace!(
                    "Skipping rule [{}] for host: {}",
                    rule.pattern,
                    rule.scope.as_deref().unwrap_or_default()
                );
                continue;
            }

            log::trace!(
                "Applying rule [{}] for host: {:?} and domain {:?}",
                rule.pattern,
                host,
                domain
            );

            if rule.matches(url) {
                return MatchResult::from_rule(index, rule);
            }
        }

        MatchResult::default_reject()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}
