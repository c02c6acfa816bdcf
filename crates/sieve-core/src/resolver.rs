//! Host and domain resolution for scoped rules
//!
//! The engine never parses URLs itself; it asks a [`HostResolver`] for the
//! host and registrable domain of each URL and compares them to rule scopes.

use std::net::IpAddr;

use crate::psl::{registrable_domain, SuffixList};
use crate::url::{extract_host, normalize_host};

/// Error returned when no domain can be derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed URL: {url}")]
pub struct MalformedUrl {
    pub url: String,
}

/// Host/domain capability supplied to the engine.
pub trait HostResolver {
    /// Normalized host of `url`, or None if it has no recognizable host.
    fn host(&self, url: &str) -> Option<String>;

    /// Registrable domain of the host of `url`.
    fn domain_name(&self, url: &str) -> Result<String, MalformedUrl>;
}

impl<R: HostResolver + ?Sized> HostResolver for &R {
    fn host(&self, url: &str) -> Option<String> {
        (**self).host(url)
    }

    fn domain_name(&self, url: &str) -> Result<String, MalformedUrl> {
        (**self).domain_name(url)
    }
}

/// Default resolver built on the slice-based URL parser.
#[derive(Debug, Clone, Default)]
pub struct UrlResolver {
    suffixes: Option<SuffixList>,
}

impl UrlResolver {
    /// Resolver using the built-in domain heuristic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver using a public suffix list for domain extraction.
    pub fn with_suffix_list(suffixes: SuffixList) -> Self {
        Self {
            suffixes: Some(suffixes),
        }
    }

    pub fn suffix_list(&self) -> Option<&SuffixList> {
        self.suffixes.as_ref()
    }
}

impl HostResolver for UrlResolver {
    fn host(&self, url: &str) -> Option<String> {
        extract_host(url).map(normalize_host)
    }

    fn domain_name(&self, url: &str) -> Result<String, MalformedUrl> {
        let host = self
            .host(url)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| MalformedUrl {
                url: url.to_string(),
            })?;

        // IP literals have no registrable domain
        if host.parse::<IpAddr>().is_ok() {
            return Ok(host);
        }

        Ok(registrable_domain(&host, self.suffixes.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_is_normalized() {
        let resolver = UrlResolver::new();
        assert_eq!(resolver.host("http://WWW.Example.COM./a").as_deref(), Some("www.example.com"));
        assert_eq!(resolver.host("not a url"), None);
    }

    #[test]
    fn test_domain_name() {
        let resolver = UrlResolver::new();
        assert_eq!(resolver.domain_name("http://news.example.com/a"), Ok("example.com".to_string()));
        assert_eq!(resolver.domain_name("https://a.b.example.co.uk/"), Ok("example.co.uk".to_string()));
    }

    #[test]
    fn test_domain_name_for_ip_hosts() {
        let resolver = UrlResolver::new();
        assert_eq!(resolver.domain_name("http://192.168.0.1/x"), Ok("192.168.0.1".to_string()));
        assert_eq!(resolver.domain_name("http://[::1]:8080/"), Ok("::1".to_string()));
    }

    #[test]
    fn test_domain_name_malformed() {
        let resolver = UrlResolver::new();
        let err = resolver.domain_name("not a url").unwrap_err();
        assert_eq!(err.url, "not a url");
        assert!(resolver.domain_name("file:///tmp/x").is_err());
        assert!(resolver.domain_name("http://./").is_err());
    }

    #[test]
    fn test_domain_name_uses_suffix_list() {
        let list = SuffixList::parse("com\nblogspot.com\n").unwrap();
        let resolver = UrlResolver::with_suffix_list(list);
        assert_eq!(
            resolver.domain_name("http://me.blogspot.com/post"),
            Ok("me.blogspot.com".to_string())
        );
        assert!(resolver.suffix_list().is_some());
    }
}
