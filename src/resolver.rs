//! Domain resolution: which sections and fixes contribute to a URL.

use ahash::AHashMap;
use regex::Regex;

use crate::error::Result;
use crate::index::{RuleIndex, SiteFix};

/// Contributions resolved for one URL.
///
/// `generic` is intrinsic to every call; `exact` and `cache_fix` are
/// independent of each other and both optional.
#[derive(Debug)]
pub struct Resolution<'a> {
    /// Section index of the always-applied generic section.
    pub generic: usize,
    /// Section index of the longest-suffix domain match, if any.
    pub exact: Option<usize>,
    /// Fix bundle for a known embedded-content host whose URL pattern
    /// matched, if any.
    pub cache_fix: Option<&'a SiteFix>,
}

struct CompiledFix {
    patterns: Vec<Regex>,
    fix: SiteFix,
}

/// Resolver built once over a rule index. Resolution is total: an
/// unmatched host yields the generic section alone.
pub struct DomainResolver {
    generic: usize,
    domains: AHashMap<String, usize>,
    cache: AHashMap<String, CompiledFix>,
}

impl DomainResolver {
    /// Build a resolver from the index, compiling every cache-fix URL
    /// pattern up front.
    pub fn new(index: &RuleIndex) -> Result<Self> {
        let generic = index.generic_section()?;

        let mut domains = AHashMap::new();
        for (domain, section) in index.domains() {
            domains.insert(domain.to_ascii_lowercase(), section);
        }

        let mut cache = AHashMap::new();
        for host in index.cache_hosts() {
            if let Some(fix) = index.site_fix_for_host(host) {
                let patterns = fix
                    .url_patterns
                    .iter()
                    .filter_map(|p| match compile_url_pattern(p) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            log::warn!("host {:?}: bad URL pattern {:?}: {}", host, p, e);
                            None
                        }
                    })
                    .collect();
                cache.insert(
                    host.to_ascii_lowercase(),
                    CompiledFix {
                        patterns,
                        fix: fix.clone(),
                    },
                );
            }
        }

        Ok(Self {
            generic,
            domains,
            cache,
        })
    }

    /// Resolve the contributions for a URL. Never fails.
    pub fn resolve<'a>(&'a self, url: &str) -> Resolution<'a> {
        let host = host_of(url).to_ascii_lowercase();

        Resolution {
            generic: self.generic,
            exact: self.match_suffix(&host),
            cache_fix: self.match_cache_fix(&host, url),
        }
    }

    /// Longest-suffix match against registered domains: try the host
    /// itself, then each parent suffix. Walking longest to shortest
    /// makes "most specific wins" a property of the walk.
    fn match_suffix(&self, host: &str) -> Option<usize> {
        if let Some(&section) = self.domains.get(host) {
            return Some(section);
        }

        let mut current = host;
        while let Some(pos) = current.find('.') {
            current = &current[pos + 1..];
            if let Some(&section) = self.domains.get(current) {
                return Some(section);
            }
        }

        None
    }

    /// Exact-host lookup in the embedded-site index, then the bundle's
    /// URL patterns against the full URL. An indexed host with no
    /// matching pattern contributes nothing.
    fn match_cache_fix<'a>(&'a self, host: &str, url: &str) -> Option<&'a SiteFix> {
        let compiled = self.cache.get(host)?;
        if compiled.patterns.iter().any(|re| re.is_match(url)) {
            Some(&compiled.fix)
        } else {
            None
        }
    }
}

/// Compile a URL glob into an anchored regex. `*` is the only
/// metacharacter and matches any run of characters.
fn compile_url_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    for (i, literal) in pattern.split('*').enumerate() {
        if i > 0 {
            source.push_str(".*");
        }
        source.push_str(&regex::escape(literal));
    }
    source.push('$');
    Regex::new(&source)
}

/// Extract the host from a URL string. Handles an optional scheme, an
/// IPv6 literal, a port, and path/query/fragment tails. No network, no
/// normalization beyond that.
pub fn host_of(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(pos) => &url[pos + 3..],
        None => url,
    };
    let authority = rest
        .split(&['/', '?', '#'][..])
        .next()
        .unwrap_or(rest);
    let authority = match authority.rfind('@') {
        Some(pos) => &authority[pos + 1..],
        None => authority,
    };
    if let Some(stripped) = authority.strip_prefix('[') {
        return match stripped.find(']') {
            Some(end) => &stripped[..end],
            None => stripped,
        };
    }
    match authority.find(':') {
        Some(pos) => &authority[..pos],
        None => authority,
    }
}
