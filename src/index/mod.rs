//! Rule index: decoded section offsets plus domain, label, and
//! embedded-site lookups.
//!
//! The index ships as JSON alongside the raw rule text. It is decoded
//! once at load and never mutated; every lookup is total, with absence
//! as a normal outcome.

mod offsets;

pub use offsets::{decode_offsets, encode_offsets, TOKEN_WIDTH};

use ahash::AHashMap;
use serde::Deserialize;

use crate::directive::Directive;
use crate::error::{Error, Result};

/// Wildcard label of the always-applied generic section.
pub const GENERIC_LABEL: &str = "*";

/// A precomputed fix bundle for a known embedded-content host,
/// independent of the raw rule text.
#[derive(Debug, Clone)]
pub struct SiteFix {
    /// URL glob patterns; the fix applies only when one matches the
    /// full URL.
    pub url_patterns: Vec<String>,
    /// Directive category to ordered selector list.
    pub directives: AHashMap<Directive, Vec<String>>,
}

#[derive(Deserialize)]
struct RawSiteFix {
    url: Vec<String>,
    directives: AHashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndex {
    offsets: String,
    domains: AHashMap<String, usize>,
    domain_labels: AHashMap<String, usize>,
    #[serde(default)]
    nonstandard: Vec<serde_json::Value>,
    cache_domain_index: AHashMap<String, String>,
    cache_site_fix: AHashMap<String, RawSiteFix>,
    cache_cleanup_timer: u64,
}

/// Immutable rule database index.
#[derive(Debug, Clone)]
pub struct RuleIndex {
    /// Decoded section start positions, with the trailing end-sentinel.
    offsets: Vec<usize>,
    domains: AHashMap<String, usize>,
    domain_labels: AHashMap<String, usize>,
    /// Reserved ad-hoc override list. Carried as an extension point;
    /// imposes no behavior today.
    #[allow(dead_code)]
    nonstandard: Vec<serde_json::Value>,
    cache_domain_index: AHashMap<String, String>,
    cache_site_fix: AHashMap<String, SiteFix>,
    cache_cleanup_timer: u64,
}

impl RuleIndex {
    /// Load an index from its JSON form, decoding the offsets table.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawIndex = serde_json::from_str(json)?;
        let offsets = offsets::decode_offsets(&raw.offsets)?;

        let mut cache_site_fix = AHashMap::with_capacity(raw.cache_site_fix.len());
        for (id, fix) in raw.cache_site_fix {
            let mut directives = AHashMap::with_capacity(fix.directives.len());
            for (name, selectors) in fix.directives {
                match Directive::parse(&name) {
                    Some(directive) => {
                        directives.insert(directive, selectors);
                    }
                    None => {
                        log::warn!("site fix {:?}: unknown directive {:?}, skipping", id, name);
                    }
                }
            }
            cache_site_fix.insert(
                id,
                SiteFix {
                    url_patterns: fix.url,
                    directives,
                },
            );
        }

        Ok(Self {
            offsets,
            domains: raw.domains,
            domain_labels: raw.domain_labels,
            nonstandard: raw.nonstandard,
            cache_domain_index: raw.cache_domain_index,
            cache_site_fix,
            cache_cleanup_timer: raw.cache_cleanup_timer,
        })
    }

    /// Decoded section start positions, including the end-sentinel.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of sections covered by the offsets table.
    pub fn section_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Section index registered for an exact domain key.
    pub fn section_for_domain(&self, domain: &str) -> Option<usize> {
        self.domains.get(domain).copied()
    }

    /// Section index registered for a wildcard label.
    pub fn section_for_label(&self, label: &str) -> Option<usize> {
        self.domain_labels.get(label).copied()
    }

    /// Section index of the always-applied generic section.
    pub fn generic_section(&self) -> Result<usize> {
        self.section_for_label(GENERIC_LABEL)
            .ok_or(Error::MissingGenericLabel)
    }

    /// Registered domain keys, for building a resolver.
    pub fn domains(&self) -> impl Iterator<Item = (&str, usize)> {
        self.domains.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Hosts registered in the embedded-site index.
    pub fn cache_hosts(&self) -> impl Iterator<Item = &str> {
        self.cache_domain_index.keys().map(String::as_str)
    }

    /// Fix identifier for a known embedded-content host.
    pub fn fix_id_for_host(&self, host: &str) -> Option<&str> {
        self.cache_domain_index.get(host).map(String::as_str)
    }

    /// Fix bundle by identifier.
    pub fn site_fix(&self, id: &str) -> Option<&SiteFix> {
        self.cache_site_fix.get(id)
    }

    /// Fix bundle for a host, if the host is indexed.
    pub fn site_fix_for_host(&self, host: &str) -> Option<&SiteFix> {
        self.fix_id_for_host(host).and_then(|id| self.site_fix(id))
    }

    /// Re-invoke policy interval, in seconds. Consumed by the embedding
    /// orchestration layer; this crate schedules nothing.
    pub fn cache_cleanup_timer(&self) -> u64 {
        self.cache_cleanup_timer
    }

    /// Validate the index against the raw rule text it describes:
    /// the sentinel must equal the text length and every referenced
    /// section must be covered by the offsets table.
    pub fn validate(&self, raw_len: usize) -> Result<()> {
        let sections = self.section_count();

        match self.offsets.last() {
            Some(&sentinel) if sentinel == raw_len => {}
            Some(&sentinel) => {
                return Err(Error::OffsetSentinel {
                    sentinel,
                    text_len: raw_len,
                })
            }
            None => {
                return Err(Error::OffsetSentinel {
                    sentinel: 0,
                    text_len: raw_len,
                })
            }
        }

        self.generic_section()?;

        for (domain, index) in self.domains.iter().map(|(k, &v)| (k.as_str(), v)) {
            if index >= sections {
                log::error!("domain {:?} references missing section {}", domain, index);
                return Err(Error::SectionOutOfRange { index, sections });
            }
        }
        for (&index, label) in self.domain_labels.iter().map(|(k, v)| (v, k)) {
            if index >= sections {
                log::error!("label {:?} references missing section {}", label, index);
                return Err(Error::SectionOutOfRange { index, sections });
            }
        }

        Ok(())
    }
}
