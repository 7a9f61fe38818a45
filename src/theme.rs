//! Static theme builder: the resolve → parse → compile pipeline.

use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::compiler::{compile, Contributions};
use crate::error::Result;
use crate::index::RuleIndex;
use crate::palette::Palette;
use crate::parser::{self, Section};
use crate::resolver::DomainResolver;

/// A loaded rule database: raw rule text, its index, and a resolver
/// built once over it. Immutable after construction; [`build`] is a
/// pure function of its inputs, so concurrent callers need no
/// coordination.
///
/// [`build`]: StaticTheme::build
pub struct StaticTheme {
    raw: String,
    index: RuleIndex,
    resolver: DomainResolver,
    /// Parsed sections, memoized by index. Write-once per key:
    /// recomputation is idempotent, so a race costs a duplicate parse
    /// and nothing else.
    sections: RwLock<AHashMap<usize, Arc<Section>>>,
}

impl StaticTheme {
    /// Load a theme from rule text and its index, validating the
    /// offsets table against the text up front.
    pub fn new(raw: impl Into<String>, index: RuleIndex) -> Result<Self> {
        let raw = raw.into();
        index.validate(raw.len())?;
        let resolver = DomainResolver::new(&index)?;
        Ok(Self {
            raw,
            index,
            resolver,
            sections: RwLock::new(AHashMap::new()),
        })
    }

    /// The rule index this theme was loaded with.
    pub fn index(&self) -> &RuleIndex {
        &self.index
    }

    /// The raw rule text this theme was loaded with.
    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    fn section(&self, index: usize) -> Result<Arc<Section>> {
        if let Some(section) = self.sections.read().get(&index) {
            return Ok(Arc::clone(section));
        }
        let parsed = Arc::new(parser::parse_section(
            &self.raw,
            self.index.offsets(),
            index,
        )?);
        let mut sections = self.sections.write();
        Ok(Arc::clone(sections.entry(index).or_insert(parsed)))
    }

    /// Compile the stylesheet for a URL.
    ///
    /// A URL matching nothing beyond the generic section compiles to
    /// exactly the generic section's output. Fails only on a corrupt
    /// database (offset or parse errors), never on an unmatched host.
    pub fn build(&self, palette: &Palette, url: &str, is_top_frame: bool) -> Result<String> {
        let resolution = self.resolver.resolve(url);

        let generic = self.section(resolution.generic)?;
        let exact = match resolution.exact {
            Some(index) => Some(self.section(index)?),
            None => None,
        };

        let contributions = Contributions {
            generic: Some(generic.directives()),
            exact: exact.as_deref().map(Section::directives),
            cache_fix: resolution.cache_fix.map(|fix| &fix.directives),
        };

        Ok(compile(&contributions, palette, is_top_frame))
    }
}

/// One-shot form of the pipeline: load, resolve, parse, compile.
///
/// Equivalent to [`StaticTheme::new`] followed by [`StaticTheme::build`];
/// callers compiling repeatedly should hold a [`StaticTheme`] instead so
/// parsed sections are reused.
pub fn build_stylesheet(
    palette: &Palette,
    url: &str,
    is_top_frame: bool,
    raw: &str,
    index: &RuleIndex,
) -> Result<String> {
    let theme = StaticTheme::new(raw, index.clone())?;
    theme.build(palette, url, is_top_frame)
}
