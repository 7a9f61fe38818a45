//! Rule text section parser.
//!
//! The raw rule text is an ordered sequence of sections, located by
//! consecutive pairs from the decoded offsets table. Each section opens
//! with an informational heading line naming its domains (matching is
//! driven by the index, never by this line), followed by directive
//! blocks: a header line that exactly matches a category name, then
//! selector lines until the next header, a blank line, the separator
//! line, or the end of the section.

use ahash::AHashMap;

use crate::directive::Directive;
use crate::error::{Error, Result};

/// Literal line separating sections in the raw rule text.
pub const SECTION_SEPARATOR: &str = "================================";

/// One parsed section: the directive blocks of one domain grouping or
/// of the generic scope.
#[derive(Debug, Clone)]
pub struct Section {
    /// Position of this section in the rule text.
    pub index: usize,
    /// Byte offset at which the section's span begins.
    pub start: usize,
    /// Informational heading line (`*` for the generic section).
    pub heading: String,
    directives: AHashMap<Directive, Vec<String>>,
    unknown: Vec<(String, Vec<String>)>,
}

impl Section {
    /// Selector list for a category, in encountered order.
    pub fn selectors(&self, directive: Directive) -> Option<&[String]> {
        self.directives.get(&directive).map(Vec::as_slice)
    }

    /// All recognized directive blocks.
    pub fn directives(&self) -> &AHashMap<Directive, Vec<String>> {
        &self.directives
    }

    /// Well-formed blocks whose header named an unrecognized category.
    /// Parsed but never compiled.
    pub fn unknown_blocks(&self) -> &[(String, Vec<String>)] {
        &self.unknown
    }
}

/// Parse every section of the rule text.
pub fn parse_all(raw: &str, offsets: &[usize]) -> Result<Vec<Section>> {
    let sections = offsets.len().saturating_sub(1);
    (0..sections)
        .map(|index| parse_section(raw, offsets, index))
        .collect()
}

/// Parse the section at `index`. Observably identical to indexing the
/// result of [`parse_all`].
pub fn parse_section(raw: &str, offsets: &[usize], index: usize) -> Result<Section> {
    let sections = offsets.len().saturating_sub(1);
    if index >= sections {
        return Err(Error::SectionOutOfRange { index, sections });
    }

    let (start, end) = (offsets[index], offsets[index + 1]);
    let span = raw
        .get(start..end)
        .ok_or(Error::SectionSpan { index })?;

    let mut section = Section {
        index,
        start,
        heading: String::new(),
        directives: AHashMap::new(),
        unknown: Vec::new(),
    };

    enum Block {
        Known(Directive),
        Unknown(usize),
    }

    let mut seen_heading = false;
    let mut current: Option<Block> = None;

    for (line_no, line) in span.lines().enumerate() {
        let line_no = line_no + 1;

        if line.is_empty() {
            current = None;
            continue;
        }
        if line == SECTION_SEPARATOR {
            break;
        }
        if !seen_heading {
            seen_heading = true;
            section.heading = line.to_string();
            continue;
        }

        if let Some(directive) = Directive::parse(line) {
            section.directives.entry(directive).or_default();
            current = Some(Block::Known(directive));
            continue;
        }
        if is_header_shaped(line) {
            log::warn!(
                "section {}: unknown directive header {:?}, block will not compile",
                index,
                line
            );
            section.unknown.push((line.to_string(), Vec::new()));
            current = Some(Block::Unknown(section.unknown.len() - 1));
            continue;
        }

        match current {
            Some(Block::Known(directive)) => {
                section
                    .directives
                    .entry(directive)
                    .or_default()
                    .push(line.to_string());
            }
            Some(Block::Unknown(slot)) => {
                section.unknown[slot].1.push(line.to_string());
            }
            None => {
                return Err(Error::Parse {
                    section: index,
                    line: line_no,
                });
            }
        }
    }

    Ok(section)
}

/// A header candidate: uppercase words only. Selectors always carry
/// lowercase letters or CSS punctuation, so this separates "unknown
/// category" from "selector with no header".
fn is_header_shaped(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ')
}
