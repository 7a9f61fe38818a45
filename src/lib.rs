//! Sitefix - static site-fix rule compiler for page theming.
//!
//! Given a page URL and a compact, pre-shipped database of per-site
//! visual correction rules, this crate decides which rules apply and
//! compiles them into one stylesheet that recolors the page without
//! altering layout.
//!
//! # Features
//!
//! - **Compact rule database**: raw rule text plus a JSON index with a
//!   fixed-width base-36 offsets table
//! - **Domain resolution**: longest-suffix matching over registered
//!   domains, with an always-applied generic section
//! - **Embedded-site fast path**: precomputed fix bundles for known
//!   embedded hosts, matched by URL glob
//! - **Deterministic compilation**: a closed directive vocabulary
//!   rendered in fixed order from a caller-supplied palette
//! - **Pure core**: no I/O, no timers, no shared mutable state
//!
//! # Quick Start
//!
//! ```ignore
//! use sitefix::{build_stylesheet, Palette};
//!
//! // Compile against the bundled rule database
//! let css = build_stylesheet(&Palette::dark(), "https://github.com/", true)?;
//! ```
//!
//! # Custom Databases
//!
//! Load your own rule text and index with [`StaticTheme`]:
//!
//! ```ignore
//! use sitefix::{Palette, RuleIndex, StaticTheme};
//!
//! let index = RuleIndex::from_json(&index_json)?;
//! let theme = StaticTheme::new(rule_text, index)?;
//! let css = theme.build(&Palette::dark(), "https://example.com/", true)?;
//! ```
//!
//! The `sitefix-gen` binary regenerates an index from edited rule text.
//!
//! # Resolution Priority
//!
//! Contributions merge lowest priority first, appending per category:
//! 1. The generic section (always)
//! 2. The longest-suffix domain section (if registered)
//! 3. The embedded-site fix bundle (if host and URL pattern match)

mod compiler;
mod directive;
mod error;
mod global;
mod palette;
mod resolver;

pub mod index;
pub mod parser;
pub mod session;
pub mod theme;

// Re-export core types
pub use compiler::{compile, Contributions, FADE_ALPHA};
pub use directive::{Directive, ALL_DIRECTIVES};
pub use error::{Error, Result};
pub use palette::{contrast_ratio, Color, Hue, Palette};
pub use resolver::{host_of, DomainResolver, Resolution};
pub use theme::StaticTheme;

// Re-export index types
pub use index::{RuleIndex, SiteFix, GENERIC_LABEL};

// Re-export section parsing
pub use parser::{Section, SECTION_SEPARATOR};

// Re-export bundled-database API
pub use global::{build_stylesheet, bundled_theme, BUNDLED_INDEX, BUNDLED_RULES};

// Re-export session orchestration
pub use session::{ColorScheme, StyleSink, ThemeSession, STYLE_ID};
