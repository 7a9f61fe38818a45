//! Bundled rule database and process-wide access.

use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::error::Result;
use crate::index::RuleIndex;
use crate::palette::Palette;
use crate::theme::StaticTheme;

/// Raw rule text shipped with the crate.
pub const BUNDLED_RULES: &str = include_str!("../data/static-rules.txt");

/// JSON rule index shipped with the crate, kept in sync with
/// [`BUNDLED_RULES`] by `sitefix-gen`.
pub const BUNDLED_INDEX: &str = include_str!("../data/static-index.json");

static BUNDLED: Lazy<Arc<StaticTheme>> = Lazy::new(|| {
    let index = RuleIndex::from_json(BUNDLED_INDEX).expect("bundled index parses");
    let theme = StaticTheme::new(BUNDLED_RULES, index).expect("bundled index matches rule text");
    Arc::new(theme)
});

/// The bundled theme, loaded once for the process lifetime.
///
/// The bundled data is validated by this crate's tests; a corrupt bundle
/// is a packaging defect and panics at first use.
pub fn bundled_theme() -> Arc<StaticTheme> {
    Arc::clone(&BUNDLED)
}

/// Compile a stylesheet for `url` against the bundled database.
pub fn build_stylesheet(palette: &Palette, url: &str, is_top_frame: bool) -> Result<String> {
    bundled_theme().build(palette, url, is_top_frame)
}
