//! Rule compilation: merge resolved contributions into one stylesheet.

use ahash::AHashMap;

use crate::directive::{Directive, ALL_DIRECTIVES};
use crate::palette::{Hue, Palette};

/// Opacity used by FADE BG / FADE TEXT declarations.
pub const FADE_ALPHA: f64 = 0.5;

/// Directive maps contributing to one compilation, lowest priority
/// first: generic, then exact-domain, then cache fix.
#[derive(Debug, Default)]
pub struct Contributions<'a> {
    pub generic: Option<&'a AHashMap<Directive, Vec<String>>>,
    pub exact: Option<&'a AHashMap<Directive, Vec<String>>>,
    pub cache_fix: Option<&'a AHashMap<Directive, Vec<String>>>,
}

/// Compile contributions into stylesheet text.
///
/// Merging appends each contributor's selectors onto the running list
/// per category, never replacing; duplicates across contributors are
/// kept. Output is byte-identical for identical inputs: blocks are
/// emitted in the fixed vocabulary order, selectors in merge order.
///
/// When `is_top_frame` is false, chrome directives (FADE BG, NO IMAGE)
/// from the generic contribution are dropped for root-level selectors:
/// an embedded page must not repaint ambient chrome the enclosing page
/// already controls. Component selectors from the exact and cache-fix
/// contributions are untouched.
pub fn compile(contributions: &Contributions<'_>, palette: &Palette, is_top_frame: bool) -> String {
    let mut merged: AHashMap<Directive, Vec<&str>> = AHashMap::new();

    if let Some(generic) = contributions.generic {
        for (&directive, selectors) in generic {
            let list = merged.entry(directive).or_default();
            for selector in selectors {
                if !is_top_frame && directive.is_chrome() && is_root_selector(selector) {
                    continue;
                }
                list.push(selector.as_str());
            }
        }
    }
    for contribution in [contributions.exact, contributions.cache_fix]
        .into_iter()
        .flatten()
    {
        for (&directive, selectors) in contribution {
            merged
                .entry(directive)
                .or_default()
                .extend(selectors.iter().map(String::as_str));
        }
    }

    let mut css = String::new();
    for directive in ALL_DIRECTIVES {
        let selectors = match merged.get(&directive) {
            Some(s) if !s.is_empty() => s,
            _ => continue,
        };
        if !css.is_empty() {
            css.push('\n');
        }
        css.push_str(&selectors.join(",\n"));
        css.push_str(" {\n");
        for declaration in declarations(directive, palette) {
            css.push_str("    ");
            css.push_str(&declaration);
            css.push('\n');
        }
        css.push_str("}\n");
    }
    css
}

/// Concrete declarations for a category. Exhaustive over the
/// vocabulary: adding a directive without a rendering is a compile
/// error, not a silently skipped branch.
fn declarations(directive: Directive, palette: &Palette) -> Vec<String> {
    let text = |color: crate::palette::Color| vec![format!("color: {} !important;", color)];
    let bg = |color: crate::palette::Color| {
        vec![format!("background-color: {} !important;", color)]
    };

    match directive {
        Directive::NeutralBg => bg(palette.background),
        Directive::NeutralText => text(palette.text),
        Directive::RedText => text(palette.accent(Hue::Red)),
        Directive::RedTextActive => text(palette.accent_active(Hue::Red)),
        Directive::GreenText => text(palette.accent(Hue::Green)),
        Directive::GreenTextActive => text(palette.accent_active(Hue::Green)),
        Directive::BlueText => text(palette.accent(Hue::Blue)),
        Directive::BlueTextActive => text(palette.accent_active(Hue::Blue)),
        Directive::RedBg => bg(palette.accent(Hue::Red)),
        Directive::RedBgActive => bg(palette.accent_active(Hue::Red)),
        Directive::GreenBg => bg(palette.accent(Hue::Green)),
        Directive::GreenBgActive => bg(palette.accent_active(Hue::Green)),
        Directive::BlueBg => bg(palette.accent(Hue::Blue)),
        Directive::BlueBgActive => bg(palette.accent_active(Hue::Blue)),
        Directive::BlueBorder => vec![format!(
            "border-color: {} !important;",
            palette.accent(Hue::Blue)
        )],
        Directive::TransparentBg => vec![
            "background-color: transparent !important;".to_string(),
            "background-image: none !important;".to_string(),
        ],
        Directive::FadeBg => vec![format!(
            "background-color: {} !important;",
            palette.background.rgba(FADE_ALPHA)
        )],
        Directive::FadeText => vec![format!(
            "color: {} !important;",
            palette.text.rgba(FADE_ALPHA)
        )],
        Directive::NoImage => vec!["background-image: none !important;".to_string()],
    }
}

/// Whether a selector targets the page root: a single compound on
/// `html`, `body`, or `:root`, with optional attached pseudo-classes,
/// classes, or attributes, and no descendant tail.
fn is_root_selector(selector: &str) -> bool {
    let selector = selector.trim();
    if selector
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '>' | '+' | '~'))
    {
        return false;
    }
    for base in ["html", "body", ":root"] {
        if let Some(rest) = selector.strip_prefix(base) {
            if rest.is_empty() || rest.starts_with(&[':', '.', '#', '['][..]) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(Directive, &[&str])]) -> AHashMap<Directive, Vec<String>> {
        let mut out = AHashMap::new();
        for (directive, selectors) in entries {
            out.insert(
                *directive,
                selectors.iter().map(|s| s.to_string()).collect(),
            );
        }
        out
    }

    #[test]
    fn test_append_priority_order() {
        let generic = map(&[(Directive::RedText, &["h1", "h2"])]);
        let exact = map(&[(Directive::RedText, &[".pl-k", "h1"])]);

        let css = compile(
            &Contributions {
                generic: Some(&generic),
                exact: Some(&exact),
                cache_fix: None,
            },
            &Palette::dark(),
            true,
        );

        // generic selectors first, domain selectors appended, duplicate kept
        let expected_order = "h1,\nh2,\n.pl-k,\nh1 {";
        assert!(css.contains(expected_order), "got:\n{}", css);
    }

    #[test]
    fn test_emission_follows_vocabulary_order() {
        let generic = map(&[
            (Directive::NoImage, &["input"]),
            (Directive::NeutralBg, &["html"]),
            (Directive::BlueText, &["a"]),
        ]);
        let css = compile(
            &Contributions {
                generic: Some(&generic),
                ..Default::default()
            },
            &Palette::dark(),
            true,
        );

        let bg = css.find("background-color").unwrap();
        let blue = css.find("a {").unwrap();
        let image = css.find("background-image: none").unwrap();
        assert!(bg < blue && blue < image, "got:\n{}", css);
    }

    #[test]
    fn test_deterministic_output() {
        let generic = map(&[
            (Directive::NeutralBg, &["html", "body"]),
            (Directive::FadeText, &["input::placeholder"]),
        ]);
        let contributions = Contributions {
            generic: Some(&generic),
            ..Default::default()
        };
        let palette = Palette::dark();
        let first = compile(&contributions, &palette, true);
        for _ in 0..16 {
            assert_eq!(compile(&contributions, &palette, true), first);
        }
    }

    #[test]
    fn test_embedded_frame_drops_root_chrome() {
        let generic = map(&[
            (Directive::FadeBg, &["body", ".sr-backdrop"]),
            (Directive::NoImage, &["html"]),
            (Directive::NeutralBg, &["body"]),
        ]);
        let contributions = Contributions {
            generic: Some(&generic),
            ..Default::default()
        };
        let palette = Palette::dark();

        let top = compile(&contributions, &palette, true);
        assert!(top.contains("body,\n.sr-backdrop {"));
        assert!(top.contains("html {"));

        let embedded = compile(&contributions, &palette, false);
        // root chrome gone, component chrome and root non-chrome remain
        assert!(!embedded.contains("body,\n.sr-backdrop"));
        assert!(embedded.contains(".sr-backdrop {"));
        assert!(!embedded.contains("html {"));
        assert!(embedded.contains("body {"), "got:\n{}", embedded);
    }

    #[test]
    fn test_embedded_frame_keeps_domain_chrome() {
        let exact = map(&[(Directive::NoImage, &[".btn"])]);
        let css = compile(
            &Contributions {
                exact: Some(&exact),
                ..Default::default()
            },
            &Palette::dark(),
            false,
        );
        assert!(css.contains(".btn {"));
    }

    #[test]
    fn test_transparent_bg_declarations() {
        let generic = map(&[(Directive::TransparentBg, &[".overlay"])]);
        let css = compile(
            &Contributions {
                generic: Some(&generic),
                ..Default::default()
            },
            &Palette::dark(),
            true,
        );
        assert!(css.contains("background-color: transparent !important;"));
        assert!(css.contains("background-image: none !important;"));
    }

    #[test]
    fn test_active_variant_differs_from_plain() {
        let generic = map(&[
            (Directive::BlueText, &["a"]),
            (Directive::BlueTextActive, &["a:hover"]),
        ]);
        let css = compile(
            &Contributions {
                generic: Some(&generic),
                ..Default::default()
            },
            &Palette::dark(),
            true,
        );
        let palette = Palette::dark();
        assert!(css.contains(&format!("color: {} !important;", palette.accent(Hue::Blue))));
        assert!(css.contains(&format!(
            "color: {} !important;",
            palette.accent_active(Hue::Blue)
        )));
    }

    #[test]
    fn test_root_selector_detection() {
        assert!(is_root_selector("html"));
        assert!(is_root_selector("body"));
        assert!(is_root_selector(":root"));
        assert!(is_root_selector("body:not(.x)"));
        assert!(is_root_selector("html[dir=\"rtl\"]"));
        assert!(!is_root_selector("body .content"));
        assert!(!is_root_selector("body > div"));
        assert!(!is_root_selector(".body"));
        assert!(!is_root_selector("div:empty"));
        assert!(!is_root_selector("*"));
    }

    #[test]
    fn test_empty_contributions_compile_to_empty() {
        let css = compile(&Contributions::default(), &Palette::dark(), true);
        assert!(css.is_empty());
    }
}
