//! Integration tests over the bundled rule database.

use sitefix::index::encode_offsets;
use sitefix::{
    build_stylesheet, bundled_theme, parser, Directive, Error, Palette, RuleIndex, StaticTheme,
};

fn index_json(offsets: &str, domains: &str) -> String {
    format!(
        r#"{{
            "offsets": "{}",
            "domains": {{{}}},
            "domainLabels": {{"*": 0}},
            "nonstandard": [],
            "cacheDomainIndex": {{}},
            "cacheSiteFix": {{}},
            "cacheCleanupTimer": 13
        }}"#,
        offsets, domains
    )
}

#[test]
fn test_bundled_determinism() {
    let palette = Palette::dark();
    let first = build_stylesheet(&palette, "https://github.com/", true).unwrap();
    for _ in 0..8 {
        assert_eq!(
            build_stylesheet(&palette, "https://github.com/", true).unwrap(),
            first
        );
    }
}

#[test]
fn test_bundled_generic_only_fallback() {
    let palette = Palette::dark();
    let unmatched = build_stylesheet(&palette, "https://unknown-site.test/", true).unwrap();
    let matched = build_stylesheet(&palette, "https://github.com/", true).unwrap();

    assert!(unmatched.contains("html,\nbody"));
    assert!(!unmatched.contains(".pl-k"));
    assert_ne!(unmatched, matched);

    // every registered domain resolves away from the generic baseline
    for url in [
        "https://www.youtube.com/watch",
        "https://old.reddit.com/r/rust",
        "https://mail.google.com/mail",
    ] {
        assert_ne!(build_stylesheet(&palette, url, true).unwrap(), unmatched);
    }
}

#[test]
fn test_bundled_github_end_to_end() {
    let palette = Palette::dark();
    let css = build_stylesheet(&palette, "https://github.com/rust-lang/rust", true).unwrap();

    // RED TEXT: generic headings first, then the domain's .pl-k, one block
    let red = format!(
        "h6:not([style*=\"color:\"]),\n.pl-k {{\n    color: {} !important;\n}}",
        palette.accent(sitefix::Hue::Red)
    );
    assert!(css.contains(&red), "missing red text block in:\n{}", css);

    // NO IMAGE covers the domain's buttons
    assert!(css.contains(".btn,\n.btn-primary {"));
    let no_image_pos = css.find(".btn,\n.btn-primary {").unwrap();
    assert!(css[no_image_pos..].starts_with(
        ".btn,\n.btn-primary {"
    ) && css[no_image_pos..].contains("background-image: none !important;"));

    // generic baseline background on the universal selector set
    let neutral = format!(
        "html,\nbody,\n:not([style*=\"background-color:\"]):not(iframe) {{\n    background-color: {} !important;\n}}",
        palette.background
    );
    assert!(css.contains(&neutral), "missing neutral bg block in:\n{}", css);
}

#[test]
fn test_bundled_subdomain_resolves_by_suffix() {
    let palette = Palette::dark();
    let apex = build_stylesheet(&palette, "https://youtube.com/", true).unwrap();
    let www = build_stylesheet(&palette, "https://www.youtube.com/", true).unwrap();
    assert_eq!(apex, www);
    assert!(www.contains(".ytp-swatch-background-color"));
}

#[test]
fn test_bundled_cache_fix_for_embedded_bing() {
    let palette = Palette::dark();
    let generic = build_stylesheet(&palette, "https://unknown-site.test/", true).unwrap();
    let bing = build_stylesheet(&palette, "https://www.bing.com/search?q=rust", true).unwrap();

    // the fix appends html/body again under NEUTRAL BG
    assert_ne!(bing, generic);
    assert!(bing.contains(":not(iframe),\nhtml,\nbody {"), "got:\n{}", bing);
}

#[test]
fn test_bundled_offsets_round_trip() {
    let theme = bundled_theme();
    let offsets = theme.index().offsets();

    assert_eq!(*offsets.last().unwrap(), theme.raw_text().len());

    let sections = parser::parse_all(theme.raw_text(), offsets).unwrap();
    assert_eq!(sections.len(), theme.index().section_count());
    for (i, section) in sections.iter().enumerate() {
        assert_eq!(section.start, offsets[i], "section {} start drifted", i);
    }

    // the index references sections that really exist and carry rules
    for (domain, section) in theme.index().domains() {
        assert_eq!(sections[section].heading, domain);
        assert!(!sections[section].directives().is_empty());
    }
}

#[test]
fn test_longest_suffix_precedence() {
    let raw = "*\n\nNEUTRAL BG\nhtml\n\n\
================================\n\n\
example.com\n\nRED TEXT\n.apex\n\n\
================================\n\n\
b.example.com\n\nRED TEXT\n.deep\n";
    let offsets = vec![
        0,
        raw.find("example.com\n").unwrap(),
        raw.find("b.example.com").unwrap(),
        raw.len(),
    ];
    let json = index_json(
        &encode_offsets(&offsets).unwrap(),
        r#""example.com": 1, "b.example.com": 2"#,
    );
    let theme = StaticTheme::new(raw, RuleIndex::from_json(&json).unwrap()).unwrap();

    let palette = Palette::dark();
    let css = theme
        .build(&palette, "https://a.b.example.com/x", true)
        .unwrap();
    assert!(css.contains(".deep"));
    assert!(!css.contains(".apex"));

    let css = theme
        .build(&palette, "https://www.example.com/x", true)
        .unwrap();
    assert!(css.contains(".apex"));
    assert!(!css.contains(".deep"));
}

#[test]
fn test_top_frame_suppression() {
    let raw = "*\n\nFADE BG\nbody\n.overlay\n\nNEUTRAL BG\nbody\n";
    let json = index_json(&encode_offsets(&[0, raw.len()]).unwrap(), "");
    let theme = StaticTheme::new(raw, RuleIndex::from_json(&json).unwrap()).unwrap();
    let palette = Palette::dark();

    let top = theme.build(&palette, "https://a.test/", true).unwrap();
    assert!(top.contains("body,\n.overlay {"));

    let embedded = theme.build(&palette, "https://a.test/", false).unwrap();
    assert!(!embedded.contains("body,\n.overlay {"));
    assert!(embedded.contains(".overlay {"));
    // NEUTRAL BG on the same root selector survives
    assert!(embedded.contains("body {"), "got:\n{}", embedded);
}

#[test]
fn test_malformed_section_is_fatal() {
    let raw = "*\n\nNEUTRAL BG\nhtml\n\n\
================================\n\n\
broken.example\n\n.selector-before-header\n";
    let offsets = vec![0, raw.find("broken.example").unwrap(), raw.len()];
    let json = index_json(
        &encode_offsets(&offsets).unwrap(),
        r#""broken.example": 1"#,
    );
    let theme = StaticTheme::new(raw, RuleIndex::from_json(&json).unwrap()).unwrap();
    let palette = Palette::dark();

    // the generic section alone still compiles
    assert!(theme.build(&palette, "https://fine.test/", true).is_ok());

    // touching the broken section surfaces the parse error
    let err = theme
        .build(&palette, "https://broken.example/", true)
        .unwrap_err();
    assert!(matches!(err, Error::Parse { section: 1, .. }));
}

#[test]
fn test_unknown_directive_in_bundle_would_not_compile() {
    let raw = "*\n\nNEUTRAL BG\nhtml\n\nSPARKLE BG\n.banner\n";
    let json = index_json(&encode_offsets(&[0, raw.len()]).unwrap(), "");
    let theme = StaticTheme::new(raw, RuleIndex::from_json(&json).unwrap()).unwrap();
    let css = theme
        .build(&Palette::dark(), "https://a.test/", true)
        .unwrap();
    assert!(!css.contains(".banner"));
    assert!(css.contains("html"));
}

#[test]
fn test_bundled_sections_have_no_unknown_blocks() {
    let theme = bundled_theme();
    let sections = parser::parse_all(theme.raw_text(), theme.index().offsets()).unwrap();
    for section in &sections {
        assert!(
            section.unknown_blocks().is_empty(),
            "section {} has unknown blocks",
            section.index
        );
        assert!(section.directives().values().all(|s| !s.is_empty()));
    }
    let _ = sections
        .iter()
        .find(|s| s.selectors(Directive::NoImage).is_some())
        .expect("bundled data exercises NO IMAGE");
}
