//! Directive category definitions.

use std::fmt;

/// Directive represents one kind of visual correction.
///
/// The vocabulary is closed: rule text headers must match one of these
/// names exactly (case and whitespace included). Unknown headers parse
/// into an unrecognized block that is excluded from compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Force background to the palette background color
    NeutralBg,
    /// Force text color to the palette text color
    NeutralText,
    /// Force text color to the red accent
    RedText,
    /// Force text color to the brightened red accent (interactive elements)
    RedTextActive,
    /// Force text color to the green accent
    GreenText,
    /// Force text color to the brightened green accent
    GreenTextActive,
    /// Force text color to the blue accent
    BlueText,
    /// Force text color to the brightened blue accent
    BlueTextActive,
    /// Force background to the red accent
    RedBg,
    /// Force background to the brightened red accent
    RedBgActive,
    /// Force background to the green accent
    GreenBg,
    /// Force background to the brightened green accent
    GreenBgActive,
    /// Force background to the blue accent
    BlueBg,
    /// Force background to the brightened blue accent
    BlueBgActive,
    /// Force border color to the blue accent
    BlueBorder,
    /// Fully transparent background with any background image removed
    TransparentBg,
    /// Background at reduced opacity, de-emphasizing decorative chrome
    FadeBg,
    /// Text at reduced opacity
    FadeText,
    /// Background image removed, color untouched
    NoImage,
}

/// Emission order for compiled rule blocks. Compilation walks this table
/// top to bottom, so output order is a property of the vocabulary, not of
/// map iteration.
pub const ALL_DIRECTIVES: [Directive; 19] = [
    Directive::NeutralBg,
    Directive::NeutralText,
    Directive::RedText,
    Directive::RedTextActive,
    Directive::GreenText,
    Directive::GreenTextActive,
    Directive::BlueText,
    Directive::BlueTextActive,
    Directive::RedBg,
    Directive::RedBgActive,
    Directive::GreenBg,
    Directive::GreenBgActive,
    Directive::BlueBg,
    Directive::BlueBgActive,
    Directive::BlueBorder,
    Directive::TransparentBg,
    Directive::FadeBg,
    Directive::FadeText,
    Directive::NoImage,
];

impl Directive {
    /// Parse a directive header line. Exact match only: headers are
    /// case-and-whitespace-exact in the rule text grammar.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEUTRAL BG" => Some(Directive::NeutralBg),
            "NEUTRAL TEXT" => Some(Directive::NeutralText),
            "RED TEXT" => Some(Directive::RedText),
            "RED TEXT ACTIVE" => Some(Directive::RedTextActive),
            "GREEN TEXT" => Some(Directive::GreenText),
            "GREEN TEXT ACTIVE" => Some(Directive::GreenTextActive),
            "BLUE TEXT" => Some(Directive::BlueText),
            "BLUE TEXT ACTIVE" => Some(Directive::BlueTextActive),
            "RED BG" => Some(Directive::RedBg),
            "RED BG ACTIVE" => Some(Directive::RedBgActive),
            "GREEN BG" => Some(Directive::GreenBg),
            "GREEN BG ACTIVE" => Some(Directive::GreenBgActive),
            "BLUE BG" => Some(Directive::BlueBg),
            "BLUE BG ACTIVE" => Some(Directive::BlueBgActive),
            "BLUE BORDER" => Some(Directive::BlueBorder),
            "TRANSPARENT BG" => Some(Directive::TransparentBg),
            "FADE BG" => Some(Directive::FadeBg),
            "FADE TEXT" => Some(Directive::FadeText),
            "NO IMAGE" => Some(Directive::NoImage),
            _ => None,
        }
    }

    /// Get the canonical header name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::NeutralBg => "NEUTRAL BG",
            Directive::NeutralText => "NEUTRAL TEXT",
            Directive::RedText => "RED TEXT",
            Directive::RedTextActive => "RED TEXT ACTIVE",
            Directive::GreenText => "GREEN TEXT",
            Directive::GreenTextActive => "GREEN TEXT ACTIVE",
            Directive::BlueText => "BLUE TEXT",
            Directive::BlueTextActive => "BLUE TEXT ACTIVE",
            Directive::RedBg => "RED BG",
            Directive::RedBgActive => "RED BG ACTIVE",
            Directive::GreenBg => "GREEN BG",
            Directive::GreenBgActive => "GREEN BG ACTIVE",
            Directive::BlueBg => "BLUE BG",
            Directive::BlueBgActive => "BLUE BG ACTIVE",
            Directive::BlueBorder => "BLUE BORDER",
            Directive::TransparentBg => "TRANSPARENT BG",
            Directive::FadeBg => "FADE BG",
            Directive::FadeText => "FADE TEXT",
            Directive::NoImage => "NO IMAGE",
        }
    }

    /// Whether this directive repaints ambient chrome rather than content.
    ///
    /// Chrome directives on root-level selectors are suppressed in
    /// embedded frames, where the enclosing page controls the chrome.
    pub fn is_chrome(&self) -> bool {
        matches!(self, Directive::FadeBg | Directive::NoImage)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
