//! Palette and color types consumed by the rule compiler.
//!
//! Palette construction is owned by the embedding theme configuration;
//! this crate only reads it. The contrast helpers exist so a caller (and
//! our tests) can check that a palette keeps text readable on the
//! background it ships with.

use ahash::AHashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Brightening applied to accents for ACTIVE directive variants.
const ACTIVE_BRIGHTEN: f64 = 0.25;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` or `#rgb` hex literal.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidColor(s.to_string()))?;
        let parse = |h: &str| u8::from_str_radix(h, 16);
        match hex.len() {
            6 => {
                let r = parse(&hex[0..2]);
                let g = parse(&hex[2..4]);
                let b = parse(&hex[4..6]);
                match (r, g, b) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Self { r, g, b }),
                    _ => Err(Error::InvalidColor(s.to_string())),
                }
            }
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let d = c
                        .to_digit(16)
                        .ok_or_else(|| Error::InvalidColor(s.to_string()))?
                        as u8;
                    out[i] = d * 16 + d;
                }
                Ok(Self {
                    r: out[0],
                    g: out[1],
                    b: out[2],
                })
            }
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }

    /// Render with an alpha channel, for faded declarations.
    pub fn rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Move each channel toward white by `factor` (0.0..=1.0).
    pub fn brighten(&self, factor: f64) -> Self {
        let lift = |c: u8| c + ((255 - c) as f64 * factor).round() as u8;
        Self {
            r: lift(self.r),
            g: lift(self.g),
            b: lift(self.b),
        }
    }

    /// WCAG relative luminance.
    pub fn luminance(&self) -> f64 {
        let channel = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// WCAG contrast ratio between two colors (1.0..=21.0).
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let (la, lb) = (a.luminance(), b.luminance());
    let (hi, lo) = if la > lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Accent hue names recognized by the directive vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hue {
    Red,
    Green,
    Blue,
}

/// Caller-supplied colors used to instantiate directive effects.
#[derive(Debug, Clone)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    accents: AHashMap<Hue, Color>,
}

impl Palette {
    /// Create a palette with no accents registered. Accent lookups fall
    /// back to the text color until hues are supplied.
    pub fn new(background: Color, text: Color) -> Self {
        Self {
            background,
            text,
            accents: AHashMap::new(),
        }
    }

    /// Register an accent color for a hue.
    pub fn with_accent(mut self, hue: Hue, color: Color) -> Self {
        self.accents.insert(hue, color);
        self
    }

    /// Accent color for a hue. Total: an unregistered hue yields the
    /// text color rather than failing.
    pub fn accent(&self, hue: Hue) -> Color {
        self.accents.get(&hue).copied().unwrap_or(self.text)
    }

    /// Brightened accent variant for ACTIVE directives.
    pub fn accent_active(&self, hue: Hue) -> Color {
        self.accent(hue).brighten(ACTIVE_BRIGHTEN)
    }

    /// Default dark palette. Accents are picked to clear a 4.5:1
    /// contrast ratio against the background.
    pub fn dark() -> Self {
        Self::new(Color::new(0x18, 0x1a, 0x1b), Color::new(0xe8, 0xe6, 0xe3))
            .with_accent(Hue::Red, Color::new(0xe0, 0x6c, 0x75))
            .with_accent(Hue::Green, Color::new(0x98, 0xc3, 0x79))
            .with_accent(Hue::Blue, Color::new(0x61, 0xaf, 0xef))
    }
}
