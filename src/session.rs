//! Session orchestration around the pure rule compiler.
//!
//! The enable/disable/auto state lives here as an explicit object, not
//! as ambient flags: a session owns its palette and theme, builds
//! through the pure core, and hands the result to a [`StyleSink`]. The
//! sink is the style-injection collaborator; this crate never touches a
//! page itself.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::palette::Palette;
use crate::theme::StaticTheme;

/// Identifier under which the compiled stylesheet is installed.
pub const STYLE_ID: &str = "static";

/// Style injection contract implemented by the embedder.
pub trait StyleSink {
    /// Install or replace the stylesheet stored under `id`.
    /// Idempotent: repeated calls with the same id replace content.
    fn set_style(&mut self, css: &str, id: &str);

    /// Fully remove any stylesheet installed under this crate's ids.
    fn clear_style(&mut self);
}

/// Reported system color scheme, used by [`ThemeSession::auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// One theming session: a theme, a palette, a sink, and the current
/// enabled state.
pub struct ThemeSession<S: StyleSink> {
    theme: Arc<StaticTheme>,
    palette: Palette,
    sink: S,
    enabled: bool,
}

impl<S: StyleSink> ThemeSession<S> {
    pub fn new(theme: Arc<StaticTheme>, palette: Palette, sink: S) -> Self {
        Self {
            theme,
            palette,
            sink,
            enabled: false,
        }
    }

    /// Compile the stylesheet for `url` and install it.
    pub fn enable(&mut self, url: &str, is_top_frame: bool) -> Result<()> {
        let css = self.theme.build(&self.palette, url, is_top_frame)?;
        self.sink.set_style(&css, STYLE_ID);
        self.enabled = true;
        Ok(())
    }

    /// Remove the installed stylesheet.
    pub fn disable(&mut self) {
        self.sink.clear_style();
        self.enabled = false;
    }

    /// Follow the reported color scheme: enable on dark, disable on
    /// light. The embedder calls this again whenever the scheme flips.
    pub fn auto(&mut self, scheme: ColorScheme, url: &str, is_top_frame: bool) -> Result<()> {
        match scheme {
            ColorScheme::Dark => self.enable(url, is_top_frame),
            ColorScheme::Light => {
                self.disable();
                Ok(())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the session palette. Takes effect on the next enable.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// How often the embedder should re-invoke [`enable`] for pages
    /// matched by an embedded-site fix. Policy value from the database;
    /// this crate schedules nothing itself.
    ///
    /// [`enable`]: ThemeSession::enable
    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.theme.index().cache_cleanup_timer())
    }
}
