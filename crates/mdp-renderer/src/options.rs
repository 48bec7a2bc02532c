//! Rendering options.

use pulldown_cmark::Options;

/// Halt level above every severity: never abort.
pub(crate) const HALT_NEVER: u8 = 5;

/// Options controlling one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Level the topmost source heading renders at (1..=6).
    ///
    /// A source `<h1>` becomes `<h{initial_header_level}>`; deeper headings
    /// shift by the same amount and clamp at 6.
    pub initial_header_level: u8,
    /// Minimum diagnostic severity that aborts rendering (1..=5).
    ///
    /// The default of 5 sits above the whole severity scale, so problems are
    /// reported but never fatal.
    pub halt_level: u8,
    /// Enable GitHub Flavored Markdown extensions (tables, strikethrough,
    /// task lists).
    pub gfm: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            initial_header_level: 1,
            halt_level: HALT_NEVER,
            gfm: true,
        }
    }
}

impl RenderOptions {
    /// Set the initial header level.
    #[must_use]
    pub fn with_initial_header_level(mut self, level: u8) -> Self {
        self.initial_header_level = level;
        self
    }

    /// Set the halt level.
    #[must_use]
    pub fn with_halt_level(mut self, level: u8) -> Self {
        self.halt_level = level;
        self
    }

    /// Enable or disable GFM extensions.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options for the underlying library.
    ///
    /// Footnotes are always enabled; they feed the unknown-target
    /// diagnostics regardless of the GFM toggle.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_OLD_FOOTNOTES;
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        options
    }
}
