//! Output format selection.
//!
//! The format name is validated before any file I/O happens, so a typo fails
//! fast instead of after reading the source.

use std::fmt;
use std::str::FromStr;

use crate::error::PreviewError;

/// Target format for a render.
///
/// `html` and `html5` both name the single HTML target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderFormat {
    /// HTML5 output.
    #[default]
    Html,
}

impl RenderFormat {
    /// Canonical format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
        }
    }

    /// Document type declaration for the `whole` part.
    pub(crate) const fn doctype(self) -> &'static str {
        match self {
            Self::Html => "<!DOCTYPE html>",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderFormat {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("html") || s.eq_ignore_ascii_case("html5") {
            Ok(Self::Html)
        } else {
            Err(PreviewError::UnsupportedFormat(s.to_owned()))
        }
    }
}
