//! Preview rendering pipeline for MDP.
//!
//! Converts one markup source file into one HTML string and writes it to an
//! output sink. Markup parsing and HTML emission are delegated to
//! `pulldown-cmark`; this crate provides the glue around it:
//!
//! - source decoding ([`SourceEncoding`]) and output serialization
//!   ([`OutputEncoding`])
//! - event-stream adaptation (header level shifting, title capture,
//!   `problematic` spans for unresolvable constructs)
//! - the diagnostic severity policy that decides which markup problems abort
//!   a render ([`RenderOptions::halt_level`])
//! - assembly of the named output parts ([`RenderParts`]) and selection of
//!   one of them
//!
//! # Example
//!
//! ```
//! use mdp_renderer::{PreviewOptions, PreviewRenderer, RenderFormat, part};
//!
//! let renderer = PreviewRenderer::new(PreviewOptions::default());
//! let (html, report) = renderer
//!     .render_source("# Hello\n\nWorld.", RenderFormat::Html, part::HTML_BODY)
//!     .unwrap();
//! assert!(html.contains("<h1>Hello</h1>"));
//! assert!(report.diagnostics.is_empty());
//! ```

mod diagnostics;
mod encoding;
mod error;
mod format;
mod options;
mod parts;
mod preview;
mod renderer;
mod util;

pub use diagnostics::{Diagnostic, Severity};
pub use encoding::{OutputEncoding, SourceEncoding};
pub use error::PreviewError;
pub use format::RenderFormat;
pub use options::RenderOptions;
pub use parts::{RenderParts, part};
pub use preview::{PreviewOptions, PreviewRenderer, PreviewReport};
pub use util::escape_html;
