//! Preview error taxonomy.
//!
//! Every failure is terminal for the single operation; nothing is retried.
//! No output reaches the sink once a failure is detected: the selected part
//! is fully assembled in memory before the one write.

use std::path::PathBuf;

use crate::diagnostics::Diagnostic;
use crate::encoding::SourceEncoding;

/// Failure of a single preview operation.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The source path does not name an existing, readable file.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The requested output format is not supported.
    #[error("Unsupported output format: {0} (supported: html, html5)")]
    UnsupportedFormat(String),

    /// Source bytes are invalid under the selected encoding.
    #[error("Failed to decode {} as {encoding}: invalid data at byte {offset}", .path.display())]
    Encoding {
        /// Source file path.
        path: PathBuf,
        /// Encoding the decode was attempted with.
        encoding: SourceEncoding,
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    /// Markup diagnostics reached the configured halt level.
    #[error("Rendering halted: {}", summarize(.0))]
    Render(Vec<Diagnostic>),

    /// The requested part does not exist in the result bundle.
    #[error("Unknown document part: {part} (available: {available})")]
    PartNotFound {
        /// The part name that was requested.
        part: String,
        /// Comma-separated list of parts the bundle does contain.
        available: String,
    },

    /// Sink or filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One-line summary of the diagnostics that halted a render.
fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
