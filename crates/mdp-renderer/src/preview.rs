//! The preview pipeline: file in, one rendered part out.
//!
//! The pipeline is strictly linear: resolve path, read bytes, decode, render,
//! apply the halt policy, select a part, strip a stray byte-order-mark, write
//! to the sink. It either completes with exactly one write, or fails at one
//! of those stages with a [`PreviewError`] and writes nothing.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::encoding::{OutputEncoding, SourceEncoding};
use crate::error::PreviewError;
use crate::format::RenderFormat;
use crate::options::RenderOptions;
use crate::parts::RenderParts;
use crate::renderer::render_fragment;

/// Options for a [`PreviewRenderer`].
#[derive(Clone, Debug, Default)]
pub struct PreviewOptions {
    /// Markup rendering options.
    pub render: RenderOptions,
    /// Encoding used to decode source file bytes.
    pub source_encoding: SourceEncoding,
    /// Encoding used to serialize the selected part.
    pub output_encoding: OutputEncoding,
}

/// Non-fatal outcome data of a completed preview.
#[derive(Clone, Debug, Default)]
pub struct PreviewReport {
    /// Diagnostics below the halt level, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders one markup file (or source string) to one named HTML part.
#[derive(Clone, Debug, Default)]
pub struct PreviewRenderer {
    options: PreviewOptions,
}

impl PreviewRenderer {
    /// Create a renderer with the given options.
    #[must_use]
    pub fn new(options: PreviewOptions) -> Self {
        Self { options }
    }

    /// Render the file at `path` and write the selected part to `sink`.
    ///
    /// The part is followed by a single trailing newline. On failure nothing
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError`] for a missing file, undecodable bytes,
    /// diagnostics at or above the halt level, an unknown part name, or a
    /// sink failure.
    pub fn render_file(
        &self,
        path: &Path,
        format: RenderFormat,
        part: &str,
        sink: &mut dyn Write,
    ) -> Result<PreviewReport, PreviewError> {
        let path = std::path::absolute(path)?;
        debug!(path = %path.display(), %format, part, "rendering preview");

        if !path.is_file() {
            return Err(PreviewError::FileNotFound(path));
        }
        let bytes = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PreviewError::FileNotFound(path.clone())
            } else {
                PreviewError::Io(e)
            }
        })?;

        let text = self
            .options
            .source_encoding
            .decode(bytes)
            .map_err(|e| PreviewError::Encoding {
                path: path.clone(),
                encoding: self.options.source_encoding,
                offset: e.offset,
            })?;

        let (rendered, report) = self.render_source(&text, format, part)?;
        let encoded = self.options.output_encoding.encode(&rendered);
        sink.write_all(&encoded)?;
        sink.write_all(b"\n")?;
        Ok(report)
    }

    /// Render in-memory source text and return the selected part.
    ///
    /// This is the file-free core of [`render_file`](Self::render_file),
    /// useful to library callers that already hold the text.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::Render`] when diagnostics reach the halt
    /// level, or [`PreviewError::PartNotFound`] for an unknown part name.
    pub fn render_source(
        &self,
        source: &str,
        format: RenderFormat,
        part: &str,
    ) -> Result<(String, PreviewReport), PreviewError> {
        let rendered = render_fragment(source, &self.options.render);

        let halt_level = self.options.render.halt_level;
        if rendered
            .diagnostics
            .iter()
            .any(|d| d.severity.level() >= halt_level)
        {
            return Err(PreviewError::Render(rendered.diagnostics));
        }

        let parts = RenderParts::assemble(format, rendered.html, rendered.title);
        let Some(selected) = parts.get(part) else {
            return Err(PreviewError::PartNotFound {
                part: part.to_owned(),
                available: parts.names().collect::<Vec<_>>().join(", "),
            });
        };

        // Some sources smuggle a byte-order-mark into the part (e.g. a BOM
        // ahead of the first heading ends up in the title). Never emit it.
        let text = selected.strip_prefix('\u{feff}').unwrap_or(selected);
        Ok((
            text.to_owned(),
            PreviewReport {
                diagnostics: rendered.diagnostics,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::parts::part;

    fn renderer() -> PreviewRenderer {
        PreviewRenderer::new(PreviewOptions::default())
    }

    fn write_temp(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_render_file_writes_part_and_newline() {
        let file = write_temp(b"Hello\n=====\n\nWorld.\n");
        let mut sink = Vec::new();
        let report = renderer()
            .render_file(file.path(), RenderFormat::Html, part::HTML_BODY, &mut sink)
            .unwrap();

        let out = String::from_utf8(sink).unwrap();
        assert!(out.starts_with("<div class=\"document\">"));
        assert!(out.contains("<h1>Hello</h1>"));
        assert!(out.contains("<p>World.</p>"));
        assert!(!out.contains("<html>"));
        assert!(out.ends_with('\n'));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_render_file_whole_document() {
        let file = write_temp(b"Hello\n=====\n\nWorld.\n");
        let mut sink = Vec::new();
        renderer()
            .render_file(file.path(), RenderFormat::Html, part::WHOLE, &mut sink)
            .unwrap();

        let out = String::from_utf8(sink).unwrap();
        assert!(out.contains("<html>"));
        assert!(out.contains("<title>Hello</title>"));
    }

    #[test]
    fn test_render_file_is_deterministic() {
        let file = write_temp(b"# T\n\nText with *emphasis*.\n");
        let render = || {
            let mut sink = Vec::new();
            renderer()
                .render_file(file.path(), RenderFormat::Html, part::HTML_BODY, &mut sink)
                .unwrap();
            sink
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_missing_file_writes_nothing() {
        let mut sink = Vec::new();
        let err = renderer()
            .render_file(
                Path::new("/nonexistent/preview.md"),
                RenderFormat::Html,
                part::HTML_BODY,
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, PreviewError::FileNotFound(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_source_bom_never_reaches_output() {
        let file = write_temp(b"\xEF\xBB\xBFHello\n=====\n");
        let mut sink = Vec::new();
        renderer()
            .render_file(file.path(), RenderFormat::Html, part::TITLE, &mut sink)
            .unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), "Hello\n");
    }

    #[test]
    fn test_invalid_utf8_reports_encoding_error() {
        let file = write_temp(b"ok\xFFrest");
        let mut sink = Vec::new();
        let err = renderer()
            .render_file(file.path(), RenderFormat::Html, part::HTML_BODY, &mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            PreviewError::Encoding {
                encoding: SourceEncoding::Utf8,
                offset: 2,
                ..
            }
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_latin1_source_renders() {
        let file = write_temp(b"caf\xE9\n");
        let options = PreviewOptions {
            source_encoding: SourceEncoding::Latin1,
            ..PreviewOptions::default()
        };
        let mut sink = Vec::new();
        PreviewRenderer::new(options)
            .render_file(file.path(), RenderFormat::Html, part::FRAGMENT, &mut sink)
            .unwrap();
        assert!(String::from_utf8(sink).unwrap().contains("café"));
    }

    #[test]
    fn test_ascii_output_encoding() {
        let file = write_temp("# Caf\u{e9}\n".as_bytes());
        let options = PreviewOptions {
            output_encoding: OutputEncoding::Ascii,
            ..PreviewOptions::default()
        };
        let mut sink = Vec::new();
        PreviewRenderer::new(options)
            .render_file(file.path(), RenderFormat::Html, part::FRAGMENT, &mut sink)
            .unwrap();
        assert!(sink.is_ascii());
        assert!(String::from_utf8(sink).unwrap().contains("Caf&#xe9;"));
    }

    #[test]
    fn test_part_not_found_lists_available() {
        let err = renderer()
            .render_source("Hi", RenderFormat::Html, "body")
            .unwrap_err();
        match err {
            PreviewError::PartNotFound { part, available } => {
                assert_eq!(part, "body");
                assert_eq!(available, "fragment, html_body, html_head, title, whole");
            }
            other => panic!("expected PartNotFound, got {other}"),
        }
    }

    #[test]
    fn test_bom_stripped_from_selected_part() {
        let (title, _) = renderer()
            .render_source("\u{feff}Hello\n=====\n", RenderFormat::Html, part::TITLE)
            .unwrap();
        assert_eq!(title, "Hello");
    }

    #[test]
    fn test_warning_tolerated_at_default_halt_level() {
        let (html, report) = renderer()
            .render_source("[click]()\n", RenderFormat::Html, part::HTML_BODY)
            .unwrap();
        assert!(html.contains("click"));
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_error_tolerated_at_default_halt_level() {
        // Unknown footnote target is an error (3); halt level 5 lets it
        // through as an embedded problematic span.
        let (html, report) = renderer()
            .render_source("note[^x]\n", RenderFormat::Html, part::HTML_BODY)
            .unwrap();
        assert!(html.contains("class=\"problematic\""));
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_error_halts_at_level_three() {
        let options = PreviewOptions {
            render: RenderOptions::default().with_halt_level(3),
            ..PreviewOptions::default()
        };
        let err = PreviewRenderer::new(options)
            .render_source("note[^x]\n", RenderFormat::Html, part::HTML_BODY)
            .unwrap_err();
        match err {
            PreviewError::Render(diagnostics) => assert_eq!(diagnostics.len(), 1),
            other => panic!("expected Render, got {other}"),
        }
    }

    #[test]
    fn test_warning_halts_at_level_two() {
        let options = PreviewOptions {
            render: RenderOptions::default().with_halt_level(2),
            ..PreviewOptions::default()
        };
        let result = PreviewRenderer::new(options).render_source(
            "[click]()\n",
            RenderFormat::Html,
            part::HTML_BODY,
        );
        assert!(matches!(result, Err(PreviewError::Render(_))));
    }
}
