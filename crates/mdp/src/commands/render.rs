//! `mdp render` command implementation.

use std::io::Write as _;
use std::path::PathBuf;

use clap::Args;
use mdp_config::{CliSettings, Config};
use mdp_renderer::{
    OutputEncoding, PreviewOptions, PreviewRenderer, RenderFormat, RenderOptions, Severity,
    SourceEncoding,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the markup source file.
    file: PathBuf,

    /// Output format name (default: from config, normally "html").
    format: Option<String>,

    /// Result part to extract (default: from config, normally "html_body").
    part: Option<String>,

    /// Path to configuration file (default: auto-discover mdp.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Encoding used to decode the source file (overrides config).
    #[arg(long)]
    source_encoding: Option<String>,

    /// Encoding used to serialize output (overrides config).
    #[arg(long)]
    output_encoding: Option<String>,

    /// Level the topmost heading renders at, 1-6 (overrides config).
    #[arg(long)]
    initial_header_level: Option<u8>,

    /// Minimum diagnostic severity that aborts rendering, 1-5 (overrides config).
    #[arg(long)]
    halt_level: Option<u8>,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,

    /// Enable verbose output (log rendering stages to stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the preview fails at any
    /// stage; nothing is printed to stdout in that case.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        match &config.config_path {
            Some(path) => tracing::info!(config = %path.display(), "configuration loaded"),
            None => tracing::info!("no mdp.toml found, using defaults"),
        }

        // Resolving the format up front means a bad name fails before the
        // source file is even opened.
        let format: RenderFormat = config.render.format.parse()?;
        let options = preview_options(&config)?;

        let renderer = PreviewRenderer::new(options);
        let mut stdout = std::io::stdout().lock();
        let report = renderer.render_file(&self.file, format, &config.render.part, &mut stdout)?;
        // Flush before the stderr echo so document and diagnostics don't interleave.
        stdout.flush()?;

        for diagnostic in &report.diagnostics {
            if diagnostic.severity >= Severity::Warning {
                output.warning(&diagnostic.to_string());
            }
        }

        Ok(())
    }

    /// Build CLI settings from args.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            initial_header_level: self.initial_header_level,
            halt_level: self.halt_level,
            gfm: self.no_gfm.then_some(false),
            format: self.format.clone(),
            part: self.part.clone(),
            source_encoding: self.source_encoding.clone(),
            output_encoding: self.output_encoding.clone(),
        }
    }
}

/// Build preview options from the merged configuration.
fn preview_options(config: &Config) -> Result<PreviewOptions, CliError> {
    let source_encoding: SourceEncoding = config
        .io
        .source_encoding
        .parse()
        .map_err(CliError::Validation)?;
    let output_encoding: OutputEncoding = config
        .io
        .output_encoding
        .parse()
        .map_err(CliError::Validation)?;

    Ok(PreviewOptions {
        render: RenderOptions::default()
            .with_initial_header_level(config.render.initial_header_level)
            .with_halt_level(config.render.halt_level)
            .with_gfm(config.render.gfm),
        source_encoding,
        output_encoding,
    })
}
