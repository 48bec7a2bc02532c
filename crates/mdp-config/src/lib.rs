//! Configuration management for MDP.
//!
//! Parses `mdp.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`]. Validation
//! runs after the overrides, so out-of-range values are rejected no matter
//! where they came from.
//!
//! Encoding, format, and part names are kept as plain strings here; the
//! rendering layer owns their meaning and parses them at the call site.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdp.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override initial header level.
    pub initial_header_level: Option<u8>,
    /// Override halt level.
    pub halt_level: Option<u8>,
    /// Override GFM extensions flag.
    pub gfm: Option<bool>,
    /// Override default output format.
    pub format: Option<String>,
    /// Override default part selection.
    pub part: Option<String>,
    /// Override source encoding.
    pub source_encoding: Option<String>,
    /// Override output encoding.
    pub output_encoding: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Stream encoding configuration.
    pub io: IoConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Level the topmost source heading renders at (1..=6).
    pub initial_header_level: u8,
    /// Minimum diagnostic severity that aborts rendering (1..=5).
    pub halt_level: u8,
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Default output format name.
    pub format: String,
    /// Default part to extract from the result bundle.
    pub part: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            initial_header_level: 1,
            halt_level: 5,
            gfm: true,
            format: "html".to_owned(),
            part: "html_body".to_owned(),
        }
    }
}

/// Stream encoding configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Encoding used to decode source file bytes.
    pub source_encoding: String,
    /// Encoding used to serialize output.
    pub output_encoding: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            source_encoding: "utf-8".to_owned(),
            output_encoding: "utf-8".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdp.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values; validation runs last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(level) = settings.initial_header_level {
            self.render.initial_header_level = level;
        }
        if let Some(level) = settings.halt_level {
            self.render.halt_level = level;
        }
        if let Some(gfm) = settings.gfm {
            self.render.gfm = gfm;
        }
        if let Some(format) = &settings.format {
            self.render.format.clone_from(format);
        }
        if let Some(part) = &settings.part {
            self.render.part.clone_from(part);
        }
        if let Some(encoding) = &settings.source_encoding {
            self.io.source_encoding.clone_from(encoding);
        }
        if let Some(encoding) = &settings.output_encoding {
            self.io.output_encoding.clone_from(encoding);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range or
    /// empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=6).contains(&self.render.initial_header_level) {
            return Err(ConfigError::Validation(format!(
                "render.initial_header_level must be between 1 and 6, got {}",
                self.render.initial_header_level
            )));
        }
        if !(1..=5).contains(&self.render.halt_level) {
            return Err(ConfigError::Validation(format!(
                "render.halt_level must be between 1 and 5, got {}",
                self.render.halt_level
            )));
        }
        require_non_empty(&self.render.format, "render.format")?;
        require_non_empty(&self.render.part, "render.part")?;
        require_non_empty(&self.io.source_encoding, "io.source_encoding")?;
        require_non_empty(&self.io.output_encoding, "io.output_encoding")?;
        Ok(())
    }
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.initial_header_level, 1);
        assert_eq!(config.render.halt_level, 5);
        assert!(config.render.gfm);
        assert_eq!(config.render.format, "html");
        assert_eq!(config.render.part, "html_body");
        assert_eq!(config.io.source_encoding, "utf-8");
        assert_eq!(config.io.output_encoding, "utf-8");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.halt_level, 5);
        assert_eq!(config.render.part, "html_body");
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
initial_header_level = 2
halt_level = 3
gfm = false
format = "html5"
part = "whole"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.initial_header_level, 2);
        assert_eq!(config.render.halt_level, 3);
        assert!(!config.render.gfm);
        assert_eq!(config.render.format, "html5");
        assert_eq!(config.render.part, "whole");
    }

    #[test]
    fn test_parse_io_config() {
        let toml = r#"
[io]
source_encoding = "latin-1"
output_encoding = "ascii"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.io.source_encoding, "latin-1");
        assert_eq!(config.io.output_encoding, "ascii");
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/mdp.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_sets_config_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nhalt_level = 4").unwrap();
        let config = Config::load(Some(file.path()), None).unwrap();
        assert_eq!(config.render.halt_level, 4);
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_apply_cli_settings_levels() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            initial_header_level: Some(3),
            halt_level: Some(2),
            ..Default::default()
        });
        assert_eq!(config.render.initial_header_level, 3);
        assert_eq!(config.render.halt_level, 2);
        assert_eq!(config.render.part, "html_body"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_strings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            format: Some("html5".to_owned()),
            part: Some("whole".to_owned()),
            source_encoding: Some("latin-1".to_owned()),
            output_encoding: Some("ascii".to_owned()),
            ..Default::default()
        });
        assert_eq!(config.render.format, "html5");
        assert_eq!(config.render.part, "whole");
        assert_eq!(config.io.source_encoding, "latin-1");
        assert_eq!(config.io.output_encoding, "ascii");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.render.initial_header_level, 1);
        assert_eq!(config.render.format, "html");
    }

    #[test]
    fn test_cli_settings_applied_through_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nhalt_level = 4").unwrap();
        let settings = CliSettings {
            halt_level: Some(2),
            ..Default::default()
        };
        let config = Config::load(Some(file.path()), Some(&settings)).unwrap();
        assert_eq!(config.render.halt_level, 2);
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_initial_header_level_out_of_range() {
        let mut config = Config::default();
        config.render.initial_header_level = 0;
        assert_validation_error(&config, &["initial_header_level", "1 and 6"]);

        config.render.initial_header_level = 7;
        assert_validation_error(&config, &["initial_header_level", "got 7"]);
    }

    #[test]
    fn test_validate_halt_level_out_of_range() {
        let mut config = Config::default();
        config.render.halt_level = 0;
        assert_validation_error(&config, &["halt_level", "1 and 5"]);

        config.render.halt_level = 6;
        assert_validation_error(&config, &["halt_level", "got 6"]);
    }

    #[test]
    fn test_validate_empty_part() {
        let mut config = Config::default();
        config.render.part = String::new();
        assert_validation_error(&config, &["render.part", "empty"]);
    }

    #[test]
    fn test_validate_empty_encoding() {
        let mut config = Config::default();
        config.io.source_encoding = String::new();
        assert_validation_error(&config, &["io.source_encoding", "empty"]);
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let settings = CliSettings {
            halt_level: Some(9),
            ..Default::default()
        };
        let err = Config::load(Some(file.path()), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("halt_level"));
    }
}
