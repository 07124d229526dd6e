//! Generator configuration.
//!
//! Controls which subcommands get their own fragments and how text literals
//! are rendered. Loaded from YAML; command-line flags override file values.
//!
//! # Example YAML
//!
//! ```yaml
//! subcommands:
//!   - motor
//!   - pid
//! strip_program_name: true
//! line_ending: crlf
//! wrap_width: 72
//! template: templates/console
//! strict: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

/// Newline escape written inside generated string literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`, for serial consoles.
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineEnding {
    /// The escape sequence as it appears in C source.
    pub fn escape(self) -> &'static str {
        match self {
            LineEnding::Crlf => r"\r\n",
            LineEnding::Lf => r"\n",
        }
    }
}

/// Settings for one compile run.
///
/// # Examples
///
/// ```
/// use docopt_codegen::{GeneratorConfig, LineEnding};
///
/// let config: GeneratorConfig = serde_yaml::from_str("line_ending: lf\nstrict: true\n").unwrap();
/// assert_eq!(config.line_ending, LineEnding::Lf);
/// assert!(config.strict);
/// assert_eq!(config.wrap_width, 72);
/// assert!(config.subcommands.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Subcommands to build fragments for; derived from usage lines when
    /// absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcommands: Option<Vec<String>>,
    /// Remove `"<program> "` from every emitted text literal.
    pub strip_program_name: bool,
    pub line_ending: LineEnding,
    /// Column limit of the wrapped default-value list.
    pub wrap_width: usize,
    /// Template base name; `<base>.h` and `<base>.c` replace the bundled
    /// templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Treat validation problems as errors.
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            subcommands: None,
            strip_program_name: false,
            line_ending: LineEnding::Crlf,
            wrap_width: 72,
            template: None,
            strict: false,
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Io`] if the file cannot be read, or
    /// [`CompileError::Config`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| CompileError::io(path, e))?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| CompileError::io(path, e))?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_matches_serial_console_output() {
        let config = GeneratorConfig::default();
        assert_eq!(config.line_ending, LineEnding::Crlf);
        assert_eq!(config.line_ending.escape(), "\\r\\n");
        assert_eq!(config.wrap_width, 72);
        assert!(!config.strip_program_name);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codegen.yml");
        let config = GeneratorConfig {
            subcommands: Some(vec!["motor".to_string(), "pid".to_string()]),
            strip_program_name: true,
            line_ending: LineEnding::Lf,
            ..GeneratorConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(GeneratorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = GeneratorConfig::load("/nonexistent/codegen.yml").unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/codegen.yml"));
    }

    #[test]
    fn test_unknown_line_ending_is_config_error() {
        let err = serde_yaml::from_str::<GeneratorConfig>("line_ending: cr\n").unwrap_err();
        assert!(err.to_string().contains("line_ending") || err.to_string().contains("variant"));
    }
}
