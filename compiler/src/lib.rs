//! Compile docopt usage grammars into C argument-parsing code.
//!
//! A grammar is the help text of a command-line program written in the
//! docopt convention: a `Usage:` section listing every invocation form and an
//! `Options:` section describing each option and its default. This crate
//! turns that text into two C artifacts: a header declaring a struct with one
//! field per command, argument and option, and a source file that fills the
//! struct from `argv`.
//!
//! # Pipeline
//!
//! 1. [`parser::Grammar::parse`] locates the sections and parses the usage
//!    pattern into a tree.
//! 2. [`classify_leaves`] flattens the tree into sorted, deduplicated
//!    commands, arguments, flags and options.
//! 3. [`extract::extract_sections`] slices per-subcommand usage and help
//!    text out of the grammar.
//! 4. [`emit::emit_values`] renders every fragment for the target language,
//!    and [`template::Templates`] substitutes them into the header and
//!    source templates.
//!
//! Steps 1 to 3 are bundled in [`Compilation::analyze`]; step 4 is
//! [`Compilation::render`]. [`compile`] runs both.
//!
//! # Example
//!
//! ```
//! use docopt_codegen::{GeneratorConfig, Templates, compile};
//!
//! let doc = "\
//! Usage:
//!   prog cmd --flag
//! Options:
//!   --flag  a flag [default: false]
//! ";
//!
//! let (compilation, artifacts) =
//!     compile(doc, &GeneratorConfig::default(), &Templates::bundled(), "prog").unwrap();
//!
//! assert_eq!(compilation.leaves.commands[0].name, "cmd");
//! assert!(artifacts.header.contains("int cmd;"));
//! assert!(artifacts.header.contains("int flag;"));
//! assert!(artifacts.source.contains("{\"cmd\", 0}"));
//! ```

pub mod artifacts;
pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod output;
pub mod parser;
pub mod template;

pub use artifacts::Artifacts;
pub use classify::classify_leaves;
pub use config::{GeneratorConfig, LineEnding};
pub use error::{CompileError, GrammarError, LiteralRenderError, Result};
pub use template::Templates;

use docopt_codegen_core::{ClassifiedLeaves, SectionFragment, ValidationError, validate_leaves};
use tracing::{debug, warn};

use emit::{CTarget, emit_values};
use parser::Grammar;

/// Everything derived from a grammar before rendering.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub grammar: Grammar,
    pub leaves: ClassifiedLeaves,
    /// Subcommands that received fragments, in fragment order.
    pub subcommands: Vec<String>,
    pub fragments: Vec<SectionFragment>,
    /// Validation problems found in the classified leaves.
    pub warnings: Vec<ValidationError>,
}

impl Compilation {
    /// Parses, classifies, extracts and validates `doc`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Grammar`] for malformed grammars and, when
    /// `config.strict` is set, [`CompileError::Validation`] for leaf sets
    /// that would generate broken code.
    pub fn analyze(doc: &str, config: &GeneratorConfig) -> Result<Self> {
        let grammar = Grammar::parse(doc)?;
        let leaves = classify_leaves(&grammar.pattern, &grammar.registry);

        let subcommands = match &config.subcommands {
            Some(subcommands) => subcommands.clone(),
            None => extract::discover_subcommands(&grammar),
        };
        debug!(subcommands = ?subcommands, "Extracting sections");
        let fragments = extract::extract_sections(&grammar, &subcommands);

        let warnings = validate_leaves(&leaves);
        if !warnings.is_empty() {
            if config.strict {
                return Err(CompileError::Validation(warnings));
            }
            for warning in &warnings {
                warn!(%warning, "Generated code may not compile");
            }
        }

        Ok(Self {
            grammar,
            leaves,
            subcommands,
            fragments,
            warnings,
        })
    }

    /// Renders the header and source artifacts with the C target.
    ///
    /// `module` names the generated module: the header guard becomes
    /// `<MODULE>_H` and the source includes `<module>.h`.
    pub fn render(
        &self,
        config: &GeneratorConfig,
        templates: &Templates,
        module: &str,
    ) -> Result<Artifacts> {
        let target = CTarget::new(config, self.grammar.program.as_deref());
        let values = emit_values(&target, &self.grammar, &self.leaves, &self.fragments, module)?;
        let (header, source) = templates.render(&values.header, &values.source);
        Ok(Artifacts::new(&header, &source))
    }
}

/// Analyzes and renders `doc` in one step.
pub fn compile(
    doc: &str,
    config: &GeneratorConfig,
    templates: &Templates,
    module: &str,
) -> Result<(Compilation, Artifacts)> {
    let compilation = Compilation::analyze(doc, config)?;
    let artifacts = compilation.render(config, templates, module)?;
    Ok((compilation, artifacts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_mode_rejects_collisions() {
        let doc = "Usage: prog plain-text [--plain-text]\n";
        let config = GeneratorConfig {
            strict: true,
            ..GeneratorConfig::default()
        };
        let err = Compilation::analyze(doc, &config).unwrap_err();
        assert!(matches!(err, CompileError::Validation(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_lenient_mode_keeps_warnings() {
        let doc = "Usage: prog run -- <file>\n";
        let compilation = Compilation::analyze(doc, &GeneratorConfig::default()).unwrap();
        assert_eq!(
            compilation.warnings,
            vec![ValidationError::EmptyIdentifier("--".to_string())]
        );
    }

    #[test]
    fn test_configured_subcommands_override_discovery() {
        let doc = "Usage:\n  prog motor show\n  prog pid show\n";
        let config = GeneratorConfig {
            subcommands: Some(vec!["pid".to_string()]),
            ..GeneratorConfig::default()
        };
        let compilation = Compilation::analyze(doc, &config).unwrap();
        assert_eq!(compilation.subcommands, vec!["pid"]);
        assert_eq!(compilation.fragments.len(), 2);
    }

    #[test]
    fn test_grammar_error_propagates() {
        let err = compile("no sections", &GeneratorConfig::default(), &Templates::bundled(), "x")
            .unwrap_err();
        assert!(matches!(err, CompileError::Grammar(GrammarError::MissingUsage)));
    }
}
