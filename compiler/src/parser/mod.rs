//! Grammar parser for docopt usage text.
//!
//! A grammar is free-form help text containing exactly one `usage:` section
//! and any number of `options:` sections (both matched case-insensitively).
//! A section starts at the line holding the keyword and runs through every
//! following line that begins with a space or tab; the first unindented
//! line ends it.
//!
//! Parsing happens in three steps:
//!
//! 1. Option descriptions are read from the options sections into an
//!    [`OptionsRegistry`], picking up `[default: ...]` values.
//! 2. The usage section is rewritten into one formal pattern: the first word
//!    after `usage:` is the program name, and every later occurrence of it
//!    starts a new alternative.
//! 3. The formal pattern is parsed into a [`PatternNode`] tree. Options that
//!    appear only in usage lines are added to the registry on the way.
//!
//! # Example
//!
//! ```
//! use docopt_codegen::parser::Grammar;
//!
//! let grammar = Grammar::parse(
//!     "Usage:\n  prog cmd --flag\n\nOptions:\n  --flag  a flag [default: false]\n",
//! )
//! .unwrap();
//!
//! assert_eq!(grammar.program.as_deref(), Some("prog"));
//! assert_eq!(grammar.pattern.leaf_count(), 2);
//! assert_eq!(grammar.registry.len(), 1);
//! ```

mod options;
mod pattern;
mod tokens;

use std::sync::LazyLock;

use docopt_codegen_core::{OptionsRegistry, PatternNode};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::GrammarError;

pub use options::parse_option_description;

/// Regex patterns for locating grammar sections.
static PATTERNS: LazyLock<GrammarPatterns> = LazyLock::new(GrammarPatterns::new);

struct GrammarPatterns {
    usage_section: Regex,
    options_section: Regex,
}

impl GrammarPatterns {
    fn new() -> Self {
        Self {
            usage_section: section_regex("usage:"),
            options_section: section_regex("options:"),
        }
    }
}

/// Header line containing `keyword`, then every indented line after it.
fn section_regex(keyword: &str) -> Regex {
    Regex::new(&format!(
        r"(?im)^([^\n]*{keyword}[^\n]*\n?(?:[ \t].*?(?:\n|$))*)"
    ))
    .expect("static regex must compile")
}

/// Returns every section `pattern` finds in `doc`, trimmed.
fn parse_section(pattern: &Regex, doc: &str) -> Vec<String> {
    pattern
        .captures_iter(doc)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// A parsed grammar: the source text plus everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grammar {
    /// The full grammar text.
    pub doc: String,
    /// The usage section, trimmed.
    pub usage: String,
    /// First word after `usage:`; `None` when the section is empty.
    pub program: Option<String>,
    /// Parsed usage pattern, always rooted at `Required`.
    pub pattern: PatternNode,
    /// Every option the grammar declares or uses.
    pub registry: OptionsRegistry,
    /// Lines of the first options section, header excluded.
    pub option_lines: Vec<String>,
}

impl Grammar {
    /// Parses grammar text.
    ///
    /// # Errors
    ///
    /// Fails with [`GrammarError::MissingUsage`] or
    /// [`GrammarError::DuplicateUsage`] unless exactly one usage section is
    /// present, and with the pattern errors for malformed usage lines.
    ///
    /// CRLF line endings are read as LF.
    pub fn parse(doc: &str) -> Result<Self, GrammarError> {
        let normalized = doc.replace("\r\n", "\n");
        let doc = normalized.as_str();
        let mut sections = parse_section(&PATTERNS.usage_section, doc);
        let usage = match sections.len() {
            0 => return Err(GrammarError::MissingUsage),
            1 => sections.remove(0),
            n => return Err(GrammarError::DuplicateUsage(n)),
        };

        let mut registry: OptionsRegistry = options::parse_defaults(doc).into_iter().collect();
        let declared = registry.len();

        let (program, formal) = formal_usage(&usage);
        let pattern = pattern::parse_pattern(&formal, &mut registry)?;

        debug!(
            program = program.as_deref().unwrap_or(""),
            declared_options = declared,
            usage_only_options = registry.len() - declared,
            leaves = pattern.leaf_count(),
            "Parsed grammar"
        );

        let option_lines = parse_section(&PATTERNS.options_section, doc)
            .first()
            .map(|section| section.lines().skip(1).map(String::from).collect())
            .unwrap_or_default();

        Ok(Self {
            doc: doc.to_string(),
            usage,
            program,
            pattern,
            registry,
            option_lines,
        })
    }

    /// Lines of the usage section after the header line.
    pub fn usage_lines(&self) -> impl Iterator<Item = &str> {
        self.usage.lines().skip(1)
    }
}

/// Rewrites a usage section into a single formal pattern.
///
/// `Usage: prog a | prog b` becomes `( a ) | ( b )`. Returns the program
/// name alongside the pattern; an empty section yields no program and an
/// empty pattern.
fn formal_usage(section: &str) -> (Option<String>, String) {
    let body = section.split_once(':').map_or("", |(_, rest)| rest);
    let words: Vec<&str> = body.split_whitespace().collect();
    let Some((&program, rest)) = words.split_first() else {
        return (None, String::new());
    };

    let alternatives: Vec<&str> = rest
        .iter()
        .map(|&word| if word == program { ") | (" } else { word })
        .collect();
    (
        Some(program.to_string()),
        format!("( {} )", alternatives.join(" ")),
    )
}
