//! Error types for grammar parsing and code generation.

use std::path::PathBuf;

use docopt_codegen_core::ValidationError;
use thiserror::Error;

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Grammar-level failures. Any of these aborts generation before output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("\"usage:\" (case-insensitive) not found")]
    MissingUsage,

    #[error("more than one \"usage:\" (case-insensitive) section found ({0})")]
    DuplicateUsage(usize),

    #[error("unmatched '{0}'")]
    Unmatched(char),

    #[error("unexpected ending: '{0}'")]
    UnexpectedEnding(String),

    #[error("{long} is not a unique prefix: {candidates}?")]
    AmbiguousLong { long: String, candidates: String },

    #[error("{short} is specified ambiguously {count} times")]
    AmbiguousShort { short: String, count: usize },

    #[error("{0} must not have an argument")]
    UnexpectedArgument(String),

    #[error("{0} requires argument")]
    MissingArgument(String),
}

/// A default value the emit target has no literal form for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{target} target cannot render value {value}")]
pub struct LiteralRenderError {
    pub target: &'static str,
    pub value: String,
}

/// Top-level error for a compile run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    LiteralRender(#[from] LiteralRenderError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("{} validation error(s): {}", .0.len(), join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_error_messages() {
        assert_eq!(GrammarError::Unmatched('(').to_string(), "unmatched '('");
        assert_eq!(
            GrammarError::MissingArgument("--step".to_string()).to_string(),
            "--step requires argument"
        );
        assert_eq!(
            GrammarError::DuplicateUsage(2).to_string(),
            "more than one \"usage:\" (case-insensitive) section found (2)"
        );
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = CompileError::Validation(vec![
            ValidationError::EmptyIdentifier("--".to_string()),
            ValidationError::DuplicateLeaf("show".to_string()),
        ]);
        let message = err.to_string();
        assert!(message.starts_with("2 validation error(s)"));
        assert!(message.contains("duplicate leaf: show"));
    }
}
