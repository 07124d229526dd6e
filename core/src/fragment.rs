//! Per-subcommand text fragments sliced out of the grammar text.

use serde::{Deserialize, Serialize};

use crate::field_identifier;

/// Which block a [`SectionFragment`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// The subcommand's usage lines.
    Usage,
    /// Usage lines plus the option descriptions they mention.
    Help,
}

impl FragmentKind {
    /// Suffix of the template placeholder carrying this fragment.
    pub fn placeholder_suffix(self) -> &'static str {
        match self {
            FragmentKind::Usage => "usage_pattern",
            FragmentKind::Help => "help_message",
        }
    }
}

/// Generated text for one (subcommand, kind) pair.
///
/// # Examples
///
/// ```
/// use docopt_codegen_core::{FragmentKind, SectionFragment};
///
/// let fragment = SectionFragment::new("out-and-back", FragmentKind::Help, "Out-And-Back Help");
/// assert_eq!(fragment.placeholder(), "out_and_back_help_message");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFragment {
    pub subcommand: String,
    pub kind: FragmentKind,
    pub text: String,
}

impl SectionFragment {
    pub fn new(subcommand: &str, kind: FragmentKind, text: &str) -> Self {
        Self {
            subcommand: subcommand.to_string(),
            kind,
            text: text.to_string(),
        }
    }

    /// Template placeholder name, e.g. `motor_usage_pattern`.
    pub fn placeholder(&self) -> String {
        format!(
            "{}_{}",
            field_identifier(&self.subcommand),
            self.kind.placeholder_suffix()
        )
    }
}
