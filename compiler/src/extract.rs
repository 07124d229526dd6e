//! Per-subcommand usage and help fragments.
//!
//! For each subcommand name the extractor slices the usage lines that
//! invoke it out of the grammar's usage section and builds two texts:
//!
//! - a **usage** fragment: a title line, `Usage:` and the matching lines;
//! - a **help** fragment: the same, followed by `Options:` and every option
//!   description line that mentions a long option used on those lines.
//!
//! Subcommands are independent, so fragments are built in parallel and
//! returned in the order the subcommands were given.

use std::collections::HashSet;

use docopt_codegen_core::{FragmentKind, SectionFragment};
use rayon::prelude::*;
use tracing::debug;

use crate::parser::Grammar;

/// Builds the usage and help fragments for every subcommand.
///
/// # Examples
///
/// ```
/// use docopt_codegen::extract::extract_sections;
/// use docopt_codegen::parser::Grammar;
///
/// let grammar = Grammar::parse(
///     "Usage:\n    prog motor show [--plain-text]\n    prog pid\n\nOptions:\n    -p --plain-text  Plain output.\n",
/// )
/// .unwrap();
/// let fragments = extract_sections(&grammar, &["motor".to_string()]);
///
/// assert_eq!(fragments[0].text, "Motor Usage\nUsage:\n    prog motor show [--plain-text]");
/// assert_eq!(fragments[1].placeholder(), "motor_help_message");
/// ```
pub fn extract_sections(grammar: &Grammar, subcommands: &[String]) -> Vec<SectionFragment> {
    let Some(program) = grammar.program.as_deref() else {
        return Vec::new();
    };

    subcommands
        .par_iter()
        .flat_map_iter(|subcommand| {
            let lines = subcommand_lines(&grammar.usage, program, subcommand);
            if lines.is_empty() {
                debug!(subcommand = %subcommand, "No usage lines mention subcommand");
            }
            [
                SectionFragment::new(subcommand, FragmentKind::Usage, &usage_text(subcommand, &lines)),
                SectionFragment::new(
                    subcommand,
                    FragmentKind::Help,
                    &help_text(subcommand, &lines, &grammar.option_lines),
                ),
            ]
        })
        .collect()
}

/// Usage lines containing `"{program} {subcommand} "`, kept verbatim with
/// their indentation. The `usage:` header line itself is never matched.
pub fn subcommand_lines<'a>(usage: &'a str, program: &str, subcommand: &str) -> Vec<&'a str> {
    let needle = format!("{program} {subcommand} ");
    usage
        .lines()
        .skip(1)
        .filter(|line| line.contains(&needle))
        .collect()
}

/// Subcommand names in order of first appearance: the word right after the
/// program name on each indented usage line, when it is a literal keyword.
pub fn discover_subcommands(grammar: &Grammar) -> Vec<String> {
    let Some(program) = grammar.program.as_deref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut subcommands = Vec::new();
    for line in grammar.usage_lines() {
        let mut words = line.split_whitespace().skip_while(|word| *word != program);
        let Some(word) = words.nth(1) else {
            continue;
        };
        if is_keyword(word) && seen.insert(word) {
            subcommands.push(word.to_string());
        }
    }
    subcommands
}

/// A bare word: not an option, placeholder, grouping token or shortcut.
fn is_keyword(word: &str) -> bool {
    let first = word.chars().next();
    let has_upper = word.chars().any(char::is_uppercase);
    let has_lower = word.chars().any(char::is_lowercase);
    matches!(first, Some(c) if c.is_alphanumeric())
        && !(has_upper && !has_lower)
        && word != "options"
        && !word.contains(['<', '>', '[', ']', '(', ')', '|'])
        && !word.ends_with("...")
}

fn usage_text(subcommand: &str, lines: &[&str]) -> String {
    format!("{} Usage\nUsage:\n{}", title_case(subcommand), lines.join("\n"))
}

fn help_text(subcommand: &str, lines: &[&str], option_lines: &[String]) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected: Vec<&str> = Vec::new();
    for token in lines.iter().flat_map(|line| line.split_whitespace()) {
        let token = strip_brackets(token);
        if !token.starts_with("--") {
            continue;
        }
        for option_line in option_lines {
            if option_line.contains(token) && seen.insert(option_line) {
                selected.push(option_line);
            }
        }
    }
    format!(
        "{} Help\nUsage:\n{}\n\nOptions:\n{}",
        title_case(subcommand),
        lines.join("\n"),
        selected.join("\n")
    )
}

/// Drops one leading `[`, trailing `]`, leading `(` and trailing `)`, in
/// that order.
fn strip_brackets(token: &str) -> &str {
    let token = token.strip_prefix('[').unwrap_or(token);
    let token = token.strip_suffix(']').unwrap_or(token);
    let token = token.strip_prefix('(').unwrap_or(token);
    token.strip_suffix(')').unwrap_or(token)
}

/// Uppercases the first letter of every run of letters and lowercases the
/// rest: `out-and-back` becomes `Out-And-Back`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}
