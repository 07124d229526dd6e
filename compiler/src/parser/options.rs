//! Option-description parsing for `Options:` sections.

use std::sync::LazyLock;

use docopt_codegen_core::{OptionSpec, Value};
use regex::Regex;
use tracing::warn;

use super::{PATTERNS, parse_section};

/// An entry starts at a line whose first non-blank character is `-`
/// followed by something other than whitespace.
static ENTRY_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(-\S)").expect("static regex must compile"));

static DEFAULT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[default: (.*)\]").expect("static regex must compile")
});

/// Parses every `options:` section of `doc` into option definitions, in
/// declaration order.
pub(crate) fn parse_defaults(doc: &str) -> Vec<OptionSpec> {
    let mut defaults = Vec::new();
    for section in parse_section(&PATTERNS.options_section, doc) {
        let body = section.split_once(':').map_or("", |(_, rest)| rest);
        let text = format!("\n{body}");
        for entry in split_entries(&text) {
            match parse_option_description(entry) {
                Some(option) => defaults.push(option),
                None => warn!(entry = entry.trim(), "Skipping malformed option description"),
            }
        }
    }
    defaults
}

/// Splits a section body into option entries. Text before the first entry
/// (a heading remainder or prose) is dropped; continuation lines stay with
/// the entry above them.
fn split_entries(text: &str) -> Vec<&str> {
    let bounds: Vec<(usize, usize)> = ENTRY_START
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.start())))
        .collect();

    bounds
        .iter()
        .enumerate()
        .map(|(i, &(_, entry_start))| {
            let end = bounds.get(i + 1).map_or(text.len(), |&(next, _)| next);
            &text[entry_start..end]
        })
        .collect()
}

/// Parses one option description such as
/// `-s <step>, --step=<step>  Step size [default: 0.8]`.
///
/// The option forms end at the first double space. Any form word that is
/// neither short nor long makes the option take a value. Returns `None` when
/// the entry names no option.
pub fn parse_option_description(entry: &str) -> Option<OptionSpec> {
    let trimmed = entry.trim();
    let (forms, description) = trimmed.split_once("  ").unwrap_or((trimmed, ""));
    let forms = forms.replace([',', '='], " ");

    let mut short = None;
    let mut long = None;
    let mut argcount = 0;
    for word in forms.split_whitespace() {
        if word.starts_with("--") {
            long = Some(word);
        } else if word.starts_with('-') {
            short = Some(word);
        } else {
            argcount = 1;
        }
    }

    let short = short.filter(|s| *s != "-");
    if short.is_none() && long.is_none() {
        return None;
    }

    let option = OptionSpec::new(short, long, argcount);
    if argcount == 0 {
        return Some(option);
    }
    let default = DEFAULT_VALUE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    Some(option.with_value(Value::from(default)))
}
