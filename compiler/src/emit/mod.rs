//! Code emission: turn classified leaves and section fragments into the
//! placeholder values both templates are rendered with.
//!
//! Language-specific rendering lives behind [`EmitTarget`]; this module
//! decides which leaves feed which placeholder and in what order. Every
//! block renders to the empty string when it has no entries, so an empty
//! grammar still yields well-formed declarations and bindings.
//!
//! # Placeholders
//!
//! | Name | Content |
//! |------|---------|
//! | `module` | `<STEM>_H` in the header, `<stem>` in the source |
//! | `commands`, `arguments`, `flags`, `options` | field declarations |
//! | `help_message`, `usage_pattern` | the grammar text and usage section |
//! | `<sub>_usage_pattern`, `<sub>_help_message` | per-subcommand fragments |
//! | `special_fields`, `special_messages`, `special_defaults` | all fragments at once |
//! | `defaults` | default values in emission order |
//! | `elems_cmds`, `elems_args`, `elems_opts`, `elems_n` | runtime lookup tables |
//! | `if_command`, `if_argument`, `if_flag`, `if_option` | binding chains |

mod c;

pub use c::CTarget;

use docopt_codegen_core::{
    Argument, ClassifiedLeaves, Command, LeafKind, OptionSpec, SectionFragment, Value,
    field_identifier,
};
use tracing::debug;

use crate::error::LiteralRenderError;
use crate::parser::Grammar;
use crate::template::TemplateValues;

/// A target language the emitter can render fragments for.
pub trait EmitTarget {
    /// Target name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Literal for a leaf value.
    fn literal(&self, value: &Value) -> Result<String, LiteralRenderError>;

    /// Literal for a text value (escaped string).
    fn text_literal(&self, text: &str) -> String;

    /// Declaration block for one leaf category.
    fn declarations(&self, kind: LeafKind, identifiers: &[String]) -> String;

    /// Initializer list of the argument structure.
    fn defaults(&self, values: &[&Value]) -> Result<String, LiteralRenderError>;

    fn command_elements(&self, commands: &[Command]) -> Result<String, LiteralRenderError>;

    fn argument_elements(&self, arguments: &[Argument]) -> Result<String, LiteralRenderError>;

    fn option_elements(&self, options: &[&OptionSpec]) -> Result<String, LiteralRenderError>;

    /// Element counts: commands, arguments, options.
    fn element_counts(&self, commands: usize, arguments: usize, options: usize) -> String;

    fn command_bindings(&self, commands: &[Command]) -> String;

    fn argument_bindings(&self, arguments: &[Argument]) -> String;

    fn flag_bindings(&self, flags: &[OptionSpec]) -> String;

    fn option_bindings(&self, options: &[OptionSpec]) -> String;

    /// Structure members holding each fragment.
    fn special_fields(&self, placeholders: &[String]) -> String;

    /// Definitions of the fragment constants, from (placeholder, literal).
    fn special_messages(&self, messages: &[(String, String)]) -> String;

    /// Initializers pointing each member at its constant.
    fn special_defaults(&self, placeholders: &[String]) -> String;
}

/// Placeholder values for the header and source templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedValues {
    pub header: TemplateValues,
    pub source: TemplateValues,
}

/// Computes every placeholder value for one compile run.
///
/// # Errors
///
/// Returns [`LiteralRenderError`] when a leaf default has no literal form in
/// the target.
pub fn emit_values(
    target: &dyn EmitTarget,
    grammar: &Grammar,
    leaves: &ClassifiedLeaves,
    fragments: &[SectionFragment],
    module: &str,
) -> Result<EmittedValues, LiteralRenderError> {
    let mut shared = TemplateValues::new();

    let declarations = [
        ("commands", LeafKind::Command, names(leaves.commands.iter().map(|c| c.name.as_str()))),
        ("arguments", LeafKind::Argument, names(leaves.arguments.iter().map(|a| a.name.as_str()))),
        ("flags", LeafKind::Flag, names(leaves.flags.iter().map(OptionSpec::name))),
        ("options", LeafKind::Option, names(leaves.options.iter().map(OptionSpec::name))),
    ];
    for (key, kind, identifiers) in declarations {
        shared.insert(key.to_string(), target.declarations(kind, &identifiers));
    }

    let defaults: Vec<&Value> = leaves.iter().map(|leaf| leaf.value()).collect();
    shared.insert("defaults".to_string(), target.defaults(&defaults)?);

    let all_options: Vec<&OptionSpec> = leaves.all_options().collect();
    shared.insert("elems_cmds".to_string(), target.command_elements(&leaves.commands)?);
    shared.insert("elems_args".to_string(), target.argument_elements(&leaves.arguments)?);
    shared.insert("elems_opts".to_string(), target.option_elements(&all_options)?);
    shared.insert(
        "elems_n".to_string(),
        target.element_counts(leaves.commands.len(), leaves.arguments.len(), all_options.len()),
    );

    shared.insert("if_command".to_string(), target.command_bindings(&leaves.commands));
    shared.insert("if_argument".to_string(), target.argument_bindings(&leaves.arguments));
    shared.insert("if_flag".to_string(), target.flag_bindings(&leaves.flags));
    shared.insert("if_option".to_string(), target.option_bindings(&leaves.options));

    shared.insert("help_message".to_string(), target.text_literal(&grammar.doc));
    shared.insert("usage_pattern".to_string(), target.text_literal(&grammar.usage));

    let placeholders: Vec<String> = fragments.iter().map(SectionFragment::placeholder).collect();
    let mut messages = Vec::with_capacity(fragments.len());
    for (placeholder, fragment) in placeholders.iter().zip(fragments) {
        let literal = target.text_literal(&fragment.text);
        shared.insert(placeholder.clone(), literal.clone());
        messages.push((placeholder.clone(), literal));
    }
    shared.insert("special_fields".to_string(), target.special_fields(&placeholders));
    shared.insert("special_messages".to_string(), target.special_messages(&messages));
    shared.insert("special_defaults".to_string(), target.special_defaults(&placeholders));

    debug!(
        target_name = target.name(),
        values = shared.len(),
        fragments = fragments.len(),
        "Emitted template values"
    );

    let mut header = shared.clone();
    header.insert("module".to_string(), format!("{}_H", module.to_uppercase()));
    let mut source = shared;
    source.insert("module".to_string(), module.to_string());

    Ok(EmittedValues { header, source })
}

fn names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names.map(field_identifier).collect()
}

/// Greedy wrap of a comma-separated list. Items are never split; an item
/// longer than `width` gets a line of its own.
pub(crate) fn wrap(items: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for (i, item) in items.iter().enumerate() {
        let word = if i + 1 < items.len() {
            format!("{item},")
        } else {
            item.clone()
        };
        if line.is_empty() {
            line.push_str(&word);
        } else if line.len() + 1 + word.len() <= width {
            line.push(' ');
            line.push_str(&word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(&word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
