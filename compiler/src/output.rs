//! Output formatting for grammar inspection.

use docopt_codegen_core::{
    ClassifiedLeaf, ClassifiedLeaves, OptionSpec, OptionsRegistry, SectionFragment, field_identifier,
};
use serde::Serialize;

use crate::Compilation;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Serializable summary of a compilation.
#[derive(Debug, Serialize)]
struct Inspection<'a> {
    program: Option<&'a str>,
    subcommands: &'a [String],
    leaves: &'a ClassifiedLeaves,
    registry: &'a OptionsRegistry,
    fragments: &'a [SectionFragment],
    warnings: Vec<String>,
}

impl<'a> Inspection<'a> {
    fn new(compilation: &'a Compilation) -> Self {
        Self {
            program: compilation.grammar.program.as_deref(),
            subcommands: &compilation.subcommands,
            leaves: &compilation.leaves,
            registry: &compilation.grammar.registry,
            fragments: &compilation.fragments,
            warnings: compilation.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Formats a compilation in the requested output format.
pub fn format_inspection(compilation: &Compilation, format: OutputFormat) -> Result<String, String> {
    let inspection = Inspection::new(compilation);
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&inspection)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(&inspection)
            .map_err(|e| format!("YAML serialization failed: {e}")),
        OutputFormat::Markdown => Ok(inspection_to_markdown(compilation)),
        OutputFormat::Table => Ok(inspection_to_table(compilation)),
    }
}

fn option_forms(option: &OptionSpec) -> String {
    match (&option.short, &option.long) {
        (Some(s), Some(l)) => format!("{s}, {l}"),
        (Some(s), None) => s.clone(),
        (None, Some(l)) => l.clone(),
        (None, None) => "?".to_string(),
    }
}

fn leaf_display(leaf: &ClassifiedLeaf<'_>) -> String {
    match leaf {
        ClassifiedLeaf::Flag(option) | ClassifiedLeaf::Option(option) => option_forms(option),
        other => other.name().to_string(),
    }
}

fn inspection_to_markdown(compilation: &Compilation) -> String {
    let mut out = String::new();
    let program = compilation.grammar.program.as_deref().unwrap_or("?");

    out.push_str(&format!("# {program}\n\n"));

    if !compilation.subcommands.is_empty() {
        out.push_str(&format!(
            "**Subcommands:** {}\n\n",
            compilation.subcommands.join(", ")
        ));
    }

    if compilation.leaves.options_shortcut {
        out.push_str("Uses the `[options]` shortcut.\n\n");
    }

    if !compilation.leaves.is_empty() {
        out.push_str("## Fields\n\n");
        out.push_str("| Kind | Leaf | Field | Default |\n");
        out.push_str("|------|------|-------|---------|\n");
        for leaf in compilation.leaves.iter() {
            out.push_str(&format!(
                "| {} | `{}` | `{}` | `{}` |\n",
                leaf.kind().label(),
                leaf_display(&leaf),
                field_identifier(leaf.name()),
                leaf.value()
            ));
        }
        out.push('\n');
    }

    if !compilation.fragments.is_empty() {
        out.push_str("## Fragments\n\n");
        for fragment in &compilation.fragments {
            out.push_str(&format!(
                "### `{}`\n\n```text\n{}\n```\n\n",
                fragment.placeholder(),
                fragment.text
            ));
        }
    }

    if !compilation.warnings.is_empty() {
        out.push_str("## Warnings\n\n");
        for warning in &compilation.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
        out.push('\n');
    }

    out
}

fn inspection_to_table(compilation: &Compilation) -> String {
    let mut out = String::new();
    let leaves = &compilation.leaves;

    out.push_str(&format!(
        "Program: {}  Leaves: {}  Options registered: {}\n",
        compilation.grammar.program.as_deref().unwrap_or("?"),
        leaves.len(),
        compilation.grammar.registry.len()
    ));

    if !compilation.subcommands.is_empty() {
        out.push_str(&format!("  Subcommands: {}\n", compilation.subcommands.join(", ")));
    }

    if !leaves.is_empty() {
        let rows: Vec<(String, String, String, String)> = leaves
            .iter()
            .map(|leaf| {
                (
                    leaf.kind().label().to_string(),
                    leaf_display(&leaf),
                    field_identifier(leaf.name()),
                    leaf.value().to_string(),
                )
            })
            .collect();
        let kind_w = rows.iter().map(|r| r.0.len()).chain(["KIND".len()]).max().unwrap_or(0);
        let leaf_w = rows.iter().map(|r| r.1.len()).chain(["LEAF".len()]).max().unwrap_or(0);
        let field_w = rows.iter().map(|r| r.2.len()).chain(["FIELD".len()]).max().unwrap_or(0);

        out.push('\n');
        out.push_str(&format!(
            "  {:<kind_w$}  {:<leaf_w$}  {:<field_w$}  DEFAULT\n",
            "KIND", "LEAF", "FIELD"
        ));
        for (kind, leaf, field, default) in &rows {
            out.push_str(&format!(
                "  {kind:<kind_w$}  {leaf:<leaf_w$}  {field:<field_w$}  {default}\n"
            ));
        }
    }

    if !compilation.warnings.is_empty() {
        out.push('\n');
        for warning in &compilation.warnings {
            out.push_str(&format!("  warning: {warning}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;

    const DOC: &str = "Usage:\n  prog motor show [--plain-text]\n  prog pid [--step=<n>]\n\nOptions:\n  -p --plain-text  Plain.\n  --step=<n>  Step [default: 0.8]\n";

    fn compilation() -> Compilation {
        Compilation::analyze(DOC, &GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_json_lists_leaves_and_fragments() {
        let json = format_inspection(&compilation(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["program"], "prog");
        assert_eq!(value["subcommands"][0], "motor");
        assert_eq!(value["leaves"]["options"][0]["value"], "0.8");
        assert_eq!(value["fragments"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_yaml_output() {
        let yaml = format_inspection(&compilation(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("program: prog"));
    }

    #[test]
    fn test_markdown_output() {
        let md = format_inspection(&compilation(), OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("# prog\n"));
        assert!(md.contains("| flag | `-p, --plain-text` | `plain_text` | `false` |"));
        assert!(md.contains("### `pid_help_message`"));
    }

    #[test]
    fn test_table_output_aligns_columns() {
        let table = format_inspection(&compilation(), OutputFormat::Table).unwrap();
        assert!(table.starts_with("Program: prog  Leaves: 5  Options registered: 2\n"));
        assert!(table.contains("  KIND     LEAF              FIELD       DEFAULT\n"));
        assert!(table.contains("  option   --step            step        \"0.8\"\n"));
    }
}
