//! Leaf classification: flatten the pattern tree into typed, sorted leaves.

use std::collections::HashSet;

use docopt_codegen_core::{ClassifiedLeaves, Leaf, OptionSpec, OptionsRegistry, PatternNode};
use tracing::debug;

/// Collects the distinct leaves of `pattern` and partitions them into
/// commands, arguments, flags and options, each sorted by name.
///
/// The first occurrence of a name wins. When the pattern contains an options
/// shortcut, every registered option replaces the options found in the tree.
///
/// # Examples
///
/// ```
/// use docopt_codegen::classify_leaves;
/// use docopt_codegen::parser::Grammar;
///
/// let grammar = Grammar::parse("Usage: prog go <file> [--fast] [--step=<n>]").unwrap();
/// let leaves = classify_leaves(&grammar.pattern, &grammar.registry);
///
/// assert_eq!(leaves.commands[0].name, "go");
/// assert_eq!(leaves.arguments[0].name, "<file>");
/// assert_eq!(leaves.flags[0].name(), "--fast");
/// assert_eq!(leaves.options[0].name(), "--step");
/// ```
pub fn classify_leaves(pattern: &PatternNode, registry: &OptionsRegistry) -> ClassifiedLeaves {
    let mut options_shortcut = false;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut distinct: Vec<&Leaf> = Vec::new();

    // Explicit stack; children pushed reversed so they pop in source order.
    let mut stack = vec![pattern];
    while let Some(node) = stack.pop() {
        match node {
            PatternNode::OptionsShortcut => options_shortcut = true,
            PatternNode::Leaf(leaf) => {
                if seen.insert(leaf.name()) {
                    distinct.push(leaf);
                }
            }
            _ => stack.extend(node.children().iter().rev()),
        }
    }
    distinct.sort_by(|a, b| a.name().cmp(b.name()));

    let mut leaves = ClassifiedLeaves {
        options_shortcut,
        ..ClassifiedLeaves::default()
    };
    let mut tree_options: Vec<OptionSpec> = Vec::new();
    for leaf in distinct {
        match leaf {
            Leaf::Command(command) => leaves.commands.push(command.clone()),
            Leaf::Argument(argument) => leaves.arguments.push(argument.clone()),
            Leaf::Option(option) => tree_options.push(option.clone()),
        }
    }

    let all_options = if options_shortcut {
        registry.sorted_unique()
    } else {
        tree_options
    };
    let (options, flags): (Vec<_>, Vec<_>) =
        all_options.into_iter().partition(OptionSpec::takes_value);
    leaves.flags = flags;
    leaves.options = options;

    debug!(
        commands = leaves.commands.len(),
        arguments = leaves.arguments.len(),
        flags = leaves.flags.len(),
        options = leaves.options.len(),
        options_shortcut,
        "Classified leaves"
    );
    leaves
}
