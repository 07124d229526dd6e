//! Classified leaves: the four typed categories the emitter consumes.

use serde::{Deserialize, Serialize};

use crate::{Argument, Command, LeafKind, OptionSpec, Value};

/// Terminal nodes partitioned into commands, arguments, flags and options.
///
/// Each sequence is sorted by name. [`iter`](ClassifiedLeaves::iter) yields
/// the emission order: commands, then arguments, then flags, then options.
///
/// # Examples
///
/// ```
/// use docopt_codegen_core::{ClassifiedLeaves, Command, OptionSpec};
///
/// let leaves = ClassifiedLeaves {
///     commands: vec![Command::new("cmd")],
///     flags: vec![OptionSpec::new(None, Some("--flag"), 0)],
///     ..ClassifiedLeaves::default()
/// };
/// let names: Vec<_> = leaves.iter().map(|leaf| leaf.name()).collect();
/// assert_eq!(names, vec!["cmd", "--flag"]);
/// assert_eq!(leaves.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLeaves {
    pub commands: Vec<Command>,
    pub arguments: Vec<Argument>,
    /// Options without a value.
    pub flags: Vec<OptionSpec>,
    /// Options with a value.
    pub options: Vec<OptionSpec>,
    /// Whether the pattern contained an options shortcut.
    pub options_shortcut: bool,
}

/// Borrowed view of one classified leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedLeaf<'a> {
    Command(&'a Command),
    Argument(&'a Argument),
    Flag(&'a OptionSpec),
    Option(&'a OptionSpec),
}

impl<'a> ClassifiedLeaf<'a> {
    pub fn kind(&self) -> LeafKind {
        match self {
            ClassifiedLeaf::Command(_) => LeafKind::Command,
            ClassifiedLeaf::Argument(_) => LeafKind::Argument,
            ClassifiedLeaf::Flag(_) => LeafKind::Flag,
            ClassifiedLeaf::Option(_) => LeafKind::Option,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            ClassifiedLeaf::Command(command) => &command.name,
            ClassifiedLeaf::Argument(argument) => &argument.name,
            ClassifiedLeaf::Flag(option) | ClassifiedLeaf::Option(option) => option.name(),
        }
    }

    pub fn value(&self) -> &'a Value {
        match self {
            ClassifiedLeaf::Command(command) => &command.value,
            ClassifiedLeaf::Argument(argument) => &argument.value,
            ClassifiedLeaf::Flag(option) | ClassifiedLeaf::Option(option) => &option.value,
        }
    }
}

impl ClassifiedLeaves {
    /// Iterates all leaves in emission order.
    pub fn iter(&self) -> impl Iterator<Item = ClassifiedLeaf<'_>> {
        self.commands
            .iter()
            .map(ClassifiedLeaf::Command)
            .chain(self.arguments.iter().map(ClassifiedLeaf::Argument))
            .chain(self.flags.iter().map(ClassifiedLeaf::Flag))
            .chain(self.options.iter().map(ClassifiedLeaf::Option))
    }

    /// Flags followed by options, the order of the option lookup table.
    pub fn all_options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.flags.iter().chain(self.options.iter())
    }

    pub fn len(&self) -> usize {
        self.commands.len() + self.arguments.len() + self.flags.len() + self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
